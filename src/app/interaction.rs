use tuirealm::ratatui::layout::Rect;

use super::messages::Message;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InteractionLayer {
    Base,
    Dialog,
    Picker,
}

impl InteractionLayer {
    fn priority(self) -> u8 {
        match self {
            Self::Base => 0,
            Self::Dialog => 1,
            Self::Picker => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InteractionKind {
    LeftClick,
    RightClick,
}

/// Clickable screen region registered during rendering.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InteractionNode {
    pub rect: Rect,
    pub layer: InteractionLayer,
    pub left: Option<Message>,
    pub right: Option<Message>,
}

impl InteractionNode {
    pub fn click(layer: InteractionLayer, rect: Rect, message: Message) -> Self {
        Self {
            rect,
            layer,
            left: Some(message),
            right: None,
        }
    }

    /// A todo card: plain click and alternate click lead to different actions.
    pub fn card(layer: InteractionLayer, rect: Rect, left: Message, right: Message) -> Self {
        Self {
            rect,
            layer,
            left: Some(left),
            right: Some(right),
        }
    }

    /// Swallows clicks so regions underneath stay inert.
    pub fn blocker(layer: InteractionLayer, rect: Rect) -> Self {
        Self {
            rect,
            layer,
            left: None,
            right: None,
        }
    }

    fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.rect.x
            && col < self.rect.x.saturating_add(self.rect.width)
            && row >= self.rect.y
            && row < self.rect.y.saturating_add(self.rect.height)
    }

    fn message_for(&self, kind: InteractionKind) -> Option<&Message> {
        match kind {
            InteractionKind::LeftClick => self.left.as_ref(),
            InteractionKind::RightClick => self.right.as_ref(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct InteractionMap {
    nodes: Vec<InteractionNode>,
}

impl InteractionMap {
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn register(&mut self, node: InteractionNode) {
        self.nodes.push(node);
    }

    pub fn register_click(&mut self, layer: InteractionLayer, rect: Rect, message: Message) {
        self.register(InteractionNode::click(layer, rect, message));
    }

    pub fn register_card(
        &mut self,
        layer: InteractionLayer,
        rect: Rect,
        left: Message,
        right: Message,
    ) {
        self.register(InteractionNode::card(layer, rect, left, right));
    }

    pub fn register_blocker(&mut self, layer: InteractionLayer, rect: Rect) {
        self.register(InteractionNode::blocker(layer, rect));
    }

    /// Topmost node under the pointer wins: higher layer first, then the
    /// latest registration within a layer. A winning node without a message
    /// for `kind` yields `None`.
    pub fn resolve_message(&self, col: u16, row: u16, kind: InteractionKind) -> Option<Message> {
        self.resolve_node(col, row)
            .and_then(|node| node.message_for(kind).cloned())
    }

    pub fn resolve_node(&self, col: u16, row: u16) -> Option<&InteractionNode> {
        let mut best: Option<(usize, &InteractionNode)> = None;
        for (idx, node) in self.nodes.iter().enumerate() {
            if !node.contains(col, row) {
                continue;
            }
            match best {
                None => best = Some((idx, node)),
                Some((best_idx, best_node)) => {
                    let has_higher_layer = node.layer.priority() > best_node.layer.priority();
                    let same_layer_later_registration =
                        node.layer.priority() == best_node.layer.priority() && idx > best_idx;
                    if has_higher_layer || same_layer_later_registration {
                        best = Some((idx, node));
                    }
                }
            }
        }
        best.map(|(_, node)| node)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
