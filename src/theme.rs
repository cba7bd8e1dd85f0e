use std::str::FromStr;

use tuirealm::ratatui::style::Color;

use crate::types::Priority;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum ThemePreset {
    #[default]
    Default,
    Light,
    HighContrast,
    Mono,
}

impl ThemePreset {
    pub const ALL: [Self; 4] = [Self::Default, Self::Light, Self::HighContrast, Self::Mono];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Light => "light",
            Self::HighContrast => "high-contrast",
            Self::Mono => "mono",
        }
    }

    /// Comma separated list of accepted names, for error messages.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|preset| preset.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for ThemePreset {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" | "dark" => Ok(Self::Default),
            "light" | "day" => Ok(Self::Light),
            "high-contrast" | "high_contrast" | "contrast" => Ok(Self::HighContrast),
            "mono" | "monochrome" => Ok(Self::Mono),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base: BasePalette,
    pub interactive: InteractivePalette,
    pub priority: PriorityPalette,
    pub dialog: DialogPalette,
}

#[derive(Debug, Clone, Copy)]
pub struct BasePalette {
    pub canvas: Color,
    pub text: Color,
    pub text_muted: Color,
    pub header: Color,
    pub accent: Color,
    pub danger: Color,
    pub success: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct InteractivePalette {
    pub focus: Color,
    pub selected_bg: Color,
    pub selected_border: Color,
    pub border: Color,
}

/// Card tints per priority level.
#[derive(Debug, Clone, Copy)]
pub struct PriorityPalette {
    pub low: Color,
    pub medium: Color,
    pub high: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct DialogPalette {
    pub surface: Color,
    pub input_bg: Color,
    pub button_bg: Color,
    pub button_fg: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct CardColors {
    pub background: Color,
    pub border: Color,
}

impl Theme {
    pub fn from_preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::Default => Self {
                base: BasePalette {
                    canvas: Color::Rgb(30, 33, 43),
                    text: Color::White,
                    text_muted: Color::DarkGray,
                    header: Color::Cyan,
                    accent: Color::LightBlue,
                    danger: Color::LightRed,
                    success: Color::LightGreen,
                },
                interactive: InteractivePalette {
                    focus: Color::Yellow,
                    selected_bg: Color::Rgb(52, 56, 74),
                    selected_border: Color::Cyan,
                    border: Color::DarkGray,
                },
                priority: PriorityPalette {
                    low: Color::Rgb(32, 64, 40),
                    medium: Color::Rgb(74, 66, 28),
                    high: Color::Rgb(82, 34, 34),
                },
                dialog: DialogPalette {
                    surface: Color::Rgb(30, 33, 43),
                    input_bg: Color::Rgb(40, 44, 58),
                    button_bg: Color::Blue,
                    button_fg: Color::White,
                },
            },
            ThemePreset::Light => Self {
                base: BasePalette {
                    canvas: Color::Rgb(248, 249, 251),
                    text: Color::Rgb(31, 41, 55),
                    text_muted: Color::Rgb(107, 114, 128),
                    header: Color::Rgb(29, 78, 216),
                    accent: Color::Rgb(3, 105, 161),
                    danger: Color::Rgb(185, 28, 28),
                    success: Color::Rgb(21, 128, 61),
                },
                interactive: InteractivePalette {
                    focus: Color::Rgb(29, 78, 216),
                    selected_bg: Color::Rgb(224, 231, 255),
                    selected_border: Color::Rgb(59, 130, 246),
                    border: Color::Rgb(203, 213, 225),
                },
                priority: PriorityPalette {
                    low: Color::Rgb(220, 252, 231),
                    medium: Color::Rgb(254, 249, 195),
                    high: Color::Rgb(254, 226, 226),
                },
                dialog: DialogPalette {
                    surface: Color::Rgb(255, 255, 255),
                    input_bg: Color::Rgb(241, 245, 249),
                    button_bg: Color::Rgb(29, 78, 216),
                    button_fg: Color::White,
                },
            },
            ThemePreset::HighContrast => Self {
                base: BasePalette {
                    canvas: Color::Black,
                    text: Color::White,
                    text_muted: Color::Gray,
                    header: Color::LightCyan,
                    accent: Color::LightBlue,
                    danger: Color::LightRed,
                    success: Color::LightGreen,
                },
                interactive: InteractivePalette {
                    focus: Color::LightYellow,
                    selected_bg: Color::Rgb(40, 40, 40),
                    selected_border: Color::LightYellow,
                    border: Color::Gray,
                },
                priority: PriorityPalette {
                    low: Color::Rgb(0, 70, 0),
                    medium: Color::Rgb(90, 80, 0),
                    high: Color::Rgb(110, 0, 0),
                },
                dialog: DialogPalette {
                    surface: Color::Black,
                    input_bg: Color::Rgb(24, 24, 24),
                    button_bg: Color::White,
                    button_fg: Color::Black,
                },
            },
            ThemePreset::Mono => Self {
                base: BasePalette {
                    canvas: Color::Rgb(26, 26, 26),
                    text: Color::White,
                    text_muted: Color::Gray,
                    header: Color::White,
                    accent: Color::Gray,
                    danger: Color::White,
                    success: Color::White,
                },
                interactive: InteractivePalette {
                    focus: Color::White,
                    selected_bg: Color::Rgb(45, 45, 45),
                    selected_border: Color::White,
                    border: Color::Gray,
                },
                priority: PriorityPalette {
                    low: Color::Rgb(34, 34, 34),
                    medium: Color::Rgb(44, 44, 44),
                    high: Color::Rgb(56, 56, 56),
                },
                dialog: DialogPalette {
                    surface: Color::Rgb(26, 26, 26),
                    input_bg: Color::Rgb(36, 36, 36),
                    button_bg: Color::Gray,
                    button_fg: Color::Black,
                },
            },
        }
    }

    pub fn priority_tint(&self, priority: Priority) -> Color {
        match priority {
            Priority::Low => self.priority.low,
            Priority::Medium => self.priority.medium,
            Priority::High => self.priority.high,
        }
    }

    /// Card background follows the priority tint; selection only changes the border.
    pub fn card_colors(&self, priority: Priority, selected: bool) -> CardColors {
        CardColors {
            background: self.priority_tint(priority),
            border: if selected {
                self.interactive.selected_border
            } else {
                self.interactive.border
            },
        }
    }

    pub fn dialog_surface(&self) -> Color {
        self.dialog.surface
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_preset(ThemePreset::Default)
    }
}
