//! Month-grid date picker used by the deadline field.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DatePickerState {
    /// Highlighted day; confirming picks it.
    pub cursor: NaiveDate,
    pub today: NaiveDate,
}

impl DatePickerState {
    pub fn new(initial: NaiveDate, today: NaiveDate) -> Self {
        Self {
            cursor: initial,
            today,
        }
    }

    pub fn move_days(&mut self, delta: i64) {
        let moved = if delta >= 0 {
            self.cursor.checked_add_days(Days::new(delta.unsigned_abs()))
        } else {
            self.cursor.checked_sub_days(Days::new(delta.unsigned_abs()))
        };
        if let Some(date) = moved {
            self.cursor = date;
        }
    }

    /// Shifts by whole months, clamping the day to the target month's length.
    pub fn move_months(&mut self, delta: i32) {
        let months = Months::new(delta.unsigned_abs());
        let moved = if delta >= 0 {
            self.cursor.checked_add_months(months)
        } else {
            self.cursor.checked_sub_months(months)
        };
        if let Some(date) = moved {
            self.cursor = date;
        }
    }

    pub fn jump_to_today(&mut self) {
        self.cursor = self.today;
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.cursor = date;
    }

    pub fn month_title(&self) -> String {
        self.cursor.format("%B %Y").to_string()
    }

    /// Weeks of the cursor's month, Monday first. Days outside the month are `None`.
    pub fn month_grid(&self) -> Vec<[Option<NaiveDate>; 7]> {
        let Some(first) = self.cursor.with_day(1) else {
            return Vec::new();
        };
        let lead = first.weekday().num_days_from_monday() as usize;

        let mut weeks = Vec::new();
        let mut week = [None; 7];
        let mut slot = lead;
        let mut day = Some(first);

        while let Some(date) = day.filter(|date| date.month() == first.month()) {
            week[slot] = Some(date);
            slot += 1;
            if slot == 7 {
                weeks.push(week);
                week = [None; 7];
                slot = 0;
            }
            day = date.succ_opt();
        }

        if slot > 0 {
            weeks.push(week);
        }
        weeks
    }
}

pub const WEEKDAY_HEADER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];
