use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

/// Digit-by-digit editor for a calendar date. Year, month and day are
/// typed separately; Left/Right move between them.
#[derive(Debug, Clone)]
pub struct DateInputState {
    pub date: NaiveDate,
    pub editing: bool,
    pub date_part: DatePart,
    pub current_date_input: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Year,
            current_date_input: String::new(),
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.editing {
            self.date_part = DatePart::Year;
            self.current_date_input.clear();
        }
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.current_date_input.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.current_date_input.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.current_date_input.push(c);
                let width = match self.date_part {
                    DatePart::Year => 4,
                    DatePart::Month | DatePart::Day => 2,
                };
                if self.current_date_input.len() == width {
                    self.apply_current_input();
                    self.current_date_input.clear();
                    // Typing flows straight on to the next part.
                    if self.date_part != DatePart::Day {
                        self.next_date_part();
                    }
                }
            }
            KeyCode::Backspace => {
                self.current_date_input.pop();
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            KeyCode::Up => self.step(1),
            KeyCode::Down => self.step(-1),
            _ => {}
        }
    }

    fn apply_current_input(&mut self) {
        let Ok(value) = self.current_date_input.parse::<u32>() else {
            return;
        };
        let (year, month, day) = (self.date.year(), self.date.month(), self.date.day());

        let candidate = match self.date_part {
            DatePart::Year if (1900..=2100).contains(&value) => {
                let year = value as i32;
                NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
            }
            DatePart::Month if (1..=12).contains(&value) => {
                NaiveDate::from_ymd_opt(year, value, day.min(days_in_month(year, value)))
            }
            DatePart::Day => NaiveDate::from_ymd_opt(year, month, value),
            _ => None,
        };
        if let Some(date) = candidate {
            self.date = date;
        }
    }

    /// Up/Down nudges the selected part by one.
    fn step(&mut self, delta: i32) {
        let stepped = match self.date_part {
            DatePart::Day => self.date.checked_add_signed(chrono::Duration::days(delta as i64)),
            DatePart::Month => {
                if delta > 0 {
                    self.date.checked_add_months(chrono::Months::new(1))
                } else {
                    self.date.checked_sub_months(chrono::Months::new(1))
                }
            }
            DatePart::Year => {
                let year = self.date.year() + delta;
                let month = self.date.month();
                NaiveDate::from_ymd_opt(year, month, self.date.day().min(days_in_month(year, month)))
            }
        };
        if let Some(date) = stepped {
            self.date = date;
        }
    }

    pub fn get_display_string(&self) -> String {
        let (year, month, day) = (
            format!("{:04}", self.date.year()),
            format!("{:02}", self.date.month()),
            format!("{:02}", self.date.day()),
        );
        if !self.editing {
            return format!("{}-{}-{}", year, month, day);
        }

        let current_input = if self.current_date_input.is_empty() {
            match self.date_part {
                DatePart::Year => "[YYYY]".to_string(),
                DatePart::Month => "[MM]".to_string(),
                DatePart::Day => "[DD]".to_string(),
            }
        } else {
            format!("[{}]", self.current_date_input)
        };

        match self.date_part {
            DatePart::Year => format!("{}{}-{}-{}", year, current_input, month, day),
            DatePart::Month => format!("{}-{}{}-{}", year, month, current_input, day),
            DatePart::Day => format!("{}-{}-{}{}", year, month, day, current_input),
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
