use chrono::{DateTime, Local, TimeZone};
use std::time::Duration;

/// Wall-clock `HH:MM` for the home view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockWidget;

impl ClockWidget {
    pub const TICK: Duration = Duration::from_secs(1);

    /// Zero-padded 24-hour time.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use tianyan_portal::ClockWidget;
    ///
    /// let t = Utc.with_ymd_and_hms(2024, 1, 1, 9, 5, 59).unwrap();
    /// assert_eq!(ClockWidget::format(&t), "09:05");
    /// ```
    pub fn format<Tz: TimeZone>(now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        now.format("%H:%M").to_string()
    }

    pub fn now() -> String {
        Self::format(&Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn midnight_and_late_evening() {
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(ClockWidget::format(&t), "00:00");
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 23, 59, 59).unwrap();
        assert_eq!(ClockWidget::format(&t), "23:59");
    }

    #[test]
    fn uses_the_given_offset() {
        let east8 = FixedOffset::east_opt(8 * 3600).unwrap();
        let t = Utc
            .with_ymd_and_hms(2024, 6, 1, 18, 30, 0)
            .unwrap()
            .with_timezone(&east8);
        assert_eq!(ClockWidget::format(&t), "02:30");
    }

    #[test]
    fn now_is_five_chars() {
        assert_eq!(ClockWidget::now().len(), 5);
    }
}
