use chrono::{Datelike, Days, Months, NaiveDate};

/// Describe `date` as a person would, relative to `relative_to`.
///
/// Within a week either side: `Today`, `Tomorrow`, `Yesterday`, the weekday
/// name, or `Last <weekday>`. Further out: the full date, with the year only
/// when it differs.
pub fn humanize_date(date: NaiveDate, relative_to: NaiveDate) -> String {
    let diff = (date - relative_to).num_days();
    match diff {
        -6..=-2 => format!("Last {}", date.format("%A")),
        -1 => "Yesterday".to_string(),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        2..=6 => date.format("%A").to_string(),
        _ if date.year() == relative_to.year() => date.format("%A, %B %-d").to_string(),
        _ => date.format("%A, %B %-d, %Y").to_string(),
    }
}

pub fn day_of_month_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// Short form for a past deadline, e.g. `Yesterday` or `Mar 4th`
pub fn short_past_date(date: NaiveDate, today: NaiveDate) -> String {
    if (today - date).num_days() == 1 {
        return "Yesterday".to_string();
    }
    format!("{} {}{}", date.format("%b"), date.day(), day_of_month_suffix(date.day()))
}

/// Shortcut keys for moving a task, in display order
pub const RESCHEDULE_KEYS: [char; 11] = ['0', '1', '2', '3', '4', '5', '6', '7', 'f', 'm', 'y'];

/// The date a reschedule shortcut picks: `0`-`7` are days from `today`, `f`
/// is a fortnight out, `m` the first of next month and `y` the first of next
/// year.
pub fn reschedule_date(key: char, today: NaiveDate) -> Option<NaiveDate> {
    match key {
        '0'..='7' => {
            let days = key.to_digit(10)?;
            today.checked_add_days(Days::new(days.into()))
        }
        'f' => today.checked_add_days(Days::new(14)),
        'm' => today.with_day(1)?.checked_add_months(Months::new(1)),
        'y' => NaiveDate::from_ymd_opt(today.year() + 1, 1, 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn near_dates_are_relative() {
        // 2024-06-05 is a Wednesday
        let today = date(2024, 6, 5);
        assert_eq!(humanize_date(today, today), "Today");
        assert_eq!(humanize_date(date(2024, 6, 6), today), "Tomorrow");
        assert_eq!(humanize_date(date(2024, 6, 4), today), "Yesterday");
        assert_eq!(humanize_date(date(2024, 6, 8), today), "Saturday");
        assert_eq!(humanize_date(date(2024, 6, 11), today), "Tuesday");
        assert_eq!(humanize_date(date(2024, 6, 1), today), "Last Saturday");
        assert_eq!(humanize_date(date(2024, 5, 30), today), "Last Thursday");
    }

    #[test]
    fn far_dates_are_absolute() {
        let today = date(2024, 6, 5);
        assert_eq!(humanize_date(date(2024, 6, 12), today), "Wednesday, June 12");
        assert_eq!(humanize_date(date(2024, 5, 29), today), "Wednesday, May 29");
        assert_eq!(
            humanize_date(date(2025, 1, 3), today),
            "Friday, January 3, 2025"
        );
    }

    #[test]
    fn reschedule_shortcuts() {
        let today = date(2024, 12, 30);
        assert_eq!(reschedule_date('0', today), Some(today));
        assert_eq!(reschedule_date('1', today), Some(date(2024, 12, 31)));
        assert_eq!(reschedule_date('7', today), Some(date(2025, 1, 6)));
        assert_eq!(reschedule_date('f', today), Some(date(2025, 1, 13)));
        assert_eq!(reschedule_date('m', today), Some(date(2025, 1, 1)));
        assert_eq!(reschedule_date('y', today), Some(date(2025, 1, 1)));
        assert_eq!(reschedule_date('m', date(2024, 1, 31)), Some(date(2024, 2, 1)));
        assert_eq!(reschedule_date('8', today), None);
        assert!(RESCHEDULE_KEYS.iter().all(|k| reschedule_date(*k, today).is_some()));
    }

    #[test]
    fn suffixes() {
        let got: Vec<&str> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 30, 31]
            .into_iter()
            .map(day_of_month_suffix)
            .collect();
        assert_eq!(
            got,
            vec!["st", "nd", "rd", "th", "th", "th", "th", "st", "nd", "rd", "th", "st"]
        );
    }

    #[test]
    fn short_past_dates() {
        let today = date(2024, 3, 5);
        assert_eq!(short_past_date(date(2024, 3, 4), today), "Yesterday");
        assert_eq!(short_past_date(date(2024, 3, 1), today), "Mar 1st");
        assert_eq!(short_past_date(date(2024, 2, 22), today), "Feb 22nd");
    }
}
