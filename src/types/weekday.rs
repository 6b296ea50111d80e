use chrono::{Datelike, NaiveDate};

/// Day-of-week number with Monday = 1 through Sunday = 7.
pub fn weekday_number(date: NaiveDate) -> i32 {
    date.weekday().number_from_monday() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monday_is_one() {
        // 2021-07-05 was a Monday.
        let monday = NaiveDate::from_ymd_opt(2021, 7, 5).unwrap();
        assert_eq!(weekday_number(monday), 1);
        assert_eq!(weekday_number(monday + chrono::Duration::days(6)), 7);
    }
}
