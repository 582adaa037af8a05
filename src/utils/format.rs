use chrono::NaiveDate;

/// Format a calendar date for the history listing
/// e.g. 2024-01-05 becomes "Jan 05, 2024"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Format a dose count with the right plural
pub fn format_doses(doses: u32) -> String {
    if doses == 1 {
        "1 dose".to_string()
    } else {
        format!("{} doses", doses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "Jan 05, 2024");
    }

    #[test]
    fn test_format_doses() {
        assert_eq!(format_doses(0), "0 doses");
        assert_eq!(format_doses(1), "1 dose");
        assert_eq!(format_doses(3), "3 doses");
    }
}
