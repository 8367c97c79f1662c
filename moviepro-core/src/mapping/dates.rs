use chrono::{DateTime, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";
const BIRTHDAY_DISPLAY: &str = "%b %d, %Y";

/// Parses a catalog date, accepting both `YYYY-MM-DD` and full RFC 3339
/// timestamps.
pub fn parse_catalog_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// `Jul 03, 1962` style rendering used for actor birthdays.
pub fn display_date(date: NaiveDate) -> String {
    date.format(BIRTHDAY_DISPLAY).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_timestamp_dates() {
        let expected = NaiveDate::from_ymd_opt(1999, 3, 30).unwrap();
        assert_eq!(parse_catalog_date("1999-03-30"), Some(expected));
        assert_eq!(parse_catalog_date(" 1999-03-30 "), Some(expected));
        assert_eq!(
            parse_catalog_date("1999-03-30T00:00:00.000Z"),
            Some(expected)
        );
        assert_eq!(parse_catalog_date(""), None);
        assert_eq!(parse_catalog_date("30/03/1999"), None);
    }

    #[test]
    fn birthdays_render_with_short_month() {
        let date = NaiveDate::from_ymd_opt(1962, 7, 3).unwrap();
        assert_eq!(display_date(date), "Jul 03, 1962");
    }
}
