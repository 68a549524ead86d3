use chrono::{DateTime, Local, TimeZone, Utc};

/// `02 Jan 2025, 10:30 am`
pub fn format_created_at<Tz: TimeZone>(created_at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    created_at
        .with_timezone(tz)
        .format("%d %b %Y, %I:%M %P")
        .to_string()
}

pub fn format_created_at_local(created_at: &DateTime<Utc>) -> String {
    format_created_at(created_at, &Local)
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use super::format_created_at;

    #[test]
    fn test_format_in_utc() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 22, 5, 0).unwrap();
        assert_eq!(format_created_at(&ts, &Utc), "02 Jan 2025, 10:05 pm");
    }

    #[test]
    fn test_format_shifts_into_zone() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 6, 9, 15, 0).unwrap();
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(format_created_at(&ts, &ist), "06 Jan 2025, 02:45 pm");
    }
}
