use chrono::{NaiveDateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Render the elapsed time since `timestamp` as the largest whole non-zero
/// unit, single unit only: "4d", "2h", "41m" ("0m" below a minute).
/// An absent or unparseable timestamp yields `None`.
pub fn age(timestamp: Option<&str>) -> Option<String> {
    age_since(timestamp, Utc::now().naive_utc())
}

pub fn age_since(timestamp: Option<&str>, now: NaiveDateTime) -> Option<String> {
    let start = NaiveDateTime::parse_from_str(timestamp?, TIMESTAMP_FORMAT).ok()?;
    let elapsed = now - start;
    let rendered = if elapsed.num_days() > 0 {
        format!("{}d", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h", elapsed.num_hours())
    } else {
        format!("{}m", elapsed.num_minutes())
    };
    Some(rendered)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::{age_since, TIMESTAMP_FORMAT};

    fn at(timestamp: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn whole_days() {
        let age = age_since(Some("2021-08-06T21:15:08Z"), at("2021-08-10T23:56:08Z"));
        assert_eq!(age.as_deref(), Some("4d"));
    }

    #[test]
    fn whole_hours() {
        let age = age_since(Some("2021-08-06T21:15:08Z"), at("2021-08-06T23:56:08Z"));
        assert_eq!(age.as_deref(), Some("2h"));
    }

    #[test]
    fn whole_minutes() {
        let age = age_since(Some("2021-08-06T21:15:08Z"), at("2021-08-06T21:56:08Z"));
        assert_eq!(age.as_deref(), Some("41m"));
    }

    #[test]
    fn sub_minute_is_zero_minutes() {
        let age = age_since(Some("2021-08-06T21:15:08Z"), at("2021-08-06T21:15:15Z"));
        assert_eq!(age.as_deref(), Some("0m"));
    }

    #[test]
    fn absent_timestamp() {
        assert_eq!(age_since(None, at("2021-08-06T21:15:15Z")), None);
    }

    #[test]
    fn unparseable_timestamp() {
        assert_eq!(age_since(Some("yesterday"), at("2021-08-06T21:15:15Z")), None);
    }
}
