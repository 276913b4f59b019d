use std::{convert::Infallible, fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Value of the session divider column. Dates order chronologically, anything
/// else orders after all dates, as text.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SessionKey {
    Date(NaiveDateTime),
    Text(String),
}

impl Default for SessionKey {
    fn default() -> SessionKey {
        SessionKey::Text(String::new())
    }
}

impl FromStr for SessionKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<SessionKey, Infallible> {
        let s = s.trim();
        for format in DATE_TIME_FORMATS {
            if let Ok(date_time) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(SessionKey::Date(date_time));
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return Ok(SessionKey::Date(date.and_time(NaiveTime::MIN)));
            }
        }
        Ok(SessionKey::Text(s.to_owned()))
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SessionKey::Date(date_time) if date_time.time() == NaiveTime::MIN => {
                write!(f, "{}", date_time.date())
            }
            SessionKey::Date(date_time) => write!(f, "{}", date_time),
            SessionKey::Text(text) => f.write_str(text),
        }
    }
}

impl SessionKey {
    pub fn is_empty(&self) -> bool {
        matches!(self, SessionKey::Text(text) if text.is_empty())
    }

    /// Day of the session, without time of day, for reports.
    pub fn day(&self) -> String {
        match self {
            SessionKey::Date(date_time) => date_time.date().to_string(),
            SessionKey::Text(text) => text.split_whitespace().next().unwrap_or_default().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> SessionKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_dates() {
        assert_eq!(key("2023-05-01"), key("2023-05-01 00:00:00"));
        assert_eq!(key("05/01/2023"), key("2023-05-01"));
        assert_eq!(key("2023-05-01").to_string(), "2023-05-01");
        assert_eq!(key("2023-05-01 13:30:00").to_string(), "2023-05-01 13:30:00");
        assert_eq!(key("2023-05-01 13:30:00").day(), "2023-05-01");
    }

    #[test]
    fn test_order() {
        assert!(key("2023-05-02") > key("2023-05-01 23:00:00"));
        assert!(key("12/31/2022") < key("2023-01-01"));
        assert!(key("session 2") > key("2030-01-01"));
        assert_eq!(key(" session 2 "), SessionKey::Text("session 2".to_owned()));
        assert_eq!(key("session 2").day(), "session");
    }

    #[test]
    fn test_empty() {
        assert!(key("").is_empty());
        assert!(SessionKey::default().is_empty());
    }
}
