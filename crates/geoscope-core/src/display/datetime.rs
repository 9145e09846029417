//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a `Timestamp` in the system timezone as `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// Shortens a service timestamp (`2024-05-01T12:30:45.123456`) to
/// `2024-05-01 12:30`. Unrecognized text is shown as is.
pub struct ServiceTime<'a>(pub &'a str);

impl fmt::Display for ServiceTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self
            .0
            .split_once('T')
            .and_then(|(date, time)| Some((date, time.get(..5)?)));
        match short {
            Some((date, time)) => write!(f, "{date} {time}"),
            None => f.write_str(self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_time() {
        assert_eq!(
            ServiceTime("2024-05-01T12:30:45.123456").to_string(),
            "2024-05-01 12:30"
        );
        assert_eq!(ServiceTime("yesterday").to_string(), "yesterday");
        assert_eq!(ServiceTime("").to_string(), "");
    }
}
