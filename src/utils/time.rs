use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::errors::{CollegeError, Result};

/// 解析截止时间类字段
///
/// 接受 RFC 3339、`YYYY-MM-DD HH:MM:SS`、`YYYY-MM-DDTHH:MM:SS`（按 UTC），
/// 以及只有日期的 `YYYY-MM-DD`（当天 23:59:59）。
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        && let Some(end_of_day) = date.and_hms_opt(23, 59, 59)
    {
        return Ok(end_of_day.and_utc());
    }

    Err(CollegeError::date_parse(format!(
        "Invalid datetime '{value}'. Use RFC 3339 or YYYY-MM-DD HH:MM:SS"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        let rfc = parse_datetime("2025-03-01T10:00:00+02:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2025-03-01T08:00:00+00:00");

        let spaced = parse_datetime("2025-03-01 10:00:00").unwrap();
        assert_eq!(spaced.timestamp(), rfc.timestamp() + 2 * 3600);

        let date_only = parse_datetime("2025-03-01").unwrap();
        assert_eq!(date_only.to_rfc3339(), "2025-03-01T23:59:59+00:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_datetime("next friday").unwrap_err();
        assert_eq!(err.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
