//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Parse a UUID, reporting the offending field and value on failure.
pub(crate) fn parse_uuid(raw: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| {
        Error::invalid_request(format!("{} must be a valid UUID", field.as_str())).with_details(
            json!({
                "field": field.as_str(),
                "value": raw,
                "code": "invalid_uuid",
            }),
        )
    })
}

/// Parse an optional RFC 3339 timestamp into UTC.
pub(crate) fn parse_optional_rfc3339_timestamp(
    raw: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    raw.map(|value| {
        DateTime::parse_from_rfc3339(&value)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|_| {
                Error::invalid_request(format!(
                    "{} must be an RFC 3339 timestamp",
                    field.as_str()
                ))
                .with_details(json!({
                    "field": field.as_str(),
                    "value": value,
                    "code": "invalid_timestamp",
                }))
            })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for field-level validation errors.

    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    fn parse_uuid_accepts_valid_input() {
        let parsed = parse_uuid(
            "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            FieldName::new("eventId"),
        )
        .expect("valid uuid");
        assert_eq!(parsed.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    fn parse_uuid_reports_field_and_value() {
        let error = parse_uuid("nope", FieldName::new("eventId")).expect_err("invalid uuid");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details");
        assert_eq!(details.get("field"), Some(&Value::from("eventId")));
        assert_eq!(details.get("code"), Some(&Value::from("invalid_uuid")));
    }

    #[rstest]
    fn parse_timestamp_accepts_absent_value() {
        let parsed = parse_optional_rfc3339_timestamp(None, FieldName::new("startsAt"))
            .expect("absent is fine");
        assert!(parsed.is_none());
    }

    #[rstest]
    fn parse_timestamp_rejects_garbage() {
        let error = parse_optional_rfc3339_timestamp(
            Some("next tuesday".to_owned()),
            FieldName::new("startsAt"),
        )
        .expect_err("invalid timestamp");
        let details = error.details().expect("details");
        assert_eq!(details.get("code"), Some(&Value::from("invalid_timestamp")));
    }
}
