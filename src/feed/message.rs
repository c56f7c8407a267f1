use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::error::FeedError;

/// Field read from each message to compute deltas.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Field attached to each message after the first.
pub const DELTATIME_FIELD: &str = "deltatime";

/// Point in time carried by a message's `timestamp` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Valid(DateTime<Utc>),
    /// Missing or unparseable; deltas against it are `null`.
    Invalid,
}

impl Timestamp {
    /// Interpret a JSON value as a timestamp.
    ///
    /// Numbers are milliseconds since the Unix epoch. Strings are RFC 3339,
    /// or a zone-less date/time (`T` or space separated) taken as UTC.
    pub fn from_json(value: Option<&Value>) -> Self {
        let parsed = match value {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .and_then(DateTime::from_timestamp_millis),
            Some(Value::String(s)) => parse_date_string(s),
            _ => None,
        };

        parsed.map(Timestamp::Valid).unwrap_or(Timestamp::Invalid)
    }

    /// Milliseconds from `earlier` to `self`, if both are valid.
    pub fn millis_since(&self, earlier: &Timestamp) -> Option<i64> {
        match (self, earlier) {
            (Timestamp::Valid(now), Timestamp::Valid(then)) => {
                Some((*now - *then).num_milliseconds())
            }
            _ => None,
        }
    }
}

fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A decoded feed message.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedMessage {
    value: Value,
}

impl FeedMessage {
    /// Decode a raw text frame.
    pub fn decode(raw: &str) -> Result<Self, FeedError> {
        let value: Value = serde_json::from_str(raw)?;
        if value.is_null() {
            return Err(FeedError::NullMessage);
        }
        Ok(Self { value })
    }

    pub fn timestamp(&self) -> Timestamp {
        Timestamp::from_json(self.value.get(TIMESTAMP_FIELD))
    }

    /// Attach `deltatime` relative to `previous`.
    ///
    /// Non-object messages are left untouched.
    pub fn annotate_delta(&mut self, previous: &Timestamp) {
        let delta = self.timestamp().millis_since(previous);
        if let Value::Object(map) = &mut self.value {
            map.insert(
                DELTATIME_FIELD.to_string(),
                delta.map(Value::from).unwrap_or(Value::Null),
            );
        }
    }

    pub fn deltatime(&self) -> Option<&Value> {
        self.value.get(DELTATIME_FIELD)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Compact JSON text used for the rendered entry.
    pub fn to_text(&self) -> String {
        self.value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn numeric_timestamps_are_epoch_millis() {
        let ts = Timestamp::from_json(Some(&json!(1_700_000_000_123i64)));
        let earlier = Timestamp::from_json(Some(&json!(1_700_000_000_000i64)));
        assert_eq!(ts.millis_since(&earlier), Some(123));
    }

    #[test]
    fn fractional_millis_are_truncated() {
        let ts = Timestamp::from_json(Some(&json!(1500.9)));
        let zero = Timestamp::from_json(Some(&json!(0)));
        assert_eq!(ts.millis_since(&zero), Some(1500));
    }

    #[test]
    fn string_timestamps() {
        let rfc = Timestamp::from_json(Some(&json!("2024-03-01T12:00:01.250Z")));
        let offset = Timestamp::from_json(Some(&json!("2024-03-01T13:00:00+01:00")));
        let naive = Timestamp::from_json(Some(&json!("2024-03-01T12:00:00")));
        let date = Timestamp::from_json(Some(&json!("2024-03-01")));

        assert_eq!(rfc.millis_since(&offset), Some(1250));
        assert_eq!(naive.millis_since(&offset), Some(0));
        assert_eq!(naive.millis_since(&date), Some(12 * 60 * 60 * 1000));
    }

    #[test]
    fn space_separated_timestamps() {
        let spaced = Timestamp::from_json(Some(&json!("2024-03-01 12:00:00.750")));
        let whole = Timestamp::from_json(Some(&json!("2024-03-01 12:00:00")));
        let iso = Timestamp::from_json(Some(&json!("2024-03-01T12:00:00Z")));

        assert_eq!(spaced.millis_since(&iso), Some(750));
        assert_eq!(whole.millis_since(&iso), Some(0));
    }

    #[test]
    fn unusable_timestamps_are_invalid() {
        assert_eq!(Timestamp::from_json(None), Timestamp::Invalid);
        assert_eq!(Timestamp::from_json(Some(&json!("soon"))), Timestamp::Invalid);
        assert_eq!(Timestamp::from_json(Some(&json!(true))), Timestamp::Invalid);
        assert_eq!(Timestamp::from_json(Some(&json!({}))), Timestamp::Invalid);
    }

    #[test]
    fn decode_rejects_malformed_and_null() {
        assert!(matches!(
            FeedMessage::decode("{not json"),
            Err(FeedError::Decode(_))
        ));
        assert!(matches!(
            FeedMessage::decode("null"),
            Err(FeedError::NullMessage)
        ));
    }

    #[test]
    fn annotate_appends_deltatime_after_existing_fields() {
        let mut msg = FeedMessage::decode(r#"{"timestamp":1010,"v":"a"}"#).unwrap();
        msg.annotate_delta(&Timestamp::from_json(Some(&json!(1000))));
        assert_eq!(msg.to_text(), r#"{"timestamp":1010,"v":"a","deltatime":10}"#);
    }

    #[test]
    fn annotate_against_invalid_timestamp_is_null() {
        let mut msg = FeedMessage::decode(r#"{"v":1}"#).unwrap();
        msg.annotate_delta(&Timestamp::from_json(Some(&json!(1000))));
        assert_eq!(msg.deltatime(), Some(&Value::Null));
    }

    #[test]
    fn annotate_leaves_non_objects_alone() {
        let mut msg = FeedMessage::decode("[1,2,3]").unwrap();
        msg.annotate_delta(&Timestamp::Invalid);
        assert_eq!(msg.to_text(), "[1,2,3]");
        assert_eq!(msg.deltatime(), None);
    }
}
