//! Message types for the consumer.
//!
//! Defines the change records delivered by the upstream stream trigger, in the
//! stream-record JSON shape (`Records[].dynamodb.NewImage`).

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use book_enricher_shared::normalize_compact_date;

use crate::errors::IngestError;

/// Types of change events that can be received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEventType {
    /// A new upstream record was created.
    Insert,
    /// An existing upstream record was modified.
    Modify,
    /// An upstream record was removed.
    Remove,
    /// Any other event name, kept verbatim.
    Other(String),
}

impl From<&str> for ChangeEventType {
    fn from(name: &str) -> Self {
        match name {
            "INSERT" => Self::Insert,
            "MODIFY" => Self::Modify,
            "REMOVE" => Self::Remove,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A typed attribute value from a record image.
///
/// Only scalar kinds the enricher can read are decoded; any other kind
/// (maps, lists, sets) leaves every field `None`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AttributeValue {
    #[serde(rename = "S", default)]
    pub string: Option<String>,
    #[serde(rename = "N", default)]
    pub number: Option<String>,
    #[serde(rename = "BOOL", default)]
    pub boolean: Option<bool>,
    #[serde(rename = "NULL", default)]
    pub null: Option<bool>,
}

impl AttributeValue {
    /// Build a string attribute.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string: Some(value.into()),
            ..Default::default()
        }
    }
}

/// Snapshot payload of a change record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamRecord {
    /// Field values of the record after the change.
    #[serde(rename = "NewImage", default)]
    pub new_image: HashMap<String, AttributeValue>,
}

/// One change record received from the upstream trigger.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeEvent {
    /// Identifier assigned by the trigger, used only for logging.
    #[serde(rename = "eventID", default)]
    pub event_id: String,
    /// Raw event name (`INSERT`, `MODIFY`, `REMOVE`).
    #[serde(rename = "eventName", default)]
    pub event_name: String,
    #[serde(rename = "dynamodb", default)]
    pub change: StreamRecord,
}

impl ChangeEvent {
    /// Create an insert event whose new image holds a single string field.
    pub fn insert(event_id: impl Into<String>, field: &str, value: impl Into<String>) -> Self {
        let mut new_image = HashMap::new();
        new_image.insert(field.to_string(), AttributeValue::string(value));
        Self {
            event_id: event_id.into(),
            event_name: "INSERT".to_string(),
            change: StreamRecord { new_image },
        }
    }

    pub fn event_type(&self) -> ChangeEventType {
        ChangeEventType::from(self.event_name.as_str())
    }

    /// Derive the date used to look up identifiers for this event.
    ///
    /// The timestamp field holds a value such as `"#20240214 093000"`: the part
    /// before the first space, minus its leading marker character, is a compact
    /// `YYYYMMDD` date.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::EventError` if the field is missing, is not a string,
    /// or does not contain a valid compact date.
    pub fn lookup_date(&self, time_field: &str) -> Result<NaiveDate, IngestError> {
        let attribute = self.change.new_image.get(time_field).ok_or_else(|| {
            IngestError::event(format!("new image has no '{}' field", time_field))
        })?;
        let raw = attribute.string.as_deref().ok_or_else(|| {
            IngestError::event(format!("field '{}' is not a string attribute", time_field))
        })?;

        let date_token = raw.split(' ').next().unwrap_or_default();
        let mut chars = date_token.chars();
        if chars.next().is_none() {
            return Err(IngestError::event(format!(
                "field '{}' holds no timestamp",
                time_field
            )));
        }

        Ok(normalize_compact_date(chars.as_str())?)
    }
}

/// A batch of change records as delivered by one trigger invocation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeBatch {
    #[serde(rename = "Records", default)]
    pub records: Vec<ChangeEvent>,
}

impl ChangeBatch {
    pub fn new(records: Vec<ChangeEvent>) -> Self {
        Self { records }
    }

    /// Decode a batch from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        serde_json::from_str(json)
            .map_err(|e| IngestError::event(format!("invalid change batch: {}", e)))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_BATCH: &str = r##"{
        "Records": [
            {
                "eventID": "c4ca4238a0b923820dcc509a6f75849b",
                "eventName": "INSERT",
                "eventSource": "aws:dynamodb",
                "dynamodb": {
                    "Keys": { "id": { "S": "crawl-1" } },
                    "NewImage": {
                        "id": { "S": "crawl-1" },
                        "crawling_time": { "S": "#20240214 09:30:00" },
                        "count": { "N": "42" },
                        "tags": { "SS": ["a", "b"] }
                    },
                    "StreamViewType": "NEW_AND_OLD_IMAGES"
                }
            },
            {
                "eventID": "c81e728d9d4c2f636f067f89cc14862c",
                "eventName": "MODIFY",
                "dynamodb": { "NewImage": { "crawling_time": { "N": "20240214" } } }
            }
        ]
    }"##;

    #[test]
    fn test_decode_batch() {
        let batch = ChangeBatch::from_json(SAMPLE_BATCH).unwrap();
        assert_eq!(batch.len(), 2);

        let first = &batch.records[0];
        assert_eq!(first.event_type(), ChangeEventType::Insert);
        assert_eq!(
            first.change.new_image["count"].number.as_deref(),
            Some("42")
        );
        assert_eq!(first.change.new_image["tags"], AttributeValue::default());

        assert_eq!(batch.records[1].event_type(), ChangeEventType::Modify);
    }

    #[test]
    fn test_lookup_date_strips_marker_and_time() {
        let batch = ChangeBatch::from_json(SAMPLE_BATCH).unwrap();
        let date = batch.records[0].lookup_date("crawling_time").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
    }

    #[test]
    fn test_lookup_date_without_time_part() {
        let event = ChangeEvent::insert("1", "crawling_time", "#20231231");
        let date = event.lookup_date("crawling_time").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_lookup_date_rejects_numeric_attribute() {
        let batch = ChangeBatch::from_json(SAMPLE_BATCH).unwrap();
        let result = batch.records[1].lookup_date("crawling_time");
        assert!(matches!(result, Err(IngestError::EventError(_))));
    }

    #[test]
    fn test_lookup_date_missing_field() {
        let event = ChangeEvent::insert("1", "other_field", "#20240214");
        let result = event.lookup_date("crawling_time");
        assert!(matches!(result, Err(IngestError::EventError(_))));
    }

    #[test]
    fn test_lookup_date_malformed_value() {
        let event = ChangeEvent::insert("1", "crawling_time", "#2024021 09:30:00");
        assert!(matches!(
            event.lookup_date("crawling_time"),
            Err(IngestError::EventError(_))
        ));

        let event = ChangeEvent::insert("1", "crawling_time", "");
        assert!(matches!(
            event.lookup_date("crawling_time"),
            Err(IngestError::EventError(_))
        ));
    }

    #[test]
    fn test_unknown_event_name() {
        let mut event = ChangeEvent::insert("1", "crawling_time", "#20240214");
        event.event_name = "TTL_EXPIRE".to_string();
        assert_eq!(
            event.event_type(),
            ChangeEventType::Other("TTL_EXPIRE".to_string())
        );
    }
}
