use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod env;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Partition key of the feedback table and the only required record field.
pub const FEEDBACKS_ID: &str = "FEEDBACKS_ID";

/// A single feedback record.
///
/// Apart from the identifier the record is schema free, callers may submit
/// any JSON object and it is stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(rename = "FEEDBACKS_ID")]
    pub feedbacks_id: String,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Feedback {
    pub fn new(feedbacks_id: impl Into<String>) -> Self {
        Feedback {
            feedbacks_id: feedbacks_id.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feedback_keeps_unknown_attributes() {
        let feedback: Feedback =
            serde_json::from_value(json!({"FEEDBACKS_ID": "f1", "rating": 5, "tags": ["a"]}))
                .expect("Record should parse");

        assert_eq!("f1", feedback.feedbacks_id);
        assert_eq!(Some(&json!(5)), feedback.attributes.get("rating"));
        // The identifier isn't duplicated into the open attributes
        assert!(!feedback.attributes.contains_key(FEEDBACKS_ID));

        let value: Value = serde_json::to_value(&feedback).unwrap();
        assert_eq!(json!({"FEEDBACKS_ID": "f1", "rating": 5, "tags": ["a"]}), value);
    }

    #[test]
    fn feedback_requires_string_id() {
        assert!(serde_json::from_value::<Feedback>(json!({"rating": 5})).is_err());
        assert!(serde_json::from_value::<Feedback>(json!({"FEEDBACKS_ID": 7})).is_err());
        assert!(serde_json::from_value::<Feedback>(json!(["FEEDBACKS_ID"])).is_err());
    }
}
