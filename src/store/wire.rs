//! JSON shapes of the `user-locs` collection
//!
//! The collection stores diseases as a mapping keyed by position (`"1"`,
//! `"2"`, ...). That encoding stops here: everything above this module works
//! with an ordered `Vec<String>`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::types::{MarkerId, MarkerRecord, Position, NO_DISEASE};

/// `{ "data": ... }` wrapper used by every request and response
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Body of `GET /api/user-locs`
#[derive(Debug, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub data: Option<Vec<RemoteItem>>,
}

/// One entry of the collection as the store returns it
#[derive(Debug, Deserialize)]
pub struct RemoteItem {
    pub id: MarkerId,
    #[serde(default)]
    pub attributes: Option<Attributes>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attributes {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub diseases: Option<Value>,
}

/// Body of `POST /api/user-locs`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewMarker<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub diseases: PositionalDiseases<'a>,
}

/// Body of `PUT /api/user-locs/{id}`
#[derive(Debug, Serialize)]
pub struct DiseasesPatch<'a> {
    #[serde(rename = "Diseases")]
    pub diseases: PositionalDiseases<'a>,
}

/// Serializes a label list as `{ "1": first, "2": second, ... }`
#[derive(Debug, Clone, Copy)]
pub struct PositionalDiseases<'a>(pub &'a [String]);

impl Serialize for PositionalDiseases<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (index, label) in self.0.iter().enumerate() {
            map.serialize_entry(&(index + 1).to_string(), label)?;
        }
        map.end()
    }
}

impl RemoteItem {
    /// Converts the remote shape into a local record
    ///
    /// Entries missing a coordinate cannot be pinned and are skipped.
    pub fn into_record(self) -> Option<MarkerRecord> {
        let attributes = self.attributes.unwrap_or_default();
        let (latitude, longitude) = match (attributes.latitude, attributes.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                debug!("skipping user-loc {} without coordinates", self.id);
                return None;
            }
        };
        Some(MarkerRecord::new(
            self.id,
            Position::new(latitude, longitude),
            flatten_diseases(attributes.diseases.as_ref()),
        ))
    }
}

/// Flattens a remote disease field into an ordered label list
///
/// Mapping values come out in ascending numeric key order; keys that are not
/// numbers follow in lexicographic order. Array values are spliced in place.
/// An absent, null or empty field yields the single `"No Disease"` label.
pub fn flatten_diseases(field: Option<&Value>) -> Vec<String> {
    let mut labels = Vec::new();
    match field {
        Some(Value::Object(map)) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| key_order(a).cmp(&key_order(b)));
            for (_, value) in entries {
                push_labels(value, &mut labels);
            }
        }
        Some(other) => push_labels(other, &mut labels),
        None => {}
    }

    if labels.is_empty() {
        labels.push(NO_DISEASE.to_string());
    }
    labels
}

fn key_order(key: &str) -> (u8, u64, &str) {
    match key.parse::<u64>() {
        Ok(n) => (0, n, key),
        Err(_) => (1, 0, key),
    }
}

fn push_labels(value: &Value, labels: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::String(s) => labels.push(s.clone()),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Null => {}
                    Value::String(s) => labels.push(s.clone()),
                    other => labels.push(other.to_string()),
                }
            }
        }
        other => labels.push(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_in_key_order() {
        let field = json!({ "2": "cold", "1": "flu" });
        assert_eq!(flatten_diseases(Some(&field)), vec!["flu", "cold"]);
    }

    #[test]
    fn test_flatten_numeric_not_lexicographic() {
        let mut map = serde_json::Map::new();
        for n in 1..=11 {
            map.insert(n.to_string(), Value::String(format!("d{}", n)));
        }
        let labels = flatten_diseases(Some(&Value::Object(map)));
        assert_eq!(labels[8], "d9");
        assert_eq!(labels[9], "d10");
        assert_eq!(labels[10], "d11");
    }

    #[test]
    fn test_flatten_absent_or_empty() {
        assert_eq!(flatten_diseases(None), vec![NO_DISEASE]);
        assert_eq!(flatten_diseases(Some(&Value::Null)), vec![NO_DISEASE]);
        assert_eq!(flatten_diseases(Some(&json!({}))), vec![NO_DISEASE]);
    }

    #[test]
    fn test_flatten_nested_arrays() {
        let field = json!({ "1": ["flu", "cold"], "2": "measles" });
        assert_eq!(flatten_diseases(Some(&field)), vec!["flu", "cold", "measles"]);
    }

    #[test]
    fn test_positional_encoding() {
        let labels = vec!["flu".to_string(), "cold".to_string()];
        let body = serde_json::to_value(Envelope {
            data: DiseasesPatch {
                diseases: PositionalDiseases(&labels),
            },
        })
        .unwrap();
        assert_eq!(body, json!({ "data": { "Diseases": { "1": "flu", "2": "cold" } } }));
    }

    #[test]
    fn test_new_marker_body() {
        let labels = vec!["flu".to_string()];
        let body = serde_json::to_value(Envelope {
            data: NewMarker {
                latitude: 12.5,
                longitude: 77.25,
                diseases: PositionalDiseases(&labels),
            },
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "data": { "Latitude": 12.5, "Longitude": 77.25, "Diseases": { "1": "flu" } } })
        );
    }

    #[test]
    fn test_collection_into_records() {
        let payload = r#"
{
  "data": [
    { "id": 1, "attributes": { "Latitude": 12.97, "Longitude": 77.59, "Diseases": { "1": "dengue" } } },
    { "id": 2, "attributes": { "Latitude": 13.0, "Longitude": 77.6, "Diseases": null } },
    { "id": 3, "attributes": { "Diseases": { "1": "flu" } } }
  ],
  "meta": { "pagination": { "page": 1, "pageSize": 25, "pageCount": 1, "total": 3 } }
}
"#;
        let collection: Collection = serde_json::from_str(payload).unwrap();
        let records: Vec<MarkerRecord> = collection
            .data
            .unwrap()
            .into_iter()
            .filter_map(RemoteItem::into_record)
            .collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].diseases, vec!["dengue"]);
        assert_eq!(records[1].position, Position::new(13.0, 77.6));
        assert_eq!(records[1].diseases, vec![NO_DISEASE]);
    }

    #[test]
    fn test_collection_without_data() {
        let collection: Collection = serde_json::from_str(r#"{ "error": {} }"#).unwrap();
        assert!(collection.data.is_none());
    }
}
