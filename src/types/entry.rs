use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A marketplace listing item (node or plugin).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response shape of every list/search operation: `{ "items": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub items: Vec<Entry>,
}

impl Listing {
    /// Read a listing out of a raw response body.
    ///
    /// A body without an `items` array (including error bodies) yields an
    /// empty listing. Items that are present must be well-formed entries.
    pub fn from_body(body: &Value) -> Result<Self> {
        match body.get("items") {
            Some(items @ Value::Array(_)) => Ok(Self {
                items: Vec::<Entry>::deserialize(items)?,
            }),
            _ => Ok(Self::default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl IntoIterator for Listing {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_fields() {
        let body = json!({"items": [
            {"id": "1", "name": "Blur"},
            {"id": "2", "name": "Sort", "author": "ada", "tags": ["list"], "description": "Sorts"}
        ]});
        let listing = Listing::from_body(&body).unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.items[0].author, None);
        assert_eq!(listing.items[1].tags.as_deref(), Some(&["list".to_string()][..]));
    }

    #[test]
    fn test_missing_items_is_empty() {
        assert!(Listing::from_body(&json!({"error": "boom"})).unwrap().is_empty());
        assert!(Listing::from_body(&json!({"items": "nope"})).unwrap().is_empty());
        assert!(Listing::from_body(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_item_is_an_error() {
        let body = json!({"items": [{"name": "no id"}]});
        assert!(matches!(
            Listing::from_body(&body),
            Err(crate::Error::Serialization(_))
        ));
    }
}
