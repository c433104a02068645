//! Book models
//!
//! Description and cover image are held as `Option<String>`, where `None` is the
//! placeholder ("no real data yet"). The sentinel strings below only exist at
//! the boundaries: the `books` table columns and the JSON representation.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stored/serialized value of a description placeholder
pub const DESCRIPTION_NOT_AVAILABLE: &str = "Description not available";

/// Stored/serialized value of a cover image placeholder
pub const COVER_NOT_AVAILABLE: &str = "Cover image not available";

/// Author used when a search candidate carries no author names
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Case-folded form of a title or author used for natural-key matching
pub fn fold_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Convert a boundary value into the placeholder-aware form
///
/// Absent, blank and sentinel values all map to `None`.
pub fn from_stored(value: Option<String>, sentinel: &str) -> Option<String> {
    value.filter(|v| {
        let trimmed = v.trim();
        !trimmed.is_empty() && trimmed != sentinel
    })
}

/// Convert a placeholder-aware value into its boundary form
pub fn to_stored<'a>(value: Option<&'a str>, sentinel: &'a str) -> &'a str {
    value.unwrap_or(sentinel)
}

/// A (title, author) pair the catalog is configured to track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSeed {
    pub title: String,
    pub author: String,
}

impl BookSeed {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }
}

/// Persisted book row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Store-assigned identifier
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publication_year: Option<i32>,
    /// `None` when no real description is known
    #[serde(default, with = "description_text")]
    pub description: Option<String>,
    /// `None` when no real cover image is known
    #[serde(default, with = "cover_text")]
    pub cover_image: Option<String>,
}

impl BookRecord {
    /// True when neither description nor cover is a placeholder
    pub fn is_fully_enriched(&self) -> bool {
        self.description.is_some() && self.cover_image.is_some()
    }

    /// Case-insensitive natural-key comparison
    pub fn matches(&self, title: &str, author: &str) -> bool {
        fold_key(&self.title) == fold_key(title) && fold_key(&self.author) == fold_key(author)
    }
}

/// Book fields without a store identifier
///
/// Produced by the metadata fetcher and accepted by create/update/upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default, with = "description_text")]
    pub description: Option<String>,
    #[serde(default, with = "cover_text")]
    pub cover_image: Option<String>,
}

impl BookDraft {
    /// Draft with every enrichable field still a placeholder
    pub fn placeholder(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publication_year: None,
            description: None,
            cover_image: None,
        }
    }

    /// Reject drafts without a natural key
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.author.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Title and author are required".to_string(),
            ));
        }
        Ok(())
    }
}

fn serialize_placeholder<S: Serializer>(
    value: &Option<String>,
    sentinel: &str,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(to_stored(value.as_deref(), sentinel))
}

fn deserialize_placeholder<'de, D: Deserializer<'de>>(
    deserializer: D,
    sentinel: &str,
) -> std::result::Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(from_stored(raw, sentinel))
}

mod description_text {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serialize_placeholder(value, DESCRIPTION_NOT_AVAILABLE, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<String>, D::Error> {
        deserialize_placeholder(deserializer, DESCRIPTION_NOT_AVAILABLE)
    }
}

mod cover_text {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serialize_placeholder(value, COVER_NOT_AVAILABLE, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<String>, D::Error> {
        deserialize_placeholder(deserializer, COVER_NOT_AVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_serialize_as_sentinels() {
        let record = BookRecord {
            id: 7,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            publication_year: None,
            description: None,
            cover_image: Some("https://example.com/dune.jpg".to_string()),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["description"], DESCRIPTION_NOT_AVAILABLE);
        assert_eq!(json["cover_image"], "https://example.com/dune.jpg");
        assert!(json["publication_year"].is_null());
    }

    #[test]
    fn test_sentinel_input_deserializes_as_placeholder() {
        let draft: BookDraft = serde_json::from_str(
            r#"{"title":"Dune","author":"Frank Herbert","description":"Description not available"}"#,
        )
        .unwrap();

        assert_eq!(draft.description, None);
        assert_eq!(draft.cover_image, None);
    }

    #[test]
    fn test_validate_requires_title_and_author() {
        let draft: BookDraft = serde_json::from_str(r#"{"author":"Author Without Title"}"#).unwrap();
        let err = draft.validate().unwrap_err();
        assert!(err.to_string().contains("Title and author are required"));

        assert!(BookDraft::placeholder("Dune", "Frank Herbert").validate().is_ok());
    }

    #[test]
    fn test_record_matches_case_insensitively() {
        let record = BookRecord {
            id: 1,
            title: "The Little Prince".to_string(),
            author: "Antoine de Saint-Exupéry".to_string(),
            publication_year: Some(1943),
            description: None,
            cover_image: None,
        };

        assert!(record.matches("the little prince ", "ANTOINE DE SAINT-EXUPÉRY"));
        assert!(!record.matches("The Little Prince", "Someone Else"));
        assert!(!record.is_fully_enriched());
    }
}
