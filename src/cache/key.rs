//! Key Codec Module
//!
//! Turns an ordered list of key parts into the single string the store is
//! indexed by, and back.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

// == Key Encoding ==
/// Composite key encoding used by a cache instance.
///
/// `Structured` is injective over part lists: `[]`, `[""]` and parts that
/// contain any character (quotes, separators, control characters) all encode
/// to distinct keys and decode back unchanged.
///
/// `Delimited` joins parts with a caller supplied separator. It is kept for
/// compatibility with flat string keys and is lossy: a part containing the
/// separator splits on decode, and `[]` collides with `[""]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEncoding {
    /// JSON array of strings
    #[default]
    Structured,
    /// Parts joined by the given separator
    Delimited(String),
}

impl KeyEncoding {
    // == Encode ==
    /// Encodes key parts into a store key.
    pub fn encode<S: AsRef<str>>(&self, parts: &[S]) -> String {
        match self {
            KeyEncoding::Structured => Value::Array(
                parts
                    .iter()
                    .map(|part| Value::String(part.as_ref().to_owned()))
                    .collect(),
            )
            .to_string(),
            KeyEncoding::Delimited(separator) => parts
                .iter()
                .map(|part| part.as_ref())
                .collect::<Vec<&str>>()
                .join(separator.as_str()),
        }
    }

    // == Decode ==
    /// Decodes a store key back into its parts.
    ///
    /// A structured key that is not a JSON string array decodes to a single
    /// part holding the raw key.
    pub fn decode(&self, key: &str) -> Vec<String> {
        match self {
            KeyEncoding::Structured => {
                serde_json::from_str::<Vec<String>>(key).unwrap_or_else(|err| {
                    debug!(key, %err, "stored key is not a structured key");
                    vec![key.to_owned()]
                })
            }
            KeyEncoding::Delimited(separator) if separator.is_empty() => {
                key.chars().map(String::from).collect()
            }
            KeyEncoding::Delimited(separator) => {
                key.split(separator.as_str()).map(str::to_owned).collect()
            }
        }
    }
}
