use serde::{Deserialize, Serialize};

/// Category identifier as stored in `categories.id`.
pub type CategoryId = i64;

/// Read-only trivia category (e.g. `4 -> "History"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Display label. Serialized as `type` to match the client contract.
    #[serde(rename = "type")]
    pub label: String,
}

impl Category {
    pub fn new(id: CategoryId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}
