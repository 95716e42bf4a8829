use serde::{Deserialize, Serialize};

/// Facility or supplier reference entry used to populate filter options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub id: String,
    pub name: String,
}

impl ReferenceEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
