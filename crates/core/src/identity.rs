use serde::{Deserialize, Serialize};

/// A signed-in user, as reported by the authentication collaborator.
///
/// Only presence matters to the core: `Option<Identity>` selects between
/// local and remote history persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into(), display_name: None }
    }
}
