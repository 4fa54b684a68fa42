//! Type-safe identifier wrapper around [`Uuid`].
//!
//! Companion ids use UUID v7 (time-ordered) so that persisted records sort by
//! creation time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for a companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CompanionId(pub Uuid);

impl CompanionId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for CompanionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for CompanionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CompanionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_not_nil_and_distinct() {
        let a = CompanionId::new();
        let b = CompanionId::new();
        assert_ne!(a.into_inner(), Uuid::nil());
        assert_ne!(a, b);
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = CompanionId::new();
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<CompanionId, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(original));
    }

    #[test]
    fn display_matches_uuid() {
        let id = CompanionId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
