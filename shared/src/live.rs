//! Live update events pushed over the `/ws` relay

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveAction {
    Created,
    Updated,
    Deleted,
}

impl LiveAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LiveAction::Created => "created",
            LiveAction::Updated => "updated",
            LiveAction::Deleted => "deleted",
        }
    }
}

/// A single change to a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveEvent {
    /// Resource kind, e.g. `client`, `job`, `national_figure`
    pub resource: String,
    pub action: LiveAction,
    pub id: i64,
    /// Current record (absent for deletions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub timestamp: i64,
}

impl LiveEvent {
    pub fn new(
        resource: impl Into<String>,
        action: LiveAction,
        id: i64,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            resource: resource.into(),
            action,
            id,
            data,
            timestamp: crate::util::now_millis(),
        }
    }

    /// Resources visible to anonymous subscribers (the mobile app)
    pub fn is_public(&self) -> bool {
        matches!(self.resource.as_str(), "national_figure" | "job")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_resources() {
        assert!(LiveEvent::new("national_figure", LiveAction::Created, 1, None).is_public());
        assert!(LiveEvent::new("job", LiveAction::Deleted, 2, None).is_public());
        assert!(!LiveEvent::new("applicant", LiveAction::Created, 3, None).is_public());
    }

    #[test]
    fn test_serialize_skips_missing_data() {
        let event = LiveEvent::new("client", LiveAction::Deleted, 7, None);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "deleted");
        assert_eq!(json["id"], 7);
        assert!(json.get("data").is_none());
    }
}
