//! Toast and cache-invalidation sinks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    Success,
    Error,
    Partial,
}

/// Query-cache collections a batch operation can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Clients,
    Messages,
    Challenges,
    Plans,
}

impl CacheTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheTag::Clients => "clients",
            CacheTag::Messages => "messages",
            CacheTag::Challenges => "challenges",
            CacheTag::Plans => "plans",
        }
    }
}

/// Fire-and-forget user notification, called once per batch execution.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

/// Fire-and-forget invalidation, called once per affected tag per execution.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, tag: CacheTag);
}
