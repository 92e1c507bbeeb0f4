//! Coach and client data models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ClientStatus {
    Active,
    Paused,
    Archived,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "Active",
            ClientStatus::Paused => "Paused",
            ClientStatus::Archived => "Archived",
        }
    }
}

/// The operator issuing batch commands, resolved from the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coach {
    pub id: String,
    pub user_id: String,
    pub display_name: String,
}
