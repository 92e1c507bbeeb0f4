//! Rows written by batch mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub coach_id: String,
    pub client_id: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(coach_id: &str, client_id: &str, body: &str, sent_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            coach_id: coach_id.to_string(),
            client_id: client_id.to_string(),
            body: body.to_string(),
            sent_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAssignment {
    pub id: String,
    pub coach_id: String,
    pub client_id: String,
    pub plan_id: String,
    pub assigned_at: DateTime<Utc>,
}

impl PlanAssignment {
    pub fn new(coach_id: &str, client_id: &str, plan_id: &str, assigned_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            coach_id: coach_id.to_string(),
            client_id: client_id.to_string(),
            plan_id: plan_id.to_string(),
            assigned_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeParticipation {
    pub id: String,
    pub challenge_id: String,
    pub client_id: String,
    pub joined_at: DateTime<Utc>,
}

impl ChallengeParticipation {
    pub fn new(challenge_id: &str, client_id: &str, joined_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            challenge_id: challenge_id.to_string(),
            client_id: client_id.to_string(),
            joined_at,
        }
    }
}
