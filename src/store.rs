//! Persistence contract consumed by the batch executor.
//!
//! The backing store (managed database, HTTP API) lives outside this crate;
//! the executor only needs scoped row-level operations keyed by coach and
//! client id.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ChallengeParticipation, ClientStatus, Coach, Message, PlanAssignment};

#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Resolve the coach record for a signed-in user, if one exists.
    async fn find_coach(&self, user_id: &str) -> Result<Option<Coach>>;

    /// Human-readable name for a client of this coach. `Ok(None)` means the
    /// client row exists without a usable name (or not at all); callers treat
    /// both `Err` and `None` as "Unknown".
    async fn client_display_name(&self, coach_id: &str, client_id: &str)
        -> Result<Option<String>>;

    async fn update_client_status(
        &self,
        coach_id: &str,
        client_id: &str,
        status: ClientStatus,
    ) -> Result<()>;

    async fn insert_message(&self, message: &Message) -> Result<()>;

    async fn assign_plan(&self, assignment: &PlanAssignment) -> Result<()>;

    /// Existence check backing the check-then-insert enrollment flow.
    async fn is_challenge_participant(&self, challenge_id: &str, client_id: &str) -> Result<bool>;

    async fn add_challenge_participant(
        &self,
        participation: &ChallengeParticipation,
    ) -> Result<()>;
}
