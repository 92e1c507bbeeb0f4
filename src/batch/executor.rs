//! Sequential bulk-operation execution with per-target failure isolation.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use log::{error, info, warn};

use crate::flags::{AuthContext, FeatureFlags};
use crate::models::{
    BatchItemResult, BatchOperation, BatchRequest, BatchSummary, ChallengeParticipation, Coach,
    Message, PlanAssignment,
};
use crate::notify::{CacheInvalidator, CacheTag, NotificationKind, Notifier};
use crate::store::ClientStore;

fn affected_tags(operation: &BatchOperation) -> &'static [CacheTag] {
    match operation {
        BatchOperation::AssignPlan { .. } => &[CacheTag::Clients, CacheTag::Plans],
        BatchOperation::SendMessage { .. } => &[CacheTag::Messages],
        BatchOperation::UpdateStatus { .. } => &[CacheTag::Clients],
        BatchOperation::AddHabit { .. } => &[CacheTag::Clients],
        BatchOperation::AddChallenge { .. } => &[CacheTag::Challenges, CacheTag::Clients],
    }
}

/// Applies one operation across a set of target clients, one at a time,
/// recording a result per target and never letting one target's failure
/// abort the rest.
#[derive(Clone)]
pub struct BatchExecutor {
    store: Arc<dyn ClientStore>,
    auth: Arc<dyn AuthContext>,
    flags: Arc<dyn FeatureFlags>,
    notifier: Arc<dyn Notifier>,
    cache: Arc<dyn CacheInvalidator>,
}

impl BatchExecutor {
    pub fn new(
        store: Arc<dyn ClientStore>,
        auth: Arc<dyn AuthContext>,
        flags: Arc<dyn FeatureFlags>,
        notifier: Arc<dyn Notifier>,
        cache: Arc<dyn CacheInvalidator>,
    ) -> Self {
        Self {
            store,
            auth,
            flags,
            notifier,
            cache,
        }
    }

    /// Run one batch command.
    ///
    /// Preconditions (signed-in user, coach record, feature flag) fail the
    /// whole call with a single error before any target is touched. After
    /// that, every target gets a recorded result, results stay in input
    /// order, and duplicates are processed once per occurrence.
    pub async fn execute(&self, request: BatchRequest) -> Result<BatchSummary> {
        let user_id = self
            .auth
            .current_user_id()
            .ok_or_else(|| anyhow!("batch operations require a signed-in user"))?;
        let coach = self
            .store
            .find_coach(&user_id)
            .await
            .context("failed to resolve coach record")?
            .ok_or_else(|| anyhow!("no coach profile for user {user_id}"))?;

        let flag = request.operation.feature_flag();
        if !self.flags.is_enabled(flag) {
            bail!("{flag} is not enabled for this account");
        }

        info!(
            "Batch {} starting for {} targets",
            request.operation.kind(),
            request.target_ids.len()
        );

        let mut results = Vec::with_capacity(request.target_ids.len());
        for target_id in &request.target_ids {
            results.push(
                self.apply_to_target(&coach, &request.operation, target_id)
                    .await,
            );
        }

        let summary = BatchSummary::from_results(results);
        info!(
            "Batch {} finished: {} succeeded, {} failed",
            request.operation.kind(),
            summary.successful,
            summary.failed
        );

        self.report(&request.operation, &summary);
        Ok(summary)
    }

    async fn apply_to_target(
        &self,
        coach: &Coach,
        operation: &BatchOperation,
        target_id: &str,
    ) -> BatchItemResult {
        // Name lookup is best-effort on its own error path; a failed lookup
        // must not fail the target's mutation.
        let display_name = match self.store.client_display_name(&coach.id, target_id).await {
            Ok(Some(name)) => name,
            Ok(None) => "Unknown".to_string(),
            Err(err) => {
                warn!("Display name lookup failed for client {target_id}: {err:#}");
                "Unknown".to_string()
            }
        };

        match self.apply_operation(coach, operation, target_id).await {
            Ok(()) => BatchItemResult::ok(target_id.to_string(), display_name),
            Err(err) => {
                error!(
                    "Batch {} failed for client {target_id}: {err:#}",
                    operation.kind()
                );
                BatchItemResult::failed(
                    target_id.to_string(),
                    Some(display_name),
                    format!("{err:#}"),
                )
            }
        }
    }

    async fn apply_operation(
        &self,
        coach: &Coach,
        operation: &BatchOperation,
        target_id: &str,
    ) -> Result<()> {
        match operation {
            BatchOperation::UpdateStatus { status } => {
                self.store
                    .update_client_status(&coach.id, target_id, *status)
                    .await
            }
            BatchOperation::SendMessage { body } => {
                if body.trim().is_empty() {
                    bail!("message content is required");
                }
                let message = Message::new(&coach.id, target_id, body, Utc::now());
                self.store.insert_message(&message).await
            }
            BatchOperation::AssignPlan { plan_id } => {
                let assignment = PlanAssignment::new(&coach.id, target_id, plan_id, Utc::now());
                self.store.assign_plan(&assignment).await
            }
            BatchOperation::AddChallenge { challenge_id } => {
                if self
                    .store
                    .is_challenge_participant(challenge_id, target_id)
                    .await?
                {
                    bail!("already participating in this challenge");
                }
                let participation =
                    ChallengeParticipation::new(challenge_id, target_id, Utc::now());
                self.store.add_challenge_participant(&participation).await
            }
            BatchOperation::AddHabit { .. } => {
                bail!("bulk habit assignment is not implemented yet")
            }
        }
    }

    /// One toast and one invalidation per affected collection, regardless of
    /// how many targets were processed.
    fn report(&self, operation: &BatchOperation, summary: &BatchSummary) {
        if summary.failed == 0 {
            self.notifier.notify(
                NotificationKind::Success,
                &format!("Applied to {} clients", summary.successful),
            );
        } else if summary.successful == 0 {
            self.notifier.notify(
                NotificationKind::Error,
                &format!("Failed for {} clients", summary.failed),
            );
        } else {
            self.notifier.notify(
                NotificationKind::Partial,
                &format!(
                    "Applied to {} clients, {} failed",
                    summary.successful, summary.failed
                ),
            );
        }

        for tag in affected_tags(operation) {
            self.cache.invalidate(*tag);
        }
    }
}
