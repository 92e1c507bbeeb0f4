//! Batch operation payloads and result aggregation.

use serde::{Deserialize, Serialize};

use super::client::ClientStatus;

/// One bulk command, applied independently to every target client.
///
/// The variant carries exactly the data its mutation needs, so required-field
/// checks are exhaustive matches rather than optional-field probing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum BatchOperation {
    AssignPlan { plan_id: String },
    SendMessage { body: String },
    UpdateStatus { status: ClientStatus },
    AddHabit { habit_id: String },
    AddChallenge { challenge_id: String },
}

impl BatchOperation {
    pub fn kind(&self) -> &'static str {
        match self {
            BatchOperation::AssignPlan { .. } => "assign_plan",
            BatchOperation::SendMessage { .. } => "send_message",
            BatchOperation::UpdateStatus { .. } => "update_status",
            BatchOperation::AddHabit { .. } => "add_habit",
            BatchOperation::AddChallenge { .. } => "add_challenge",
        }
    }

    /// Flag gating this operation category.
    pub fn feature_flag(&self) -> &'static str {
        match self {
            BatchOperation::AssignPlan { .. } => "batch_assign_plan",
            BatchOperation::SendMessage { .. } => "batch_send_message",
            BatchOperation::UpdateStatus { .. } => "batch_update_status",
            BatchOperation::AddHabit { .. } => "batch_add_habit",
            BatchOperation::AddChallenge { .. } => "batch_add_challenge",
        }
    }
}

/// One user-issued batch command. Target order is processing order; duplicate
/// ids are processed once per occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub operation: BatchOperation,
    pub target_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    pub target_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItemResult {
    pub fn ok(target_id: String, display_name: String) -> Self {
        Self {
            target_id,
            success: true,
            display_name: Some(display_name),
            error: None,
        }
    }

    pub fn failed(target_id: String, display_name: Option<String>, error: String) -> Self {
        Self {
            target_id,
            success: false,
            display_name,
            error: Some(error),
        }
    }
}

/// Aggregate outcome of one `execute` call.
///
/// `successful + failed == total` holds for every produced summary, including
/// the empty one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResult>,
}

impl BatchSummary {
    pub fn from_results(results: Vec<BatchItemResult>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            results,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.successful > 0 && self.failed > 0
    }
}
