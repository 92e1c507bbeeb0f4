pub mod batch;
pub mod client;
pub mod records;

pub use batch::{BatchItemResult, BatchOperation, BatchRequest, BatchSummary};
pub use client::{ClientStatus, Coach};
pub use records::{ChallengeParticipation, Message, PlanAssignment};
