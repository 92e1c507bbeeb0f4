//! Coordination core for the FitConnect coaching app.
//!
//! Two cooperating mechanisms: the resume coordinator runs registered
//! refresh handlers in priority tiers when the app regains foreground focus,
//! and the batch executor applies one coach-issued operation across many
//! clients with per-target failure isolation. Persistence, notifications,
//! feature flags and auth are consumed through the traits in [`store`],
//! [`notify`] and [`flags`].

pub mod batch;
pub mod flags;
pub mod models;
pub mod notify;
pub mod resume;
pub mod settings;
pub mod store;

pub use batch::BatchExecutor;
pub use flags::{AuthContext, FeatureFlags};
pub use models::{
    BatchItemResult, BatchOperation, BatchRequest, BatchSummary, ClientStatus, Coach,
};
pub use notify::{CacheInvalidator, CacheTag, NotificationKind, Notifier};
pub use resume::{
    spawn_signal_listener, Platform, ResumeCoordinator, ResumeHandler, ResumePriority,
    ResumeSettings, ResumeSignal,
};
pub use settings::SettingsStore;
pub use store::ClientStore;
