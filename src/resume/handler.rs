//! Registered units of resume work.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;
pub(crate) type HandlerFn = Arc<dyn Fn() -> HandlerFuture + Send + Sync>;

/// Execution tier relative to a resume event. Tiers always run in
/// declaration order: `Immediate`, then `Fast`, then `Background`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum ResumePriority {
    Immediate,
    Fast,
    Background,
}

/// Runtime the app is hosted in, fixed at coordinator construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Web,
    Native,
}

/// A named callback invoked once per accepted resume cycle.
///
/// Re-registering the same id replaces the prior handler. The callback is
/// fire-and-forget from the registrant's perspective; the coordinator awaits
/// it internally for sequencing and absorbs its errors.
#[derive(Clone)]
pub struct ResumeHandler {
    pub id: String,
    pub priority: ResumePriority,
    /// Override for when this handler runs relative to resume detection.
    pub delay: Option<Duration>,
    pub web_only: bool,
    pub native_only: bool,
    pub(crate) task: HandlerFn,
}

impl ResumeHandler {
    pub fn new<F, Fut>(id: impl Into<String>, priority: ResumePriority, task: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            id: id.into(),
            priority,
            delay: None,
            web_only: false,
            native_only: false,
            task: Arc::new(move || Box::pin(task()) as HandlerFuture),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn web_only(mut self) -> Self {
        self.web_only = true;
        self
    }

    pub fn native_only(mut self) -> Self {
        self.native_only = true;
        self
    }

    /// Platform gate. A handler carrying both flags is excluded everywhere.
    pub fn applies_to(&self, platform: Platform) -> bool {
        match platform {
            Platform::Web => !self.native_only,
            Platform::Native => !self.web_only,
        }
    }
}

impl fmt::Debug for ResumeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResumeHandler")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("delay", &self.delay)
            .field("web_only", &self.web_only)
            .field("native_only", &self.native_only)
            .finish_non_exhaustive()
    }
}
