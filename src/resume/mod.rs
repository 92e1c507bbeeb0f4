pub mod coordinator;
pub mod handler;
pub mod settings;
pub mod signals;
mod state;

pub use coordinator::ResumeCoordinator;
pub use handler::{Platform, ResumeHandler, ResumePriority};
pub use settings::ResumeSettings;
pub use signals::{spawn_signal_listener, ResumeSignal};
