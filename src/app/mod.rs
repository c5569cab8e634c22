pub mod action;
pub mod config;
pub mod modal;
pub mod order;
pub mod router;
pub mod scheduler;
pub mod state;
pub mod store;

pub use action::Action;
pub use config::{Config, RepoConfig};
pub use modal::{Modal, UpstreamOption, UpstreamTrigger};
pub use order::compute_order;
pub use router::{handle_key_event, process_action, refresh_all};
pub use scheduler::Scheduler;
pub use state::{AppState, LogEntry, LogLevel, Toast, ToastLevel};
pub use store::StatusStore;
