pub mod help_overlay;
pub mod modal;
pub mod repo_list;
pub mod status_bar;
pub mod toast;

pub use help_overlay::HelpOverlay;
pub use modal::render_upstream_modal;
pub use repo_list::{status_label, RepoListWidget, StatusKind};
pub use status_bar::StatusBarWidget;
pub use toast::ToastWidget;
