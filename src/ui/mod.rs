pub mod app;
pub mod components;
pub mod helpers;
pub mod theme;

pub use app::AppWidget;
pub use helpers::{centered_fixed, centered_rect, spinner};
pub use theme::Theme;
