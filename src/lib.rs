pub mod app;
pub mod git;
pub mod ui;
pub mod util;
