use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::app::config::Config;
use crate::app::modal::Modal;
use crate::app::order::compute_order;
use crate::app::store::StatusStore;
use crate::git::RepoStatus;

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
    pub duration_secs: u64,
}

impl Toast {
    pub fn new(message: String, level: ToastLevel) -> Self {
        let duration_secs = match level {
            ToastLevel::Success => 3,
            ToastLevel::Info => 3,
            ToastLevel::Warning => 4,
            ToastLevel::Error => 5,
        };
        Self {
            message,
            level,
            created_at: Instant::now(),
            duration_secs,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= self.duration_secs
    }
}

pub struct AppState {
    pub config: Config,
    pub store: StatusStore,

    /// Display position, not a store index.
    pub cursor: usize,
    pub grouped: bool,
    pub modal: Option<Modal>,

    /// Indices launched by the running fetch-all / sync-all.
    pub bulk_pending: HashSet<usize>,

    pub running: bool,
    pub show_help: bool,
    pub show_logs: bool,
    pub logs: Vec<LogEntry>,
    pub toast: Option<Toast>,
    pub animation_frame: usize,
    pub last_refresh: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = StatusStore::new(&config.repo_configs());
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: StatusStore) -> Self {
        Self {
            grouped: config.grouped,
            config,
            store,
            cursor: 0,
            modal: None,
            bulk_pending: HashSet::new(),
            running: true,
            show_help: false,
            show_logs: false,
            logs: Vec::new(),
            toast: None,
            animation_frame: 0,
            last_refresh: Instant::now(),
        }
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        };
        self.logs.push(entry);
        if self.logs.len() > MAX_LOG_ENTRIES {
            self.logs.remove(0);
        }
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn log_warn(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn log_debug(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn show_error(&mut self, msg: impl Into<String>) {
        self.toast = Some(Toast::new(msg.into(), ToastLevel::Error));
    }

    pub fn show_success(&mut self, msg: impl Into<String>) {
        self.toast = Some(Toast::new(msg.into(), ToastLevel::Success));
    }

    pub fn show_info(&mut self, msg: impl Into<String>) {
        self.toast = Some(Toast::new(msg.into(), ToastLevel::Info));
    }

    pub fn show_warning(&mut self, msg: impl Into<String>) {
        self.toast = Some(Toast::new(msg.into(), ToastLevel::Warning));
    }

    pub fn display_order(&self) -> Vec<usize> {
        compute_order(self.store.records(), self.grouped)
    }

    /// Rows in display order, paired with their store index.
    pub fn ordered_records(&self) -> Vec<(usize, &RepoStatus)> {
        self.display_order()
            .into_iter()
            .filter_map(|i| self.store.get(i).map(|r| (i, r)))
            .collect()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.display_order().get(self.cursor).copied()
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.store.len() {
            self.cursor += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.cursor = self.store.len().saturating_sub(1);
    }

    pub fn bulk_running(&self) -> bool {
        !self.bulk_pending.is_empty()
    }

    /// Record that a fan-out task finished; true when it was the last one.
    pub fn finish_bulk(&mut self, index: usize) -> bool {
        self.bulk_pending.remove(&index) && self.bulk_pending.is_empty()
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        match self.config.refresh_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn refresh_due(&self) -> bool {
        self.refresh_interval()
            .is_some_and(|interval| self.last_refresh.elapsed() >= interval)
    }

    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::StatusError;

    fn state_with(records: Vec<RepoStatus>) -> AppState {
        AppState::with_store(Config::default(), StatusStore::from_records(records))
    }

    fn named(name: &str) -> RepoStatus {
        RepoStatus {
            has_upstream: true,
            ..RepoStatus::new(format!("/srv/{}", name), name)
        }
    }

    #[test]
    fn test_log_ring_is_capped() {
        let mut state = state_with(Vec::new());
        for i in 0..150 {
            state.log_info(format!("entry {}", i));
        }
        assert_eq!(state.logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(state.logs[0].message, "entry 50");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut state = state_with(vec![named("a"), named("b")]);
        state.select_previous();
        assert_eq!(state.cursor, 0);
        state.select_next();
        state.select_next();
        assert_eq!(state.cursor, 1);
        state.select_first();
        assert_eq!(state.cursor, 0);
        state.select_last();
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_empty_store_has_no_selection() {
        let mut state = state_with(Vec::new());
        state.select_next();
        state.select_last();
        assert_eq!(state.cursor, 0);
        assert!(state.selected_index().is_none());
    }

    #[test]
    fn test_selection_follows_display_order() {
        let broken = RepoStatus {
            error: Some(StatusError::PathMissing),
            ..named("zeta")
        };
        let mut state = state_with(vec![named("alpha"), broken]);
        assert_eq!(state.selected_index(), Some(1));
        state.grouped = false;
        assert_eq!(state.selected_index(), Some(0));
    }

    #[test]
    fn test_bulk_clears_on_last() {
        let mut state = state_with(vec![named("a"), named("b")]);
        state.bulk_pending.extend([0, 1]);
        assert!(!state.finish_bulk(1));
        assert!(state.bulk_running());
        assert!(!state.finish_bulk(1));
        assert!(state.finish_bulk(0));
        assert!(!state.bulk_running());
    }

    #[test]
    fn test_refresh_disabled() {
        let config = Config {
            refresh_secs: 0,
            ..Default::default()
        };
        let state = AppState::with_store(config, StatusStore::default());
        assert!(state.refresh_interval().is_none());
        assert!(!state.refresh_due());
    }

    #[test]
    fn test_toast_expiry() {
        let mut toast = Toast::new("done".into(), ToastLevel::Success);
        assert!(!toast.is_expired());
        toast.created_at -= Duration::from_secs(10);
        assert!(toast.is_expired());
    }
}
