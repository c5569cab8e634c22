use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::modal::{Modal, UpstreamTrigger};
use crate::app::scheduler::Scheduler;
use crate::app::{Action, AppState};
use crate::git::DEFAULT_REMOTE;

/// Convert key events to actions.
pub fn handle_key_event(key: KeyEvent, state: &AppState) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if let Some(modal) = &state.modal {
        return handle_modal_key(key, modal);
    }

    if state.show_help {
        return match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => Some(Action::ToggleHelp),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::SelectNext),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::SelectPrevious),
        KeyCode::Home => Some(Action::SelectFirst),
        KeyCode::End => Some(Action::SelectLast),
        KeyCode::Char('f') => Some(Action::Fetch),
        KeyCode::Char('F') => Some(Action::FetchAll),
        KeyCode::Char('s') => Some(Action::Sync),
        KeyCode::Char('S') => Some(Action::SyncAll),
        KeyCode::Char('p') => Some(Action::Push),
        KeyCode::Char('P') => Some(Action::PushAll),
        KeyCode::Char('u') => Some(Action::SetUpstream),
        KeyCode::Char('r') => Some(Action::RefreshAll),
        KeyCode::Char('g') => Some(Action::ToggleGrouping),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('l') => Some(Action::ToggleLogs),
        _ => None,
    }
}

fn handle_modal_key(key: KeyEvent, modal: &Modal) -> Option<Action> {
    match modal {
        Modal::Discovering { .. } => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::ModalCancel),
            _ => None,
        },
        Modal::SelectingUpstream { .. } => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::ModalCancel),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ModalUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ModalDown),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ModalConfirm),
            _ => None,
        },
        Modal::AddingRemote { .. } => match key.code {
            KeyCode::Esc => Some(Action::ModalCancel),
            KeyCode::Enter => Some(Action::ModalConfirm),
            KeyCode::Backspace => Some(Action::ModalInputBackspace),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ModalInputChar(c))
            }
            _ => None,
        },
    }
}

/// Apply one action to the state. Returns true when the app should exit.
pub fn process_action(action: Action, state: &mut AppState, scheduler: &Scheduler) -> bool {
    if let Some(index) = action.completion_index() {
        if index >= state.store.len() {
            tracing::warn!("Dropping result for unknown repository #{}", index);
            return false;
        }
    }

    match action {
        Action::Quit => {
            state.running = false;
            return true;
        }

        Action::SelectNext => state.select_next(),
        Action::SelectPrevious => state.select_previous(),
        Action::SelectFirst => state.select_first(),
        Action::SelectLast => state.select_last(),

        Action::Fetch => {
            if let Some(index) = state.selected_index() {
                request_fetch(state, scheduler, index);
            }
        }
        Action::Sync => {
            if let Some(index) = state.selected_index() {
                request_sync(state, scheduler, index);
            }
        }
        Action::Push => {
            if let Some(index) = state.selected_index() {
                request_push(state, scheduler, index);
            }
        }
        Action::SetUpstream => {
            if let Some(index) = state.selected_index() {
                request_set_upstream(state, scheduler, index);
            }
        }

        Action::FetchAll => fetch_all(state, scheduler),
        Action::SyncAll => sync_all(state, scheduler),
        Action::PushAll => push_all_needing(state, scheduler),
        Action::RefreshAll => refresh_all(state, scheduler),

        Action::ToggleGrouping => {
            state.grouped = !state.grouped;
            state.log_debug(format!(
                "Grouping {}",
                if state.grouped { "on" } else { "off" }
            ));
        }
        Action::ToggleHelp => state.show_help = !state.show_help,
        Action::ToggleLogs => state.show_logs = !state.show_logs,

        Action::ModalUp => {
            if let Some(Modal::SelectingUpstream { cursor, .. }) = &mut state.modal {
                *cursor = cursor.saturating_sub(1);
            }
        }
        Action::ModalDown => {
            if let Some(Modal::SelectingUpstream {
                cursor, options, ..
            }) = &mut state.modal
            {
                if *cursor + 1 < options.len() {
                    *cursor += 1;
                }
            }
        }
        Action::ModalInputChar(c) => {
            if let Some(Modal::AddingRemote { input, .. }) = &mut state.modal {
                input.push(c);
            }
        }
        Action::ModalPaste(text) => {
            if let Some(Modal::AddingRemote { input, .. }) = &mut state.modal {
                input.extend(text.chars().filter(|c| !c.is_control()));
            }
        }
        Action::ModalInputBackspace => {
            if let Some(Modal::AddingRemote { input, .. }) = &mut state.modal {
                input.pop();
            }
        }
        Action::ModalCancel => {
            if let Some(modal) = state.modal.take() {
                tracing::debug!("Upstream setup cancelled for #{}", modal.index());
            }
        }
        Action::ModalConfirm => confirm_modal(state, scheduler),

        Action::StatusUpdated { index, status } => {
            state.store.replace(index, status);
        }

        Action::FetchComplete { index, error } => {
            let name = record_name(state, index);
            if let Some(record) = state.store.get_mut(index) {
                record.fetching = false;
                record.last_message = error.as_ref().map(|e| format!("fetch failed: {}", e));
            }
            match &error {
                Some(e) => state.log_error(format!("Fetch failed for {}: {}", name, e)),
                None => state.log_debug(format!("Fetched {}", name)),
            }
            finish_bulk(state, index);
            refresh(state, scheduler, index);
        }

        Action::SyncFetched { index } => {
            if let Some(record) = state.store.get_mut(index) {
                record.fetching = false;
                record.rebasing = true;
            }
        }

        Action::SyncComplete {
            index,
            fetched,
            error,
        } => {
            let name = record_name(state, index);
            let message = match (&error, fetched) {
                (None, _) => "synced".to_string(),
                (Some(e), false) => format!("fetch failed: {}", e),
                (Some(e), true) => format!("pull failed: {}", e),
            };
            if error.is_some() {
                state.log_error(format!("Sync of {}: {}", name, message));
            } else {
                state.log_info(format!("Synced {}", name));
            }
            if let Some(record) = state.store.get_mut(index) {
                record.fetching = false;
                record.rebasing = false;
                record.last_message = Some(message);
            }
            finish_bulk(state, index);
            refresh(state, scheduler, index);
        }

        Action::PushComplete { index, error } => {
            let name = record_name(state, index);
            let message = match &error {
                Some(e) => {
                    state.log_error(format!("Push of {} failed: {}", name, e));
                    format!("push failed: {}", e)
                }
                None => {
                    state.log_info(format!("Pushed {}", name));
                    "pushed".to_string()
                }
            };
            if let Some(record) = state.store.get_mut(index) {
                record.pushing = false;
                record.last_message = Some(message);
            }
            refresh(state, scheduler, index);
        }

        Action::RemotesLoaded {
            index,
            branch,
            remotes,
            branches,
            after_fetch,
        } => {
            if after_fetch {
                if let Some(record) = state.store.get_mut(index) {
                    record.fetching = false;
                }
            }

            let trigger = match &state.modal {
                Some(modal) if modal.is_discovering(index) => modal.trigger(),
                _ => {
                    tracing::debug!("Discovery for #{} arrived after the modal closed", index);
                    return false;
                }
            };
            tracing::debug!(
                "Discovered {} remotes, {} matching branches for #{}",
                remotes.len(),
                branches.len(),
                index
            );
            state.modal = Some(Modal::from_discovery(
                index, trigger, &branch, &remotes, &branches,
            ));
        }

        Action::RemoteAdded {
            index,
            trigger,
            error,
        } => {
            let name = record_name(state, index);
            if let Some(e) = error {
                state.log_error(format!("Adding remote to {} failed: {}", name, e));
                state.show_error(format!("Could not add remote to {}", name));
                if let Some(record) = state.store.get_mut(index) {
                    record.last_message = Some(format!("add remote failed: {}", e));
                }
                refresh(state, scheduler, index);
                return false;
            }

            state.log_info(format!("Added remote {} to {}", DEFAULT_REMOTE, name));
            if let Some(record) = state.store.get_mut(index) {
                record.last_message = Some("remote added".to_string());
            }
            if state.modal.is_some() {
                // Another upstream flow took over the modal meanwhile.
                refresh(state, scheduler, index);
                return false;
            }
            let Some(record) = state.store.get_mut(index) else {
                return false;
            };
            record.fetching = true;
            let snapshot = record.clone();
            state.modal = Some(Modal::Discovering { index, trigger });
            scheduler.fetch_then_discover(index, &snapshot);
        }

        Action::UpstreamSet {
            index,
            trigger,
            error,
        } => {
            let name = record_name(state, index);
            let succeeded = error.is_none();
            let message = match error {
                Some(e) => {
                    state.log_error(format!("Setting upstream for {} failed: {}", name, e));
                    format!("set upstream failed: {}", e)
                }
                None => {
                    state.log_info(format!("Upstream set for {}", name));
                    "upstream set".to_string()
                }
            };
            if let Some(record) = state.store.get_mut(index) {
                record.last_message = Some(message);
            }
            refresh(state, scheduler, index);
            if succeeded && trigger.resumes_after_setup() {
                launch_sync(state, scheduler, index);
            }
        }

        Action::Tick => {
            state.tick();
            if state.refresh_due() {
                tracing::debug!("Periodic refresh");
                refresh_all(state, scheduler);
            }
        }
    }

    false
}

fn record_name(state: &AppState, index: usize) -> String {
    state
        .store
        .get(index)
        .map(|r| r.name.clone())
        .unwrap_or_default()
}

fn refresh(state: &AppState, scheduler: &Scheduler, index: usize) {
    if let Some(record) = state.store.get(index) {
        scheduler.refresh(index, record);
    }
}

fn finish_bulk(state: &mut AppState, index: usize) {
    if state.finish_bulk(index) {
        state.log_info("Bulk operation finished");
        state.show_success("All repositories done");
    }
}

/// Structural errors block sync and push until a refresh clears them.
fn refuse_broken(state: &mut AppState, index: usize) -> bool {
    let Some(record) = state.store.get(index) else {
        return true;
    };
    let Some(error) = &record.error else {
        return false;
    };
    let message = format!("{}: {}", record.name, error);
    state.log_warn(format!("Refusing remote operation on {}", message));
    state.show_warning(message);
    true
}

/// Open the upstream flow for `index`, replacing nothing if a modal is up.
fn begin_upstream(
    state: &mut AppState,
    scheduler: &Scheduler,
    index: usize,
    trigger: UpstreamTrigger,
) {
    if state.modal.is_some() {
        return;
    }
    let Some(record) = state.store.get(index) else {
        return;
    };
    tracing::debug!("No upstream for {}, looking up remotes", record.name);
    scheduler.discover(index, record);
    state.modal = Some(Modal::Discovering { index, trigger });
}

fn request_fetch(state: &mut AppState, scheduler: &Scheduler, index: usize) {
    let Some(record) = state.store.get_mut(index) else {
        return;
    };
    if record.is_busy() {
        return;
    }
    if record.needs_upstream() {
        begin_upstream(state, scheduler, index, UpstreamTrigger::Fetch);
        return;
    }
    record.start_operation();
    record.fetching = true;
    scheduler.fetch(index, record);
}

fn request_sync(state: &mut AppState, scheduler: &Scheduler, index: usize) {
    if refuse_broken(state, index) {
        return;
    }
    let Some(record) = state.store.get_mut(index) else {
        return;
    };
    if record.is_busy() {
        return;
    }
    if record.needs_upstream() {
        begin_upstream(state, scheduler, index, UpstreamTrigger::Sync);
        return;
    }
    record.start_operation();
    launch_sync(state, scheduler, index);
}

/// Start fetch-then-pull. Does not touch `last_message`.
fn launch_sync(state: &mut AppState, scheduler: &Scheduler, index: usize) {
    let Some(record) = state.store.get_mut(index) else {
        return;
    };
    if record.is_busy() {
        return;
    }
    record.fetching = true;
    scheduler.sync(index, record);
}

fn request_push(state: &mut AppState, scheduler: &Scheduler, index: usize) {
    if refuse_broken(state, index) {
        return;
    }
    let Some(record) = state.store.get_mut(index) else {
        return;
    };
    if record.is_busy() {
        return;
    }
    if record.needs_upstream() {
        begin_upstream(state, scheduler, index, UpstreamTrigger::Push);
        return;
    }
    if !record.needs_push() {
        let name = record.name.clone();
        state.show_info(format!("{} has nothing to push", name));
        return;
    }
    record.start_operation();
    record.pushing = true;
    scheduler.push(index, record);
}

fn request_set_upstream(state: &mut AppState, scheduler: &Scheduler, index: usize) {
    let Some(record) = state.store.get(index) else {
        return;
    };
    if record.is_busy() {
        return;
    }
    if record.needs_upstream() {
        begin_upstream(state, scheduler, index, UpstreamTrigger::SetUpstream);
    } else if record.has_upstream {
        let message = format!("{} already tracks {}", record.name, record.upstream);
        state.show_info(message);
    }
}

fn fetch_all(state: &mut AppState, scheduler: &Scheduler) {
    if state.bulk_running() {
        return;
    }
    // Broken records are fetched too; the follow-up refresh may clear them.
    let targets: Vec<usize> = state
        .store
        .iter()
        .filter(|(_, r)| !r.needs_upstream() && !r.is_busy())
        .map(|(i, _)| i)
        .collect();
    if targets.is_empty() {
        state.show_info("Nothing to fetch");
        return;
    }

    state.log_info(format!("Fetching {} repositories", targets.len()));
    for &index in &targets {
        if let Some(record) = state.store.get_mut(index) {
            record.start_operation();
            record.fetching = true;
            scheduler.fetch(index, record);
        }
    }
    state.bulk_pending.extend(targets);
}

fn sync_all(state: &mut AppState, scheduler: &Scheduler) {
    if state.bulk_running() {
        return;
    }
    let targets: Vec<usize> = state
        .store
        .iter()
        .filter(|(_, r)| r.is_trackable() && !r.is_busy())
        .map(|(i, _)| i)
        .collect();
    if targets.is_empty() {
        state.show_info("Nothing to sync");
        return;
    }

    state.log_info(format!("Syncing {} repositories", targets.len()));
    for &index in &targets {
        if let Some(record) = state.store.get_mut(index) {
            record.start_operation();
        }
        launch_sync(state, scheduler, index);
    }
    state.bulk_pending.extend(targets);
}

fn push_all_needing(state: &mut AppState, scheduler: &Scheduler) {
    let targets: Vec<usize> = state
        .store
        .iter()
        .filter(|(_, r)| r.needs_push() && !r.is_busy())
        .map(|(i, _)| i)
        .collect();
    if targets.is_empty() {
        state.show_info("Nothing to push");
        return;
    }

    state.log_info(format!("Pushing {} repositories", targets.len()));
    for index in targets {
        if let Some(record) = state.store.get_mut(index) {
            record.start_operation();
            record.pushing = true;
            scheduler.push(index, record);
        }
    }
}

pub fn refresh_all(state: &mut AppState, scheduler: &Scheduler) {
    for (index, record) in state.store.iter() {
        scheduler.refresh(index, record);
    }
    state.last_refresh = std::time::Instant::now();
}

fn confirm_modal(state: &mut AppState, scheduler: &Scheduler) {
    let Some(modal) = state.modal.take() else {
        return;
    };

    match modal {
        Modal::SelectingUpstream {
            index,
            ref options,
            cursor,
            trigger,
            ..
        } => {
            let Some(option) = options.get(cursor).cloned() else {
                state.modal = Some(modal);
                return;
            };
            let Some(record) = state.store.get_mut(index) else {
                return;
            };
            record.start_operation();
            if option.exists {
                scheduler.set_upstream(index, record, &option.remote, &option.branch, trigger);
            } else {
                record.pushing = true;
                scheduler.push_with_upstream(index, record, &option.remote, &option.branch);
            }
        }
        Modal::AddingRemote {
            index,
            ref input,
            trigger,
        } => {
            let url = input.trim().to_string();
            if url.is_empty() {
                state.modal = Some(modal);
                return;
            }
            if let Some(record) = state.store.get(index) {
                scheduler.add_remote(index, record, DEFAULT_REMOTE, &url, trigger);
            }
        }
        Modal::Discovering { .. } => state.modal = Some(modal),
    }
}
