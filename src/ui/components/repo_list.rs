use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::AppState;
use crate::git::RepoStatus;
use crate::ui::helpers::{pad, spinner};
use crate::ui::theme::Theme;
use crate::util::{short_age, truncate_with_ellipsis};

const STATUS_WIDTH: usize = 14;
const MAX_BRANCH_WIDTH: usize = 14;
const AGE_WIDTH: usize = 4;

/// Which palette role a status cell is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Error,
    Busy,
    NoUpstream,
    Synced,
    Diverged,
}

/// The status column for one repository.
pub fn status_label(status: &RepoStatus, spin: &str) -> (String, StatusKind) {
    if let Some(error) = &status.error {
        let text = format!("✗ {}", error);
        return (truncate_with_ellipsis(&text, STATUS_WIDTH), StatusKind::Error);
    }
    if status.fetching {
        return (format!("{} fetch…", spin), StatusKind::Busy);
    }
    if status.rebasing {
        return (format!("{} rebase…", spin), StatusKind::Busy);
    }
    if status.pushing {
        return (format!("{} push…", spin), StatusKind::Busy);
    }
    if !status.has_upstream {
        return ("○ no upstream".to_string(), StatusKind::NoUpstream);
    }
    if status.is_synced() {
        return ("✓ synced".to_string(), StatusKind::Synced);
    }

    let mut parts = Vec::new();
    if status.ahead() > 0 {
        parts.push(format!("↑{}", status.ahead()));
    }
    if status.behind() > 0 {
        parts.push(format!("↓{}", status.behind()));
    }
    (parts.join(" "), StatusKind::Diverged)
}

pub struct RepoListWidget<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> RepoListWidget<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let t = self.theme;
        let rows = self.state.ordered_records();

        if rows.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No repositories configured",
                Style::default().fg(t.help_text),
            )));
            frame.render_widget(empty, area);
            return;
        }

        let name_width = rows
            .iter()
            .map(|(_, r)| r.name.chars().count())
            .max()
            .unwrap_or(0);
        let branch_width = rows
            .iter()
            .map(|(_, r)| r.branch.chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_BRANCH_WIDTH);

        let visible = area.height as usize;
        let offset = if visible == 0 {
            0
        } else {
            self.state.cursor.saturating_sub(visible.saturating_sub(1))
        };
        let spin = spinner(self.state.animation_frame);

        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(pos, (_, record))| {
                let selected = pos == self.state.cursor;
                self.render_row(record, selected, name_width, branch_width, spin, area.width)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_row(
        &self,
        record: &RepoStatus,
        selected: bool,
        name_width: usize,
        branch_width: usize,
        spin: &str,
        total_width: u16,
    ) -> Line<'static> {
        let t = self.theme;
        let mut spans = Vec::new();

        if selected {
            spans.push(Span::styled("▸ ", Style::default().fg(t.selected)));
            spans.push(Span::styled(
                pad(&record.name, name_width),
                Style::default().fg(t.selected).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                pad(&record.name, name_width),
                Style::default().fg(t.repo_name),
            ));
        }
        spans.push(Span::raw(" "));

        let branch = truncate_with_ellipsis(&record.branch, branch_width);
        spans.push(Span::styled(
            pad(&branch, branch_width),
            Style::default().fg(t.branch),
        ));
        spans.push(Span::raw(" "));

        if record.dirty {
            spans.push(Span::styled(
                "*",
                Style::default().fg(t.ahead).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::raw(" "));

        let (label, kind) = status_label(record, spin);
        let style = match kind {
            StatusKind::Error => Style::default().fg(t.error),
            StatusKind::Busy => Style::default().fg(t.spinner),
            StatusKind::NoUpstream => Style::default().fg(t.no_remote),
            StatusKind::Synced => Style::default().fg(t.synced).add_modifier(Modifier::BOLD),
            StatusKind::Diverged if record.behind() > 0 => {
                Style::default().fg(t.behind).add_modifier(Modifier::BOLD)
            }
            StatusKind::Diverged => Style::default().fg(t.ahead).add_modifier(Modifier::BOLD),
        };
        spans.push(Span::styled(pad(&label, STATUS_WIDTH), style));
        spans.push(Span::raw(" "));

        let used = 2 + name_width + 1 + branch_width + 3 + STATUS_WIDTH + 1;
        let remaining = (total_width as usize).saturating_sub(used);

        if let Some(message) = &record.last_message {
            let failed = message.contains("failed");
            let color = if failed { t.error } else { t.synced };
            spans.push(Span::styled(
                truncate_with_ellipsis(message, remaining),
                Style::default().fg(color),
            ));
        } else if remaining > AGE_WIDTH + 6
            && record.error.is_none()
            && !record.commit_subject.is_empty()
        {
            let age = short_age(&record.commit_age);
            let subject =
                truncate_with_ellipsis(&record.commit_subject, remaining - AGE_WIDTH - 1);
            spans.push(Span::styled(
                format!("{:>width$} {}", age, subject, width = AGE_WIDTH),
                Style::default().fg(t.dim),
            ));
        }

        Line::from(spans)
    }
}
