use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
    Frame,
};

use crate::app::{AppState, LogLevel};

use super::components::{
    render_upstream_modal, HelpOverlay, RepoListWidget, StatusBarWidget, ToastWidget,
};
use super::theme::Theme;

const LOG_PANEL_HEIGHT: u16 = 8;

pub struct AppWidget<'a> {
    state: &'a AppState,
    theme: Theme,
    version: &'a str,
}

impl<'a> AppWidget<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            theme: Theme::by_name(&state.config.theme),
            version: "",
        }
    }

    pub fn with_version(mut self, version: &'a str) -> Self {
        self.version = version;
        self
    }

    pub fn render(self, frame: &mut Frame) {
        let size = frame.area();

        let mut constraints = vec![Constraint::Min(3)];
        if self.state.show_logs {
            constraints.push(Constraint::Length(LOG_PANEL_HEIGHT));
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(size);

        self.render_main(frame, chunks[0]);
        if self.state.show_logs {
            self.render_logs(frame, chunks[1]);
        }

        if let Some(modal) = &self.state.modal {
            let name = self
                .state
                .store
                .get(modal.index())
                .map(|r| r.name.as_str())
                .unwrap_or_default();
            render_upstream_modal(frame, modal, name, &self.theme, self.state.animation_frame);
        }

        if self.state.show_help {
            HelpOverlay::new(&self.theme).render(frame, size);
        }

        if let Some(toast) = &self.state.toast {
            ToastWidget::new(toast, &self.theme).render(frame);
        }
    }

    fn render_main(&self, frame: &mut Frame, area: Rect) {
        let t = &self.theme;
        let mut title = vec![Span::styled(
            " gitpulse ",
            Style::default().fg(t.title).add_modifier(Modifier::BOLD),
        )];
        if !self.version.is_empty() {
            title.push(Span::styled(
                format!("{} ", self.version),
                Style::default().fg(t.dim),
            ));
        }
        if self.state.grouped {
            title.push(Span::styled("· grouped ", Style::default().fg(t.help_text)));
        }

        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(t.border))
            .padding(Padding::new(2, 2, 1, 0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        RepoListWidget::new(self.state, t).render(frame, chunks[0]);
        StatusBarWidget::new(t, self.state.bulk_running(), self.state.animation_frame)
            .render(frame, chunks[2]);
    }

    fn render_logs(&self, frame: &mut Frame, area: Rect) {
        let visible_lines = (area.height.saturating_sub(2)) as usize;

        let lines: Vec<Line> = self
            .state
            .logs
            .iter()
            .rev()
            .take(visible_lines)
            .map(|entry| {
                let time = entry.timestamp.format("%H:%M:%S");
                let (level_str, level_color) = match entry.level {
                    LogLevel::Info => ("INFO", Color::Green),
                    LogLevel::Warn => ("WARN", Color::Yellow),
                    LogLevel::Error => ("ERR ", Color::Red),
                    LogLevel::Debug => ("DBG ", Color::DarkGray),
                };

                Line::from(vec![
                    Span::styled(format!("{} ", time), Style::default().fg(self.theme.dim)),
                    Span::styled(
                        format!("[{}] ", level_str),
                        Style::default().fg(level_color),
                    ),
                    Span::raw(entry.message.clone()),
                ])
            })
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(" LOGS ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.border)),
        );

        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Config, Modal, StatusStore, UpstreamOption, UpstreamTrigger};
    use crate::git::RepoStatus;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn state() -> AppState {
        let ahead = RepoStatus {
            branch: "main".into(),
            has_upstream: true,
            ahead: 2,
            commit_subject: "Add parser".into(),
            commit_age: "3 hours ago".into(),
            ..RepoStatus::new("/srv/alpha", "alpha")
        };
        let local = RepoStatus {
            branch: "wip".into(),
            ..RepoStatus::new("/srv/beta", "beta")
        };
        AppState::with_store(
            Config::default(),
            StatusStore::from_records(vec![ahead, local]),
        )
    }

    #[test]
    fn test_renders_rows() {
        let state = state();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|f| AppWidget::new(&state).render(f))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("gitpulse"));
        assert!(text.contains("alpha"));
        assert!(text.contains("↑2"));
        assert!(text.contains("○ no upstream"));
        assert!(text.contains("3h Add parser"));
    }

    #[test]
    fn test_renders_upstream_modal() {
        let mut state = state();
        state.modal = Some(Modal::SelectingUpstream {
            index: 1,
            branch: "wip".into(),
            options: vec![UpstreamOption {
                remote: "origin".into(),
                branch: "wip".into(),
                exists: false,
            }],
            cursor: 0,
            trigger: UpstreamTrigger::Push,
        });
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|f| AppWidget::new(&state).render(f))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Set upstream for beta"));
        assert!(text.contains("push & track origin/wip"));
    }

    #[test]
    fn test_renders_log_panel() {
        let mut state = state();
        state.show_logs = true;
        state.log_info("Fetched alpha");
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|f| AppWidget::new(&state).render(f))
            .unwrap();
        assert!(buffer_text(&terminal).contains("[INFO] Fetched alpha"));
    }
}
