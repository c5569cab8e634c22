use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::helpers::spinner;
use crate::ui::theme::Theme;

const SHORTCUTS: &[(&str, &str)] = &[
    ("f/F", "fetch"),
    ("s/S", "sync"),
    ("p/P", "push"),
    ("u", "upstream"),
    ("r", "refresh"),
    ("g", "group"),
    ("?", "help"),
    ("q", "quit"),
];

pub struct StatusBarWidget<'a> {
    theme: &'a Theme,
    bulk_running: bool,
    animation_frame: usize,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(theme: &'a Theme, bulk_running: bool, animation_frame: usize) -> Self {
        Self {
            theme,
            bulk_running,
            animation_frame,
        }
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let t = self.theme;
        let mut spans: Vec<Span> = Vec::new();

        for (i, (key, action)) in SHORTCUTS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                *key,
                Style::default().fg(t.help_key).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}", action),
                Style::default().fg(t.help_text),
            ));
        }

        if self.bulk_running {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                format!("{} working…", spinner(self.animation_frame)),
                Style::default().fg(t.spinner),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
