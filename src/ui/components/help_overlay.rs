use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::helpers::centered_rect;
use crate::ui::theme::Theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j / ↓", "Move down"),
            ("k / ↑", "Move up"),
            ("Home/End", "First / last repository"),
            ("g", "Toggle grouping by state"),
        ],
    ),
    (
        "Remote Operations",
        &[
            ("f", "Fetch selected"),
            ("F", "Fetch all"),
            ("s", "Sync selected (fetch + pull --rebase)"),
            ("S", "Sync all"),
            ("p", "Push selected"),
            ("P", "Push all that are ahead"),
            ("u", "Set upstream for selected"),
        ],
    ),
    (
        "Other",
        &[
            ("r", "Refresh all"),
            ("l", "Toggle log panel"),
            ("?", "Toggle this help"),
            ("q / Esc", "Quit"),
        ],
    ),
];

pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let t = self.theme;
        let mut help_text = vec![
            Line::from(Span::styled(
                "gitpulse",
                Style::default().fg(t.title).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for (heading, entries) in SECTIONS {
            help_text.push(Line::from(Span::styled(
                *heading,
                Style::default().fg(t.selected).add_modifier(Modifier::BOLD),
            )));
            for (key, description) in entries.iter() {
                help_text.push(Line::from(vec![
                    Span::styled(format!("  {:10}", key), Style::default().fg(t.help_key)),
                    Span::styled(*description, Style::default().fg(t.repo_name)),
                ]));
            }
            help_text.push(Line::from(""));
        }
        help_text.push(Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(t.help_text),
        )));

        let popup_area = centered_rect(60, 80, area);
        frame.render_widget(Clear, popup_area);

        let paragraph = Paragraph::new(help_text).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(t.border)),
        );

        frame.render_widget(paragraph, popup_area);
    }
}
