use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{Modal, UpstreamOption};
use crate::ui::helpers::{centered_fixed, spinner};
use crate::ui::theme::Theme;

const MODAL_WIDTH: u16 = 56;

/// Render whichever upstream-resolution step is active.
pub fn render_upstream_modal(
    frame: &mut Frame,
    modal: &Modal,
    repo_name: &str,
    theme: &Theme,
    animation_frame: usize,
) {
    match modal {
        Modal::Discovering { .. } => {
            let lines = vec![Line::from(vec![
                Span::styled(
                    format!("{} ", spinner(animation_frame)),
                    Style::default().fg(theme.spinner),
                ),
                Span::styled("Looking up remotes…", Style::default().fg(theme.repo_name)),
            ])];
            render_box(
                frame,
                theme,
                &format!("Set upstream for {}", repo_name),
                lines,
                "esc cancel",
            );
        }
        Modal::SelectingUpstream {
            branch,
            options,
            cursor,
            ..
        } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("Branch: {}", branch),
                    Style::default().fg(theme.dim),
                )),
                Line::from(""),
            ];
            lines.extend(
                options
                    .iter()
                    .enumerate()
                    .map(|(i, option)| option_line(option, i == *cursor, theme)),
            );
            render_box(
                frame,
                theme,
                &format!("Set upstream for {}", repo_name),
                lines,
                "↑/↓ select  ⏎ confirm  esc cancel",
            );
        }
        Modal::AddingRemote { input, .. } => {
            let (text, style) = if input.is_empty() {
                (
                    "git@github.com:user/repo.git".to_string(),
                    Style::default().fg(theme.dim),
                )
            } else {
                (input.clone(), Style::default().fg(theme.repo_name))
            };
            let lines = vec![
                Line::from(Span::styled(
                    "No remotes configured. Add origin:",
                    Style::default().fg(theme.dim),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("> ", Style::default().fg(theme.selected)),
                    Span::styled(text, style),
                    Span::styled("█", Style::default().fg(theme.repo_name)),
                ]),
            ];
            render_box(
                frame,
                theme,
                &format!("Add remote for {}", repo_name),
                lines,
                "⏎ add remote  esc cancel",
            );
        }
    }
}

fn option_line(option: &UpstreamOption, selected: bool, theme: &Theme) -> Line<'static> {
    let text = if option.exists {
        format!("track {}/{}", option.remote, option.branch)
    } else {
        format!("push & track {}/{}", option.remote, option.branch)
    };
    if selected {
        Line::from(vec![
            Span::styled("▸ ", Style::default().fg(theme.selected)),
            Span::styled(
                text,
                Style::default()
                    .fg(theme.selected)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(vec![
            Span::raw("  "),
            Span::styled(text, Style::default().fg(theme.repo_name)),
        ])
    }
}

fn render_box(frame: &mut Frame, theme: &Theme, title: &str, body: Vec<Line>, help: &str) {
    let mut lines = body;
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        help.to_string(),
        Style::default().fg(theme.help_text),
    )));

    // Borders plus one line of padding on each side.
    let height = lines.len() as u16 + 4;
    let area = centered_fixed(MODAL_WIDTH, height, frame.area());

    frame.render_widget(Clear, area);

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {} ", title),
                    Style::default()
                        .fg(theme.title)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border))
                .padding(ratatui::widgets::Padding::new(2, 2, 1, 1)),
        );

    frame.render_widget(paragraph, area);
}
