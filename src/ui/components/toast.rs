use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{Toast, ToastLevel};
use crate::ui::theme::Theme;

const TOAST_HEIGHT: u16 = 3;
const MIN_WIDTH: u16 = 20;

/// Transient notice in the bottom-right corner, clear of the key hints.
pub struct ToastWidget<'a> {
    toast: &'a Toast,
    theme: &'a Theme,
}

impl<'a> ToastWidget<'a> {
    pub fn new(toast: &'a Toast, theme: &'a Theme) -> Self {
        Self { toast, theme }
    }

    pub fn render(self, frame: &mut Frame) {
        let t = self.theme;
        let (icon, color) = match self.toast.level {
            ToastLevel::Success => ("✓", t.synced),
            ToastLevel::Info => ("•", t.help_key),
            ToastLevel::Warning => ("!", t.ahead),
            ToastLevel::Error => ("✗", t.error),
        };

        let text = format!(" {} {} ", icon, self.toast.message);
        let Some(area) = toast_area(frame.area(), text.chars().count() as u16) else {
            return;
        };
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color));
        let line = Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

/// Bottom-right placement two rows above the frame edge. None when the
/// terminal is too small to hold a toast at all.
fn toast_area(frame_area: Rect, text_width: u16) -> Option<Rect> {
    if frame_area.height < TOAST_HEIGHT + 2 || frame_area.width < MIN_WIDTH + 2 {
        return None;
    }
    let max_width = frame_area.width - 2;
    let width = (text_width + 2).clamp(MIN_WIDTH, max_width);
    Some(Rect {
        x: frame_area.x + frame_area.width - width - 1,
        y: frame_area.y + frame_area.height - TOAST_HEIGHT - 2,
        width,
        height: TOAST_HEIGHT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_area_bottom_right() {
        let area = toast_area(Rect::new(0, 0, 80, 24), 10).unwrap();
        assert_eq!(area.width, MIN_WIDTH);
        assert_eq!(area.x + area.width, 79);
        assert_eq!(area.y, 19);
    }

    #[test]
    fn test_toast_area_clamped_to_frame() {
        let area = toast_area(Rect::new(0, 0, 40, 10), 200).unwrap();
        assert_eq!(area.width, 38);
        assert_eq!(area.x, 1);
    }

    #[test]
    fn test_toast_area_tiny_terminal() {
        assert!(toast_area(Rect::new(0, 0, 10, 3), 5).is_none());
    }
}
