//! TUI widgets

pub mod help;
pub mod overview;
pub mod qualifying;
pub mod races;
pub mod results;
pub mod spinner;
pub mod sprint;
pub mod standings;
pub mod tabs;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Maximum content width (keeps layout clean on wide terminals)
pub const MAX_CONTENT_WIDTH: u16 = 110;

/// Center `area` horizontally within the max content width
pub fn centered(area: Rect) -> Rect {
    let content_width = area.width.min(MAX_CONTENT_WIDTH);
    let x_offset = (area.width.saturating_sub(content_width)) / 2;
    Rect {
        x: area.x + x_offset,
        y: area.y,
        width: content_width,
        height: area.height,
    }
}

/// Render a horizontal separator line
pub fn render_separator(area: Rect, buf: &mut Buffer, theme: Theme) {
    let line = "─".repeat(area.width as usize);
    buf.set_string(area.x, area.y, &line, Style::default().fg(theme.muted()));
}

/// Render a footer line of key/description hint pairs
pub fn render_hints(area: Rect, buf: &mut Buffer, theme: Theme, hints: &[(&str, &str)]) {
    let mut spans = Vec::new();
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ·  ", Style::default().fg(theme.muted())));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(theme.accent()),
        ));
        spans.push(Span::styled(
            format!(" {}", desc),
            Style::default().fg(theme.muted()),
        ));
    }
    Paragraph::new(Line::from(spans)).render(area, buf);
}

/// Truncate a string to at most `max` characters, appending an ellipsis
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_str("Monaco", 10), "Monaco");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate_str("Emilia Romagna Grand Prix", 10), "Emilia Ro…");
    }

    #[test]
    fn test_centered_narrow_area_untouched() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered(area), area);
    }

    #[test]
    fn test_centered_wide_area_clamped() {
        let area = Rect::new(0, 0, 200, 24);
        let c = centered(area);
        assert_eq!(c.width, MAX_CONTENT_WIDTH);
        assert_eq!(c.x, (200 - MAX_CONTENT_WIDTH) / 2);
    }
}
