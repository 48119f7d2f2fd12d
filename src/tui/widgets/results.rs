//! Race results table

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::tabs::{Tab, TabBar};
use super::{centered, render_hints, render_separator, truncate_str};
use crate::services::DriverSession;
use crate::tui::theme::Theme;

/// Column definitions: (label, width)
const COLUMNS: [(&str, u16); 5] = [
    ("Race", 30),
    ("Season", 8),
    ("Pos", 5),
    ("Points", 8),
    ("Fastest Lap", 12),
];

/// Results table view. After a drill-down this shows the single result the
/// full-data endpoint returned.
pub struct ResultsView<'a> {
    session: &'a DriverSession,
    scroll_offset: usize,
    selected_tab: Tab,
    theme: Theme,
}

impl<'a> ResultsView<'a> {
    pub fn new(
        session: &'a DriverSession,
        scroll_offset: usize,
        selected_tab: Tab,
        theme: Theme,
    ) -> Self {
        Self {
            session,
            scroll_offset,
            selected_tab,
            theme,
        }
    }
}

impl Widget for ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let centered_area = centered(area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // 0: Tab bar
            Constraint::Length(1), // 1: Separator
            Constraint::Length(1), // 2: Header
            Constraint::Fill(1),   // 3: Rows
            Constraint::Length(1), // 4: Separator
            Constraint::Length(1), // 5: Hints
        ])
        .split(centered_area);

        TabBar::new(self.selected_tab, self.theme).render(chunks[0], buf);
        render_separator(chunks[1], buf, self.theme);
        self.render_header(chunks[2], buf);
        self.render_rows(chunks[3], buf);
        render_separator(chunks[4], buf, self.theme);
        render_hints(
            chunks[5],
            buf,
            self.theme,
            &[("↑/↓", "scroll"), ("s", "season filter"), ("Tab", "switch view")],
        );
    }
}

impl ResultsView<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let header_style = Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD);
        let mut spans = Vec::new();
        for (label, width) in COLUMNS {
            spans.push(Span::styled(
                format!("{:<width$}", label, width = width as usize),
                header_style,
            ));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }

    fn render_rows(&self, area: Rect, buf: &mut Buffer) {
        let results = self.session.results();
        if results.is_empty() {
            buf.set_string(
                area.x,
                area.y,
                "No results.",
                Style::default().fg(self.theme.muted()),
            );
            return;
        }

        let profile = self.session.profile();
        for (row, result) in results
            .iter()
            .skip(self.scroll_offset)
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + row as u16;

            let race = profile
                .race_name(result.race_id)
                .map(|n| truncate_str(n, 28))
                .unwrap_or_else(|| "—".to_string());
            let season = profile
                .season_year(result.season_id)
                .map(|y| y.to_string())
                .unwrap_or_else(|| {
                    if result.season_id == 0 {
                        "—".to_string()
                    } else {
                        result.season_id.to_string()
                    }
                });
            let position = result
                .position
                .map(|p| p.to_string())
                .unwrap_or_else(|| "—".to_string());
            let speed = result
                .fastest_lap_speed
                .map(|s| format!("{:.1}", s))
                .unwrap_or_else(|| "N/A".to_string());

            let line = Line::from(vec![
                Span::styled(
                    format!("{:<30}", race),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:<8}", season),
                    Style::default().fg(self.theme.season()),
                ),
                Span::styled(
                    format!("{:<5}", position),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:<8.1}", result.points),
                    Style::default().fg(self.theme.points()),
                ),
                Span::styled(
                    format!("{:<12}", speed),
                    Style::default().fg(self.theme.positive()),
                ),
            ]);
            Paragraph::new(line).render(
                Rect {
                    x: area.x,
                    y,
                    width: area.width,
                    height: 1,
                },
                buf,
            );
        }
    }
}
