//! Championship standings table

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

const COLUMNS: [(&str, u16); 4] = [("Race", 30), ("Points", 8), ("Pos", 5), ("Wins", 5)];

/// Standings table with a career points footer
pub struct StandingsView<'a> {
    session: &'a DriverSession,
    scroll_offset: usize,
    selected_tab: Tab,
    theme: Theme,
}

impl<'a> StandingsView<'a> {
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

impl Widget for StandingsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let centered_area = centered(area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // 0: Tab bar
            Constraint::Length(1), // 1: Separator
            Constraint::Length(1), // 2: Header
            Constraint::Fill(1),   // 3: Rows
            Constraint::Length(1), // 4: Total points footer
            Constraint::Length(1), // 5: Separator
            Constraint::Length(1), // 6: Hints
        ])
        .split(centered_area);

        TabBar::new(self.selected_tab, self.theme).render(chunks[0], buf);
        render_separator(chunks[1], buf, self.theme);

        let header_style = Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD);
        let spans: Vec<Span> = COLUMNS
            .iter()
            .map(|(label, width)| {
                Span::styled(
                    format!("{:<width$}", label, width = *width as usize),
                    header_style,
                )
            })
            .collect();
        Paragraph::new(Line::from(spans)).render(chunks[2], buf);

        self.render_rows(chunks[3], buf);

        // Career total across every entry, unaffected by the season filter
        Paragraph::new(Line::from(vec![
            Span::styled("Career points: ", Style::default().fg(self.theme.muted())),
            Span::styled(
                format!("{:.1}", self.session.total_points()),
                Style::default()
                    .fg(self.theme.points())
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .render(chunks[4], buf);

        render_separator(chunks[5], buf, self.theme);
        render_hints(
            chunks[6],
            buf,
            self.theme,
            &[("↑/↓", "scroll"), ("Tab", "switch view")],
        );
    }
}

impl StandingsView<'_> {
    fn render_rows(&self, area: Rect, buf: &mut Buffer) {
        let standings = self.session.standings();
        if standings.is_empty() {
            buf.set_string(
                area.x,
                area.y,
                "No standings data.",
                Style::default().fg(self.theme.muted()),
            );
            return;
        }

        let profile = self.session.profile();
        for (row, entry) in standings
            .iter()
            .skip(self.scroll_offset)
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + row as u16;

            let race = profile
                .race_name(entry.race_id)
                .map(|n| truncate_str(n, 28))
                .unwrap_or_else(|| format!("race {}", entry.race_id));
            let position = entry
                .position
                .map(|p| p.to_string())
                .unwrap_or_else(|| "—".to_string());
            let wins = entry
                .wins
                .map(|w| w.to_string())
                .unwrap_or_else(|| "—".to_string());

            let line = Line::from(vec![
                Span::styled(
                    format!("{:<30}", race),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:<8.1}", entry.points),
                    Style::default().fg(self.theme.points()),
                ),
                Span::styled(
                    format!("{:<5}", position),
                    Style::default().fg(self.theme.accent()),
                ),
                Span::styled(
                    format!("{:<5}", wins),
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
