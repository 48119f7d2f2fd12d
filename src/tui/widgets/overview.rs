//! Driver summary view

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::tabs::{Tab, TabBar};
use super::{centered, render_hints, render_separator};
use crate::services::{Aggregator, DriverSession};
use crate::tui::theme::Theme;

/// Maximum bar width for the per-season points chart
const BAR_WIDTH: usize = 40;

/// Driver summary card with career totals and per-season points
pub struct Overview<'a> {
    session: &'a DriverSession,
    selected_tab: Tab,
    theme: Theme,
}

impl<'a> Overview<'a> {
    pub fn new(session: &'a DriverSession, selected_tab: Tab, theme: Theme) -> Self {
        Self {
            session,
            selected_tab,
            theme,
        }
    }
}

impl Widget for Overview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let centered_area = centered(area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // 0: Tab bar
            Constraint::Length(1), // 1: Separator
            Constraint::Length(1), // 2: Padding
            Constraint::Length(1), // 3: Name
            Constraint::Length(1), // 4: Code / number / nationality
            Constraint::Length(1), // 5: Date of birth
            Constraint::Length(1), // 6: Padding
            Constraint::Length(1), // 7: Career line
            Constraint::Length(1), // 8: Padding
            Constraint::Length(1), // 9: Season chart label
            Constraint::Fill(1),   // 10: Season chart
            Constraint::Length(1), // 11: Separator
            Constraint::Length(1), // 12: Hints
        ])
        .split(centered_area);

        TabBar::new(self.selected_tab, self.theme).render(chunks[0], buf);
        render_separator(chunks[1], buf, self.theme);

        let driver = self.session.driver();

        // Name line
        let name = Line::from(Span::styled(
            driver.full_name(),
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        ));
        Paragraph::new(name).render(chunks[3], buf);

        // Code / number / nationality line
        let mut id_parts = Vec::new();
        if let Some(code) = &driver.code {
            id_parts.push(code.clone());
        }
        if let Some(number) = driver.number {
            id_parts.push(format!("#{}", number));
        }
        if let Some(nationality) = &driver.nationality {
            id_parts.push(nationality.clone());
        }
        Paragraph::new(Line::from(Span::styled(
            id_parts.join("  ·  "),
            Style::default().fg(self.theme.accent()),
        )))
        .render(chunks[4], buf);

        // Date of birth
        let dob = driver
            .dob
            .map(|d| d.to_string())
            .unwrap_or_else(|| "—".to_string());
        Paragraph::new(Line::from(vec![
            Span::styled("Born ", Style::default().fg(self.theme.muted())),
            Span::styled(dob, Style::default().fg(self.theme.text())),
        ]))
        .render(chunks[5], buf);

        // Career line
        let profile = self.session.profile();
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{:.1}", self.session.total_points()),
                Style::default()
                    .fg(self.theme.points())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" career points", Style::default().fg(self.theme.muted())),
            Span::styled("   ·   ", Style::default().fg(self.theme.muted())),
            Span::styled(
                format!("{}", profile.races.len()),
                Style::default().fg(self.theme.text()),
            ),
            Span::styled(" races", Style::default().fg(self.theme.muted())),
            Span::styled("   ·   ", Style::default().fg(self.theme.muted())),
            Span::styled(
                format!("{}", profile.season_ids.len()),
                Style::default().fg(self.theme.text()),
            ),
            Span::styled(" seasons", Style::default().fg(self.theme.muted())),
        ]))
        .render(chunks[7], buf);

        // Per-season points chart
        Paragraph::new(Line::from(Span::styled(
            "Points by season",
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        )))
        .render(chunks[9], buf);

        self.render_season_bars(chunks[10], buf);

        render_separator(chunks[11], buf, self.theme);
        render_hints(
            chunks[12],
            buf,
            self.theme,
            &[("Tab", "switch view"), ("r", "reload"), ("?", "help"), ("q", "quit")],
        );
    }
}

impl Overview<'_> {
    fn render_season_bars(&self, area: Rect, buf: &mut Buffer) {
        let profile = self.session.profile();
        let by_season = Aggregator::points_by_season(&profile.results, &profile.season_ids);
        if by_season.is_empty() {
            buf.set_string(
                area.x,
                area.y,
                "No season data.",
                Style::default().fg(self.theme.muted()),
            );
            return;
        }

        let max_points = by_season
            .iter()
            .map(|(_, p)| *p)
            .fold(0.0_f64, f64::max)
            .max(1.0);

        for (row, (season_id, points)) in by_season.iter().enumerate() {
            if row as u16 >= area.height {
                break;
            }
            let y = area.y + row as u16;

            let year = profile
                .season_year(*season_id)
                .map(|y| y.to_string())
                .unwrap_or_else(|| season_id.to_string());
            let bar_len = ((points / max_points) * BAR_WIDTH as f64).round() as usize;
            let bar = "█".repeat(bar_len);

            buf.set_string(area.x, y, &year, Style::default().fg(self.theme.season()));
            buf.set_string(
                area.x + 6,
                y,
                &bar,
                Style::default().fg(self.theme.positive()),
            );
            buf.set_string(
                area.x + 6 + BAR_WIDTH as u16 + 2,
                y,
                format!("{:>6.1}", points),
                Style::default().fg(self.theme.points()),
            );
        }
    }
}
