//! Race list with drill-down panel (pit stops and lap times)

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

/// Race list plus the detail panel for the drilled-down race
pub struct RacesView<'a> {
    session: &'a DriverSession,
    cursor: usize,
    detail_loading: bool,
    selected_tab: Tab,
    theme: Theme,
}

impl<'a> RacesView<'a> {
    pub fn new(
        session: &'a DriverSession,
        cursor: usize,
        detail_loading: bool,
        selected_tab: Tab,
        theme: Theme,
    ) -> Self {
        Self {
            session,
            cursor,
            detail_loading,
            selected_tab,
            theme,
        }
    }
}

impl Widget for RacesView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let centered_area = centered(area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // 0: Tab bar
            Constraint::Length(1), // 1: Separator
            Constraint::Length(1), // 2: Season filter line
            Constraint::Fill(1),   // 3: List + detail panel
            Constraint::Length(1), // 4: Separator
            Constraint::Length(1), // 5: Hints
        ])
        .split(centered_area);

        TabBar::new(self.selected_tab, self.theme).render(chunks[0], buf);
        render_separator(chunks[1], buf, self.theme);
        self.render_filter_line(chunks[2], buf);

        let panels = Layout::horizontal([
            Constraint::Percentage(45), // race list
            Constraint::Length(2),      // gutter
            Constraint::Fill(1),        // detail panel
        ])
        .split(chunks[3]);

        self.render_race_list(panels[0], buf);
        self.render_detail_panel(panels[2], buf);

        render_separator(chunks[4], buf, self.theme);
        render_hints(
            chunks[5],
            buf,
            self.theme,
            &[
                ("Enter", "race detail"),
                ("Esc", "clear"),
                ("s", "season filter"),
                ("↑/↓", "move"),
            ],
        );
    }
}

impl RacesView<'_> {
    fn render_filter_line(&self, area: Rect, buf: &mut Buffer) {
        let profile = self.session.profile();
        let label = match self.session.season_filter() {
            None => "All seasons".to_string(),
            Some(id) => profile
                .season_year(id)
                .map(|y| format!("Season {}", y))
                .unwrap_or_else(|| format!("Season #{}", id)),
        };
        Paragraph::new(Line::from(vec![
            Span::styled("Filter: ", Style::default().fg(self.theme.muted())),
            Span::styled(label, Style::default().fg(self.theme.season())),
        ]))
        .render(area, buf);
    }

    fn render_race_list(&self, area: Rect, buf: &mut Buffer) {
        let races = self.session.races();
        if races.is_empty() {
            buf.set_string(
                area.x,
                area.y,
                "No races for this season.",
                Style::default().fg(self.theme.muted()),
            );
            return;
        }

        // Keep the cursor visible
        let visible_rows = area.height as usize;
        let start = if self.cursor >= visible_rows {
            self.cursor + 1 - visible_rows
        } else {
            0
        };

        for (row, (idx, race)) in races
            .iter()
            .enumerate()
            .skip(start)
            .take(visible_rows)
            .enumerate()
        {
            let y = area.y + row as u16;
            let is_cursor = idx == self.cursor;
            let is_drilled = self.session.selected_race() == Some(race.race_id);

            let marker = if is_cursor { "▸ " } else { "  " };
            let drilled_mark = if is_drilled { " *" } else { "" };
            let year = self
                .session
                .profile()
                .season_year(race.season_id)
                .map(|y| y.to_string())
                .unwrap_or_else(|| race.season_id.to_string());
            let text = format!(
                "{}{} ({}){}",
                marker,
                truncate_str(&race.name, area.width.saturating_sub(12) as usize),
                year,
                drilled_mark
            );

            let style = if is_cursor {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if is_drilled {
                Style::default().fg(self.theme.accent())
            } else {
                Style::default().fg(self.theme.text())
            };

            buf.set_string(area.x, y, &text, style);
        }
    }

    fn render_detail_panel(&self, area: Rect, buf: &mut Buffer) {
        let Some(race_id) = self.session.selected_race() else {
            buf.set_string(
                area.x,
                area.y,
                "Press Enter on a race to load pit stops and lap times.",
                Style::default().fg(self.theme.muted()),
            );
            return;
        };

        let name = self
            .session
            .profile()
            .race_name(race_id)
            .map(|n| n.to_string())
            .unwrap_or_else(|| format!("race {}", race_id));

        let chunks = Layout::vertical([
            Constraint::Length(1),      // 0: Title
            Constraint::Length(1),      // 1: Warning / loading line
            Constraint::Percentage(50), // 2: Pit stops
            Constraint::Fill(1),        // 3: Lap times
        ])
        .split(area);

        buf.set_string(
            chunks[0].x,
            chunks[0].y,
            format!("Race details — {}", truncate_str(&name, 40)),
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );

        if self.detail_loading {
            buf.set_string(
                chunks[1].x,
                chunks[1].y,
                "Loading...",
                Style::default().fg(self.theme.muted()),
            );
        } else if let Some(warning) = self.session.detail_warning() {
            buf.set_string(
                chunks[1].x,
                chunks[1].y,
                truncate_str(warning, area.width as usize),
                Style::default().fg(self.theme.error()),
            );
        }

        self.render_pit_stops(chunks[2], buf);
        self.render_lap_times(chunks[3], buf);
    }

    fn render_pit_stops(&self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 {
            return;
        }
        buf.set_string(
            area.x,
            area.y,
            "Pit stops",
            Style::default().fg(self.theme.season()),
        );

        let stops = self.session.pit_stops();
        if stops.is_empty() {
            buf.set_string(
                area.x,
                area.y + 1,
                "No pit stop data available.",
                Style::default().fg(self.theme.muted()),
            );
            return;
        }

        for (row, stop) in stops.iter().take(area.height as usize - 1).enumerate() {
            let duration = stop
                .duration
                .as_deref()
                .or(stop.time.as_deref())
                .unwrap_or("—");
            buf.set_string(
                area.x,
                area.y + 1 + row as u16,
                format!("lap {:>2}  {}", stop.lap, duration),
                Style::default().fg(self.theme.text()),
            );
        }
    }

    fn render_lap_times(&self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 {
            return;
        }
        buf.set_string(
            area.x,
            area.y,
            "Lap times",
            Style::default().fg(self.theme.season()),
        );

        let laps = self.session.lap_times();
        if laps.is_empty() {
            buf.set_string(
                area.x,
                area.y + 1,
                "No lap time data available.",
                Style::default().fg(self.theme.muted()),
            );
            return;
        }

        for (row, lap) in laps.iter().take(area.height as usize - 1).enumerate() {
            let time = lap.time.as_deref().unwrap_or("—");
            buf.set_string(
                area.x,
                area.y + 1 + row as u16,
                format!("lap {:>2}  {}", lap.lap, time),
                Style::default().fg(self.theme.text()),
            );
        }
    }
}
