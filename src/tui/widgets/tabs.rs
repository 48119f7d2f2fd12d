//! Tab bar widget for view navigation

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::tui::theme::Theme;

/// Available tabs in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Races,
    Results,
    Qualifying,
    Standings,
    Sprint,
}

impl Tab {
    /// Get the display label for this tab
    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Races => "Races",
            Self::Results => "Results",
            Self::Qualifying => "Qualifying",
            Self::Standings => "Standings",
            Self::Sprint => "Sprint",
        }
    }

    /// Get all tabs in order
    pub fn all() -> &'static [Tab] {
        &[
            Tab::Overview,
            Tab::Races,
            Tab::Results,
            Tab::Qualifying,
            Tab::Standings,
            Tab::Sprint,
        ]
    }

    /// Get the next tab (wrapping)
    pub fn next(self) -> Self {
        match self {
            Self::Overview => Self::Races,
            Self::Races => Self::Results,
            Self::Results => Self::Qualifying,
            Self::Qualifying => Self::Standings,
            Self::Standings => Self::Sprint,
            Self::Sprint => Self::Overview,
        }
    }

    /// Get the previous tab (wrapping)
    pub fn prev(self) -> Self {
        match self {
            Self::Overview => Self::Sprint,
            Self::Races => Self::Overview,
            Self::Results => Self::Races,
            Self::Qualifying => Self::Results,
            Self::Standings => Self::Qualifying,
            Self::Sprint => Self::Standings,
        }
    }

    /// Get tab from number key (1-6)
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Overview),
            2 => Some(Self::Races),
            3 => Some(Self::Results),
            4 => Some(Self::Qualifying),
            5 => Some(Self::Standings),
            6 => Some(Self::Sprint),
            _ => None,
        }
    }
}

/// Tab bar widget showing available views
pub struct TabBar {
    selected: Tab,
    theme: Theme,
}

impl TabBar {
    pub fn new(selected: Tab, theme: Theme) -> Self {
        Self { selected, theme }
    }
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Total width of all tabs for centering
        let total_width: u16 = Tab::all()
            .iter()
            .map(|tab| {
                let label = tab.label();
                let display_len = if *tab == self.selected {
                    label.len() + 2 // "[label]"
                } else {
                    label.len()
                };
                display_len as u16 + 2 // + spacing
            })
            .sum::<u16>()
            .saturating_sub(2);

        let start_x = area.x + (area.width.saturating_sub(total_width)) / 2;
        let mut x = start_x;

        for tab in Tab::all() {
            let is_selected = *tab == self.selected;
            let label = tab.label();

            let display = if is_selected {
                format!("[{}]", label)
            } else {
                label.to_string()
            };

            let display_len = display.len() as u16;
            if x + display_len > area.x + area.width {
                break;
            }

            let style = if is_selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted())
            };

            buf.set_string(x, area.y, &display, style);
            x += display_len + 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_labels() {
        assert_eq!(Tab::Overview.label(), "Overview");
        assert_eq!(Tab::Races.label(), "Races");
        assert_eq!(Tab::Results.label(), "Results");
        assert_eq!(Tab::Qualifying.label(), "Qualifying");
        assert_eq!(Tab::Standings.label(), "Standings");
        assert_eq!(Tab::Sprint.label(), "Sprint");
    }

    #[test]
    fn test_tab_all() {
        let all = Tab::all();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], Tab::Overview);
        assert_eq!(all[5], Tab::Sprint);
    }

    #[test]
    fn test_tab_next_wraps() {
        let mut tab = Tab::Overview;
        for _ in 0..Tab::all().len() {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Overview);
    }

    #[test]
    fn test_tab_prev_wraps() {
        assert_eq!(Tab::Overview.prev(), Tab::Sprint);
        assert_eq!(Tab::Sprint.prev(), Tab::Standings);
    }

    #[test]
    fn test_tab_next_prev_inverse() {
        for &tab in Tab::all() {
            assert_eq!(tab.next().prev(), tab);
        }
    }

    #[test]
    fn test_tab_default() {
        assert_eq!(Tab::default(), Tab::Overview);
    }

    #[test]
    fn test_tab_from_number() {
        assert_eq!(Tab::from_number(1), Some(Tab::Overview));
        assert_eq!(Tab::from_number(2), Some(Tab::Races));
        assert_eq!(Tab::from_number(6), Some(Tab::Sprint));
        assert_eq!(Tab::from_number(0), None);
        assert_eq!(Tab::from_number(7), None);
    }
}
