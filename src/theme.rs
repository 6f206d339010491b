use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the tag input
#[derive(Clone, Debug)]
pub struct Theme {
    /// Background color for the whole screen
    pub background: Color,

    /// Border color of the input board
    pub board_border: Color,

    /// Border color of the input board while it has keyboard focus
    pub board_border_focused: Color,

    /// Foreground color for chip labels
    pub chip_fg: Color,

    /// Background color for chips
    pub chip_bg: Color,

    /// Foreground color for the chip delete control
    pub chip_delete_fg: Color,

    /// Background color for the chip delete control
    pub chip_delete_bg: Color,

    /// Foreground color for suggestion buttons
    pub suggestion_fg: Color,

    /// Background color for suggestion buttons
    pub suggestion_bg: Color,

    /// Foreground color for the highlighted suggestion
    pub suggestion_selected_fg: Color,

    /// Background color for the highlighted suggestion
    pub suggestion_selected_bg: Color,

    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            board_border: Color::DarkGray,
            board_border_focused: Color::White,
            chip_fg: Color::Black,
            chip_bg: Color::Gray,
            chip_delete_fg: Color::White,
            chip_delete_bg: Color::Black,
            suggestion_fg: Color::Gray,
            suggestion_bg: Color::Reset,
            suggestion_selected_fg: Color::Black,
            suggestion_selected_bg: Color::LightBlue,
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
        }
    }
}

impl Theme {
    /// Create a new theme with default colors
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background_style(&self) -> Style {
        Style::default().bg(self.background)
    }

    /// Border style of the board, brighter while focused
    pub fn board_border_style(&self, focused: bool) -> Style {
        let color = if focused {
            self.board_border_focused
        } else {
            self.board_border
        };
        Style::default().fg(color)
    }

    /// Get the style for chip labels
    pub fn chip_style(&self) -> Style {
        Style::default()
            .fg(self.chip_fg)
            .bg(self.chip_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Get the style for the chip delete control
    pub fn chip_delete_style(&self) -> Style {
        Style::default()
            .fg(self.chip_delete_fg)
            .bg(self.chip_delete_bg)
    }

    /// Get the style for a suggestion button
    pub fn suggestion_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.suggestion_selected_fg)
                .bg(self.suggestion_selected_bg)
        } else {
            Style::default()
                .fg(self.suggestion_fg)
                .bg(self.suggestion_bg)
        }
    }

    /// Get the style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }
}
