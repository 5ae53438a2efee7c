use crate::day::{ContainerStyle, TextStyle};
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const HEADER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const FOCUS_STYLE: Style = BASE_STYLE.fg(Color::Cyan);

/// Background that lets whatever is behind a container show through.  A
/// container with this background leaves the cells' own background alone.
pub(crate) const TRANSPARENT: Color = Color::Reset;

/// Text color of the current day while it is selected
pub(crate) const CURRENT_DAY_SELECTED: Color = Color::Rgb(0xAD, 0x0B, 0x0E);

/// Text color of the current day while it is not selected
pub(crate) const CURRENT_DAY_UNSELECTED: Color = Color::Rgb(0xEA, 0xD7, 0xD7);

/// Top margin of the current day's number
pub(crate) const CURRENT_DAY_NUMBER_MARGIN: f64 = 2.5;

pub(crate) const TRIANGLE_COLOR: Color = Color::Rgb(0xAD, 0x0B, 0x0E);

pub(crate) const TRIANGLE_GLYPH: char = '▼';

pub(crate) const DOT_GLYPH: char = '•';

pub(crate) mod fragments {
    use super::*;

    pub(crate) const DATE_NAME: TextStyle = TextStyle::new();

    pub(crate) const DATE_NUMBER: TextStyle = TextStyle::new().add_modifier(Modifier::BOLD);

    pub(crate) const WEEKEND_DATE_NAME: TextStyle = TextStyle::new().color(Color::Gray);

    pub(crate) const WEEKEND_DATE_NUMBER: TextStyle = TextStyle::new()
        .color(Color::Gray)
        .add_modifier(Modifier::BOLD);

    pub(crate) const ENABLED_CONTAINER: ContainerStyle =
        ContainerStyle::new().background(TRANSPARENT);
}
