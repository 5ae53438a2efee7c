use crate::theme::{TRIANGLE_COLOR, TRIANGLE_GLYPH};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

/// Percentage of the cell's width at which the triangle's left edge sits
const LEFT_PERCENT: u16 = 38;

/// The selection triangle only shows when the cell has both rows and is
/// selected
pub(crate) fn is_visible(show_day_name: bool, show_day_number: bool, selected: bool) -> bool {
    show_day_name && show_day_number && selected
}

/// Downward-pointing marker drawn on the top row of a selected cell
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Triangle;

impl Widget for Triangle {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let offset = area.width.saturating_mul(LEFT_PERCENT) / 100;
        let x = area.x + offset.min(area.width - 1);
        if let Some(cell) = buf.cell_mut((x, area.y)) {
            cell.set_char(TRIANGLE_GLYPH)
                .set_style(Style::new().fg(TRIANGLE_COLOR));
        }
    }
}
