pub(crate) mod animation;
mod markers;
mod sizes;
mod style;
mod triangle;
use self::markers::MarkerRow;
use self::style::Patch;
use self::triangle::Triangle;
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    text::{Line, Span},
    widgets::Widget,
};
use time::Date;

pub(crate) use self::animation::{AnimationSpec, LoggedTransitions, TransitionScheduler};
pub(crate) use self::markers::{MarkedDate, Marking};
pub(crate) use self::sizes::DerivedSizes;
pub(crate) use self::style::{ContainerStyle, DayCellOptions, DayStyles, ResolvedStyle, TextStyle};

/// Number of lines a cell needs with every row shown
pub(crate) const CELL_LINES: u16 = 4;

/// What the parent grid knows about one date on each render
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DayCellInput<'a> {
    pub(crate) date: Date,
    pub(crate) selected: bool,
    pub(crate) enabled: bool,
    pub(crate) size: f64,
    pub(crate) marking: Option<&'a Marking>,
    /// Every marked date in the calendar; markers are only laid out when
    /// this is non-empty
    pub(crate) marked_dates: &'a [MarkedDate],
}

/// State a cell keeps between renders of the same date
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DayCell {
    date: Date,
    selected: bool,
    size: f64,
    sizes: DerivedSizes,
}

impl DayCell {
    pub(crate) fn new(input: &DayCellInput<'_>) -> DayCell {
        DayCell {
            date: input.date,
            selected: input.selected,
            size: input.size,
            sizes: DerivedSizes::derive(input.size),
        }
    }

    /// Bring the cell up to date with a new render's input.  A change in
    /// selection requests a transition from `scheduler` before the new
    /// selection is recorded, so that it is in place before the new styles
    /// are drawn.
    ///
    /// Returns `true` if anything changed.
    pub(crate) fn update<T: TransitionScheduler>(
        &mut self,
        input: &DayCellInput<'_>,
        animation: &AnimationSpec,
        scheduler: &mut T,
    ) -> bool {
        let mut changed = false;
        if input.selected != self.selected {
            if let Some(transition) = animation.transition() {
                scheduler.configure_next(transition);
            }
            self.selected = input.selected;
            changed = true;
        }
        if input.size.to_bits() != self.size.to_bits() {
            log::debug!(
                "Recomputing sizes for {}: {} -> {}",
                self.date,
                self.size,
                input.size
            );
            self.size = input.size;
            self.sizes = DerivedSizes::derive(input.size);
            changed = true;
        }
        changed
    }

    pub(crate) fn date(&self) -> Date {
        self.date
    }

    pub(crate) fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn sizes(&self) -> DerivedSizes {
        self.sizes
    }

    /// Invoke the press handler with this cell's date
    pub(crate) fn press<F: FnOnce(Date)>(&self, on_date_selected: F) {
        on_date_selected(self.date);
    }
}

impl ResolvedStyle {
    /// The name and number styles with the derived font sizes folded in.
    /// The derived size wins over the name fragment, while the number
    /// fragment wins over the derived size.
    pub(crate) fn sized(&self, sizes: &DerivedSizes) -> (TextStyle, TextStyle) {
        let name = self
            .name
            .patch(TextStyle::new().font_size(sizes.name_font_size));
        let number = TextStyle::new()
            .font_size(sizes.number_font_size)
            .patch(self.number);
        (name, number)
    }
}

/// A resolved cell, ready to be drawn
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DayCellView<'a> {
    date: Date,
    options: &'a DayCellOptions,
    sizes: DerivedSizes,
    style: ResolvedStyle,
    markers: Option<MarkerRow>,
}

impl<'a> DayCellView<'a> {
    pub(crate) fn new(
        cell: &DayCell,
        input: &DayCellInput<'_>,
        styles: &'a DayStyles,
        is_today: bool,
    ) -> DayCellView<'a> {
        DayCellView {
            date: cell.date(),
            options: styles.options(),
            sizes: cell.sizes(),
            style: styles.resolve(input, is_today),
            markers: MarkerRow::build(!input.marked_dates.is_empty(), input.marking),
        }
    }
}

impl Widget for DayCellView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = self.sizes.columns(area.width);
        let [area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let (name_style, number_style) = self.style.sized(&self.sizes);
        let mut rows = area.rows();
        if let Some(row) = rows.next() {
            if self.style.triangle_visible {
                Triangle.render(row, buf);
            }
        }
        if self.options.show_day_name {
            if let Some(row) = rows.next() {
                Line::from(Span::styled(day_name(self.date), name_style.to_style()))
                    .centered()
                    .render(row, buf);
            }
        }
        if self.options.show_day_number {
            let Some(number_row) = rows.next() else {
                return;
            };
            let markers = self.markers.as_ref();
            let marker_row = markers.and_then(|m| rows.next().map(|r| (m, r)));
            let height = if marker_row.is_some() { 2 } else { 1 };
            let padding = self.sizes.padding_columns().min(area.width / 2);
            let container = Rect {
                x: number_row.x + padding,
                y: number_row.y,
                width: number_row.width - padding * 2,
                height,
            };
            buf.set_style(container, self.style.container.to_style());
            let number_area = Rect {
                height: 1,
                ..container
            };
            let day = Span::styled(self.date.day().to_string(), number_style.to_style());
            let number = if self.style.container.has_border() {
                let border = self.style.container.border_style();
                Line::from(vec![
                    Span::styled("[", border),
                    day,
                    Span::styled("]", border),
                ])
            } else {
                Line::from(day)
            };
            number.centered().render(number_area, buf);
            if let Some((markers, row)) = marker_row {
                let row = Rect {
                    x: container.x,
                    width: container.width,
                    ..row
                };
                markers.render(row, buf);
            }
        }
    }
}

/// Two-letter upper-case weekday abbreviation, e.g. "WE"
fn day_name(date: Date) -> String {
    date.weekday()
        .to_string()
        .chars()
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
