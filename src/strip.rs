use crate::config::Config;
use crate::day::{
    CELL_LINES, DayCell, DayCellInput, DayCellView, DayStyles, LoggedTransitions, MarkedDate,
};
use crate::theme::{FOCUS_STYLE, HEADER_STYLE};
use ratatui::{layout::Flex, prelude::*, widgets::StatefulWidget};
use std::iter::successors;
use thiserror::Error;
use time::{Date, Weekday};

const DAYS_IN_WEEK: usize = 7;

/// Number of columns per day
const DAY_WIDTH: u16 = 7;

/// Number of lines above the cells taken up by the month header
const HEADER_LINES: u16 = 1;

/// Total number of lines the strip needs
pub(crate) const STRIP_LINES: u16 = HEADER_LINES + CELL_LINES + 1;

const FOCUS_CHAR: char = '─';

trait WeekdayExt {
    fn index0(&self) -> usize;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> usize {
        self.number_days_from_monday().into()
    }
}

/// One week of selectable days, Monday first
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct WeekStrip {
    today: Date,
    selected: Date,
    focus: Date,
    size: f64,
    min_date: Option<Date>,
    max_date: Option<Date>,
    styles: DayStyles,
    marked_dates: Vec<MarkedDate>,
    cells: Vec<DayCell>,
    transitions: LoggedTransitions,
}

impl WeekStrip {
    pub(crate) fn new(today: Date, config: Config) -> WeekStrip {
        WeekStrip {
            today,
            selected: today,
            focus: today,
            size: config.size,
            min_date: config.min_date,
            max_date: config.max_date,
            styles: config.styles,
            marked_dates: config.marked_dates,
            cells: Vec::new(),
            transitions: LoggedTransitions::new(),
        }
    }

    pub(crate) fn start_date(mut self, date: Date) -> Self {
        self.selected = date;
        self.focus = date;
        self
    }

    pub(crate) fn selected(&self) -> Date {
        self.selected
    }

    pub(crate) fn focus(&self) -> Date {
        self.focus
    }

    pub(crate) fn transitions(&self) -> &LoggedTransitions {
        &self.transitions
    }

    pub(crate) fn is_enabled(&self, date: Date) -> bool {
        self.min_date.is_none_or(|d| d <= date) && self.max_date.is_none_or(|d| date <= d)
    }

    fn marking_for(&self, date: Date) -> Option<&MarkedDate> {
        self.marked_dates.iter().find(|md| md.date == date)
    }

    /// The dates of the focused week that exist, in order
    pub(crate) fn week(&self) -> Vec<Date> {
        let i = self.focus.weekday().index0();
        let mut week = successors(Some(self.focus), |d| d.previous_day())
            .take(i + 1)
            .collect::<Vec<_>>();
        week.reverse();
        week.extend(
            successors(Some(self.focus), |d| d.next_day())
                .skip(1)
                .take(DAYS_IN_WEEK - i - 1),
        );
        week
    }

    fn input(&self, date: Date) -> DayCellInput<'_> {
        DayCellInput {
            date,
            selected: date == self.selected,
            enabled: self.is_enabled(date),
            size: self.size,
            marking: self.marking_for(date).map(|md| &md.marking),
            marked_dates: &self.marked_dates,
        }
    }

    /// Bring the day cells in line with the current week and selection.
    /// Cells for a new week start fresh; cells that stay get updated, which
    /// requests a transition for each one whose selection flipped.
    pub(crate) fn sync(&mut self) {
        let week = self.week();
        if self.cells.iter().map(DayCell::date).ne(week.iter().copied()) {
            log::debug!("Building cells for week of {}", week[0]);
            self.cells = week.iter().map(|&d| DayCell::new(&self.input(d))).collect();
            return;
        }
        let mut cells = std::mem::take(&mut self.cells);
        let mut transitions = self.transitions;
        for cell in &mut cells {
            let input = self.input(cell.date());
            if cell.update(&input, self.styles.animation(), &mut transitions) {
                log::debug!(
                    "Updated cell for {} (selected: {})",
                    cell.date(),
                    cell.is_selected()
                );
            }
        }
        self.cells = cells;
        self.transitions = transitions;
    }

    pub(crate) fn focus_next_day(&mut self) -> Result<(), OutOfTimeError> {
        self.focus = self.focus.next_day().ok_or(OutOfTimeError)?;
        Ok(())
    }

    pub(crate) fn focus_previous_day(&mut self) -> Result<(), OutOfTimeError> {
        self.focus = self.focus.previous_day().ok_or(OutOfTimeError)?;
        Ok(())
    }

    pub(crate) fn one_week_forwards(&mut self) -> Result<(), OutOfTimeError> {
        self.focus = self
            .focus
            .checked_add(time::Duration::WEEK)
            .ok_or(OutOfTimeError)?;
        Ok(())
    }

    pub(crate) fn one_week_backwards(&mut self) -> Result<(), OutOfTimeError> {
        self.focus = self
            .focus
            .checked_sub(time::Duration::WEEK)
            .ok_or(OutOfTimeError)?;
        Ok(())
    }

    pub(crate) fn jump_to_today(&mut self) {
        self.focus = self.today;
    }

    /// Press the focused day's cell.  Returns `false` if the day is
    /// disabled.
    pub(crate) fn press_focused(&mut self) -> bool {
        if !self.is_enabled(self.focus) {
            return false;
        }
        self.sync();
        let mut pressed = None;
        if let Some(cell) = self.cells.iter().find(|c| c.date() == self.focus) {
            cell.press(|date| pressed = Some(date));
        }
        match pressed {
            Some(date) => {
                log::debug!("Selected {date}");
                self.selected = date;
                true
            }
            None => false,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Strip;

impl StatefulWidget for Strip {
    type State = WeekStrip;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if let Some(color) = state.styles.options().calendar_color {
            buf.set_style(area, Style::new().bg(color));
        }
        state.sync();
        let [header, cells, focus_line] =
            Layout::vertical([HEADER_LINES, CELL_LINES, 1]).areas(area);
        let focus = state.focus();
        let title = format!("{} {}", focus.month(), focus.year());
        Line::from(Span::styled(title, HEADER_STYLE))
            .centered()
            .render(header, buf);
        let columns = Layout::horizontal([DAY_WIDTH; DAYS_IN_WEEK])
            .flex(Flex::Center)
            .split(cells);
        for cell in &state.cells {
            let col = columns[cell.date().weekday().index0()];
            let input = state.input(cell.date());
            DayCellView::new(cell, &input, &state.styles, cell.date() == state.today)
                .render(col, buf);
            if cell.date() == state.focus() {
                let underline = String::from(FOCUS_CHAR).repeat(usize::from(DAY_WIDTH - 2));
                let underline_area = Rect {
                    y: focus_line.y,
                    height: 1,
                    ..col
                };
                Line::from(Span::styled(underline, FOCUS_STYLE))
                    .centered()
                    .render(underline_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::DayCellOptions;
    use crate::day::animation::AnimationKind;
    use crate::theme::{CURRENT_DAY_SELECTED, TRIANGLE_COLOR};
    use time::macros::date;

    const TODAY: Date = date!(2026 - 10 - 14);

    fn strip() -> WeekStrip {
        WeekStrip::new(TODAY, Config::default())
    }

    fn border_config() -> Config {
        let mut options = DayCellOptions::default();
        options.day_selection_animation.kind = AnimationKind::Border;
        Config {
            styles: DayStyles::new(options).unwrap(),
            ..Config::default()
        }
    }

    #[test]
    fn test_week_is_monday_first() {
        let strip = strip();
        assert_eq!(
            strip.week(),
            [
                date!(2026 - 10 - 12),
                date!(2026 - 10 - 13),
                date!(2026 - 10 - 14),
                date!(2026 - 10 - 15),
                date!(2026 - 10 - 16),
                date!(2026 - 10 - 17),
                date!(2026 - 10 - 18),
            ]
        );
    }

    #[test]
    fn test_week_from_sunday() {
        let strip = strip().start_date(date!(2026 - 10 - 18));
        assert_eq!(strip.week()[0], date!(2026 - 10 - 12));
        assert_eq!(strip.week()[6], date!(2026 - 10 - 18));
    }

    #[test]
    fn test_week_at_end_of_time() {
        let strip = strip().start_date(Date::MAX);
        let week = strip.week();
        assert_eq!(week.last(), Some(&Date::MAX));
        assert!(week.len() <= DAYS_IN_WEEK);
    }

    #[test]
    fn test_navigation() {
        let mut strip = strip();
        strip.focus_next_day().unwrap();
        assert_eq!(strip.focus(), date!(2026 - 10 - 15));
        strip.one_week_forwards().unwrap();
        assert_eq!(strip.focus(), date!(2026 - 10 - 22));
        strip.one_week_backwards().unwrap();
        strip.focus_previous_day().unwrap();
        assert_eq!(strip.focus(), TODAY);
        strip.one_week_forwards().unwrap();
        strip.jump_to_today();
        assert_eq!(strip.focus(), TODAY);
        let mut strip = strip.start_date(Date::MAX);
        assert_eq!(strip.focus_next_day(), Err(OutOfTimeError));
        assert_eq!(strip.one_week_forwards(), Err(OutOfTimeError));
    }

    #[test]
    fn test_press_selects_focus() {
        let mut strip = WeekStrip::new(TODAY, border_config());
        strip.sync();
        strip.focus_next_day().unwrap();
        assert!(strip.press_focused());
        assert_eq!(strip.selected(), date!(2026 - 10 - 15));
        assert_eq!(strip.transitions().requests(), 0);
        // The old and new selections each flip once
        strip.sync();
        assert_eq!(strip.transitions().requests(), 2);
        strip.sync();
        assert_eq!(strip.transitions().requests(), 2);
    }

    #[test]
    fn test_render_applies_new_selection() {
        let mut strip = WeekStrip::new(TODAY, border_config());
        let area = Rect::new(0, 0, 49, STRIP_LINES);
        let mut buffer = Buffer::empty(area);
        Strip.render(area, &mut buffer, &mut strip);
        strip.focus_next_day().unwrap();
        assert!(strip.press_focused());
        assert_eq!(strip.transitions().requests(), 0);
        let mut buffer = Buffer::empty(area);
        Strip.render(area, &mut buffer, &mut strip);
        // Both flips were requested by the render that draws them
        assert_eq!(strip.transitions().requests(), 2);
        assert_eq!(buffer[(16, 1)].symbol(), " ");
        assert_eq!(buffer[(23, 1)].symbol(), "▼");
        assert_eq!(buffer[(22, 3)].symbol(), "[");
        assert_eq!(buffer[(23, 3)].fg, Color::Yellow);
    }

    #[test]
    fn test_new_week_starts_fresh() {
        let mut strip = WeekStrip::new(TODAY, border_config());
        strip.sync();
        strip.one_week_forwards().unwrap();
        strip.sync();
        assert_eq!(strip.transitions().requests(), 0);
        // Only the newly selected cell is on screen to flip
        assert!(strip.press_focused());
        strip.sync();
        assert_eq!(strip.transitions().requests(), 1);
    }

    #[test]
    fn test_disabled_press() {
        let mut strip = WeekStrip::new(
            TODAY,
            Config {
                min_date: Some(TODAY),
                ..Config::default()
            },
        );
        assert!(!strip.is_enabled(date!(2026 - 10 - 13)));
        assert!(strip.is_enabled(TODAY));
        strip.focus_previous_day().unwrap();
        assert!(!strip.press_focused());
        assert_eq!(strip.selected(), TODAY);
    }

    #[test]
    fn test_marking_lookup() {
        let config = Config {
            marked_dates: vec![MarkedDate {
                date: date!(2026 - 10 - 16),
                marking: crate::day::Marking::default(),
            }],
            ..Config::default()
        };
        let strip = WeekStrip::new(TODAY, config);
        assert!(strip.input(date!(2026 - 10 - 16)).marking.is_some());
        assert!(strip.input(TODAY).marking.is_none());
        assert_eq!(strip.input(TODAY).marked_dates.len(), 1);
    }

    #[test]
    fn test_render() {
        let mut strip = strip();
        let area = Rect::new(0, 0, 49, STRIP_LINES);
        let mut buffer = Buffer::empty(area);
        Strip.render(area, &mut buffer, &mut strip);
        let mut expected = Buffer::with_lines([
            "                  October 2026                   ",
            "                ▼                                ",
            "  MO     TU     WE     TH     FR     SA     SU   ",
            "  12     13     14     15     16     17     18   ",
            "                                                 ",
            "               ─────                             ",
        ]);
        expected.set_style(Rect::new(18, 0, 12, 1), HEADER_STYLE);
        let accent = Style::new().fg(CURRENT_DAY_SELECTED);
        expected.set_style(Rect::new(16, 1, 1, 1), Style::new().fg(TRIANGLE_COLOR));
        expected.set_style(Rect::new(16, 2, 2, 1), accent);
        for i in 0..7 {
            expected.set_style(Rect::new(2 + 7 * i, 3, 2, 1), Style::new().bold());
        }
        expected.set_style(Rect::new(16, 3, 2, 1), accent);
        expected.set_style(Rect::new(15, 5, 5, 1), FOCUS_STYLE);
        assert_eq!(buffer, expected);
    }
}
