use crate::theme::DOT_GLYPH;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};
use serde::Deserialize;
use time::Date;

/// One dot shown beneath a day number.  A dot without a color is never
/// drawn.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DotSpec {
    pub(crate) key: Option<String>,
    pub(crate) color: Option<Color>,
    pub(crate) selected_dot_color: Option<Color>,
}

/// Decoration data for a single date
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub(crate) struct Marking {
    pub(crate) dots: Vec<DotSpec>,
    pub(crate) selected: bool,
}

/// A [`Marking`] attached to the date it decorates
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct MarkedDate {
    #[serde(deserialize_with = "crate::config::deserialize_date")]
    pub(crate) date: Date,
    #[serde(flatten)]
    pub(crate) marking: Marking,
}

/// Identity of a rendered marker: the dot's own key, or else its position
/// among the dots that survived filtering.
///
/// Positional identity changes whenever dots are added, removed or
/// reordered.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum MarkerKey {
    Key(String),
    Index(usize),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MarkerView {
    pub(crate) key: MarkerKey,
    pub(crate) color: Color,
}

impl MarkerView {
    fn to_span(&self) -> Span<'static> {
        Span::styled(String::from(DOT_GLYPH), Style::new().fg(self.color))
    }
}

/// The row of markers under a day number.  An empty row still takes up its
/// line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MarkerRow {
    pub(crate) markers: Vec<MarkerView>,
}

impl MarkerRow {
    /// Returns `None` when no date in the calendar is marked, in which case
    /// no row is reserved at all
    pub(crate) fn build(
        marked_dates_present: bool,
        marking: Option<&Marking>,
    ) -> Option<MarkerRow> {
        if !marked_dates_present {
            return None;
        }
        let Some(marking) = marking else {
            return Some(MarkerRow::default());
        };
        let markers = marking
            .dots
            .iter()
            .filter_map(|dot| dot.color.map(|color| (dot, color)))
            .enumerate()
            .map(|(i, (dot, color))| MarkerView {
                key: match dot.key {
                    Some(ref k) => MarkerKey::Key(k.clone()),
                    None => MarkerKey::Index(i),
                },
                color: match dot.selected_dot_color {
                    Some(c) if marking.selected => c,
                    _ => color,
                },
            })
            .collect();
        Some(MarkerRow { markers })
    }

    pub(crate) fn is_placeholder(&self) -> bool {
        self.markers.is_empty()
    }

    fn to_line(&self) -> Line<'static> {
        let spans = self.markers.iter().map(MarkerView::to_span);
        Line::from_iter(spans).centered()
    }
}

impl Widget for &MarkerRow {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.is_placeholder() {
            self.to_line().render(area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn dot(key: Option<&str>, color: Option<Color>, selected_dot_color: Option<Color>) -> DotSpec {
        DotSpec {
            key: key.map(String::from),
            color,
            selected_dot_color,
        }
    }

    #[test]
    fn test_nothing_marked() {
        let marking = Marking {
            dots: vec![dot(Some("a"), Some(Color::Red), None)],
            selected: false,
        };
        assert_eq!(MarkerRow::build(false, Some(&marking)), None);
        assert_eq!(MarkerRow::build(false, None), None);
    }

    #[test]
    fn test_placeholder() {
        let row = MarkerRow::build(true, Some(&Marking::default())).unwrap();
        assert!(row.is_placeholder());
        assert_eq!(MarkerRow::build(true, None), Some(MarkerRow::default()));
    }

    #[test]
    fn test_colorless_dots_dropped() {
        let marking = Marking {
            dots: vec![
                dot(None, None, None),
                dot(Some("a"), Some(Color::Red), None),
            ],
            selected: false,
        };
        let row = MarkerRow::build(true, Some(&marking)).unwrap();
        assert_eq!(
            row.markers,
            [MarkerView {
                key: MarkerKey::Key(String::from("a")),
                color: Color::Red,
            }]
        );
    }

    #[test]
    fn test_index_keys_count_filtered_dots() {
        let marking = Marking {
            dots: vec![
                dot(None, Some(Color::Red), None),
                dot(None, None, Some(Color::Blue)),
                dot(None, Some(Color::Green), None),
            ],
            selected: false,
        };
        let row = MarkerRow::build(true, Some(&marking)).unwrap();
        assert_eq!(
            row.markers,
            [
                MarkerView {
                    key: MarkerKey::Index(0),
                    color: Color::Red,
                },
                MarkerView {
                    key: MarkerKey::Index(1),
                    color: Color::Green,
                },
            ]
        );
    }

    #[test]
    fn test_selected_dot_color() {
        let dots = vec![
            dot(Some("a"), Some(Color::Red), Some(Color::White)),
            dot(Some("b"), Some(Color::Green), None),
        ];
        let unselected = Marking {
            dots: dots.clone(),
            selected: false,
        };
        let colors = MarkerRow::build(true, Some(&unselected))
            .unwrap()
            .markers
            .into_iter()
            .map(|m| m.color)
            .collect::<Vec<_>>();
        assert_eq!(colors, [Color::Red, Color::Green]);
        let selected = Marking {
            dots,
            selected: true,
        };
        let colors = MarkerRow::build(true, Some(&selected))
            .unwrap()
            .markers
            .into_iter()
            .map(|m| m.color)
            .collect::<Vec<_>>();
        assert_eq!(colors, [Color::White, Color::Green]);
    }

    #[test]
    fn test_render() {
        let marking = Marking {
            dots: vec![
                dot(None, Some(Color::Red), None),
                dot(None, Some(Color::Blue), None),
            ],
            selected: false,
        };
        let row = MarkerRow::build(true, Some(&marking)).unwrap();
        let area = Rect::new(0, 0, 6, 1);
        let mut buffer = Buffer::empty(area);
        row.render(area, &mut buffer);
        let mut expected = Buffer::with_lines(["  ••  "]);
        expected.set_style(Rect::new(2, 0, 1, 1), Style::new().fg(Color::Red));
        expected.set_style(Rect::new(3, 0, 1, 1), Style::new().fg(Color::Blue));
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_parse_marked_date() {
        let marked: MarkedDate = toml::from_str(
            r##"
            date = "2026-10-14"
            selected = true
            dots = [
                { key = "work", color = "#ff0000", selected_dot_color = "white" },
                { color = "blue" },
            ]
            "##,
        )
        .unwrap();
        assert_eq!(marked.date, date!(2026 - 10 - 14));
        assert!(marked.marking.selected);
        assert_eq!(
            marked.marking.dots,
            [
                dot(
                    Some("work"),
                    Some(Color::Rgb(0xFF, 0, 0)),
                    Some(Color::White)
                ),
                dot(None, Some(Color::Blue), None),
            ]
        );
    }
}
