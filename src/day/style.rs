use super::DayCellInput;
use super::animation::{AnimationKind, AnimationSpec};
use super::triangle;
use crate::config::ConfigError;
use crate::theme::{self, fragments};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use time::{Date, Weekday};

const DEFAULT_HIGHLIGHT_FONT_SIZE: f64 = 14.0;

/// Something that can be layered on top of another value of the same type,
/// with the upper layer winning wherever it says anything
pub(crate) trait Patch: Copy + Default {
    fn patch(self, other: Self) -> Self;
}

/// Style fragment for the day-name and day-number texts
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TextStyle {
    pub(crate) color: Option<Color>,
    pub(crate) font_size: Option<f64>,
    pub(crate) margin_top: Option<f64>,
    pub(crate) modifier: Modifier,
}

impl TextStyle {
    pub(crate) const fn new() -> TextStyle {
        TextStyle {
            color: None,
            font_size: None,
            margin_top: None,
            modifier: Modifier::empty(),
        }
    }

    pub(crate) const fn color(mut self, color: Color) -> TextStyle {
        self.color = Some(color);
        self
    }

    pub(crate) const fn font_size(mut self, size: f64) -> TextStyle {
        self.font_size = Some(size);
        self
    }

    pub(crate) const fn margin_top(mut self, margin: f64) -> TextStyle {
        self.margin_top = Some(margin);
        self
    }

    pub(crate) const fn add_modifier(mut self, modifier: Modifier) -> TextStyle {
        self.modifier = self.modifier.union(modifier);
        self
    }

    pub(crate) fn to_style(self) -> Style {
        let style = Style::new().add_modifier(self.modifier);
        match self.color {
            Some(c) => style.fg(c),
            None => style,
        }
    }
}

impl Patch for TextStyle {
    fn patch(self, other: TextStyle) -> TextStyle {
        TextStyle {
            color: other.color.or(self.color),
            font_size: other.font_size.or(self.font_size),
            margin_top: other.margin_top.or(self.margin_top),
            modifier: self.modifier | other.modifier,
        }
    }
}

/// Style fragment for the box holding the day number and its markers
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ContainerStyle {
    pub(crate) background: Option<Color>,
    pub(crate) opacity: Option<f64>,
    pub(crate) border_color: Option<Color>,
    pub(crate) border_width: Option<f64>,
}

impl ContainerStyle {
    pub(crate) const fn new() -> ContainerStyle {
        ContainerStyle {
            background: None,
            opacity: None,
            border_color: None,
            border_width: None,
        }
    }

    pub(crate) const fn background(mut self, color: Color) -> ContainerStyle {
        self.background = Some(color);
        self
    }

    pub(crate) const fn opacity(mut self, opacity: f64) -> ContainerStyle {
        self.opacity = Some(opacity);
        self
    }

    pub(crate) const fn border(mut self, color: Color, width: f64) -> ContainerStyle {
        self.border_color = Some(color);
        self.border_width = Some(width);
        self
    }

    /// Whether a border should be drawn around the container's content
    pub(crate) fn has_border(&self) -> bool {
        self.border_width.is_some_and(|w| w > 0.0)
    }

    /// Whether the container is drawn faded
    pub(crate) fn is_faded(&self) -> bool {
        self.opacity.is_some_and(|o| o < 1.0)
    }

    pub(crate) fn to_style(self) -> Style {
        let style = Style::new();
        let style = match self.background {
            Some(c) if c != theme::TRANSPARENT => style.bg(c),
            _ => style,
        };
        if self.is_faded() {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        }
    }

    pub(crate) fn border_style(&self) -> Style {
        match self.border_color {
            Some(c) => Style::new().fg(c),
            None => Style::new(),
        }
    }
}

impl Patch for ContainerStyle {
    fn patch(self, other: ContainerStyle) -> ContainerStyle {
        ContainerStyle {
            background: other.background.or(self.background),
            opacity: other.opacity.or(self.opacity),
            border_color: other.border_color.or(self.border_color),
            border_width: other.border_width.or(self.border_width),
        }
    }
}

/// Per-cell overrides that win over every other layer
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CustomStyle {
    pub(crate) date_container_style: ContainerStyle,
    pub(crate) date_name_style: TextStyle,
    pub(crate) date_number_style: TextStyle,
}

/// The precedence step that contributed a fragment, lowest first
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) enum Layer {
    Base,
    Selection,
    Weekend,
    Highlight,
    SelectionAnimation,
    Today,
    TodayAnimation,
    CurrentDay,
    Custom,
}

/// An ordered list of style fragments; later entries win
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Cascade<F> {
    layers: Vec<(Layer, F)>,
}

impl<F: Patch> Cascade<F> {
    pub(crate) fn new() -> Cascade<F> {
        Cascade { layers: Vec::new() }
    }

    pub(crate) fn push(&mut self, layer: Layer, fragment: F) {
        self.layers.push((layer, fragment));
    }

    /// Discard everything pushed so far
    pub(crate) fn reset(&mut self) {
        self.layers.clear();
    }

    pub(crate) fn layers(&self) -> impl Iterator<Item = Layer> + '_ {
        self.layers.iter().map(|&(layer, _)| layer)
    }

    pub(crate) fn resolve(&self) -> F {
        self.layers
            .iter()
            .fold(F::default(), |acc, &(_, fragment)| acc.patch(fragment))
    }
}

/// The structural fragment of a text row plus the configured override laid
/// over it
#[derive(Clone, Copy, Debug, PartialEq)]
struct RowFragments {
    name_base: TextStyle,
    name: TextStyle,
    number_base: TextStyle,
    number: TextStyle,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Rows {
    name: Cascade<TextStyle>,
    number: Cascade<TextStyle>,
}

impl Rows {
    // Rows are always recomputed from their structural base, never layered
    // on top of a previous step
    fn restart(&mut self, layer: Layer, fragments: RowFragments) {
        self.name.reset();
        self.name.push(layer, fragments.name_base);
        self.name.push(layer, fragments.name);
        self.number.reset();
        self.number.push(layer, fragments.number_base);
        self.number.push(layer, fragments.number);
    }
}

/// The configuration surface a parent grid hands to every day cell
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DayCellOptions {
    pub(crate) show_day_name: bool,
    pub(crate) show_day_number: bool,
    pub(crate) calendar_color: Option<Color>,
    pub(crate) style_weekend: bool,
    pub(crate) disabled_date_opacity: f64,
    /// Carried for hosts that scale text; a terminal cannot
    pub(crate) allow_day_text_scaling: bool,
    pub(crate) date_name_style: TextStyle,
    pub(crate) date_number_style: TextStyle,
    pub(crate) weekend_date_name_style: TextStyle,
    pub(crate) weekend_date_number_style: TextStyle,
    pub(crate) highlight_date_name_style: TextStyle,
    pub(crate) highlight_date_number_style: TextStyle,
    pub(crate) disabled_date_name_style: TextStyle,
    pub(crate) disabled_date_number_style: TextStyle,
    pub(crate) custom_style: Option<CustomStyle>,
    pub(crate) day_selection_animation: AnimationSpec,
}

impl Default for DayCellOptions {
    fn default() -> DayCellOptions {
        DayCellOptions {
            show_day_name: true,
            show_day_number: true,
            calendar_color: None,
            style_weekend: true,
            disabled_date_opacity: 1.0,
            allow_day_text_scaling: true,
            date_name_style: TextStyle::new(),
            date_number_style: TextStyle::new(),
            weekend_date_name_style: TextStyle::new(),
            weekend_date_number_style: TextStyle::new(),
            highlight_date_name_style: TextStyle::new().color(Color::Yellow),
            highlight_date_number_style: TextStyle::new()
                .color(Color::Yellow)
                .font_size(DEFAULT_HIGHLIGHT_FONT_SIZE)
                .add_modifier(Modifier::BOLD),
            disabled_date_name_style: TextStyle::new().color(Color::DarkGray),
            disabled_date_number_style: TextStyle::new().color(Color::DarkGray),
            custom_style: None,
            day_selection_animation: AnimationSpec::default(),
        }
    }
}

/// [`DayCellOptions`] that have been checked for everything style resolution
/// relies on
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DayStyles {
    options: DayCellOptions,
    current_day_font_size: f64,
}

impl DayStyles {
    pub(crate) fn new(options: DayCellOptions) -> Result<DayStyles, ConfigError> {
        let Some(current_day_font_size) = options.highlight_date_number_style.font_size else {
            return Err(ConfigError::MissingHighlightFontSize);
        };
        let opacity = options.disabled_date_opacity;
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ConfigError::InvalidOpacity(opacity));
        }
        Ok(DayStyles {
            options,
            current_day_font_size,
        })
    }

    pub(crate) fn options(&self) -> &DayCellOptions {
        &self.options
    }

    pub(crate) fn animation(&self) -> &AnimationSpec {
        &self.options.day_selection_animation
    }

    /// Resolve the final styles of a cell.  `is_today` says whether
    /// `input.date` is the current day.
    pub(crate) fn resolve(&self, input: &DayCellInput<'_>, is_today: bool) -> ResolvedStyle {
        let opts = &self.options;
        let mut rows = Rows::default();
        let mut container = Cascade::new();

        rows.restart(
            Layer::Base,
            if input.enabled {
                self.default_fragments()
            } else {
                RowFragments {
                    name_base: fragments::DATE_NAME,
                    name: opts.disabled_date_name_style,
                    number_base: fragments::DATE_NUMBER,
                    number: opts.disabled_date_number_style,
                }
            },
        );
        container.push(
            Layer::Base,
            if input.enabled {
                fragments::ENABLED_CONTAINER
            } else {
                ContainerStyle::new().opacity(opts.disabled_date_opacity)
            },
        );

        if input.enabled && input.selected {
            if let Some(fragment) = self.animation_fragment(Layer::SelectionAnimation) {
                container.push(Layer::SelectionAnimation, fragment);
            }
            let (layer, weekday) = self.weekday_fragments(input.date, Layer::Selection);
            rows.restart(layer, weekday);
            rows.restart(
                Layer::Highlight,
                RowFragments {
                    name_base: fragments::DATE_NAME,
                    name: opts.highlight_date_name_style,
                    number_base: fragments::DATE_NUMBER,
                    number: opts.highlight_date_number_style,
                },
            );
        }

        // Applies regardless of `enabled`, so a disabled current day still
        // gets the current-day accents
        if is_today {
            if let Some(fragment) = self.animation_fragment(Layer::TodayAnimation) {
                container.push(Layer::TodayAnimation, fragment);
            }
            let (layer, weekday) = self.weekday_fragments(input.date, Layer::Today);
            rows.restart(layer, weekday);
            let accent = if input.selected {
                theme::CURRENT_DAY_SELECTED
            } else {
                theme::CURRENT_DAY_UNSELECTED
            };
            rows.restart(
                Layer::CurrentDay,
                RowFragments {
                    name_base: fragments::DATE_NAME,
                    name: TextStyle::new().color(accent),
                    number_base: fragments::DATE_NUMBER,
                    number: TextStyle::new()
                        .font_size(self.current_day_font_size)
                        .margin_top(theme::CURRENT_DAY_NUMBER_MARGIN)
                        .color(accent),
                },
            );
            container.push(
                Layer::CurrentDay,
                ContainerStyle::new().background(theme::TRANSPARENT),
            );
        }

        if let Some(custom) = opts.custom_style {
            container.push(Layer::Custom, custom.date_container_style);
            rows.name.push(Layer::Custom, custom.date_name_style);
            rows.number.push(Layer::Custom, custom.date_number_style);
        }

        ResolvedStyle {
            name: rows.name.resolve(),
            number: rows.number.resolve(),
            container: container.resolve(),
            container_layers: container.layers().collect(),
            triangle_visible: triangle::is_visible(
                opts.show_day_name,
                opts.show_day_number,
                input.selected,
            ),
        }
    }

    fn default_fragments(&self) -> RowFragments {
        RowFragments {
            name_base: fragments::DATE_NAME,
            name: self.options.date_name_style,
            number_base: fragments::DATE_NUMBER,
            number: self.options.date_number_style,
        }
    }

    /// The fragments for `date` before any highlighting, along with the
    /// layer they count as: `default_layer`, or [`Layer::Weekend`] when the
    /// weekend substitution applies
    fn weekday_fragments(&self, date: Date, default_layer: Layer) -> (Layer, RowFragments) {
        if self.options.style_weekend && is_weekend(date.weekday()) {
            (
                Layer::Weekend,
                RowFragments {
                    name_base: fragments::WEEKEND_DATE_NAME,
                    name: self.options.weekend_date_name_style,
                    number_base: fragments::WEEKEND_DATE_NUMBER,
                    number: self.options.weekend_date_number_style,
                },
            )
        } else {
            (default_layer, self.default_fragments())
        }
    }

    // For the background kind, a selected day's color comes from the
    // transition itself while the current day always uses the highlight
    // color.
    fn animation_fragment(&self, layer: Layer) -> Option<ContainerStyle> {
        let anim = self.animation();
        match anim.kind {
            AnimationKind::Background if layer == Layer::TodayAnimation => {
                Some(ContainerStyle::new().background(anim.highlight_color))
            }
            AnimationKind::Background => Some(ContainerStyle::new().background(theme::TRANSPARENT)),
            AnimationKind::Border => {
                let (color, width) = (anim.border_highlight_color, anim.border_width);
                Some(ContainerStyle::new().border(color, width))
            }
            AnimationKind::None => None,
        }
    }
}

impl Default for DayStyles {
    fn default() -> DayStyles {
        DayStyles {
            options: DayCellOptions::default(),
            current_day_font_size: DEFAULT_HIGHLIGHT_FONT_SIZE,
        }
    }
}

/// Saturday or Sunday (6 and 7 counting from Monday as 1)
pub(crate) fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday.number_from_monday(), 6 | 7)
}

/// The styles of one render of a cell
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ResolvedStyle {
    pub(crate) name: TextStyle,
    pub(crate) number: TextStyle,
    pub(crate) container: ContainerStyle,
    /// Layers that contributed to `container`, in application order
    pub(crate) container_layers: Vec<Layer>,
    pub(crate) triangle_visible: bool,
}
