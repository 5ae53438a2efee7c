use ratatui::style::Color;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_DURATION: Duration = Duration::from_millis(300);

/// Which visual side effect a selected (or current) day gets on its
/// container
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(from = "String")]
pub(crate) enum AnimationKind {
    #[default]
    None,
    Background,
    Border,
}

impl From<String> for AnimationKind {
    // Unknown kinds disable animation rather than failing
    fn from(s: String) -> AnimationKind {
        match s.as_str() {
            "background" => AnimationKind::Background,
            "border" => AnimationKind::Border,
            _ => AnimationKind::None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) enum Curve {
    Spring,
    Linear,
    #[default]
    EaseInEaseOut,
    EaseIn,
    EaseOut,
    Keyboard,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) enum AnimatedProperty {
    #[default]
    Opacity,
    ScaleX,
    ScaleY,
    #[serde(rename = "scaleXY")]
    ScaleXY,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AnimationSpec {
    #[serde(rename = "type")]
    pub(crate) kind: AnimationKind,
    #[serde(rename = "duration_ms", with = "millis")]
    pub(crate) duration: Duration,
    pub(crate) border_width: f64,
    pub(crate) border_highlight_color: Color,
    pub(crate) highlight_color: Color,
    pub(crate) anim_type: Curve,
    pub(crate) anim_update_type: Curve,
    pub(crate) anim_property: AnimatedProperty,
    /// Only meaningful when `anim_update_type` is [`Curve::Spring`]
    pub(crate) anim_spring_damping: Option<f64>,
}

impl Default for AnimationSpec {
    fn default() -> AnimationSpec {
        AnimationSpec {
            kind: AnimationKind::None,
            duration: DEFAULT_DURATION,
            border_width: 1.0,
            border_highlight_color: Color::Black,
            highlight_color: Color::Yellow,
            anim_type: Curve::EaseInEaseOut,
            anim_update_type: Curve::EaseInEaseOut,
            anim_property: AnimatedProperty::Opacity,
            anim_spring_damping: None,
        }
    }
}

impl AnimationSpec {
    /// Returns the transition to request when the selection flips, or
    /// `None` if animations are off
    pub(crate) fn transition(&self) -> Option<TransitionConfig> {
        if self.kind == AnimationKind::None {
            return None;
        }
        let duration = if self.duration.is_zero() {
            DEFAULT_DURATION
        } else {
            self.duration
        };
        let appear = PhaseConfig {
            curve: self.anim_type,
            property: self.anim_property,
        };
        Some(TransitionConfig {
            duration,
            create: appear,
            update: UpdateConfig {
                curve: self.anim_update_type,
                spring_damping: self.anim_spring_damping,
            },
            delete: appear,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PhaseConfig {
    pub(crate) curve: Curve,
    pub(crate) property: AnimatedProperty,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct UpdateConfig {
    pub(crate) curve: Curve,
    pub(crate) spring_damping: Option<f64>,
}

/// A request to animate the next layout change of a cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TransitionConfig {
    pub(crate) duration: Duration,
    pub(crate) create: PhaseConfig,
    pub(crate) update: UpdateConfig,
    pub(crate) delete: PhaseConfig,
}

/// The host's animation subsystem.  Requests are fire-and-forget; a later
/// request supersedes any transition still in flight.
pub(crate) trait TransitionScheduler {
    fn configure_next(&mut self, transition: TransitionConfig);
}

/// Scheduler used by the terminal program.  A terminal redraws atomically,
/// so the transition is only logged and remembered.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct LoggedTransitions {
    last: Option<TransitionConfig>,
    requests: usize,
}

impl LoggedTransitions {
    pub(crate) fn new() -> LoggedTransitions {
        LoggedTransitions::default()
    }

    pub(crate) fn last(&self) -> Option<TransitionConfig> {
        self.last
    }

    pub(crate) fn requests(&self) -> usize {
        self.requests
    }
}

impl TransitionScheduler for LoggedTransitions {
    fn configure_next(&mut self, transition: TransitionConfig) {
        log::debug!(
            "Configuring next transition: {}ms, create {:?}/{:?}, update {:?} (damping {:?})",
            transition.duration.as_millis(),
            transition.create.curve,
            transition.create.property,
            transition.update.curve,
            transition.update.spring_damping,
        );
        self.last = Some(transition);
        self.requests += 1;
    }
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Duration, D::Error> {
        u64::deserialize(de).map(Duration::from_millis)
    }
}
