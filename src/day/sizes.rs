/// Layout metrics of a day cell, all derived from its single `size`.
///
/// Values are rounded but kept as `f64` so that a degenerate (zero or
/// negative) size produces degenerate metrics instead of wrapping around.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct DerivedSizes {
    pub(crate) container_size: f64,
    pub(crate) container_padding: f64,
    pub(crate) container_border_radius: f64,
    pub(crate) name_font_size: f64,
    pub(crate) number_font_size: f64,
}

impl DerivedSizes {
    pub(crate) fn derive(size: f64) -> DerivedSizes {
        DerivedSizes {
            container_size: round_half_up(size),
            container_padding: round_half_up(size / 5.0),
            container_border_radius: round_half_up(size / 2.0),
            name_font_size: round_half_up(size / 5.0),
            number_font_size: round_half_up(size / 2.9),
        }
    }

    /// Number of terminal columns the cell occupies, clamped to `available`
    pub(crate) fn columns(&self, available: u16) -> u16 {
        to_columns(self.container_size).min(available)
    }

    /// Columns of padding on each side of the number container
    pub(crate) fn padding_columns(&self) -> u16 {
        to_columns(self.container_padding)
    }
}

/// Rounds to the nearest integer, with halves going towards positive
/// infinity, so `-2.5` becomes `-2.0`
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

// `value` is already rounded, and clamping keeps it within `u16`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_columns(value: f64) -> u16 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, f64::from(u16::MAX)) as u16
}
