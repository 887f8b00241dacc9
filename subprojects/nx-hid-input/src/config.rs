//! Joystick configuration, resolved once when the device is opened.

/// Axes exposed by the logical joystick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisCount {
    /// Left stick only.
    Two,
    /// Both sticks.
    #[default]
    Four,
}

impl AxisCount {
    #[inline]
    pub const fn get(self) -> usize {
        match self {
            AxisCount::Two => 2,
            AxisCount::Four => 4,
        }
    }
}

/// Joystick configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickConfig {
    pub axes: AxisCount,
    /// Clamp merged axis readings into the `i16` range. When disabled the reading is truncated
    /// to its low 16 bits.
    pub clamp_axes: bool,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            axes: AxisCount::Four,
            clamp_axes: true,
        }
    }
}
