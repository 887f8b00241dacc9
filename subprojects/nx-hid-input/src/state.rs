//! Edge-triggered reconciliation of two controller snapshots into one logical device.

use crate::{
    buttons::{BUTTON_COUNT, Button},
    config::JoystickConfig,
    snapshot::ControllerSnapshot,
};

/// Most axes a logical joystick can expose.
pub const MAX_AXES: usize = 4;

/// Most events a single poll can produce.
pub const MAX_EVENTS: usize = MAX_AXES + BUTTON_COUNT;

/// Lowest reported axis value.
pub const AXIS_MIN: i32 = i16::MIN as i32;
/// Highest reported axis value.
pub const AXIS_MAX: i32 = i16::MAX as i32;

/// A channel transition detected by a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    AxisChanged { axis: u8, value: i16 },
    ButtonChanged { button: Button, pressed: bool },
}

/// Events of one poll: axis events in index order, then button events in index order.
pub type ChangeEvents = heapless::Vec<ChangeEvent, MAX_EVENTS>;

/// ORs two raw axis readings and narrows the result to the reported range.
///
/// The readings are merged as unsigned bit patterns and reinterpreted as signed before the
/// clamp, so a centered stick on one controller leaves the other's reading intact.
#[inline]
pub const fn merge_axis(primary: i32, secondary: i32, clamp: bool) -> i16 {
    let raw = (primary as u32 | secondary as u32) as i32;
    if !clamp {
        return raw as i16;
    }

    let clamped = if raw < AXIS_MIN {
        AXIS_MIN
    } else if raw > AXIS_MAX {
        AXIS_MAX
    } else {
        raw
    };
    clamped as i16
}

/// Previous-poll values of every logical channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalControllerState {
    config: JoystickConfig,
    axes: [i16; MAX_AXES],
    buttons: [bool; BUTTON_COUNT],
}

impl LogicalControllerState {
    /// All axes centered, all buttons released.
    pub const fn new(config: JoystickConfig) -> Self {
        Self {
            config,
            axes: [0; MAX_AXES],
            buttons: [false; BUTTON_COUNT],
        }
    }

    #[inline]
    pub fn config(&self) -> &JoystickConfig {
        &self.config
    }

    #[inline]
    pub fn num_axes(&self) -> usize {
        self.config.axes.get()
    }

    #[inline]
    pub fn num_buttons(&self) -> usize {
        BUTTON_COUNT
    }

    /// Last reported value of `axis`, or `None` past the configured axis count.
    #[inline]
    pub fn axis(&self, axis: usize) -> Option<i16> {
        self.axes[..self.num_axes()].get(axis).copied()
    }

    /// Last reported state of `button`.
    #[inline]
    pub fn button(&self, button: Button) -> bool {
        self.buttons[button.index()]
    }

    /// Merges the two snapshots and calls `emit` for every channel whose value changed.
    pub fn reconcile(
        &mut self,
        primary: &ControllerSnapshot,
        secondary: &ControllerSnapshot,
        mut emit: impl FnMut(ChangeEvent),
    ) {
        let primary_axes = primary.axes();
        let secondary_axes = secondary.axes();
        let num_axes = self.num_axes();

        for (axis, previous) in self.axes[..num_axes].iter_mut().enumerate() {
            let value = merge_axis(
                primary_axes[axis],
                secondary_axes[axis],
                self.config.clamp_axes,
            );
            if value != *previous {
                *previous = value;
                emit(ChangeEvent::AxisChanged {
                    axis: axis as u8,
                    value,
                });
            }
        }

        for button in Button::ALL {
            let pressed =
                button.is_pressed_in(primary.buttons) || button.is_pressed_in(secondary.buttons);
            let previous = &mut self.buttons[button.index()];
            if pressed != *previous {
                *previous = pressed;
                emit(ChangeEvent::ButtonChanged { button, pressed });
            }
        }
    }

    /// Merges the two snapshots and returns the resulting transitions.
    pub fn poll(
        &mut self,
        primary: &ControllerSnapshot,
        secondary: &ControllerSnapshot,
    ) -> ChangeEvents {
        let mut events = ChangeEvents::new();
        self.reconcile(primary, secondary, |event| {
            // One event per channel at most, which is exactly the capacity.
            let pushed = events.push(event);
            debug_assert!(pushed.is_ok());
        });
        events
    }
}
