//! Joystick input for the Nintendo Switch HID service.
//!
//! The HID sysmodule publishes controller samples into shared memory (0x40000 bytes) through
//! lock-free LIFO ring buffers. This crate:
//! - describes the Npad part of that layout and reads its latest samples ([`shmem`])
//! - takes a [`ControllerSnapshot`] of the handheld controller and of player 1 on every poll
//! - merges both into one logical joystick (button OR, axis bit-OR then clamp) and publishes only
//!   the channels that changed since the previous poll ([`LogicalControllerState`])
//!
//! The HID session and the host event queue are reached through the [`InputSubsystem`] and
//! [`EventSink`] traits.

#![no_std]

pub mod buttons;
pub mod config;
mod driver;
pub mod shmem;
pub mod snapshot;
pub mod state;

pub use self::{
    buttons::{BUTTON_COUNT, BUTTON_MAP, Button},
    config::{AxisCount, JoystickConfig},
    driver::{
        DEVICE_NAME, EventSink, InputSubsystem, Joystick, JoystickDriver, JoystickGuid, JoystickId,
        OpenError, PRIMARY_SLOT, SECONDARY_SLOT, UpdateError,
    },
    snapshot::{ControllerSlot, ControllerSnapshot, DeviceAddress, SnapshotProvider},
    state::{ChangeEvent, ChangeEvents, LogicalControllerState},
};
