//! Shared memory layout and access for the HID service.

pub mod layout;
pub mod lifo;
pub mod npad;
pub mod types;

pub use layout::HidSharedMemory;
pub use lifo::{HidCommonLifoHeader, get_latest, get_states};
pub use npad::{NpadCommonLifo, NpadInternalState, NpadSharedMemory};
pub use types::*;
