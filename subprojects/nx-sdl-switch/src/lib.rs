//! # nx-sdl-switch
//!
//! Nintendo Switch platform backends for a multimedia abstraction layer: window framebuffer
//! presentation through VI layers and HID joystick input.
#![no_std]

pub mod result {
    pub use nx_result::*;
}
#[cfg(feature = "video")]
pub mod video {
    pub use nx_vi_present::*;
}
#[cfg(feature = "joystick")]
pub mod joystick {
    pub use nx_hid_input::*;
}
