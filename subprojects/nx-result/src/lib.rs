//! Horizon OS result codes reported by the display and input collaborators.
//!
//! The hardware-facing traits of `nx-vi-present` and `nx-hid-input` report failures as
//! a [`ResultCode`], the same 32-bit value the VI and HID services return over IPC.
//!
//! # Structure
//!
//! - **Bits 0-8:** Module ID
//! - **Bits 9-21:** Description
//! - **Bits 22-31:** Reserved
//!
//! # References
//! - [Switchbrew Wiki: Error Codes](https://switchbrew.org/wiki/Error_codes)

#![no_std]

/// Successful result code
const SUCCESS: u32 = 0;

/// Mask for the module field (9 bits)
const MODULE_MASK: u32 = 0x1FF;
/// Mask for the description field (13 bits)
const DESCRIPTION_MASK: u32 = 0x1FFF;
/// Shift amount for the description field
const DESCRIPTION_SHIFT: u32 = 9;

/// Modules this backend expects to see in a failing [`ResultCode`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u32)]
pub enum Module {
    Kernel = 1,
    Vi = 114,
    Nvidia = 140,
    Hid = 202,
    /// Module number reserved for errors raised by this backend itself.
    Libnx = 345,
}

impl Module {
    /// Maps a raw module number back to a known [`Module`].
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Self::Kernel),
            114 => Some(Self::Vi),
            140 => Some(Self::Nvidia),
            202 => Some(Self::Hid),
            345 => Some(Self::Libnx),
            _ => None,
        }
    }
}

/// A non-success Horizon OS result code.
///
/// # Formatting
///
/// The code is formatted as `2XXX-YYYY` where:
///  - `XXX` is `2000` + module number
///  - `YYYY` is the `description`
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ResultCode(u32);

impl ResultCode {
    /// Wraps a raw value, returning `None` for the success code.
    #[inline]
    pub const fn from_raw(value: u32) -> Option<Self> {
        if value == SUCCESS {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Builds a code from its module and description.
    ///
    /// A zero description is bumped to 1 so the value never collides with success.
    #[inline]
    pub const fn from_parts(module: Module, description: u32) -> Self {
        let module_val = (module as u32) & MODULE_MASK;
        let desc_val = (description & DESCRIPTION_MASK) << DESCRIPTION_SHIFT;
        let raw = module_val | desc_val;
        if raw == SUCCESS { Self(1) } else { Self(raw) }
    }

    /// Get the raw value of the [`ResultCode`]
    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    /// Returns the raw module number
    #[inline]
    pub const fn module_raw(&self) -> u32 {
        self.0 & MODULE_MASK
    }

    /// Returns the module that caused the error, if it is one this backend knows about
    #[inline]
    pub const fn module(&self) -> Option<Module> {
        Module::from_raw(self.module_raw())
    }

    /// Returns the description value
    #[inline]
    pub const fn description(&self) -> u32 {
        (self.0 >> DESCRIPTION_SHIFT) & DESCRIPTION_MASK
    }
}

impl core::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:04}-{:04}",
            2000 + self.module_raw(),
            self.description()
        )
    }
}

impl core::fmt::Debug for ResultCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResultCode")
            .field("code", &format_args!("{}", self))
            .field("module", &self.module())
            .field("description", &self.description())
            .field("raw", &format_args!("{:#x}", self.0))
            .finish()
    }
}

impl core::error::Error for ResultCode {}

/// Converts a raw IPC result into a [`core::result::Result`].
#[inline]
pub fn check(raw: u32) -> Result<(), ResultCode> {
    match ResultCode::from_raw(raw) {
        None => Ok(()),
        Some(rc) => Err(rc),
    }
}
