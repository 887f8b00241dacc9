//! Basic input state types.

use bitflags::bitflags;

/// Analog stick state with X and Y coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalogStickState {
    pub x: i32,
    pub y: i32,
}

bitflags! {
    /// Npad button state bits, as reported in [`NpadCommonState::buttons`].
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct NpadButton: u64 {
        const A = 1 << 0;
        const B = 1 << 1;
        const X = 1 << 2;
        const Y = 1 << 3;
        const STICK_L = 1 << 4;
        const STICK_R = 1 << 5;
        const L = 1 << 6;
        const R = 1 << 7;
        const ZL = 1 << 8;
        const ZR = 1 << 9;
        const PLUS = 1 << 10;
        const MINUS = 1 << 11;
        const LEFT = 1 << 12;
        const UP = 1 << 13;
        const RIGHT = 1 << 14;
        const DOWN = 1 << 15;
        const STICK_L_LEFT = 1 << 16;
        const STICK_L_UP = 1 << 17;
        const STICK_L_RIGHT = 1 << 18;
        const STICK_L_DOWN = 1 << 19;
        const STICK_R_LEFT = 1 << 20;
        const STICK_R_UP = 1 << 21;
        const STICK_R_RIGHT = 1 << 22;
        const STICK_R_DOWN = 1 << 23;
        const LEFT_SL = 1 << 24;
        const LEFT_SR = 1 << 25;
        const RIGHT_SL = 1 << 26;
        const RIGHT_SR = 1 << 27;
        const PALMA = 1 << 28;
        const VERIFICATION = 1 << 29;
        const HANDHELD_LEFT_B = 1 << 30;

        /// SL on either Joy-Con.
        const ANY_SL = Self::LEFT_SL.bits() | Self::RIGHT_SL.bits();
        /// SR on either Joy-Con.
        const ANY_SR = Self::LEFT_SR.bits() | Self::RIGHT_SR.bits();
    }
}

bitflags! {
    /// Controller styles an Npad entry can report.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct NpadStyleTag: u32 {
        const FULL_KEY = 1 << 0;
        const HANDHELD = 1 << 1;
        const JOY_DUAL = 1 << 2;
        const JOY_LEFT = 1 << 3;
        const JOY_RIGHT = 1 << 4;
        const GC = 1 << 5;
        const PALMA = 1 << 6;
        const SYSTEM_EXT = 1 << 29;
        const SYSTEM = 1 << 30;
    }
}

/// One Npad input sample.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NpadCommonState {
    pub sampling_number: u64,
    pub buttons: u64,
    pub analog_stick_l: AnalogStickState,
    pub analog_stick_r: AnalogStickState,
    /// Connection attribute bits, not interpreted by this crate.
    pub attributes: u32,
    pub reserved: u32,
}

impl NpadCommonState {
    #[inline]
    pub fn buttons(&self) -> NpadButton {
        NpadButton::from_bits_retain(self.buttons)
    }
}

/// LIFO storage slot wrapping an [`NpadCommonState`].
///
/// The leading sampling number is rewritten by the HID sysmodule after the state, which lets
/// readers detect a slot overwritten mid-read.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NpadCommonStateAtomicStorage {
    pub sampling_number: u64,
    pub state: NpadCommonState,
}

/// Trait for input state types that can be read from LIFO buffers.
pub trait InputState: Sized {
    /// The atomic storage type for this state.
    ///
    /// Must be `repr(C)` and start with the slot's `u64` sampling number.
    type Storage;

    /// Extract the sampling number from the state for consistency checking.
    fn sampling_number(&self) -> u64;

    /// Load the state from atomic storage.
    ///
    /// # Safety
    ///
    /// Caller must ensure the storage pointer is valid and aligned.
    unsafe fn load_from_storage(storage: &Self::Storage) -> Self;
}

impl InputState for NpadCommonState {
    type Storage = NpadCommonStateAtomicStorage;

    #[inline]
    fn sampling_number(&self) -> u64 {
        self.sampling_number
    }

    #[inline]
    unsafe fn load_from_storage(storage: &Self::Storage) -> Self {
        // SAFETY: `storage` is a valid reference; the volatile read keeps the compiler from
        // reusing a value loaded before the hardware refreshed the slot.
        unsafe { core::ptr::read_volatile(&storage.state) }
    }
}
