//! HID shared memory layout (0x40000 bytes).
//!
//! Only the Npad section is typed; the other input devices are kept as opaque byte ranges to
//! pin the section offsets.

use super::npad::NpadSharedMemory;

/// Size of the HID shared memory region.
pub const HID_SHARED_MEMORY_SIZE: usize = 0x40000;

#[repr(C)]
pub struct HidDebugPadSharedMemoryFormat {
    _data: [u8; 0x400],
}

#[repr(C)]
pub struct HidTouchScreenSharedMemoryFormat {
    _data: [u8; 0x3000],
}

#[repr(C)]
pub struct HidMouseSharedMemoryFormat {
    _data: [u8; 0x400],
}

#[repr(C)]
pub struct HidKeyboardSharedMemoryFormat {
    _data: [u8; 0x400],
}

#[repr(C)]
pub struct HidDigitizerSharedMemoryFormat {
    _data: [u8; 0x1000],
}

#[repr(C)]
pub struct HidButtonSharedMemoryFormat {
    _data: [u8; 0x200],
}

#[repr(C)]
pub struct HidInputDetectorSharedMemoryFormat {
    _data: [u8; 0x800],
}

#[repr(C)]
pub struct HidUniquePadSharedMemoryFormat {
    _data: [u8; 0x4000],
}

#[repr(C)]
pub struct HidGestureSharedMemoryFormat {
    _data: [u8; 0x800],
}

#[repr(C)]
pub struct HidConsoleSixAxisSensor {
    _data: [u8; 0x20],
}

/// HID shared memory structure (0x40000 bytes).
#[repr(C)]
pub struct HidSharedMemory {
    pub debug_pad: HidDebugPadSharedMemoryFormat,
    pub touchscreen: HidTouchScreenSharedMemoryFormat,
    pub mouse: HidMouseSharedMemoryFormat,
    pub keyboard: HidKeyboardSharedMemoryFormat,
    pub digitizer: HidDigitizerSharedMemoryFormat,
    pub home_button: HidButtonSharedMemoryFormat,
    pub sleep_button: HidButtonSharedMemoryFormat,
    pub capture_button: HidButtonSharedMemoryFormat,
    pub input_detector: HidInputDetectorSharedMemoryFormat,
    pub unique_pad: HidUniquePadSharedMemoryFormat,
    pub npad: NpadSharedMemory,
    pub gesture: HidGestureSharedMemoryFormat,
    pub console_six_axis_sensor: HidConsoleSixAxisSensor,
    _padding: [u8; 0x3DE0],
}

impl HidSharedMemory {
    /// Size of the shared memory region.
    pub const SIZE: usize = HID_SHARED_MEMORY_SIZE;

    /// Offset of the Npad section.
    pub const NPAD_OFFSET: usize = 0x9A00;
}
