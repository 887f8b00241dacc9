//! Npad (controller) section of HID shared memory.
//!
//! The section holds one [`NpadInternalState`] per controller slot. Each entry carries a LIFO
//! per controller style; the sysmodule writes into the LIFOs matching the style set of the
//! connected controller.

use core::sync::atomic::Ordering;

use super::{
    lifo::{HidCommonLifoHeader, get_latest},
    types::{NpadCommonState, NpadCommonStateAtomicStorage, NpadStyleTag},
};

/// Number of storage slots in each Npad LIFO.
pub const NPAD_LIFO_ENTRY_COUNT: usize = 17;

/// Number of controller entries in the Npad section.
pub const NPAD_ENTRY_COUNT: usize = 10;

/// Size of the Npad section.
pub const NPAD_SHARED_MEMORY_SIZE: usize = 0x32000;

/// Size of a single controller entry.
pub const NPAD_INTERNAL_STATE_SIZE: usize = 0x5000;

/// Offset of the Bluetooth address inside an entry.
const BLUETOOTH_ADDRESS_OFFSET: usize = 0x1760;

/// Ring of Npad samples for one controller style.
#[repr(C)]
pub struct NpadCommonLifo {
    pub header: HidCommonLifoHeader,
    pub storage: [NpadCommonStateAtomicStorage; NPAD_LIFO_ENTRY_COUNT],
}

impl NpadCommonLifo {
    /// Most recent consistent sample.
    #[inline]
    pub fn latest(&self) -> Option<NpadCommonState> {
        get_latest(&self.header, &self.storage)
    }

    /// Appends a sample the way the HID sysmodule does.
    ///
    /// The sampling number of `state` is replaced by the next number in sequence. Used to feed
    /// controller input when running off-console.
    pub fn publish(&mut self, mut state: NpadCommonState) {
        let count = *self.header.count.get_mut();
        let tail = *self.header.tail.get_mut() as usize;

        let (next, sampling_number) = if count == 0 {
            (0, 1)
        } else {
            let previous = self.storage[tail].sampling_number;
            ((tail + 1) % NPAD_LIFO_ENTRY_COUNT, previous.wrapping_add(1))
        };

        state.sampling_number = sampling_number;
        self.storage[next] = NpadCommonStateAtomicStorage {
            sampling_number,
            state,
        };

        self.header.buffer_count = NPAD_LIFO_ENTRY_COUNT as u64;
        self.header.tail.store(next as u64, Ordering::Release);
        self.header.count.store(
            (count + 1).min(NPAD_LIFO_ENTRY_COUNT as u64),
            Ordering::Release,
        );
    }
}

/// Controller colors for the full-key style.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NpadFullKeyColorState {
    pub attribute: u32,
    pub main: u32,
    pub sub: u32,
}

/// Controller colors for Joy-Con styles.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NpadJoyColorState {
    pub attribute: u32,
    pub left_main: u32,
    pub left_sub: u32,
    pub right_main: u32,
    pub right_sub: u32,
    pub reserved: u32,
}

/// State of one controller slot (0x5000 bytes).
#[repr(C)]
pub struct NpadInternalState {
    pub style_set: u32,
    pub joy_assignment_mode: u32,
    pub full_key_color: NpadFullKeyColorState,
    pub joy_color: NpadJoyColorState,
    _reserved0: u32,
    pub full_key_lifo: NpadCommonLifo,
    pub handheld_lifo: NpadCommonLifo,
    pub joy_dual_lifo: NpadCommonLifo,
    pub joy_left_lifo: NpadCommonLifo,
    pub joy_right_lifo: NpadCommonLifo,
    pub palma_lifo: NpadCommonLifo,
    pub system_ext_lifo: NpadCommonLifo,
    /// Bluetooth address of the paired controller.
    pub bluetooth_address: [u8; 6],
    _reserved1: [u8; NPAD_INTERNAL_STATE_SIZE - BLUETOOTH_ADDRESS_OFFSET - 6],
}

impl NpadInternalState {
    #[inline]
    pub fn style_set(&self) -> NpadStyleTag {
        NpadStyleTag::from_bits_retain(self.style_set)
    }

    /// The LIFO the sysmodule fills for the current style set.
    ///
    /// Falls back to the full-key LIFO when no style the backend reads is set.
    pub fn active_lifo(&self) -> &NpadCommonLifo {
        let style = self.style_set();
        if style.contains(NpadStyleTag::FULL_KEY) {
            &self.full_key_lifo
        } else if style.contains(NpadStyleTag::HANDHELD) {
            &self.handheld_lifo
        } else if style.contains(NpadStyleTag::JOY_DUAL) {
            &self.joy_dual_lifo
        } else if style.contains(NpadStyleTag::JOY_LEFT) {
            &self.joy_left_lifo
        } else if style.contains(NpadStyleTag::JOY_RIGHT) {
            &self.joy_right_lifo
        } else {
            &self.full_key_lifo
        }
    }

    /// Mutable access to the LIFO [`active_lifo`](Self::active_lifo) reads.
    pub fn active_lifo_mut(&mut self) -> &mut NpadCommonLifo {
        let style = self.style_set();
        if style.contains(NpadStyleTag::FULL_KEY) {
            &mut self.full_key_lifo
        } else if style.contains(NpadStyleTag::HANDHELD) {
            &mut self.handheld_lifo
        } else if style.contains(NpadStyleTag::JOY_DUAL) {
            &mut self.joy_dual_lifo
        } else if style.contains(NpadStyleTag::JOY_LEFT) {
            &mut self.joy_left_lifo
        } else if style.contains(NpadStyleTag::JOY_RIGHT) {
            &mut self.joy_right_lifo
        } else {
            &mut self.full_key_lifo
        }
    }
}

/// Npad section of HID shared memory (0x32000 bytes).
#[repr(C)]
pub struct NpadSharedMemory {
    pub entries: [NpadInternalState; NPAD_ENTRY_COUNT],
}
