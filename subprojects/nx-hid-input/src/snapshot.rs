//! Read-only controller snapshots and their providers.

use crate::shmem::{
    AnalogStickState, HidSharedMemory, NpadButton, NpadCommonState, NpadSharedMemory,
    npad::NPAD_ENTRY_COUNT,
};

/// Bluetooth address of a controller.
pub type DeviceAddress = [u8; 6];

/// Npad controller slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerSlot {
    /// Player `n` (1-8).
    No(u8),
    /// Joy-Cons attached to the console.
    Handheld,
}

impl ControllerSlot {
    /// Index of the slot's entry in the Npad shared memory section.
    ///
    /// Player numbers outside 1-8 are clamped into that range.
    #[inline]
    pub const fn shmem_index(self) -> usize {
        match self {
            ControllerSlot::No(0) => 0,
            ControllerSlot::No(n) if n > 8 => 7,
            ControllerSlot::No(n) => (n - 1) as usize,
            ControllerSlot::Handheld => 8,
        }
    }

    /// Slot backing logical device `index`.
    #[inline]
    pub const fn from_device_index(index: usize) -> Option<Self> {
        if index < 8 {
            Some(ControllerSlot::No(index as u8 + 1))
        } else {
            None
        }
    }
}

/// One controller's most recent input sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerSnapshot {
    pub buttons: NpadButton,
    pub analog_stick_l: AnalogStickState,
    pub analog_stick_r: AnalogStickState,
    pub address: DeviceAddress,
}

impl ControllerSnapshot {
    /// Builds a snapshot from a LIFO sample.
    pub fn from_state(state: &NpadCommonState, address: DeviceAddress) -> Self {
        Self {
            buttons: state.buttons(),
            analog_stick_l: state.analog_stick_l,
            analog_stick_r: state.analog_stick_r,
            address,
        }
    }

    /// Raw axis readings: left X, left Y, right X, right Y.
    #[inline]
    pub fn axes(&self) -> [i32; 4] {
        [
            self.analog_stick_l.x,
            self.analog_stick_l.y,
            self.analog_stick_r.x,
            self.analog_stick_r.y,
        ]
    }
}

/// Source of controller snapshots.
///
/// Implementations must read the hardware on every call; the memory behind them is rewritten
/// asynchronously and nothing may be cached across polls.
pub trait SnapshotProvider {
    fn snapshot(&self, slot: ControllerSlot) -> ControllerSnapshot;
}

impl SnapshotProvider for NpadSharedMemory {
    fn snapshot(&self, slot: ControllerSlot) -> ControllerSnapshot {
        let index = slot.shmem_index();
        debug_assert!(index < NPAD_ENTRY_COUNT);

        let entry = &self.entries[index];
        // SAFETY: the address bytes are plain data inside the mapped region.
        let address = unsafe { core::ptr::read_volatile(&entry.bluetooth_address) };

        match entry.active_lifo().latest() {
            Some(state) => ControllerSnapshot::from_state(&state, address),
            None => ControllerSnapshot {
                address,
                ..Default::default()
            },
        }
    }
}

impl SnapshotProvider for HidSharedMemory {
    #[inline]
    fn snapshot(&self, slot: ControllerSlot) -> ControllerSnapshot {
        self.npad.snapshot(slot)
    }
}

impl<T: SnapshotProvider + ?Sized> SnapshotProvider for &T {
    #[inline]
    fn snapshot(&self, slot: ControllerSlot) -> ControllerSnapshot {
        (**self).snapshot(slot)
    }
}
