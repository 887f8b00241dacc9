//! Lock-free LIFO ring buffer reader for HID shared memory.
//!
//! The HID sysmodule publishes input samples into atomic LIFO ring buffers that it rewrites
//! asynchronously. Readers never take a lock: they sample `tail`/`count`, copy the entries
//! and retry when a sampling number shows the copy raced a write.

use core::{
    ptr,
    sync::atomic::{AtomicU64, Ordering},
};

use super::types::InputState;

/// Attempts made before a read is reported as empty.
const MAX_RETRIES: usize = 3;

/// Common LIFO header for all HID input types.
///
/// This structure is at the start of each LIFO buffer in shared memory.
#[repr(C)]
pub struct HidCommonLifoHeader {
    pub unused: u64,
    pub buffer_count: u64,
    /// Index of the most recent entry.
    pub tail: AtomicU64,
    /// Number of valid entries.
    pub count: AtomicU64,
}

impl HidCommonLifoHeader {
    /// Header of an empty LIFO with `buffer_count` slots.
    pub const fn new(buffer_count: u64) -> Self {
        Self {
            unused: 0,
            buffer_count,
            tail: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }
}

/// Read states from a LIFO ring buffer with atomic consistency guarantees.
///
/// 1. Atomically load tail and count
/// 2. Calculate position: `(tail + max_states + 1 - count + i) % max_states`
/// 3. Read from oldest to newest, output in reverse (newest first)
/// 4. Check sampling numbers for torn reads and for consecutive entries that are not
///    exactly one sample apart
/// 5. Retry if inconsistent
///
/// Returns the number of states written to `out`, newest first. Zero means the LIFO is empty
/// or no consistent read was obtained within the retry budget.
pub fn get_states<T: InputState>(
    header: &HidCommonLifoHeader,
    storage: &[T::Storage],
    out: &mut [T],
) -> usize {
    let max_states = storage.len() as u64;
    if max_states == 0 {
        return 0;
    }

    for _ in 0..MAX_RETRIES {
        let tail = header.tail.load(Ordering::Acquire) % max_states;
        let count = header
            .count
            .load(Ordering::Acquire)
            .min(header.buffer_count);

        let total_entries = count.min(out.len() as u64).min(max_states);
        if total_entries == 0 {
            return 0;
        }

        let mut consistent = true;
        let mut prev_sampling = 0u64;

        for i in 0..total_entries {
            let entrypos = ((tail + max_states + 1 - total_entries) + i) % max_states;
            let entry = &storage[entrypos as usize];

            // The storage slot starts with its own copy of the sampling number.
            // SAFETY: `entrypos` is reduced modulo `max_states`, which never exceeds
            // `storage.len()`, so `entry` is a live slot. Every storage type is `repr(C)` with a
            // leading `u64`, so the slot pointer is valid and aligned for a `u64` read.
            let sampling0 = unsafe { ptr::read_volatile(entry as *const T::Storage as *const u64) };
            // SAFETY: `entry` is a bounds-checked reference into `storage`.
            let state = unsafe { T::load_from_storage(entry) };
            // SAFETY: same slot and leading `u64` as the first read.
            let sampling1 = unsafe { ptr::read_volatile(entry as *const T::Storage as *const u64) };

            let curr_sampling = state.sampling_number();
            let out_idx = (total_entries - 1 - i) as usize;

            if sampling0 != sampling1 {
                consistent = false;
                break;
            }

            if i > 0 && curr_sampling.wrapping_sub(prev_sampling) != 1 {
                consistent = false;
                break;
            }

            out[out_idx] = state;
            prev_sampling = curr_sampling;
        }

        if consistent {
            return total_entries as usize;
        }
    }

    tracing::trace!("no consistent LIFO read after {MAX_RETRIES} attempts");
    0
}

/// Reads the most recent state, or `None` if the LIFO is empty or kept changing under the reader.
pub fn get_latest<T: InputState + Default>(
    header: &HidCommonLifoHeader,
    storage: &[T::Storage],
) -> Option<T> {
    let mut out = [T::default()];
    match get_states(header, storage, &mut out) {
        0 => None,
        _ => {
            let [state] = out;
            Some(state)
        }
    }
}
