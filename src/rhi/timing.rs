//! GPU timestamp queries, wrapped in a small ring so the CPU never waits on the current frame's
//! in-flight queries: `get_timings` always returns the oldest *completed* slot.

use parking_lot::Mutex;

/// A single named region's begin/end timestamps, already converted to milliseconds.
#[derive(Clone, Debug)]
pub struct RegionTiming {
    pub name: String,
    pub milliseconds: f32,
}

const IN_FLIGHT: usize = 3;

struct Slot {
    regions: Vec<RegionTiming>,
    complete: bool,
}

/// `N = 3` disjoint in-flight frames of timestamp regions. A real backend would record actual
/// GPU timestamp queries per region; this ring only owns the bookkeeping (which slot is "the
/// current frame", which is "the oldest complete one") since query issuance is backend-specific.
pub struct TimestampRing {
    slots: Mutex<[Slot; IN_FLIGHT]>,
    current: Mutex<usize>,
}

impl TimestampRing {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new([
                Slot { regions: Vec::new(), complete: false },
                Slot { regions: Vec::new(), complete: false },
                Slot { regions: Vec::new(), complete: false },
            ]),
            current: Mutex::new(0),
        }
    }

    /// Begins a new frame, overwriting the oldest slot (which by the time it's reused should
    /// already have resolved on the GPU, `IN_FLIGHT` frames later).
    pub fn begin_frame(&self) -> usize {
        let mut current = self.current.lock();
        *current = (*current + 1) % IN_FLIGHT;
        let mut slots = self.slots.lock();
        slots[*current] = Slot { regions: Vec::new(), complete: false };
        *current
    }

    pub fn record_region(&self, slot: usize, name: impl Into<String>, milliseconds: f32) {
        self.slots.lock()[slot].regions.push(RegionTiming {
            name: name.into(),
            milliseconds,
        });
    }

    pub fn end_frame(&self, slot: usize) {
        self.slots.lock()[slot].complete = true;
    }

    /// Returns the oldest slot whose query results have resolved; empty if none have yet.
    pub fn oldest_completed(&self) -> Vec<RegionTiming> {
        let current = *self.current.lock();
        let slots = self.slots.lock();
        for offset in 1..=IN_FLIGHT {
            let slot = (current + offset) % IN_FLIGHT;
            if slots[slot].complete {
                return slots[slot].regions.clone();
            }
        }
        Vec::new()
    }
}

impl Default for TimestampRing {
    fn default() -> Self {
        Self::new()
    }
}
