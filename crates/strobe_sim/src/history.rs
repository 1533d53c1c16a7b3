//! Per-signal rolling history of ternary values, shared across worker threads.
//!
//! Each simulated signal owns a [`CycleBuffer`]: a fixed window of the most
//! recent [`HISTORY_DEPTH`] cycle values, packed 2 bits per value into a
//! single byte and guarded by a test-and-set spin lock. Workers evaluating
//! different nodes read and write the same signal concurrently; the lock
//! serializes each operation, and a monotonic cycle cursor rejects writes
//! that would travel backwards in time.

use std::fmt;
use std::hint;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU8, Ordering};
use std::thread;

use strobe_common::Ternary;

/// Number of cycles of history each signal retains.
pub const HISTORY_DEPTH: usize = 4;

/// How far apart concurrent workers may drift, in cycles.
///
/// A reader lagging more than this many cycles behind the most recent write
/// can observe slots already reused for newer cycles. The scheduler driving
/// the simulation is responsible for keeping workers within this bound; the
/// buffer itself does not check it.
pub const MAX_CYCLE_DRIFT: i64 = HISTORY_DEPTH as i64 - 1;

/// Failed lock attempts between thread yields while spinning.
const SPINS_PER_YIELD: u32 = 64;

/// A concurrent rolling buffer of the last [`HISTORY_DEPTH`] cycle values
/// of one signal.
///
/// Values are indexed by absolute cycle number; cycle `c` lives in physical
/// slot `c mod HISTORY_DEPTH`, so each write reuses the slot of the value
/// from `HISTORY_DEPTH` cycles ago. The `cycle` cursor records the most
/// recent cycle committed to the buffer and starts at `-1`, meaning no value
/// has been produced yet. Cycle `-1` itself addresses the last physical
/// slot, so reads issued before the first commit see the initial fill.
///
/// Every operation runs under the spin lock, and a write commits its value
/// and the cursor advance together, so no thread can observe a cursor that
/// is ahead of the slot contents it describes.
pub struct CycleBuffer {
    lock: AtomicBool,
    /// Most recent committed cycle, `-1` before the first write.
    cycle: AtomicI64,
    /// All [`HISTORY_DEPTH`] slots, 2 bits each.
    packed: AtomicU8,
}

impl CycleBuffer {
    /// Creates a buffer with every slot filled with `initial` and no cycle
    /// committed yet.
    pub fn new(initial: Ternary) -> Self {
        Self {
            lock: AtomicBool::new(false),
            cycle: AtomicI64::new(-1),
            packed: AtomicU8::new(fill_byte(initial)),
        }
    }

    /// Returns the most recent committed cycle, or `-1` if none.
    pub fn cycle(&self) -> i64 {
        self.acquire();
        let cycle = self.cycle.load(Ordering::Relaxed);
        self.release();
        cycle
    }

    /// Advances the cycle cursor to `cycle` without touching any slot.
    ///
    /// Ignored if `cycle` is behind the current cursor: concurrent writers
    /// may commit out of order, and only forward movement is accepted.
    pub fn update_cycle(&self, cycle: i64) {
        self.acquire();
        if cycle >= self.cycle.load(Ordering::Relaxed) {
            self.cycle.store(cycle, Ordering::Relaxed);
        }
        self.release();
    }

    /// Reads the value stored for `cycle`.
    ///
    /// The buffer only retains the last [`HISTORY_DEPTH`] cycles; reading
    /// further into the past returns whatever newer value has reused the
    /// slot. Callers are expected to stay within [`MAX_CYCLE_DRIFT`].
    pub fn value_at(&self, cycle: i64) -> Ternary {
        self.acquire();
        let value = self.read_slot(slot(cycle));
        self.release();
        value
    }

    /// Stores `value` as the signal's value for `cycle` and advances the
    /// cursor to `cycle`.
    ///
    /// Ignored if `cycle` is behind the current cursor. The slot write and
    /// the cursor advance happen under one lock acquisition, so readers see
    /// either both or neither.
    pub fn update_value(&self, cycle: i64, value: Ternary) {
        self.acquire();
        if cycle >= self.cycle.load(Ordering::Relaxed) {
            self.write_slot(slot(cycle), value);
            self.cycle.store(cycle, Ordering::Relaxed);
        }
        self.release();
    }

    /// Copies the value at `cycle` into the slot for `cycle + 1`, advancing
    /// the cursor only to `cycle`.
    ///
    /// Sequential elements that hold their value use this to stage the next
    /// cycle without committing it: the staged value becomes visible once
    /// something else advances the cursor past `cycle`. Ignored if `cycle`
    /// is behind the current cursor.
    pub fn copy_forward(&self, cycle: i64) {
        self.acquire();
        if cycle >= self.cycle.load(Ordering::Relaxed) {
            let value = self.read_slot(slot(cycle));
            self.write_slot(slot(cycle + 1), value);
            self.cycle.store(cycle, Ordering::Relaxed);
        }
        self.release();
    }

    /// Refills every slot with `value`, leaving the cycle cursor unchanged.
    ///
    /// Intended for construction and between-run reset, not for use while
    /// workers are simulating.
    pub fn reset(&self, value: Ternary) {
        self.acquire();
        self.packed.store(fill_byte(value), Ordering::Relaxed);
        self.release();
    }

    /// Returns a snapshot of all slots in physical order, taken under one
    /// lock acquisition.
    pub fn window(&self) -> [Ternary; HISTORY_DEPTH] {
        self.acquire();
        let byte = self.packed.load(Ordering::Relaxed);
        self.release();
        let mut values = [Ternary::X; HISTORY_DEPTH];
        for (i, value) in values.iter_mut().enumerate() {
            *value = Ternary::from_bits(byte >> (i * 2));
        }
        values
    }

    fn acquire(&self) {
        let mut spins = 0u32;
        while self.lock.swap(true, Ordering::Acquire) {
            spins += 1;
            if spins % SPINS_PER_YIELD == 0 {
                thread::yield_now();
            } else {
                hint::spin_loop();
            }
        }
    }

    fn release(&self) {
        self.lock.store(false, Ordering::Release);
    }

    /// Lock must be held.
    fn read_slot(&self, slot: u32) -> Ternary {
        Ternary::from_bits(self.packed.load(Ordering::Relaxed) >> (slot * 2))
    }

    /// Lock must be held.
    fn write_slot(&self, slot: u32, value: Ternary) {
        let shift = slot * 2;
        let byte = self.packed.load(Ordering::Relaxed);
        let byte = (byte & !(0b11u8 << shift)) | (value.to_bits() << shift);
        self.packed.store(byte, Ordering::Relaxed);
    }
}

impl Default for CycleBuffer {
    /// An all-`X` buffer: the state of a net before anything drives it.
    fn default() -> Self {
        Self::new(Ternary::X)
    }
}

impl fmt::Display for CycleBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in self.window() {
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CycleBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CycleBuffer(cycle {}, window \"{}\")", self.cycle(), self)
    }
}

/// Physical slot for an absolute cycle number. Euclidean so negative
/// cycles land in range: cycle `-1` maps to the last slot.
fn slot(cycle: i64) -> u32 {
    cycle.rem_euclid(HISTORY_DEPTH as i64) as u32
}

/// One byte with all [`HISTORY_DEPTH`] slots set to `value`.
fn fill_byte(value: Ternary) -> u8 {
    let bits = value.to_bits();
    bits | bits << 2 | bits << 4 | bits << 6
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn new_starts_before_first_cycle() {
        let buf = CycleBuffer::new(Ternary::Zero);
        assert_eq!(buf.cycle(), -1);
    }

    #[test]
    fn new_fills_all_slots() {
        let buf = CycleBuffer::new(Ternary::One);
        for cycle in 0..HISTORY_DEPTH as i64 {
            assert_eq!(buf.value_at(cycle), Ternary::One);
        }
    }

    #[test]
    fn read_before_first_commit_sees_initial_fill() {
        let buf = CycleBuffer::new(Ternary::X);
        assert_eq!(buf.value_at(-1), Ternary::X);
        assert_eq!(buf.value_at(0), Ternary::X);
    }

    #[test]
    fn update_value_then_read() {
        let buf = CycleBuffer::new(Ternary::X);
        buf.update_value(0, Ternary::One);
        assert_eq!(buf.value_at(0), Ternary::One);
        assert_eq!(buf.cycle(), 0);
    }

    #[test]
    fn update_value_advances_cursor() {
        let buf = CycleBuffer::new(Ternary::X);
        buf.update_value(0, Ternary::Zero);
        buf.update_value(1, Ternary::One);
        buf.update_value(2, Ternary::Zero);
        assert_eq!(buf.cycle(), 2);
    }

    #[test]
    fn regressive_write_is_ignored() {
        let buf = CycleBuffer::new(Ternary::X);
        buf.update_value(5, Ternary::One);
        buf.update_value(3, Ternary::Zero);
        assert_eq!(buf.cycle(), 5);
        // Slot for cycle 3 still holds the initial fill
        assert_eq!(buf.value_at(3), Ternary::X);
    }

    #[test]
    fn same_cycle_rewrite_wins() {
        let buf = CycleBuffer::new(Ternary::X);
        buf.update_value(2, Ternary::One);
        buf.update_value(2, Ternary::Zero);
        assert_eq!(buf.value_at(2), Ternary::Zero);
        assert_eq!(buf.cycle(), 2);
    }

    #[test]
    fn update_cycle_is_monotonic() {
        let buf = CycleBuffer::new(Ternary::X);
        buf.update_cycle(4);
        assert_eq!(buf.cycle(), 4);
        buf.update_cycle(2);
        assert_eq!(buf.cycle(), 4);
        buf.update_cycle(4);
        assert_eq!(buf.cycle(), 4);
        buf.update_cycle(7);
        assert_eq!(buf.cycle(), 7);
    }

    #[test]
    fn update_cycle_does_not_touch_slots() {
        let buf = CycleBuffer::new(Ternary::One);
        buf.update_cycle(2);
        assert_eq!(buf.value_at(2), Ternary::One);
    }

    #[test]
    fn slots_wrap_after_history_depth_cycles() {
        let buf = CycleBuffer::new(Ternary::X);
        let values = [
            Ternary::Zero,
            Ternary::One,
            Ternary::One,
            Ternary::Zero,
            Ternary::One,
            Ternary::Zero,
        ];
        for (cycle, value) in values.iter().enumerate() {
            buf.update_value(cycle as i64, *value);
        }
        // The last HISTORY_DEPTH cycles are retained
        assert_eq!(buf.value_at(5), Ternary::Zero);
        assert_eq!(buf.value_at(4), Ternary::One);
        assert_eq!(buf.value_at(3), Ternary::Zero);
        assert_eq!(buf.value_at(2), Ternary::One);
        // Cycle 1's slot was reused by cycle 5
        assert_eq!(buf.value_at(1), buf.value_at(5));
    }

    #[test]
    fn window_reuse_returns_newer_value() {
        let buf = CycleBuffer::new(Ternary::X);
        buf.update_value(0, Ternary::One);
        buf.update_value(HISTORY_DEPTH as i64, Ternary::Zero);
        assert_eq!(buf.value_at(0), Ternary::Zero);
    }

    #[test]
    fn negative_cycle_aliases_last_slot() {
        let buf = CycleBuffer::new(Ternary::One);
        assert_eq!(buf.value_at(-1), Ternary::One);
        buf.update_value(HISTORY_DEPTH as i64 - 1, Ternary::Zero);
        assert_eq!(buf.value_at(-1), Ternary::Zero);
    }

    #[test]
    fn copy_forward_stages_next_cycle() {
        let buf = CycleBuffer::new(Ternary::X);
        buf.update_value(2, Ternary::One);
        buf.copy_forward(2);
        assert_eq!(buf.value_at(3), Ternary::One);
        // The cursor stays at the copied-from cycle
        assert_eq!(buf.cycle(), 2);
    }

    #[test]
    fn copy_forward_regressive_is_ignored() {
        let buf = CycleBuffer::new(Ternary::X);
        buf.update_value(5, Ternary::One);
        buf.update_value(2, Ternary::Zero); // ignored
        buf.copy_forward(1);
        assert_eq!(buf.cycle(), 5);
        assert_eq!(buf.value_at(2), Ternary::X);
    }

    #[test]
    fn reset_refills_slots_and_keeps_cursor() {
        let buf = CycleBuffer::new(Ternary::Zero);
        buf.update_value(2, Ternary::One);
        buf.reset(Ternary::X);
        assert_eq!(buf.cycle(), 2);
        for cycle in 0..HISTORY_DEPTH as i64 {
            assert_eq!(buf.value_at(cycle), Ternary::X);
        }
    }

    #[test]
    fn window_snapshot_in_physical_order() {
        let buf = CycleBuffer::new(Ternary::X);
        buf.update_value(0, Ternary::One);
        buf.update_value(2, Ternary::Zero);
        assert_eq!(
            buf.window(),
            [Ternary::One, Ternary::X, Ternary::Zero, Ternary::X]
        );
        assert_eq!(format!("{buf}"), "1x0x");
    }

    #[test]
    fn debug_shows_cursor_and_window() {
        let buf = CycleBuffer::new(Ternary::X);
        buf.update_value(0, Ternary::One);
        assert_eq!(format!("{buf:?}"), "CycleBuffer(cycle 0, window \"1xxx\")");
    }

    #[test]
    fn default_is_all_x() {
        let buf = CycleBuffer::default();
        assert_eq!(buf.cycle(), -1);
        assert!(buf.window().iter().all(|v| *v == Ternary::X));
    }

    #[test]
    fn racing_writers_settle_on_latest_cycle() {
        let buf = Arc::new(CycleBuffer::new(Ternary::X));
        let mut handles = Vec::new();

        for t in 0..4i64 {
            let buf = Arc::clone(&buf);
            handles.push(thread::spawn(move || {
                for cycle in 0..1000i64 {
                    let value = if (cycle + t) % 2 == 0 {
                        Ternary::One
                    } else {
                        Ternary::Zero
                    };
                    buf.update_value(cycle, value);
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(buf.cycle(), 999);
    }

    #[test]
    fn readers_observe_monotonic_cursor() {
        let buf = Arc::new(CycleBuffer::new(Ternary::X));
        let mut handles = Vec::new();

        for _ in 0..3 {
            let buf = Arc::clone(&buf);
            handles.push(thread::spawn(move || {
                let mut last = -1i64;
                for _ in 0..10_000 {
                    let cycle = buf.cycle();
                    assert!(cycle >= last);
                    last = cycle;
                }
            }));
        }

        let writer = {
            let buf = Arc::clone(&buf);
            thread::spawn(move || {
                for cycle in 0..10_000i64 {
                    buf.update_value(cycle, Ternary::One);
                }
            })
        };

        writer.join().unwrap();
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn readers_never_see_torn_writes() {
        // The writer stores a value whose parity matches its cycle. Slot
        // reuse after HISTORY_DEPTH (even) cycles preserves parity, so any
        // cursor/value pair a reader assembles must agree even if the writer
        // lapped it in between.
        fn expected(cycle: i64) -> Ternary {
            if cycle % 2 == 0 {
                Ternary::One
            } else {
                Ternary::Zero
            }
        }

        let buf = Arc::new(CycleBuffer::new(Ternary::One));
        let mut handles = Vec::new();

        for _ in 0..3 {
            let buf = Arc::clone(&buf);
            handles.push(thread::spawn(move || {
                for _ in 0..10_000 {
                    let cycle = buf.cycle();
                    if cycle >= 0 {
                        assert_eq!(buf.value_at(cycle), expected(cycle));
                    }
                }
            }));
        }

        let writer = {
            let buf = Arc::clone(&buf);
            thread::spawn(move || {
                for cycle in 0..10_000i64 {
                    buf.update_value(cycle, expected(cycle));
                }
            })
        };

        writer.join().unwrap();
        for h in handles {
            h.join().unwrap();
        }
    }
}
