//! Lock-free scalar sharing between the slow loop and the audio callback.
//!
//! The control loop writes raw pot values and key levels; the audio
//! callback reads them at the top of every block and publishes display
//! state back. All cells are plain atomics with relaxed ordering — the
//! benign-race model: a reader may see a one-block-stale value, never a
//! torn one, and the audio thread never waits.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tines_engine::{ControlFrame, DisplaySnapshot, NUM_CONTROLS, NUM_VOICES};

/// Shared state between the control/display loop and the audio callback.
///
/// Wrap in an `Arc` and hand one clone to the stream builder.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tines_io::SharedControls;
///
/// let shared = Arc::new(SharedControls::new());
/// shared.set_pot(0, 0.8);
/// shared.set_key(2, true);
/// let frame = shared.control_frame();
/// assert!(frame.keys[2]);
/// ```
pub struct SharedControls {
    pots: [AtomicU32; NUM_CONTROLS],
    keys: [AtomicBool; NUM_VOICES],
    running: AtomicBool,

    // Published by the audio side for the display collaborator
    active_mask: AtomicU32,
    led: AtomicBool,
    autonomous: AtomicBool,
    scale_index: AtomicU32,
    octave_index: AtomicU32,
}

impl SharedControls {
    /// Create shared state with every pot centered and no keys held.
    pub fn new() -> Self {
        Self {
            pots: core::array::from_fn(|_| AtomicU32::new(0.5f32.to_bits())),
            keys: core::array::from_fn(|_| AtomicBool::new(false)),
            running: AtomicBool::new(true),
            active_mask: AtomicU32::new(0),
            led: AtomicBool::new(false),
            autonomous: AtomicBool::new(false),
            scale_index: AtomicU32::new(0),
            octave_index: AtomicU32::new(1),
        }
    }

    // ── Written by the slow loop ─────────────────────────────────────

    /// Set one raw pot value. Out-of-range indices are ignored; values
    /// are clamped by the engine, not here.
    pub fn set_pot(&self, index: usize, value: f32) {
        if let Some(cell) = self.pots.get(index) {
            cell.store(value.to_bits(), Ordering::Relaxed);
        }
    }

    /// Set one key level.
    pub fn set_key(&self, index: usize, level: bool) {
        if let Some(cell) = self.keys.get(index) {
            cell.store(level, Ordering::Relaxed);
        }
    }

    /// Request shutdown; the owning loop should stop its stream.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Whether the session is still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    // ── Read by the audio callback ───────────────────────────────────

    /// Assemble the current control frame for one block.
    pub fn control_frame(&self) -> ControlFrame {
        ControlFrame {
            pots: core::array::from_fn(|i| f32::from_bits(self.pots[i].load(Ordering::Relaxed))),
            keys: core::array::from_fn(|i| self.keys[i].load(Ordering::Relaxed)),
        }
    }

    /// Publish display state from the audio side.
    pub fn publish(&self, snapshot: &DisplaySnapshot) {
        self.active_mask
            .store(snapshot.active_mask, Ordering::Relaxed);
        self.led.store(snapshot.led, Ordering::Relaxed);
        self.autonomous
            .store(snapshot.autonomous, Ordering::Relaxed);
        self.scale_index
            .store(snapshot.params.scale_index as u32, Ordering::Relaxed);
        self.octave_index
            .store(snapshot.params.octave_index as u32, Ordering::Relaxed);
    }

    // ── Read by the display loop ─────────────────────────────────────

    /// Bitmask of recently-plucked voices.
    pub fn active_mask(&self) -> u32 {
        self.active_mask.load(Ordering::Relaxed)
    }

    /// Status LED level.
    pub fn led(&self) -> bool {
        self.led.load(Ordering::Relaxed)
    }

    /// Whether the auto-pluck sequencer is driving the voices.
    pub fn autonomous(&self) -> bool {
        self.autonomous.load(Ordering::Relaxed)
    }

    /// Currently selected scale index.
    pub fn scale_index(&self) -> usize {
        self.scale_index.load(Ordering::Relaxed) as usize
    }

    /// Currently selected octave index.
    pub fn octave_index(&self) -> usize {
        self.octave_index.load(Ordering::Relaxed) as usize
    }
}

impl Default for SharedControls {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pots_round_trip_exactly() {
        let shared = SharedControls::new();
        shared.set_pot(3, 0.12345);
        let frame = shared.control_frame();
        assert_eq!(frame.pots[3], 0.12345);
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let shared = SharedControls::new();
        shared.set_pot(99, 1.0);
        shared.set_key(99, true);
        let frame = shared.control_frame();
        assert_eq!(frame.keys, [false; NUM_VOICES]);
    }

    #[test]
    fn keys_reflect_levels() {
        let shared = SharedControls::new();
        shared.set_key(0, true);
        shared.set_key(6, true);
        let frame = shared.control_frame();
        assert!(frame.keys[0] && frame.keys[6]);
        assert!(!frame.keys[3]);

        shared.set_key(0, false);
        assert!(!shared.control_frame().keys[0]);
    }

    #[test]
    fn stop_flag_latches() {
        let shared = SharedControls::new();
        assert!(shared.is_running());
        shared.stop();
        assert!(!shared.is_running());
    }

    #[test]
    fn publish_round_trips_display_state() {
        use tines_engine::{Engine, EngineConfig};

        let engine = Engine::new(&EngineConfig::default()).unwrap();
        let shared = SharedControls::new();
        shared.publish(&engine.snapshot());

        assert_eq!(shared.active_mask(), 0);
        assert!(!shared.led());
        assert_eq!(shared.scale_index(), 0);
        assert_eq!(shared.octave_index(), 1);
    }
}
