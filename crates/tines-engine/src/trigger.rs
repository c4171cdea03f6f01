//! Trigger edge detection, retrigger lockout, and auto-pluck sequencing.
//!
//! Each voice has a lane that watches a boolean input level and converts
//! rising edges into single-sample trigger events. After firing, a lane
//! is locked for a fixed duration — a held button or mechanical contact
//! bounce cannot re-pluck the string every sample.
//!
//! Lane lifecycle: idle → (rising edge) fire one event → locked for the
//! lockout duration → idle.
//!
//! An optional auto-pluck sequencer covers the demo/bring-up case: if no
//! real input arrives within a startup grace window, voices are plucked
//! round-robin at a fixed interval until the first real edge, which
//! permanently disengages the sequencer for the session.

use crate::tuning::NUM_VOICES;

/// Per-voice trigger events for one sample. `events[v]` is true for
/// exactly the sample on which voice `v` should be plucked.
pub type TriggerEvents = [bool; NUM_VOICES];

/// Auto-pluck sequencer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPluck {
    /// Samples of silence after startup before self-plucking begins.
    pub grace_samples: u32,
    /// Samples between self-plucks once engaged.
    pub interval_samples: u32,
}

impl AutoPluck {
    /// Defaults matching the hardware demo mode: 3 s grace, plucks every
    /// 2 s, at a 48 kHz sample rate.
    pub fn default_at(sample_rate: f32) -> Self {
        Self {
            grace_samples: (3.0 * sample_rate) as u32,
            interval_samples: (2.0 * sample_rate) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Lane {
    prev_level: bool,
    lockout: u32,
}

impl Lane {
    /// Returns true when a rising edge fires outside the lockout window.
    ///
    /// The counter decrements on the firing sample too, so an edge
    /// exactly `lockout_samples` after the last one fires again.
    #[inline]
    fn scan(&mut self, level: bool, lockout_samples: u32) -> bool {
        let edge = level && !self.prev_level && self.lockout == 0;
        self.prev_level = level;
        if edge {
            self.lockout = lockout_samples;
        }
        if self.lockout > 0 {
            self.lockout -= 1;
        }
        edge
    }
}

/// Trigger state for all voices plus the auto-pluck sequencer.
#[derive(Debug, Clone)]
pub struct TriggerBank {
    lanes: [Lane; NUM_VOICES],
    lockout_samples: u32,
    auto: Option<AutoPluck>,
    auto_engaged: bool,
    auto_timer: u32,
    auto_next_voice: usize,
    elapsed: u32,
    saw_real_input: bool,
}

impl TriggerBank {
    /// Create a trigger bank.
    ///
    /// # Arguments
    /// * `lockout_samples` - Refractory period after each trigger
    /// * `auto` - Auto-pluck settings, or `None` to disable sequencing
    pub fn new(lockout_samples: u32, auto: Option<AutoPluck>) -> Self {
        Self {
            lanes: [Lane::default(); NUM_VOICES],
            lockout_samples,
            auto,
            auto_engaged: false,
            auto_timer: 0,
            auto_next_voice: 0,
            elapsed: 0,
            saw_real_input: false,
        }
    }

    /// Scan one sample of input levels, returning the trigger events to
    /// deliver to the voices this sample.
    pub fn scan(&mut self, levels: &[bool; NUM_VOICES]) -> TriggerEvents {
        let mut events = [false; NUM_VOICES];

        for (i, lane) in self.lanes.iter_mut().enumerate() {
            if lane.scan(levels[i], self.lockout_samples) {
                events[i] = true;
                self.saw_real_input = true;
            }
        }

        self.advance_auto(&mut events);
        events
    }

    /// Whether the auto-pluck sequencer is currently driving the voices.
    pub fn autonomous_active(&self) -> bool {
        self.auto_engaged && !self.saw_real_input
    }

    fn advance_auto(&mut self, events: &mut TriggerEvents) {
        let Some(auto) = self.auto else { return };

        // A single real edge retires the sequencer for good.
        if self.saw_real_input {
            self.auto_engaged = false;
            return;
        }

        self.elapsed = self.elapsed.saturating_add(1);
        if !self.auto_engaged {
            if self.elapsed >= auto.grace_samples {
                self.auto_engaged = true;
                self.auto_timer = auto.interval_samples;
            }
            return;
        }

        self.auto_timer = self.auto_timer.saturating_sub(1);
        if self.auto_timer == 0 {
            events[self.auto_next_voice] = true;
            self.auto_next_voice = (self.auto_next_voice + 1) % NUM_VOICES;
            self.auto_timer = auto.interval_samples;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCKOUT: u32 = 4800; // 100 ms at 48 kHz

    fn level(voice: usize, on: bool) -> [bool; NUM_VOICES] {
        let mut levels = [false; NUM_VOICES];
        levels[voice] = on;
        levels
    }

    #[test]
    fn rising_edge_fires_exactly_once() {
        let mut bank = TriggerBank::new(LOCKOUT, None);

        assert!(!bank.scan(&level(0, false))[0]);
        assert!(bank.scan(&level(0, true))[0]);
        // Held level does not retrigger
        for _ in 0..100 {
            assert!(!bank.scan(&level(0, true))[0]);
        }
    }

    #[test]
    fn edges_inside_lockout_are_swallowed() {
        let mut bank = TriggerBank::new(LOCKOUT, None);

        assert!(bank.scan(&level(0, true))[0]);
        bank.scan(&level(0, false));

        // Second edge 10 samples later: still locked
        let mut fired = 0;
        for _ in 0..8 {
            bank.scan(&level(0, false));
        }
        if bank.scan(&level(0, true))[0] {
            fired += 1;
        }
        assert_eq!(fired, 0, "edge inside lockout must be ignored");
    }

    #[test]
    fn edge_after_lockout_fires_again() {
        let mut bank = TriggerBank::new(LOCKOUT, None);

        assert!(bank.scan(&level(0, true))[0]);
        bank.scan(&level(0, false));
        for _ in 0..LOCKOUT {
            bank.scan(&level(0, false));
        }
        assert!(bank.scan(&level(0, true))[0]);
    }

    #[test]
    fn lanes_are_independent() {
        let mut bank = TriggerBank::new(LOCKOUT, None);

        assert!(bank.scan(&level(0, true))[0]);
        // Voice 3 fires even while voice 0 is locked
        let mut levels = level(3, true);
        levels[0] = true;
        let events = bank.scan(&levels);
        assert!(events[3]);
        assert!(!events[0]);
    }

    #[test]
    fn simultaneous_edges_fire_together() {
        let mut bank = TriggerBank::new(LOCKOUT, None);
        let events = bank.scan(&[true; NUM_VOICES]);
        assert_eq!(events, [true; NUM_VOICES]);
    }

    #[test]
    fn auto_pluck_waits_for_grace_then_cycles() {
        let auto = AutoPluck {
            grace_samples: 100,
            interval_samples: 50,
        };
        let mut bank = TriggerBank::new(LOCKOUT, Some(auto));
        let silent = [false; NUM_VOICES];

        let mut fired: Vec<usize> = Vec::new();
        for _ in 0..(100 + 50 * 10) {
            let events = bank.scan(&silent);
            for v in 0..NUM_VOICES {
                if events[v] {
                    fired.push(v);
                }
            }
        }

        assert!(fired.len() >= 8, "expected several auto-plucks");
        // Round-robin order
        for (i, &v) in fired.iter().enumerate() {
            assert_eq!(v, i % NUM_VOICES);
        }
    }

    #[test]
    fn real_input_permanently_disengages_auto() {
        let auto = AutoPluck {
            grace_samples: 10,
            interval_samples: 20,
        };
        let mut bank = TriggerBank::new(LOCKOUT, Some(auto));
        let silent = [false; NUM_VOICES];

        // Let auto mode engage
        for _ in 0..50 {
            bank.scan(&silent);
        }
        assert!(bank.autonomous_active());

        // One real press
        bank.scan(&level(2, true));
        bank.scan(&level(2, false));
        assert!(!bank.autonomous_active());

        // No auto event ever again
        for _ in 0..10_000 {
            let events = bank.scan(&silent);
            assert_eq!(events, [false; NUM_VOICES]);
        }
    }

    #[test]
    fn no_auto_config_means_no_auto_events() {
        let mut bank = TriggerBank::new(LOCKOUT, None);
        let silent = [false; NUM_VOICES];
        for _ in 0..500_000 {
            assert_eq!(bank.scan(&silent), [false; NUM_VOICES]);
        }
    }
}
