//! Property-based tests: string stability, mapping laws, and trigger
//! lockout invariants under randomized inputs.

use proptest::prelude::*;
use tines_engine::{
    ControlFrame, Engine, EngineConfig, KarplusString, NUM_VOICES, TriggerBank, map_discrete,
    map_exponential, map_linear,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// For any parameter combination inside the control ranges, a plucked
    /// string produces finite, bounded output for 4096 samples.
    #[test]
    fn string_stability(
        freq in 20.0f32..2000.0f32,
        damping in 0.0f32..1.0f32,
        brightness in 0.0f32..1.0f32,
        nonlinearity in 0.0f32..1.0f32,
    ) {
        let mut string = KarplusString::new(48000.0);
        string.set_frequency(freq);
        string.set_damping(damping);
        string.set_brightness(brightness);
        string.set_nonlinearity(nonlinearity);

        let mut peak = 0.0f32;
        for i in 0..4096 {
            let out = string.process(i == 0);
            prop_assert!(out.is_finite());
            peak = peak.max(out.abs());
        }
        prop_assert!(peak <= 1.5, "excitation amplitude ~1 must stay bounded, peak {}", peak);
    }

    /// Out-of-range parameter writes are clamped, never propagated.
    #[test]
    fn string_clamps_wild_parameters(
        freq in -1000.0f32..100_000.0f32,
        damping in -5.0f32..5.0f32,
        brightness in -5.0f32..5.0f32,
    ) {
        let mut string = KarplusString::new(48000.0);
        string.set_frequency(freq);
        string.set_damping(damping);
        string.set_brightness(brightness);

        prop_assert!(string.frequency() >= 20.0);
        prop_assert!(string.frequency() <= 24000.0);
        prop_assert!((0.0..=0.99).contains(&string.damping()));
        prop_assert!((0.0..=1.0).contains(&string.brightness()));

        for i in 0..1024 {
            prop_assert!(string.process(i == 0).is_finite());
        }
    }

    /// The linear law hits its endpoints and stays inside them.
    #[test]
    fn linear_law_stays_in_range(v in 0.0f32..=1.0f32, lo in -10.0f32..0.0f32, hi in 0.0f32..10.0f32) {
        let out = map_linear(v, lo, hi);
        prop_assert!(out >= lo - 1e-4 && out <= hi + 1e-4);
    }

    /// The exponential law stays inside [base, base * ratio].
    #[test]
    fn exponential_law_stays_in_range(v in 0.0f32..=1.0f32) {
        let out = map_exponential(v, 0.1, 200.0);
        prop_assert!((0.1..=20.001).contains(&out));
    }

    /// Discrete selection never indexes out of bounds, for any input.
    #[test]
    fn discrete_law_in_bounds(v in -10.0f32..10.0f32, n in 1usize..16) {
        prop_assert!(map_discrete(v, n) < n);
    }

    /// Two rising edges on one lane produce one event when closer than
    /// the lockout, two events otherwise.
    #[test]
    fn lockout_event_count(gap in 2u32..20_000) {
        const LOCKOUT: u32 = 4800;
        let mut bank = TriggerBank::new(LOCKOUT, None);
        let mut fired = 0u32;

        // Edges at samples 0 and `gap`, level low in between
        for t in 0..=gap {
            let mut levels = [false; NUM_VOICES];
            levels[0] = t == 0 || t == gap;
            if bank.scan(&levels)[0] {
                fired += 1;
            }
        }

        let expected = if gap >= LOCKOUT { 2 } else { 1 };
        prop_assert_eq!(fired, expected, "gap {} vs lockout {}", gap, LOCKOUT);
    }
}

proptest! {
    // The whole-engine case is expensive; fewer, bigger cases.
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// For any control frame, a full engine block is finite and inside
    /// [-1, 1] after the saturation stage.
    #[test]
    fn engine_output_bounded_for_any_controls(
        pots in prop::array::uniform8(0.0f32..=1.0f32),
        keys in prop::array::uniform7(any::<bool>()),
    ) {
        let mut engine = Engine::new(&EngineConfig::default()).unwrap();
        let frame = ControlFrame { pots, keys };

        let mut out = [0.0f32; 8];
        for _ in 0..12_000 {
            engine.process_block(&frame, &mut out);
            for &sample in &out {
                prop_assert!(sample.is_finite());
                prop_assert!(sample.abs() <= 1.0);
            }
        }
    }
}
