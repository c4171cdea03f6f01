//! End-to-end engine behavior: decay envelopes, lockout, polyphony
//! isolation, and control round-trips.

use tines_engine::{
    ControlFrame, ControlId, Engine, EngineConfig, KarplusString, NUM_CONTROLS, VoiceId,
};

fn engine_without_auto() -> Engine {
    let config = EngineConfig {
        auto_pluck: false,
        ..EngineConfig::default()
    };
    Engine::new(&config).unwrap()
}

fn quiet_frame() -> ControlFrame {
    let mut frame = ControlFrame::default();
    frame.pots[ControlId::LfoDepth.index()] = 0.0;
    frame.pots[ControlId::ReverbMix.index()] = 0.0;
    frame
}

fn block_energy(out: &[f32]) -> f32 {
    out.iter().map(|s| s * s).sum()
}

/// Run `blocks` blocks and return (energy of the first second, energy of
/// the last second).
fn run_and_bracket(engine: &mut Engine, frame: &ControlFrame, blocks: usize) -> (f32, f32) {
    let blocks_per_second = 12000; // 48 kHz / 4-sample blocks
    let mut out = [0.0f32; 8];
    let mut early = 0.0f32;
    let mut late = 0.0f32;
    for block in 0..blocks {
        engine.process_block(frame, &mut out);
        if block < blocks_per_second {
            early += block_energy(&out);
        }
        if block >= blocks - blocks_per_second {
            late += block_energy(&out);
        }
    }
    (early, late)
}

#[test]
fn pluck_decays_toward_silence() {
    let mut engine = engine_without_auto();
    let mut frame = quiet_frame();
    frame.pots[ControlId::Decay.index()] = 0.5;
    frame.keys[0] = true;

    // 5 seconds: one pluck at the start, then ringdown (the key is held,
    // so it cannot retrigger)
    let (early, late) = run_and_bracket(&mut engine, &frame, 5 * 12000);
    assert!(early > 0.0, "pluck must be audible");
    assert!(
        late < early * 1e-3,
        "ring must decay toward silence: early {early}, late {late}"
    );
}

#[test]
fn higher_decay_setting_rings_longer() {
    let measure = |decay_pot: f32| {
        let mut engine = engine_without_auto();
        let mut frame = quiet_frame();
        frame.pots[ControlId::Decay.index()] = decay_pot;
        frame.keys[1] = true;
        let (_, late) = run_and_bracket(&mut engine, &frame, 2 * 12000);
        late
    };

    let short = measure(0.0); // damping floor 0.5
    let long = measure(1.0); // per-voice base damping, up to 0.98
    assert!(
        long > short * 10.0,
        "decay at full should far outlast the floor: {long} vs {short}"
    );
}

#[test]
fn double_edge_within_lockout_is_one_excitation() {
    // Two runs over identical block counts: one with a single press, one
    // with a release and re-press inside the 100 ms lockout. If the
    // second edge is correctly swallowed, the audio output is
    // sample-for-sample identical.
    let run = |double_press: bool| {
        let mut engine = engine_without_auto();
        let mut collected = Vec::new();
        let mut out = [0.0f32; 8];
        for block in 0..6000 {
            let mut frame = quiet_frame();
            // Press during block 0; optionally release at 10 ms and
            // press again at 50 ms (both inside the lockout)
            frame.keys[2] = if double_press {
                !(120..600).contains(&block)
            } else {
                true
            };
            engine.process_block(&frame, &mut out);
            collected.extend_from_slice(&out);
        }
        collected
    };

    let single = run(false);
    let double = run(true);
    assert_eq!(single, double, "second edge inside lockout must not excite");
}

#[test]
fn edges_farther_than_lockout_produce_two_excitations() {
    let run = |second_press: bool| {
        let mut engine = engine_without_auto();
        let mut total = 0.0f32;
        let mut out = [0.0f32; 8];
        for block in 0..24000 {
            let mut frame = quiet_frame();
            // First press at block 0, optional second press at 0.5 s
            frame.keys[2] = block < 60 || (second_press && (6000..6060).contains(&block));
            engine.process_block(&frame, &mut out);
            total += block_energy(&out);
        }
        total
    };

    let one = run(false);
    let two = run(true);
    assert!(
        two > one * 1.5,
        "a second pluck past the lockout adds energy: {two} vs {one}"
    );
}

#[test]
fn simultaneous_plucks_superpose() {
    // Voices are independent state machines; the mixed result of two
    // plucked strings equals the sum of each processed alone.
    let collect = |mut string: KarplusString| -> Vec<f32> {
        let mut samples = vec![string.process(true)];
        for _ in 0..9999 {
            samples.push(string.process(false));
        }
        samples
    };

    let tune = |freq: f32| {
        let mut s = KarplusString::new(48000.0);
        s.set_frequency(freq);
        s.set_damping(0.95);
        s.set_brightness(0.8);
        s
    };

    let a = collect(tune(220.0));
    let b = collect(tune(329.63));

    let mut together_a = tune(220.0);
    let mut together_b = tune(329.63);
    for i in 0..10000 {
        let trigger = i == 0;
        let mixed = together_a.process(trigger) + together_b.process(trigger);
        assert_eq!(
            mixed,
            a[i] + b[i],
            "sample {i}: polyphony must be superposition"
        );
    }
}

#[test]
fn engine_output_bounded_under_full_polyphony() {
    let mut engine = Engine::new(&EngineConfig::default()).unwrap();
    let frame = ControlFrame {
        pots: [1.0; NUM_CONTROLS],
        keys: [true; 7],
    };
    let mut out = [0.0f32; 8];
    for _ in 0..120_000 {
        engine.process_block(&frame, &mut out);
        for &sample in &out {
            assert!(sample.is_finite() && sample.abs() <= 1.0);
        }
    }
}

#[test]
fn control_round_trip_after_settling() {
    let mut engine = engine_without_auto();
    let mut frame = quiet_frame();
    frame.pots[ControlId::ReverbMix.index()] = 0.73;

    let mut out = [0.0f32; 8];
    // Smoothing time constant is 50 ms at block rate; half a second of
    // blocks is 10 time constants
    for _ in 0..6000 {
        engine.process_block(&frame, &mut out);
    }
    let mix = engine.snapshot().params.reverb_mix;
    assert!(
        (mix - 0.73).abs() < 0.005,
        "smoothed control should settle to the raw value, got {mix}"
    );
}

#[test]
fn kalimba_tuning_delay_lengths() {
    // The spec-level scenario: 220 Hz at 48 kHz is a 218-sample loop
    let mut string = KarplusString::new(48000.0);
    string.set_frequency(220.0);
    assert_eq!(string.period_samples(), 218);

    // And the default tuning's A3 voice realizes the same period
    let engine = engine_without_auto();
    let a3 = VoiceId::new(1).unwrap();
    let freq = engine.voice_frequency(a3);
    assert!((freq - 220.0).abs() < 1e-3);
}
