//! Control-value smoothing for zipper-free parameter changes.
//!
//! Physical controls arrive as stepped readings; applying them directly
//! to synthesis parameters produces audible "zipper noise". A
//! [`SmoothedParam`] moves toward its target with a one-pole lowpass,
//! giving an RC-like response with a configurable time constant.
//!
//! ```rust
//! use tines_core::SmoothedParam;
//!
//! let mut brightness = SmoothedParam::with_config(0.5, 48000.0, 20.0);
//! brightness.set_target(0.9);
//!
//! // Advance once per update (per block for controls)
//! let v = brightness.advance();
//! assert!(v > 0.5 && v < 0.9);
//! ```

use libm::expf;

/// A parameter with one-pole exponential smoothing.
///
/// Difference equation: `y[n] = y[n-1] + coeff * (target - y[n-1])`,
/// a first-order IIR with pole at `1 - coeff`. The time constant tau
/// (time to reach 63.2% of target) relates to the coefficient by
/// `coeff = 1 - exp(-1 / (tau * rate))`, where `rate` is the update
/// rate in Hz (the sample rate for per-sample smoothing, the block
/// rate for per-block smoothing).
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coeff: f32,
    update_rate: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create a smoothed parameter with full configuration.
    ///
    /// # Arguments
    /// * `initial` - Initial value (current and target)
    /// * `update_rate` - Rate at which [`advance`](Self::advance) is called, in Hz
    /// * `smoothing_time_ms` - Time constant in milliseconds (0 = instant)
    pub fn with_config(initial: f32, update_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            update_rate,
            smoothing_time_ms,
        };
        param.recalculate_coeff();
        param
    }

    /// Set the target value. The parameter approaches it exponentially.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and snap to it immediately.
    ///
    /// Used for the first raw reading of a control, so a knob left at
    /// 3 o'clock at power-on does not produce a settling sweep.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update the rate at which this parameter is advanced.
    pub fn set_update_rate(&mut self, update_rate: f32) {
        self.update_rate = update_rate;
        self.recalculate_coeff();
    }

    /// Set the smoothing time constant in milliseconds.
    pub fn set_smoothing_time_ms(&mut self, time_ms: f32) {
        self.smoothing_time_ms = time_ms;
        self.recalculate_coeff();
    }

    /// Advance one update step and return the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the parameter has effectively reached its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.update_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let steps_per_tau = self.smoothing_time_ms / 1000.0 * self.update_rate;
            self.coeff = 1.0 - expf(-1.0 / steps_per_tau);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::with_config(0.0, 48000.0, 0.0)
    }
}
