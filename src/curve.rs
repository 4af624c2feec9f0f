//! Response curves mapping normalized proximity to blend strength.
//!
//! A zone's curve is sampled with `1 - distance / radius`, so a well-formed
//! curve starts near 0 at the rim and reaches 1 at the center. Curves that do
//! not are replaced with the linear ramp before use.

use serde::{Deserialize, Serialize};

/// Curves must hit 0 and 1 at the ends within this tolerance.
pub const ENDPOINT_TOLERANCE: f32 = 0.1;

/// A single control point of a keyframed curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Falloff response `f: [0,1] -> [0,1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseCurve {
    /// Piecewise linear through sorted keys, held flat beyond the ends
    Keyframes { keys: Vec<CurveKey> },
    /// Hermite smoothstep from `start` at 0 to `end` at 1
    EaseInOut { start: f32, end: f32 },
    /// `t^exponent`
    Power { exponent: f32 },
    /// Same value everywhere
    Constant { value: f32 },
}

impl Default for ResponseCurve {
    fn default() -> Self {
        Self::identity()
    }
}

impl ResponseCurve {
    /// The linear ramp through `(0, 0)` and `(1, 1)`.
    pub fn identity() -> Self {
        ResponseCurve::Keyframes {
            keys: vec![CurveKey::new(0.0, 0.0), CurveKey::new(1.0, 1.0)],
        }
    }

    /// Build a keyframed curve; keys are sorted by time.
    pub fn keyframes(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal));
        ResponseCurve::Keyframes { keys }
    }

    /// Sample the curve. `t` is clamped to [0, 1], as is the result.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let value = match self {
            ResponseCurve::Keyframes { keys } => sample_keys(keys, t),
            ResponseCurve::EaseInOut { start, end } => {
                let s = t * t * (3.0 - 2.0 * t);
                start + (end - start) * s
            }
            ResponseCurve::Power { exponent } => t.powf(*exponent),
            ResponseCurve::Constant { value } => *value,
        };
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        }
    }

    /// True when `f(1) < 0.9` or `f(0) > 0.1`.
    pub fn needs_repair(&self) -> bool {
        let (at_zero, at_one) = self.endpoints();
        at_one < 1.0 - ENDPOINT_TOLERANCE || at_zero > ENDPOINT_TOLERANCE
    }

    /// Values at t = 0 and t = 1.
    pub fn endpoints(&self) -> (f32, f32) {
        (self.evaluate(0.0), self.evaluate(1.0))
    }

    /// Return the curve unchanged if its endpoints are sane, otherwise the
    /// linear ramp. Idempotent.
    pub fn validate(curve: ResponseCurve) -> ResponseCurve {
        if curve.needs_repair() {
            ResponseCurve::identity()
        } else {
            curve
        }
    }
}

fn sample_keys(keys: &[CurveKey], t: f32) -> f32 {
    let (first, last) = match (keys.first(), keys.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return 0.0,
    };
    if t <= first.time {
        return first.value;
    }
    if t >= last.time {
        return last.value;
    }

    for pair in keys.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.time {
            let span = b.time - a.time;
            if span <= f32::EPSILON {
                return b.value;
            }
            let f = (t - a.time) / span;
            return a.value + (b.value - a.value) * f;
        }
    }

    last.value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_linear() {
        let c = ResponseCurve::identity();
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((c.evaluate(t) - t).abs() < 1e-6);
        }
        assert!(!c.needs_repair());
    }

    #[test]
    fn test_evaluate_clamps_input() {
        let c = ResponseCurve::identity();
        assert_eq!(c.evaluate(-3.0), 0.0);
        assert_eq!(c.evaluate(7.5), 1.0);
        assert_eq!(c.evaluate(f32::NAN), 0.0);
    }

    #[test]
    fn test_validate_keeps_valid_curve() {
        let smooth = ResponseCurve::EaseInOut { start: 0.0, end: 1.0 };
        assert_eq!(ResponseCurve::validate(smooth.clone()), smooth);

        let steep = ResponseCurve::Power { exponent: 2.5 };
        assert_eq!(ResponseCurve::validate(steep.clone()), steep);

        let nearly = ResponseCurve::keyframes(vec![
            CurveKey::new(0.0, 0.05),
            CurveKey::new(0.5, 0.8),
            CurveKey::new(1.0, 0.95),
        ]);
        assert_eq!(ResponseCurve::validate(nearly.clone()), nearly);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let zero = ResponseCurve::Constant { value: 0.0 };
        let once = ResponseCurve::validate(zero.clone());
        let twice = ResponseCurve::validate(ResponseCurve::validate(zero));
        assert_eq!(once, ResponseCurve::identity());
        assert_eq!(once, twice);
        assert_eq!(ResponseCurve::validate(once.clone()), once);
    }

    #[test]
    fn test_inverted_ease_is_repaired() {
        // 1 at the rim, 0 at the center
        let inverted = ResponseCurve::EaseInOut { start: 1.0, end: 0.0 };
        assert!(inverted.needs_repair());
        assert_eq!(inverted.endpoints(), (1.0, 0.0));
        assert_eq!(ResponseCurve::validate(inverted), ResponseCurve::identity());
    }

    #[test]
    fn test_empty_keys_repaired() {
        let empty = ResponseCurve::Keyframes { keys: Vec::new() };
        assert_eq!(empty.evaluate(0.5), 0.0);
        assert!(empty.needs_repair());
    }

    #[test]
    fn test_keyframes_sorted_and_held() {
        let c = ResponseCurve::keyframes(vec![
            CurveKey::new(0.8, 1.0),
            CurveKey::new(0.2, 0.0),
        ]);
        assert_eq!(c.evaluate(0.1), 0.0);
        assert!((c.evaluate(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(c.evaluate(0.9), 1.0);
    }

    #[test]
    fn test_output_clamped() {
        let hot = ResponseCurve::keyframes(vec![CurveKey::new(0.0, 0.0), CurveKey::new(1.0, 2.0)]);
        assert_eq!(hot.evaluate(1.0), 1.0);
        assert!((hot.evaluate(0.25) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_serde_tagged() {
        let json = r#"{"kind":"ease_in_out","start":0.0,"end":1.0}"#;
        let c: ResponseCurve = serde_json::from_str(json).unwrap();
        assert_eq!(c, ResponseCurve::EaseInOut { start: 0.0, end: 1.0 });
    }
}
