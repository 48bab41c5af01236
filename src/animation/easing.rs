use std::f64::consts::PI;

/// An easing curve, named the way GSAP names them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::EnumString, strum::Display, strum::EnumIter)]
pub(crate) enum Easing {
    #[strum(serialize = "linear", serialize = "none")]
    Linear,
    #[default]
    #[strum(serialize = "power1.out")]
    Power1Out,
    #[strum(serialize = "power2.out")]
    Power2Out,
    #[strum(serialize = "power1.inOut")]
    Power1InOut,
    #[strum(serialize = "sine.inOut")]
    SineInOut,
    #[strum(serialize = "sine.out")]
    SineOut,
}

impl Easing {
    /// Map linear progress in `0..=1` onto the curve.
    pub(crate) fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power1Out => 1.0 - (1.0 - t).powi(2),
            Self::Power2Out => 1.0 - (1.0 - t).powi(3),
            Self::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Self::SineOut => (t * PI / 2.0).sin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn endpoints_are_fixed() {
        for easing in Easing::iter() {
            assert!(easing.apply(0.0).abs() < 1e-9, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{easing} at 1");
        }
    }

    #[rstest]
    #[case::linear(Easing::Linear, 0.5)]
    #[case::sine(Easing::SineInOut, 0.5)]
    #[case::power_in_out(Easing::Power1InOut, 0.5)]
    #[case::power1(Easing::Power1Out, 0.75)]
    #[case::power2(Easing::Power2Out, 0.875)]
    fn midpoint(#[case] easing: Easing, #[case] expected: f64) {
        assert!((easing.apply(0.5) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case("linear", Easing::Linear)]
    #[case("none", Easing::Linear)]
    #[case("sine.inOut", Easing::SineInOut)]
    #[case("power2.out", Easing::Power2Out)]
    fn parse(#[case] input: &str, #[case] expected: Easing) {
        assert_eq!(Easing::from_str(input).expect("parse failed"), expected);
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(Easing::Power1Out.apply(3.0), 1.0);
        assert_eq!(Easing::Power1Out.apply(-1.0), 0.0);
    }
}
