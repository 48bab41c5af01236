/// An RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Mix this color into `background`; an opacity of 0 is the background, 1 is this color.
    pub(crate) fn over(self, background: Color, opacity: f64) -> Color {
        let opacity = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (f64::from(bg) + (f64::from(fg) - f64::from(bg)) * opacity).round() as u8;
        Color::new(mix(self.r, background.r), mix(self.g, background.g), mix(self.b, background.b))
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        Self::Rgb { r: color.r, g: color.g, b: color.b }
    }
}

/// Convert HSL to RGB color
/// H: hue (0-360), S: saturation (0-100), L: lightness (0-100)
pub(crate) fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Color {
    let h = h.rem_euclid(360.0);
    let s = s / 100.0;
    let l = l / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Color::new(((r + m) * 255.0).round() as u8, ((g + m) * 255.0).round() as u8, ((b + m) * 255.0).round() as u8)
}

/// The colors the page is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub block: Color,
    pub marker: Color,
    pub debug: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::new(12, 12, 14),
            text: Color::new(236, 236, 240),
            muted: Color::new(161, 161, 170),
            // zinc-200
            block: Color::new(228, 228, 231),
            marker: hsl_to_rgb(200.0, 85.0, 65.0),
            debug: Color::new(0, 200, 120),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::red(0.0, Color::new(255, 0, 0))]
    #[case::green(120.0, Color::new(0, 255, 0))]
    #[case::blue(240.0, Color::new(0, 0, 255))]
    #[case::wraps(360.0, Color::new(255, 0, 0))]
    fn primary_hues(#[case] hue: f64, #[case] expected: Color) {
        assert_eq!(hsl_to_rgb(hue, 100.0, 50.0), expected);
    }

    #[test]
    fn opacity_blends_towards_background() {
        let white = Color::new(255, 255, 255);
        let black = Color::new(0, 0, 0);
        assert_eq!(white.over(black, 1.0), white);
        assert_eq!(white.over(black, 0.0), black);
        assert_eq!(white.over(black, 0.5), Color::new(128, 128, 128));
    }
}
