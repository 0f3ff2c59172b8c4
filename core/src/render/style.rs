use serde::Serialize;

/// Straight RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// HSL color; the hue is in degrees and wraps around the color wheel.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let hue = if hue.is_finite() { hue.rem_euclid(360.0) } else { 0.0 };
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let sector = hue / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (r, g, b) = match sector as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        Self {
            r: r + m,
            g: g + m,
            b: b + m,
            a: alpha.clamp(0.0, 1.0),
        }
    }

    /// Speed-coded vehicle color: hue = speed x 10 degrees.
    pub fn for_speed(speed: f32, alpha: f32) -> Self {
        Self::from_hsl(speed * 10.0, 0.7, 0.5, alpha)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
    /// `(dash, gap)` in pixels for dashed lines.
    pub dash: Option<(f32, f32)>,
}

impl StrokeStyle {
    pub fn solid(color: Rgba, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgba, width: f32, dash: f32, gap: f32) -> Self {
        Self {
            color,
            width,
            dash: Some((dash, gap)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub color: Rgba,
    pub size: f32,
    pub align: TextAlign,
    /// Drop shadow drawn one pixel down-right of the text.
    pub shadow: Option<Rgba>,
}

impl TextStyle {
    pub fn plain(color: Rgba, size: f32) -> Self {
        Self {
            color,
            size,
            align: TextAlign::Left,
            shadow: None,
        }
    }

    pub fn centered(self) -> Self {
        Self {
            align: TextAlign::Center,
            ..self
        }
    }

    pub fn shadowed(self, shadow: Rgba) -> Self {
        Self {
            shadow: Some(shadow),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn primary_hues() {
        let red = Rgba::from_hsl(0.0, 1.0, 0.5, 1.0);
        assert_abs_diff_eq!(red.r, 1.0);
        assert_abs_diff_eq!(red.g, 0.0);
        let blue = Rgba::from_hsl(240.0, 1.0, 0.5, 1.0);
        assert_abs_diff_eq!(blue.b, 1.0);
        assert_abs_diff_eq!(blue.r, 0.0);
    }

    #[test]
    fn speed_hue_wraps_past_full_circle() {
        assert_eq!(Rgba::for_speed(4.0, 1.0), Rgba::for_speed(40.0, 1.0));
        assert_eq!(Rgba::for_speed(-2.0, 0.3), Rgba::from_hsl(340.0, 0.7, 0.5, 0.3));
    }
}
