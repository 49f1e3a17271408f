/// A straight (not premultiplied) RGBA color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: f32, pub g: f32, pub b: f32, pub a: f32,
}

impl Color {
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    /// Builds a color from hue, saturation and value, each in `[0, 1]`.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32, a: f32) -> Color {
        let hue = hue.rem_euclid(1.0) * 6.0;
        // rounding can land a hue just below zero on exactly 6
        let sector = hue.floor().min(5.0);
        let f = hue - sector;

        let p = value * (1.0 - saturation);
        let q = value * (1.0 - saturation * f);
        let t = value * (1.0 - saturation * (1.0 - f));

        let (r, g, b) = match sector as u32 {
            0 => (value, t, p),
            1 => (q, value, p),
            2 => (p, value, t),
            3 => (p, q, value),
            4 => (t, p, value),
            _ => (value, p, q),
        };

        Color { r, g, b, a }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Period of one full trip around the hue circle for the background.
const BACKGROUND_HUE_PERIOD_MS: u64 = 5 * 1000;

/// The slowly cycling background color at `millis` milliseconds.
pub fn background_at(millis: u64) -> Color {
    let hue = (millis % BACKGROUND_HUE_PERIOD_MS) as f32 / BACKGROUND_HUE_PERIOD_MS as f32;
    Color::from_hsv(hue, 0.3, 0.2, 1.0)
}

///
/// A seeded source of bright, saturated colors.
///
/// Resetting before each frame hands out the same color sequence every time, so the n-th
/// subpath keeps its color from frame to frame.
///
pub struct ColorSequence {
    seed: u64,
    rng: fastrand::Rng,
}

impl ColorSequence {
    pub fn new(seed: u64) -> ColorSequence {
        ColorSequence { seed, rng: fastrand::Rng::with_seed(seed) }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn reset(&mut self) {
        self.rng.seed(self.seed);
    }

    pub fn next_color(&mut self) -> Color {
        let hue = self.rng.u32(0..255) as f32 / 255.0;
        let saturation = self.rng.u32(150..255) as f32 / 255.0;
        let value = self.rng.u32(170..255) as f32 / 255.0;
        Color::from_hsv(hue, saturation, value, 1.0)
    }
}

impl Iterator for ColorSequence {
    type Item = Color;

    fn next(&mut self) -> Option<Color> {
        Some(self.next_color())
    }
}
