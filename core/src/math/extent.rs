/// Running min/max accumulator that ignores non-finite values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    min: f32,
    max: f32,
}

impl Extent {
    pub fn empty() -> Self {
        Self {
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        }
    }

    pub fn include(&mut self, value: f32) {
        if value.is_finite() {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    /// `(min, max)` once at least one finite value has been seen.
    pub fn range(&self) -> Option<(f32, f32)> {
        (self.min.is_finite() && self.max.is_finite()).then_some((self.min, self.max))
    }

    pub fn padded(&self, padding: f32) -> Option<(f32, f32)> {
        self.range().map(|(min, max)| (min - padding, max + padding))
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<f32> for Extent {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        let mut extent = Extent::empty();
        for value in iter {
            extent.include(value);
        }
        extent
    }
}
