use rand::Rng;

/// Continuous power law with density proportional to `x^exponent` on `[min, max]`.
///
/// Sampling uses the inverse CDF. A degenerate range (`max <= min`) always
/// yields `min`, so every sample is bounded below by `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLaw {
    exponent: f64,
    min: f64,
    max: f64,
}

impl PowerLaw {
    pub fn new(exponent: f64, min: f64, max: f64) -> Self {
        PowerLaw { exponent, min, max }
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        let u: f64 = rng.gen_range(0.0..1.0);
        let x = if (self.exponent + 1.0).abs() < f64::EPSILON {
            // x^-1 integrates to a logarithm
            self.min * (self.max / self.min).powf(u)
        } else {
            let k = self.exponent + 1.0;
            let lo = self.min.powf(k);
            let hi = self.max.powf(k);
            (lo + u * (hi - lo)).powf(1.0 / k)
        };
        x.clamp(self.min, self.max)
    }
}
