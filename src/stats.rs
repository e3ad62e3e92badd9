/// Running moments of a stream of numbers.
///
/// Keeps the count, the plain running sum and Welford's running mean and
/// M2 (sum of squared deviations from the mean), so both the arithmetic
/// mean and the population variance are available after every value in
/// O(1) memory.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    count: u64,
    sum: f64,
    mean: f64,
    m2: f64,
}

impl Moments {
    pub fn new() -> Moments {
        Moments::default()
    }

    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean as `sum / count`, `None` before the first value.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }

    /// Population variance (divides by `n`, not `n - 1`).
    pub fn variance(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.m2 / self.count as f64)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }
}
