use std::ops::AddAssign;

/// Element of a weighted store.
///
/// The layout is fixed: two consecutive f64, sum of weights first. The
/// serialized form of a weighted store is an array of these, byte for byte.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct WeightedCell {
    pub sum_of_weights: f64,
    pub sum_of_weights_squared: f64,
}

impl WeightedCell {
    pub fn new(sum_of_weights: f64, sum_of_weights_squared: f64) -> WeightedCell {
        WeightedCell {
            sum_of_weights,
            sum_of_weights_squared,
        }
    }

    /// A cell that saw `count` fills of weight one.
    #[inline]
    pub fn from_count(count: u64) -> WeightedCell {
        let count = count as f64;
        WeightedCell::new(count, count)
    }

    #[inline(always)]
    pub fn add_weight(&mut self, weight: f64) {
        self.sum_of_weights += weight;
        self.sum_of_weights_squared += weight * weight;
    }

    #[inline(always)]
    pub fn add_count(&mut self, count: u64) {
        *self += WeightedCell::from_count(count);
    }
}

impl AddAssign for WeightedCell {
    #[inline(always)]
    fn add_assign(&mut self, other: WeightedCell) {
        self.sum_of_weights += other.sum_of_weights;
        self.sum_of_weights_squared += other.sum_of_weights_squared;
    }
}
