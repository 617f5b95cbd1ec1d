//! Equal-width value binning.
//!
//! Intervals are right-closed, `(e[i], e[i+1]]`, except the first which
//! also includes its lower edge, so both ends of the range map to a bin.

/// `bin_count + 1` ascending edges spanning `[min, max]`.
#[derive(Clone, Debug, PartialEq)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    /// Partition `[min, max]` into `bin_count` equal-width intervals.
    ///
    /// Callers must ensure `min < max` and `bin_count > 0`.
    pub fn equal_width(min: f64, max: f64, bin_count: usize) -> Self {
        let width = (max - min) / bin_count as f64;
        let mut edges: Vec<f64> = (0..=bin_count).map(|i| min + i as f64 * width).collect();
        // Pin the last edge so accumulated rounding never excludes `max`.
        edges[bin_count] = max;
        Self { edges }
    }

    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn min(&self) -> f64 {
        self.edges[0]
    }

    pub fn max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Index of the bin holding `value`, or `None` outside the range.
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        if value.is_nan() || value < self.min() || value > self.max() {
            return None;
        }
        // First edge >= value; the bin is the interval ending at that edge.
        let idx = self.edges.partition_point(|&e| e < value);
        Some(idx.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_endpoints_are_included() {
        let bins = BinEdges::equal_width(0.0, 10.0, 5);
        assert_eq!(bins.bin_of(0.0), Some(0));
        assert_eq!(bins.bin_of(10.0), Some(4));
    }

    #[test]
    fn test_interior_edges_are_right_closed() {
        let bins = BinEdges::equal_width(0.0, 10.0, 5);
        assert_eq!(bins.bin_of(2.0), Some(0));
        assert_eq!(bins.bin_of(2.0001), Some(1));
        assert_eq!(bins.bin_of(5.5), Some(2));
    }

    #[test]
    fn test_out_of_range_is_none() {
        let bins = BinEdges::equal_width(0.0, 1.0, 4);
        assert_eq!(bins.bin_of(-0.1), None);
        assert_eq!(bins.bin_of(1.1), None);
        assert_eq!(bins.bin_of(f64::NAN), None);
    }

    #[test]
    fn test_single_bin() {
        let bins = BinEdges::equal_width(3.0, 7.0, 1);
        assert_eq!(bins.bin_count(), 1);
        assert_eq!(bins.bin_of(3.0), Some(0));
        assert_eq!(bins.bin_of(7.0), Some(0));
    }
}
