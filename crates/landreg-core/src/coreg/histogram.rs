use ndarray::{Array1, Array2, Axis};
use num_traits::Float;

/// Shannon entropy `-Σ p ln p` of a probability sequence.
///
/// Zero-probability cells are skipped (`0 · ln 0 = 0`).
pub fn shannon_entropy<T, I>(probabilities: I) -> T
where
    T: Float,
    I: IntoIterator<Item = T>,
{
    probabilities
        .into_iter()
        .filter(|p| *p > T::zero())
        .fold(T::zero(), |acc, p| acc - p * p.ln())
}

/// Joint distribution of (master bin, slave bin) pairs.
///
/// Rows index master bins, columns index slave bins. Entries sum to 1.
#[derive(Clone, Debug, PartialEq)]
pub struct JointHistogram {
    probabilities: Array2<f64>,
    pair_count: usize,
}

impl JointHistogram {
    /// Accumulate `(master_bin, slave_bin)` pairs into a normalised table.
    ///
    /// Returns `None` when no pairs were supplied.
    pub fn from_pairs<I>(pairs: I, master_bins: usize, slave_bins: usize) -> Option<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut counts = Array2::<f64>::zeros((master_bins, slave_bins));
        let mut pair_count = 0usize;
        for (a, b) in pairs {
            counts[[a, b]] += 1.0;
            pair_count += 1;
        }
        if pair_count == 0 {
            return None;
        }
        counts /= pair_count as f64;
        Some(Self {
            probabilities: counts,
            pair_count,
        })
    }

    /// Normalised `p(a, b)` table.
    pub fn probabilities(&self) -> &Array2<f64> {
        &self.probabilities
    }

    /// Number of sample pairs that went into the table.
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// `p(a) = Σ_b p(a, b)`
    pub fn master_marginal(&self) -> Array1<f64> {
        self.probabilities.sum_axis(Axis(1))
    }

    /// `p(b) = Σ_a p(a, b)`
    pub fn slave_marginal(&self) -> Array1<f64> {
        self.probabilities.sum_axis(Axis(0))
    }

    pub fn joint_entropy(&self) -> f64 {
        shannon_entropy(self.probabilities.iter().copied())
    }

    /// `H(A) + H(B) - H(A, B)`, in nats.
    pub fn mutual_information(&self) -> f64 {
        let h_a = shannon_entropy(self.master_marginal().iter().copied());
        let h_b = shannon_entropy(self.slave_marginal().iter().copied());
        // Plug-in MI is non-negative; clamp rounding noise around zero.
        (h_a + h_b - self.joint_entropy()).max(0.0)
    }
}
