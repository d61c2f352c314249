//! Basic 2D types and tolerances shared by the hull and footprint code.
//!
//! - `EPS`: near-equality threshold for unit directions (dedup, sign tests).
//! - `Interval`: closed 1D range used for projections and height checks.

/// Near-equality threshold for unit vectors and sign decisions.
pub(crate) const EPS: f64 = 1e-9;

/// Closed interval `[min, max]`.
///
/// Invariant: `min <= max` (the constructor sorts its inputs).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    /// Build from two endpoints in either order.
    #[inline]
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Closed-interval intersection test; touching endpoints count as overlap.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.min <= other.max && self.max >= other.min
    }

    /// Smallest interval covering every value, or `None` for an empty input.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut it = values.into_iter();
        let first = it.next()?;
        let (lo, hi) = it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self { min: lo, max: hi })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn constructor_sorts_endpoints() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(1.0, 0.0);
        assert_eq!(a.min(), 0.0);
        assert_eq!(a.max(), 1.0);
        assert_eq!(a, b);
    }

    #[test]
    fn touching_counts_as_overlap() {
        let a = Interval::new(0.0, 1.0);
        assert!(a.overlaps(&Interval::new(1.0, 2.0)));
        assert!(!a.overlaps(&Interval::new(1.01, 2.0)));
        assert!(!Interval::new(1.01, 2.0).overlaps(&a));
    }

    #[test]
    fn from_values_covers_all() {
        let r = Interval::from_values([3.0, -1.0, 2.5]).unwrap();
        assert_eq!(r, Interval::new(-1.0, 3.0));
        assert!(Interval::from_values(std::iter::empty()).is_none());
    }

    proptest! {
        #[test]
        fn overlap_reflexive_and_symmetric(
            a in -100.0f64..100.0, b in -100.0f64..100.0,
            c in -100.0f64..100.0, d in -100.0f64..100.0,
        ) {
            let x = Interval::new(a, b);
            let y = Interval::new(c, d);
            prop_assert!(x.overlaps(&x));
            prop_assert_eq!(x.overlaps(&y), y.overlaps(&x));
        }
    }
}
