//! Adjoining margin collection.
//!
//! [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)

/// Running maxima of the adjoining margins seen since the chain started.
///
/// "When two or more margins collapse, the resulting margin width is the
/// maximum of the collapsing margins' widths. In the case of negative
/// margins, the maximum of the absolute values of the negative adjoining
/// margins is deducted from the maximum of the positive adjoining margins.
/// If there are no positive margins, the maximum of the absolute values of
/// the adjoining margins is deducted from zero."
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarginCollapseCollection {
    positive: f64,
    negative: f64,
}

impl MarginCollapseCollection {
    /// Start a collection seeded with one margin.
    #[must_use]
    pub fn new(initial: f64) -> Self {
        let mut collection = Self::default();
        let _ = collection.add(initial);
        collection
    }

    /// Fold a signed margin into the collection.
    pub fn add(&mut self, margin: f64) -> &mut Self {
        if margin < 0.0 {
            self.negative = self.negative.max(-margin);
        } else {
            self.positive = self.positive.max(margin);
        }
        self
    }

    /// The collapsed margin.
    #[must_use]
    pub fn get(&self) -> f64 {
        self.positive - self.negative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_positive_margins_take_the_maximum() {
        let mut c = MarginCollapseCollection::new(10.0);
        let _ = c.add(20.0).add(5.0);
        assert_eq!(c.get(), 20.0);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_negative_margin_is_deducted() {
        let mut c = MarginCollapseCollection::new(10.0);
        let _ = c.add(-4.0).add(-2.0);
        assert_eq!(c.get(), 6.0);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_only_negative_margins() {
        let mut c = MarginCollapseCollection::default();
        let _ = c.add(-3.0).add(-7.0);
        assert_eq!(c.get(), -7.0);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_clone_snapshots_state() {
        let mut c = MarginCollapseCollection::new(8.0);
        let snapshot = c;
        let _ = c.add(30.0);
        assert_eq!(snapshot.get(), 8.0);
        assert_eq!(c.get(), 30.0);
    }
}
