//! [`Period`]-related definitions.

use crate::Date;

/// Inclusive window of calendar [`Date`]s.
///
/// Both endpoints belong to the window, so a one-day rental is the degenerate
/// `start == end` case.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Period {
    /// First [`Date`] of this [`Period`].
    start: Date,

    /// Last [`Date`] of this [`Period`].
    end: Date,
}

impl Period {
    /// Creates a new [`Period`] if `start <= end`.
    #[must_use]
    pub fn new(start: Date, end: Date) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Returns the first [`Date`] of this [`Period`].
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns the last [`Date`] of this [`Period`].
    #[must_use]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Indicates whether this [`Period`] intersects the `other` one.
    ///
    /// Endpoints are inclusive: two [`Period`]s merely touching at an edge do
    /// intersect. The test is the classic interval-intersection check
    /// `a.start <= b.end && a.end >= b.start`, which is equivalent to
    /// enumerating the three cases of one endpoint lying inside the other
    /// window or one window containing the other entirely.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Indicates whether the given [`Date`] lies inside this [`Period`].
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod spec {
    use crate::Date;

    use super::Period;

    fn date(s: &str) -> Date {
        Date::from_calendar_str(s).unwrap()
    }

    fn period(start: &str, end: &str) -> Period {
        Period::new(date(start), date(end)).unwrap()
    }

    #[test]
    fn rejects_inverted_endpoints() {
        assert!(Period::new(date("2024-03-02"), date("2024-03-01")).is_none());
    }

    #[test]
    fn allows_single_day() {
        let p = period("2024-03-01", "2024-03-01");
        assert!(p.contains(date("2024-03-01")));
    }

    #[test]
    fn overlapping_windows_intersect() {
        // Contract spanning 03-10..03-15 against window 03-01..03-12.
        let contract = period("2024-03-10", "2024-03-15");
        let window = period("2024-03-01", "2024-03-12");
        assert!(contract.overlaps(&window));
        assert!(window.overlaps(&contract));
    }

    #[test]
    fn disjoint_windows_do_not_intersect() {
        // Contract spanning 01-01..01-05 against window 02-01..02-10.
        let contract = period("2024-01-01", "2024-01-05");
        let window = period("2024-02-01", "2024-02-10");
        assert!(!contract.overlaps(&window));
        assert!(!window.overlaps(&contract));
    }

    #[test]
    fn touching_edges_count_as_intersection() {
        let window = period("2024-03-01", "2024-03-12");

        // Starts exactly on the window's last day.
        assert!(period("2024-03-12", "2024-03-20").overlaps(&window));
        // Ends exactly on the window's first day.
        assert!(period("2024-02-20", "2024-03-01").overlaps(&window));
        // Ends the day before the window opens.
        assert!(!period("2024-02-20", "2024-02-29").overlaps(&window));
        // Starts the day after the window closes.
        assert!(!period("2024-03-13", "2024-03-20").overlaps(&window));
    }

    #[test]
    fn containment_counts_as_intersection() {
        let window = period("2024-03-05", "2024-03-08");
        assert!(period("2024-03-01", "2024-03-12").overlaps(&window));
        assert!(period("2024-03-06", "2024-03-07").overlaps(&window));
    }

    #[test]
    fn matches_three_clause_enumeration() {
        // The compact test must agree with the expanded rule:
        //   (w.start <= c.start <= w.end) OR
        //   (w.start <= c.end   <= w.end) OR
        //   (c.start <= w.start AND c.end >= w.end)
        let days: Vec<_> = (1..=9)
            .map(|d| date(&format!("2024-03-0{d}")))
            .collect();

        for &ws in &days {
            for &we in &days {
                let Some(window) = Period::new(ws, we) else {
                    continue;
                };
                for &cs in &days {
                    for &ce in &days {
                        let Some(contract) = Period::new(cs, ce) else {
                            continue;
                        };
                        let expanded = (ws <= cs && cs <= we)
                            || (ws <= ce && ce <= we)
                            || (cs <= ws && ce >= we);
                        assert_eq!(
                            contract.overlaps(&window),
                            expanded,
                            "divergence for contract {contract:?} \
                             against window {window:?}",
                        );
                    }
                }
            }
        }
    }
}
