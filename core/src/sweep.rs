//! Core-count schedules

use serde::{Deserialize, Serialize};

/// Arithmetic range of core counts, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreSweep {
    /// First core count
    pub start: usize,
    /// Increment between core counts
    pub step: usize,
    /// Exclusive upper bound
    pub end: usize,
}

impl Default for CoreSweep {
    fn default() -> Self {
        Self {
            start: 4,
            step: 4,
            end: 132,
        }
    }
}

impl CoreSweep {
    /// Create a sweep from its bounds
    pub fn new(start: usize, step: usize, end: usize) -> Self {
        Self { start, step, end }
    }

    /// Core counts in increasing order
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        // step_by panics on zero; validate() rejects it but iter() must not
        (self.start..self.end).step_by(self.step.max(1))
    }

    /// Number of core counts visited
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True if no core count is visited
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which core counts a run visits, and whether each must be activated first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreSchedule {
    /// Sweep driver: activate each count, then run the catalog
    Sweep(CoreSweep),
    /// Fixed-count driver: the caller already set up the machine
    Fixed(usize),
}

impl CoreSchedule {
    /// Core counts in visiting order
    pub fn core_counts(&self) -> Vec<usize> {
        match self {
            CoreSchedule::Sweep(sweep) => sweep.iter().collect(),
            CoreSchedule::Fixed(cores) => vec![*cores],
        }
    }

    /// Whether the activation helper runs before each core count
    pub fn activates_cores(&self) -> bool {
        matches!(self, CoreSchedule::Sweep(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sweep_values() {
        let counts: Vec<_> = CoreSweep::default().iter().collect();
        assert_eq!(counts.first(), Some(&4));
        assert_eq!(counts.last(), Some(&128));
        assert_eq!(counts.len(), 32);
        assert!(counts.windows(2).all(|w| w[1] - w[0] == 4));
    }

    #[test]
    fn test_end_is_exclusive() {
        let counts: Vec<_> = CoreSweep::new(2, 2, 8).iter().collect();
        assert_eq!(counts, vec![2, 4, 6]);
    }

    #[test]
    fn test_empty_sweep() {
        assert!(CoreSweep::new(8, 4, 8).is_empty());
    }

    #[test]
    fn test_schedule_fixed() {
        let schedule = CoreSchedule::Fixed(4);
        assert_eq!(schedule.core_counts(), vec![4]);
        assert!(!schedule.activates_cores());
    }

    #[test]
    fn test_schedule_sweep_activates() {
        let schedule = CoreSchedule::Sweep(CoreSweep::default());
        assert!(schedule.activates_cores());
        assert_eq!(schedule.core_counts().len(), 32);
    }
}
