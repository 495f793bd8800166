//! Fixed-vector smoke test: literal stimulus on both channels, a literal
//! expected output, and a per-cycle failure flag.

use log::{debug, error};

use crate::simulator::MacTestbench;
use crate::value::{Numeric, S9};

/// Drives one value per cycle from a literal sequence. Once the sequence is
/// exhausted the last value is held; that tail is don't-care.
#[derive(Debug, Clone)]
pub struct Stimulus<V> {
    values: Vec<V>,
    cycle: usize,
}

impl<V: Numeric> Stimulus<V> {
    pub fn new(values: impl Into<Vec<V>>) -> Self {
        Self {
            values: values.into(),
            cycle: 0,
        }
    }
}

impl<V: Numeric> Iterator for Stimulus<V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        let value = self
            .values
            .get(self.cycle)
            .or_else(|| self.values.last())
            .copied()
            .unwrap_or(V::ZERO);
        self.cycle += 1;
        Some(value)
    }
}

/// Compares a live output against a literal sequence, one value per cycle.
#[derive(Debug, Clone)]
pub struct OutputVerifier<V> {
    expected: Vec<V>,
    cycle: usize,
}

impl<V: Numeric> OutputVerifier<V> {
    pub fn new(expected: impl Into<Vec<V>>) -> Self {
        Self {
            expected: expected.into(),
            cycle: 0,
        }
    }

    /// Samples `actual` for the current cycle. Returns the failure flag: set
    /// iff `actual` differs from the expected value for this cycle. Past the
    /// end of the expected sequence the flag stays low.
    pub fn verify(&mut self, actual: V) -> bool {
        let failed = match self.expected.get(self.cycle) {
            Some(&expected) if expected != actual => {
                error!(
                    "cycle {}: expected {}, got {}",
                    self.cycle, expected, actual
                );
                true
            }
            _ => false,
        };
        self.cycle += 1;
        failed
    }
}

/// Failure flag of every sampled cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchReport {
    pub failures: Vec<bool>,
}

impl BenchReport {
    pub fn cycles(&self) -> usize {
        self.failures.len()
    }

    pub fn passed(&self) -> bool {
        !self.failures.iter().any(|&failed| failed)
    }

    /// Cycles on which the failure flag was raised.
    pub fn failed_cycles(&self) -> Vec<usize> {
        self.failures
            .iter()
            .enumerate()
            .filter_map(|(cycle, &failed)| failed.then_some(cycle))
            .collect()
    }
}

pub struct FixedBench<V: Numeric> {
    xs: Stimulus<V>,
    ys: Stimulus<V>,
    verifier: OutputVerifier<V>,
    testbench: MacTestbench<V>,
}

impl<V: Numeric> FixedBench<V> {
    pub fn new(
        xs: impl Into<Vec<V>>,
        ys: impl Into<Vec<V>>,
        expected: impl Into<Vec<V>>,
    ) -> Self {
        Self {
            xs: Stimulus::new(xs),
            ys: Stimulus::new(ys),
            verifier: OutputVerifier::new(expected),
            testbench: MacTestbench::new(),
        }
    }

    /// One clock cycle; returns the failure flag sampled on it.
    pub fn step(&mut self) -> bool {
        let (x, y) = match (self.xs.next(), self.ys.next()) {
            (Some(x), Some(y)) => (x, y),
            _ => (V::ZERO, V::ZERO),
        };
        let output = self.testbench.step(x, y);
        let failed = self.verifier.verify(output);
        debug!(
            "cycle {}: x={} y={} out={} failed={}",
            self.testbench.cycle_count() - 1,
            x,
            y,
            output,
            failed
        );
        failed
    }

    pub fn run(&mut self, cycles: usize) -> BenchReport {
        BenchReport {
            failures: (0..cycles).map(|_| self.step()).collect(),
        }
    }

    pub fn testbench(&self) -> &MacTestbench<V> {
        &self.testbench
    }
}

impl FixedBench<S9> {
    /// `[1, 2, 3, 4]` on both channels, expecting `[0, 1, 5, 14]`.
    pub fn default_vectors() -> Self {
        let ramp = [1, 2, 3, 4].map(S9::new);
        Self::new(ramp, ramp, [0, 1, 5, 14].map(S9::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stimulus_holds_last_value() {
        let values: Vec<i32> = Stimulus::<i32>::new(vec![3, 4]).take(4).collect();
        assert_eq!(values, vec![3, 4, 4, 4]);
        let empty: Vec<i32> = Stimulus::<i32>::new(Vec::new()).take(2).collect();
        assert_eq!(empty, vec![0, 0]);
    }

    #[test]
    fn test_verifier_fires_only_on_mismatch() {
        let mut verifier = OutputVerifier::<i32>::new(vec![0, 1, 5]);
        assert!(!verifier.verify(0));
        assert!(verifier.verify(2));
        assert!(!verifier.verify(5));
        assert!(!verifier.verify(99));
    }

    #[test]
    fn test_default_vectors_pass() {
        let mut bench = FixedBench::default_vectors();
        let report = bench.run(4);
        assert_eq!(report.failures, vec![false; 4]);
        assert!(report.passed());
        assert_eq!(bench.testbench().accumulator(), S9::new(30));
    }

    #[test]
    fn test_wrong_expectation_is_flagged() {
        let ramp = [1, 2, 3, 4];
        let mut bench = FixedBench::<i32>::new(ramp, ramp, [0, 1, 6, 14]);
        let report = bench.run(4);
        assert!(!report.passed());
        assert_eq!(report.failed_cycles(), vec![2]);
    }
}
