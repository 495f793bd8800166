//! Randomized equivalence checking of a MAC driver against the reference
//! model, with counterexample minimization.
//!
//! Inputs are drawn with proptest from a seeded runner, so a given
//! [`EquivalenceConfig`] always explores the same traces. When a trace
//! diverges, proptest first shrinks it (shorter channels before smaller
//! values) and [`minimize`] then cuts it down to the fewest cycles that still
//! reproduce the first divergence.

use std::fmt;

use itertools::Itertools;
use log::{debug, info, warn};
use proptest::arbitrary::{any, Arbitrary};
use proptest::collection::vec;
use proptest::test_runner::{Config, RngAlgorithm, TestCaseError, TestError, TestRng, TestRunner};

use crate::model::reference_outputs;
use crate::value::Numeric;

/// Longest channel generated by [`EquivalenceConfig::short`].
pub const SHORT_TRACE_LEN: usize = 100;
/// Longest channel generated by [`EquivalenceConfig::long`].
pub const LONG_TRACE_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceConfig {
    /// Number of random traces to try.
    pub cases: u32,
    /// Each channel has between 0 and `max_len` values.
    pub max_len: usize,
    pub seed: u64,
    /// Upper bound on shrink steps, shared by proptest and [`minimize`].
    pub max_shrink_iters: u32,
}

impl EquivalenceConfig {
    pub fn new(cases: u32, max_len: usize) -> Self {
        Self {
            cases,
            max_len,
            ..Self::default()
        }
    }

    pub fn short() -> Self {
        Self::new(256, SHORT_TRACE_LEN)
    }

    pub fn long() -> Self {
        Self::new(256, LONG_TRACE_LEN)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn rng(&self) -> TestRng {
        let mut seed = [0u8; 32];
        seed[..8].copy_from_slice(&self.seed.to_le_bytes());
        TestRng::from_seed(RngAlgorithm::ChaCha, &seed)
    }
}

impl Default for EquivalenceConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_len: SHORT_TRACE_LEN,
            seed: 0,
            max_shrink_iters: 4096,
        }
    }
}

/// First cycle on which two output traces disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Divergence<V> {
    pub cycle: usize,
    pub expected: V,
    pub actual: V,
}

/// Compares two output traces over their common length.
pub fn first_divergence<V: Numeric>(expected: &[V], actual: &[V]) -> Option<Divergence<V>> {
    expected
        .iter()
        .zip(actual)
        .find_position(|(e, a)| e != a)
        .map(|(cycle, (&expected, &actual))| Divergence {
            cycle,
            expected,
            actual,
        })
}

fn diverges<V, F>(xs: &[V], ys: &[V], driver: &F) -> Option<Divergence<V>>
where
    V: Numeric,
    F: Fn(&[V], &[V]) -> Vec<V>,
{
    first_divergence(&reference_outputs(xs, ys), &driver(xs, ys))
}

/// A minimized pair of input channels on which the driver disagrees with the
/// reference model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterexample<V> {
    pub xs: Vec<V>,
    pub ys: Vec<V>,
    pub divergence: Divergence<V>,
    pub expected: Vec<V>,
    pub actual: Vec<V>,
    /// Candidates accepted by [`minimize`] after proptest finished shrinking.
    pub shrink_steps: usize,
}

impl<V> Counterexample<V> {
    /// Number of cycles the trace actually runs for.
    pub fn cycles(&self) -> usize {
        self.xs.len().min(self.ys.len())
    }
}

impl<V: fmt::Display> fmt::Display for Counterexample<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "outputs diverge at cycle {}: expected {}, got {}",
            self.divergence.cycle, self.divergence.expected, self.divergence.actual
        )?;
        writeln!(f, "  xs       = [{}]", self.xs.iter().join(", "))?;
        writeln!(f, "  ys       = [{}]", self.ys.iter().join(", "))?;
        writeln!(f, "  expected = [{}]", self.expected.iter().join(", "))?;
        write!(f, "  actual   = [{}]", self.actual.iter().join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<V> {
    /// Every generated trace matched.
    Equivalent { cases: u32 },
    Diverged(Box<Counterexample<V>>),
    /// The runner gave up without finding a verdict.
    Aborted(String),
}

impl<V> Verdict<V> {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Verdict::Equivalent { .. })
    }

    pub fn counterexample(&self) -> Option<&Counterexample<V>> {
        match self {
            Verdict::Diverged(cex) => Some(&**cex),
            _ => None,
        }
    }
}

/// Checks `driver` against [`reference_outputs`] on `config.cases` random
/// traces.
pub fn check_equivalence<V, F>(config: &EquivalenceConfig, driver: F) -> Verdict<V>
where
    V: Numeric + Arbitrary,
    F: Fn(&[V], &[V]) -> Vec<V>,
{
    info!(
        "Checking equivalence on {} traces of up to {} cycles (seed {})",
        config.cases, config.max_len, config.seed
    );

    let runner_config = Config {
        cases: config.cases,
        max_shrink_iters: config.max_shrink_iters,
        failure_persistence: None,
        ..Config::default()
    };
    let mut runner = TestRunner::new_with_rng(runner_config, config.rng());
    let channels = (
        vec(any::<V>(), 0..=config.max_len),
        vec(any::<V>(), 0..=config.max_len),
    );

    let result = runner.run(&channels, |(xs, ys)| {
        match diverges(&xs, &ys, &driver) {
            Some(d) => Err(TestCaseError::fail(format!(
                "outputs diverge at cycle {}: expected {}, got {}",
                d.cycle, d.expected, d.actual
            ))),
            None => Ok(()),
        }
    });

    match result {
        Ok(()) => {
            info!("All {} traces matched the reference model", config.cases);
            Verdict::Equivalent {
                cases: config.cases,
            }
        }
        Err(TestError::Fail(reason, (xs, ys))) => {
            warn!("Equivalence failed: {}", reason);
            match minimize(xs, ys, &driver, config.max_shrink_iters) {
                Some(cex) => Verdict::Diverged(Box::new(cex)),
                None => Verdict::Aborted(format!("failure did not reproduce: {}", reason)),
            }
        }
        Err(TestError::Abort(reason)) => Verdict::Aborted(reason.to_string()),
    }
}

/// Greedily shrinks a failing trace: cut to the divergence prefix, drop single
/// cycles, then pull single values toward zero. Stops when no candidate still
/// fails or after `max_iters` accepted candidates. Returns `None` when the
/// given trace does not fail in the first place.
pub fn minimize<V, F>(
    xs: Vec<V>,
    ys: Vec<V>,
    driver: &F,
    max_iters: u32,
) -> Option<Counterexample<V>>
where
    V: Numeric,
    F: Fn(&[V], &[V]) -> Vec<V>,
{
    let mut best = Candidate::new(xs, ys, driver)?;
    let mut steps = 0usize;

    while steps < max_iters as usize {
        let Some(next) = best
            .smaller()
            .into_iter()
            .find_map(|(xs, ys)| Candidate::new(xs, ys, driver))
        else {
            break;
        };
        debug!(
            "Shrunk counterexample to {} cycles, divergence at cycle {}",
            next.cycles(),
            next.divergence.cycle
        );
        best = next;
        steps += 1;
    }

    let expected = reference_outputs(&best.xs, &best.ys);
    let actual = driver(&best.xs, &best.ys);
    Some(Counterexample {
        xs: best.xs,
        ys: best.ys,
        divergence: best.divergence,
        expected,
        actual,
        shrink_steps: steps,
    })
}

/// A trace known to fail.
struct Candidate<V> {
    xs: Vec<V>,
    ys: Vec<V>,
    divergence: Divergence<V>,
}

impl<V: Numeric> Candidate<V> {
    fn new<F>(xs: Vec<V>, ys: Vec<V>, driver: &F) -> Option<Self>
    where
        F: Fn(&[V], &[V]) -> Vec<V>,
    {
        let divergence = diverges(&xs, &ys, driver)?;
        Some(Self { xs, ys, divergence })
    }

    fn cycles(&self) -> usize {
        self.xs.len().min(self.ys.len())
    }

    /// Strictly smaller traces, most aggressive first.
    fn smaller(&self) -> Vec<(Vec<V>, Vec<V>)> {
        let mut out = Vec::new();
        let cycles = self.cycles();

        let keep = self.divergence.cycle + 1;
        if self.xs.len() > keep || self.ys.len() > keep {
            out.push((self.xs[..keep].to_vec(), self.ys[..keep].to_vec()));
        }

        for i in 0..cycles {
            let mut xs = self.xs.clone();
            let mut ys = self.ys.clone();
            xs.remove(i);
            ys.remove(i);
            out.push((xs, ys));
        }

        for i in 0..cycles {
            for x in toward_zero(self.xs[i]) {
                let mut xs = self.xs.clone();
                xs[i] = x;
                out.push((xs, self.ys.clone()));
            }
            for y in toward_zero(self.ys[i]) {
                let mut ys = self.ys.clone();
                ys[i] = y;
                out.push((self.xs.clone(), ys));
            }
        }
        out
    }
}

fn toward_zero<V: Numeric>(value: V) -> Vec<V> {
    let v = value.to_i64();
    if v == 0 {
        return Vec::new();
    }
    let half = V::from_i64_wrapping(v / 2);
    if half == V::ZERO {
        vec![V::ZERO]
    } else {
        vec![V::ZERO, half]
    }
}
