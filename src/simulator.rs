use log::debug;

use crate::mac::MacInput;
use crate::moore::{self, Mac, MooreMachine};
use crate::value::Numeric;

/// Runs the MAC unit over two operand channels, trimmed to the shorter one.
/// Every call starts from a freshly reset accumulator.
pub fn simulate_mac<V: Numeric>(xs: &[V], ys: &[V]) -> Vec<V> {
    let inputs = xs.iter().zip(ys).map(|(&x, &y)| MacInput::new(x, y));
    moore::run(Mac::<V>::new(), inputs)
}

/// What the bench observed on one clock edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleRecord<V> {
    pub cycle: u64,
    pub x: V,
    pub y: V,
    /// Output sampled during the cycle (the accumulator before the edge).
    pub output: V,
    /// Accumulator after the edge.
    pub next: V,
}

/// Live, cycle-by-cycle bench around a single MAC instance.
#[derive(Debug, Clone)]
pub struct MacTestbench<V: Numeric> {
    dut: MooreMachine<Mac<V>>,
    records: Vec<CycleRecord<V>>,
}

impl<V: Numeric> MacTestbench<V> {
    pub fn new() -> Self {
        Self {
            dut: MooreMachine::new(Mac::new()),
            records: Vec::new(),
        }
    }

    /// Puts the accumulator back to zero and forgets the recorded waveform.
    pub fn reset(&mut self) {
        debug!("Resetting MAC testbench after {} cycles", self.dut.cycle());
        self.dut.reset();
        self.records.clear();
    }

    /// Single clock step
    pub fn step(&mut self, x: V, y: V) -> V {
        let cycle = self.dut.cycle();
        let output = self.dut.step(MacInput::new(x, y));
        self.records.push(CycleRecord {
            cycle,
            x,
            y,
            output,
            next: self.dut.state().acc,
        });
        output
    }

    /// Clocks in operands from `stimulus` until it runs dry or `cycles` have
    /// elapsed. Returns the outputs observed.
    pub fn run_for_cycles<I>(&mut self, stimulus: I, cycles: usize) -> Vec<V>
    where
        I: IntoIterator<Item = (V, V)>,
    {
        stimulus
            .into_iter()
            .take(cycles)
            .map(|(x, y)| self.step(x, y))
            .collect()
    }

    pub fn cycle_count(&self) -> u64 {
        self.dut.cycle()
    }

    pub fn accumulator(&self) -> V {
        self.dut.state().acc
    }

    pub fn records(&self) -> &[CycleRecord<V>] {
        &self.records
    }
}

impl<V: Numeric> Default for MacTestbench<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::S9;

    #[test]
    fn test_simulate_mac_trims_to_shorter_channel() {
        let xs = [S9::new(1), S9::new(2), S9::new(3)];
        let ys = [S9::new(4), S9::new(5)];
        assert_eq!(simulate_mac(&xs, &ys), vec![S9::ZERO, S9::new(4)]);
        assert!(simulate_mac(&xs, &[]).is_empty());
    }

    #[test]
    fn test_testbench_records_each_cycle() {
        let mut tb = MacTestbench::<i32>::new();
        let outputs = tb.run_for_cycles([(2, 3), (4, 5), (6, 7)], 2);
        assert_eq!(outputs, vec![0, 6]);
        assert_eq!(tb.cycle_count(), 2);
        assert_eq!(tb.accumulator(), 26);

        let last = tb.records()[1];
        assert_eq!(last.cycle, 1);
        assert_eq!((last.x, last.y), (4, 5));
        assert_eq!((last.output, last.next), (6, 26));
    }

    #[test]
    fn test_reset_sequence() {
        let mut tb = MacTestbench::<S9>::new();
        tb.step(S9::new(9), S9::new(9));
        tb.reset();
        assert_eq!(tb.cycle_count(), 0);
        assert!(tb.records().is_empty());
        assert_eq!(tb.step(S9::new(1), S9::new(1)), S9::ZERO);
    }
}
