//! Moore-style sequential driver: output depends only on the registered state,
//! so every output lags its input by one cycle.

use std::fmt::Debug;
use std::marker::PhantomData;

use log::trace;

use crate::mac::{mac_update, MacInput, MacState};
use crate::value::Numeric;

/// A synchronous circuit with a single state register.
pub trait Moore {
    type Input: Copy + Debug;
    type Output: Debug;
    type State: Copy + Debug;

    const INITIAL_STATE: Self::State;

    fn transition(&self, state: Self::State, input: Self::Input) -> Self::State;
    fn output(&self, state: Self::State) -> Self::Output;
}

/// Multiply-accumulate unit with an accumulator register as its only state.
#[derive(Debug, Clone, Copy)]
pub struct Mac<V> {
    _value: PhantomData<V>,
}

impl<V> Mac<V> {
    pub fn new() -> Self {
        Self { _value: PhantomData }
    }
}

impl<V> Default for Mac<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Numeric> Moore for Mac<V> {
    type Input = MacInput<V>;
    type Output = V;
    type State = MacState<V>;

    const INITIAL_STATE: Self::State = MacState::RESET;

    fn transition(&self, state: MacState<V>, input: MacInput<V>) -> MacState<V> {
        mac_update(state, input)
    }

    fn output(&self, state: MacState<V>) -> V {
        state.acc
    }
}

/// Holds the state of one circuit instance and advances it one cycle per call.
#[derive(Debug, Clone)]
pub struct MooreMachine<M: Moore> {
    dut: M,
    state: M::State,
    cycle: u64,
}

impl<M: Moore> MooreMachine<M> {
    pub fn new(dut: M) -> Self {
        Self {
            dut,
            state: M::INITIAL_STATE,
            cycle: 0,
        }
    }

    /// Emits the output of the current state, then clocks in `input`.
    pub fn step(&mut self, input: M::Input) -> M::Output {
        let output = self.dut.output(self.state);
        let next = self.dut.transition(self.state, input);
        trace!(
            "cycle {}: state={:?} input={:?} output={:?} next={:?}",
            self.cycle,
            self.state,
            input,
            output,
            next
        );
        self.state = next;
        self.cycle += 1;
        output
    }

    pub fn state(&self) -> M::State {
        self.state
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn reset(&mut self) {
        self.state = M::INITIAL_STATE;
        self.cycle = 0;
    }
}

/// Iterator returned by [`simulate`].
pub struct Simulate<M: Moore, I> {
    machine: MooreMachine<M>,
    inputs: I,
}

impl<M, I> Iterator for Simulate<M, I>
where
    M: Moore,
    I: Iterator<Item = M::Input>,
{
    type Item = M::Output;

    fn next(&mut self) -> Option<M::Output> {
        let input = self.inputs.next()?;
        Some(self.machine.step(input))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inputs.size_hint()
    }
}

/// Lazily drives `dut` from its initial state, one output per input.
pub fn simulate<M, I>(dut: M, inputs: I) -> Simulate<M, I::IntoIter>
where
    M: Moore,
    I: IntoIterator<Item = M::Input>,
{
    Simulate {
        machine: MooreMachine::new(dut),
        inputs: inputs.into_iter(),
    }
}

/// Batch form of [`simulate`].
pub fn run<M, I>(dut: M, inputs: I) -> Vec<M::Output>
where
    M: Moore,
    I: IntoIterator<Item = M::Input>,
{
    simulate(dut, inputs).collect()
}
