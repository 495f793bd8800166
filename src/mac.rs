//! Combinational part of the multiply-accumulate unit.

use crate::value::Numeric;

/// Operands presented to the unit in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacInput<V> {
    pub x: V,
    pub y: V,
}

impl<V> MacInput<V> {
    pub fn new(x: V, y: V) -> Self {
        Self { x, y }
    }
}

impl<V> From<(V, V)> for MacInput<V> {
    fn from((x, y): (V, V)) -> Self {
        Self { x, y }
    }
}

/// The accumulator register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacState<V> {
    pub acc: V,
}

impl<V: Numeric> MacState<V> {
    pub const RESET: Self = MacState { acc: V::ZERO };
}

/// One cycle of computation: `acc + x * y`, wrapping at the value's width.
pub fn mac_update<V: Numeric>(state: MacState<V>, input: MacInput<V>) -> MacState<V> {
    MacState {
        acc: state.acc.wrapping_add(input.x.wrapping_mul(input.y)),
    }
}
