use proptest::prelude::*;

use mac_sim::{
    mac_update, reference_outputs, simulate_mac, MacInput, MacState, MacTestbench, Numeric, S9,
};

// Property test generators

/// Generate a 9-bit signed value over its full range
fn s9_value() -> impl Strategy<Value = S9> {
    any::<S9>()
}

/// Generate a value at or next to the ends of the range
fn s9_boundary() -> impl Strategy<Value = S9> {
    prop_oneof![
        Just(S9::MIN),
        Just(S9::new(-255)),
        Just(S9::new(-1)),
        Just(S9::ZERO),
        Just(S9::new(1)),
        Just(S9::new(254)),
        Just(S9::MAX),
    ]
}

/// Generate one operand channel of up to `max_len` cycles
fn channel(max_len: usize) -> impl Strategy<Value = Vec<S9>> {
    prop::collection::vec(s9_value(), 0..=max_len)
}

/// `s + x * y` reduced into `-256..=255` with plain integer arithmetic
fn modular_mac(s: S9, x: S9, y: S9) -> S9 {
    let wide = s.get() as i64 + x.get() as i64 * y.get() as i64;
    let low = wide.rem_euclid(512);
    let signed = if low > 255 { low - 512 } else { low };
    S9::new(signed as i16)
}

#[cfg(test)]
mod update_properties {
    use super::*;

    proptest! {
        /// Property: a zero operand leaves a zero accumulator unchanged
        #[test]
        fn prop_zero_operand_is_identity(v in s9_value()) {
            prop_assert_eq!(mac_update(MacState::RESET, MacInput::new(v, S9::ZERO)), MacState::RESET);
            prop_assert_eq!(mac_update(MacState::RESET, MacInput::new(S9::ZERO, v)), MacState::RESET);
        }

        /// Property: update is s + x * y modulo 2^9
        #[test]
        fn prop_update_is_modular_mac(s in s9_value(), x in s9_value(), y in s9_value()) {
            let next = mac_update(MacState { acc: s }, MacInput::new(x, y));
            prop_assert_eq!(next.acc, modular_mac(s, x, y));
        }

        /// Property: wraparound at the ends of the range matches modular arithmetic
        #[test]
        fn prop_update_wraps_at_boundaries(
            s in s9_boundary(),
            x in s9_boundary(),
            y in s9_boundary()
        ) {
            let next = mac_update(MacState { acc: s }, MacInput::new(x, y));
            prop_assert_eq!(next.acc, modular_mac(s, x, y));
            prop_assert!(next.acc >= S9::MIN && next.acc <= S9::MAX);
        }

        /// Property: update agrees with native wrapping arithmetic at 32 bits
        #[test]
        fn prop_update_native_width(s in any::<i32>(), x in any::<i32>(), y in any::<i32>()) {
            let next = mac_update(MacState { acc: s }, MacInput::new(x, y));
            prop_assert_eq!(next.acc, s.wrapping_add(x.wrapping_mul(y)));
        }
    }
}

#[cfg(test)]
mod short_trace_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: the simulated unit matches the reference model on traces up to 100 cycles
        #[test]
        fn prop_simulation_matches_reference(xs in channel(100), ys in channel(100)) {
            let expected = reference_outputs(&xs, &ys);
            let actual = simulate_mac(&xs, &ys);
            prop_assert_eq!(expected.len(), xs.len().min(ys.len()));
            prop_assert_eq!(actual, expected);
        }

        /// Property: simulating twice yields the same trace
        #[test]
        fn prop_simulation_is_restartable(xs in channel(100), ys in channel(100)) {
            prop_assert_eq!(simulate_mac(&xs, &ys), simulate_mac(&xs, &ys));
        }

        /// Property: driving the bench cycle by cycle matches the batch driver
        #[test]
        fn prop_testbench_matches_batch(xs in channel(100), ys in channel(100)) {
            let mut tb = MacTestbench::new();
            let live: Vec<S9> = xs.iter().zip(&ys).map(|(&x, &y)| tb.step(x, y)).collect();
            prop_assert_eq!(tb.cycle_count() as usize, live.len());
            prop_assert_eq!(live, simulate_mac(&xs, &ys));
        }
    }
}

#[cfg(test)]
mod long_trace_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        /// Property: the simulated unit matches the reference model on traces up to 1000 cycles
        #[test]
        fn prop_simulation_matches_reference(xs in channel(1000), ys in channel(1000)) {
            prop_assert_eq!(simulate_mac(&xs, &ys), reference_outputs(&xs, &ys));
        }

        /// Property: the final accumulator is the full sum of products
        #[test]
        fn prop_accumulator_is_sum_of_products(xs in channel(1000), ys in channel(1000)) {
            let mut tb = MacTestbench::new();
            tb.run_for_cycles(xs.iter().copied().zip(ys.iter().copied()), usize::MAX);
            let sum = xs
                .iter()
                .zip(&ys)
                .fold(S9::ZERO, |acc, (&x, &y)| modular_mac(acc, x, y));
            prop_assert_eq!(tb.accumulator(), sum);
        }
    }
}
