//! Ground truth for the MAC unit: a running sum of pairwise products.

use crate::value::Numeric;

/// Prefix sums of `xs[i] * ys[i]`, each taken before its own product is
/// added, over `min(xs.len(), ys.len())` cycles.
pub fn reference_outputs<V: Numeric>(xs: &[V], ys: &[V]) -> Vec<V> {
    xs.iter()
        .zip(ys)
        .scan(V::ZERO, |sum, (&x, &y)| {
            let before = *sum;
            *sum = sum.wrapping_add(x.wrapping_mul(y));
            Some(before)
        })
        .collect()
}
