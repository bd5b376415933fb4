//! Small helpers shared across algorithms: overflow-checked arithmetic and
//! the smallest-id tie-break convention used everywhere determinism matters
//! (`spec.md` §9 — "determinism instead of randomness").

use crate::error::{Error, InfeasibleReason};

/// Add two flow-domain integers, surfacing
/// [`Error::InfeasibleFlow`]`(`[`InfeasibleReason::ArithmeticOverflow`]`)`
/// instead of wrapping. Grounded on `petgraph::algo::push_relabel`'s
/// `MaxFlowError::ArithmeticOverflow` convention of making overflow a typed
/// outcome rather than a panic or silent wrap.
pub(crate) fn checked_add_i64(a: i64, b: i64) -> Result<i64, Error> {
    a.checked_add(b)
        .ok_or(Error::InfeasibleFlow(InfeasibleReason::ArithmeticOverflow))
}

pub(crate) fn checked_mul_i64(a: i64, b: i64) -> Result<i64, Error> {
    a.checked_mul(b)
        .ok_or(Error::InfeasibleFlow(InfeasibleReason::ArithmeticOverflow))
}

/// Pick the smallest of two candidate ids under a `key` projection,
/// breaking ties by the raw id itself. Used by dual routing and SPQR
/// skeleton construction wherever `spec.md` calls for a smallest-id
/// tie-break.
pub(crate) fn smaller_by_key<T: Copy, K: Ord>(a: T, b: T, key: impl Fn(T) -> K) -> T {
    if key(b) < key(a) {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_add_detects_overflow() {
        assert!(checked_add_i64(i64::MAX, 1).is_err());
        assert_eq!(checked_add_i64(2, 3).unwrap(), 5);
    }

    #[test]
    fn checked_mul_detects_overflow() {
        assert!(checked_mul_i64(i64::MAX, 2).is_err());
        assert_eq!(checked_mul_i64(2, 3).unwrap(), 6);
    }
}
