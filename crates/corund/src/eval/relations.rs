use std::cmp::Ordering;

use crate::ast::{ComplexNum, Entity, Kind};

/// Tri-state equality on reduced operands. `None` means the question is not
/// decidable from the operands' values; comparisons involving the NaN
/// sentinel are never decided.
pub fn check_eq(left: &Entity, right: &Entity) -> Option<bool> {
    if left == right {
        return if involves_nan(left) { None } else { Some(true) };
    }
    match (left.kind(), right.kind()) {
        (Kind::Real(a), Kind::Real(b)) => {
            if a.is_nan() || b.is_nan() {
                None
            } else {
                Some(a.eq_value(b))
            }
        }
        (Kind::Real(a), Kind::Complex(b)) | (Kind::Complex(b), Kind::Real(a)) => {
            if a.is_nan() || b.is_nan() {
                None
            } else {
                Some(b.is_real() && b.real.eq_value(a))
            }
        }
        (Kind::Complex(a), Kind::Complex(b)) => {
            if a.is_nan() || b.is_nan() {
                None
            } else {
                Some(a.real.eq_value(&b.real) && a.imag.eq_value(&b.imag))
            }
        }
        (Kind::Boolean(a), Kind::Boolean(b)) => Some(a == b),
        // distinct constant leaves of different shapes denote distinct values
        (a, b) if a.is_domain_inert() && b.is_domain_inert() => Some(false),
        _ => None,
    }
}

/// Tri-state ordering. Only real numbers (and structurally equal trees) are
/// ordered; complex values and symbolic operands are not.
pub fn check_cmp(left: &Entity, right: &Entity) -> Option<Ordering> {
    if left == right {
        return if involves_nan(left) {
            None
        } else {
            Some(Ordering::Equal)
        };
    }
    match (left.kind(), right.kind()) {
        (Kind::Real(a), Kind::Real(b)) => {
            if a.is_nan() || b.is_nan() {
                None
            } else {
                Some(a.cmp_values(b))
            }
        }
        _ => None,
    }
}

fn involves_nan(exp: &Entity) -> bool {
    match exp.kind() {
        Kind::Real(num) => num.is_nan(),
        Kind::Complex(num) => ComplexNum::is_nan(num),
        _ => false,
    }
}
