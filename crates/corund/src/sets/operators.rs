//! The dedicated combinators behind the set-operator case tables.
//!
//! Every function here receives operands that are already simplified. A
//! combinator either resolves the pair or returns an operator node over the
//! same operands; it never raises, so the surrounding pass is total.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::ast::{Entity, Kind, SetOpKind};
use crate::eval::relations::{check_cmp, check_eq};
use crate::sets::collapse_degenerate_interval;

/// Union of a finite set with any set: elements already provably in the
/// other set are dropped; whatever cannot be absorbed stays as a finite-set
/// union term.
pub(crate) fn unite_finite_and_set(finite: &Entity, other: &Entity) -> Entity {
    let Kind::FiniteSet(elements) = finite.kind() else {
        unreachable!("combinator called with a non-finite left operand");
    };
    if let Kind::FiniteSet(other_elements) = other.kind() {
        return Entity::finite_set(elements.iter().chain(other_elements).cloned());
    }
    let rest = elements
        .iter()
        .filter(|element| other.try_contains(element) != Some(true))
        .cloned()
        .collect_vec();
    if rest.is_empty() {
        other.clone()
    } else {
        Entity::union(Entity::finite_set(rest), other.clone())
    }
}

/// Intersection of a finite set with any set: keep the provable members,
/// drop the provable non-members, and leave an intersection term for the
/// undecided rest.
pub(crate) fn intersect_finite_and_set(finite: &Entity, other: &Entity) -> Entity {
    let Kind::FiniteSet(elements) = finite.kind() else {
        unreachable!("combinator called with a non-finite left operand");
    };
    if let Kind::FiniteSet(other_elements) = other.kind() {
        return Entity::finite_set(
            elements
                .iter()
                .filter(|element| other_elements.contains(*element))
                .cloned(),
        );
    }
    let mut sure = Vec::new();
    let mut undecided = Vec::new();
    for element in elements {
        match other.try_contains(element) {
            Some(true) => sure.push(element.clone()),
            Some(false) => (),
            None => undecided.push(element.clone()),
        }
    }
    if undecided.is_empty() {
        return Entity::finite_set(sure);
    }
    let residue = Entity::intersection(Entity::finite_set(undecided), other.clone());
    if sure.is_empty() {
        residue
    } else {
        Entity::union(Entity::finite_set(sure), residue)
    }
}

/// `set − finite`: removes each listed element from the set where the
/// removal is decidable. Removing an endpoint of an interval opens that
/// end; interior points and undecidable removals stay as a symbolic
/// difference term.
pub(crate) fn subtract_finite_from_set(set: &Entity, finite: &Entity) -> Entity {
    let Kind::FiniteSet(removals) = finite.kind() else {
        unreachable!("combinator called with a non-finite right operand");
    };
    match set.kind() {
        Kind::FiniteSet(elements) => {
            let mut remaining = elements.clone();
            let mut leftovers = Vec::new();
            for removal in removals {
                let mut hit = None;
                let mut undecided = false;
                for member in &remaining {
                    match check_eq(member, removal) {
                        Some(true) => {
                            hit = Some(member.clone());
                            break;
                        }
                        Some(false) => (),
                        None => undecided = true,
                    }
                }
                if let Some(member) = hit {
                    remaining.remove(&member);
                } else if undecided {
                    leftovers.push(removal.clone());
                }
            }
            let base = Entity::finite_set(remaining);
            if leftovers.is_empty() {
                base
            } else {
                Entity::set_minus(base, Entity::finite_set(leftovers))
            }
        }
        Kind::Interval {
            left,
            right,
            left_closed,
            right_closed,
        } => {
            let mut left_closed = *left_closed;
            let mut right_closed = *right_closed;
            let mut leftovers = Vec::new();
            for removal in removals {
                if left_closed && check_eq(removal, left) == Some(true) {
                    left_closed = false;
                } else if right_closed && check_eq(removal, right) == Some(true) {
                    right_closed = false;
                } else if set.try_contains(removal) != Some(false) {
                    leftovers.push(removal.clone());
                }
            }
            let base = collapse_degenerate_interval(Entity::interval(
                left.clone(),
                right.clone(),
                left_closed,
                right_closed,
            ));
            if leftovers.is_empty() {
                base
            } else {
                Entity::set_minus(base, Entity::finite_set(leftovers))
            }
        }
        _ => {
            let leftovers = removals
                .iter()
                .filter(|removal| set.try_contains(removal) != Some(false))
                .cloned()
                .collect_vec();
            if leftovers.is_empty() {
                set.clone()
            } else {
                Entity::set_minus(set.clone(), Entity::finite_set(leftovers))
            }
        }
    }
}

struct IntervalParts<'a> {
    left: &'a Entity,
    right: &'a Entity,
    left_closed: bool,
    right_closed: bool,
}

fn parts(interval: &Entity) -> IntervalParts<'_> {
    let Kind::Interval {
        left,
        right,
        left_closed,
        right_closed,
    } = interval.kind()
    else {
        unreachable!("combinator called with a non-interval operand");
    };
    IntervalParts {
        left,
        right,
        left_closed: *left_closed,
        right_closed: *right_closed,
    }
}

/// Union of two intervals: merged into one when they overlap or touch at a
/// closed endpoint. `None` when the endpoints cannot be ordered or the
/// intervals are disjoint.
pub(crate) fn unite_intervals(a: &Entity, b: &Entity) -> Option<Entity> {
    let pa = parts(a);
    let pb = parts(b);
    let (low, low_closed) = match check_cmp(pa.left, pb.left)? {
        Ordering::Less => (pa.left, pa.left_closed),
        Ordering::Equal => (pa.left, pa.left_closed || pb.left_closed),
        Ordering::Greater => (pb.left, pb.left_closed),
    };
    let (inner_left, inner_left_closed) = match check_cmp(pa.left, pb.left)? {
        Ordering::Greater => (pa.left, pa.left_closed),
        _ => (pb.left, pb.left_closed),
    };
    let (high, high_closed) = match check_cmp(pa.right, pb.right)? {
        Ordering::Greater => (pa.right, pa.right_closed),
        Ordering::Equal => (pa.right, pa.right_closed || pb.right_closed),
        Ordering::Less => (pb.right, pb.right_closed),
    };
    let (inner_right, inner_right_closed) = match check_cmp(pa.right, pb.right)? {
        Ordering::Less => (pa.right, pa.right_closed),
        _ => (pb.right, pb.right_closed),
    };
    let joined = match check_cmp(inner_left, inner_right)? {
        Ordering::Less => true,
        Ordering::Equal => inner_left_closed || inner_right_closed,
        Ordering::Greater => false,
    };
    joined.then(|| Entity::interval(low.clone(), high.clone(), low_closed, high_closed))
}

/// Intersection of two intervals: the larger left bound against the smaller
/// right bound, collapsing to a point or the empty set at the boundary.
pub(crate) fn intersect_intervals(a: &Entity, b: &Entity) -> Option<Entity> {
    let pa = parts(a);
    let pb = parts(b);
    let (low, low_closed) = match check_cmp(pa.left, pb.left)? {
        Ordering::Greater => (pa.left, pa.left_closed),
        Ordering::Equal => (pa.left, pa.left_closed && pb.left_closed),
        Ordering::Less => (pb.left, pb.left_closed),
    };
    let (high, high_closed) = match check_cmp(pa.right, pb.right)? {
        Ordering::Less => (pa.right, pa.right_closed),
        Ordering::Equal => (pa.right, pa.right_closed && pb.right_closed),
        Ordering::Greater => (pb.right, pb.right_closed),
    };
    Some(match check_cmp(low, high)? {
        Ordering::Greater => Entity::empty_set(),
        Ordering::Equal => {
            if low_closed && high_closed {
                Entity::finite_set([low.clone()])
            } else {
                Entity::empty_set()
            }
        }
        Ordering::Less => Entity::interval(low.clone(), high.clone(), low_closed, high_closed),
    })
}

/// Difference of two intervals: at most a lower remainder and an upper
/// remainder, either of which may degenerate to a point or vanish.
pub(crate) fn subtract_intervals(a: &Entity, b: &Entity) -> Option<Entity> {
    let pa = parts(a);
    let pb = parts(b);

    // no overlap at all: nothing is removed
    let low_side = check_cmp(pb.right, pa.left)?;
    let high_side = check_cmp(pb.left, pa.right)?;
    if low_side == Ordering::Less
        || (low_side == Ordering::Equal && !(pb.right_closed && pa.left_closed))
        || high_side == Ordering::Greater
        || (high_side == Ordering::Equal && !(pb.left_closed && pa.right_closed))
    {
        return Some(a.clone());
    }

    let lower = match check_cmp(pa.left, pb.left)? {
        Ordering::Less => Some(collapse_degenerate_interval(Entity::interval(
            pa.left.clone(),
            pb.left.clone(),
            pa.left_closed,
            !pb.left_closed,
        ))),
        Ordering::Equal => (pa.left_closed && !pb.left_closed)
            .then(|| Entity::finite_set([pa.left.clone()])),
        Ordering::Greater => None,
    };
    let upper = match check_cmp(pa.right, pb.right)? {
        Ordering::Greater => Some(collapse_degenerate_interval(Entity::interval(
            pb.right.clone(),
            pa.right.clone(),
            !pb.right_closed,
            pa.right_closed,
        ))),
        Ordering::Equal => (pa.right_closed && !pb.right_closed)
            .then(|| Entity::finite_set([pa.right.clone()])),
        Ordering::Less => None,
    };
    Some(match (lower, upper) {
        (Some(lower), Some(upper)) => Entity::union(lower, upper),
        (Some(piece), None) | (None, Some(piece)) => piece,
        (None, None) => Entity::empty_set(),
    })
}

/// Combines two set-builder sets over a unified bound variable: disjunction
/// for union, conjunction for intersection, negated conjunction for
/// difference. `None` when either bound slot no longer holds a variable.
pub(crate) fn combine_conditional(
    op: SetOpKind,
    left: &Entity,
    right: &Entity,
) -> Option<Entity> {
    let Kind::ConditionalSet {
        var: left_var,
        predicate: left_predicate,
    } = left.kind()
    else {
        unreachable!("combinator called with a non-conditional operand");
    };
    let Kind::ConditionalSet {
        var: right_var,
        predicate: right_predicate,
    } = right.kind()
    else {
        unreachable!("combinator called with a non-conditional operand");
    };
    left_var.as_var_name()?;
    right_var.as_var_name()?;

    let right_predicate = if left_var.as_var_name() == right_var.as_var_name() {
        right_predicate.clone()
    } else {
        right_predicate.substitute(right_var, left_var)
    };
    let predicate = match op {
        SetOpKind::Union => left_predicate.clone().or(right_predicate),
        SetOpKind::Intersection => left_predicate.clone().and(right_predicate),
        SetOpKind::SetMinus => left_predicate.clone().and(right_predicate.not()),
    };
    let combined = left.rebuilt(Kind::ConditionalSet {
        var: left_var.clone(),
        predicate,
    });
    Some(combined.simplified())
}
