use std::cmp::Ordering;

use crate::ast::{Entity, Kind, SetOpKind};
use crate::eval::relations::{check_cmp, check_eq};

pub mod operators;

impl Entity {
    /// Tri-state membership test: `Some(true)`/`Some(false)` when the
    /// element's membership is decidable from the operands, `None` when it
    /// is not (symbolic element, undecidable predicate, non-set receiver).
    pub fn try_contains(&self, element: &Entity) -> Option<bool> {
        use Kind::*;
        match self.kind() {
            FiniteSet(elements) => {
                let mut undecided = false;
                for member in elements {
                    match check_eq(member, element) {
                        Some(true) => return Some(true),
                        Some(false) => (),
                        None => undecided = true,
                    }
                }
                if undecided { None } else { Some(false) }
            }
            Interval {
                left,
                right,
                left_closed,
                right_closed,
            } => {
                let element = element.evaled();
                let above = check_cmp(&left.evaled(), &element).map(|ord| match ord {
                    Ordering::Less => true,
                    Ordering::Equal => *left_closed,
                    Ordering::Greater => false,
                });
                let below = check_cmp(&element, &right.evaled()).map(|ord| match ord {
                    Ordering::Less => true,
                    Ordering::Equal => *right_closed,
                    Ordering::Greater => false,
                });
                match (above, below) {
                    (Some(false), _) | (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                }
            }
            ConditionalSet { var, predicate } => {
                let var = var.as_var_name()?;
                let instantiated = predicate.substitute(&Entity::var(var), element);
                match instantiated.evaled().kind() {
                    Boolean(b) => Some(*b),
                    _ => None,
                }
            }
            SpecialSet(domain) => domain.try_contains_constant(&element.evaled()),
            SetOp { op, left, right } => {
                let in_left = left.try_contains(element);
                let in_right = right.try_contains(element);
                match op {
                    SetOpKind::Union => match (in_left, in_right) {
                        (Some(true), _) | (_, Some(true)) => Some(true),
                        (Some(false), Some(false)) => Some(false),
                        _ => None,
                    },
                    SetOpKind::Intersection => match (in_left, in_right) {
                        (Some(false), _) | (_, Some(false)) => Some(false),
                        (Some(true), Some(true)) => Some(true),
                        _ => None,
                    },
                    SetOpKind::SetMinus => match (in_left, in_right) {
                        (Some(false), _) | (_, Some(true)) => Some(false),
                        (Some(true), Some(false)) => Some(true),
                        _ => None,
                    },
                }
            }
            _ => None,
        }
    }
}

/// An interval whose evaled endpoints coincide denotes one point when both
/// ends are closed, and no points at all otherwise.
pub(crate) fn collapse_degenerate_interval(interval: Entity) -> Entity {
    let Kind::Interval {
        left,
        right,
        left_closed,
        right_closed,
    } = interval.kind()
    else {
        return interval;
    };
    if left.evaled() != right.evaled() {
        return interval;
    }
    if *left_closed && *right_closed {
        Entity::finite_set([crate::simplify::pick_simplest(left.clone(), right.clone())])
    } else {
        Entity::empty_set()
    }
}

/// The pair-dispatch case table of the three set operators. Operands arrive
/// already simplified; any pairing without a dedicated combinator is rebuilt
/// symbolically, which keeps the pass total and terminating.
pub(crate) fn simplify_set_op(
    original: &Entity,
    op: SetOpKind,
    left: Entity,
    right: Entity,
) -> Entity {
    use SetOpKind::*;
    let combined = match op {
        Union => match (left.kind(), right.kind()) {
            (Kind::FiniteSet(..), other) if other.is_set() => {
                Some(operators::unite_finite_and_set(&left, &right))
            }
            (other, Kind::FiniteSet(..)) if other.is_set() => {
                Some(operators::unite_finite_and_set(&right, &left))
            }
            (Kind::Interval { .. }, Kind::Interval { .. }) => {
                operators::unite_intervals(&left, &right)
            }
            (Kind::ConditionalSet { .. }, Kind::ConditionalSet { .. }) => {
                operators::combine_conditional(Union, &left, &right)
            }
            _ => None,
        },
        Intersection => match (left.kind(), right.kind()) {
            (Kind::FiniteSet(..), other) if other.is_set() => {
                Some(operators::intersect_finite_and_set(&left, &right))
            }
            (other, Kind::FiniteSet(..)) if other.is_set() => {
                Some(operators::intersect_finite_and_set(&right, &left))
            }
            (Kind::Interval { .. }, Kind::Interval { .. }) => {
                operators::intersect_intervals(&left, &right)
            }
            (Kind::ConditionalSet { .. }, Kind::ConditionalSet { .. }) => {
                operators::combine_conditional(Intersection, &left, &right)
            }
            _ => None,
        },
        // difference is not commutative: the finite-set combinator is only
        // applied with the finite set on the right
        SetMinus => match (left.kind(), right.kind()) {
            (other, Kind::FiniteSet(..)) if other.is_set() => {
                Some(operators::subtract_finite_from_set(&left, &right))
            }
            (Kind::Interval { .. }, Kind::Interval { .. }) => {
                operators::subtract_intervals(&left, &right)
            }
            (Kind::ConditionalSet { .. }, Kind::ConditionalSet { .. }) => {
                operators::combine_conditional(SetMinus, &left, &right)
            }
            _ => None,
        },
    };
    combined.unwrap_or_else(|| original.rebuilt(Kind::SetOp { op, left, right }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::RelKind;
    use crate::domain::Domain;

    fn closed_interval(a: i64, b: i64) -> Entity {
        Entity::interval(Entity::integer(a), Entity::integer(b), true, true)
    }

    #[test]
    fn finite_set_membership() {
        let set = Entity::finite_set([Entity::integer(1), Entity::integer(2)]);
        assert_eq!(set.try_contains(&Entity::integer(2)), Some(true));
        assert_eq!(set.try_contains(&Entity::integer(5)), Some(false));
        assert_eq!(set.try_contains(&Entity::var("x")), None);
        let symbolic = Entity::finite_set([Entity::var("a")]);
        assert_eq!(symbolic.try_contains(&Entity::integer(1)), None);
    }

    #[test]
    fn interval_membership() {
        let interval = Entity::interval(Entity::integer(0), Entity::integer(5), true, false);
        assert_eq!(interval.try_contains(&Entity::integer(0)), Some(true));
        assert_eq!(interval.try_contains(&Entity::integer(5)), Some(false));
        assert_eq!(interval.try_contains(&Entity::integer(3)), Some(true));
        assert_eq!(interval.try_contains(&Entity::integer(-1)), Some(false));
        assert_eq!(interval.try_contains(&Entity::var("x")), None);
    }

    #[test]
    fn conditional_set_membership() {
        let x = Entity::var("x");
        let positives = Entity::conditional_set(
            x.clone(),
            Entity::relation(RelKind::Gt, x, Entity::integer(0)),
        );
        assert_eq!(positives.try_contains(&Entity::integer(3)), Some(true));
        assert_eq!(positives.try_contains(&Entity::integer(-3)), Some(false));
        assert_eq!(positives.try_contains(&Entity::var("y")), None);
    }

    #[test]
    fn special_set_membership() {
        let integers = Domain::Integer.universal_set();
        assert_eq!(integers.try_contains(&Entity::integer(7)), Some(true));
        assert_eq!(
            integers.try_contains(&Entity::rational(1, 2)),
            Some(false)
        );
        assert_eq!(integers.try_contains(&Entity::var("x")), None);
    }

    #[test]
    fn operator_node_membership() {
        let union = Entity::union(closed_interval(0, 2), closed_interval(10, 12));
        assert_eq!(union.try_contains(&Entity::integer(11)), Some(true));
        assert_eq!(union.try_contains(&Entity::integer(5)), Some(false));
        let diff = Entity::set_minus(
            closed_interval(0, 10),
            Entity::finite_set([Entity::integer(5)]),
        );
        assert_eq!(diff.try_contains(&Entity::integer(5)), Some(false));
        assert_eq!(diff.try_contains(&Entity::integer(6)), Some(true));
    }

    #[test]
    fn degenerate_interval_collapses() {
        let point = Entity::interval(Entity::integer(3), Entity::integer(3), true, true);
        assert_eq!(
            point.simplified(),
            Entity::finite_set([Entity::integer(3)])
        );
        let empty = Entity::interval(Entity::integer(3), Entity::integer(3), false, true);
        assert_eq!(empty.simplified(), Entity::empty_set());
        let also_empty =
            Entity::interval(Entity::integer(3), Entity::integer(3), false, false);
        assert_eq!(also_empty.simplified(), Entity::empty_set());
    }

    #[test]
    fn collapse_uses_evaled_endpoints() {
        let computed = Entity::interval(
            Entity::integer(1) + Entity::integer(2),
            Entity::integer(3),
            true,
            true,
        );
        assert_eq!(
            computed.evaled(),
            Entity::finite_set([Entity::integer(3)])
        );
    }

    #[test]
    fn unresolved_operands_fall_back_symbolically() {
        let union = Entity::union(Entity::var("x"), Entity::var("y"));
        assert_eq!(union.simplified(), union);
        assert_eq!(union.evaled(), union);
    }
}
