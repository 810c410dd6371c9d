use std::cmp::Ordering;

use crate::ast::{ComplexNum, DyadicOp, Entity, Kind, Num, RelKind, UnaryOp};
use crate::simplify::pick_simplest;

pub mod relations;

impl Entity {
    /// The numeric-reduction pass: reduces this tree as far as possible
    /// without assuming values for free variables. Computed once per node
    /// instance and cached; racing threads may duplicate the (pure) work
    /// but the published result is written exactly once.
    pub fn evaled(&self) -> Entity {
        self.node.evaled.get_or_init(|| self.inner_eval()).clone()
    }

    /// Reduction rule for this node, dispatching on the already evaled
    /// children. Always returns a valid tree; when no rule applies the node
    /// is rebuilt from its reduced children, unreduced.
    fn inner_eval(&self) -> Entity {
        use Kind::*;
        match self.kind() {
            Real(..) | Complex(..) | Boolean(..) | Var { .. } | SpecialSet(..) => self.clone(),
            Unary { op, operand } => eval_unary(self, *op, operand.evaled()),
            Dyadic { op, left, right } => {
                eval_dyadic(self, *op, left.evaled(), right.evaled())
            }
            Relation { rel, left, right } => {
                eval_relation(self, *rel, left.evaled(), right.evaled())
            }
            Function { .. } | FiniteSet(..) => self.map(|child| child.evaled()),
            Interval { .. } => {
                crate::sets::collapse_degenerate_interval(self.map(|child| child.evaled()))
            }
            ConditionalSet { .. } => {
                pick_simplest(self.map(|child| child.evaled()), self.simplified())
            }
            // set operators have no numeric reduction of their own
            SetOp { .. } => self.simplified(),
        }
    }
}

fn eval_unary(original: &Entity, op: UnaryOp, operand: Entity) -> Entity {
    match (op, operand.kind()) {
        (UnaryOp::Neg, Kind::Real(num)) => Entity::real(-num),
        (UnaryOp::Neg, Kind::Complex(num)) => {
            Entity::from_kind(Kind::Complex(-num))
        }
        (UnaryOp::Not, Kind::Boolean(b)) => Entity::boolean(!b),
        _ => original.rebuilt(Kind::Unary { op, operand }),
    }
}

fn eval_dyadic(original: &Entity, op: DyadicOp, left: Entity, right: Entity) -> Entity {
    let folded = if op.is_arithmetic() {
        fold_arithmetic(op, &left, &right)
    } else {
        fold_logic(op, &left, &right)
    };
    folded.unwrap_or_else(|| original.rebuilt(Kind::Dyadic { op, left, right }))
}

/// Constant folding over the numeric leaves. `None` when an operand is
/// symbolic or the result cannot be represented exactly (an exact base with
/// a non-integer exponent stays symbolic rather than degrade to a float).
pub(crate) fn fold_arithmetic(op: DyadicOp, left: &Entity, right: &Entity) -> Option<Entity> {
    use DyadicOp::*;
    match (left.kind(), right.kind()) {
        (Kind::Real(a), Kind::Real(b)) => match op {
            Add => Some(Entity::real(a + b)),
            Sub => Some(Entity::real(a - b)),
            Mul => Some(Entity::real(a * b)),
            Div => Some(Entity::real(a.div(b))),
            Pow => fold_real_pow(a, b),
            _ => None,
        },
        (Kind::Real(_) | Kind::Complex(_), Kind::Real(_) | Kind::Complex(_)) => {
            let a = promote(left);
            let b = promote(right);
            let num = match op {
                Add => &a + &b,
                Sub => &a - &b,
                Mul => &a * &b,
                Div => a.div(&b),
                Pow => {
                    let int_pow = as_real(right)?.to_i64()?;
                    a.powi(int_pow)
                }
                _ => return None,
            };
            Some(Entity::from_kind(Kind::Complex(num)))
        }
        _ => None,
    }
}

fn fold_real_pow(base: &Num, exponent: &Num) -> Option<Entity> {
    if let Some(int_pow) = exponent.to_i64() {
        return Some(Entity::real(base.powi(int_pow)));
    }
    if matches!(base, Num::Small(_)) || matches!(exponent, Num::Small(_)) {
        return Some(Entity::real(base.pow(exponent)));
    }
    None
}

fn promote(entity: &Entity) -> ComplexNum {
    match entity.kind() {
        Kind::Real(num) => ComplexNum::from(num.clone()),
        Kind::Complex(num) => num.clone(),
        _ => unreachable!("promote is only called on number leaves"),
    }
}

fn as_real(entity: &Entity) -> Option<&Num> {
    match entity.kind() {
        Kind::Real(num) => Some(num),
        _ => None,
    }
}

/// Boolean constant folding including the one-sided short-circuit laws.
pub(crate) fn fold_logic(op: DyadicOp, left: &Entity, right: &Entity) -> Option<Entity> {
    use DyadicOp::*;
    let (l, r) = (left.kind(), right.kind());
    match op {
        And => match (l, r) {
            (Kind::Boolean(a), Kind::Boolean(b)) => Some(Entity::boolean(*a && *b)),
            (Kind::Boolean(false), _) | (_, Kind::Boolean(false)) => {
                Some(Entity::boolean(false))
            }
            (Kind::Boolean(true), _) => Some(right.clone()),
            (_, Kind::Boolean(true)) => Some(left.clone()),
            _ => None,
        },
        Or => match (l, r) {
            (Kind::Boolean(a), Kind::Boolean(b)) => Some(Entity::boolean(*a || *b)),
            (Kind::Boolean(true), _) | (_, Kind::Boolean(true)) => Some(Entity::boolean(true)),
            (Kind::Boolean(false), _) => Some(right.clone()),
            (_, Kind::Boolean(false)) => Some(left.clone()),
            _ => None,
        },
        Implies => match (l, r) {
            (Kind::Boolean(false), _) | (_, Kind::Boolean(true)) => Some(Entity::boolean(true)),
            (Kind::Boolean(true), _) => Some(right.clone()),
            (_, Kind::Boolean(false)) => Some(left.clone().not()),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn eval_relation(
    original: &Entity,
    rel: RelKind,
    left: Entity,
    right: Entity,
) -> Entity {
    use RelKind::*;
    let decided = match rel {
        Eq => relations::check_eq(&left, &right),
        Neq => relations::check_eq(&left, &right).map(|b| !b),
        Lt => relations::check_cmp(&left, &right).map(|ord| ord == Ordering::Less),
        Gt => relations::check_cmp(&left, &right).map(|ord| ord == Ordering::Greater),
        Leq => relations::check_cmp(&left, &right).map(|ord| ord != Ordering::Greater),
        Geq => relations::check_cmp(&left, &right).map(|ord| ord != Ordering::Less),
    };
    match decided {
        Some(b) => Entity::boolean(b),
        None => original.rebuilt(Kind::Relation { rel, left, right }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    #[test]
    fn arithmetic_folds() {
        let exp = (Entity::integer(2) + Entity::integer(3)) * Entity::integer(4);
        assert_eq!(exp.evaled(), Entity::integer(20));
        let exp = Entity::integer(1) / Entity::integer(3);
        assert_eq!(exp.evaled(), Entity::rational(1, 3));
    }

    #[test]
    fn free_variables_reduce_partially() {
        let exp = Entity::var("x") + (Entity::integer(2) * Entity::integer(5));
        assert_eq!(exp.evaled(), Entity::var("x") + Entity::integer(10));
    }

    #[test]
    fn division_by_zero_degrades_to_nan() {
        let exp = Entity::integer(1) / Entity::integer(0);
        let Kind::Real(num) = exp.evaled().kind().clone() else {
            panic!("expected a number");
        };
        assert!(num.is_nan());
        // the sentinel keeps propagating
        let tainted = exp + Entity::integer(5);
        let Kind::Real(num) = tainted.evaled().kind().clone() else {
            panic!("expected a number");
        };
        assert!(num.is_nan());
    }

    #[test]
    fn exact_irrational_powers_stay_symbolic() {
        let sqrt2 = Entity::integer(2).pow(Entity::rational(1, 2));
        assert_eq!(
            sqrt2.evaled(),
            Entity::integer(2).pow(Entity::rational(1, 2))
        );
        let approx = Entity::real(Num::from(2.0)).pow(Entity::rational(1, 2));
        let Kind::Real(Num::Small(_)) = approx.evaled().kind() else {
            panic!("float base should fold through the float tier");
        };
    }

    #[test]
    fn complex_arithmetic_folds() {
        let i = Entity::complex(Num::ZERO, Num::ONE);
        let squared = i.clone() * i;
        assert_eq!(
            squared.evaled(),
            Entity::complex(Num::from(-1), Num::ZERO)
        );
    }

    #[test]
    fn logic_short_circuits() {
        let x = Entity::var("p").with_codomain(Domain::Boolean);
        assert_eq!(
            Entity::boolean(true).and(x.clone()).evaled(),
            x.clone()
        );
        assert_eq!(
            Entity::boolean(false).and(x.clone()).evaled(),
            Entity::boolean(false)
        );
        assert_eq!(
            x.clone().or(Entity::boolean(true)).evaled(),
            Entity::boolean(true)
        );
        assert_eq!(
            Entity::boolean(false).implies(x).evaled(),
            Entity::boolean(true)
        );
    }

    #[test]
    fn relations_decide_on_numbers() {
        let exp = Entity::relation(RelKind::Lt, Entity::integer(2), Entity::integer(3));
        assert_eq!(exp.evaled(), Entity::boolean(true));
        let exp = Entity::relation(RelKind::Eq, Entity::var("x"), Entity::integer(3));
        assert_eq!(exp.evaled(), exp);
    }

    #[test]
    fn eval_is_idempotent() {
        let exps = [
            Entity::integer(2) + Entity::var("x"),
            Entity::integer(1) / Entity::integer(0),
            (Entity::integer(2) + Entity::integer(2)) * Entity::var("y"),
            Entity::integer(2).pow(Entity::rational(1, 2)),
        ];
        for exp in exps {
            let once = exp.evaled();
            assert_eq!(once.evaled(), once);
        }
    }
}
