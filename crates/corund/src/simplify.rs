use crate::ast::{DyadicOp, Entity, Kind, UnaryOp};
use crate::eval::{eval_relation, fold_arithmetic, fold_logic};
use crate::sets;

/// The structurally smaller of two equivalent forms; ties keep the first.
pub(crate) fn pick_simplest(a: Entity, b: Entity) -> Entity {
    if b.complexity() < a.complexity() { b } else { a }
}

impl Entity {
    /// The symbolic-reduction pass: produces an algebraically simpler form
    /// without assuming values for free variables. Memoized per node
    /// instance, like `evaled`.
    pub fn simplified(&self) -> Entity {
        self.node
            .simplified
            .get_or_init(|| self.inner_simplify())
            .clone()
    }

    fn inner_simplify(&self) -> Entity {
        use Kind::*;
        match self.kind() {
            Real(..) | Complex(..) | Boolean(..) | Var { .. } | SpecialSet(..) => self.clone(),
            Unary { op, operand } => simplify_unary(self, *op, operand.simplified()),
            Dyadic { op, left, right } => {
                simplify_dyadic(self, *op, left.simplified(), right.simplified())
            }
            Relation { rel, left, right } => {
                eval_relation(self, *rel, left.simplified(), right.simplified())
            }
            Function { .. } | FiniteSet(..) => self.map(|child| child.simplified()),
            Interval { .. } => {
                sets::collapse_degenerate_interval(self.map(|child| child.simplified()))
            }
            ConditionalSet { var, predicate } => {
                simplify_conditional_set(self, var, &predicate.simplified())
            }
            SetOp { op, left, right } => {
                sets::simplify_set_op(self, *op, left.simplified(), right.simplified())
            }
        }
    }
}

fn simplify_unary(original: &Entity, op: UnaryOp, operand: Entity) -> Entity {
    match (op, operand.kind()) {
        (UnaryOp::Neg, Kind::Real(num)) => Entity::real(-num),
        (UnaryOp::Neg, Kind::Complex(num)) => Entity::from_kind(Kind::Complex(-num)),
        // double negation, either flavor
        (
            UnaryOp::Neg,
            Kind::Unary {
                op: UnaryOp::Neg,
                operand: inner,
            },
        )
        | (
            UnaryOp::Not,
            Kind::Unary {
                op: UnaryOp::Not,
                operand: inner,
            },
        ) => inner.clone(),
        (UnaryOp::Not, Kind::Boolean(b)) => Entity::boolean(!b),
        _ => original.rebuilt(Kind::Unary { op, operand }),
    }
}

fn simplify_dyadic(original: &Entity, op: DyadicOp, left: Entity, right: Entity) -> Entity {
    use DyadicOp::*;
    let folded = if op.is_arithmetic() {
        fold_arithmetic(op, &left, &right)
    } else {
        fold_logic(op, &left, &right)
    };
    if let Some(folded) = folded {
        return folded;
    }
    let identity = match op {
        Add => match (is_exact_zero(&left), is_exact_zero(&right)) {
            (true, _) => Some(right.clone()),
            (_, true) => Some(left.clone()),
            _ => None,
        },
        Sub => {
            if left == right {
                Some(Entity::integer(0))
            } else if is_exact_zero(&right) {
                Some(left.clone())
            } else if is_exact_zero(&left) {
                Some(-right.clone())
            } else {
                None
            }
        }
        Mul => {
            if is_exact_zero(&left) || is_exact_zero(&right) {
                Some(Entity::integer(0))
            } else if is_exact_one(&left) {
                Some(right.clone())
            } else if is_exact_one(&right) {
                Some(left.clone())
            } else {
                None
            }
        }
        Div => is_exact_one(&right).then(|| left.clone()),
        Pow => {
            if is_exact_one(&right) {
                Some(left.clone())
            } else if is_exact_zero(&right) || is_exact_one(&left) {
                Some(Entity::integer(1))
            } else {
                None
            }
        }
        And | Or => (left == right).then(|| left.clone()),
        Implies => (left == right).then(|| Entity::boolean(true)),
    };
    identity.unwrap_or_else(|| original.rebuilt(Kind::Dyadic { op, left, right }))
}

fn is_exact_zero(exp: &Entity) -> bool {
    matches!(exp.kind(), Kind::Real(num) if num.is_exact_zero())
}

fn is_exact_one(exp: &Entity) -> bool {
    matches!(exp.kind(), Kind::Real(num) if num.is_exact_one())
}

/// A conditional set with a decidable predicate collapses to its codomain's
/// universal set or to the empty set. Decidability is judged on the
/// simplified predicate, then on its evaled form, so a second pass never
/// sees a collapsible set it missed.
fn simplify_conditional_set(original: &Entity, var: &Entity, predicate: &Entity) -> Entity {
    let decided = match predicate.kind() {
        Kind::Boolean(b) => Some(*b),
        _ => match predicate.evaled().kind() {
            Kind::Boolean(b) => Some(*b),
            _ => None,
        },
    };
    match decided {
        Some(true) => original.codomain().universal_set(),
        Some(false) => Entity::empty_set(),
        None => original.rebuilt(Kind::ConditionalSet {
            var: var.clone(),
            predicate: predicate.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::RelKind;
    use crate::domain::Domain;

    #[test]
    fn arithmetic_identities() {
        let x = Entity::var("x");
        assert_eq!((x.clone() + Entity::integer(0)).simplified(), x);
        assert_eq!((Entity::integer(1) * x.clone()).simplified(), x);
        assert_eq!(
            (x.clone() * Entity::integer(0)).simplified(),
            Entity::integer(0)
        );
        assert_eq!((x.clone() - x.clone()).simplified(), Entity::integer(0));
        assert_eq!(
            (x.clone().pow(Entity::integer(0))).simplified(),
            Entity::integer(1)
        );
        assert_eq!((x.clone().pow(Entity::integer(1))).simplified(), x);
    }

    #[test]
    fn simplify_keeps_symbols() {
        // simplification must not lose structure Eval would need
        let exp = Entity::var("x") + Entity::var("y");
        assert_eq!(exp.simplified(), exp);
    }

    #[test]
    fn double_negation() {
        let x = Entity::var("x");
        assert_eq!((-(-x.clone())).simplified(), x);
        let p = Entity::var("p").with_codomain(Domain::Boolean);
        assert_eq!(p.clone().not().not().simplified(), p);
    }

    #[test]
    fn logic_idempotence_laws() {
        let p = Entity::var("p").with_codomain(Domain::Boolean);
        assert_eq!(p.clone().and(p.clone()).simplified(), p);
        assert_eq!(p.clone().or(p.clone()).simplified(), p);
        assert_eq!(
            p.clone().implies(p.clone()).simplified(),
            Entity::boolean(true)
        );
    }

    #[test]
    fn relations_fold_under_simplify() {
        // x - x = 0 needs the symbolic pass before the relation can decide
        let x = Entity::var("x");
        let rel = Entity::relation(
            RelKind::Eq,
            x.clone() - x.clone(),
            Entity::integer(0),
        );
        assert_eq!(rel.simplified(), Entity::boolean(true));
    }

    #[test]
    fn simplify_is_idempotent() {
        let x = Entity::var("x");
        let exps = [
            x.clone() + Entity::integer(0),
            (x.clone() * Entity::integer(1)) + Entity::integer(3) * Entity::integer(4),
            Entity::integer(2).pow(Entity::rational(1, 2)),
            x.clone() - x.clone(),
            Entity::var("p").and(Entity::var("q")),
        ];
        for exp in exps {
            let once = exp.simplified();
            assert_eq!(once.simplified(), once);
        }
    }
}
