use std::fmt::Display;

use itertools::Itertools;
use malachite::Natural;
use malachite::num::basic::traits::One;

use crate::ast::{ComplexNum, DyadicOp, Entity, Kind, Num, RelKind, SetOpKind, UnaryOp};

impl Display for Num {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Num::Integer(int) => int.fmt(f),
            Num::Rational(rat) => rat.fmt(f),
            Num::Small(float) => float.fmt(f),
        }
    }
}

impl Display for ComplexNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let left = if self.real.is_zero() {
            String::new()
        } else {
            self.real.to_string()
        };
        let sign = if self.imag.is_negative() { "" } else { "+" };
        let right = if self.imag.is_one() && !self.imag.is_negative() {
            "i".to_owned()
        } else if (-&self.imag).is_one() {
            "-i".to_owned()
        } else {
            format!("{}i", self.imag)
        };
        if left.is_empty() {
            f.write_str(&right)
        } else {
            write!(f, "{left}{sign}{right}")
        }
    }
}

/// Whether the printed form carries its own delimiters, so a parent operator
/// never needs to parenthesize it.
fn is_enclosed(exp: &Entity) -> bool {
    match exp.kind() {
        Kind::Real(num) => num.is_integer_value() || matches!(num, Num::Small(..)),
        Kind::Complex(num) => {
            if num.is_real() {
                num.real.is_integer_value()
            } else {
                num.real.is_zero() && num.imag.is_one()
            }
        }
        Kind::Unary { .. } | Kind::Dyadic { .. } | Kind::Relation { .. } | Kind::SetOp { .. } => {
            false
        }
        _ => true,
    }
}

/// The precedence this expression prints at, when its printed form is an
/// infix chain that a parent may need to parenthesize.
fn infix_precedence(exp: &Entity) -> Option<u8> {
    match exp.kind() {
        Kind::Real(Num::Rational(rat)) if rat.denominator_ref() != &Natural::ONE => {
            Some(DyadicOp::Div.precedence())
        }
        Kind::Complex(num) if !num.is_real() && !num.real.is_zero() => {
            Some(DyadicOp::Add.precedence())
        }
        Kind::Unary {
            op: UnaryOp::Neg, ..
        } => Some(DyadicOp::Add.precedence()),
        Kind::Unary {
            op: UnaryOp::Not, ..
        } => Some(3),
        Kind::Dyadic { op, .. } => Some(op.precedence()),
        Kind::Relation { .. } => Some(RelKind::precedence()),
        Kind::SetOp { .. } => Some(SetOpKind::precedence()),
        _ => None,
    }
}

fn wrap_if(s: &str, wrap: bool) -> String {
    if wrap { format!("({s})") } else { s.to_string() }
}

fn infix(op_symbol: char, prec: u8, left: &Entity, right: &Entity) -> String {
    let wrap_left = if is_enclosed(left) {
        matches!(left.kind(), Kind::Real(num) if num.is_negative())
    } else {
        infix_precedence(left).is_some_and(|sub| sub <= prec)
    };
    let left_str = wrap_if(&left.to_string(), wrap_left);

    let right_str = right.to_string();
    let wrap_right = infix_precedence(right).is_some_and(|sub| sub <= prec)
        || right_str.starts_with('-');
    let right_str = wrap_if(&right_str, wrap_right);

    if op_symbol == DyadicOp::Pow.symbol() {
        format!("{left_str}{op_symbol}{right_str}")
    } else {
        format!("{left_str} {op_symbol} {right_str}")
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Kind::*;
        match self.kind() {
            Real(num) => num.fmt(f),
            Complex(num) => num.fmt(f),
            Boolean(true) => f.write_str("⊤"),
            Boolean(false) => f.write_str("⊥"),
            Var { name } => f.write_str(name),
            Unary { op, operand } => {
                let operand_str = operand.to_string();
                let wrap = !is_enclosed(operand) || operand_str.starts_with('-');
                write!(f, "{}{}", op.symbol(), wrap_if(&operand_str, wrap))
            }
            Dyadic { op, left, right } => {
                f.write_str(&infix(op.symbol(), op.precedence(), left, right))
            }
            Relation { rel, left, right } => {
                f.write_str(&infix(rel.symbol(), RelKind::precedence(), left, right))
            }
            Function { name, args } => {
                write!(f, "{name}({})", args.iter().join(", "))
            }
            FiniteSet(elements) => {
                if elements.is_empty() {
                    f.write_str("∅")
                } else {
                    write!(f, "{{{}}}", elements.iter().join(", "))
                }
            }
            Interval {
                left,
                right,
                left_closed,
                right_closed,
            } => {
                let open = if *left_closed { '[' } else { '(' };
                let close = if *right_closed { ']' } else { ')' };
                write!(f, "{open}{left}, {right}{close}")
            }
            ConditionalSet { var, predicate } => {
                write!(f, "{{ {var} : {predicate} }}")
            }
            SpecialSet(domain) => write!(f, "{}", domain.symbol()),
            SetOp { op, left, right } => {
                f.write_str(&infix(op.symbol(), SetOpKind::precedence(), left, right))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    #[test]
    fn numbers_and_variables() {
        assert_eq!(Entity::integer(-3).to_string(), "-3");
        assert_eq!(Entity::rational(1, 2).to_string(), "1/2");
        assert_eq!(Entity::var("x").to_string(), "x");
        assert_eq!(Entity::complex(Num::ZERO, Num::ONE).to_string(), "i");
        assert_eq!(
            Entity::complex(Num::from(3), Num::from(-2)).to_string(),
            "3-2i"
        );
    }

    #[test]
    fn precedence_inserts_parentheses() {
        let x = Entity::var("x");
        let exp = (x.clone() + Entity::integer(1)) * Entity::integer(2);
        assert_eq!(exp.to_string(), "(x + 1) * 2");
        let exp = x.clone() + Entity::integer(1) * Entity::integer(2);
        assert_eq!(exp.to_string(), "x + 1 * 2");
        let exp = (-x.clone()).pow(Entity::integer(2));
        assert_eq!(exp.to_string(), "(-x)^2");
        let exp = Entity::rational(1, 2) * x;
        assert_eq!(exp.to_string(), "(1/2) * x");
    }

    #[test]
    fn negative_operands_are_wrapped() {
        let exp = Entity::integer(1) - Entity::integer(-2);
        assert_eq!(exp.to_string(), "1 - (-2)");
        let exp = Entity::integer(-1) * Entity::var("x");
        assert_eq!(exp.to_string(), "(-1) * x");
    }

    #[test]
    fn sets_print_in_mathematical_notation() {
        assert_eq!(Entity::empty_set().to_string(), "∅");
        assert_eq!(
            Entity::finite_set([Entity::integer(1), Entity::integer(2)]).to_string(),
            "{1, 2}"
        );
        assert_eq!(
            Entity::interval(Entity::integer(0), Entity::integer(5), true, false).to_string(),
            "[0, 5)"
        );
        let x = Entity::var("x");
        let set = Entity::conditional_set(
            x.clone(),
            Entity::relation(RelKind::Gt, x, Entity::integer(0)),
        );
        assert_eq!(set.to_string(), "{ x : x > 0 }");
        assert_eq!(Domain::Real.universal_set().to_string(), "ℝ");
        let union = Entity::union(
            Entity::finite_set([Entity::integer(1)]),
            Domain::Integer.universal_set(),
        );
        assert_eq!(union.to_string(), "{1} ∪ ℤ");
    }

    #[test]
    fn logic_and_relations() {
        let p = Entity::var("p");
        let q = Entity::var("q");
        assert_eq!(p.clone().and(q.clone()).to_string(), "p ∧ q");
        assert_eq!(
            p.clone().and(q.clone()).or(Entity::boolean(false)).to_string(),
            "p ∧ q ∨ ⊥"
        );
        assert_eq!(
            p.clone().or(q.clone()).and(Entity::boolean(true)).to_string(),
            "(p ∨ q) ∧ ⊤"
        );
        assert_eq!(p.clone().not().and(q).to_string(), "¬p ∧ q");
        assert_eq!(
            Entity::relation(RelKind::Leq, Entity::var("x"), Entity::integer(3)).to_string(),
            "x ≤ 3"
        );
    }
}
