use std::fmt::Display;
use std::sync::OnceLock;

use strum::EnumIter;

use crate::ast::{Entity, Kind, UnaryOp};

/// The mathematical universe a node's value is interpreted within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Domain {
    Boolean,
    Integer,
    Rational,
    Real,
    Complex,
}

impl Domain {
    pub fn symbol(self) -> char {
        use Domain::*;
        match self {
            Boolean => '𝔹',
            Integer => 'ℤ',
            Rational => 'ℚ',
            Real => 'ℝ',
            Complex => 'ℂ',
        }
    }

    /// The universal set of this domain.
    pub fn universal_set(self) -> Entity {
        Entity::special_set(self)
    }

    /// Membership of a concrete value in this domain. `None` when the
    /// element is symbolic or the question is not decidable from its value.
    pub fn try_contains_constant(self, element: &Entity) -> Option<bool> {
        match element.kind() {
            Kind::Boolean(_) => Some(self == Domain::Boolean),
            Kind::Real(num) => {
                if num.is_nan() {
                    return Some(false);
                }
                Some(match self {
                    Domain::Boolean => false,
                    Domain::Integer => num.is_integer_value(),
                    // all three numeric tiers denote rationals exactly
                    Domain::Rational | Domain::Real | Domain::Complex => true,
                })
            }
            Kind::Complex(num) => {
                if num.is_nan() {
                    return Some(false);
                }
                if num.is_real() {
                    return self.try_contains_constant(&Entity::real(num.real.clone()));
                }
                Some(self == Domain::Complex)
            }
            _ => None,
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Kind {
    /// The codomain a node of this variant gets when none was set
    /// explicitly. Leaf values carry their intrinsic domain; logic and
    /// relations are boolean; everything else defaults to the reals.
    pub fn default_codomain(&self) -> Domain {
        use Kind::*;
        match self {
            Real(..) => Domain::Real,
            Complex(..) => Domain::Complex,
            Boolean(..) => Domain::Boolean,
            SpecialSet(domain) => *domain,
            Unary { op, .. } => match op {
                UnaryOp::Neg => Domain::Real,
                UnaryOp::Not => Domain::Boolean,
            },
            Dyadic { op, .. } => {
                if op.is_arithmetic() {
                    Domain::Real
                } else {
                    Domain::Boolean
                }
            }
            Relation { .. } => Domain::Boolean,
            Var { .. }
            | Function { .. }
            | FiniteSet(..)
            | Interval { .. }
            | ConditionalSet { .. }
            | SetOp { .. } => Domain::Real,
        }
    }
}

impl Entity {
    /// The codomain tag of this node. Defaulted per variant on first read
    /// and frozen for this instance afterwards.
    pub fn codomain(&self) -> Domain {
        *self
            .node
            .codomain
            .get_or_init(|| self.node.kind.default_codomain())
    }

    /// Rebuilds this node with the codomain pre-set. Returns a plain clone
    /// when the tag already matches.
    pub fn with_codomain(&self, domain: Domain) -> Entity {
        if self.codomain() == domain {
            return self.clone();
        }
        Entity {
            node: std::sync::Arc::new(crate::ast::Node {
                kind: self.node.kind.clone(),
                codomain: OnceLock::from(domain),
                evaled: OnceLock::new(),
                simplified: OnceLock::new(),
            }),
        }
    }

    /// Retags every node whose current codomain is `from` with `to`,
    /// leaving number and boolean leaves untouched.
    pub fn domain_change(&self, from: Domain, to: Domain) -> Entity {
        self.replace(&mut |ent: &Entity| {
            if ent.codomain() != from || ent.kind().is_domain_inert() {
                ent.clone()
            } else {
                ent.with_codomain(to)
            }
        })
    }

    pub fn domain_from_real_to_complex(&self) -> Entity {
        self.domain_change(Domain::Real, Domain::Complex)
    }

    pub fn domain_from_complex_to_real(&self) -> Entity {
        self.domain_change(Domain::Complex, Domain::Real)
    }
}
