use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use itertools::Itertools;
use ordermap::OrderSet;

use crate::domain::Domain;

pub mod operators;
pub use operators::*;

pub mod numeric;
pub use numeric::*;

pub mod complex;
pub use complex::*;

pub mod substitute;

/// A node of the expression tree.
///
/// `Entity` is a cheap handle around an immutable, shareable node. Trees are
/// built bottom-up and never mutated once published; every rewrite produces a
/// new tree, so subtrees may be structurally shared and read from any thread.
pub struct Entity {
    pub(crate) node: Arc<Node>,
}

pub(crate) struct Node {
    pub(crate) kind: Kind,
    /// Codomain tag. Defaulted lazily on first read, then frozen for this
    /// node instance; only `with_codomain` can produce a differently tagged
    /// copy.
    pub(crate) codomain: OnceLock<Domain>,
    pub(crate) evaled: OnceLock<Entity>,
    pub(crate) simplified: OnceLock<Entity>,
}

/// The closed sum of every expression variant. Set variants and set
/// operators are cases of the same tree as numbers and arithmetic, so the
/// whole engine runs on one traversal surface.
#[derive(Debug, Clone)]
pub enum Kind {
    Real(Num),
    Complex(ComplexNum),
    Boolean(bool),
    Var {
        name: String,
    },
    Unary {
        op: UnaryOp,
        operand: Entity,
    },
    Dyadic {
        op: DyadicOp,
        left: Entity,
        right: Entity,
    },
    Relation {
        rel: RelKind,
        left: Entity,
        right: Entity,
    },
    Function {
        name: String,
        args: Vec<Entity>,
    },
    FiniteSet(OrderSet<Entity>),
    Interval {
        left: Entity,
        right: Entity,
        left_closed: bool,
        right_closed: bool,
    },
    ConditionalSet {
        var: Entity,
        predicate: Entity,
    },
    SpecialSet(Domain),
    SetOp {
        op: SetOpKind,
        left: Entity,
        right: Entity,
    },
}

impl Kind {
    /// Number and boolean leaves carry their domain intrinsically; domain
    /// conversion leaves them untouched.
    pub fn is_domain_inert(&self) -> bool {
        matches!(self, Kind::Real(..) | Kind::Complex(..) | Kind::Boolean(..))
    }

    /// Whether this variant denotes a set, including an unresolved set
    /// operator node.
    pub fn is_set(&self) -> bool {
        matches!(
            self,
            Kind::FiniteSet(..)
                | Kind::Interval { .. }
                | Kind::ConditionalSet { .. }
                | Kind::SpecialSet(..)
                | Kind::SetOp { .. }
        )
    }
}

impl Entity {
    pub(crate) fn from_kind(kind: Kind) -> Self {
        Self {
            node: Arc::new(Node {
                kind,
                codomain: OnceLock::new(),
                evaled: OnceLock::new(),
                simplified: OnceLock::new(),
            }),
        }
    }

    /// Rebuilds this node with a new kind, carrying over the codomain tag
    /// (materialized or explicit) and dropping the memo cells.
    pub(crate) fn rebuilt(&self, kind: Kind) -> Self {
        Self {
            node: Arc::new(Node {
                kind,
                codomain: self.node.codomain.clone(),
                evaled: OnceLock::new(),
                simplified: OnceLock::new(),
            }),
        }
    }

    pub fn kind(&self) -> &Kind {
        &self.node.kind
    }

    // Leaf constructors.

    pub fn real(num: Num) -> Self {
        Self::from_kind(Kind::Real(num))
    }

    pub fn integer(value: i64) -> Self {
        Self::real(Num::from(value))
    }

    pub fn rational(numerator: i64, denominator: i64) -> Self {
        Self::real(numeric::rational(numerator, denominator))
    }

    pub fn nan() -> Self {
        Self::real(Num::NAN)
    }

    pub fn complex(real: Num, imag: Num) -> Self {
        Self::from_kind(Kind::Complex(ComplexNum::new(real, imag)))
    }

    pub fn boolean(value: bool) -> Self {
        Self::from_kind(Kind::Boolean(value))
    }

    pub fn var(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "variable name must not be empty");
        Self::from_kind(Kind::Var { name })
    }

    // Operator constructors.

    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::from_kind(Kind::Unary { op, operand })
    }

    pub fn dyadic(op: DyadicOp, left: Self, right: Self) -> Self {
        Self::from_kind(Kind::Dyadic { op, left, right })
    }

    pub fn relation(rel: RelKind, left: Self, right: Self) -> Self {
        Self::from_kind(Kind::Relation { rel, left, right })
    }

    pub fn pow(self, exponent: Self) -> Self {
        Self::dyadic(DyadicOp::Pow, self, exponent)
    }

    pub fn and(self, rhs: Self) -> Self {
        Self::dyadic(DyadicOp::And, self, rhs)
    }

    pub fn or(self, rhs: Self) -> Self {
        Self::dyadic(DyadicOp::Or, self, rhs)
    }

    pub fn implies(self, rhs: Self) -> Self {
        Self::dyadic(DyadicOp::Implies, self, rhs)
    }

    pub fn not(self) -> Self {
        Self::unary(UnaryOp::Not, self)
    }

    pub fn function(name: impl Into<String>, args: Vec<Self>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "function name must not be empty");
        Self::from_kind(Kind::Function { name, args })
    }

    // Set constructors.

    pub fn finite_set(elements: impl IntoIterator<Item = Self>) -> Self {
        Self::from_kind(Kind::FiniteSet(elements.into_iter().collect()))
    }

    pub fn empty_set() -> Self {
        Self::finite_set([])
    }

    pub fn interval(left: Self, right: Self, left_closed: bool, right_closed: bool) -> Self {
        Self::from_kind(Kind::Interval {
            left,
            right,
            left_closed,
            right_closed,
        })
    }

    /// Set-builder form: the set of values of `var` satisfying `predicate`.
    ///
    /// # Panics
    /// Panics if `var` is not a variable node.
    pub fn conditional_set(var: Self, predicate: Self) -> Self {
        assert!(
            matches!(var.kind(), Kind::Var { .. }),
            "bound quantity of a conditional set must be a variable"
        );
        Self::from_kind(Kind::ConditionalSet { var, predicate })
    }

    pub fn special_set(domain: Domain) -> Self {
        Self::from_kind(Kind::SpecialSet(domain))
    }

    pub fn union(left: Self, right: Self) -> Self {
        Self::from_kind(Kind::SetOp {
            op: SetOpKind::Union,
            left,
            right,
        })
    }

    pub fn intersection(left: Self, right: Self) -> Self {
        Self::from_kind(Kind::SetOp {
            op: SetOpKind::Intersection,
            left,
            right,
        })
    }

    pub fn set_minus(left: Self, right: Self) -> Self {
        Self::from_kind(Kind::SetOp {
            op: SetOpKind::SetMinus,
            left,
            right,
        })
    }

    // Predicates.

    pub fn is_number(&self) -> bool {
        matches!(self.kind(), Kind::Real(..) | Kind::Complex(..))
    }

    /// A value leaf: number or boolean.
    pub fn is_constant(&self) -> bool {
        self.kind().is_domain_inert()
    }

    pub fn is_var_named(&self, name: &str) -> bool {
        matches!(self.kind(), Kind::Var { name: n } if n == name)
    }

    pub fn as_var_name(&self) -> Option<&str> {
        match self.kind() {
            Kind::Var { name } => Some(name),
            _ => None,
        }
    }

    // Traversal.

    /// Direct operands in their semantic order. Leaves have none.
    pub fn children(&self) -> Vec<Entity> {
        use Kind::*;
        match self.kind() {
            Real(..) | Complex(..) | Boolean(..) | Var { .. } | SpecialSet(..) => Vec::new(),
            Unary { operand, .. } => vec![operand.clone()],
            Dyadic { left, right, .. }
            | Relation { left, right, .. }
            | SetOp { left, right, .. }
            | Interval { left, right, .. } => vec![left.clone(), right.clone()],
            Function { args, .. } => args.clone(),
            FiniteSet(elements) => elements.iter().cloned().collect(),
            ConditionalSet { var, predicate } => vec![var.clone(), predicate.clone()],
        }
    }

    /// Rebuilds this node with every direct child passed through `f`.
    /// Leaves are returned as-is. The codomain tag is carried over.
    pub fn map<F>(&self, mut f: F) -> Entity
    where
        F: FnMut(&Entity) -> Entity,
    {
        use Kind::*;
        let kind = match self.kind() {
            Real(..) | Complex(..) | Boolean(..) | Var { .. } | SpecialSet(..) => {
                return self.clone();
            }
            Unary { op, operand } => Unary {
                op: *op,
                operand: f(operand),
            },
            Dyadic { op, left, right } => Dyadic {
                op: *op,
                left: f(left),
                right: f(right),
            },
            Relation { rel, left, right } => Relation {
                rel: *rel,
                left: f(left),
                right: f(right),
            },
            Function { name, args } => Function {
                name: name.clone(),
                args: args.iter().map(f).collect_vec(),
            },
            FiniteSet(elements) => FiniteSet(elements.iter().map(f).collect()),
            Interval {
                left,
                right,
                left_closed,
                right_closed,
            } => Interval {
                left: f(left),
                right: f(right),
                left_closed: *left_closed,
                right_closed: *right_closed,
            },
            ConditionalSet { var, predicate } => ConditionalSet {
                var: f(var),
                predicate: f(predicate),
            },
            SetOp { op, left, right } => SetOp {
                op: *op,
                left: f(left),
                right: f(right),
            },
        };
        self.rebuilt(kind)
    }

    /// Post-order whole-tree rewrite: every subtree is replaced first, then
    /// `rule` is applied to the rebuilt node. Never mutates the receiver.
    pub fn replace<F>(&self, rule: &mut F) -> Entity
    where
        F: FnMut(&Entity) -> Entity,
    {
        let mapped = self.map(|child| child.replace(&mut *rule));
        rule(&mapped)
    }

    pub fn contains(&self, sub: &Entity) -> bool {
        self == sub || self.children().iter().any(|child| child.contains(sub))
    }

    /// Free variable names occurring anywhere in the tree.
    pub fn vars(&self) -> HashSet<String> {
        if let Kind::Var { name } = self.kind() {
            return HashSet::from([name.clone()]);
        }
        self.children()
            .iter()
            .map(Entity::vars)
            .fold(HashSet::new(), |a, b| &a | &b)
    }

    /// Node count, used as the structural-simplicity measure.
    pub fn complexity(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(Entity::complexity)
            .sum::<usize>()
    }
}

impl Clone for Entity {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
            || (self.codomain() == other.codomain() && self.node.kind == other.node.kind)
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.codomain().hash(state);
        self.node.kind.hash(state);
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        use Kind::*;
        match (self, other) {
            (Real(a), Real(b)) => a == b,
            (Complex(a), Complex(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            (Var { name: a }, Var { name: b }) => a == b,
            (
                Unary { op: a, operand: x },
                Unary {
                    op: b,
                    operand: y,
                },
            ) => a == b && x == y,
            (
                Dyadic {
                    op: a,
                    left: al,
                    right: ar,
                },
                Dyadic {
                    op: b,
                    left: bl,
                    right: br,
                },
            ) => a == b && al == bl && ar == br,
            (
                Relation {
                    rel: a,
                    left: al,
                    right: ar,
                },
                Relation {
                    rel: b,
                    left: bl,
                    right: br,
                },
            ) => a == b && al == bl && ar == br,
            (
                Function { name: a, args: x },
                Function { name: b, args: y },
            ) => a == b && x == y,
            // element order is not part of a set's identity
            (FiniteSet(a), FiniteSet(b)) => {
                a.len() == b.len() && a.iter().all(|element| b.contains(element))
            }
            (
                Interval {
                    left: al,
                    right: ar,
                    left_closed: alc,
                    right_closed: arc,
                },
                Interval {
                    left: bl,
                    right: br,
                    left_closed: blc,
                    right_closed: brc,
                },
            ) => alc == blc && arc == brc && al == bl && ar == br,
            (
                ConditionalSet {
                    var: av,
                    predicate: ap,
                },
                ConditionalSet {
                    var: bv,
                    predicate: bp,
                },
            ) => av == bv && ap == bp,
            (SpecialSet(a), SpecialSet(b)) => a == b,
            (
                SetOp {
                    op: a,
                    left: al,
                    right: ar,
                },
                SetOp {
                    op: b,
                    left: bl,
                    right: br,
                },
            ) => a == b && al == bl && ar == br,
            _ => false,
        }
    }
}

impl Eq for Kind {}

impl Hash for Kind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use Kind::*;
        std::mem::discriminant(self).hash(state);
        match self {
            Real(num) => num.hash(state),
            Complex(num) => num.hash(state),
            Boolean(b) => b.hash(state),
            Var { name } => name.hash(state),
            Unary { op, operand } => {
                op.hash(state);
                operand.hash(state);
            }
            Dyadic { op, left, right } => {
                op.hash(state);
                left.hash(state);
                right.hash(state);
            }
            Relation { rel, left, right } => {
                rel.hash(state);
                left.hash(state);
                right.hash(state);
            }
            Function { name, args } => {
                name.hash(state);
                args.hash(state);
            }
            // Set equality is order-insensitive, so the hash must be too:
            // combine element hashes with xor.
            FiniteSet(elements) => {
                let mut acc: u64 = 0;
                for element in elements {
                    let mut hasher = DefaultHasher::new();
                    element.hash(&mut hasher);
                    acc ^= hasher.finish();
                }
                acc.hash(state);
            }
            Interval {
                left,
                right,
                left_closed,
                right_closed,
            } => {
                left.hash(state);
                right.hash(state);
                left_closed.hash(state);
                right_closed.hash(state);
            }
            ConditionalSet { var, predicate } => {
                var.hash(state);
                predicate.hash(state);
            }
            SpecialSet(domain) => domain.hash(state),
            SetOp { op, left, right } => {
                op.hash(state);
                left.hash(state);
                right.hash(state);
            }
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.node.kind, f)
    }
}

impl From<i64> for Entity {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<bool> for Entity {
    fn from(value: bool) -> Self {
        Self::boolean(value)
    }
}

impl std::ops::Add for Entity {
    type Output = Entity;
    fn add(self, rhs: Self) -> Entity {
        Self::dyadic(DyadicOp::Add, self, rhs)
    }
}

impl std::ops::Sub for Entity {
    type Output = Entity;
    fn sub(self, rhs: Self) -> Entity {
        Self::dyadic(DyadicOp::Sub, self, rhs)
    }
}

impl std::ops::Mul for Entity {
    type Output = Entity;
    fn mul(self, rhs: Self) -> Entity {
        Self::dyadic(DyadicOp::Mul, self, rhs)
    }
}

impl std::ops::Div for Entity {
    type Output = Entity;
    fn div(self, rhs: Self) -> Entity {
        Self::dyadic(DyadicOp::Div, self, rhs)
    }
}

impl std::ops::Neg for Entity {
    type Output = Entity;
    fn neg(self) -> Entity {
        Self::unary(UnaryOp::Neg, self)
    }
}
