use super::{Entity, Kind};

impl Entity {
    /// Replaces every occurrence of `var` with `replacement`, returning a
    /// new tree. The receiver is never touched.
    ///
    /// Matching is by variable *name* only: two variable nodes sharing a
    /// name are the same substitution target even when their codomain tags
    /// differ. That looseness is a deliberate, load-bearing policy.
    ///
    /// # Panics
    /// Panics if `var` is not a variable node.
    pub fn substitute(&self, var: &Entity, replacement: &Entity) -> Entity {
        let Some(name) = var.as_var_name() else {
            panic!("substitution target must be a variable");
        };
        substituted(self, name, replacement)
    }
}

fn substituted(exp: &Entity, name: &str, replacement: &Entity) -> Entity {
    if exp.is_var_named(name) {
        return replacement.clone();
    }
    // Clone one level into a privately owned kind, then rewrite its child
    // slots in place; nothing else can observe the copy.
    let mut kind = exp.kind().clone();
    substitute_slots(&mut kind, name, replacement);
    exp.rebuilt(kind)
}

fn substitute_slot(slot: &mut Entity, name: &str, replacement: &Entity) {
    // Fast path: a direct variable hit needs no recursive call.
    if slot.is_var_named(name) {
        *slot = replacement.clone();
    } else {
        *slot = substituted(slot, name, replacement);
    }
}

fn substitute_slots(kind: &mut Kind, name: &str, replacement: &Entity) {
    use Kind::*;
    match kind {
        Real(..) | Complex(..) | Boolean(..) | Var { .. } | SpecialSet(..) => (),
        Unary { operand, .. } => substitute_slot(operand, name, replacement),
        Dyadic { left, right, .. }
        | Relation { left, right, .. }
        | Interval { left, right, .. }
        | SetOp { left, right, .. } => {
            substitute_slot(left, name, replacement);
            substitute_slot(right, name, replacement);
        }
        Function { args, .. } => {
            for arg in args {
                substitute_slot(arg, name, replacement);
            }
        }
        FiniteSet(elements) => {
            *elements = elements
                .iter()
                .map(|element| {
                    let mut element = element.clone();
                    substitute_slot(&mut element, name, replacement);
                    element
                })
                .collect();
        }
        ConditionalSet { var, predicate } => {
            substitute_slot(var, name, replacement);
            substitute_slot(predicate, name, replacement);
        }
    }
}
