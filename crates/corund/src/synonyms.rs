//! Shorthand function names and their canonical expansions.

use std::cell::LazyCell;
use std::collections::HashMap;

use crate::ast::{Entity, Kind};

type Builder = fn(&[Entity]) -> Entity;

fn single(args: &[Entity], name: &str) -> Entity {
    assert!(
        args.len() == 1,
        "shorthand {name} takes exactly one argument"
    );
    args[0].clone()
}

thread_local! {
    static SYNONYM_MAP: LazyCell<HashMap<&'static str, Builder>> = LazyCell::new(|| {
        let mut map: HashMap<&'static str, Builder> = HashMap::new();
        map.insert("sqrtf", |args| {
            single(args, "sqrtf").pow(Entity::rational(1, 2))
        });
        map.insert("sqrf", |args| single(args, "sqrf").pow(Entity::integer(2)));
        map.insert("tanf", |args| {
            Entity::function("tan", vec![single(args, "tanf")])
        });
        map.insert("cotanf", |args| {
            Entity::function("cotan", vec![single(args, "cotanf")])
        });
        map.insert("secf", |args| {
            Entity::function("sec", vec![single(args, "secf")])
        });
        map.insert("cosecf", |args| {
            Entity::function("cosec", vec![single(args, "cosecf")])
        });
        map.insert("lnf", |args| {
            Entity::function("ln", vec![single(args, "lnf")])
        });
        map.insert("bf", |args| {
            let arg = single(args, "bf");
            arg.clone() * Entity::function("sin", vec![arg])
        });
        map.insert("tbf", |args| {
            let arg = single(args, "tbf");
            arg.clone() * Entity::function("cos", vec![arg])
        });
        map
    });
}

impl Entity {
    /// Expands every shorthand function call into its canonical form, in one
    /// bottom-up pass. Unknown function names pass through untouched.
    ///
    /// # Panics
    /// Panics when a shorthand is called with the wrong number of arguments.
    pub fn expand_synonyms(&self) -> Entity {
        self.replace(&mut |exp| {
            let Kind::Function { name, args } = exp.kind() else {
                return exp.clone();
            };
            SYNONYM_MAP.with(|map| match map.get(name.as_str()) {
                Some(builder) => builder(args),
                None => exp.clone(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_shorthands() {
        let x = Entity::var("x");
        let exp = Entity::function("sqrtf", vec![x.clone()]);
        assert_eq!(exp.expand_synonyms(), x.clone().pow(Entity::rational(1, 2)));
        let exp = Entity::function("sqrf", vec![x.clone()]);
        assert_eq!(exp.expand_synonyms(), x.pow(Entity::integer(2)));
    }

    #[test]
    fn renamed_functions() {
        let x = Entity::var("x");
        let exp = Entity::function("tanf", vec![x.clone()]);
        assert_eq!(
            exp.expand_synonyms(),
            Entity::function("tan", vec![x.clone()])
        );
        let exp = Entity::function("lnf", vec![x.clone()]);
        assert_eq!(exp.expand_synonyms(), Entity::function("ln", vec![x]));
    }

    #[test]
    fn expansion_is_recursive() {
        let x = Entity::var("x");
        let inner = Entity::function("sqrf", vec![x.clone()]);
        let exp = Entity::function("sqrtf", vec![inner]) + Entity::integer(1);
        assert_eq!(
            exp.expand_synonyms(),
            x.pow(Entity::integer(2)).pow(Entity::rational(1, 2)) + Entity::integer(1)
        );
    }

    #[test]
    fn unknown_names_pass_through() {
        let exp = Entity::function("mystery", vec![Entity::var("x")]);
        assert_eq!(exp.expand_synonyms(), exp);
    }

    #[test]
    #[should_panic(expected = "exactly one argument")]
    fn wrong_arity_panics() {
        Entity::function("sqrtf", vec![Entity::var("x"), Entity::var("y")])
            .expand_synonyms();
    }
}
