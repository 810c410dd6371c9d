use corund::ast::{Num, RelKind};
use corund::{Domain, Entity, Kind};

fn ints(values: impl IntoIterator<Item = i64>) -> Entity {
    Entity::finite_set(values.into_iter().map(Entity::integer))
}

fn interval(a: i64, b: i64, lc: bool, rc: bool) -> Entity {
    Entity::interval(Entity::integer(a), Entity::integer(b), lc, rc)
}

#[test]
fn eval_and_simplify_are_idempotent() {
    let x = Entity::var("x");
    let battery = [
        Entity::integer(2) + Entity::integer(3) * x.clone(),
        Entity::integer(1) / Entity::integer(0),
        Entity::integer(2).pow(Entity::rational(1, 2)),
        x.clone() - x.clone(),
        Entity::union(ints([1, 2]), interval(0, 10, true, true)),
        Entity::set_minus(interval(0, 5, true, true), ints([2])),
        Entity::conditional_set(
            x.clone(),
            Entity::relation(RelKind::Gt, x.clone(), Entity::var("y")),
        ),
        Entity::union(Entity::var("a"), Entity::var("b")),
        Entity::function("f", vec![Entity::integer(2) + Entity::integer(2)]),
    ];
    for exp in battery {
        let evaled = exp.evaled();
        assert_eq!(evaled.evaled(), evaled, "eval must be a fixpoint: {exp}");
        let simplified = exp.simplified();
        assert_eq!(
            simplified.simplified(),
            simplified,
            "simplify must be a fixpoint: {exp}"
        );
    }
}

#[test]
fn domain_round_trip_preserves_tags() {
    let exp = (Entity::var("x") + Entity::integer(1)) * Entity::var("y");
    let direct = exp.domain_from_real_to_complex();
    let round_tripped = direct.domain_from_complex_to_real().domain_from_real_to_complex();
    assert_eq!(round_tripped, direct);
    // value leaves are never retagged
    let number = Entity::integer(1);
    assert_eq!(
        number.domain_from_real_to_complex().codomain(),
        Domain::Real
    );
    assert_eq!(
        Entity::boolean(true)
            .domain_change(Domain::Boolean, Domain::Real)
            .codomain(),
        Domain::Boolean
    );
}

#[test]
fn substitution_correctness() {
    let x = Entity::var("x");
    let v = Entity::integer(7);
    let without_x = Entity::var("y") * Entity::integer(2);
    assert_eq!(without_x.substitute(&x, &v), without_x);
    assert_eq!(x.substitute(&x, &v), v);
}

#[test]
fn substitute_then_eval_binds_the_variable() {
    let x = Entity::var("x");
    let exp = x.clone().pow(Entity::integer(2)) + Entity::integer(1);
    let bound = exp.substitute(&x, &Entity::integer(3));
    assert_eq!(bound.evaled(), Entity::integer(10));
}

#[test]
fn interval_collapse() {
    let a = Entity::integer(4);
    let point = Entity::interval(a.clone(), a.clone(), true, true);
    assert_eq!(point.simplified(), Entity::finite_set([a.clone()]));
    let empty = Entity::interval(a.clone(), a.clone(), false, true);
    assert_eq!(empty.simplified(), Entity::empty_set());
    let also_empty = Entity::interval(a.clone(), a, false, false);
    assert_eq!(also_empty.simplified(), Entity::empty_set());
}

#[test]
fn set_operator_fallback_keeps_operands() {
    let union = Entity::union(Entity::var("x"), Entity::var("y"));
    let simplified = union.simplified();
    assert_eq!(simplified, union);
    let Kind::SetOp { left, right, .. } = simplified.kind() else {
        panic!("expected an unresolved operator node");
    };
    assert_eq!(*left, Entity::var("x"));
    assert_eq!(*right, Entity::var("y"));
}

#[test]
fn conditional_set_decidability() {
    let x = Entity::var("x");
    let all = Entity::conditional_set(x.clone(), Entity::boolean(true));
    assert_eq!(all.evaled(), Domain::Real.universal_set());
    let all_integers =
        Entity::conditional_set(x.clone(), Entity::boolean(true)).with_codomain(Domain::Integer);
    assert_eq!(all_integers.evaled(), Domain::Integer.universal_set());
    let none = Entity::conditional_set(x, Entity::boolean(false));
    assert_eq!(none.evaled(), Entity::empty_set());
}

#[test]
fn conditional_set_with_open_predicate_keeps_its_shape() {
    let x = Entity::var("x");
    let set = Entity::conditional_set(
        x.clone(),
        Entity::relation(RelKind::Gt, x.clone() + Entity::integer(0), Entity::integer(2)),
    );
    let simplified = set.simplified();
    let Kind::ConditionalSet { predicate, .. } = simplified.kind() else {
        panic!("expected the set to stay conditional");
    };
    // the predicate was still simplified
    assert_eq!(
        *predicate,
        Entity::relation(RelKind::Gt, x, Entity::integer(2))
    );
}

#[test]
fn finite_set_intersected_with_interval() {
    let exp = Entity::intersection(ints([1, 2, 3]), interval(2, 10, true, true));
    assert_eq!(exp.simplified(), ints([2, 3]));
    assert_eq!(exp.evaled(), ints([2, 3]));
}

#[test]
fn removing_an_endpoint_opens_the_interval() {
    let exp = Entity::set_minus(interval(0, 5, true, true), ints([5]));
    assert_eq!(exp.simplified(), interval(0, 5, true, false));
}

#[test]
fn undefined_values_propagate_as_nan() {
    let exp = (Entity::integer(1) / Entity::integer(0)) * Entity::integer(3);
    let Kind::Real(num) = exp.evaled().kind().clone() else {
        panic!("expected a number");
    };
    assert!(num.is_nan());
}

#[test]
fn shorthand_expansion_feeds_the_passes() {
    let exp = Entity::function("sqrf", vec![Entity::integer(3)]);
    assert_eq!(exp.expand_synonyms().evaled(), Entity::integer(9));
}

#[test]
fn membership_across_an_operator_tree() {
    let band = Entity::union(interval(0, 4, true, true), ints([10, 12]));
    let punctured = Entity::set_minus(band, ints([2]));
    assert_eq!(punctured.try_contains(&Entity::integer(3)), Some(true));
    assert_eq!(punctured.try_contains(&Entity::integer(2)), Some(false));
    assert_eq!(punctured.try_contains(&Entity::integer(12)), Some(true));
    assert_eq!(punctured.try_contains(&Entity::integer(7)), Some(false));
    assert_eq!(punctured.try_contains(&Entity::var("x")), None);
}

#[test]
fn printed_forms_round_trip_key_notation() {
    assert_eq!(
        Entity::union(ints([1, 2]), Domain::Real.universal_set()).to_string(),
        "{1, 2} ∪ ℝ"
    );
    assert_eq!(interval(0, 5, true, false).to_string(), "[0, 5)");
    assert_eq!(
        (Entity::var("x") + Entity::integer(1)).pow(Entity::integer(2)).to_string(),
        "(x + 1)^2"
    );
}

#[test]
fn structural_sharing_is_safe_across_threads() {
    let x = Entity::var("x");
    let exp = (x.clone() + Entity::integer(1)) * (x - Entity::integer(1));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let exp = exp.clone();
            std::thread::spawn(move || exp.simplified())
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for pair in results.windows(2) {
        assert_eq!(pair[0], pair[1]);
    }
}

#[test]
fn exact_arithmetic_stays_exact() {
    let exp = Entity::rational(1, 3) + Entity::rational(1, 6);
    assert_eq!(exp.evaled(), Entity::rational(1, 2));
    let exp = Entity::rational(1, 2) + Entity::real(Num::from(0.25));
    let evaled = exp.evaled();
    let Kind::Real(Num::Small(float)) = evaled.kind() else {
        panic!("mixing in a float degrades the tier");
    };
    assert_eq!(float.0, 0.75);
}
