use crate::{factq, instantiate, match_statements, parse_item, parse_statement, Term};

#[test]
fn test_match_binds_pattern_variables() {
    let pattern = parse_statement("(isa ?x block)").unwrap();
    let candidate = parse_statement("(isa cube block)").unwrap();

    let bindings = match_statements(&pattern, &candidate).unwrap();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings.bound_to("x"), Some(&Term::constant("cube")));
}

#[test]
fn test_match_without_variables_is_empty_success() {
    let statement = parse_statement("(isa cube block)").unwrap();
    let bindings = match_statements(&statement, &statement).unwrap();
    assert!(bindings.is_empty());
    assert_eq!(bindings.to_string(), "yes");
}

#[test]
fn test_match_fails_on_constant_mismatch() {
    let pattern = parse_statement("(isa ?x block)").unwrap();
    let candidate = parse_statement("(isa cube pyramid)").unwrap();
    assert!(match_statements(&pattern, &candidate).is_none());
}

#[test]
fn test_match_fails_on_predicate_or_arity() {
    let pattern = parse_statement("(isa ?x block)").unwrap();
    assert!(match_statements(&pattern, &parse_statement("(on ?x block)").unwrap()).is_none());
    assert!(match_statements(&pattern, &parse_statement("(isa cube)").unwrap()).is_none());
}

#[test]
fn test_repeated_variable_must_bind_consistently() {
    let pattern = parse_statement("(same ?x ?x)").unwrap();
    assert!(match_statements(&pattern, &parse_statement("(same a a)").unwrap()).is_some());
    assert!(match_statements(&pattern, &parse_statement("(same a b)").unwrap()).is_none());
}

#[test]
fn test_candidate_variables_bind_to_pattern_terms() {
    let pattern = parse_statement("(color cube ?c)").unwrap();
    let candidate = parse_statement("(color ?thing red)").unwrap();

    let bindings = match_statements(&pattern, &candidate).unwrap();
    assert_eq!(bindings.bound_to("thing"), Some(&Term::constant("cube")));
    assert_eq!(bindings.bound_to("c"), Some(&Term::constant("red")));
}

#[test]
fn test_instantiate_substitutes_bound_variables_only() {
    let pattern = parse_statement("(on ?x ?y)").unwrap();
    let bindings = match_statements(
        &parse_statement("(isa ?x block)").unwrap(),
        &parse_statement("(isa cube block)").unwrap(),
    )
    .unwrap();

    let result = instantiate(&pattern, &bindings);
    assert_eq!(result.to_string(), "(on cube ?y)");
}

#[test]
fn test_bindings_display() {
    let bindings = match_statements(
        &parse_statement("(on ?x ?y)").unwrap(),
        &parse_statement("(on cube table)").unwrap(),
    )
    .unwrap();
    assert_eq!(bindings.to_string(), "?x: cube, ?y: table");
}

#[test]
fn test_factq() {
    assert!(factq(&parse_item("fact: (isa cube block)").unwrap()));
    assert!(!factq(&parse_item("rule: ((isa ?x block)) -> (movable ?x)").unwrap()));
}
