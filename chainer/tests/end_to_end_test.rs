use chainer::{parse, parse_item, parse_statement, Item, KbResult, KnowledgeBase, ResourceLimits};

fn load(source: &str) -> KbResult<KnowledgeBase> {
    let mut kb = KnowledgeBase::new();
    for item in parse(source, Some("test.kb".to_string()), &ResourceLimits::default())? {
        kb.assert(item);
    }
    Ok(kb)
}

fn answers(kb: &KnowledgeBase, query: &str) -> Vec<String> {
    kb.ask(parse_item(query).unwrap())
        .iter()
        .map(|a| a.bindings.to_string())
        .collect()
}

#[test]
fn test_derived_fact_records_its_justification() -> KbResult<()> {
    let kb = load(
        r#"
        fact: (p a)
        rule: ((p ?x)) -> (q ?x)
        "#,
    )?;

    let q = kb.find_fact(&parse_statement("(q a)")?).unwrap();
    let entry = kb.fact(q).unwrap();
    assert!(!entry.is_asserted());
    assert_eq!(entry.supported_by().len(), 1);

    let support = entry.supported_by()[0];
    assert_eq!(kb.fact(support.fact).unwrap().content().to_string(), "(p a)");
    assert_eq!(
        kb.rule(support.rule).unwrap().content().to_string(),
        "((p ?x)) -> (q ?x)"
    );
    Ok(())
}

#[test]
fn test_retracting_the_only_support_removes_the_conclusion() -> KbResult<()> {
    let mut kb = load(
        r#"
        fact: (p a)
        rule: ((p ?x)) -> (q ?x)
        "#,
    )?;

    kb.retract(parse_item("fact: (p a)")?);

    assert!(!kb.contains(&parse_item("fact: (p a)")?));
    assert!(!kb.contains(&parse_item("fact: (q a)")?));
    assert!(kb.contains(&parse_item("rule: ((p ?x)) -> (q ?x)")?));
    Ok(())
}

#[test]
fn test_conclusion_survives_while_one_support_remains() -> KbResult<()> {
    let mut kb = load(
        r#"
        fact: (p a)
        fact: (r a)
        rule: ((p ?x)) -> (q ?x)
        rule: ((r ?x)) -> (q ?x)
        "#,
    )?;

    let q = kb.find_fact(&parse_statement("(q a)")?).unwrap();
    assert_eq!(kb.fact(q).unwrap().supported_by().len(), 2);

    kb.retract(parse_item("fact: (p a)")?);

    let entry = kb.fact(q).unwrap();
    assert_eq!(entry.supported_by().len(), 1);
    assert!(!entry.is_asserted());
    Ok(())
}

#[test]
fn test_rule_shaped_query_has_no_answers() -> KbResult<()> {
    let kb = load(
        r#"
        fact: (p a)
        rule: ((p ?x)) -> (q ?x)
        "#,
    )?;

    assert!(kb.ask(parse_item("rule: ((p ?x)) -> (q ?x)")?).is_empty());
    assert_eq!(kb.len(), 3);
    Ok(())
}

#[test]
fn test_blocks_world() -> KbResult<()> {
    let mut kb = load(
        r#"
        # The classic blocks world
        fact: (isa cube block)
        fact: (isa pyramid block)
        fact: (isa table furniture)
        fact: (on cube table)
        fact: (on pyramid cube)
        fact: (size cube big)

        rule: ((isa ?x block)) -> (movable ?x)
        rule: ((on ?x ?y) (on ?y ?z)) -> (above ?x ?z)
        rule: ((isa ?x block) (size ?x big)) -> (heavy ?x)
        "#,
    )?;

    assert_eq!(answers(&kb, "fact: (movable ?b)"), vec!["?b: cube", "?b: pyramid"]);
    assert_eq!(answers(&kb, "fact: (above ?x ?y)"), vec!["?x: pyramid, ?y: table"]);
    assert_eq!(answers(&kb, "fact: (heavy ?x)"), vec!["?x: cube"]);

    let report = kb.retract(parse_item("fact: (on cube table)")?);
    assert!(report.removed_facts.iter().any(|s| s.to_string() == "(above pyramid table)"));
    assert!(answers(&kb, "fact: (above ?x ?y)").is_empty());
    assert_eq!(answers(&kb, "fact: (heavy ?x)"), vec!["?x: cube"]);
    assert!(kb.check_invariants().is_empty());
    Ok(())
}

#[test]
fn test_assertion_order_does_not_change_the_closure() -> KbResult<()> {
    let rules_first = load(
        r#"
        rule: ((parent ?x ?y) (parent ?y ?z)) -> (grandparent ?x ?z)
        fact: (parent tom bob)
        fact: (parent bob ann)
        "#,
    )?;
    let facts_first = load(
        r#"
        fact: (parent tom bob)
        fact: (parent bob ann)
        rule: ((parent ?x ?y) (parent ?y ?z)) -> (grandparent ?x ?z)
        "#,
    )?;

    for kb in [&rules_first, &facts_first] {
        assert_eq!(answers(kb, "(grandparent ?who ?whom)"), vec!["?who: tom, ?whom: ann"]);
        assert!(kb.check_invariants().is_empty());
    }
    assert_eq!(rules_first.len(), facts_first.len());
    Ok(())
}

#[test]
fn test_bare_statements_are_facts() -> KbResult<()> {
    let items = parse(
        "fact: (p a)\nrule: (p ?x) => (q ?x)\n",
        None,
        &ResourceLimits::default(),
    )?;
    assert!(matches!(items.as_slice(), [Item::Fact(_), Item::Rule(_)]));
    assert!(parse_item("(p a)")?.is_fact());
    Ok(())
}
