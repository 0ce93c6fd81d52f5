use chainer::{parse_item, KnowledgeBase};
use serde_json::json;

fn derived_kb() -> KnowledgeBase {
    let mut kb = KnowledgeBase::new();
    kb.assert(parse_item("fact: (p a)").unwrap());
    kb.assert(parse_item("rule: ((p ?x)) -> (q ?x)").unwrap());
    kb
}

#[test]
fn test_answer_json() {
    let kb = derived_kb();
    let answers = kb.ask(parse_item("(q ?what)").unwrap());

    let value = serde_json::to_value(&answers).unwrap();
    assert_eq!(
        value,
        json!([{
            "bindings": [
                { "variable": "what", "value": { "kind": "constant", "name": "a" } }
            ],
            "facts": [
                { "predicate": "q", "terms": [{ "kind": "constant", "name": "a" }] }
            ]
        }])
    );
}

#[test]
fn test_snapshot_json_resolves_justifications() {
    let kb = derived_kb();
    let value = serde_json::to_value(kb.snapshot()).unwrap();

    let facts = value["facts"].as_array().unwrap();
    assert_eq!(facts.len(), 2);
    assert_eq!(facts[0]["asserted"], json!(true));
    assert_eq!(facts[0]["supported_by"], json!([]));

    assert_eq!(facts[1]["id"], json!(2));
    assert_eq!(facts[1]["asserted"], json!(false));
    let support = &facts[1]["supported_by"][0];
    assert_eq!(support["fact"]["predicate"], json!("p"));
    assert_eq!(support["rule"]["rhs"]["predicate"], json!("q"));
    assert_eq!(
        support["rule"]["lhs"][0]["terms"][0],
        json!({ "kind": "variable", "name": "x" })
    );

    let rules = value["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0]["id"], json!(1));
}

#[test]
fn test_retraction_json() {
    let mut kb = derived_kb();
    let report = kb.retract(parse_item("fact: (p a)").unwrap());

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["demoted"], json!(false));
    assert_eq!(value["removed_facts"].as_array().unwrap().len(), 2);
    assert_eq!(value["removed_rules"], json!([]));
}

#[test]
fn test_item_json_is_tagged() {
    let item = parse_item("rule: ((p ?x)) -> (q ?x)").unwrap();
    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(value["type"], json!("rule"));
    assert_eq!(value["value"]["rhs"]["predicate"], json!("q"));
}
