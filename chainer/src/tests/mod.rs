mod unify;



use crate::{parse_item, Item};

pub(crate) fn fact(text: &str) -> Item {
    parse_item(&format!("fact: {}", text)).unwrap()
}

pub(crate) fn rule(text: &str) -> Item {
    parse_item(&format!("rule: {}", text)).unwrap()
}
