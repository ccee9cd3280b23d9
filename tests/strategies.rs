#![allow(dead_code)]

use proptest::prelude::*;
use rowguard::{ConditionSet, Record, Rule, RuleSet, Value};

// --- Fixed field schema ---
// state   : string, one of {"draft", "published", "archived"}
// private : bool
// author  : i64 (0..4), sometimes missing from records

const STATES: &[&str] = &["draft", "published", "archived"];

/// Generate a record that aligns with the fixed field schema.
pub fn arb_record() -> impl Strategy<Value = Record> {
    (
        prop::sample::select(STATES),
        any::<bool>(),
        prop::option::weighted(0.8, 0_i64..4),
    )
        .prop_map(|(state, private, author)| {
            let record = Record::new().set("state", state).set("private", private);
            match author {
                Some(author) => record.set("author", author),
                None => record,
            }
        })
}

/// Generate a non-empty condition set over 1..=3 distinct schema fields.
pub fn arb_conditions() -> impl Strategy<Value = ConditionSet> {
    (
        prop::option::of(prop::sample::select(STATES)),
        prop::option::of(any::<bool>()),
        prop::option::of(0_i64..4),
    )
        .prop_filter("at least one field", |(s, p, a)| {
            s.is_some() || p.is_some() || a.is_some()
        })
        .prop_map(|(state, private, author)| {
            let mut pairs: Vec<(&str, Value)> = Vec::new();
            if let Some(state) = state {
                pairs.push(("state", Value::from(state)));
            }
            if let Some(private) = private {
                pairs.push(("private", Value::from(private)));
            }
            if let Some(author) = author {
                pairs.push(("author", Value::from(author)));
            }
            ConditionSet::new(pairs).expect("generated conditions are valid")
        })
}

/// Generate a single rule; most rules are conditioned.
pub fn arb_rule() -> impl Strategy<Value = Rule> {
    (prop::option::weighted(0.8, arb_conditions()), any::<bool>())
        .prop_map(|(conditions, inverted)| Rule {
            conditions,
            inverted,
        })
}

/// Generate 0..=8 rules, most recent first.
pub fn arb_rule_set() -> impl Strategy<Value = RuleSet> {
    prop::collection::vec(arb_rule(), 0..=8).prop_map(RuleSet::new)
}

/// Decision of the most recent rule whose scope covers `record`; nothing covering
/// the record means no access.
pub fn first_match_allows(rules: &RuleSet, record: &Record) -> bool {
    for rule in rules {
        let covers = rule
            .conditions
            .as_ref()
            .map_or(true, |conditions| conditions.matches(record));
        if covers {
            return !rule.inverted;
        }
    }
    false
}

/// True when some conditioned deny rule anywhere in `rules` could exclude `record`:
/// one of its fields is missing from the record or holds the denied value.
pub fn any_deny_touches(rules: &RuleSet, record: &Record) -> bool {
    rules.iter().any(|rule| {
        rule.inverted
            && rule.conditions.as_ref().is_some_and(|conditions| {
                conditions.iter().any(|(field, value)| {
                    record
                        .get(field)
                        .map_or(true, |actual| actual.matches(value))
                })
            })
    })
}
