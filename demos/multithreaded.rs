use std::sync::Arc;
use std::thread;

use rowguard::{compile, Ability, ConditionSet, Filter, Record, RuleSource};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ability = Arc::new(
        Ability::builder()
            .can_where(
                "read",
                "Post",
                ConditionSet::single("state", "published").expect("valid conditions"),
            )
            .cannot_where(
                "read",
                "Post",
                ConditionSet::single("private", true).expect("valid conditions"),
            )
            .build(),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let ability = Arc::clone(&ability);
            thread::spawn(move || {
                let rules = ability.rules_for("read", "Post");
                let outcome = compile(&rules, Filter::new());

                let post = Record::new()
                    .set("state", "published")
                    .set("private", i % 2 == 0);
                let visible = outcome.builder().is_some_and(|filter| filter.matches(&post));
                println!("Thread {i}: {outcome}, private={} visible={visible}", i % 2 == 0);
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
