use rowguard::{compile, Ability, ConditionSet, Filter, Outcome, Record, RuleSource, SelectQuery};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Define rules, oldest first
    let ability = Ability::builder()
        .can_where(
            "read",
            "Post",
            ConditionSet::single("state", "published").expect("valid conditions"),
        )
        .can_where(
            "read",
            "Post",
            ConditionSet::single("author", 7).expect("valid conditions"),
        )
        .cannot_where(
            "read",
            "Post",
            ConditionSet::single("private", true).expect("valid conditions"),
        )
        .build();

    println!("{ability}");

    let rules = ability.rules_for("read", "Post");
    match compile(&rules, Filter::new()) {
        Outcome::NoAccess => println!("No access."),
        Outcome::Unrestricted(filter) => println!("Unrestricted, except: {filter}"),
        Outcome::Filtered(filter) => {
            println!("Filter: {filter}");
            let post = Record::new()
                .set("state", "published")
                .set("private", false);
            println!("Published public post visible: {}", filter.matches(&post));
        }
    }

    let query = SelectQuery::for_subject("Post", "posts")
        .expect("subject is set")
        .accessible_by_default(&ability);
    println!("SQL: {query}");
}
