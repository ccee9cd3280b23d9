use rowguard::{Ability, Dialect, MemoryTable, Record, SelectQuery, SqlOptions};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ability = Ability::from_file("demos/posts.rg").expect("failed to load policy");

    println!("{ability}");

    for action in ["read", "update", "delete"] {
        let query = SelectQuery::for_subject("Comment", "comments")
            .expect("subject is set")
            .with_options(SqlOptions::default().with_dialect(Dialect::Sqlite))
            .accessible_by(&ability, action);
        println!("{action}: {query}");
    }

    let posts = MemoryTable::new("Post")
        .expect("subject is set")
        .with_record(Record::new().set("id", 1_i64).set("state", "published").set("private", false))
        .with_record(
            Record::new()
                .set("id", 2_i64)
                .set("state", "draft")
                .set("author", 7_i64)
                .set("private", false),
        )
        .with_record(Record::new().set("id", 3_i64).set("state", "published").set("private", true));

    for record in posts.accessible_by_default(&ability) {
        println!("Visible post: {:?}", record.get("id"));
    }
}
