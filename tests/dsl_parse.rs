use std::io::Write;

use rowguard::{Ability, RowguardError, RuleError, RuleSource, SelectQuery};

#[test]
fn dsl_parse_and_query() {
    let dsl = r#"
# posts visible to the current reader
can read Post { state: "draft" }
can read Post { _id: "mega" }
cannot read Post { private: true }
cannot read Post { state: "archived" }
"#;

    let ability = Ability::from_dsl(dsl).unwrap();
    assert_eq!(ability.len(), 4);

    let sql = SelectQuery::for_subject("Post", "posts")
        .unwrap()
        .accessible_by_default(&ability)
        .to_sql();
    assert_eq!(
        sql,
        concat!(
            r#"select "posts".* from "posts" where "#,
            r#"not "state" = 'archived' and not "private" = true "#,
            r#"and (("_id" = 'mega') or ("state" = 'draft'))"#
        )
    );
}

#[test]
fn dsl_blanket_rules() {
    let dsl = "
can read Post { author: 123 }
can read Post
cannot delete Post
";
    let ability = Ability::from_dsl(dsl).unwrap();

    let read = ability.rules_for("read", "Post");
    assert_eq!(read.len(), 2);
    assert!(!read.iter().next().unwrap().is_conditioned());

    let delete = ability.rules_for("delete", "Post");
    assert!(delete.iter().next().unwrap().inverted);
}

#[test]
fn dsl_empty_braces_rejected_at_construction() {
    let err = Ability::from_dsl("can read Post {}").unwrap_err();
    assert!(matches!(err, RowguardError::Rule(RuleError::EmptyConditions)));
}

#[test]
fn dsl_duplicate_field_rejected() {
    let err = Ability::from_dsl("can read Post { a: 1, a: 2 }").unwrap_err();
    assert!(matches!(
        err,
        RowguardError::Rule(RuleError::DuplicateField { ref field }) if field == "a"
    ));
}

#[test]
fn dsl_syntax_error() {
    let err = Ability::from_dsl("can read Post { a 1 }").unwrap_err();
    assert!(matches!(err, RowguardError::Parse(_)));
}

#[test]
fn dsl_wildcards() {
    let ability = Ability::from_dsl("can manage all\ncannot delete Post { locked: true }").unwrap();
    assert_eq!(ability.rules_for("archive", "Comment").len(), 1);
    assert_eq!(ability.rules_for("delete", "Post").len(), 2);
}

#[test]
fn from_file_reads_policy() {
    let path = std::env::temp_dir().join(format!("rowguard-policy-{}.rg", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "can read Post {{ state: \"draft\" }}").unwrap();
    }
    let ability = Ability::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(ability.len(), 1);
}

#[test]
fn from_file_missing_is_io_error() {
    let err = Ability::from_file("/nonexistent/rowguard/policy.rg").unwrap_err();
    assert!(matches!(err, RowguardError::Io(_)));
}
