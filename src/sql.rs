use std::fmt::{self, Write as _};

use tracing::debug;

use crate::ability::DEFAULT_ACTION;
use crate::compile::{compile_for, CompileOptions};
use crate::{ConditionSet, Outcome, PredicateBuilder, QueryError, RuleSource, Value};

/// Column name used by the unsatisfiable predicate attached on denied access.
pub const DEFAULT_DENY_SENTINEL: &str = "__forbidden_by_policy__";

/// Identifier quoting and literal conventions of the target database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Double-quoted identifiers, `true`/`false` literals.
    #[default]
    Postgres,
    /// Backtick identifiers, `1`/`0` booleans.
    Sqlite,
    /// Backtick identifiers, `true`/`false` literals.
    MySql,
}

impl Dialect {
    fn quote(self, ident: &str) -> String {
        match self {
            Dialect::Postgres => format!("\"{}\"", ident.replace('"', "\"\"")),
            Dialect::Sqlite | Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
        }
    }

    fn literal(self, value: &Value) -> String {
        match value {
            Value::Int(v) => v.to_string(),
            Value::Float(v) if v.is_nan() => "'NaN'".to_owned(),
            Value::Float(v) if v.is_infinite() => {
                if v.is_sign_positive() {
                    "'Infinity'".to_owned()
                } else {
                    "'-Infinity'".to_owned()
                }
            }
            Value::Float(v) => v.to_string(),
            Value::Bool(v) => match self {
                Dialect::Sqlite => u8::from(*v).to_string(),
                Dialect::Postgres | Dialect::MySql => v.to_string(),
            },
            Value::String(v) => format!("'{}'", v.replace('\'', "''")),
        }
    }
}

/// Configuration of the SQL adapter.
#[derive(Debug, Clone)]
pub struct SqlOptions {
    pub dialect: Dialect,
    pub deny_sentinel: String,
    pub compile: CompileOptions,
}

impl Default for SqlOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            deny_sentinel: DEFAULT_DENY_SENTINEL.to_owned(),
            compile: CompileOptions::default(),
        }
    }
}

impl SqlOptions {
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    #[must_use]
    pub fn with_deny_sentinel(mut self, column: impl Into<String>) -> Self {
        self.deny_sentinel = column.into();
        self
    }

    #[must_use]
    pub fn with_compile_options(mut self, compile: CompileOptions) -> Self {
        self.compile = compile;
        self
    }
}

/// A [`PredicateBuilder`] rendering each applied term to a SQL fragment at once.
///
/// Fragments keep call order and are meant to be joined with `and`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlWhere {
    dialect: Dialect,
    fragments: Vec<String>,
}

impl SqlWhere {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            fragments: Vec::new(),
        }
    }

    /// Rendered fragments in the order they were applied.
    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn equality(&self, field: &str, value: &Value) -> String {
        format!(
            "{} = {}",
            self.dialect.quote(field),
            self.dialect.literal(value)
        )
    }

    fn conjunction(&self, conditions: &ConditionSet) -> String {
        conditions
            .iter()
            .map(|(field, value)| self.equality(field, value))
            .collect::<Vec<_>>()
            .join(" and ")
    }
}

impl PredicateBuilder for SqlWhere {
    fn apply_conjunct_negated(&mut self, conditions: &ConditionSet) {
        let fragment = conditions
            .iter()
            .map(|(field, value)| format!("not {}", self.equality(field, value)))
            .collect::<Vec<_>>()
            .join(" and ");
        self.fragments.push(fragment);
    }

    fn apply_disjunction(&mut self, alternatives: &[&ConditionSet]) {
        let groups: Vec<String> = alternatives
            .iter()
            .map(|conditions| format!("({})", self.conjunction(conditions)))
            .collect();
        self.fragments.push(format!("({})", groups.join(" or ")));
    }
}

/// A `select` over one subject's table, restricted by its access rules.
///
/// # Example
///
/// ```
/// use rowguard::{Ability, ConditionSet, SelectQuery};
///
/// let ability = Ability::builder()
///     .can_where("read", "Post", ConditionSet::single("state", "draft").unwrap())
///     .build();
///
/// let query = SelectQuery::for_subject("Post", "posts")
///     .unwrap()
///     .accessible_by(&ability, "read");
///
/// assert_eq!(
///     query.to_sql(),
///     r#"select "posts".* from "posts" where (("state" = 'draft'))"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SelectQuery {
    subject: String,
    table: String,
    options: SqlOptions,
    wheres: Vec<String>,
    resolves_empty: bool,
}

impl SelectQuery {
    /// Start a query over `table`, whose rows are records of `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingSubject`] when `subject` is empty.
    pub fn for_subject(subject: &str, table: &str) -> Result<Self, QueryError> {
        if subject.is_empty() {
            return Err(QueryError::MissingSubject);
        }
        Ok(Self {
            subject: subject.to_owned(),
            table: table.to_owned(),
            options: SqlOptions::default(),
            wheres: Vec::new(),
            resolves_empty: false,
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: SqlOptions) -> Self {
        self.options = options;
        self
    }

    /// Add a caller condition. Caller conditions precede access predicates.
    #[must_use]
    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        let fragment = SqlWhere::new(self.options.dialect).equality(field, &value);
        self.wheres.push(fragment);
        self
    }

    /// Restrict the query to records `source` lets the caller perform `action` on.
    ///
    /// When no access is granted the query gets an unsatisfiable predicate and
    /// [`resolves_empty`](Self::resolves_empty) becomes true.
    #[must_use]
    pub fn accessible_by<S: RuleSource>(mut self, source: &S, action: &str) -> Self {
        let outcome = compile_for(
            source,
            action,
            &self.subject,
            SqlWhere::new(self.options.dialect),
            &self.options.compile,
        );
        match outcome {
            Outcome::NoAccess => {
                debug!(subject = %self.subject, action, "access denied, query emptied");
                let sentinel = SqlWhere::new(self.options.dialect)
                    .equality(&self.options.deny_sentinel, &Value::Int(1));
                self.wheres.push(sentinel);
                self.resolves_empty = true;
            }
            Outcome::Unrestricted(builder) | Outcome::Filtered(builder) => {
                self.wheres.extend(builder.fragments);
            }
        }
        self
    }

    /// [`accessible_by`](Self::accessible_by) for the `read` action.
    #[must_use]
    pub fn accessible_by_default<S: RuleSource>(self, source: &S) -> Self {
        self.accessible_by(source, DEFAULT_ACTION)
    }

    /// True when the query is known to return no rows and need not be executed.
    #[must_use]
    pub fn resolves_empty(&self) -> bool {
        self.resolves_empty
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Render the query text.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let table = self.options.dialect.quote(&self.table);
        let mut sql = format!("select {table}.* from {table}");
        if !self.wheres.is_empty() {
            let _ = write!(sql, " where {}", self.wheres.join(" and "));
        }
        sql
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_per_dialect() {
        assert_eq!(Dialect::Postgres.quote("posts"), "\"posts\"");
        assert_eq!(Dialect::Postgres.quote("a\"b"), "\"a\"\"b\"");
        assert_eq!(Dialect::Sqlite.quote("posts"), "`posts`");
        assert_eq!(Dialect::MySql.quote("a`b"), "`a``b`");
    }

    #[test]
    fn literals() {
        let pg = Dialect::Postgres;
        assert_eq!(pg.literal(&Value::Int(-3)), "-3");
        assert_eq!(pg.literal(&Value::Float(1.5)), "1.5");
        assert_eq!(pg.literal(&Value::Float(f64::NAN)), "'NaN'");
        assert_eq!(pg.literal(&Value::Float(f64::NEG_INFINITY)), "'-Infinity'");
        assert_eq!(pg.literal(&Value::Bool(true)), "true");
        assert_eq!(Dialect::Sqlite.literal(&Value::Bool(true)), "1");
        assert_eq!(pg.literal(&Value::from("it's")), "'it''s'");
    }

    #[test]
    fn negated_single_field_has_no_parens() {
        let mut sql = SqlWhere::new(Dialect::Postgres);
        sql.apply_conjunct_negated(&ConditionSet::single("private", true).unwrap());
        assert_eq!(sql.fragments(), &["not \"private\" = true"]);
    }

    #[test]
    fn negated_multi_field_negates_each_field() {
        let mut sql = SqlWhere::new(Dialect::Postgres);
        sql.apply_conjunct_negated(
            &ConditionSet::new([("status", "draft"), ("createdBy", "me")]).unwrap(),
        );
        assert_eq!(
            sql.fragments(),
            &["not \"status\" = 'draft' and not \"createdBy\" = 'me'"]
        );
    }

    #[test]
    fn disjunction_groups_each_set() {
        let mut sql = SqlWhere::new(Dialect::Sqlite);
        let a = ConditionSet::single("a", 1).unwrap();
        let b = ConditionSet::new([("b", 2), ("c", 3)]).unwrap();
        sql.apply_disjunction(&[&a, &b]);
        assert_eq!(sql.fragments(), &["((`a` = 1) or (`b` = 2 and `c` = 3))"]);
    }

    #[test]
    fn empty_subject_rejected() {
        assert_eq!(
            SelectQuery::for_subject("", "posts").unwrap_err(),
            QueryError::MissingSubject
        );
    }

    #[test]
    fn plain_query() {
        let query = SelectQuery::for_subject("Post", "posts").unwrap();
        assert_eq!(query.to_sql(), "select \"posts\".* from \"posts\"");
        assert!(!query.resolves_empty());
        assert_eq!(query.subject(), "Post");
    }
}
