use tracing::debug;

use crate::ability::DEFAULT_ACTION;
use crate::compile::{compile_for, CompileOptions};
use crate::{Filter, Outcome, QueryError, Record, RuleSource};

/// An in-process collection of one subject's records.
///
/// # Example
///
/// ```
/// use rowguard::{Ability, ConditionSet, MemoryTable, Record};
///
/// let ability = Ability::builder()
///     .can("read", "Post")
///     .cannot_where("read", "Post", ConditionSet::single("private", true).unwrap())
///     .build();
///
/// let table = MemoryTable::new("Post")
///     .unwrap()
///     .with_record(Record::new().set("id", 1_i64).set("private", false))
///     .with_record(Record::new().set("id", 2_i64).set("private", true));
///
/// let visible = table.accessible_by(&ability, "read");
/// assert_eq!(visible.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryTable {
    subject: String,
    records: Vec<Record>,
    options: CompileOptions,
}

impl MemoryTable {
    /// # Errors
    ///
    /// Returns [`QueryError::MissingSubject`] when `subject` is empty.
    pub fn new(subject: &str) -> Result<Self, QueryError> {
        if subject.is_empty() {
            return Err(QueryError::MissingSubject);
        }
        Ok(Self {
            subject: subject.to_owned(),
            records: Vec::new(),
            options: CompileOptions::default(),
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    pub fn insert(&mut self, record: Record) {
        self.records.push(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Records `source` lets the caller perform `action` on, in table order.
    ///
    /// Denied access returns an empty vector without scanning the table. A record
    /// lacking a field named by a deny rule is hidden, as the SQL adapter hides a
    /// row whose column is NULL.
    #[must_use]
    pub fn accessible_by<S: RuleSource>(&self, source: &S, action: &str) -> Vec<&Record> {
        let outcome = compile_for(source, action, &self.subject, Filter::new(), &self.options);
        match outcome {
            Outcome::NoAccess => {
                debug!(subject = %self.subject, action, "access denied, skipping scan");
                Vec::new()
            }
            Outcome::Unrestricted(filter) | Outcome::Filtered(filter) => self
                .records
                .iter()
                .filter(|record| filter.matches(record))
                .collect(),
        }
    }

    /// [`accessible_by`](Self::accessible_by) for the `read` action.
    #[must_use]
    pub fn accessible_by_default<S: RuleSource>(&self, source: &S) -> Vec<&Record> {
        self.accessible_by(source, DEFAULT_ACTION)
    }
}
