use std::fmt;

use crate::{ConditionSet, PredicateBuilder, Record};

/// One term of a compiled filter. Terms are combined by AND.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// No field of the set may hold its given value.
    ///
    /// A record missing one of the fields is rejected, as SQL rejects a row whose
    /// column is NULL under `not "f" = v`.
    Not(ConditionSet),
    /// The record must match every field of at least one set.
    AnyOf(Vec<ConditionSet>),
}

impl Term {
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Term::Not(set) => set.iter().all(|(field, forbidden)| {
                record
                    .get(field)
                    .is_some_and(|actual| !actual.matches(forbidden))
            }),
            Term::AnyOf(sets) => sets.iter().any(|set| set.matches(record)),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Not(set) => {
                for (i, (field, value)) in set.iter().enumerate() {
                    if i > 0 {
                        write!(f, " AND ")?;
                    }
                    write!(f, "NOT ({field} = {value})")?;
                }
                Ok(())
            }
            Term::AnyOf(sets) => {
                write!(f, "(")?;
                for (i, set) in sets.iter().enumerate() {
                    if i > 0 {
                        write!(f, " OR ")?;
                    }
                    write!(f, "({set})")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A [`PredicateBuilder`] that records terms in call order.
///
/// Besides being the builder tests inspect, it evaluates the accumulated
/// predicate against in-memory [`Record`]s with the same outcome the SQL
/// rendering has for rows where absent fields are NULL. An empty filter matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    terms: Vec<Term>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Terms in the order they were applied.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// True when nothing has been applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// True when `record` satisfies every term.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.terms.iter().all(|term| term.matches(record))
    }
}

impl PredicateBuilder for Filter {
    fn apply_conjunct_negated(&mut self, conditions: &ConditionSet) {
        self.terms.push(Term::Not(conditions.clone()));
    }

    fn apply_disjunction(&mut self, alternatives: &[&ConditionSet]) {
        self.terms
            .push(Term::AnyOf(alternatives.iter().map(|&set| set.clone()).collect()));
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "TRUE");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}
