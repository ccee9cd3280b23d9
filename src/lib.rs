//! Compile ordered allow/deny authorization rules into storage query predicates.
//!
//! A [`RuleSource`] such as [`Ability`] yields the [`RuleSet`] governing an
//! (action, subject) pair, most recent rule first. [`compile`] folds it into a
//! [`PredicateBuilder`] and returns an [`Outcome`]: no access, unrestricted access,
//! or a filter. Adapters ([`SelectQuery`], [`MemoryTable`]) turn the outcome into a
//! concrete query.

mod ability;
mod builder;
mod compile;
mod error;
mod filter;
mod memory;
pub mod parse;
mod sql;
mod types;

pub use ability::{Ability, AbilityBuilder, RuleSource, ALL, DEFAULT_ACTION, MANAGE};
pub use builder::PredicateBuilder;
pub use compile::{compile, compile_for, CompileOptions, NoRelations, RelationHook};
pub use error::RowguardError;
pub use filter::{Filter, Term};
pub use memory::MemoryTable;
pub use sql::{Dialect, SelectQuery, SqlOptions, SqlWhere, DEFAULT_DENY_SENTINEL};
pub use types::{ConditionSet, Outcome, QueryError, Record, Rule, RuleError, RuleSet, Value};
