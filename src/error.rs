use thiserror::Error;

use crate::parse::ParseError;
use crate::{QueryError, RuleError};

/// Unified error type covering parsing, rule construction, adapters, and I/O.
///
/// Returned by convenience methods like [`Ability::from_dsl()`](crate::Ability::from_dsl)
/// and [`Ability::from_file()`](crate::Ability::from_file).
#[derive(Debug, Error)]
pub enum RowguardError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
