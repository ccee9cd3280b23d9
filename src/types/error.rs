use thiserror::Error;

/// Rejection of a malformed rule entity at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("condition set must name at least one field; omit it to match every record")]
    EmptyConditions,

    #[error("duplicate field '{field}' in condition set")]
    DuplicateField { field: String },

    #[error("condition field name must not be empty")]
    EmptyField,
}

/// Errors raised by query adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("cannot detect subject name to return accessible records")]
    MissingSubject,
}
