use crate::Value;

/// One `can` / `cannot` line of a policy.
///
/// Conditions are kept as written; they are validated when the statement becomes
/// a [`Rule`](crate::Rule).
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub inverted: bool,
    pub action: String,
    pub subject: String,
    pub conditions: Option<Vec<(String, Value)>>,
}

/// The result of parsing a DSL input string, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPolicy {
    pub statements: Vec<Statement>,
}
