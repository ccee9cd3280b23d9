//! Text format for declaring abilities.
//!
//! ```text
//! # comments run to end of line
//! can read Post
//! can read Post { author: 123, status: "draft" }
//! cannot read Post { private: true }
//! ```
//!
//! Statements are listed oldest first; later statements take precedence.

mod error;
mod grammar;
mod parser;

pub use error::ParseError;
pub use parser::{ParsedPolicy, Statement};

/// Parse a DSL input string into a [`ParsedPolicy`].
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid DSL syntax.
pub fn parse(input: &str) -> Result<ParsedPolicy, ParseError> {
    use winnow::Parser;
    grammar::parse_policy
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}
