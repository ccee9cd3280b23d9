mod conditions;
mod error;
mod outcome;
mod record;
mod rule;
mod ruleset;
mod value;

pub use conditions::ConditionSet;
pub use error::{QueryError, RuleError};
pub use outcome::Outcome;
pub use record::Record;
pub use rule::Rule;
pub use ruleset::RuleSet;
pub use value::Value;
