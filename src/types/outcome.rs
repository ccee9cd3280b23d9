use std::fmt;

/// Result of compiling a [`RuleSet`](super::RuleSet) against a predicate builder.
///
/// The three variants are exhaustive and mutually exclusive. `NoAccess` is distinct
/// from a builder with nothing applied: the former forbids every record, the latter
/// restricts none.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome<B> {
    /// No rule granted matchable access.
    NoAccess,
    /// An unconditioned allow rule was reached. The builder holds whatever deny
    /// terms were applied before it, and is untouched if there were none.
    Unrestricted(B),
    /// The builder holds every applicable deny term and at most one disjunction.
    Filtered(B),
}

impl<B> Outcome<B> {
    #[must_use]
    pub fn is_no_access(&self) -> bool {
        matches!(self, Outcome::NoAccess)
    }

    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Outcome::Unrestricted(_))
    }

    #[must_use]
    pub fn is_filtered(&self) -> bool {
        matches!(self, Outcome::Filtered(_))
    }

    /// Borrow the builder, unless access is denied outright.
    #[must_use]
    pub fn builder(&self) -> Option<&B> {
        match self {
            Outcome::NoAccess => None,
            Outcome::Unrestricted(b) | Outcome::Filtered(b) => Some(b),
        }
    }

    /// Take the builder, unless access is denied outright.
    #[must_use]
    pub fn into_builder(self) -> Option<B> {
        match self {
            Outcome::NoAccess => None,
            Outcome::Unrestricted(b) | Outcome::Filtered(b) => Some(b),
        }
    }

    /// Map the carried builder, keeping the variant.
    pub fn map<C>(self, f: impl FnOnce(B) -> C) -> Outcome<C> {
        match self {
            Outcome::NoAccess => Outcome::NoAccess,
            Outcome::Unrestricted(b) => Outcome::Unrestricted(f(b)),
            Outcome::Filtered(b) => Outcome::Filtered(f(b)),
        }
    }
}

impl<B> fmt::Display for Outcome<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NoAccess => write!(f, "no access"),
            Outcome::Unrestricted(_) => write!(f, "unrestricted access"),
            Outcome::Filtered(_) => write!(f, "filtered access"),
        }
    }
}
