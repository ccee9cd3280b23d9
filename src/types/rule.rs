use std::fmt;

use super::conditions::ConditionSet;

/// One allow or deny rule for a (subject, action) pair.
///
/// `conditions == None` makes the rule unconditioned: it applies to every record
/// of the subject. `inverted == true` marks a deny rule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub conditions: Option<ConditionSet>,
    pub inverted: bool,
}

impl Rule {
    /// Unconditioned allow: grants every record.
    #[must_use]
    pub fn allow() -> Self {
        Self {
            conditions: None,
            inverted: false,
        }
    }

    /// Unconditioned deny: revokes every record.
    #[must_use]
    pub fn deny() -> Self {
        Self {
            conditions: None,
            inverted: true,
        }
    }

    /// Allow records matching `conditions`.
    #[must_use]
    pub fn allow_when(conditions: ConditionSet) -> Self {
        Self {
            conditions: Some(conditions),
            inverted: false,
        }
    }

    /// Deny records matching `conditions`.
    #[must_use]
    pub fn deny_when(conditions: ConditionSet) -> Self {
        Self {
            conditions: Some(conditions),
            inverted: true,
        }
    }

    #[must_use]
    pub fn is_conditioned(&self) -> bool {
        self.conditions.is_some()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.inverted { "cannot" } else { "can" };
        match &self.conditions {
            Some(conditions) => write!(f, "{verb} when {conditions}"),
            None => write!(f, "{verb}"),
        }
    }
}
