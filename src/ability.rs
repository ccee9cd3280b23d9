use std::fmt;

use crate::{ConditionSet, Rule, RuleSet};

/// Action that matches every action.
pub const MANAGE: &str = "manage";
/// Subject that matches every subject.
pub const ALL: &str = "all";
/// Action adapters use when the caller names none.
pub const DEFAULT_ACTION: &str = "read";

/// Something that knows which rules govern an (action, subject) pair.
///
/// Implementations return rules most recently defined first; the compiler treats
/// that order as authoritative.
pub trait RuleSource {
    fn rules_for(&self, action: &str, subject: &str) -> RuleSet;
}

impl<S: RuleSource + ?Sized> RuleSource for &S {
    fn rules_for(&self, action: &str, subject: &str) -> RuleSet {
        (**self).rules_for(action, subject)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Grant {
    action: String,
    subject: String,
    rule: Rule,
}

impl Grant {
    fn applies_to(&self, action: &str, subject: &str) -> bool {
        (self.action == action || self.action == MANAGE)
            && (self.subject == subject || self.subject == ALL)
    }
}

/// An in-memory set of declared rules, answering [`RuleSource`] queries.
///
/// # Example
///
/// ```
/// use rowguard::{Ability, ConditionSet, RuleSource};
///
/// let ability = Ability::builder()
///     .can_where("read", "Post", ConditionSet::single("author", 1).unwrap())
///     .cannot_where("read", "Post", ConditionSet::single("private", true).unwrap())
///     .build();
///
/// let rules = ability.rules_for("read", "Post");
/// assert_eq!(rules.len(), 2);
/// assert!(rules.iter().next().unwrap().inverted);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ability {
    grants: Vec<Grant>,
}

/// Collects rules in declaration order for an [`Ability`].
#[derive(Debug, Default)]
pub struct AbilityBuilder {
    grants: Vec<Grant>,
}

impl AbilityBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a rule. Later declarations take precedence over earlier ones.
    #[must_use]
    pub fn rule(mut self, action: &str, subject: &str, rule: Rule) -> Self {
        self.grants.push(Grant {
            action: action.to_owned(),
            subject: subject.to_owned(),
            rule,
        });
        self
    }

    /// Allow `action` on every `subject` record.
    #[must_use]
    pub fn can(self, action: &str, subject: &str) -> Self {
        self.rule(action, subject, Rule::allow())
    }

    /// Allow `action` on `subject` records matching `conditions`.
    #[must_use]
    pub fn can_where(self, action: &str, subject: &str, conditions: ConditionSet) -> Self {
        self.rule(action, subject, Rule::allow_when(conditions))
    }

    /// Deny `action` on every `subject` record.
    #[must_use]
    pub fn cannot(self, action: &str, subject: &str) -> Self {
        self.rule(action, subject, Rule::deny())
    }

    /// Deny `action` on `subject` records matching `conditions`.
    #[must_use]
    pub fn cannot_where(self, action: &str, subject: &str, conditions: ConditionSet) -> Self {
        self.rule(action, subject, Rule::deny_when(conditions))
    }

    #[must_use]
    pub fn build(self) -> Ability {
        Ability {
            grants: self.grants,
        }
    }
}

impl Ability {
    #[must_use]
    pub fn builder() -> AbilityBuilder {
        AbilityBuilder::new()
    }

    /// Number of declared rules across all actions and subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Parse a policy DSL string into an `Ability`.
    ///
    /// # Errors
    ///
    /// Returns [`RowguardError`](crate::RowguardError) on a syntax error or when a
    /// rule is malformed (for example an empty `{}` condition block).
    pub fn from_dsl(input: &str) -> Result<Self, crate::RowguardError> {
        let parsed = crate::parse::parse(input)?;
        let mut builder = AbilityBuilder::new();
        for statement in parsed.statements {
            let conditions = statement.conditions.map(ConditionSet::new).transpose()?;
            builder = builder.rule(
                &statement.action,
                &statement.subject,
                Rule {
                    conditions,
                    inverted: statement.inverted,
                },
            );
        }
        Ok(builder.build())
    }

    /// Read a policy DSL file and parse it into an `Ability`.
    ///
    /// # Errors
    ///
    /// Returns [`RowguardError`](crate::RowguardError) on I/O, syntax or rule errors.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::RowguardError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_dsl(&input)
    }
}

impl RuleSource for Ability {
    fn rules_for(&self, action: &str, subject: &str) -> RuleSet {
        self.grants
            .iter()
            .rev()
            .filter(|g| g.applies_to(action, subject))
            .map(|g| g.rule.clone())
            .collect()
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let denies = self.grants.iter().filter(|g| g.rule.inverted).count();
        write!(
            f,
            "Ability({} rules, {} allow, {} deny)",
            self.grants.len(),
            self.grants.len() - denies,
            denies,
        )
    }
}
