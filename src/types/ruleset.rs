use std::fmt;

use super::rule::Rule;

/// The rules governing one (subject, action) pair, most recently defined first.
///
/// Order encodes precedence and is never changed once built. Providers assemble
/// a fresh `RuleSet` per request; the compiler reads it and keeps nothing.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Wrap rules that are already in most-recent-first order.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Build from rules listed in declaration order (oldest first).
    ///
    /// # Example
    ///
    /// ```
    /// use rowguard::{ConditionSet, Rule, RuleSet};
    ///
    /// let rules = RuleSet::from_declaration_order(vec![
    ///     Rule::allow(),
    ///     Rule::deny_when(ConditionSet::single("private", true).unwrap()),
    /// ]);
    /// assert!(rules.iter().next().unwrap().inverted);
    /// ```
    #[must_use]
    pub fn from_declaration_order(mut rules: Vec<Rule>) -> Self {
        rules.reverse();
        Self { rules }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Rule] {
        &self.rules
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let denies = self.rules.iter().filter(|r| r.inverted).count();
        write!(
            f,
            "RuleSet({} rules, {} allow, {} deny)",
            self.rules.len(),
            self.rules.len() - denies,
            denies,
        )
    }
}
