use std::collections::HashSet;
use std::fmt;

use super::error::RuleError;
use super::record::Record;
use super::value::Value;

/// A conjunction of `field = value` requirements.
///
/// Never empty: a rule that matches every record carries no condition set at all
/// (see [`Rule::conditions`](super::Rule::conditions)). Field names are unique.
/// Insertion order is kept so rendered predicates are deterministic, but two sets
/// naming the same requirements in a different order compare equal.
#[derive(Debug, Clone)]
pub struct ConditionSet {
    fields: Vec<(String, Value)>,
}

impl ConditionSet {
    /// Build a condition set from `(field, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptyConditions`] when `pairs` is empty,
    /// [`RuleError::EmptyField`] for an empty field name and
    /// [`RuleError::DuplicateField`] when a field is named twice.
    pub fn new<I, K, V>(pairs: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut seen = HashSet::new();
        let mut fields = Vec::new();
        for (field, value) in pairs {
            let field = field.into();
            if field.is_empty() {
                return Err(RuleError::EmptyField);
            }
            if !seen.insert(field.clone()) {
                return Err(RuleError::DuplicateField { field });
            }
            fields.push((field, value.into()));
        }
        if fields.is_empty() {
            return Err(RuleError::EmptyConditions);
        }
        Ok(Self { fields })
    }

    /// Shorthand for a set with exactly one field.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptyField`] if `field` is empty.
    pub fn single(field: impl Into<String>, value: impl Into<Value>) -> Result<Self, RuleError> {
        Self::new([(field.into(), value.into())])
    }

    /// Number of fields. Always at least one.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// The required value for `field`, if the set names it.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Fields and their required values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// True when every field of the set is present in `record` with a matching value.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.fields.iter().all(|(name, required)| {
            record
                .get(name)
                .is_some_and(|actual| actual.matches(required))
        })
    }
}

impl PartialEq for ConditionSet {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl fmt::Display for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{name} = {value}")?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<(String, Value)>> for ConditionSet {
    type Error = RuleError;

    fn try_from(pairs: Vec<(String, Value)>) -> Result<Self, Self::Error> {
        Self::new(pairs)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;

    use serde::de::{Error as _, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{ConditionSet, Value};

    impl Serialize for ConditionSet {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.fields.len()))?;
            for (name, value) in &self.fields {
                map.serialize_entry(name, value)?;
            }
            map.end()
        }
    }

    struct ConditionSetVisitor;

    impl<'de> Visitor<'de> for ConditionSetVisitor {
        type Value = ConditionSet;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-empty map of field names to values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut pairs: Vec<(String, Value)> = Vec::new();
            while let Some((name, value)) = access.next_entry::<String, Value>()? {
                pairs.push((name, value));
            }
            ConditionSet::new(pairs).map_err(A::Error::custom)
        }
    }

    impl<'de> Deserialize<'de> for ConditionSet {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(ConditionSetVisitor)
        }
    }
}
