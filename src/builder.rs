use crate::ConditionSet;

/// The capability a storage layer exposes to the rule compiler.
///
/// Implementations accumulate terms in call order, each combined by AND with
/// everything applied before it. Builders are single-use: the compiler expects a
/// fresh one per compilation.
pub trait PredicateBuilder {
    /// Additionally require that no field of `conditions` holds its given value.
    fn apply_conjunct_negated(&mut self, conditions: &ConditionSet);

    /// Additionally require that at least one set's conjunction holds.
    ///
    /// `alternatives` is never empty and is called at most once per compilation.
    fn apply_disjunction(&mut self, alternatives: &[&ConditionSet]);
}

impl<B: PredicateBuilder + ?Sized> PredicateBuilder for &mut B {
    fn apply_conjunct_negated(&mut self, conditions: &ConditionSet) {
        (**self).apply_conjunct_negated(conditions);
    }

    fn apply_disjunction(&mut self, alternatives: &[&ConditionSet]) {
        (**self).apply_disjunction(alternatives);
    }
}
