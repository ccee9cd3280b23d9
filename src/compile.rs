use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::{ConditionSet, Outcome, PredicateBuilder, RuleSet, RuleSource};

/// Classifies a condition field as referring to a related entity.
///
/// This is an extension point: the compiler asks the hook about every field of
/// every conditioned rule it folds, but a positive answer is only logged. No join
/// filtering is generated.
pub trait RelationHook: Send + Sync {
    fn is_relation(&self, field: &str, subject: &str, source: &dyn RuleSource) -> bool;
}

/// The default hook: no field is a relation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRelations;

impl RelationHook for NoRelations {
    fn is_relation(&self, _field: &str, _subject: &str, _source: &dyn RuleSource) -> bool {
        false
    }
}

impl<F> RelationHook for F
where
    F: Fn(&str, &str, &dyn RuleSource) -> bool + Send + Sync,
{
    fn is_relation(&self, field: &str, subject: &str, source: &dyn RuleSource) -> bool {
        self(field, subject, source)
    }
}

/// Settings for [`compile_for`].
#[derive(Clone, Default)]
pub struct CompileOptions {
    relation_hook: Option<Arc<dyn RelationHook>>,
}

impl CompileOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a relation classification hook, replacing [`NoRelations`].
    #[must_use]
    pub fn with_relation_hook(mut self, hook: impl RelationHook + 'static) -> Self {
        self.relation_hook = Some(Arc::new(hook));
        self
    }

    fn hook(&self) -> &dyn RelationHook {
        match &self.relation_hook {
            Some(hook) => hook.as_ref(),
            None => &NoRelations,
        }
    }
}

impl fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("relation_hook", &self.relation_hook.is_some())
            .finish()
    }
}

/// Fold `rules` into `builder`.
///
/// Rules are read most recent first. Conditioned deny rules are applied to the
/// builder as soon as they are seen; conditioned allow rules are collected and
/// applied once at the end as a single disjunction. An unconditioned allow rule
/// returns [`Outcome::Unrestricted`] on the spot, an unconditioned deny rule stops
/// the fold so older rules are never examined.
///
/// # Example
///
/// ```
/// use rowguard::{compile, ConditionSet, Filter, Outcome, Rule, RuleSet};
///
/// let rules = RuleSet::new(vec![
///     Rule::deny_when(ConditionSet::single("private", true).unwrap()),
///     Rule::allow_when(ConditionSet::single("author", 7).unwrap()),
/// ]);
///
/// match compile(&rules, Filter::new()) {
///     Outcome::Filtered(filter) => {
///         assert_eq!(filter.to_string(), "NOT (private = true) AND ((author = 7))");
///     }
///     other => panic!("unexpected outcome: {other}"),
/// }
/// ```
pub fn compile<B: PredicateBuilder>(rules: &RuleSet, builder: B) -> Outcome<B> {
    fold(rules, builder, |_| false)
}

/// Ask `source` for the rules governing `action` on `subject` and compile them.
///
/// The relation hook configured in `options` is consulted for every condition field.
pub fn compile_for<S, B>(
    source: &S,
    action: &str,
    subject: &str,
    builder: B,
    options: &CompileOptions,
) -> Outcome<B>
where
    S: RuleSource,
    B: PredicateBuilder,
{
    let rules = source.rules_for(action, subject);
    debug!(action, subject, rules = rules.len(), "resolved rules");
    let hook = options.hook();
    fold(&rules, builder, |field| hook.is_relation(field, subject, source))
}

fn fold<B: PredicateBuilder>(
    rules: &RuleSet,
    mut builder: B,
    mut is_relation: impl FnMut(&str) -> bool,
) -> Outcome<B> {
    let mut pending: Vec<&ConditionSet> = Vec::new();
    let mut matched = false;

    for (position, rule) in rules.iter().enumerate() {
        let Some(conditions) = &rule.conditions else {
            if rule.inverted {
                trace!(position, "unconditioned deny, older rules discarded");
                break;
            }
            // Pending allow conditions are redundant under a blanket grant.
            trace!(position, superseded = pending.len(), "unconditioned allow");
            debug!(outcome = "unrestricted", rules = rules.len(), "compiled rules");
            return Outcome::Unrestricted(builder);
        };

        matched = true;

        for field in conditions.fields() {
            if is_relation(field) {
                debug!(field, "relation field, join filtering not performed");
            }
        }

        if rule.inverted {
            trace!(position, %conditions, "deny applied");
            builder.apply_conjunct_negated(conditions);
        } else {
            trace!(position, %conditions, "allow deferred");
            pending.push(conditions);
        }
    }

    if !pending.is_empty() {
        builder.apply_disjunction(&pending);
    }

    if !matched && pending.is_empty() {
        debug!(outcome = "no_access", rules = rules.len(), "compiled rules");
        Outcome::NoAccess
    } else {
        debug!(
            outcome = "filtered",
            rules = rules.len(),
            alternatives = pending.len(),
            "compiled rules"
        );
        Outcome::Filtered(builder)
    }
}
