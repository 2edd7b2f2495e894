//! Class filters: predicates over the target class.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::ClassRef;

/// Predicate deciding whether advice applies to a target class.
pub trait ClassFilter: Send + Sync {
    /// Returns true if the advice should apply to `class`.
    fn matches(&self, class: &ClassRef) -> bool;
}

impl<F> ClassFilter for F
where
    F: Fn(&ClassRef) -> bool + Send + Sync,
{
    fn matches(&self, class: &ClassRef) -> bool {
        self(class)
    }
}

/// Matches every class.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyClass;

impl ClassFilter for AnyClass {
    fn matches(&self, _class: &ClassRef) -> bool {
        true
    }
}

/// Matches classes assignable to a given type name.
#[derive(Debug, Clone)]
pub struct AssignableTo(pub String);

impl AssignableTo {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl ClassFilter for AssignableTo {
    fn matches(&self, class: &ClassRef) -> bool {
        class.is_a(&self.0)
    }
}

/// Composite class filters.
pub struct ClassFilters;

impl ClassFilters {
    /// Matches if any of `filters` matches.
    pub fn union(filters: Vec<Arc<dyn ClassFilter>>) -> Arc<dyn ClassFilter> {
        Arc::new(Union(filters))
    }

    /// Matches only if all of `filters` match.
    pub fn intersection(filters: Vec<Arc<dyn ClassFilter>>) -> Arc<dyn ClassFilter> {
        Arc::new(Intersection(filters))
    }
}

struct Union(Vec<Arc<dyn ClassFilter>>);

impl ClassFilter for Union {
    fn matches(&self, class: &ClassRef) -> bool {
        self.0.iter().any(|f| f.matches(class))
    }
}

struct Intersection(Vec<Arc<dyn ClassFilter>>);

impl ClassFilter for Intersection {
    fn matches(&self, class: &ClassRef) -> bool {
        self.0.iter().all(|f| f.matches(class))
    }
}

impl fmt::Debug for dyn ClassFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClassFilter")
    }
}
