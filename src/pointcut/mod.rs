//! Pointcuts: class filter plus method matcher.
//!
//! Pointcuts are plain predicates. Parsing textual pointcut expressions is
//! left to an outer layer; this module only consumes the resulting
//! [`ClassFilter`] and [`MethodMatcher`].

mod class_filter;
mod method_matcher;

use std::sync::Arc;

pub use class_filter::{AnyClass, AssignableTo, ClassFilter, ClassFilters};
pub use method_matcher::{
    args_fn, method_fn, AnyMethod, ArgumentMatcher, MethodFilter, MethodMatcher, NameMatch,
};

/// Predicate selecting the classes and methods advice applies to.
#[derive(Clone, Debug)]
pub struct Pointcut {
    pub class_filter: Arc<dyn ClassFilter>,
    pub method_matcher: MethodMatcher,
}

impl Pointcut {
    pub fn new(class_filter: Arc<dyn ClassFilter>, method_matcher: MethodMatcher) -> Self {
        Self {
            class_filter,
            method_matcher,
        }
    }

    /// Matches every method of every class.
    pub fn always() -> Self {
        Self::new(Arc::new(AnyClass), MethodMatcher::any())
    }

    /// Matches methods by name pattern on any class. See [`NameMatch`].
    pub fn named<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            Arc::new(AnyClass),
            MethodMatcher::Static(Arc::new(NameMatch::new(patterns))),
        )
    }

    /// Any class, with the given (typically dynamic) method matcher.
    pub fn dynamic(matcher: MethodMatcher) -> Self {
        Self::new(Arc::new(AnyClass), matcher)
    }

    /// Replace the class filter.
    pub fn with_class_filter(mut self, class_filter: Arc<dyn ClassFilter>) -> Self {
        self.class_filter = class_filter;
        self
    }
}

impl Default for Pointcut {
    fn default() -> Self {
        Self::always()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ClassRef, Method};

    #[test]
    fn test_always_matches_everything() {
        let pc = Pointcut::always();
        let class = ClassRef::new("X");
        assert!(pc.class_filter.matches(&class));
        assert!(pc.method_matcher.matches(&Method::new(class.clone(), "m"), &class));
        assert!(!pc.method_matcher.is_runtime());
    }

    #[test]
    fn test_named_with_class_filter() {
        let pc = Pointcut::named(["find*"]).with_class_filter(Arc::new(AssignableTo::new("Repo")));
        let repo = ClassRef::new("OrderRepo").implementing(["Repo"]);
        assert!(pc.class_filter.matches(&repo));
        assert!(!pc.class_filter.matches(&ClassRef::new("Other")));
        assert!(pc
            .method_matcher
            .matches(&Method::new(repo.clone(), "findAll"), &repo));
        assert!(!pc
            .method_matcher
            .matches(&Method::new(repo.clone(), "save"), &repo));
    }

    #[test]
    fn test_dynamic_pointcut() {
        let pc = Pointcut::dynamic(args_fn(|_, args| !args.is_empty()));
        assert!(pc.method_matcher.is_runtime());
    }
}
