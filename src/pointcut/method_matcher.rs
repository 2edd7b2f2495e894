//! Method matchers: static and per-call predicates over a method.
//!
//! A matcher is either [`MethodMatcher::Static`], decided from the method
//! signature and target class alone while the chain is built, or
//! [`MethodMatcher::Dynamic`], whose argument check is deferred to each
//! actual call.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::{ClassRef, Method};
use crate::value::Value;

/// Static method predicate.
pub trait MethodFilter: Send + Sync {
    /// Decide from the signature and target class alone.
    fn matches(&self, method: &Method, target_class: &ClassRef) -> bool;

    /// Returns true if this filter wants to know whether introductions
    /// apply to the target class.
    fn introduction_aware(&self) -> bool {
        false
    }

    /// Introduction-aware variant of [`MethodFilter::matches`].
    ///
    /// Only called when [`MethodFilter::introduction_aware`] returns true.
    fn matches_with_introductions(
        &self,
        method: &Method,
        target_class: &ClassRef,
        _has_introductions: bool,
    ) -> bool {
        self.matches(method, target_class)
    }
}

/// Per-call method predicate.
///
/// The [`MethodFilter`] half is a static pre-check run while the chain is
/// built; [`ArgumentMatcher::matches_args`] runs once per actual call.
pub trait ArgumentMatcher: MethodFilter {
    /// Decide using the actual call arguments.
    fn matches_args(&self, method: &Method, target_class: &ClassRef, args: &[Value]) -> bool;
}

/// Two-case method matcher.
#[derive(Clone)]
pub enum MethodMatcher {
    /// Decidable from signature and class.
    Static(Arc<dyn MethodFilter>),
    /// Requires the actual call arguments.
    Dynamic(Arc<dyn ArgumentMatcher>),
}

impl MethodMatcher {
    /// Matcher that accepts every method.
    pub fn any() -> Self {
        MethodMatcher::Static(Arc::new(AnyMethod))
    }

    /// Returns true for [`MethodMatcher::Dynamic`].
    pub fn is_runtime(&self) -> bool {
        matches!(self, MethodMatcher::Dynamic(_))
    }

    /// Whether the static half wants introduction awareness.
    pub fn introduction_aware(&self) -> bool {
        match self {
            MethodMatcher::Static(f) => f.introduction_aware(),
            MethodMatcher::Dynamic(m) => m.introduction_aware(),
        }
    }

    /// Evaluate the static half.
    pub fn matches(&self, method: &Method, target_class: &ClassRef) -> bool {
        match self {
            MethodMatcher::Static(f) => f.matches(method, target_class),
            MethodMatcher::Dynamic(m) => m.matches(method, target_class),
        }
    }

    /// Evaluate the static half with introduction awareness.
    pub fn matches_with_introductions(
        &self,
        method: &Method,
        target_class: &ClassRef,
        has_introductions: bool,
    ) -> bool {
        match self {
            MethodMatcher::Static(f) => {
                f.matches_with_introductions(method, target_class, has_introductions)
            }
            MethodMatcher::Dynamic(m) => {
                m.matches_with_introductions(method, target_class, has_introductions)
            }
        }
    }
}

impl fmt::Debug for MethodMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodMatcher::Static(_) => f.write_str("MethodMatcher::Static"),
            MethodMatcher::Dynamic(_) => f.write_str("MethodMatcher::Dynamic"),
        }
    }
}

/// Matches every method.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyMethod;

impl MethodFilter for AnyMethod {
    fn matches(&self, _method: &Method, _target_class: &ClassRef) -> bool {
        true
    }
}

/// Matches methods by name.
///
/// Patterns support a leading and/or trailing `*`: `"get*"`, `"*Async"`,
/// `"*order*"`. A lone `"*"` matches everything. Any other pattern must
/// equal the method name.
#[derive(Debug, Clone, Default)]
pub struct NameMatch {
    patterns: Vec<String>,
}

impl NameMatch {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Add another pattern.
    pub fn add(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }
}

impl MethodFilter for NameMatch {
    fn matches(&self, method: &Method, _target_class: &ClassRef) -> bool {
        self.patterns
            .iter()
            .any(|p| simple_match(p, method.name()))
    }
}

fn simple_match(pattern: &str, name: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    match (pattern.strip_prefix('*'), pattern.strip_suffix('*')) {
        (Some(_), Some(_)) => name.contains(&pattern[1..pattern.len() - 1]),
        (Some(suffix), None) => name.ends_with(suffix),
        (None, Some(prefix)) => name.starts_with(prefix),
        (None, None) => name == pattern,
    }
}

struct MethodFn<F>(F);

impl<F> MethodFilter for MethodFn<F>
where
    F: Fn(&Method, &ClassRef) -> bool + Send + Sync,
{
    fn matches(&self, method: &Method, target_class: &ClassRef) -> bool {
        (self.0)(method, target_class)
    }
}

/// Static matcher from a closure.
pub fn method_fn<F>(f: F) -> MethodMatcher
where
    F: Fn(&Method, &ClassRef) -> bool + Send + Sync + 'static,
{
    MethodMatcher::Static(Arc::new(MethodFn(f)))
}

struct ArgsFn<F>(F);

impl<F> MethodFilter for ArgsFn<F>
where
    F: Send + Sync,
{
    fn matches(&self, _method: &Method, _target_class: &ClassRef) -> bool {
        true
    }
}

impl<F> ArgumentMatcher for ArgsFn<F>
where
    F: Fn(&Method, &[Value]) -> bool + Send + Sync,
{
    fn matches_args(&self, method: &Method, _target_class: &ClassRef, args: &[Value]) -> bool {
        (self.0)(method, args)
    }
}

/// Dynamic matcher from a closure over the call arguments.
///
/// The static pre-check accepts every method.
pub fn args_fn<F>(f: F) -> MethodMatcher
where
    F: Fn(&Method, &[Value]) -> bool + Send + Sync + 'static,
{
    MethodMatcher::Dynamic(Arc::new(ArgsFn(f)))
}
