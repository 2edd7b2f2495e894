//! Advisor chain resolution.
//!
//! Turns an ordered advisor list into the interceptor chain for one method
//! on one target class. Resolution is a pure function of its inputs: it
//! performs no I/O, does not touch the advisor list, and keeps no state
//! between calls.

use std::cell::OnceCell;

use tracing::debug;

use super::{ChainEntry, InterceptorChain};
use crate::advice::AdapterRegistry;
use crate::advisor::Advisor;
use crate::descriptor::{ClassRef, Method};
use crate::error::AdvisorError;
use crate::pointcut::MethodMatcher;

/// Resolves advisor lists into interceptor chains.
#[derive(Clone, Copy)]
pub struct ChainResolver<'r> {
    registry: &'r AdapterRegistry,
}

impl<'r> ChainResolver<'r> {
    pub fn new(registry: &'r AdapterRegistry) -> Self {
        Self { registry }
    }

    /// Resolve the chain for `method` on `target_class`.
    ///
    /// `target_class` defaults to the method's declaring class. When
    /// `pre_filtered` is set, advisors are assumed to have been matched
    /// against the target class already and class filters are skipped.
    ///
    /// Dynamic matchers have their static half checked here; their argument
    /// check is deferred to each call via [`ChainEntry::Dynamic`].
    pub fn resolve(
        &self,
        advisors: &[Advisor],
        method: &Method,
        target_class: Option<&ClassRef>,
        pre_filtered: bool,
    ) -> Result<InterceptorChain, AdvisorError> {
        let actual_class = target_class.unwrap_or_else(|| method.declaring_class());
        let has_introductions = OnceCell::new();
        let mut entries = Vec::with_capacity(advisors.len());

        for advisor in advisors {
            match advisor {
                Advisor::Conditional(pa) => {
                    if !pre_filtered && !pa.pointcut.class_filter.matches(actual_class) {
                        continue;
                    }
                    let matcher = &pa.pointcut.method_matcher;
                    let matched = if matcher.introduction_aware() {
                        let has = *has_introductions
                            .get_or_init(|| has_matching_introductions(advisors, actual_class));
                        matcher.matches_with_introductions(method, actual_class, has)
                    } else {
                        matcher.matches(method, actual_class)
                    };
                    if !matched {
                        continue;
                    }

                    let interceptors = self.registry.interceptors(advisor)?;
                    match matcher {
                        MethodMatcher::Dynamic(m) => {
                            entries.extend(interceptors.into_iter().map(|interceptor| {
                                ChainEntry::Dynamic {
                                    interceptor,
                                    matcher: m.clone(),
                                }
                            }))
                        }
                        MethodMatcher::Static(_) => {
                            entries.extend(interceptors.into_iter().map(ChainEntry::Interceptor))
                        }
                    }
                }
                Advisor::Introduction(ia) => {
                    if pre_filtered || ia.class_filter.matches(actual_class) {
                        let interceptors = self.registry.interceptors(advisor)?;
                        entries.extend(interceptors.into_iter().map(ChainEntry::Interceptor));
                    }
                }
                Advisor::Unfiltered(_) => {
                    let interceptors = self.registry.interceptors(advisor)?;
                    entries.extend(interceptors.into_iter().map(ChainEntry::Interceptor));
                }
            }
        }

        debug!(
            method = %method,
            target_class = %actual_class,
            advisors = advisors.len(),
            interceptors = entries.len(),
            "Resolved interceptor chain"
        );

        Ok(InterceptorChain::from(entries))
    }
}

/// True if any introduction advisor applies to `class`.
fn has_matching_introductions(advisors: &[Advisor], class: &ClassRef) -> bool {
    advisors.iter().any(|a| match a {
        Advisor::Introduction(ia) => ia.class_filter.matches(class),
        _ => false,
    })
}
