//! Resolved interceptor chains.
//!
//! A chain is the ordered interceptor sequence for one (advisor list,
//! method, target class) triple. It is immutable once built and cheap to
//! clone, so a caller may memoize it keyed on `(Method, ClassRef)`. This
//! module never caches chains itself.

mod resolver;

use std::fmt;
use std::sync::Arc;

use crate::advice::MethodInterceptor;
use crate::pointcut::ArgumentMatcher;

pub use resolver::ChainResolver;

/// One element of a resolved chain.
#[derive(Clone)]
pub enum ChainEntry {
    /// Always invoked when reached.
    Interceptor(Arc<dyn MethodInterceptor>),
    /// Invoked only if the matcher accepts the actual call arguments;
    /// skipped otherwise.
    Dynamic {
        interceptor: Arc<dyn MethodInterceptor>,
        matcher: Arc<dyn ArgumentMatcher>,
    },
}

impl ChainEntry {
    pub fn interceptor(&self) -> &Arc<dyn MethodInterceptor> {
        match self {
            ChainEntry::Interceptor(i) => i,
            ChainEntry::Dynamic { interceptor, .. } => interceptor,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, ChainEntry::Dynamic { .. })
    }
}

impl fmt::Debug for ChainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainEntry::Interceptor(_) => f.write_str("Interceptor"),
            ChainEntry::Dynamic { .. } => f.write_str("Dynamic"),
        }
    }
}

/// Immutable, ordered interceptor sequence.
#[derive(Clone)]
pub struct InterceptorChain {
    entries: Arc<[ChainEntry]>,
}

impl InterceptorChain {
    /// A chain with no interceptors; invoking through it calls the target
    /// directly.
    pub fn empty() -> Self {
        Self::from(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChainEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainEntry> {
        self.entries.iter()
    }

    /// New chain with `entry` placed first.
    pub fn prepend(&self, entry: ChainEntry) -> Self {
        let mut entries = Vec::with_capacity(self.len() + 1);
        entries.push(entry);
        entries.extend(self.entries.iter().cloned());
        Self::from(entries)
    }
}

impl Default for InterceptorChain {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<ChainEntry>> for InterceptorChain {
    fn from(entries: Vec<ChainEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::Advice;
    use crate::pointcut::{args_fn, MethodMatcher};

    fn around() -> Arc<dyn MethodInterceptor> {
        match Advice::around(|inv| inv.proceed()) {
            Advice::Around(i) => i,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_empty_chain() {
        let chain = InterceptorChain::default();
        assert!(chain.is_empty());
        assert!(chain.get(0).is_none());
    }

    #[test]
    fn test_prepend_keeps_original() {
        let first = around();
        let chain = InterceptorChain::from(vec![ChainEntry::Interceptor(around())]);
        let extended = chain.prepend(ChainEntry::Interceptor(first.clone()));

        assert_eq!(chain.len(), 1);
        assert_eq!(extended.len(), 2);
        assert!(Arc::ptr_eq(extended.get(0).unwrap().interceptor(), &first));
    }

    #[test]
    fn test_dynamic_entry() {
        let MethodMatcher::Dynamic(matcher) = args_fn(|_, _| true) else {
            unreachable!()
        };
        let entry = ChainEntry::Dynamic {
            interceptor: around(),
            matcher,
        };
        assert!(entry.is_dynamic());
        assert_eq!(format!("{:?}", InterceptorChain::from(vec![entry])), "[Dynamic]");
    }
}
