//! Advisor adapter registry.
//!
//! The registry is built once, typically at startup, and is read-only
//! afterwards. It is shared by reference (or `Arc`) into every chain
//! resolution; no global mutable state is involved.

use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::adapters::{
    AdvisorAdapter, AfterReturningAdviceAdapter, BeforeAdviceAdapter, ThrowsAdviceAdapter,
};
use super::{Advice, MethodInterceptor};
use crate::advisor::Advisor;
use crate::error::AdvisorError;

static SHARED: OnceLock<Arc<AdapterRegistry>> = OnceLock::new();

/// Immutable table of advisor adapters.
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn AdvisorAdapter>>,
}

impl AdapterRegistry {
    /// Builder pre-populated with the before, after-returning and throws
    /// adapters.
    pub fn builder() -> AdapterRegistryBuilder {
        AdapterRegistryBuilder::empty()
            .register(BeforeAdviceAdapter)
            .register(AfterReturningAdviceAdapter)
            .register(ThrowsAdviceAdapter)
    }

    /// Process-wide default registry, initialized on first use.
    pub fn shared() -> Arc<AdapterRegistry> {
        SHARED
            .get_or_init(|| Arc::new(AdapterRegistry::default()))
            .clone()
    }

    /// Number of registered adapters (excluding the identity adapter).
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Returns true if the advice is an interceptor or some adapter
    /// supports it.
    pub fn supports(&self, advice: &Advice) -> bool {
        matches!(advice, Advice::Around(_)) || self.adapters.iter().any(|a| a.supports(advice))
    }

    /// Adapt the advisor's advice into interceptors.
    ///
    /// Around advice yields itself. Every adapter supporting the advice
    /// then contributes one interceptor, in registration order.
    pub fn interceptors(
        &self,
        advisor: &Advisor,
    ) -> Result<Vec<Arc<dyn MethodInterceptor>>, AdvisorError> {
        let advice = advisor.advice();
        let mut interceptors = Vec::with_capacity(1);

        if let Advice::Around(interceptor) = advice {
            interceptors.push(interceptor.clone());
        }
        interceptors.extend(
            self.adapters
                .iter()
                .filter(|a| a.supports(advice))
                .filter_map(|a| a.interceptor(advisor)),
        );

        if interceptors.is_empty() {
            return Err(AdvisorError::UnknownAdviceType(advice.kind().to_string()));
        }
        Ok(interceptors)
    }

    /// Wrap bare advice in an advisor that applies to every method.
    pub fn wrap(&self, advice: Advice) -> Result<Advisor, AdvisorError> {
        if self.supports(&advice) {
            Ok(Advisor::always(advice))
        } else {
            Err(AdvisorError::UnknownAdviceType(advice.kind().to_string()))
        }
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.adapters.len())
            .finish()
    }
}

/// Builder for [`AdapterRegistry`].
pub struct AdapterRegistryBuilder {
    adapters: Vec<Arc<dyn AdvisorAdapter>>,
}

impl AdapterRegistryBuilder {
    /// Builder with no adapters; only around advice will be supported.
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Register an adapter. Adapters are consulted in registration order.
    pub fn register(mut self, adapter: impl AdvisorAdapter + 'static) -> Self {
        self.adapters.push(Arc::new(adapter));
        self
    }

    pub fn build(self) -> AdapterRegistry {
        debug!(adapters = self.adapters.len(), "Adapter registry built");
        AdapterRegistry {
            adapters: self.adapters,
        }
    }
}
