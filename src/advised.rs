//! Advised: the per-proxy configuration a proxy factory hands to the core.
//!
//! An [`Advised`] holds the ordered advisor list, the [`ProxyConfig`]
//! switches and the adapter registry used to turn advice into
//! interceptors. It resolves chains on demand and runs single calls
//! through them. Chains are not cached here.

use std::sync::Arc;

use tracing::debug;

use crate::advice::{AdapterRegistry, Advice};
use crate::advisor::Advisor;
use crate::chain::{ChainEntry, ChainResolver, InterceptorChain};
use crate::config::ProxyConfig;
use crate::descriptor::{ClassRef, Method, TargetInvoker};
use crate::error::{AdvisorError, InvocationError, Result};
use crate::invocation::{ExposeInvocation, MethodInvocation};
use crate::value::Value;

/// Advisor list plus configuration for one proxy.
#[derive(Clone)]
pub struct Advised {
    config: ProxyConfig,
    advisors: Vec<Advisor>,
    registry: Arc<AdapterRegistry>,
}

impl Advised {
    /// Empty advisor list using the shared adapter registry.
    pub fn new(config: ProxyConfig) -> Self {
        Self::with_registry(config, AdapterRegistry::shared())
    }

    pub fn with_registry(config: ProxyConfig, registry: Arc<AdapterRegistry>) -> Self {
        Self {
            config,
            advisors: Vec::new(),
            registry,
        }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Advisors in application order.
    pub fn advisors(&self) -> &[Advisor] {
        &self.advisors
    }

    /// Append an advisor.
    pub fn add_advisor(&mut self, advisor: Advisor) -> std::result::Result<(), AdvisorError> {
        let len = self.advisors.len();
        self.insert_advisor(len, advisor)
    }

    /// Insert an advisor at `pos`, shifting later advisors back.
    pub fn insert_advisor(
        &mut self,
        pos: usize,
        advisor: Advisor,
    ) -> std::result::Result<(), AdvisorError> {
        self.check_mutable()?;
        if pos > self.advisors.len() {
            return Err(AdvisorError::IndexOutOfBounds {
                index: pos,
                len: self.advisors.len(),
            });
        }
        if let Advisor::Introduction(ia) = &advisor {
            ia.validate()?;
        }
        debug!(position = pos, kind = advisor.advice().kind(), "Adding advisor");
        self.advisors.insert(pos, advisor);
        Ok(())
    }

    /// Remove and return the advisor at `pos`.
    pub fn remove_advisor(&mut self, pos: usize) -> std::result::Result<Advisor, AdvisorError> {
        self.check_mutable()?;
        if pos >= self.advisors.len() {
            return Err(AdvisorError::IndexOutOfBounds {
                index: pos,
                len: self.advisors.len(),
            });
        }
        Ok(self.advisors.remove(pos))
    }

    /// Append bare advice, applied to every method.
    pub fn add_advice(&mut self, advice: Advice) -> std::result::Result<(), AdvisorError> {
        self.check_mutable()?;
        let advisor = self.registry.wrap(advice)?;
        self.add_advisor(advisor)
    }

    fn check_mutable(&self) -> std::result::Result<(), AdvisorError> {
        if self.config.frozen {
            return Err(AdvisorError::Frozen);
        }
        Ok(())
    }

    /// Resolve the interceptor chain for `method` on `target_class`.
    pub fn chain_for(
        &self,
        method: &Method,
        target_class: Option<&ClassRef>,
    ) -> std::result::Result<InterceptorChain, AdvisorError> {
        let chain = ChainResolver::new(&self.registry).resolve(
            &self.advisors,
            method,
            target_class,
            self.config.pre_filtered,
        )?;
        if self.config.expose_invocation {
            return Ok(chain.prepend(ChainEntry::Interceptor(Arc::new(ExposeInvocation))));
        }
        Ok(chain)
    }

    /// Resolve the chain and run one call through it.
    ///
    /// With no applicable interceptors the target is invoked directly and
    /// its failure is returned as [`InvocationError::Target`], exactly as
    /// it would be through a chain.
    pub fn invoke(
        &self,
        target: Value,
        method: &Method,
        target_class: Option<&ClassRef>,
        arguments: Vec<Value>,
        invoker: Arc<dyn TargetInvoker>,
    ) -> Result<Value> {
        let chain = self.chain_for(method, target_class)?;
        if chain.is_empty() {
            return invoker
                .invoke(&target, method, &arguments)
                .map_err(InvocationError::Target);
        }
        MethodInvocation::new(
            target,
            method.clone(),
            target_class.cloned(),
            arguments,
            chain,
            invoker,
        )
        .proceed()
    }
}

impl std::fmt::Debug for Advised {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advised")
            .field("config", &self.config)
            .field("advisors", &self.advisors.len())
            .finish()
    }
}
