//! Invocation chain executor.
//!
//! A [`MethodInvocation`] is one concrete call travelling through a
//! resolved chain. It is created per call, owned by that call, and driven
//! by [`MethodInvocation::proceed`], the only way to advance.
//!
//! # Proceed semantics
//!
//! - The cursor starts before the first chain entry and only moves forward.
//! - Each `proceed()` enters the next entry. Dynamic entries whose matcher
//!   rejects the actual arguments are skipped without being invoked.
//! - Once past the last entry, `proceed()` invokes the real target. Calling
//!   it again at that point invokes the target again.
//! - An interceptor that never calls `proceed()` short-circuits the call:
//!   later entries and the target never run.
//!
//! Use [`MethodInvocation::fork`] for advice that needs to run the remainder
//! of the chain more than once (retries).

mod binding;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;
use uuid::Uuid;

use crate::chain::{ChainEntry, InterceptorChain};
use crate::descriptor::{ClassRef, Method, TargetInvoker};
use crate::error::{InvocationError, Result};
use crate::value::Value;

pub use binding::{bind, binding_depth, current_join_point, BindingGuard, ExposeInvocation, JoinPoint};

/// One intercepted call.
pub struct MethodInvocation {
    id: Uuid,
    target: Value,
    method: Method,
    target_class: ClassRef,
    arguments: Vec<Value>,
    chain: InterceptorChain,
    invoker: Arc<dyn TargetInvoker>,
    /// Number of chain entries entered so far.
    entered: usize,
    attributes: HashMap<String, Value>,
    /// Binding slot published by [`ExposeInvocation`] while it is active.
    exposed_at: Option<usize>,
}

impl MethodInvocation {
    /// Create an invocation positioned before the first chain entry.
    ///
    /// `target_class` defaults to the method's declaring class.
    pub fn new(
        target: Value,
        method: Method,
        target_class: Option<ClassRef>,
        arguments: Vec<Value>,
        chain: InterceptorChain,
        invoker: Arc<dyn TargetInvoker>,
    ) -> Self {
        let target_class = target_class.unwrap_or_else(|| method.declaring_class().clone());
        Self {
            id: Uuid::new_v4(),
            target,
            method,
            target_class,
            arguments,
            chain,
            invoker,
            entered: 0,
            attributes: HashMap::new(),
            exposed_at: None,
        }
    }

    /// Advance to the next interceptor, or invoke the target once the chain
    /// is exhausted.
    pub fn proceed(&mut self) -> Result<Value> {
        loop {
            let Some(entry) = self.chain.get(self.entered).cloned() else {
                trace!(invocation = %self.id, method = %self.method, "Invoking target");
                return self
                    .invoker
                    .invoke(&self.target, &self.method, &self.arguments)
                    .map_err(InvocationError::Target);
            };
            let index = self.entered;
            self.entered += 1;

            match entry {
                ChainEntry::Interceptor(interceptor) => {
                    trace!(invocation = %self.id, index, "Entering interceptor");
                    return interceptor.invoke(self);
                }
                ChainEntry::Dynamic {
                    interceptor,
                    matcher,
                } => {
                    if matcher.matches_args(&self.method, &self.target_class, &self.arguments) {
                        trace!(invocation = %self.id, index, "Entering dynamic interceptor");
                        return interceptor.invoke(self);
                    }
                    trace!(invocation = %self.id, index, "Dynamic matcher rejected call, skipping");
                }
            }
        }
    }

    /// Copy of this invocation at the same chain position.
    ///
    /// Each fork owns its cursor, so advice can run the remainder of the
    /// chain once per fork. Attributes are copied; the id is shared.
    pub fn fork(&self) -> Self {
        Self {
            id: self.id,
            target: self.target.clone(),
            method: self.method.clone(),
            target_class: self.target_class.clone(),
            arguments: self.arguments.clone(),
            chain: self.chain.clone(),
            invoker: self.invoker.clone(),
            entered: self.entered,
            attributes: self.attributes.clone(),
            exposed_at: self.exposed_at,
        }
    }

    /// [`fork`](Self::fork) with replacement arguments.
    pub fn fork_with_arguments(&self, arguments: Vec<Value>) -> Self {
        let mut fork = self.fork();
        fork.set_arguments(arguments);
        fork
    }

    /// Invocation id, for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The target object.
    pub fn this(&self) -> &Value {
        &self.target
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Actual class of the target.
    pub fn target_class(&self) -> &ClassRef {
        &self.target_class
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Replace the arguments seen by later interceptors and the target.
    ///
    /// While exposed, the bound join point is republished with the new
    /// arguments.
    pub fn set_arguments(&mut self, arguments: Vec<Value>) {
        self.arguments = arguments;
        if let Some(depth) = self.exposed_at {
            binding::rebind(depth, self.join_point());
        }
    }

    /// Index of the most recently entered chain entry, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.entered.checked_sub(1)
    }

    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }

    /// Attach a value for later interceptors in this invocation.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.attributes.insert(key.into(), value)
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Read-only snapshot of this call.
    pub fn join_point(&self) -> JoinPoint {
        JoinPoint {
            id: self.id,
            target: self.target.clone(),
            method: self.method.clone(),
            target_class: self.target_class.clone(),
            arguments: self.arguments.clone(),
        }
    }
}

impl fmt::Debug for MethodInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInvocation")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("target_class", &self.target_class)
            .field("arguments", &self.arguments)
            .field("current_index", &self.current_index())
            .field("chain_len", &self.chain.len())
            .finish()
    }
}
