//! Advice: the cross-cutting behavior executed as part of a call.
//!
//! Advice comes in several shapes. Around advice already is an
//! interceptor; before, after-returning and after-throwing advice are
//! adapted into interceptors by the [`AdapterRegistry`].
//!
//! # Architecture
//!
//! ```ignore
//! // Around advice controls the call through proceed()
//! let timing = Advice::around(|inv| {
//!     let start = Instant::now();
//!     let result = inv.proceed();
//!     tracing::debug!(elapsed = ?start.elapsed(), "call finished");
//!     result
//! });
//!
//! // Before advice runs ahead of the rest of the chain
//! let audit = Advice::before(|method, _args, _target| {
//!     tracing::info!(%method, "calling");
//!     Ok(())
//! });
//! ```
//!
//! # Available Advice
//!
//! - [`Instrumented`] - Logs the duration and outcome of every call

mod adapters;
mod instrumented;
mod registry;

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::descriptor::Method;
use crate::error::{InvocationError, Result};
use crate::invocation::MethodInvocation;
use crate::value::Value;

pub use adapters::{
    AdvisorAdapter, AfterReturningAdviceAdapter, AfterReturningInterceptor, BeforeAdviceAdapter,
    BeforeAdviceInterceptor, ThrowsAdviceAdapter, ThrowsAdviceInterceptor,
};
pub use instrumented::Instrumented;
pub use registry::{AdapterRegistry, AdapterRegistryBuilder};

/// Uniform executable unit consumed by the invocation executor.
///
/// The invocation is the continuation handle: calling
/// [`MethodInvocation::proceed`] is the only way execution reaches later
/// interceptors or the real target. Not calling it short-circuits the call
/// and the interceptor's own return value becomes the result.
pub trait MethodInterceptor: Send + Sync {
    fn invoke(&self, invocation: &mut MethodInvocation) -> Result<Value>;
}

impl<F> MethodInterceptor for F
where
    F: Fn(&mut MethodInvocation) -> Result<Value> + Send + Sync,
{
    fn invoke(&self, invocation: &mut MethodInvocation) -> Result<Value> {
        self(invocation)
    }
}

/// Advice run before the rest of the chain.
///
/// A failure aborts the call; neither later interceptors nor the target run.
pub trait BeforeAdvice: Send + Sync {
    fn before(&self, method: &Method, args: &[Value], target: &Value) -> Result<()>;
}

impl<F> BeforeAdvice for F
where
    F: Fn(&Method, &[Value], &Value) -> Result<()> + Send + Sync,
{
    fn before(&self, method: &Method, args: &[Value], target: &Value) -> Result<()> {
        self(method, args, target)
    }
}

/// Advice run after the chain returned normally.
pub trait AfterReturningAdvice: Send + Sync {
    fn after_returning(
        &self,
        returned: &Value,
        method: &Method,
        args: &[Value],
        target: &Value,
    ) -> Result<()>;
}

impl<F> AfterReturningAdvice for F
where
    F: Fn(&Value, &Method, &[Value], &Value) -> Result<()> + Send + Sync,
{
    fn after_returning(
        &self,
        returned: &Value,
        method: &Method,
        args: &[Value],
        target: &Value,
    ) -> Result<()> {
        self(returned, method, args, target)
    }
}

/// Advice run when the chain fails.
///
/// Only failures for which [`ThrowsAdvice::handles`] returns true reach
/// [`ThrowsAdvice::after_throwing`]. The original failure is rethrown
/// afterwards unless `after_throwing` returns a failure of its own, which
/// then replaces it.
pub trait ThrowsAdvice: Send + Sync {
    /// Returns true if this advice handles `error`.
    fn handles(&self, error: &InvocationError) -> bool;

    fn after_throwing(&self, invocation: &MethodInvocation, error: &InvocationError)
        -> Result<()>;
}

/// Throws advice for failures whose cause is an `E`.
pub struct OnError<E, F> {
    handler: F,
    _error: PhantomData<fn() -> E>,
}

impl<E, F> ThrowsAdvice for OnError<E, F>
where
    E: std::error::Error + 'static,
    F: Fn(&MethodInvocation, &E) -> Result<()> + Send + Sync,
{
    fn handles(&self, error: &InvocationError) -> bool {
        error.downcast_ref::<E>().is_some()
    }

    fn after_throwing(
        &self,
        invocation: &MethodInvocation,
        error: &InvocationError,
    ) -> Result<()> {
        match error.downcast_ref::<E>() {
            Some(e) => (self.handler)(invocation, e),
            None => Ok(()),
        }
    }
}

/// Advice shapes understood by the core, plus an extension slot.
#[derive(Clone)]
pub enum Advice {
    /// Already an interceptor; adapted by identity.
    Around(Arc<dyn MethodInterceptor>),
    Before(Arc<dyn BeforeAdvice>),
    AfterReturning(Arc<dyn AfterReturningAdvice>),
    AfterThrowing(Arc<dyn ThrowsAdvice>),
    /// A shape only a registered [`AdvisorAdapter`] understands.
    Extension {
        type_name: &'static str,
        advice: Arc<dyn Any + Send + Sync>,
    },
}

impl Advice {
    /// Around advice from a closure.
    pub fn around<F>(f: F) -> Self
    where
        F: Fn(&mut MethodInvocation) -> Result<Value> + Send + Sync + 'static,
    {
        Advice::Around(Arc::new(f))
    }

    /// Before advice from a closure.
    pub fn before<F>(f: F) -> Self
    where
        F: Fn(&Method, &[Value], &Value) -> Result<()> + Send + Sync + 'static,
    {
        Advice::Before(Arc::new(f))
    }

    /// After-returning advice from a closure.
    pub fn after_returning<F>(f: F) -> Self
    where
        F: Fn(&Value, &Method, &[Value], &Value) -> Result<()> + Send + Sync + 'static,
    {
        Advice::AfterReturning(Arc::new(f))
    }

    /// Throws advice handling failures caused by an `E`.
    pub fn on_error<E, F>(handler: F) -> Self
    where
        E: std::error::Error + 'static,
        F: Fn(&MethodInvocation, &E) -> Result<()> + Send + Sync + 'static,
    {
        Advice::AfterThrowing(Arc::new(OnError {
            handler,
            _error: PhantomData,
        }))
    }

    /// Wrap advice of a shape unknown to the core.
    pub fn extension<T: Any + Send + Sync>(advice: T) -> Self {
        Advice::Extension {
            type_name: std::any::type_name::<T>(),
            advice: Arc::new(advice),
        }
    }

    /// Short name of the advice shape, used in errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Advice::Around(_) => "around",
            Advice::Before(_) => "before",
            Advice::AfterReturning(_) => "after-returning",
            Advice::AfterThrowing(_) => "after-throwing",
            Advice::Extension { type_name, .. } => *type_name,
        }
    }

    /// Borrow extension advice as `T`.
    pub fn extension_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Advice::Extension { advice, .. } => advice.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Advice({})", self.kind())
    }
}
