//! Adapters turning non-interceptor advice into interceptors.

use std::sync::Arc;

use tracing::trace;

use super::{AfterReturningAdvice, BeforeAdvice, MethodInterceptor, ThrowsAdvice};
use crate::advice::Advice;
use crate::advisor::Advisor;
use crate::error::Result;
use crate::invocation::MethodInvocation;
use crate::value::Value;

/// Adapts one advice shape into an interceptor.
///
/// Register custom adapters through
/// [`AdapterRegistryBuilder::register`](super::AdapterRegistryBuilder::register)
/// to support [`Advice::Extension`] shapes.
pub trait AdvisorAdapter: Send + Sync {
    /// Returns true if this adapter understands the advice.
    fn supports(&self, advice: &Advice) -> bool;

    /// Build the interceptor for the advisor's advice.
    ///
    /// Returns `None` if the advice is not supported.
    fn interceptor(&self, advisor: &Advisor) -> Option<Arc<dyn MethodInterceptor>>;
}

/// Adapter for [`Advice::Before`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BeforeAdviceAdapter;

impl AdvisorAdapter for BeforeAdviceAdapter {
    fn supports(&self, advice: &Advice) -> bool {
        matches!(advice, Advice::Before(_))
    }

    fn interceptor(&self, advisor: &Advisor) -> Option<Arc<dyn MethodInterceptor>> {
        match advisor.advice() {
            Advice::Before(advice) => Some(Arc::new(BeforeAdviceInterceptor {
                advice: advice.clone(),
            })),
            _ => None,
        }
    }
}

/// Runs before advice, then proceeds.
pub struct BeforeAdviceInterceptor {
    advice: Arc<dyn BeforeAdvice>,
}

impl BeforeAdviceInterceptor {
    pub fn new(advice: Arc<dyn BeforeAdvice>) -> Self {
        Self { advice }
    }
}

impl MethodInterceptor for BeforeAdviceInterceptor {
    fn invoke(&self, invocation: &mut MethodInvocation) -> Result<Value> {
        self.advice
            .before(invocation.method(), invocation.arguments(), invocation.this())?;
        invocation.proceed()
    }
}

/// Adapter for [`Advice::AfterReturning`].
#[derive(Debug, Default, Clone, Copy)]
pub struct AfterReturningAdviceAdapter;

impl AdvisorAdapter for AfterReturningAdviceAdapter {
    fn supports(&self, advice: &Advice) -> bool {
        matches!(advice, Advice::AfterReturning(_))
    }

    fn interceptor(&self, advisor: &Advisor) -> Option<Arc<dyn MethodInterceptor>> {
        match advisor.advice() {
            Advice::AfterReturning(advice) => Some(Arc::new(AfterReturningInterceptor {
                advice: advice.clone(),
            })),
            _ => None,
        }
    }
}

/// Proceeds, then runs after-returning advice on success.
pub struct AfterReturningInterceptor {
    advice: Arc<dyn AfterReturningAdvice>,
}

impl AfterReturningInterceptor {
    pub fn new(advice: Arc<dyn AfterReturningAdvice>) -> Self {
        Self { advice }
    }
}

impl MethodInterceptor for AfterReturningInterceptor {
    fn invoke(&self, invocation: &mut MethodInvocation) -> Result<Value> {
        let returned = invocation.proceed()?;
        self.advice.after_returning(
            &returned,
            invocation.method(),
            invocation.arguments(),
            invocation.this(),
        )?;
        Ok(returned)
    }
}

/// Adapter for [`Advice::AfterThrowing`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThrowsAdviceAdapter;

impl AdvisorAdapter for ThrowsAdviceAdapter {
    fn supports(&self, advice: &Advice) -> bool {
        matches!(advice, Advice::AfterThrowing(_))
    }

    fn interceptor(&self, advisor: &Advisor) -> Option<Arc<dyn MethodInterceptor>> {
        match advisor.advice() {
            Advice::AfterThrowing(advice) => Some(Arc::new(ThrowsAdviceInterceptor {
                advice: advice.clone(),
            })),
            _ => None,
        }
    }
}

/// Proceeds; hands failures the advice handles to it, then rethrows.
pub struct ThrowsAdviceInterceptor {
    advice: Arc<dyn ThrowsAdvice>,
}

impl ThrowsAdviceInterceptor {
    pub fn new(advice: Arc<dyn ThrowsAdvice>) -> Self {
        Self { advice }
    }
}

impl MethodInterceptor for ThrowsAdviceInterceptor {
    fn invoke(&self, invocation: &mut MethodInvocation) -> Result<Value> {
        match invocation.proceed() {
            Ok(value) => Ok(value),
            Err(err) if self.advice.handles(&err) => {
                trace!(
                    invocation = %invocation.id(),
                    error = %err,
                    "Throws advice handling failure"
                );
                // A failure from the handler replaces the original.
                self.advice.after_throwing(invocation, &err)?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
