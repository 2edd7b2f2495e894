//! Error types for chain resolution and invocation.
//!
//! Failures raised by the real target or by advice are carried as boxed
//! errors and travel up the `proceed()` frames unchanged. The core never
//! retries and never swallows a failure.

/// Boxed failure raised by a target method or by advice.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for invocation operations.
pub type Result<T> = std::result::Result<T, InvocationError>;

/// Errors that can occur while assembling or mutating an advisor list.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// No registered adapter understands this advice shape.
    #[error("Advice of type {0} is not supported by any registered adapter")]
    UnknownAdviceType(String),

    /// The advisor list was frozen by configuration.
    #[error("Cannot modify advisors: configuration is frozen")]
    Frozen,

    /// An introduction advisor must introduce at least one interface.
    #[error("Introduction advisor introduces no interfaces")]
    EmptyIntroduction,

    /// Positional access outside the advisor list.
    #[error("Advisor index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Errors that can occur while executing an intercepted call.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    /// Implicit join point lookup with nothing bound on this thread.
    #[error("No join point bound on the current thread; is ExposeInvocation in the chain?")]
    NoJoinPoint,

    /// The real target method failed.
    #[error("Target failure: {0}")]
    Target(BoxError),

    /// An interceptor or advice failed.
    #[error("Advice failure: {0}")]
    Advice(BoxError),

    /// The chain could not be resolved.
    #[error(transparent)]
    Advisor(#[from] AdvisorError),
}

impl InvocationError {
    /// Wrap a failure raised by the target method.
    pub fn target(err: impl Into<BoxError>) -> Self {
        InvocationError::Target(err.into())
    }

    /// Wrap a failure raised by advice.
    pub fn advice(err: impl Into<BoxError>) -> Self {
        InvocationError::Advice(err.into())
    }

    /// Returns true if this failure came from the target method.
    pub fn is_target(&self) -> bool {
        matches!(self, InvocationError::Target(_))
    }

    /// Returns true if this failure came from advice.
    pub fn is_advice(&self) -> bool {
        matches!(self, InvocationError::Advice(_))
    }

    /// Returns the wrapped failure, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            InvocationError::Target(e) | InvocationError::Advice(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// Downcast the wrapped failure to a concrete error type.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.cause().and_then(|e| e.downcast_ref::<E>())
    }
}
