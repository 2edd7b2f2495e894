//! Timing instrumentation advice.
//!
//! Wraps the rest of the chain to log call latency and outcome without
//! touching the target implementation.

use std::time::Instant;

use tracing::{debug, warn};

use super::MethodInterceptor;
use crate::error::Result;
use crate::invocation::MethodInvocation;
use crate::value::Value;

/// Around advice that logs the duration and outcome of every call.
///
/// Emits one `debug` event per successful call and one `warn` event per
/// failed call, both carrying:
/// - `invocation` - invocation id
/// - `method` - the intercepted method
/// - `label` - caller-supplied label (e.g. the proxied component)
/// - `elapsed_us` - wall time spent in the rest of the chain
///
/// # Example
///
/// ```ignore
/// advised.add_advice(Advice::Around(Arc::new(Instrumented::new("orders"))))?;
/// ```
#[derive(Debug, Clone)]
pub struct Instrumented {
    label: &'static str,
}

impl Instrumented {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl MethodInterceptor for Instrumented {
    fn invoke(&self, invocation: &mut MethodInvocation) -> Result<Value> {
        let start = Instant::now();

        let result = invocation.proceed();

        let elapsed_us = start.elapsed().as_micros() as u64;
        match &result {
            Ok(_) => debug!(
                invocation = %invocation.id(),
                method = %invocation.method(),
                label = self.label,
                elapsed_us,
                "Call completed"
            ),
            Err(e) => warn!(
                invocation = %invocation.id(),
                method = %invocation.method(),
                label = self.label,
                elapsed_us,
                error = %e,
                "Call failed"
            ),
        }

        result
    }
}
