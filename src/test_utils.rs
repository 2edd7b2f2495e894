//! Test utilities and recording implementations.
//!
//! This module provides call recorders, recording advice and canned target
//! invokers so chain behavior can be asserted without a real target.

use std::sync::{Arc, Mutex};

use crate::advice::Advice;
use crate::descriptor::{Method, TargetInvoker};
use crate::error::BoxError;
use crate::value::Value;

/// Ordered log of calls shared between advice, targets and assertions.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of entries equal to `entry`.
    pub fn count(&self, entry: &str) -> usize {
        self.entries().iter().filter(|e| *e == entry).count()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

/// Failure used by tests as a target or advice error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TestError {
    pub message: String,
}

impl TestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Around advice that records `name` and proceeds.
pub fn recording(name: &str, log: &CallLog) -> Advice {
    let name = name.to_string();
    let log = log.clone();
    Advice::around(move |inv| {
        log.record(name.clone());
        inv.proceed()
    })
}

/// Around advice that records `name` and returns `value` without proceeding.
pub fn short_circuit(name: &str, log: &CallLog, value: &'static str) -> Advice {
    let name = name.to_string();
    let log = log.clone();
    Advice::around(move |_inv| {
        log.record(name.clone());
        Ok(Value::new(value))
    })
}

/// Target that records `"target"` and returns `value`.
pub fn ok_invoker(log: &CallLog, value: &'static str) -> Arc<dyn TargetInvoker> {
    let log = log.clone();
    Arc::new(
        move |_: &Value, _: &Method, _: &[Value]| -> Result<Value, BoxError> {
            log.record("target");
            Ok(Value::new(value))
        },
    )
}

/// Target that records `"target"` and fails with `message`.
pub fn failing_invoker(log: &CallLog, message: &'static str) -> Arc<dyn TargetInvoker> {
    let log = log.clone();
    Arc::new(
        move |_: &Value, _: &Method, _: &[Value]| -> Result<Value, BoxError> {
            log.record("target");
            Err(TestError::new(message).into())
        },
    )
}

/// Target that records `"target"` and echoes its first argument.
pub fn echo_invoker(log: &CallLog) -> Arc<dyn TargetInvoker> {
    let log = log.clone();
    Arc::new(
        move |_: &Value, _: &Method, args: &[Value]| -> Result<Value, BoxError> {
            log.record("target");
            Ok(args.first().cloned().unwrap_or_else(Value::unit))
        },
    )
}
