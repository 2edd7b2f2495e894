//! Thread-scoped access to the current join point.
//!
//! The primary path hands each interceptor its invocation directly. For
//! code that cannot receive it (helpers called from deep inside advice or
//! the target), the current join point is published on a per-thread stack
//! while [`ExposeInvocation`] is on the call path. Entries are pushed on
//! entry and popped when the guard drops, on every exit path. Nested
//! advised calls push on top and restore the outer binding on return.
//!
//! A bound entry follows its invocation: replacing the arguments of an
//! exposed invocation republishes its join point in the same slot.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

use uuid::Uuid;

use super::MethodInvocation;
use crate::advice::MethodInterceptor;
use crate::descriptor::{ClassRef, Method};
use crate::error::{InvocationError, Result};
use crate::value::Value;

thread_local! {
    static JOIN_POINTS: RefCell<Vec<Arc<JoinPoint>>> = const { RefCell::new(Vec::new()) };
}

/// Read-only view of one intercepted call.
#[derive(Debug, Clone)]
pub struct JoinPoint {
    pub id: Uuid,
    pub target: Value,
    pub method: Method,
    pub target_class: ClassRef,
    pub arguments: Vec<Value>,
}

/// Removes the binding it created when dropped, along with anything
/// bound after it.
///
/// Not `Send`: it must be dropped on the thread that created it.
#[must_use = "the binding is removed as soon as the guard is dropped"]
pub struct BindingGuard {
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl BindingGuard {
    /// Stack slot holding this guard's join point.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for BindingGuard {
    fn drop(&mut self) {
        JOIN_POINTS.with(|stack| stack.borrow_mut().truncate(self.depth));
    }
}

/// Publish `join_point` as current on this thread until the guard drops.
pub fn bind(join_point: JoinPoint) -> BindingGuard {
    let depth = JOIN_POINTS.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(Arc::new(join_point));
        stack.len() - 1
    });
    BindingGuard {
        depth,
        _not_send: PhantomData,
    }
}

/// Replace the join point bound in slot `depth`, if that slot is still bound.
pub(super) fn rebind(depth: usize, join_point: JoinPoint) {
    JOIN_POINTS.with(|stack| {
        if let Some(slot) = stack.borrow_mut().get_mut(depth) {
            *slot = Arc::new(join_point);
        }
    });
}

/// The innermost join point bound on this thread.
pub fn current_join_point() -> Result<Arc<JoinPoint>> {
    JOIN_POINTS
        .with(|stack| stack.borrow().last().cloned())
        .ok_or(InvocationError::NoJoinPoint)
}

/// Number of join points currently bound on this thread.
pub fn binding_depth() -> usize {
    JOIN_POINTS.with(|stack| stack.borrow().len())
}

/// Interceptor publishing the invocation for the rest of the chain.
///
/// Place it first so every later interceptor and the target can call
/// [`current_join_point`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ExposeInvocation;

impl MethodInterceptor for ExposeInvocation {
    fn invoke(&self, invocation: &mut MethodInvocation) -> Result<Value> {
        let guard = bind(invocation.join_point());
        let outer = invocation.exposed_at.replace(guard.depth());
        let result = invocation.proceed();
        invocation.exposed_at = outer;
        drop(guard);
        result
    }
}
