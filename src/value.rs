//! Type-erased argument and return values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared, type-erased value passed as an argument or returned from a call.
///
/// Cloning is cheap; the same arguments may be handed to the target more
/// than once when advice calls `proceed()` repeatedly.
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
    /// Wrap a concrete value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// The unit value, returned by methods with nothing to return.
    pub fn unit() -> Self {
        Self::new(())
    }

    /// Borrow the value as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Returns true if the value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    /// Returns true if both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.downcast_ref::<String>() {
            write!(f, "Value({s:?})")
        } else if let Some(s) = self.downcast_ref::<&'static str>() {
            write!(f, "Value({s:?})")
        } else if let Some(n) = self.downcast_ref::<i64>() {
            write!(f, "Value({n})")
        } else if let Some(n) = self.downcast_ref::<i32>() {
            write!(f, "Value({n})")
        } else if self.is::<()>() {
            f.write_str("Value(())")
        } else {
            f.write_str("Value(..)")
        }
    }
}
