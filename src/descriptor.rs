//! Call-site descriptors: target classes, methods and the real invoker.
//!
//! These are the identities pointcuts match against and the capability the
//! invocation executor uses to reach the real target once the chain is
//! exhausted.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::BoxError;
use crate::value::Value;

/// Identity of a target type.
///
/// A class is identified by its name. It also records the names of the
/// types it can be used as (interfaces, supertypes), which class filters
/// consult via [`ClassRef::is_a`].
///
/// # Example
///
/// ```
/// use weft::descriptor::ClassRef;
///
/// let orders = ClassRef::new("OrderService").implementing(["Auditable", "Service"]);
/// assert!(orders.is_a("OrderService"));
/// assert!(orders.is_a("Auditable"));
/// assert!(!orders.is_a("Repository"));
/// ```
#[derive(Clone)]
pub struct ClassRef {
    inner: Arc<ClassInner>,
}

struct ClassInner {
    name: Cow<'static, str>,
    supertypes: Vec<Cow<'static, str>>,
}

impl ClassRef {
    /// Create a class with no declared supertypes.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            inner: Arc::new(ClassInner {
                name: name.into(),
                supertypes: Vec::new(),
            }),
        }
    }

    /// Return a copy of this class that is also assignable to `supertypes`.
    pub fn implementing<I, S>(self, supertypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        let mut all = self.inner.supertypes.clone();
        all.extend(supertypes.into_iter().map(Into::into));
        Self {
            inner: Arc::new(ClassInner {
                name: self.inner.name.clone(),
                supertypes: all,
            }),
        }
    }

    /// Class name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Declared supertypes, in declaration order.
    pub fn supertypes(&self) -> impl Iterator<Item = &str> {
        self.inner.supertypes.iter().map(|s| s.as_ref())
    }

    /// Returns true if this class is `name` or declares it as a supertype.
    pub fn is_a(&self, name: &str) -> bool {
        self.name() == name || self.supertypes().any(|s| s == name)
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRef")
            .field("name", &self.name())
            .field("supertypes", &self.inner.supertypes)
            .finish()
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a method: name, declaring class and parameter types.
///
/// Two methods are equal when all three agree, so `(Method, ClassRef)` is a
/// usable key for callers that memoize resolved chains.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Method {
    name: Cow<'static, str>,
    declaring_class: ClassRef,
    parameter_types: Vec<Cow<'static, str>>,
}

impl Method {
    /// Create a method with no parameters.
    pub fn new(declaring_class: ClassRef, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            declaring_class,
            parameter_types: Vec::new(),
        }
    }

    /// Set the parameter type names.
    pub fn with_parameters<I, S>(mut self, parameter_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        self.parameter_types = parameter_types.into_iter().map(Into::into).collect();
        self
    }

    /// Method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class that declares the method.
    pub fn declaring_class(&self) -> &ClassRef {
        &self.declaring_class
    }

    /// Parameter type names, in order.
    pub fn parameter_types(&self) -> impl Iterator<Item = &str> {
        self.parameter_types.iter().map(|s| s.as_ref())
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}({})",
            self.declaring_class,
            self.name,
            self.parameter_types.join(", ")
        )
    }
}

/// Capability that performs the real call once the chain is exhausted.
///
/// Implemented by direct dispatch (closure, trait object call), never by
/// reflection. Failures are returned as-is; the executor wraps them as
/// [`InvocationError::Target`](crate::error::InvocationError::Target).
pub trait TargetInvoker: Send + Sync {
    /// Invoke `method` on `target` with `args`.
    fn invoke(
        &self,
        target: &Value,
        method: &Method,
        args: &[Value],
    ) -> std::result::Result<Value, BoxError>;
}

impl<F> TargetInvoker for F
where
    F: Fn(&Value, &Method, &[Value]) -> std::result::Result<Value, BoxError> + Send + Sync,
{
    fn invoke(
        &self,
        target: &Value,
        method: &Method,
        args: &[Value],
    ) -> std::result::Result<Value, BoxError> {
        self(target, method, args)
    }
}
