//! Weft - method interception engine
//!
//! Resolves an ordered list of advisors into the interceptor chain for a
//! method call and drives one call through that chain with explicit
//! `proceed()` continuation semantics.
//!
//! ```
//! use std::sync::Arc;
//! use weft::{Advice, Advised, ClassRef, Method, ProxyConfig, Value};
//!
//! let mut advised = Advised::new(ProxyConfig::default());
//! advised
//!     .add_advice(Advice::around(|inv| {
//!         let n = *inv.proceed()?.downcast_ref::<i32>().unwrap_or(&0);
//!         Ok(Value::new(n + 1))
//!     }))
//!     .unwrap();
//!
//! let method = Method::new(ClassRef::new("Counter"), "get");
//! let result = advised
//!     .invoke(
//!         Value::unit(),
//!         &method,
//!         None,
//!         vec![],
//!         Arc::new(|_: &Value, _: &Method, _: &[Value]| -> Result<Value, weft::BoxError> {
//!             Ok(Value::new(41i32))
//!         }),
//!     )
//!     .unwrap();
//! assert_eq!(result.downcast_ref::<i32>(), Some(&42));
//! ```

pub mod advice;
pub mod advised;
pub mod advisor;
pub mod chain;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod invocation;
pub mod pointcut;
pub mod utils;
pub mod value;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advice::{AdapterRegistry, Advice, MethodInterceptor};
pub use advised::Advised;
pub use advisor::Advisor;
pub use chain::{ChainEntry, ChainResolver, InterceptorChain};
pub use config::{ProxyConfig, Settings};
pub use descriptor::{ClassRef, Method, TargetInvoker};
pub use error::{AdvisorError, BoxError, InvocationError, Result};
pub use invocation::{current_join_point, ExposeInvocation, JoinPoint, MethodInvocation};
pub use pointcut::{MethodMatcher, Pointcut};
pub use value::Value;
