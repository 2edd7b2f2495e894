//! Advisors: advice paired with the predicate deciding where it applies.

use std::sync::Arc;

use crate::advice::Advice;
use crate::error::AdvisorError;
use crate::pointcut::{ClassFilter, Pointcut};

/// Advice applied where a pointcut matches.
#[derive(Clone, Debug)]
pub struct PointcutAdvisor {
    pub pointcut: Pointcut,
    pub advice: Advice,
}

/// Advice applied to every method of every class the filter accepts.
///
/// Introductions add a capability (the listed interfaces) to the target
/// rather than advising particular methods.
#[derive(Clone, Debug)]
pub struct IntroductionAdvisor {
    pub class_filter: Arc<dyn ClassFilter>,
    pub advice: Advice,
    pub interfaces: Vec<String>,
}

impl IntroductionAdvisor {
    /// An introduction must name at least one interface.
    pub fn validate(&self) -> Result<(), AdvisorError> {
        if self.interfaces.is_empty() {
            return Err(AdvisorError::EmptyIntroduction);
        }
        Ok(())
    }

    /// Returns true if this advisor introduces `interface`.
    pub fn introduces(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }
}

/// Closed set of advisor kinds.
///
/// The order of advisors in a list is significant and is preserved by
/// chain resolution.
#[derive(Clone, Debug)]
pub enum Advisor {
    /// Applies only where the pointcut matches.
    Conditional(PointcutAdvisor),
    /// Applies to all methods of matching classes.
    Introduction(IntroductionAdvisor),
    /// Applies to every call, with no filtering at all.
    Unfiltered(Advice),
}

impl Advisor {
    pub fn conditional(pointcut: Pointcut, advice: Advice) -> Self {
        Advisor::Conditional(PointcutAdvisor { pointcut, advice })
    }

    /// Conditional advisor whose pointcut matches everything.
    pub fn always(advice: Advice) -> Self {
        Self::conditional(Pointcut::always(), advice)
    }

    pub fn introduction<I, S>(class_filter: Arc<dyn ClassFilter>, advice: Advice, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Advisor::Introduction(IntroductionAdvisor {
            class_filter,
            advice,
            interfaces: interfaces.into_iter().map(Into::into).collect(),
        })
    }

    /// The advice carried by this advisor.
    pub fn advice(&self) -> &Advice {
        match self {
            Advisor::Conditional(a) => &a.advice,
            Advisor::Introduction(a) => &a.advice,
            Advisor::Unfiltered(advice) => advice,
        }
    }

    pub fn is_introduction(&self) -> bool {
        matches!(self, Advisor::Introduction(_))
    }
}
