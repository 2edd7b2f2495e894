//! Proceed semantics step definitions.

use std::sync::Arc;

use cucumber::{given, then, when, World};
use weft::error::BoxError;
use weft::invocation::binding_depth;
use weft::test_utils::{CallLog, TestError};
use weft::{
    current_join_point, Advice, Advised, ClassRef, InvocationError, Method, ProxyConfig,
    TargetInvoker, Value,
};

use super::list;

#[derive(Debug, Clone)]
enum Outcome {
    Returns(String),
    Fails(String),
}

/// Test context for proceed scenarios.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct ProceedWorld {
    config: ProxyConfig,
    advice: Vec<Advice>,
    log: CallLog,
    outcome: Outcome,
    result: Option<Result<Value, InvocationError>>,
}

impl ProceedWorld {
    fn new() -> Self {
        Self {
            config: ProxyConfig::default(),
            advice: Vec::new(),
            log: CallLog::new(),
            outcome: Outcome::Returns(String::new()),
            result: None,
        }
    }

    fn invoker(&self) -> Arc<dyn TargetInvoker> {
        let log = self.log.clone();
        let outcome = self.outcome.clone();
        Arc::new(
            move |_: &Value, _: &Method, _: &[Value]| -> Result<Value, BoxError> {
                log.record("target");
                match &outcome {
                    Outcome::Returns(v) => Ok(Value::new(v.clone())),
                    Outcome::Fails(m) => Err(TestError::new(m.clone()).into()),
                }
            },
        )
    }

    fn error(&self) -> &InvocationError {
        match &self.result {
            Some(Err(e)) => e,
            other => panic!("Expected a failed call, got {:?}", other),
        }
    }
}

// --- Given steps ---

#[given("a proxy with no advisors")]
async fn given_no_advisors(world: &mut ProceedWorld) {
    world.advice.clear();
}

#[given("a proxy exposing the invocation")]
async fn given_exposing_proxy(world: &mut ProceedWorld) {
    world.config.expose_invocation = true;
}

#[given(expr = "around advice {string} that proceeds")]
async fn given_around_proceeds(world: &mut ProceedWorld, name: String) {
    let log = world.log.clone();
    world.advice.push(Advice::around(move |inv| {
        log.record(name.clone());
        let result = inv.proceed();
        log.record(format!("{name} done"));
        result
    }));
}

#[given(expr = "around advice {string} that returns {string} without proceeding")]
async fn given_around_short_circuits(world: &mut ProceedWorld, name: String, value: String) {
    let log = world.log.clone();
    world.advice.push(Advice::around(move |_| {
        log.record(name.clone());
        Ok(Value::new(value.clone()))
    }));
}

#[given(expr = "around advice {string} that fails with {string}")]
async fn given_around_fails(world: &mut ProceedWorld, name: String, message: String) {
    let log = world.log.clone();
    world.advice.push(Advice::around(move |_| {
        log.record(name.clone());
        Err(InvocationError::advice(TestError::new(message.clone())))
    }));
}

#[given(expr = "around advice {string} that reads the current join point")]
async fn given_around_reads_join_point(world: &mut ProceedWorld, name: String) {
    let log = world.log.clone();
    world.advice.push(Advice::around(move |inv| {
        let join_point = current_join_point()?;
        log.record(format!("{name} {}", join_point.method.name()));
        inv.proceed()
    }));
}

#[given(expr = "before advice {string}")]
async fn given_before(world: &mut ProceedWorld, name: String) {
    let log = world.log.clone();
    world.advice.push(Advice::before(move |_, _, _| {
        log.record(name.clone());
        Ok(())
    }));
}

#[given(expr = "after-returning advice {string}")]
async fn given_after_returning(world: &mut ProceedWorld, name: String) {
    let log = world.log.clone();
    world
        .advice
        .push(Advice::after_returning(move |returned, _, _, _| {
            let returned = returned.downcast_ref::<String>().cloned().unwrap_or_default();
            log.record(format!("{name} {returned}"));
            Ok(())
        }));
}

#[given(expr = "throws advice {string} that observes failures")]
async fn given_throws_observes(world: &mut ProceedWorld, name: String) {
    let log = world.log.clone();
    world
        .advice
        .push(Advice::on_error::<TestError, _>(move |_, e| {
            log.record(format!("{name} {}", e.message));
            Ok(())
        }));
}

#[given(expr = "throws advice {string} that replaces failures with {string}")]
async fn given_throws_translates(world: &mut ProceedWorld, name: String, message: String) {
    let log = world.log.clone();
    world
        .advice
        .push(Advice::on_error::<TestError, _>(move |_, _| {
            log.record(name.clone());
            Err(InvocationError::advice(TestError::new(message.clone())))
        }));
}

#[given(expr = "the target returns {string}")]
async fn given_target_returns(world: &mut ProceedWorld, value: String) {
    world.outcome = Outcome::Returns(value);
}

#[given(expr = "the target fails with {string}")]
async fn given_target_fails(world: &mut ProceedWorld, message: String) {
    world.outcome = Outcome::Fails(message);
}

// --- When steps ---

#[when(expr = "the method {string} is invoked")]
async fn when_invoked(world: &mut ProceedWorld, method: String) {
    let mut advised = Advised::new(world.config);
    for advice in world.advice.iter().cloned() {
        advised.add_advice(advice).expect("Failed to add advice");
    }
    let method = Method::new(ClassRef::new("OrderService"), method);

    world.result = Some(advised.invoke(
        Value::unit(),
        &method,
        None,
        Vec::new(),
        world.invoker(),
    ));
}

// --- Then steps ---

#[then(expr = "the result is {string}")]
async fn then_result(world: &mut ProceedWorld, expected: String) {
    match &world.result {
        Some(Ok(value)) => assert_eq!(value.downcast_ref::<String>(), Some(&expected)),
        other => panic!("Expected a successful call, got {:?}", other),
    }
}

#[then(expr = "the call log is {string}")]
async fn then_call_log(world: &mut ProceedWorld, expected: String) {
    assert_eq!(world.log.entries(), list(&expected));
}

#[then(expr = "the call fails with a target error {string}")]
async fn then_target_error(world: &mut ProceedWorld, message: String) {
    let err = world.error();
    assert!(err.is_target(), "not a target failure: {err}");
    assert_eq!(err.downcast_ref::<TestError>(), Some(&TestError::new(message)));
}

#[then(expr = "the call fails with an advice error {string}")]
async fn then_advice_error(world: &mut ProceedWorld, message: String) {
    let err = world.error();
    assert!(err.is_advice(), "not an advice failure: {err}");
    assert_eq!(err.downcast_ref::<TestError>(), Some(&TestError::new(message)));
}

#[then("the call fails because no join point is bound")]
async fn then_no_join_point(world: &mut ProceedWorld) {
    assert!(matches!(world.error(), InvocationError::NoJoinPoint));
}

#[then("no join point remains bound")]
async fn then_nothing_bound(_world: &mut ProceedWorld) {
    assert_eq!(binding_depth(), 0);
}
