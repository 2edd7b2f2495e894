//! Chain resolution step definitions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cucumber::{given, then, when, World};
use weft::advice::AdapterRegistry;
use weft::pointcut::{args_fn, AssignableTo, Pointcut};
use weft::test_utils::{echo_invoker, recording, CallLog};
use weft::{
    Advice, Advisor, AdvisorError, ChainResolver, ClassRef, InterceptorChain, Method,
    MethodInvocation, Value,
};

use super::list;

/// Test context for chain resolution scenarios.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct ChainResolutionWorld {
    registry: Arc<AdapterRegistry>,
    advisors: Vec<Advisor>,
    log: CallLog,
    evaluations: Arc<AtomicUsize>,
    target_class: Option<ClassRef>,
    pre_filtered: bool,
    method: Option<Method>,
    chain: Option<InterceptorChain>,
    previous: Option<InterceptorChain>,
    error: Option<AdvisorError>,
}

impl ChainResolutionWorld {
    fn new() -> Self {
        Self {
            registry: Arc::new(AdapterRegistry::default()),
            advisors: Vec::new(),
            log: CallLog::new(),
            evaluations: Arc::new(AtomicUsize::new(0)),
            target_class: None,
            pre_filtered: false,
            method: None,
            chain: None,
            previous: None,
            error: None,
        }
    }

    fn resolve(&mut self) {
        let method = self.method.as_ref().expect("No method selected");
        match ChainResolver::new(&self.registry).resolve(
            &self.advisors,
            method,
            self.target_class.as_ref(),
            self.pre_filtered,
        ) {
            Ok(chain) => {
                self.previous = self.chain.replace(chain);
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
    }

    fn chain(&self) -> &InterceptorChain {
        self.chain.as_ref().expect("Chain not resolved")
    }

    fn call(&self, arguments: Vec<Value>) {
        let method = self.method.clone().expect("No method selected");
        MethodInvocation::new(
            Value::unit(),
            method,
            self.target_class.clone(),
            arguments,
            self.chain().clone(),
            echo_invoker(&self.log),
        )
        .proceed()
        .expect("Call failed");
    }
}

// --- Given steps ---

#[given(expr = "an advisor {string} that applies to every method")]
async fn given_always_advisor(world: &mut ChainResolutionWorld, name: String) {
    world
        .advisors
        .push(Advisor::always(recording(&name, &world.log)));
}

#[given(expr = "an advisor {string} that applies to methods named {string}")]
async fn given_named_advisor(world: &mut ChainResolutionWorld, name: String, pattern: String) {
    world.advisors.push(Advisor::conditional(
        Pointcut::named([pattern]),
        recording(&name, &world.log),
    ));
}

#[given(expr = "an advisor {string} that applies only to classes assignable to {string}")]
async fn given_class_filtered_advisor(
    world: &mut ChainResolutionWorld,
    name: String,
    class: String,
) {
    world.advisors.push(Advisor::conditional(
        Pointcut::always().with_class_filter(Arc::new(AssignableTo::new(class))),
        recording(&name, &world.log),
    ));
}

#[given(expr = "an introduction advisor {string} for classes assignable to {string}")]
async fn given_introduction_advisor(
    world: &mut ChainResolutionWorld,
    name: String,
    class: String,
) {
    world.advisors.push(Advisor::introduction(
        Arc::new(AssignableTo::new(class)),
        recording(&name, &world.log),
        [name.clone()],
    ));
}

#[given(expr = "a dynamic advisor {string} that applies when the first argument is positive")]
async fn given_dynamic_advisor(world: &mut ChainResolutionWorld, name: String) {
    let evaluations = world.evaluations.clone();
    let positive = args_fn(move |_, args| {
        evaluations.fetch_add(1, Ordering::SeqCst);
        args.first()
            .and_then(|a| a.downcast_ref::<i64>())
            .is_some_and(|n| *n > 0)
    });
    world.advisors.push(Advisor::conditional(
        Pointcut::dynamic(positive),
        recording(&name, &world.log),
    ));
}

#[given("an advisor with unsupported advice")]
async fn given_unsupported_advice(world: &mut ChainResolutionWorld) {
    world
        .advisors
        .push(Advisor::always(Advice::extension("opaque")));
}

#[given(expr = "the target class is {string} implementing {string}")]
async fn given_target_class(world: &mut ChainResolutionWorld, class: String, supertype: String) {
    world.target_class = Some(ClassRef::new(class).implementing([supertype]));
}

#[given("the advisors are pre-filtered")]
async fn given_pre_filtered(world: &mut ChainResolutionWorld) {
    world.pre_filtered = true;
}

// --- When steps ---

#[when(expr = "the chain is resolved for method {string} on class {string}")]
async fn when_resolved(world: &mut ChainResolutionWorld, method: String, class: String) {
    world.method = Some(Method::new(ClassRef::new(class), method));
    world.resolve();
}

#[when("the chain is resolved again")]
async fn when_resolved_again(world: &mut ChainResolutionWorld) {
    world.resolve();
}

#[when(expr = "the call is made with argument {int}")]
async fn when_call_with_argument(world: &mut ChainResolutionWorld, argument: i64) {
    world.log.clear();
    world.call(vec![Value::new(argument)]);
}

// --- Then steps ---

#[then(expr = "the chain has {int} interceptor(s)")]
async fn then_chain_len(world: &mut ChainResolutionWorld, expected: usize) {
    assert_eq!(world.chain().len(), expected);
}

#[then(expr = "{int} of them is/are dynamic")]
async fn then_dynamic_count(world: &mut ChainResolutionWorld, expected: usize) {
    assert_eq!(world.chain().iter().filter(|e| e.is_dynamic()).count(), expected);
}

#[then("no argument matcher has been evaluated")]
async fn then_no_evaluations(world: &mut ChainResolutionWorld) {
    assert_eq!(world.evaluations.load(Ordering::SeqCst), 0);
}

#[then(expr = "calling through the chain records {string}")]
async fn then_calling_records(world: &mut ChainResolutionWorld, expected: String) {
    world.log.clear();
    world.call(Vec::new());
    assert_eq!(world.log.entries(), list(&expected));
}

#[then(expr = "the call log is {string}")]
async fn then_call_log(world: &mut ChainResolutionWorld, expected: String) {
    assert_eq!(world.log.entries(), list(&expected));
}

#[then("resolution fails with an unknown advice type error")]
async fn then_unknown_advice(world: &mut ChainResolutionWorld) {
    assert!(matches!(
        world.error,
        Some(AdvisorError::UnknownAdviceType(_))
    ));
    assert!(world.chain.is_none());
}

#[then("both chains contain the same interceptors")]
async fn then_same_interceptors(world: &mut ChainResolutionWorld) {
    let previous = world.previous.as_ref().expect("Only one resolution ran");
    let current = world.chain();
    assert_eq!(previous.len(), current.len());
    for (a, b) in previous.iter().zip(current.iter()) {
        assert!(Arc::ptr_eq(a.interceptor(), b.interceptor()));
    }
}
