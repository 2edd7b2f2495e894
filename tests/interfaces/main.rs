//! Interface tests for chain resolution and invocation using Cucumber.
//!
//! The feature files describe, in plain language, which interceptors a
//! call receives and in what order they run.
//!
//! ```bash
//! cargo test --test interfaces --features test-utils
//! ```

mod steps;

use cucumber::World;
use steps::chain_resolution::ChainResolutionWorld;
use steps::proceed::ProceedWorld;

#[tokio::main]
async fn main() {
    println!("\n=== Running Chain Resolution Interface Tests ===\n");
    ChainResolutionWorld::cucumber()
        .fail_on_skipped()
        .run("tests/interfaces/features/chain_resolution.feature")
        .await;

    println!("\n=== Running Proceed Interface Tests ===\n");
    ProceedWorld::cucumber()
        .fail_on_skipped()
        .run("tests/interfaces/features/proceed.feature")
        .await;
}
