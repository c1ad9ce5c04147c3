//! Integration Tests
//!
//! End-to-end tests of the client against mocked QIWI endpoints.
//!
//! Run all tests:
//! ```bash
//! cargo test -p qiwi-payments --test integration
//! ```
//!
//! Run one flow:
//! ```bash
//! cargo test -p qiwi-payments --test integration invoice_flow
//! ```
//!
//! Test categories:
//! - `executor_flow`: status / payload classification over real HTTP
//! - `balance_flow`: funding sources, alias lookup, identity resolution
//! - `invoice_flow`: bill create / status / reject
//! - `transfer_flow`: payment validation and submission
//! - `concurrency_flow`: per-call credentials under concurrent calls


mod executor_flow;
mod transfer_flow;
