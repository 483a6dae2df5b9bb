//! Test utilities for unit and HTTP-level testing.
//!
//! This module provides:
//! - Test data factories for plan records
//! - In-memory repository implementations for mocking persistence
//! - Recording sinks for plan events
//! - A minimal `AppState` for route tests

mod app_state_builder;
mod factories;
mod plan_mocks;
mod sink_mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use plan_mocks::*;
pub use sink_mocks::*;
