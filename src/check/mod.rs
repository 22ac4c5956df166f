//! Alert state check
//!
//! A check opens a window at prepare time and is then polled once per
//! status tick. Each tick fetches the alert's fired events and judges them
//! against the expected state under one of two policies:
//!
//! - **atLeastOnce**: a single matching tick latches success for the rest of
//!   the window; a violation is only reported once the window has elapsed.
//! - **allTheTime**: every tick is judged on its own and a mismatch is
//!   reported immediately.

pub mod config;
pub mod describe;
pub mod evaluator;
pub mod result;
pub mod window;

pub use config::{CheckConfig, ExpectedState, StateCheckMode};
pub use describe::{action_description, ActionDescription, ACTION_ID};
pub use evaluator::{AlertCheck, CheckError, PrepareRequest, TargetRef};
pub use result::{CheckViolation, Metric, StatusResult, ViolationStatus};
pub use window::CheckWindow;
