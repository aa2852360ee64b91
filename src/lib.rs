// Library surface shared by the binary and the integration tests.
pub mod adaptive;
pub mod app_dirs;
pub mod config;
pub mod drill;
pub mod error;
pub mod evaluator;
pub mod input;
pub mod problem;
pub mod runtime;
pub mod session;
pub mod telemetry;
pub mod ui;
pub mod util;

pub use drill::{Drill, DrillState};
pub use error::{DrillError, Result};
