// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod clock;
pub mod command;
pub mod distance;
pub mod history;
pub mod interval_clock;
pub mod journey;
pub mod persist;
pub mod reconcile;
pub mod runtime;
pub mod session;
