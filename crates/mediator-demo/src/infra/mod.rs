pub mod decorators;
pub mod logging;
pub mod options;
pub mod registry;

pub use logging::LogGuard;
