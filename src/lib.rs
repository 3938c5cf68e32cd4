pub mod error;
pub mod git;
pub mod platform;
pub mod presets;

mod app;
pub mod commands;

// Re-export App and the error type from modules
pub use app::App;
pub use error::PlatformError;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}
