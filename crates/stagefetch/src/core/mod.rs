//! Retry and fallback scheduling, independent of what is being fetched.

mod fallback;
mod retry;

pub use fallback::FallbackDriver;
pub use retry::attempt;
