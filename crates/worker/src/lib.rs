//! Worker runtime primitives.
//!
//! Blocking work is routed through [`spawn_blocking`] so it lands on the
//! ambient tokio runtime when one exists, or on a small lazily built global
//! runtime otherwise (headless drivers, plain `#[test]`s).

mod panic;
mod spawn;

pub use panic::panic_message;
pub use spawn::spawn_blocking;
