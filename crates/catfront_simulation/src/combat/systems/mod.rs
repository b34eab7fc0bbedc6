//! Combat systems (FixedUpdate, chained)

pub mod engage;
pub mod hits;
pub mod lifecycle;
pub mod reactions;

#[cfg(test)]
mod test_app;

pub use engage::*;
pub use hits::*;
pub use lifecycle::*;
pub use reactions::*;
