pub mod anniversary;
pub mod message;
pub mod time;

#[cfg(test)]
#[path = "anniversary_tests.rs"]
mod anniversary_tests;

pub use anniversary::*;
pub use message::*;
pub use time::*;
