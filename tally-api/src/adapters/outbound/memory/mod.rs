//! In-memory implementations of the outbound ports for tests.

mod board;
mod finance;
mod habits;
mod users;

pub use board::*;
pub use finance::*;
pub use habits::*;
pub use users::*;
