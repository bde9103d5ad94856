mod board;
mod finance;
mod habits;
mod profiles;

pub use board::*;
pub use finance::*;
pub use habits::*;
pub use profiles::*;
