mod clock;
mod finance;
mod habits;
mod health;
mod notifier;
mod projects;
mod users;

pub use clock::*;
pub use finance::*;
pub use habits::*;
pub use health::*;
pub use notifier::*;
pub use projects::*;
pub use users::*;
