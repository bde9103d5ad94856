mod budget;
mod category;
mod email;
mod emi;
mod expense;
mod habit;
mod ids;
mod investment;
mod notification;
mod overview;
mod project;
mod user;

pub use budget::*;
pub use category::*;
pub use email::*;
pub use emi::*;
pub use expense::*;
pub use habit::*;
pub use ids::*;
pub use investment::*;
pub use notification::*;
pub use overview::*;
pub use project::*;
pub use user::*;
