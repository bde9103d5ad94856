mod board;
mod budgeting;
mod habits;
mod overview;
mod portfolio;
mod profiles;

pub use board::BoardServiceImpl;
pub use budgeting::BudgetingServiceImpl;
pub use habits::HabitServiceImpl;
pub use overview::OverviewServiceImpl;
pub use portfolio::PortfolioServiceImpl;
pub use profiles::ProfileServiceImpl;
