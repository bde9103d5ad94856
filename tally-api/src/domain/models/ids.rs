use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares an `i32` newtype identifier matching a database SERIAL column.
macro_rules! serial_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

serial_id!(
    /// The authenticated user, as asserted by the identity gateway.
    UserId
);
serial_id!(CategoryId);
serial_id!(BudgetId);
serial_id!(ExpenseId);
serial_id!(EmiId);
serial_id!(InvestmentId);
serial_id!(ProjectId);
serial_id!(
    /// A kanban column, unique across all projects.
    ColumnId
);
serial_id!(TaskId);
serial_id!(HabitId);
