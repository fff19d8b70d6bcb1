//! Tenant domain models, persistence-friendly types, and the recurring scheduler.

pub mod calendar;
pub mod movement;
pub mod obligation;
pub mod order;
pub mod party;
pub mod product;
pub mod recurring;
pub mod tenant;
pub mod window;

pub use movement::{Movement, MovementKind, MovementStatus};
pub use obligation::{Frequency, RecurringObligation, SUGGESTED_CATEGORIES};
pub use order::{Order, OrderKind, OrderLine, OrderStatus};
pub use party::{Client, Supplier};
pub use product::Product;
pub use recurring::{
    next_due_date, pending_due_dates, preview_pending, PendingDue, MAX_SCHEDULER_ITERATIONS,
};
pub use tenant::Tenant;
pub use window::DateWindow;
