//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod aggregate;
mod auth;
pub mod dashboard;
mod expense;
pub mod logging;
pub mod migration;
mod session;

pub use auth::AuthService;
pub use dashboard::{
    CategoryChart, CategorySegment, Dashboard, DashboardService, ExpenseList, Summary, TrendChart,
    TrendPoint,
};
pub use expense::{ExpenseService, NewExpense};
pub use logging::{LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use session::Session;
