//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

pub mod credentials;
mod expense;
pub mod month;
pub mod result;
mod user;

pub use credentials::Argon2Params;
pub use expense::{Category, Expense, DEFAULT_DESCRIPTION, MAX_AMOUNT};
pub use month::YearMonth;
pub use user::{expenses_key, User};
