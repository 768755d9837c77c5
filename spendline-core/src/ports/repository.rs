//! Repository port - storage abstraction

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{Expense, User};

/// Persistent store for users, the active session and expense lists
///
/// The capability set mirrors a flat key-value layout: whole lists are
/// read and written at once, so an adapter never has to understand the
/// expense model beyond serializing it. Implementations must persist
/// synchronously; a successful return means the data is durable.
pub trait Repository: Send + Sync {
    /// Short backend name for status output
    fn backend(&self) -> &'static str;

    // === Users ===

    /// All registered users, in registration order
    fn load_users(&self) -> Result<Vec<User>>;

    /// Replace the user table
    fn save_users(&self, users: &[User]) -> Result<()>;

    // === Session ===

    /// The user recorded as logged in, if any
    fn load_current_user(&self) -> Result<Option<User>>;

    fn save_current_user(&self, user: &User) -> Result<()>;

    fn clear_current_user(&self) -> Result<()>;

    // === Expenses ===

    /// A user's expenses in insertion order (empty if none stored)
    fn load_expenses(&self, user_id: Uuid) -> Result<Vec<Expense>>;

    /// Replace a user's expense list
    fn save_expenses(&self, user_id: Uuid, expenses: &[Expense]) -> Result<()>;

    /// Append one expense to the end of a user's stored list
    ///
    /// Returns the full stored list, which may include expenses written by
    /// another process since the caller last loaded it. Adapters shared
    /// between processes override this to make it atomic.
    fn append_expense(&self, user_id: Uuid, expense: &Expense) -> Result<Vec<Expense>> {
        let mut expenses = self.load_expenses(user_id)?;
        expenses.push(expense.clone());
        self.save_expenses(user_id, &expenses)?;
        Ok(expenses)
    }

    /// Delete one expense by id, keeping the order of the rest
    ///
    /// Returns the remaining list. An unknown id is a no-op.
    fn delete_expense(&self, user_id: Uuid, expense_id: Uuid) -> Result<Vec<Expense>> {
        let mut expenses = self.load_expenses(user_id)?;
        let before = expenses.len();
        expenses.retain(|e| e.id != expense_id);
        if expenses.len() != before {
            self.save_expenses(user_id, &expenses)?;
        }
        Ok(expenses)
    }
}
