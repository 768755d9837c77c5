//! Session state
//!
//! The authenticated user and the in-memory mirror of their expenses.
//! A `Session` is owned by the caller and passed by `&mut` into the
//! services that change it; nothing in the core holds one globally.

use crate::domain::result::{Error, Result};
use crate::domain::{Expense, User};

#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
    expenses: Vec<Expense>,
}

impl Session {
    /// A session with nobody logged in
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub(crate) fn start(user: User, expenses: Vec<Expense>) -> Self {
        Self {
            user: Some(user),
            expenses,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The logged-in user, or `NotAuthenticated`
    pub fn require_user(&self) -> Result<&User> {
        self.user.as_ref().ok_or(Error::NotAuthenticated)
    }

    /// The user's expenses in insertion order
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Only called after the same list has been persisted
    pub(crate) fn replace_expenses(&mut self, expenses: Vec<Expense>) {
        self.expenses = expenses;
    }

    pub(crate) fn clear(&mut self) {
        self.user = None;
        self.expenses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_session() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(session.expenses().is_empty());
        assert!(matches!(session.require_user(), Err(Error::NotAuthenticated)));
    }

    #[test]
    fn test_clear_drops_user_and_expenses() {
        let user = User::new("A", "a@example.com", "hash");
        let mut session = Session::start(user.clone(), Vec::new());
        assert_eq!(session.require_user().unwrap(), &user);

        session.clear();
        assert!(session.user().is_none());
        assert!(session.expenses().is_empty());
    }
}
