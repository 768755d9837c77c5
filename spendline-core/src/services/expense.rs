//! Expense service - add and delete expenses for the session user
//!
//! Writes are write-through: the store is updated first and the session
//! only changes once that succeeded, so the in-memory list never runs
//! ahead of what is persisted.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Category, Expense, MAX_AMOUNT};
use crate::ports::Repository;

use super::Session;

/// Input for a new expense
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

/// Expense service for the logged-in user's list
pub struct ExpenseService {
    repository: Arc<dyn Repository>,
}

impl ExpenseService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Append an expense to the session user's list
    pub fn add(&self, session: &mut Session, new: NewExpense) -> Result<Expense> {
        let user_id = session.require_user()?.id;

        if new.amount <= Decimal::ZERO {
            return Err(Error::validation("Amount must be greater than zero"));
        }
        if new.amount > MAX_AMOUNT {
            return Err(Error::validation(format!(
                "Amount must not exceed {}",
                MAX_AMOUNT
            )));
        }

        let expense = Expense::new(new.amount, new.category, new.date, new.description.as_deref());

        // the stored list may hold expenses added elsewhere since the session loaded
        let expenses = self.repository.append_expense(user_id, &expense)?;
        session.replace_expenses(expenses);

        Ok(expense)
    }

    /// Delete an expense by id
    ///
    /// Returns whether anything was removed. The remaining expenses keep
    /// their order; an unknown id changes nothing.
    pub fn delete(&self, session: &mut Session, expense_id: Uuid) -> Result<bool> {
        let user_id = session.require_user()?.id;
        if !session.expenses().iter().any(|e| e.id == expense_id) {
            return Ok(false);
        }

        let remaining = self.repository.delete_expense(user_id, expense_id)?;
        session.replace_expenses(remaining);
        Ok(true)
    }

    /// Resolve a full id or a unique id prefix (as shown in list output)
    pub fn resolve_id(&self, session: &Session, id_or_prefix: &str) -> Result<Option<Uuid>> {
        session.require_user()?;
        let wanted = id_or_prefix.trim().to_lowercase();
        if wanted.is_empty() {
            return Err(Error::validation("Expense id is required"));
        }

        if let Ok(id) = Uuid::parse_str(&wanted) {
            return Ok(session.expenses().iter().find(|e| e.id == id).map(|e| e.id));
        }

        let matches: Vec<Uuid> = session
            .expenses()
            .iter()
            .filter(|e| e.id.to_string().starts_with(&wanted))
            .map(|e| e.id)
            .collect();

        match matches.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            _ => Err(Error::validation(format!(
                "Id prefix '{}' matches {} expenses; use more characters",
                wanted,
                matches.len()
            ))),
        }
    }
}
