//! In-memory repository, nothing survives the process

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Expense, User};
use crate::ports::Repository;

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    current_user: Option<User>,
    expenses: HashMap<Uuid, Vec<Expense>>,
}

/// Repository backed by process memory
#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }
}

impl Repository for InMemoryRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn load_users(&self) -> Result<Vec<User>> {
        Ok(self.state()?.users.clone())
    }

    fn save_users(&self, users: &[User]) -> Result<()> {
        self.state()?.users = users.to_vec();
        Ok(())
    }

    fn load_current_user(&self) -> Result<Option<User>> {
        Ok(self.state()?.current_user.clone())
    }

    fn save_current_user(&self, user: &User) -> Result<()> {
        self.state()?.current_user = Some(user.clone());
        Ok(())
    }

    fn clear_current_user(&self) -> Result<()> {
        self.state()?.current_user = None;
        Ok(())
    }

    fn load_expenses(&self, user_id: Uuid) -> Result<Vec<Expense>> {
        Ok(self
            .state()?
            .expenses
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    fn save_expenses(&self, user_id: Uuid, expenses: &[Expense]) -> Result<()> {
        self.state()?.expenses.insert(user_id, expenses.to_vec());
        Ok(())
    }
}
