//! JSON key-value store
//!
//! A single `store.json` file holding a flat object of keys to JSON
//! values, the same layout a browser's local storage would have:
//!
//! ```json
//! {
//!   "users": [ { "id": "...", "name": "...", ... } ],
//!   "currentUser": { "id": "...", ... },
//!   "expenses_<userId>": [ { "id": "...", "amount": "12.50", ... } ]
//! }
//! ```
//!
//! Every operation takes an exclusive lock on a sidecar `.lock` file and
//! writes go through a temp file that is renamed into place, so a crash
//! mid-write never leaves a truncated store.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{expenses_key, Expense, User};
use crate::ports::Repository;

pub const STORE_FILENAME: &str = "store.json";

const USERS_KEY: &str = "users";
const CURRENT_USER_KEY: &str = "currentUser";

/// Repository backed by a JSON key-value file
pub struct LocalStoreRepository {
    path: PathBuf,
    lock_path: PathBuf,
}

impl LocalStoreRepository {
    /// Open (or lazily create) the store in `dir`
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(STORE_FILENAME),
            lock_path: dir.join(format!("{}.lock", STORE_FILENAME)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` while holding the exclusive store lock
    fn locked<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        lock_file.lock_exclusive()?;

        let result = f();

        lock_file.unlock()?;
        result
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::storage(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| Error::storage("Store path has no parent directory"))?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, map)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| Error::storage(format!("Failed to replace store: {}", e)))?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.locked(|| {
            let map = self.read_map()?;
            match map.get(key) {
                Some(Value::Null) | None => Ok(None),
                Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            }
        })
    }

    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.locked(|| {
            let mut map = self.read_map()?;
            map.insert(key.to_string(), value);
            self.write_map(&map)
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.locked(|| {
            let mut map = self.read_map()?;
            if map.remove(key).is_some() {
                self.write_map(&map)?;
            }
            Ok(())
        })
    }

    /// Read, modify and write one key under a single lock
    ///
    /// `f` returns whether it changed the value; unchanged values are not
    /// written back.
    fn update<T>(&self, key: &str, f: impl FnOnce(&mut T) -> bool) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        self.locked(|| {
            let mut map = self.read_map()?;
            let mut value: T = match map.get(key) {
                Some(Value::Null) | None => T::default(),
                Some(value) => serde_json::from_value(value.clone())?,
            };

            if f(&mut value) {
                map.insert(key.to_string(), serde_json::to_value(&value)?);
                self.write_map(&map)?;
            }
            Ok(value)
        })
    }

    /// Keys currently present in the store
    pub fn keys(&self) -> Result<Vec<String>> {
        self.locked(|| Ok(self.read_map()?.keys().cloned().collect()))
    }
}

impl Repository for LocalStoreRepository {
    fn backend(&self) -> &'static str {
        "json"
    }

    fn load_users(&self) -> Result<Vec<User>> {
        Ok(self.get(USERS_KEY)?.unwrap_or_default())
    }

    fn save_users(&self, users: &[User]) -> Result<()> {
        self.set(USERS_KEY, users)
    }

    fn load_current_user(&self) -> Result<Option<User>> {
        self.get(CURRENT_USER_KEY)
    }

    fn save_current_user(&self, user: &User) -> Result<()> {
        self.set(CURRENT_USER_KEY, user)
    }

    fn clear_current_user(&self) -> Result<()> {
        self.remove(CURRENT_USER_KEY)
    }

    fn load_expenses(&self, user_id: Uuid) -> Result<Vec<Expense>> {
        Ok(self.get(&expenses_key(user_id))?.unwrap_or_default())
    }

    fn save_expenses(&self, user_id: Uuid, expenses: &[Expense]) -> Result<()> {
        self.set(&expenses_key(user_id), expenses)
    }

    fn append_expense(&self, user_id: Uuid, expense: &Expense) -> Result<Vec<Expense>> {
        self.update(&expenses_key(user_id), |expenses: &mut Vec<Expense>| {
            expenses.push(expense.clone());
            true
        })
    }

    fn delete_expense(&self, user_id: Uuid, expense_id: Uuid) -> Result<Vec<Expense>> {
        self.update(&expenses_key(user_id), |expenses: &mut Vec<Expense>| {
            let before = expenses.len();
            expenses.retain(|e| e.id != expense_id);
            expenses.len() != before
        })
    }
}
