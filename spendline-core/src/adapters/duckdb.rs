//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use duckdb::{params, Connection};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Category, Expense, User};
use crate::migrations::MIGRATIONS;
use crate::ports::Repository;
use crate::services::{MigrationResult, MigrationService};

pub const DB_FILENAME: &str = "spendline.duckdb";

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// Raw user columns, in SELECT order
type UserRow = (String, String, String, String, String);

/// Raw expense columns, in SELECT order
type ExpenseRow = (String, String, String, String, String, String);

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbRepository {
    /// Open the database file, retrying with exponential backoff while
    /// another process holds it
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[spendline] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// Open a throwaway in-memory database (tests, demos)
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory_with_flags(config)?),
            db_path: None,
        })
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading off: cached extensions can fail code signing on macOS
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    /// Run pending schema migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.conn()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Number of stored expenses across all users
    pub fn expense_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_expenses", [], |row| row.get(0))?;
        Ok(count)
    }

    fn query_users(conn: &Connection, sql: &str) -> Result<Vec<User>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })?
            .collect::<std::result::Result<Vec<UserRow>, _>>()?;

        rows.into_iter().map(row_to_user).collect()
    }
}

impl Repository for DuckDbRepository {
    fn backend(&self) -> &'static str {
        "duckdb"
    }

    fn load_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        Self::query_users(
            &conn,
            "SELECT user_id, name, email, password_hash, created_at
             FROM sys_users ORDER BY position",
        )
    }

    fn save_users(&self, users: &[User]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM sys_users", [])?;
        for (position, user) in users.iter().enumerate() {
            tx.execute(
                "INSERT INTO sys_users (user_id, position, name, email, password_hash, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    user.id.to_string(),
                    position as i64,
                    user.name,
                    user.email,
                    user.password_hash,
                    user.created_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn load_current_user(&self) -> Result<Option<User>> {
        let conn = self.conn()?;
        let users = Self::query_users(
            &conn,
            "SELECT user_id, name, email, password_hash, created_at FROM sys_session LIMIT 1",
        )?;
        Ok(users.into_iter().next())
    }

    fn save_current_user(&self, user: &User) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM sys_session", [])?;
        tx.execute(
            "INSERT INTO sys_session (user_id, name, email, password_hash, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.created_at.to_rfc3339(),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn clear_current_user(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM sys_session", [])?;
        Ok(())
    }

    fn load_expenses(&self, user_id: Uuid) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT expense_id, amount, category, expense_date, description, created_at
             FROM sys_expenses WHERE user_id = ? ORDER BY position",
        )?;

        let rows = stmt
            .query_map([user_id.to_string()], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<ExpenseRow>, _>>()?;

        rows.into_iter().map(row_to_expense).collect()
    }

    fn save_expenses(&self, user_id: Uuid, expenses: &[Expense]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let owner = user_id.to_string();

        tx.execute("DELETE FROM sys_expenses WHERE user_id = ?", params![owner])?;
        for (position, expense) in expenses.iter().enumerate() {
            insert_expense(&tx, &owner, position as i64, expense)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn append_expense(&self, user_id: Uuid, expense: &Expense) -> Result<Vec<Expense>> {
        {
            let mut conn = self.conn()?;
            let tx = conn.transaction()?;
            let owner = user_id.to_string();

            let next: i64 = tx.query_row(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM sys_expenses WHERE user_id = ?",
                params![owner],
                |row| row.get(0),
            )?;
            insert_expense(&tx, &owner, next, expense)?;
            tx.commit()?;
        }
        self.load_expenses(user_id)
    }

    fn delete_expense(&self, user_id: Uuid, expense_id: Uuid) -> Result<Vec<Expense>> {
        {
            let conn = self.conn()?;
            conn.execute(
                "DELETE FROM sys_expenses WHERE user_id = ? AND expense_id = ?",
                params![user_id.to_string(), expense_id.to_string()],
            )?;
        }
        // positions keep their relative order after a delete
        self.load_expenses(user_id)
    }
}

fn insert_expense(conn: &Connection, owner: &str, position: i64, expense: &Expense) -> Result<()> {
    conn.execute(
        "INSERT INTO sys_expenses
            (expense_id, user_id, position, amount, category, expense_date, description, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            expense.id.to_string(),
            owner,
            position,
            expense.amount.to_string(),
            expense.category.as_str(),
            expense.date.format("%Y-%m-%d").to_string(),
            expense.description,
            expense.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn corrupt(what: &str, value: &str) -> Error {
    Error::database(format!("Corrupt {} in store: '{}'", what, value))
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|_| corrupt("id", s))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| corrupt("timestamp", s))
}

fn row_to_user((id, name, email, password_hash, created_at): UserRow) -> Result<User> {
    Ok(User {
        id: parse_uuid(&id)?,
        name,
        email,
        password_hash,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn row_to_expense(
    (id, amount, category, date, description, created_at): ExpenseRow,
) -> Result<Expense> {
    Ok(Expense {
        id: parse_uuid(&id)?,
        amount: amount
            .parse::<Decimal>()
            .map_err(|_| corrupt("amount", &amount))?,
        category: category
            .parse::<Category>()
            .map_err(|_| corrupt("category", &category))?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| corrupt("date", &date))?,
        description,
        created_at: parse_timestamp(&created_at)?,
    })
}
