//! Spendline Core - Business logic for personal expense tracking
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, Expense, Category, YearMonth)
//! - **ports**: Trait definitions for external dependencies (Repository)
//! - **services**: Business logic orchestration (auth, expenses, dashboard)
//! - **adapters**: Concrete implementations (JSON store, DuckDB, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::duckdb::DB_FILENAME;
use adapters::{DuckDbRepository, LocalStoreRepository};
use config::{Config, StorageBackend};
use domain::result::Result;
use ports::Repository;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{Category, Expense, User, YearMonth};
pub use services::{LogEvent, LoggingService, NewExpense, Session};

/// Main context for Spendline operations
///
/// Holds the configuration, the repository picked by `app.storage` and
/// the services built on it. The session itself is not part of the
/// context; callers restore one with `auth_service.restore()` and pass
/// it along.
pub struct SpendlineContext {
    pub config: Config,
    pub repository: Arc<dyn Repository>,
    pub auth_service: AuthService,
    pub expense_service: ExpenseService,
    pub dashboard_service: DashboardService,
}

impl SpendlineContext {
    /// Create a new Spendline context rooted at `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let config = Config::load(data_dir)?;

        let repository: Arc<dyn Repository> = match config.storage {
            StorageBackend::Json => Arc::new(LocalStoreRepository::new(data_dir)?),
            StorageBackend::Duckdb => {
                let repo = DuckDbRepository::new(&data_dir.join(DB_FILENAME))?;
                repo.ensure_schema()?;
                Arc::new(repo)
            }
        };

        Ok(Self::with_repository(config, repository))
    }

    /// Build a context around an existing repository
    pub fn with_repository(config: Config, repository: Arc<dyn Repository>) -> Self {
        let auth_service = AuthService::new(Arc::clone(&repository), config.password_hashing.clone());
        let expense_service = ExpenseService::new(Arc::clone(&repository));
        let dashboard_service = DashboardService::new(config.trend_months);

        Self {
            config,
            repository,
            auth_service,
            expense_service,
            dashboard_service,
        }
    }

    /// Restore the session recorded in the store
    pub fn session(&self) -> Result<Session> {
        self.auth_service.restore()
    }
}
