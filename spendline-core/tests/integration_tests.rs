//! Integration tests for spendline-core services
//!
//! Every scenario runs against each repository backend: the JSON store and
//! DuckDB on a temp directory, plus the in-memory test double.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use tempfile::TempDir;

use spendline_core::adapters::duckdb::DB_FILENAME;
use spendline_core::adapters::{DuckDbRepository, InMemoryRepository, LocalStoreRepository};
use spendline_core::config::Config;
use spendline_core::domain::month::days_in_month;
use spendline_core::domain::Argon2Params;
use spendline_core::ports::Repository;
use spendline_core::{Category, Error, NewExpense, Session, SpendlineContext, YearMonth};

// ============================================================================
// Test Helpers
// ============================================================================

/// Repository under test
#[derive(Debug, Clone, Copy)]
enum Backend {
    Json,
    Duckdb,
    Memory,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Argon2 parameters cheap enough for tests
fn test_config() -> Config {
    Config {
        password_hashing: Argon2Params {
            memory_cost: 64,
            time_cost: 1,
            parallelism: 1,
        },
        ..Config::default()
    }
}

fn open_repo(backend: Backend, dir: &Path) -> Arc<dyn Repository> {
    match backend {
        Backend::Json => Arc::new(LocalStoreRepository::new(dir).unwrap()),
        Backend::Duckdb => {
            let repo = DuckDbRepository::new(&dir.join(DB_FILENAME)).unwrap();
            repo.ensure_schema().unwrap();
            Arc::new(repo)
        }
        Backend::Memory => Arc::new(InMemoryRepository::new()),
    }
}

fn open_context(backend: Backend, dir: &Path) -> SpendlineContext {
    SpendlineContext::with_repository(test_config(), open_repo(backend, dir))
}

const ALL_BACKENDS: [Backend; 3] = [Backend::Json, Backend::Duckdb, Backend::Memory];

const PERSISTENT_BACKENDS: [Backend; 2] = [Backend::Json, Backend::Duckdb];

fn new_expense(amount: i64, category: Category, date: NaiveDate) -> NewExpense {
    NewExpense {
        amount: Decimal::from(amount),
        category,
        date,
        description: None,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// Registration & Login
// ============================================================================

#[test]
fn test_duplicate_email_leaves_users_unchanged() {
    for backend in ALL_BACKENDS {
        let dir = TempDir::new().unwrap();
        let ctx = open_context(backend, dir.path());
        let mut session = Session::anonymous();

        ctx.auth_service
            .register(&mut session, "Asha", "asha@example.com", "secret")
            .unwrap();

        let mut second = Session::anonymous();
        let err = ctx
            .auth_service
            .register(&mut second, "Other", "asha@example.com", "different")
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateEmail), "backend {}", backend);
        assert_eq!(ctx.auth_service.user_count().unwrap(), 1, "backend {}", backend);
        assert!(!second.is_authenticated());
    }
}

#[test]
fn test_wrong_password_keeps_user_logged_out() {
    for backend in ALL_BACKENDS {
        let dir = TempDir::new().unwrap();
        let ctx = open_context(backend, dir.path());
        let mut session = Session::anonymous();

        ctx.auth_service
            .register(&mut session, "Asha", "asha@example.com", "secret")
            .unwrap();
        ctx.auth_service.logout(&mut session).unwrap();

        let err = ctx
            .auth_service
            .login(&mut session, "asha@example.com", "not-it")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials), "backend {}", backend);
        assert!(ctx.repository.load_current_user().unwrap().is_none());
    }
}

#[test]
fn test_users_keep_separate_expense_lists() {
    for backend in ALL_BACKENDS {
        let dir = TempDir::new().unwrap();
        let ctx = open_context(backend, dir.path());
        let on = today();

        let mut a = Session::anonymous();
        ctx.auth_service.register(&mut a, "A", "a@example.com", "pw").unwrap();
        ctx.expense_service
            .add(&mut a, new_expense(10, Category::Food, on))
            .unwrap();

        let mut b = Session::anonymous();
        ctx.auth_service.register(&mut b, "B", "b@example.com", "pw").unwrap();
        assert!(b.expenses().is_empty(), "backend {}", backend);

        ctx.auth_service.login(&mut a, "a@example.com", "pw").unwrap();
        assert_eq!(a.expenses().len(), 1, "backend {}", backend);
    }
}

// ============================================================================
// Expenses & Dashboard
// ============================================================================

#[test]
fn test_fresh_user_dashboard_flow() {
    for backend in ALL_BACKENDS {
        let dir = TempDir::new().unwrap();
        let ctx = open_context(backend, dir.path());
        let mut session = Session::anonymous();
        let on = today();
        let current = YearMonth::of(on);

        ctx.auth_service
            .register(&mut session, "Asha", "asha@example.com", "secret")
            .unwrap();

        ctx.expense_service
            .add(&mut session, new_expense(10, Category::Food, on))
            .unwrap();
        ctx.expense_service
            .add(&mut session, new_expense(20, Category::Transport, on))
            .unwrap();
        ctx.expense_service
            .add(&mut session, new_expense(70, Category::Food, on))
            .unwrap();

        let dashboard = ctx
            .dashboard_service
            .build(&session, Some(current), on)
            .unwrap();

        assert_eq!(dashboard.summary.total, Decimal::from(100), "backend {}", backend);
        assert_eq!(dashboard.summary.this_month_total, Decimal::from(100));
        assert_eq!(dashboard.summary.transaction_count, 3);
        assert_eq!(
            dashboard.summary.average_daily,
            Decimal::from(100) / Decimal::from(days_in_month(on.year(), on.month()))
        );

        let segments: Vec<_> = dashboard
            .categories
            .segments
            .iter()
            .map(|s| (s.category, s.total))
            .collect();
        assert_eq!(
            segments,
            vec![
                (Category::Food, Decimal::from(80)),
                (Category::Transport, Decimal::from(20)),
            ]
        );

        let last = dashboard.trend.points.last().unwrap();
        assert_eq!(last.month, current);
        assert_eq!(last.total, Decimal::from(100));
        assert_eq!(dashboard.expenses.items.len(), 3);
    }
}

#[test]
fn test_delete_keeps_order_of_the_rest() {
    for backend in ALL_BACKENDS {
        let dir = TempDir::new().unwrap();
        let ctx = open_context(backend, dir.path());
        let mut session = Session::anonymous();
        let on = today();

        ctx.auth_service
            .register(&mut session, "Asha", "asha@example.com", "secret")
            .unwrap();
        let user_id = session.require_user().unwrap().id;

        let a = ctx
            .expense_service
            .add(&mut session, new_expense(1, Category::Food, on))
            .unwrap();
        let b = ctx
            .expense_service
            .add(&mut session, new_expense(2, Category::Shopping, on))
            .unwrap();
        let c = ctx
            .expense_service
            .add(&mut session, new_expense(3, Category::Other, on))
            .unwrap();

        assert!(ctx.expense_service.delete(&mut session, b.id).unwrap());

        let stored = ctx.repository.load_expenses(user_id).unwrap();
        assert_eq!(stored, vec![a.clone(), c.clone()], "backend {}", backend);
        assert_eq!(session.expenses(), &[a, c]);
    }
}

#[test]
fn test_month_filter_and_all_time() {
    for backend in ALL_BACKENDS {
        let dir = TempDir::new().unwrap();
        let ctx = open_context(backend, dir.path());
        let mut session = Session::anonymous();
        let on = today();
        let current = YearMonth::of(on);
        let previous = current.pred();

        ctx.auth_service
            .register(&mut session, "Asha", "asha@example.com", "secret")
            .unwrap();
        ctx.expense_service
            .add(&mut session, new_expense(40, Category::Food, on))
            .unwrap();
        ctx.expense_service
            .add(&mut session, new_expense(60, Category::Utilities, previous.first_day()))
            .unwrap();

        let this_month = ctx.dashboard_service.expense_list(&session, Some(current)).unwrap();
        assert_eq!(this_month.items.len(), 1, "backend {}", backend);

        let all = ctx.dashboard_service.summary(&session, None, on).unwrap();
        assert_eq!(all.total, Decimal::from(100));
        assert_eq!(all.this_month_total, Decimal::from(40));

        let empty = ctx
            .dashboard_service
            .expense_list(&session, YearMonth::new(1999, 1))
            .unwrap();
        assert!(empty.is_empty());
    }
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_session_survives_reopen() {
    for backend in PERSISTENT_BACKENDS {
        let dir = TempDir::new().unwrap();
        let on = today();
        let expense_id;

        {
            let ctx = open_context(backend, dir.path());
            let mut session = Session::anonymous();
            ctx.auth_service
                .register(&mut session, "Asha", "asha@example.com", "secret")
                .unwrap();
            expense_id = ctx
                .expense_service
                .add(&mut session, new_expense(15, Category::Healthcare, on))
                .unwrap()
                .id;
        }

        let ctx = open_context(backend, dir.path());
        let session = ctx.session().unwrap();

        assert_eq!(
            session.user().map(|u| u.email.as_str()),
            Some("asha@example.com"),
            "backend {}",
            backend
        );
        assert_eq!(session.expenses().len(), 1);
        assert_eq!(session.expenses()[0].id, expense_id);
        assert_eq!(session.expenses()[0].description, "No description");
    }
}

#[test]
fn test_logout_persists_across_reopen() {
    for backend in PERSISTENT_BACKENDS {
        let dir = TempDir::new().unwrap();

        {
            let ctx = open_context(backend, dir.path());
            let mut session = Session::anonymous();
            ctx.auth_service
                .register(&mut session, "Asha", "asha@example.com", "secret")
                .unwrap();
            ctx.auth_service.logout(&mut session).unwrap();
        }

        let ctx = open_context(backend, dir.path());
        let session = ctx.session().unwrap();
        assert!(!session.is_authenticated(), "backend {}", backend);
        assert_eq!(ctx.auth_service.user_count().unwrap(), 1);
    }
}

#[test]
fn test_context_new_uses_configured_backend() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{"app": {"storage": "duckdb"},
            "passwordHashing": {"memoryCost": 64, "timeCost": 1, "parallelism": 1}}"#,
    )
    .unwrap();

    let ctx = SpendlineContext::new(dir.path()).unwrap();
    assert_eq!(ctx.repository.backend(), "duckdb");
    assert!(dir.path().join(DB_FILENAME).exists());
}

#[test]
fn test_context_new_refuses_non_persistent_storage() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{"app": {"storage": "memory"}}"#,
    )
    .unwrap();

    assert!(SpendlineContext::new(dir.path()).is_err());
}

#[test]
fn test_json_store_uses_expected_keys() {
    let dir = TempDir::new().unwrap();
    let repo = LocalStoreRepository::new(dir.path()).unwrap();
    let ctx = SpendlineContext::with_repository(test_config(), Arc::new(repo));
    let mut session = Session::anonymous();

    let user = ctx
        .auth_service
        .register(&mut session, "Asha", "asha@example.com", "secret")
        .unwrap();

    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("store.json")).unwrap(),
    )
    .unwrap();

    assert!(raw["users"].is_array());
    assert_eq!(raw["currentUser"]["email"], "asha@example.com");
    assert!(raw[format!("expenses_{}", user.id)].is_array());
    assert!(!raw.to_string().contains("\"secret\""));
}
