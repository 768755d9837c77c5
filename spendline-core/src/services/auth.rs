//! Auth service - registration, login and logout

use std::sync::Arc;

use crate::domain::credentials::{hash_password, verify_password};
use crate::domain::result::{Error, Result};
use crate::domain::{Argon2Params, User};
use crate::ports::Repository;

use super::Session;

/// Auth service for user accounts and the stored session
pub struct AuthService {
    repository: Arc<dyn Repository>,
    hash_params: Argon2Params,
}

impl AuthService {
    pub fn new(repository: Arc<dyn Repository>, hash_params: Argon2Params) -> Self {
        Self {
            repository,
            hash_params,
        }
    }

    /// Rebuild the session recorded in the store (startup path)
    ///
    /// A stored user that no longer exists in the user table is treated
    /// as logged out and the stale record is cleared.
    pub fn restore(&self) -> Result<Session> {
        let Some(user) = self.repository.load_current_user()? else {
            return Ok(Session::anonymous());
        };

        let users = self.repository.load_users()?;
        if !users.iter().any(|u| u.id == user.id) {
            self.repository.clear_current_user()?;
            return Ok(Session::anonymous());
        }

        let expenses = self.repository.load_expenses(user.id)?;
        Ok(Session::start(user, expenses))
    }

    /// Create a user and log them in
    ///
    /// Fails with `DuplicateEmail` if the email is taken; the user table
    /// is left untouched in that case.
    pub fn register(
        &self,
        session: &mut Session,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(Error::validation("Name is required"));
        }
        if email.is_empty() {
            return Err(Error::validation("Email is required"));
        }
        if password.is_empty() {
            return Err(Error::validation("Password is required"));
        }

        let mut users = self.repository.load_users()?;
        if users.iter().any(|u| u.email == email) {
            return Err(Error::DuplicateEmail);
        }

        let password_hash = hash_password(password, &self.hash_params)?;
        let user = User::new(name, email, password_hash);

        users.push(user.clone());
        self.repository.save_users(&users)?;
        self.repository.save_expenses(user.id, &[])?;
        self.repository.save_current_user(&user)?;

        *session = Session::start(user.clone(), Vec::new());
        Ok(user)
    }

    /// Log in with email and password
    pub fn login(&self, session: &mut Session, email: &str, password: &str) -> Result<User> {
        let email = email.trim();
        let users = self.repository.load_users()?;

        let user = users
            .into_iter()
            .find(|u| u.email == email && verify_password(password, &u.password_hash))
            .ok_or(Error::InvalidCredentials)?;

        self.repository.save_current_user(&user)?;
        let expenses = self.repository.load_expenses(user.id)?;

        *session = Session::start(user.clone(), expenses);
        Ok(user)
    }

    /// Forget the stored session and empty the in-memory one
    ///
    /// Safe to call when nobody is logged in.
    pub fn logout(&self, session: &mut Session) -> Result<()> {
        self.repository.clear_current_user()?;
        session.clear();
        Ok(())
    }

    /// Number of registered users
    pub fn user_count(&self) -> Result<usize> {
        Ok(self.repository.load_users()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRepository;

    fn service() -> (AuthService, Arc<dyn Repository>) {
        let repo: Arc<dyn Repository> = Arc::new(InMemoryRepository::new());
        let params = Argon2Params {
            memory_cost: 64,
            time_cost: 1,
            parallelism: 1,
        };
        (AuthService::new(Arc::clone(&repo), params), repo)
    }

    #[test]
    fn test_register_starts_session() {
        let (auth, repo) = service();
        let mut session = Session::anonymous();

        let user = auth
            .register(&mut session, " Asha ", " asha@example.com ", "pw")
            .unwrap();

        assert_eq!(user.name, "Asha");
        assert_eq!(user.email, "asha@example.com");
        assert_ne!(user.password_hash, "pw");
        assert_eq!(session.require_user().unwrap().id, user.id);
        assert_eq!(repo.load_current_user().unwrap(), Some(user));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (auth, repo) = service();
        let mut session = Session::anonymous();
        auth.register(&mut session, "A", "same@example.com", "one").unwrap();

        let mut other = Session::anonymous();
        let err = auth
            .register(&mut other, "B", "same@example.com", "two")
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateEmail));
        assert!(!other.is_authenticated());
        let users = repo.load_users().unwrap();
        assert_eq!(
            users.iter().filter(|u| u.email == "same@example.com").count(),
            1
        );
    }

    #[test]
    fn test_blank_fields_rejected() {
        let (auth, _) = service();
        let mut session = Session::anonymous();
        assert!(matches!(
            auth.register(&mut session, "  ", "a@example.com", "pw"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            auth.register(&mut session, "A", "a@example.com", ""),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_login_checks_password() {
        let (auth, _) = service();
        let mut session = Session::anonymous();
        auth.register(&mut session, "A", "a@example.com", "right").unwrap();
        auth.logout(&mut session).unwrap();

        let err = auth.login(&mut session, "a@example.com", "wrong").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
        assert!(!session.is_authenticated());

        let err = auth.login(&mut session, "nobody@example.com", "right").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));

        auth.login(&mut session, "a@example.com", "right").unwrap();
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let (auth, repo) = service();
        let mut session = Session::anonymous();
        auth.register(&mut session, "A", "a@example.com", "pw").unwrap();

        auth.logout(&mut session).unwrap();
        auth.logout(&mut session).unwrap();

        assert!(!session.is_authenticated());
        assert!(repo.load_current_user().unwrap().is_none());
    }

    #[test]
    fn test_restore_drops_dangling_user() {
        let (auth, repo) = service();
        let ghost = User::new("Ghost", "ghost@example.com", "hash");
        repo.save_current_user(&ghost).unwrap();

        let session = auth.restore().unwrap();
        assert!(!session.is_authenticated());
        assert!(repo.load_current_user().unwrap().is_none());
    }

    #[test]
    fn test_restore_resumes_session() {
        let (auth, _) = service();
        let mut session = Session::anonymous();
        let user = auth.register(&mut session, "A", "a@example.com", "pw").unwrap();

        let restored = auth.restore().unwrap();
        assert_eq!(restored.user().map(|u| u.id), Some(user.id));
    }
}
