use std::sync::Arc;

use crate::error::{Result, ServerError};
use crate::user::{User, UserRepository};

/// Registration parameters, already syntactically validated by the
/// transport layer.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    pub email: String,
    pub name: String,
}

/// User manager enforcing the email uniqueness rule.
///
/// Stateless per request; the canonical records live behind the
/// injected [`UserRepository`].
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a new [`UserService`] over an injected repository.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Register a new user.
    ///
    /// Uniqueness is delegated to the repository's atomic conditional
    /// insert, so exactly one registration wins per email even under
    /// concurrent attempts. Failures are terminal for the request, no
    /// retries.
    pub fn register(&self, params: RegisterParams) -> Result<()> {
        let user = User {
            email: params.email,
            name: params.name,
        };

        if !self.repository.insert_if_absent(&user)? {
            return Err(ServerError::EmailExists);
        }

        Ok(())
    }

    /// Find a user by email, propagating `NotFound` unchanged.
    pub fn get_by_email(&self, email: &str) -> Result<User> {
        self.repository.get(email)
    }
}

#[cfg(test)]
mod tests {
    use crate::user::MemoryUserRepository;

    use super::*;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryUserRepository::new()))
    }

    fn params(email: &str, name: &str) -> RegisterParams {
        RegisterParams {
            email: email.to_owned(),
            name: name.to_owned(),
        }
    }

    #[test]
    fn test_register_then_get_by_email() {
        let service = service();

        service.register(params("test@example.com", "Test")).unwrap();

        let user = service.get_by_email("test@example.com").unwrap();
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.name, "Test");
    }

    #[test]
    fn test_register_twice_is_a_conflict() {
        let service = service();

        service.register(params("test@example.com", "Test")).unwrap();
        let err = service.register(params("test@example.com", "Other")).unwrap_err();

        assert!(matches!(err, ServerError::EmailExists));

        // First registration stays untouched.
        let user = service.get_by_email("test@example.com").unwrap();
        assert_eq!(user.name, "Test");
    }

    #[test]
    fn test_get_by_email_propagates_not_found() {
        let err = service().get_by_email("ghost@example.com").unwrap_err();
        assert!(matches!(err, ServerError::NotFound));
    }
}
