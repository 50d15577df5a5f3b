use crate::error::JournalError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Email and password checked locally before reaching an identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Result<Self, JournalError> {
        let email = email.into();
        let password = password.into();
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(JournalError::MissingCredentials);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(JournalError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_rejected() {
        assert_eq!(
            Credentials::new("", "secret1").unwrap_err(),
            JournalError::MissingCredentials
        );
        assert_eq!(
            Credentials::new("a@b.c", "   ").unwrap_err(),
            JournalError::MissingCredentials
        );
    }

    #[test]
    fn test_short_password_rejected() {
        assert_eq!(
            Credentials::new("a@b.c", "12345").unwrap_err(),
            JournalError::PasswordTooShort { min: 6 }
        );
        assert!(Credentials::new("a@b.c", "123456").is_ok());
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("a@b.c", "hunter22").unwrap();
        let shown = format!("{creds:?}");
        assert!(shown.contains("a@b.c"));
        assert!(!shown.contains("hunter22"));
    }
}
