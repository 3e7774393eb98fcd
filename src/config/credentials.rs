use std::env;
use std::fmt;

/// Login pair for a provider, read from the environment
#[derive(Clone)]
pub struct ProviderCredentials {
    pub email: String,
    pub password: String,
}

impl ProviderCredentials {
    /// Returns `None` when either variable is unset or empty
    pub fn from_env(email_var: &str, password_var: &str) -> Option<Self> {
        let email = env::var(email_var).ok().filter(|v| !v.trim().is_empty())?;
        let password = env::var(password_var).ok().filter(|v| !v.is_empty())?;

        Some(Self { email, password })
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_loading() {
        unsafe {
            env::set_var("TEST_PANTRY_EMAIL", "shopper@example.com");
            env::set_var("TEST_PANTRY_PASSWORD", "hunter2");
        }

        let credentials = ProviderCredentials::from_env("TEST_PANTRY_EMAIL", "TEST_PANTRY_PASSWORD").unwrap();
        assert_eq!(credentials.email, "shopper@example.com");
        assert_eq!(credentials.password, "hunter2");
        assert!(!format!("{:?}", credentials).contains("hunter2"));

        unsafe {
            env::remove_var("TEST_PANTRY_EMAIL");
            env::remove_var("TEST_PANTRY_PASSWORD");
        }
    }

    #[test]
    fn test_missing_credentials_are_silent() {
        assert!(ProviderCredentials::from_env("TEST_PANTRY_UNSET_EMAIL", "TEST_PANTRY_UNSET_PASSWORD").is_none());
    }

    #[test]
    fn test_empty_email_counts_as_missing() {
        unsafe {
            env::set_var("TEST_PANTRY_BLANK_EMAIL", "  ");
            env::set_var("TEST_PANTRY_BLANK_PASSWORD", "secret");
        }

        assert!(ProviderCredentials::from_env("TEST_PANTRY_BLANK_EMAIL", "TEST_PANTRY_BLANK_PASSWORD").is_none());

        unsafe {
            env::remove_var("TEST_PANTRY_BLANK_EMAIL");
            env::remove_var("TEST_PANTRY_BLANK_PASSWORD");
        }
    }
}
