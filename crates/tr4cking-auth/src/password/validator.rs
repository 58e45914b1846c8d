//! Password policy for new passwords.

use tr4cking_core::config::AuthConfig;
use tr4cking_core::error::AppError;

/// Validates password strength against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    strength_check: bool,
}

impl PasswordValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            strength_check: config.password_strength_check,
        }
    }

    /// Checks length, character mix and, when enabled, the zxcvbn estimate.
    ///
    /// `user_inputs` (username, email, names) are penalised by the estimator.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_alphabetic()) {
            return Err(AppError::validation(
                "Password must contain at least one letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        if self.strength_check {
            let estimate = zxcvbn::zxcvbn(password, user_inputs);
            if estimate.score() < zxcvbn::Score::Three {
                return Err(AppError::validation(
                    "Password is too weak. Please use a longer, less predictable password.",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(strength_check: bool) -> PasswordValidator {
        PasswordValidator::new(&AuthConfig {
            password_strength_check: strength_check,
            ..AuthConfig::default()
        })
    }

    #[test]
    fn test_too_short() {
        assert!(validator(false).validate("ab1", &[]).is_err());
    }

    #[test]
    fn test_requires_digit_and_letter() {
        assert!(validator(false).validate("onlyletters", &[]).is_err());
        assert!(validator(false).validate("1234567890", &[]).is_err());
        assert!(validator(false).validate("letters123", &[]).is_ok());
    }

    #[test]
    fn test_strength_check() {
        assert!(validator(true).validate("password1", &[]).is_err());
        assert!(validator(true).validate("colectivo-ruta7-Caaguazu-1998", &[]).is_ok());
    }

    #[test]
    fn test_username_is_penalised() {
        assert!(validator(true).validate("taquilla2024", &["taquilla2024"]).is_err());
    }
}
