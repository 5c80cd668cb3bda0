use crate::utils::error::CustomError;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn validate_password(password: &str) -> Result<(), CustomError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(CustomError::BadRequestError(format!(
            "password must be at least {} chars",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_are_rejected() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn six_chars_is_enough() {
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("correct horse battery staple").is_ok());
    }
}
