//! Input rules for account registration and login.
//!
//! Validation runs before any storage access and reports only the first
//! violated rule, in a fixed order, so the signup form can show a single
//! inline message.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Accepted e-mail shape: something, `@`, something, a dot, and a 2+ letter TLD.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[a-zA-Z]{2,}$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// Characters that would be rewritten by HTML escaping.
const HTML_SPECIAL: &[char] = &['&', '<', '>', '"', '\''];

pub const MSG_EMAIL_REQUIRED: &str = "Email is required";
pub const MSG_EMAIL_INVALID: &str = "Please enter a valid email address";
pub const MSG_EMAIL_FORMAT: &str = "Invalid email format";
pub const MSG_NAME_REQUIRED: &str = "Name is required";
pub const MSG_USERNAME_REQUIRED: &str = "Username is required";
pub const MSG_PASSWORD_REQUIRED: &str = "Password is required";
pub const MSG_REPEAT_REQUIRED: &str = "Repeating the password is required";
pub const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const MSG_LOGIN_FIELDS_REQUIRED: &str = "Email/username and password are required";

/// Raw registration form, borrowed from the request body.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationForm<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub repeat_password: &'a str,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check an e-mail address against the accepted pattern.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate a registration form, returning the first violated rule.
///
/// Order: email present, email shape, email free of HTML-special characters,
/// name, username, password, repeated password, passwords equal.
pub fn validate_registration(form: &RegistrationForm<'_>) -> Result<(), CoreError> {
    let fail = |msg: &str| Err(CoreError::Validation(msg.to_string()));

    if is_blank(form.email) {
        return fail(MSG_EMAIL_REQUIRED);
    }
    if !is_valid_email(form.email) {
        return fail(MSG_EMAIL_INVALID);
    }
    if form.email.contains(HTML_SPECIAL) {
        return fail(MSG_EMAIL_FORMAT);
    }
    if is_blank(form.name) {
        return fail(MSG_NAME_REQUIRED);
    }
    if is_blank(form.username) {
        return fail(MSG_USERNAME_REQUIRED);
    }
    if is_blank(form.password) {
        return fail(MSG_PASSWORD_REQUIRED);
    }
    if is_blank(form.repeat_password) {
        return fail(MSG_REPEAT_REQUIRED);
    }
    if form.password != form.repeat_password {
        return fail(MSG_PASSWORD_MISMATCH);
    }
    Ok(())
}

/// Validate that both login fields are present.
pub fn validate_login(identifier: &str, password: &str) -> Result<(), CoreError> {
    if is_blank(identifier) || password.is_empty() {
        return Err(CoreError::Validation(MSG_LOGIN_FIELDS_REQUIRED.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn form<'a>() -> RegistrationForm<'a> {
        RegistrationForm {
            name: "Ann",
            username: "ann1",
            email: "ann@example.com",
            password: "Secret123",
            repeat_password: "Secret123",
        }
    }

    fn message(result: Result<(), CoreError>) -> String {
        match result {
            Err(CoreError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(validate_registration(&form()).is_ok());
    }

    #[test]
    fn blank_email_is_reported_first() {
        let f = RegistrationForm { email: "  ", name: "", ..form() };
        assert_eq!(message(validate_registration(&f)), MSG_EMAIL_REQUIRED);
    }

    #[test]
    fn malformed_email_rejected() {
        for bad in ["ann", "ann@example", "ann @example.com", "ann@example.c"] {
            let f = RegistrationForm { email: bad, ..form() };
            assert_eq!(message(validate_registration(&f)), MSG_EMAIL_INVALID, "{bad}");
        }
    }

    #[test]
    fn html_special_characters_in_email_rejected() {
        let f = RegistrationForm { email: "a<b>@example.com", ..form() };
        assert_eq!(message(validate_registration(&f)), MSG_EMAIL_FORMAT);
    }

    #[test]
    fn missing_name_and_username() {
        let f = RegistrationForm { name: "", ..form() };
        assert_eq!(message(validate_registration(&f)), MSG_NAME_REQUIRED);

        let f = RegistrationForm { username: " ", ..form() };
        assert_eq!(message(validate_registration(&f)), MSG_USERNAME_REQUIRED);
    }

    #[test]
    fn missing_passwords() {
        let f = RegistrationForm { password: "", ..form() };
        assert_eq!(message(validate_registration(&f)), MSG_PASSWORD_REQUIRED);

        let f = RegistrationForm { repeat_password: "", ..form() };
        assert_eq!(message(validate_registration(&f)), MSG_REPEAT_REQUIRED);
    }

    #[test]
    fn mismatched_passwords() {
        let f = RegistrationForm { repeat_password: "Secret124", ..form() };
        assert_eq!(message(validate_registration(&f)), MSG_PASSWORD_MISMATCH);
    }

    #[test]
    fn login_requires_both_fields() {
        assert_matches!(validate_login("", "pw"), Err(CoreError::Validation(_)));
        assert_matches!(validate_login("ann", ""), Err(CoreError::Validation(_)));
        assert!(validate_login("ann", "pw").is_ok());
    }
}
