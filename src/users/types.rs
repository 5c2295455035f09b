use serde::{Deserialize, Serialize};
use std::fmt;

use super::password::PasswordHash;
use crate::models::UserId;

/// A registered user
///
/// The password hash never leaves the process: it is skipped when
/// serializing and redacted in `Debug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
}

impl User {
    pub(crate) const fn new(
        user_id: UserId,
        email: String,
        first_name: String,
        last_name: String,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            user_id,
            email,
            first_name,
            last_name,
            password_hash,
        }
    }

    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// Sign-up form submission
#[derive(Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

impl Registration {
    #[must_use]
    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password: &str, confirm: &str) -> Registration {
        Registration {
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_registration_deserializes_form_field_names() {
        let json = r#"{
            "email": "ada@example.com",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "password": "pw",
            "confirmPassword": "pw"
        }"#;
        let parsed: Registration = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.first_name, "Ada");
        assert_eq!(parsed.last_name, "Lovelace");
        assert!(parsed.passwords_match());
    }

    #[test]
    fn test_passwords_match_is_exact() {
        assert!(registration("pw", "pw").passwords_match());
        assert!(!registration("pw", "PW").passwords_match());
        assert!(!registration("pw", "pw ").passwords_match());
    }

    #[test]
    fn test_registration_debug_hides_passwords() {
        let debug = format!("{:?}", registration("s3cret", "s3cret"));
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("ada@example.com"));
    }

    #[test]
    fn test_user_serialization_skips_hash() {
        let user = User::new(
            UserId(3),
            "ada@example.com".to_string(),
            "Ada".to_string(),
            "Lovelace".to_string(),
            PasswordHash::from_encoded("pbkdf2-sha256$1$AA$AA".to_string()),
        );
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["user_id"], 3);
        assert_eq!(json["first_name"], "Ada");
        assert!(json.get("password_hash").is_none());
        assert!(!format!("{user:?}").contains("pbkdf2"));
    }
}
