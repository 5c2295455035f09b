//! In-memory credential store
//!
//! Users, the email index and the id counter share one locked table so that
//! registration can check uniqueness, allocate an id and insert without a
//! window for a competing registration. Password hashing and verification
//! always happen outside the lock.

use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;

use super::errors::CredentialError;
use super::password::PasswordHasher;
use super::types::{Registration, User};
use crate::models::UserId;

#[derive(Default)]
struct UserTable {
    users: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
    last_user_id: u64,
}

impl UserTable {
    fn contains_email(&self, email: &str) -> bool {
        self.by_email.contains_key(email)
    }
}

/// Thread-safe registry of users and their password hashes
pub struct CredentialStore {
    table: RwLock<UserTable>,
    hasher: PasswordHasher,
}

impl CredentialStore {
    #[must_use]
    pub fn new(hasher: PasswordHasher) -> Self {
        Self {
            table: RwLock::new(UserTable::default()),
            hasher,
        }
    }

    /// Fail if `email` is already registered
    ///
    /// Emails are compared exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::EmailAlreadyRegistered`] when taken
    pub fn check_email_exists(&self, email: &str) -> Result<(), CredentialError> {
        if self.table.read().contains_email(email) {
            return Err(CredentialError::EmailAlreadyRegistered);
        }
        Ok(())
    }

    /// Register a new user and return the assigned id
    ///
    /// Ids start at 1 and are never reused. The email check is repeated under
    /// the write lock, so two concurrent registrations of the same email
    /// cannot both succeed.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::PasswordMismatch`] if the confirmation differs
    /// - [`CredentialError::EmailAlreadyRegistered`] if the email is taken
    /// - [`CredentialError::HashingFailed`] if the password could not be hashed
    pub fn register(&self, registration: &Registration) -> Result<UserId, CredentialError> {
        if !registration.passwords_match() {
            return Err(CredentialError::PasswordMismatch);
        }
        // Cheap early exit before spending a full hash on a known conflict
        self.check_email_exists(&registration.email)?;

        let password_hash = self.hasher.hash(&registration.password)?;

        let mut table = self.table.write();
        if table.contains_email(&registration.email) {
            return Err(CredentialError::EmailAlreadyRegistered);
        }
        table.last_user_id += 1;
        let user_id = UserId(table.last_user_id);
        let user = User::new(
            user_id,
            registration.email.clone(),
            registration.first_name.clone(),
            registration.last_name.clone(),
            password_hash,
        );
        table.by_email.insert(registration.email.clone(), user_id);
        table.users.insert(user_id, user);
        drop(table);

        info!("Registered user {user_id}");
        Ok(user_id)
    }

    /// Verify an email and password pair and return the user's profile
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::IncorrectCredentials`] for an unknown email
    /// and for a wrong password alike
    pub fn login(&self, email: &str, password: &str) -> Result<User, CredentialError> {
        let user = {
            let table = self.table.read();
            table
                .by_email
                .get(email)
                .and_then(|id| table.users.get(id))
                .cloned()
        };

        let Some(user) = user else {
            self.hasher.verify_decoy(password);
            debug!("Login attempt for unknown email");
            return Err(CredentialError::IncorrectCredentials);
        };

        if self.hasher.verify(password, user.password_hash()) {
            debug!("User {} logged in", user.user_id);
            Ok(user)
        } else {
            debug!("Wrong password for user {}", user.user_id);
            Err(CredentialError::IncorrectCredentials)
        }
    }

    /// Fetch a user's profile by id
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::UserNotFound`] if no such user exists
    pub fn get(&self, user_id: UserId) -> Result<User, CredentialError> {
        self.table
            .read()
            .users
            .get(&user_id)
            .cloned()
            .ok_or(CredentialError::UserNotFound)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(PasswordHasher::default())
    }
}
