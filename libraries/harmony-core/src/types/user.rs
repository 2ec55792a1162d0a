/// User domain types
use super::ids::UserId;
use crate::error::{HarmonyError, Result};
use serde::{Deserialize, Serialize};

/// User account (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Unique login name
    pub username: String,

    /// Unique email address, used to log in
    pub email: String,

    /// Account creation timestamp
    pub created_at: String,

    /// Last modification timestamp
    pub updated_at: String,
}

/// A user together with the stored bcrypt hash, for authentication only
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Data for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    /// Already hashed (bcrypt); storage never sees plain passwords
    pub password_hash: String,
}

impl CreateUser {
    /// Check the required fields are present
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(HarmonyError::invalid_input("username is required"));
        }
        validate_email(&self.email)?;
        if self.password_hash.is_empty() {
            return Err(HarmonyError::invalid_input("password is required"));
        }
        Ok(())
    }
}

/// Partial update for a user (all fields optional)
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UpdateUser {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password_hash.is_none()
    }

    /// Reject empty updates and malformed values
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(HarmonyError::invalid_input("no fields to update"));
        }
        if self.username.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(HarmonyError::invalid_input("username cannot be empty"));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// Merge the supplied fields onto stored credentials
    pub fn apply_to(&self, stored: &mut UserCredentials) {
        if let Some(username) = &self.username {
            stored.user.username.clone_from(username);
        }
        if let Some(email) = &self.email {
            stored.user.email.clone_from(email);
        }
        if let Some(hash) = &self.password_hash {
            stored.password_hash.clone_from(hash);
        }
    }
}

fn validate_email(email: &str) -> Result<()> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(HarmonyError::invalid_input("a valid email is required")),
    }
}
