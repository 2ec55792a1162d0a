//! User management and authentication queries

use crate::transaction;
use harmony_core::{error::Result, types::*, HarmonyError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

fn map_credentials(row: &SqliteRow) -> UserCredentials {
    UserCredentials {
        user: User {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        },
        password_hash: row.get("password_hash"),
    }
}

fn duplicate_account(err: sqlx::Error) -> HarmonyError {
    match HarmonyError::from(err) {
        HarmonyError::Duplicate(_) => {
            HarmonyError::Duplicate("username or email already taken".to_string())
        }
        other => other,
    }
}

/// Create a user. The password must already be hashed.
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<User> {
    user.validate()?;

    let result = sqlx::query(
        "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)",
    )
    .bind(user.username.trim())
    .bind(user.email.trim())
    .bind(&user.password_hash)
    .execute(pool)
    .await
    .map_err(duplicate_account)?;

    let id = UserId::new(result.last_insert_rowid());
    tracing::info!(user_id = %id, username = %user.username, "User created");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| HarmonyError::storage("Failed to retrieve created user"))
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    Ok(get_credentials(pool, id).await?.map(|c| c.user))
}

/// Get user and password hash by ID
pub async fn get_credentials(pool: &SqlitePool, id: UserId) -> Result<Option<UserCredentials>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(map_credentials))
}

/// Look up a user for login by email
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserCredentials>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email.trim())
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(map_credentials))
}

/// Look up a user by username
pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<UserCredentials>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
        .bind(username.trim())
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(map_credentials))
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY username"))
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(|row| map_credentials(row).user).collect())
}

/// Apply a partial update to a user
pub async fn update(pool: &SqlitePool, id: UserId, update: UpdateUser) -> Result<User> {
    update.validate()?;

    let mut tx = transaction::begin(pool).await?;

    let claimed = sqlx::query("UPDATE users SET updated_at = datetime('now') WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if claimed.rows_affected() == 0 {
        return Err(HarmonyError::not_found("User", id));
    }

    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    let mut stored = map_credentials(&row);
    update.apply_to(&mut stored);

    sqlx::query("UPDATE users SET username = ?, email = ?, password_hash = ? WHERE id = ?")
        .bind(stored.user.username.trim())
        .bind(stored.user.email.trim())
        .bind(&stored.password_hash)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(duplicate_account)?;

    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    transaction::commit(tx).await?;
    tracing::info!(user_id = %id, "User updated");

    Ok(map_credentials(&row).user)
}

/// Delete a user; their playlists and favorites cascade
pub async fn delete(pool: &SqlitePool, id: UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(HarmonyError::not_found("User", id));
    }

    tracing::info!(user_id = %id, "User deleted");
    Ok(())
}
