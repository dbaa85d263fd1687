// ABOUTME: User database operations
// ABOUTME: Handles registration, lookup by id or email, profile updates and deletion

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use stride_core::constants::error_messages;
use uuid::Uuid;

use super::{from_json, parse_stored_id, to_json, Database};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{User, UserRole};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, avatar, vdot, personal_bests, \
                            upcoming_races, recent_races, created_at, updated_at";

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin', 'coach')),
                avatar TEXT NOT NULL,
                vdot TEXT,
                personal_bests TEXT NOT NULL DEFAULT '{}',
                upcoming_races TEXT NOT NULL DEFAULT '[]',
                recent_races TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` when the email is taken.
    pub async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        let result = sqlx::query(
            r"
            INSERT INTO users (id, name, email, password_hash, role, avatar, vdot, personal_bests,
                               upcoming_races, recent_races, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.avatar)
        .bind(user.vdot.as_ref().map(to_json).transpose()?)
        .bind(to_json(&user.personal_bests)?)
        .bind(to_json(&user.upcoming_races)?)
        .bind(to_json(&user.recent_races)?)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user.id),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                AppError::already_exists(error_messages::USER_ALREADY_EXISTS),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        self.get_user_impl("id", &user_id.to_string()).await
    }

    /// Fetch a user by email; the address is matched as stored (lower case)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.get_user_impl("email", email).await
    }

    /// Fetch a user by id, failing with 404 when absent
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` with "User not found".
    pub async fn get_user_required(&self, user_id: Uuid) -> AppResult<User> {
        self.get_user(user_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ResourceNotFound, error_messages::USER_NOT_FOUND))
    }

    async fn get_user_impl(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE {field} = $1");
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// All users, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_user).collect()
    }

    /// Persist every mutable field of `user`
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` when the new email is taken, or
    /// `ResourceNotFound` when the user no longer exists.
    pub async fn update_user(&self, user: &User) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                name = $2, email = $3, password_hash = $4, role = $5, avatar = $6, vdot = $7,
                personal_bests = $8, upcoming_races = $9, recent_races = $10, updated_at = $11
            WHERE id = $1
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.avatar)
        .bind(user.vdot.as_ref().map(to_json).transpose()?)
        .bind(to_json(&user.personal_bests)?)
        .bind(to_json(&user.upcoming_races)?)
        .bind(to_json(&user.recent_races)?)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(AppError::new(
                ErrorCode::ResourceNotFound,
                error_messages::USER_NOT_FOUND,
            )),
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                AppError::already_exists(error_messages::USER_ALREADY_EXISTS),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a user with their workouts and plans
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn delete_user(&self, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of registered users
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_user_count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let id: String = row.try_get("id")?;
        let role: String = row.try_get("role")?;
        let vdot: Option<String> = row.try_get("vdot")?;
        let personal_bests: String = row.try_get("personal_bests")?;
        let upcoming_races: String = row.try_get("upcoming_races")?;
        let recent_races: String = row.try_get("recent_races")?;

        Ok(User {
            id: parse_stored_id(&id)?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: UserRole::parse(&role)?,
            avatar: row.try_get("avatar")?,
            vdot: vdot.as_deref().map(from_json).transpose()?,
            personal_bests: from_json(&personal_bests)?,
            upcoming_races: from_json(&upcoming_races)?,
            recent_races: from_json(&recent_races)?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
