// ABOUTME: Workout database operations
// ABOUTME: Stores workouts per owner with their segments and intervals as JSON

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{from_json, parse_stored_id, to_json, Database};
use crate::errors::AppResult;
use crate::models::Workout;

const WORKOUT_COLUMNS: &str = "id, user_id, workout_name, warm_up, work, cool_down, is_template, \
                               total_distance, created_at, updated_at";

impl Database {
    /// Create the workouts table
    pub(super) async fn migrate_workouts(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                workout_name TEXT NOT NULL,
                warm_up TEXT,
                work TEXT NOT NULL DEFAULT '[]',
                cool_down TEXT,
                is_template BOOLEAN NOT NULL DEFAULT 0,
                total_distance REAL NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_workouts_user_id ON workouts(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a workout
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_workout(&self, workout: &Workout) -> AppResult<Uuid> {
        sqlx::query(
            r"
            INSERT INTO workouts (id, user_id, workout_name, warm_up, work, cool_down, is_template,
                                  total_distance, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.user.to_string())
        .bind(&workout.workout_name)
        .bind(workout.warm_up.as_ref().map(to_json).transpose()?)
        .bind(to_json(&workout.work)?)
        .bind(workout.cool_down.as_ref().map(to_json).transpose()?)
        .bind(workout.is_template)
        .bind(workout.total_distance)
        .bind(workout.created_at)
        .bind(workout.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(workout.id)
    }

    /// Fetch a workout regardless of owner
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn get_workout(&self, workout_id: Uuid) -> AppResult<Option<Workout>> {
        let query = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(workout_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_workout).transpose()
    }

    /// Fetch a workout only if `user_id` owns it
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn get_workout_for_user(
        &self,
        workout_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Workout>> {
        let query = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2");
        let row = sqlx::query(&query)
            .bind(workout_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_workout).transpose()
    }

    /// All workouts owned by a user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub async fn list_workouts_for_user(&self, user_id: Uuid) -> AppResult<Vec<Workout>> {
        let query = format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_workout).collect()
    }

    /// Load the given workouts keyed by id; unknown ids are skipped
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a row is corrupt.
    pub async fn get_workouts_by_ids(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Workout>> {
        let mut found = HashMap::with_capacity(ids.len());
        for id in ids {
            if found.contains_key(id) {
                continue;
            }
            if let Some(workout) = self.get_workout(*id).await? {
                found.insert(*id, workout);
            }
        }
        Ok(found)
    }

    /// Persist every mutable field of `workout`
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_workout(&self, workout: &Workout) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE workouts SET
                workout_name = $3, warm_up = $4, work = $5, cool_down = $6, is_template = $7,
                total_distance = $8, updated_at = $9
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.user.to_string())
        .bind(&workout.workout_name)
        .bind(workout.warm_up.as_ref().map(to_json).transpose()?)
        .bind(to_json(&workout.work)?)
        .bind(workout.cool_down.as_ref().map(to_json).transpose()?)
        .bind(workout.is_template)
        .bind(workout.total_distance)
        .bind(workout.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a workout owned by `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn delete_workout(&self, workout_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_workout(row: &SqliteRow) -> AppResult<Workout> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let warm_up: Option<String> = row.try_get("warm_up")?;
        let work: String = row.try_get("work")?;
        let cool_down: Option<String> = row.try_get("cool_down")?;

        Ok(Workout {
            id: parse_stored_id(&id)?,
            workout_name: row.try_get("workout_name")?,
            warm_up: warm_up.as_deref().map(from_json).transpose()?,
            work: from_json(&work)?,
            cool_down: cool_down.as_deref().map(from_json).transpose()?,
            user: parse_stored_id(&user_id)?,
            is_template: row.try_get("is_template")?,
            total_distance: row.try_get("total_distance")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
