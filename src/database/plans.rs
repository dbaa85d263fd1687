// ABOUTME: Training plan database operations
// ABOUTME: Stores weekly plans per owner with their entries as JSON

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{from_json, parse_stored_id, to_json, Database};
use crate::errors::{AppError, AppResult};
use crate::models::TrainingPlan;

const PLAN_COLUMNS: &str =
    "id, user_id, date, week, workouts, total_distance, completed_distance, created_at, updated_at";

impl Database {
    /// Create the training plans table
    pub(super) async fn migrate_plans(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS training_plans (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                week INTEGER NOT NULL CHECK (week >= 1),
                workouts TEXT NOT NULL DEFAULT '[]',
                total_distance REAL NOT NULL DEFAULT 0,
                completed_distance REAL NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_training_plans_user_id ON training_plans(user_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a plan
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_plan(&self, plan: &TrainingPlan) -> AppResult<Uuid> {
        sqlx::query(
            r"
            INSERT INTO training_plans (id, user_id, date, week, workouts, total_distance,
                                        completed_distance, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(plan.id.to_string())
        .bind(plan.user.to_string())
        .bind(plan.date)
        .bind(i64::from(plan.week))
        .bind(to_json(&plan.workouts)?)
        .bind(plan.total_distance)
        .bind(plan.completed_distance)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(plan.id)
    }

    /// Fetch a plan regardless of owner
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn get_plan(&self, plan_id: Uuid) -> AppResult<Option<TrainingPlan>> {
        let query = format!("SELECT {PLAN_COLUMNS} FROM training_plans WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(plan_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_plan).transpose()
    }

    /// Fetch a plan only if `user_id` owns it
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn get_plan_for_user(
        &self,
        plan_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<TrainingPlan>> {
        let query =
            format!("SELECT {PLAN_COLUMNS} FROM training_plans WHERE id = $1 AND user_id = $2");
        let row = sqlx::query(&query)
            .bind(plan_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_plan).transpose()
    }

    /// All plans owned by a user, by date then week
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub async fn list_plans_for_user(&self, user_id: Uuid) -> AppResult<Vec<TrainingPlan>> {
        let query = format!(
            "SELECT {PLAN_COLUMNS} FROM training_plans WHERE user_id = $1 ORDER BY date ASC, week ASC"
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_plan).collect()
    }

    /// Persist every mutable field of `plan`
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_plan(&self, plan: &TrainingPlan) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE training_plans SET
                date = $3, week = $4, workouts = $5, total_distance = $6,
                completed_distance = $7, updated_at = $8
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(plan.id.to_string())
        .bind(plan.user.to_string())
        .bind(plan.date)
        .bind(i64::from(plan.week))
        .bind(to_json(&plan.workouts)?)
        .bind(plan.total_distance)
        .bind(plan.completed_distance)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a plan owned by `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn delete_plan(&self, plan_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM training_plans WHERE id = $1 AND user_id = $2")
            .bind(plan_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_plan(row: &SqliteRow) -> AppResult<TrainingPlan> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let week: i64 = row.try_get("week")?;
        let workouts: String = row.try_get("workouts")?;

        Ok(TrainingPlan {
            id: parse_stored_id(&id)?,
            user: parse_stored_id(&user_id)?,
            date: row.try_get("date")?,
            week: u32::try_from(week)
                .map_err(|_| AppError::database(format!("Corrupt week {week} in database")))?,
            workouts: from_json(&workouts)?,
            total_distance: row.try_get("total_distance")?,
            completed_distance: row.try_get("completed_distance")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
