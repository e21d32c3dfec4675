use sqlx::PgPool;

use crate::models::driver::Driver;
use crate::utils::errors::AppError;

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Login lookup: by code, with a numeric-id fallback for legacy clients
    pub async fn find_by_code_or_id(&self, driver_code: &str) -> Result<Option<Driver>, AppError> {
        let fallback_id: i64 = driver_code.parse().unwrap_or(0);

        let driver = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE code = $1 OR id = $2",
        )
        .bind(driver_code)
        .bind(fallback_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    pub async fn set_online(&self, id: i64, is_online: bool) -> Result<(), AppError> {
        sqlx::query("UPDATE drivers SET is_online = $2 WHERE id = $1")
            .bind(id)
            .bind(is_online)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
