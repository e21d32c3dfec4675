use sqlx::PgPool;

use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Driver's default active vehicle, shown on the profile page
    pub async fn find_default_for_driver(
        &self,
        driver_id: i64,
    ) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles \
             WHERE default_driver_id = $1 AND status = 'active' \
             LIMIT 1",
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }
}
