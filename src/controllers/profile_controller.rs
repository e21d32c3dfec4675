use sqlx::PgPool;

use crate::dto::auth_dto::DriverInfo;
use crate::dto::profile_dto::{ProfileResponse, Statistics};
use crate::dto::ApiResponse;
use crate::repositories::assignment_repository::AssignmentRepository;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{AppError, AppResult};

const RECENT_JOBS_LIMIT: i64 = 5;

pub struct ProfileController {
    drivers: DriverRepository,
    vehicles: VehicleRepository,
    assignments: AssignmentRepository,
}

impl ProfileController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            drivers: DriverRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            assignments: AssignmentRepository::new(pool),
        }
    }

    /// Driver profile with per-period statistics and recent completions
    pub async fn profile(&self, driver_id: i64) -> AppResult<ApiResponse<ProfileResponse>> {
        let driver = self
            .drivers
            .find_by_id(driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;

        let vehicle = self.vehicles.find_default_for_driver(driver_id).await?;

        let statistics = Statistics {
            today: self.assignments.today_stats(driver_id).await?,
            week: self.assignments.week_stats(driver_id).await?,
            month: self.assignments.month_stats(driver_id).await?,
            all_time: self.assignments.all_time_stats(driver_id).await?,
        };

        let recent_jobs = self
            .assignments
            .recent_completed(driver_id, RECENT_JOBS_LIMIT)
            .await?;

        Ok(ApiResponse::success(ProfileResponse {
            driver: DriverInfo::from(driver),
            vehicle,
            statistics,
            recent_jobs,
        }))
    }
}
