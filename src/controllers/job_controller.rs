//! Orchestration for the driver's job surface: list/detail reads, the
//! lifecycle transitions and tracking-token issuance.

use sqlx::PgPool;
use tracing::debug;
use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::dto::job_dto::{
    CompleteJobRequest, JobActionRequest, JobDetail, JobDetailResponse, JobListResponse,
    JobSummary, JobTransitionResponse,
};
use crate::dto::tracking_dto::TrackingTokenResponse;
use crate::dto::ApiResponse;
use crate::repositories::assignment_repository::AssignmentRepository;
use crate::repositories::booking_repository::BookingRepository;
use crate::services::lifecycle_service::LifecycleService;
use crate::services::tracking_service::TrackingService;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::locations::derive_locations;

const STATUS_FILTERS: [&str; 3] = ["assigned", "in_progress", "completed"];

pub struct JobController {
    bookings: BookingRepository,
    assignments: AssignmentRepository,
    lifecycle: LifecycleService,
    tracking: TrackingService,
}

impl JobController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            assignments: AssignmentRepository::new(pool.clone()),
            lifecycle: LifecycleService::new(pool.clone(), config.clone()),
            tracking: TrackingService::new(pool, config),
        }
    }

    pub async fn list_jobs(
        &self,
        driver_id: i64,
        status: Option<String>,
    ) -> AppResult<ApiResponse<JobListResponse>> {
        let filter = status.unwrap_or_else(|| "all".to_string());

        let status_filter = match filter.as_str() {
            "all" => None,
            s if STATUS_FILTERS.contains(&s) => Some(s),
            other => {
                return Err(AppError::Validation(format!(
                    "Invalid status filter '{}'",
                    other
                )))
            }
        };

        let rows = self
            .bookings
            .list_jobs_for_driver(driver_id, status_filter)
            .await?;

        let jobs = rows
            .into_iter()
            .map(|row| {
                let (pickup_location, dropoff_location) = derive_locations(&row.location_fields());
                JobSummary {
                    job: row,
                    pickup_location,
                    dropoff_location,
                }
            })
            .collect();

        let counts = self.assignments.count_by_status(driver_id).await?;

        Ok(ApiResponse::success(JobListResponse {
            jobs,
            counts,
            filter,
        }))
    }

    pub async fn job_detail(
        &self,
        driver_id: i64,
        booking_ref: &str,
    ) -> AppResult<ApiResponse<JobDetailResponse>> {
        if booking_ref.trim().is_empty() {
            return Err(AppError::Validation("Booking reference required".to_string()));
        }

        let row = self
            .bookings
            .job_detail(booking_ref, driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

        // A booking that exists but belongs to another driver looks exactly
        // like a missing one from the outside.
        if row.assignment_status.is_none() {
            debug!(booking_ref, driver_id, "booking not assigned to driver");
            return Err(AppError::NotFound("Job not found".to_string()));
        }

        let (pickup_location, dropoff_location) = derive_locations(&row.location_fields());

        Ok(ApiResponse::success(JobDetailResponse {
            job: JobDetail {
                job: row,
                pickup_location,
                dropoff_location,
            },
        }))
    }

    pub async fn acknowledge(
        &self,
        driver_id: i64,
        request: JobActionRequest,
    ) -> AppResult<ApiResponse<JobTransitionResponse>> {
        request.validate()?;

        let response = self
            .lifecycle
            .acknowledge(driver_id, request.booking_ref.trim())
            .await?;

        Ok(ApiResponse::success_with_message(
            response,
            "Job acknowledged successfully".to_string(),
        ))
    }

    pub async fn start(
        &self,
        driver_id: i64,
        request: JobActionRequest,
    ) -> AppResult<ApiResponse<JobTransitionResponse>> {
        request.validate()?;

        let response = self
            .lifecycle
            .start_job(driver_id, request.booking_ref.trim())
            .await?;

        Ok(ApiResponse::success_with_message(
            response,
            "Job started successfully".to_string(),
        ))
    }

    pub async fn complete(
        &self,
        driver_id: i64,
        request: CompleteJobRequest,
    ) -> AppResult<ApiResponse<JobTransitionResponse>> {
        request.validate()?;

        let response = self
            .lifecycle
            .complete_job(
                driver_id,
                request.booking_ref.trim(),
                request.status,
                request.latitude,
                request.longitude,
                request.notes.as_deref(),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            response,
            "Job completed successfully".to_string(),
        ))
    }

    pub async fn tracking_token(
        &self,
        driver_id: i64,
        booking_ref: &str,
    ) -> AppResult<ApiResponse<TrackingTokenResponse>> {
        if booking_ref.trim().is_empty() {
            return Err(AppError::Validation("Booking reference required".to_string()));
        }

        let (token, is_new) = self
            .tracking
            .get_or_create_token(driver_id, booking_ref.trim())
            .await?;

        Ok(ApiResponse::success(TrackingTokenResponse::from_token(
            token, is_new,
        )))
    }
}
