use serde::Serialize;

use crate::dto::auth_dto::DriverInfo;
use crate::models::vehicle::Vehicle;
use crate::repositories::assignment_repository::{PeriodStats, RecentJobRow, TodayStats};

#[derive(Debug, Serialize)]
pub struct Statistics {
    pub today: TodayStats,
    pub week: PeriodStats,
    pub month: PeriodStats,
    pub all_time: PeriodStats,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub driver: DriverInfo,
    pub vehicle: Option<Vehicle>,
    pub statistics: Statistics,
    pub recent_jobs: Vec<RecentJobRow>,
}
