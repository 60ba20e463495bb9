use std::sync::Arc;

use chrono::{Local, NaiveDate};

use super::ListQuery;
use crate::api::{ApiClient, QueryParams, SortOrder};
use crate::models::{Appointment, AppointmentStatus};

pub const TODAY_LIMIT: u32 = 100;
pub const UPCOMING_LIMIT: u32 = 10;

/// Appointments scheduled for the current local date.
pub fn today_appointments(api: Arc<ApiClient>) -> ListQuery<Appointment> {
    today_appointments_on(api, Local::now().date_naive())
}

pub fn today_appointments_on(api: Arc<ApiClient>, today: NaiveDate) -> ListQuery<Appointment> {
    let params = QueryParams::new()
        .filter("date", today.format("%Y-%m-%d").to_string())
        .limit(TODAY_LIMIT);
    ListQuery::new(api, params)
}

/// Scheduled appointments from today on, soonest first.
pub fn upcoming_appointments(api: Arc<ApiClient>, limit: Option<u32>) -> ListQuery<Appointment> {
    upcoming_appointments_on(api, Local::now().date_naive(), limit)
}

pub fn upcoming_appointments_on(api: Arc<ApiClient>, today: NaiveDate, limit: Option<u32>) -> ListQuery<Appointment> {
    let params = QueryParams::new()
        .filter("date_from", today.format("%Y-%m-%d").to_string())
        .filter("status", AppointmentStatus::Scheduled.as_str())
        .limit(limit.unwrap_or(UPCOMING_LIMIT))
        .sort("scheduled_date", SortOrder::Asc);
    ListQuery::new(api, params)
}
