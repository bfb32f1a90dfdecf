// HTTP handlers for schedule and installment endpoints.
//
// Endpoints:
// - POST /bookings/{booking_id}/schedule - Regenerate the installment schedule
// - GET  /bookings/{booking_id}/installments - Get the ordered schedule
// - GET  /installments/upcoming - Open installments due soon, classified

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::config::AppConfig;
use crate::core::{format_money, Result};
use crate::modules::installments::{
    models::{PaymentPlan, ScheduledInstallment},
    services::{ScheduleService, UpcomingInstallment},
};

/// Response for a single installment
#[derive(Debug, Serialize)]
pub struct InstallmentResponse {
    pub id: String,
    pub booking_id: String,
    pub installment_number: i32,
    pub due_date: String,
    pub amount: String,
    pub status: String,
    pub paid_amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}

impl From<ScheduledInstallment> for InstallmentResponse {
    fn from(installment: ScheduledInstallment) -> Self {
        Self {
            id: installment.id,
            booking_id: installment.booking_id,
            installment_number: installment.installment_number,
            due_date: installment.due_date.to_string(),
            amount: format_money(installment.amount),
            status: installment.status.to_string(),
            paid_amount: format_money(installment.paid_amount),
            paid_date: installment.paid_date.map(|d| d.to_string()),
            payment_id: installment.payment_id,
        }
    }
}

/// Request for POST /bookings/{booking_id}/schedule
#[derive(Debug, Deserialize)]
pub struct GenerateScheduleRequest {
    pub plan_years: u32,
    pub frequency_months: u32,
    pub start_date: NaiveDate,
}

/// Response for schedule endpoints
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub booking_id: String,
    pub total_installments: usize,
    pub installments: Vec<InstallmentResponse>,
}

/// Response entry for GET /installments/upcoming
#[derive(Debug, Serialize)]
pub struct UpcomingInstallmentResponse {
    #[serde(flatten)]
    pub installment: InstallmentResponse,
    pub outstanding: String,
    pub days_until_due: i64,
    pub urgency: String,
}

impl From<UpcomingInstallment> for UpcomingInstallmentResponse {
    fn from(upcoming: UpcomingInstallment) -> Self {
        let outstanding = format_money(upcoming.installment.outstanding());

        Self {
            installment: upcoming.installment.into(),
            outstanding,
            days_until_due: upcoming.days_until_due,
            urgency: upcoming.urgency.to_string(),
        }
    }
}

/// Response for GET /installments/upcoming
#[derive(Debug, Serialize)]
pub struct UpcomingResponse {
    pub days_ahead: u32,
    pub installments: Vec<UpcomingInstallmentResponse>,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub days_ahead: Option<u32>,
}

/// POST /bookings/{booking_id}/schedule
///
/// Replaces the booking's installment schedule with one generated from the
/// submitted plan terms and caches the derived plan fields on the booking.
///
/// # Returns
/// - 200: The freshly generated schedule
/// - 400: Invalid plan terms
/// - 404: Booking not found
pub async fn generate_schedule(
    booking_id: web::Path<String>,
    request: web::Json<GenerateScheduleRequest>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let service = ScheduleService::new(pool.get_ref().clone());

    let plan = PaymentPlan {
        plan_years: request.plan_years,
        frequency_months: request.frequency_months,
        start_date: request.start_date,
    };

    let installments = service.generate_for_booking(&booking_id, &plan).await?;

    let response = ScheduleResponse {
        booking_id: booking_id.into_inner(),
        total_installments: installments.len(),
        installments: installments
            .into_iter()
            .map(InstallmentResponse::from)
            .collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// GET /bookings/{booking_id}/installments
///
/// Returns the booking's schedule ordered by installment number.
pub async fn get_installments(
    booking_id: web::Path<String>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let service = ScheduleService::new(pool.get_ref().clone());

    let installments = service.get_schedule(&booking_id).await?;

    let response = ScheduleResponse {
        booking_id: booking_id.into_inner(),
        total_installments: installments.len(),
        installments: installments
            .into_iter()
            .map(InstallmentResponse::from)
            .collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// GET /installments/upcoming?days_ahead=N
///
/// Returns open installments due within the window, each classified by
/// due-date proximity. The window defaults to the configured value.
pub async fn get_upcoming(
    query: web::Query<UpcomingQuery>,
    pool: web::Data<MySqlPool>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    let service = ScheduleService::new(pool.get_ref().clone());
    let days_ahead = query.days_ahead.unwrap_or(config.upcoming_window_days);

    let upcoming = service.upcoming(days_ahead).await?;

    let response = UpcomingResponse {
        days_ahead,
        installments: upcoming
            .into_iter()
            .map(UpcomingInstallmentResponse::from)
            .collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Configure schedule and installment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings/{booking_id}")
            .route("/schedule", web::post().to(generate_schedule))
            .route("/installments", web::get().to(get_installments)),
    )
    .route("/installments/upcoming", web::get().to(get_upcoming));
}
