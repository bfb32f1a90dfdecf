// HTTP handlers for payment endpoints.
//
// Endpoints:
// - POST   /payments - Record a payment, optionally linking an installment
// - POST   /payments/{payment_id}/link - Link an existing payment
// - DELETE /payments/{payment_id} - Unlink everywhere, then delete

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::core::{format_money, AppError, Result};
use crate::modules::installments::controllers::InstallmentResponse;
use crate::modules::payments::{
    models::{Payment, PaymentMethod},
    services::ReconciliationService,
};

/// Response for a single payment
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub booking_id: String,
    pub amount: String,
    pub method: String,
    pub payment_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            booking_id: payment.booking_id,
            amount: format_money(payment.amount),
            method: payment.method.to_string(),
            payment_date: payment.payment_date.to_string(),
            reference: payment.reference,
        }
    }
}

/// Request for POST /payments
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub booking_id: String,
    /// When present, the payment is linked against this installment in the
    /// same transaction
    pub installment_id: Option<String>,
    pub amount: String,
    pub method: String,
    pub payment_date: NaiveDate,
    pub reference: Option<String>,
}

/// Response for POST /payments
#[derive(Debug, Serialize)]
pub struct RecordPaymentResponse {
    pub payment: PaymentResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_installment: Option<InstallmentResponse>,
}

/// Request for POST /payments/{payment_id}/link
#[derive(Debug, Deserialize)]
pub struct LinkPaymentRequest {
    pub installment_id: String,
}

/// Response for DELETE /payments/{payment_id}
#[derive(Debug, Serialize)]
pub struct DeletePaymentResponse {
    pub payment_id: String,
    pub unlinked_installments: Vec<InstallmentResponse>,
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| AppError::validation(format!("Invalid amount format: {}", raw)))
}

fn parse_method(raw: &str) -> Result<PaymentMethod> {
    PaymentMethod::try_from(raw.to_string()).map_err(|e| AppError::validation(e))
}

/// POST /payments
///
/// Records a received payment. When `installment_id` is present the payment
/// is linked against that installment atomically with the insert.
///
/// # Returns
/// - 201: Payment recorded (with the updated installment when linked)
/// - 400: Invalid amount, method, or link target state
/// - 404: Installment not found
pub async fn record_payment(
    request: web::Json<RecordPaymentRequest>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let service = ReconciliationService::new(pool.get_ref().clone());
    let request = request.into_inner();

    let amount = parse_amount(&request.amount)?;
    let method = parse_method(&request.method)?;

    let (payment, linked) = service
        .record_payment(
            request.booking_id,
            request.installment_id,
            amount,
            method,
            request.payment_date,
            request.reference,
        )
        .await?;

    let response = RecordPaymentResponse {
        payment: payment.into(),
        linked_installment: linked.map(InstallmentResponse::from),
    };

    Ok(HttpResponse::Created().json(response))
}

/// POST /payments/{payment_id}/link
///
/// Applies an existing payment's amount against an installment.
///
/// # Returns
/// - 200: Updated installment
/// - 404: Payment or installment not found
/// - 409: Payment already linked to that installment
pub async fn link_payment(
    payment_id: web::Path<String>,
    request: web::Json<LinkPaymentRequest>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let service = ReconciliationService::new(pool.get_ref().clone());

    let installment = service
        .link_payment(&request.installment_id, &payment_id)
        .await?;

    Ok(HttpResponse::Ok().json(InstallmentResponse::from(installment)))
}

/// DELETE /payments/{payment_id}
///
/// Unlinks the payment from any installments (resetting their paid state),
/// then deletes the payment row, in one transaction.
pub async fn delete_payment(
    payment_id: web::Path<String>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let service = ReconciliationService::new(pool.get_ref().clone());

    let unlinked = service.delete_payment(&payment_id).await?;

    let response = DeletePaymentResponse {
        payment_id: payment_id.into_inner(),
        unlinked_installments: unlinked.into_iter().map(InstallmentResponse::from).collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::post().to(record_payment))
            .route("/{payment_id}/link", web::post().to(link_payment))
            .route("/{payment_id}", web::delete().to(delete_payment)),
    );
}
