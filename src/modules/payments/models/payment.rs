use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// How a payment was received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::Cheque => "cheque",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "cash" => Ok(Self::Cash),
            "bank_transfer" => Ok(Self::BankTransfer),
            "cheque" => Ok(Self::Cheque),
            _ => Err(format!("Invalid payment method: {}", value)),
        }
    }
}

/// An actual payment received against a booking
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: String,
    pub booking_id: String,
    pub amount: Decimal,
    #[sqlx(try_from = "String")]
    pub method: PaymentMethod,
    /// Date the money was received
    pub payment_date: NaiveDate,
    /// Receipt or transfer reference
    pub reference: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Payment {
    pub fn new(
        booking_id: String,
        amount: Decimal,
        method: PaymentMethod,
        payment_date: NaiveDate,
        reference: Option<String>,
    ) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation("Payment amount must be positive"));
        }

        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            booking_id,
            amount,
            method,
            payment_date,
            reference,
            created_at: now,
            updated_at: now,
        })
    }
}
