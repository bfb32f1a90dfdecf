use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// A customer's reservation of a unit, parameterized by a payment plan.
///
/// The plan fields are derived and cached here whenever a schedule is
/// (re)generated; they stay `None` until the first generation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: String,
    pub unit_id: String,
    pub customer_id: String,
    /// Agreed sale price for the unit
    pub unit_price: Decimal,
    pub payment_plan_years: Option<i32>,
    pub payment_frequency_months: Option<i32>,
    pub payment_start_date: Option<NaiveDate>,
    pub monthly_amount: Option<Decimal>,
    pub installment_amount: Option<Decimal>,
    pub total_installments: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    /// Create a new booking with no payment plan yet
    pub fn new(unit_id: String, customer_id: String, unit_price: Decimal) -> Result<Self> {
        if unit_price <= Decimal::ZERO {
            return Err(AppError::validation("Unit price must be positive"));
        }

        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            unit_id,
            customer_id,
            unit_price,
            payment_plan_years: None,
            payment_frequency_months: None,
            payment_start_date: None,
            monthly_amount: None,
            installment_amount: None,
            total_installments: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether a schedule has ever been generated for this booking
    pub fn has_payment_plan(&self) -> bool {
        self.total_installments.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_booking_has_no_plan() {
        let booking =
            Booking::new("unit-1".to_string(), "cust-1".to_string(), dec!(120000)).unwrap();

        assert!(!booking.has_payment_plan());
        assert_eq!(booking.unit_price, dec!(120000));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        assert!(Booking::new("unit-1".to_string(), "cust-1".to_string(), Decimal::ZERO).is_err());
        assert!(Booking::new("unit-1".to_string(), "cust-1".to_string(), dec!(-5)).is_err());
    }
}
