use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Plan durations offered for unit bookings, in years
pub const ALLOWED_PLAN_YEARS: [u32; 2] = [4, 5];

/// Supported installment frequencies, in months
pub const ALLOWED_FREQUENCIES: [u32; 7] = [1, 2, 3, 4, 5, 6, 12];

/// Payment-plan terms chosen for a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPlan {
    /// Plan duration in years (4 or 5)
    pub plan_years: u32,
    /// Months between installments
    pub frequency_months: u32,
    /// Due date of the first installment
    pub start_date: NaiveDate,
}

impl PaymentPlan {
    /// Total plan duration in months
    pub fn months(&self) -> u32 {
        self.plan_years * 12
    }

    /// Validate the plan terms against the offered enumerations.
    ///
    /// Runs before any computation or persistence so invalid terms never
    /// reach the store.
    pub fn validate(&self, unit_price: Decimal) -> Result<()> {
        if unit_price <= Decimal::ZERO {
            return Err(AppError::validation("Unit price must be positive"));
        }

        if !ALLOWED_PLAN_YEARS.contains(&self.plan_years) {
            return Err(AppError::validation(format!(
                "Plan duration must be one of {:?} years, got {}",
                ALLOWED_PLAN_YEARS, self.plan_years
            )));
        }

        if !ALLOWED_FREQUENCIES.contains(&self.frequency_months) {
            return Err(AppError::validation(format!(
                "Installment frequency must be one of {:?} months, got {}",
                ALLOWED_FREQUENCIES, self.frequency_months
            )));
        }

        Ok(())
    }
}

/// Derived plan fields cached back onto the booking when a schedule is
/// (re)generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanFields {
    pub plan_years: u32,
    pub frequency_months: u32,
    pub start_date: NaiveDate,
    pub monthly_amount: Decimal,
    pub installment_amount: Decimal,
    pub total_installments: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn plan(years: u32, freq: u32) -> PaymentPlan {
        PaymentPlan {
            plan_years: years,
            frequency_months: freq,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_valid_plans() {
        for years in ALLOWED_PLAN_YEARS {
            for freq in ALLOWED_FREQUENCIES {
                assert!(plan(years, freq).validate(dec!(120000)).is_ok());
            }
        }
    }

    #[test]
    fn test_rejects_unknown_duration() {
        assert!(plan(3, 1).validate(dec!(120000)).is_err());
        assert!(plan(6, 1).validate(dec!(120000)).is_err());
    }

    #[test]
    fn test_rejects_unknown_frequency() {
        assert!(plan(4, 7).validate(dec!(120000)).is_err());
        assert!(plan(4, 0).validate(dec!(120000)).is_err());
    }

    #[test]
    fn test_rejects_non_positive_price() {
        assert!(plan(4, 3).validate(Decimal::ZERO).is_err());
        assert!(plan(4, 3).validate(dec!(-100)).is_err());
    }

    #[test]
    fn test_months() {
        assert_eq!(plan(4, 3).months(), 48);
        assert_eq!(plan(5, 6).months(), 60);
    }
}
