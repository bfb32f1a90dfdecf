use rust_decimal::Decimal;

use crate::core::round2;
use crate::modules::installments::models::PaymentPlan;

/// Derived amortization figures for a payment plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmortizedPlan {
    /// Unit price spread evenly across the plan months
    pub monthly_amount: Decimal,
    /// Amount due per installment at the chosen frequency
    pub installment_amount: Decimal,
    /// Number of installments covering the plan
    pub total_installments: u32,
}

/// Calculator spreading a unit price across a payment plan.
///
/// Pure arithmetic; the plan enumeration is validated by the caller before
/// this runs, so no input accepted here can fail.
pub struct AmortizationCalculator;

impl AmortizationCalculator {
    /// Amortize a unit price over a plan.
    ///
    /// `monthly_amount` is the price divided by the plan months,
    /// `installment_amount` is the monthly amount times the frequency, both
    /// rounded to 2 decimal places half away from zero.
    /// `total_installments` is the plan months divided by the frequency,
    /// rounded up so a frequency that does not divide the plan evenly still
    /// covers the full duration.
    pub fn amortize(unit_price: Decimal, plan: &PaymentPlan) -> AmortizedPlan {
        let months = plan.months();
        let monthly_amount = round2(unit_price / Decimal::from(months));
        let installment_amount = round2(monthly_amount * Decimal::from(plan.frequency_months));
        let total_installments = months.div_ceil(plan.frequency_months);

        AmortizedPlan {
            monthly_amount,
            installment_amount,
            total_installments,
        }
    }
}
