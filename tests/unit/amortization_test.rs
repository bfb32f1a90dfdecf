// Property-based tests for the amortization calculator.

use chrono::NaiveDate;
use proptest::prelude::*;
use propledger::core::round2;
use propledger::modules::installments::models::PaymentPlan;
use propledger::modules::installments::services::AmortizationCalculator;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn plan(years: u32, freq: u32) -> PaymentPlan {
    PaymentPlan {
        plan_years: years,
        frequency_months: freq,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    }
}

/// Reference example: 120000 over 4 years, paid quarterly
#[test]
fn test_quarterly_reference_example() {
    let amortized = AmortizationCalculator::amortize(dec!(120000), &plan(4, 3));

    assert_eq!(amortized.monthly_amount, dec!(2500.00));
    assert_eq!(amortized.installment_amount, dec!(7500.00));
    assert_eq!(amortized.total_installments, 16);
}

#[test]
fn test_installment_counts_per_frequency() {
    // 48-month plan
    let expected = [(1, 48), (2, 24), (3, 16), (4, 12), (5, 10), (6, 8), (12, 4)];
    for (freq, count) in expected {
        let amortized = AmortizationCalculator::amortize(dec!(120000), &plan(4, freq));
        assert_eq!(amortized.total_installments, count, "frequency {}", freq);
    }

    // 60-month plan at a 4-month cadence has a shorter final step
    let amortized = AmortizationCalculator::amortize(dec!(120000), &plan(5, 4));
    assert_eq!(amortized.total_installments, 15);
}

proptest! {
    /// Property: the installment count always covers the plan duration
    #[test]
    fn prop_count_covers_plan_duration(
        cents in 100_000u64..1_000_000_000u64,
        years in prop::sample::select(vec![4u32, 5]),
        freq in prop::sample::select(vec![1u32, 2, 3, 4, 5, 6, 12]),
    ) {
        let price = Decimal::from(cents) / Decimal::from(100);
        let amortized = AmortizationCalculator::amortize(price, &plan(years, freq));

        let months = years * 12;
        prop_assert_eq!(amortized.total_installments, months.div_ceil(freq));
        // Enough installments to span the plan, never a full step more
        prop_assert!(amortized.total_installments * freq >= months);
        prop_assert!((amortized.total_installments - 1) * freq < months);
    }

    /// Property: the installment amount is the rounded monthly amount times
    /// the frequency
    #[test]
    fn prop_installment_derives_from_monthly(
        cents in 100_000u64..1_000_000_000u64,
        years in prop::sample::select(vec![4u32, 5]),
        freq in prop::sample::select(vec![1u32, 2, 3, 4, 5, 6, 12]),
    ) {
        let price = Decimal::from(cents) / Decimal::from(100);
        let amortized = AmortizationCalculator::amortize(price, &plan(years, freq));

        let expected_monthly = round2(price / Decimal::from(years * 12));
        prop_assert_eq!(amortized.monthly_amount, expected_monthly);
        prop_assert_eq!(
            amortized.installment_amount,
            round2(expected_monthly * Decimal::from(freq))
        );
    }

    /// Property: amounts are always positive for realistic prices
    #[test]
    fn prop_amounts_positive(
        cents in 100_000u64..1_000_000_000u64,
        years in prop::sample::select(vec![4u32, 5]),
        freq in prop::sample::select(vec![1u32, 2, 3, 4, 5, 6, 12]),
    ) {
        let price = Decimal::from(cents) / Decimal::from(100);
        let amortized = AmortizationCalculator::amortize(price, &plan(years, freq));

        prop_assert!(amortized.monthly_amount > Decimal::ZERO);
        prop_assert!(amortized.installment_amount > Decimal::ZERO);
    }
}
