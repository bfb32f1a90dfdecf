// Due-date proximity classification tests.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use propledger::modules::installments::models::ScheduledInstallment;
use propledger::modules::installments::services::{classify, days_until_due, UpcomingInstallment, Urgency};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_classification_boundaries() {
    let today = date(2024, 1, 10);

    assert_eq!(classify(date(2024, 1, 9), today), Urgency::Overdue);
    assert_eq!(classify(date(2024, 1, 10), today), Urgency::Today);
    assert_eq!(classify(date(2024, 1, 11), today), Urgency::Soon);
    assert_eq!(classify(date(2024, 1, 17), today), Urgency::Soon);
    assert_eq!(classify(date(2024, 1, 18), today), Urgency::Scheduled);
}

#[test]
fn test_classification_across_month_boundary() {
    let today = date(2024, 1, 29);

    assert_eq!(classify(date(2024, 2, 5), today), Urgency::Soon);
    assert_eq!(classify(date(2024, 2, 6), today), Urgency::Scheduled);
    assert_eq!(classify(date(2023, 12, 31), today), Urgency::Overdue);
}

#[test]
fn test_upcoming_installment_carries_days_and_urgency() {
    let today = date(2024, 1, 10);
    let installment = ScheduledInstallment::new(
        "bk-001".to_string(),
        3,
        date(2024, 1, 13),
        dec!(7500),
    )
    .unwrap();

    let upcoming = UpcomingInstallment::classify(installment, today);

    assert_eq!(upcoming.days_until_due, 3);
    assert_eq!(upcoming.urgency, Urgency::Soon);
    assert_eq!(upcoming.installment.installment_number, 3);
}

proptest! {
    /// Property: classification agrees with the day distance
    #[test]
    fn prop_classification_matches_day_distance(offset in -400i64..400i64) {
        let today = date(2024, 1, 10);
        let due = today + Duration::days(offset);

        prop_assert_eq!(days_until_due(due, today), offset);

        let expected = if offset < 0 {
            Urgency::Overdue
        } else if offset == 0 {
            Urgency::Today
        } else if offset <= 7 {
            Urgency::Soon
        } else {
            Urgency::Scheduled
        };
        prop_assert_eq!(classify(due, today), expected);
    }
}
