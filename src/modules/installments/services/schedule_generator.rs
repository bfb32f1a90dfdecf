use std::sync::Arc;

use chrono::{Duration, Months};
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::info;

use crate::core::{AppError, Clock, Result, SystemClock};
use crate::modules::bookings::repositories::BookingRepository;
use crate::modules::installments::{
    models::{PaymentPlan, PlanFields, ScheduledInstallment},
    repositories::InstallmentRepository,
    services::{AmortizationCalculator, UpcomingInstallment},
};

/// Build the full installment schedule for a booking as in-memory rows.
///
/// Due dates step from the start date by the plan frequency; each step
/// multiplies the month offset from the start rather than adding to the
/// previous date, so month-end clamping cannot accumulate drift. The last
/// installment absorbs any rounding difference, making the schedule sum to
/// the unit price exactly.
pub fn build_schedule(
    booking_id: &str,
    unit_price: Decimal,
    plan: &PaymentPlan,
) -> Result<(Vec<ScheduledInstallment>, PlanFields)> {
    plan.validate(unit_price)?;

    let amortized = AmortizationCalculator::amortize(unit_price, plan);
    let count = amortized.total_installments;

    let mut installments = Vec::with_capacity(count as usize);
    let mut distributed = Decimal::ZERO;

    for i in 0..count {
        let due_date = plan
            .start_date
            .checked_add_months(Months::new(i * plan.frequency_months))
            .ok_or_else(|| AppError::validation("Due date exceeds the calendar range"))?;

        let amount = if i == count - 1 {
            unit_price - distributed
        } else {
            amortized.installment_amount
        };
        distributed += amount;

        installments.push(ScheduledInstallment::new(
            booking_id.to_string(),
            (i + 1) as i32,
            due_date,
            amount,
        )?);
    }

    let fields = PlanFields {
        plan_years: plan.plan_years,
        frequency_months: plan.frequency_months,
        start_date: plan.start_date,
        monthly_amount: amortized.monthly_amount,
        installment_amount: amortized.installment_amount,
        total_installments: count,
    };

    Ok((installments, fields))
}

/// Service owning schedule generation and the upcoming-payments view
pub struct ScheduleService {
    pool: MySqlPool,
    bookings: BookingRepository,
    installments: InstallmentRepository,
    clock: Arc<dyn Clock>,
}

impl ScheduleService {
    pub fn new(pool: MySqlPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: MySqlPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            installments: InstallmentRepository::new(pool.clone()),
            pool,
            clock,
        }
    }

    /// Replace the booking's installment schedule with one generated from
    /// the given plan terms.
    ///
    /// Deletes any prior schedule, inserts the new rows, and writes the
    /// derived plan fields back onto the booking, all inside a single
    /// transaction, so a concurrent reader never observes a half-replaced
    /// schedule and the booking's cached fields never diverge from its
    /// installments. Re-running with identical terms yields an identical
    /// schedule modulo row identifiers.
    pub async fn generate_for_booking(
        &self,
        booking_id: &str,
        plan: &PaymentPlan,
    ) -> Result<Vec<ScheduledInstallment>> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))?;

        let (installments, fields) = build_schedule(booking_id, booking.unit_price, plan)?;

        info!(
            booking_id = booking_id,
            unit_price = %booking.unit_price,
            total_installments = fields.total_installments,
            installment_amount = %fields.installment_amount,
            "Generating installment schedule"
        );

        let mut tx = self.pool.begin().await?;
        let replaced = self
            .installments
            .delete_by_booking_tx(&mut tx, booking_id)
            .await?;
        self.installments
            .insert_batch_tx(&mut tx, &installments)
            .await?;
        self.bookings
            .update_plan_fields_tx(&mut tx, booking_id, &fields, self.clock.now())
            .await?;
        tx.commit().await?;

        info!(
            booking_id = booking_id,
            replaced = replaced,
            created = installments.len(),
            "Installment schedule persisted"
        );

        Ok(installments)
    }

    /// Ordered schedule for a booking
    pub async fn get_schedule(&self, booking_id: &str) -> Result<Vec<ScheduledInstallment>> {
        self.installments.find_by_booking(booking_id).await
    }

    /// Open installments due within the look-ahead window, classified by
    /// due-date proximity
    pub async fn upcoming(&self, days_ahead: u32) -> Result<Vec<UpcomingInstallment>> {
        let today = self.clock.today();
        let cutoff = today + Duration::days(days_ahead as i64);

        let installments = self.installments.find_open_due_before(cutoff).await?;

        Ok(installments
            .into_iter()
            .map(|installment| UpcomingInstallment::classify(installment, today))
            .collect())
    }
}
