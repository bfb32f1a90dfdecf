// MySQL persistence for bookings.
//
// Only what the payment-plan machinery needs lives here: lookup, insert, and
// the plan-field write-back that runs inside the schedule-replace transaction.

use chrono::NaiveDateTime;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::bookings::models::Booking;
use crate::modules::installments::models::PlanFields;

/// Repository for booking database operations
pub struct BookingRepository {
    pool: MySqlPool,
}

impl BookingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a new booking
    pub async fn insert(&self, booking: &Booking) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, unit_id, customer_id, unit_price, payment_plan_years,
                payment_frequency_months, payment_start_date, monthly_amount,
                installment_amount, total_installments, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.unit_id)
        .bind(&booking.customer_id)
        .bind(booking.unit_price)
        .bind(booking.payment_plan_years)
        .bind(booking.payment_frequency_months)
        .bind(booking.payment_start_date)
        .bind(booking.monthly_amount)
        .bind(booking.installment_amount)
        .bind(booking.total_installments)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find a booking by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, unit_id, customer_id, unit_price, payment_plan_years,
                payment_frequency_months, payment_start_date, monthly_amount,
                installment_amount, total_installments, created_at, updated_at
            FROM bookings
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Write the derived plan fields back onto the booking, within the
    /// caller's transaction so the write commits or rolls back together with
    /// the schedule replace.
    pub async fn update_plan_fields_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        booking_id: &str,
        fields: &PlanFields,
        now: NaiveDateTime,
    ) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE bookings
            SET
                payment_plan_years = ?,
                payment_frequency_months = ?,
                payment_start_date = ?,
                monthly_amount = ?,
                installment_amount = ?,
                total_installments = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(fields.plan_years as i32)
        .bind(fields.frequency_months as i32)
        .bind(fields.start_date)
        .bind(fields.monthly_amount)
        .bind(fields.installment_amount)
        .bind(fields.total_installments as i32)
        .bind(now)
        .bind(booking_id)
        .execute(tx.as_mut())
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Booking not found"));
        }

        Ok(())
    }
}
