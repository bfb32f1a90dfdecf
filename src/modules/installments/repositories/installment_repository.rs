// MySQL persistence for scheduled installments.
//
// Provides:
// - Batch insert and per-booking delete inside a caller-owned transaction
//   (schedule replace is all-or-nothing)
// - Ordered retrieval by installment number
// - Row-locked reads for reconciliation (SELECT ... FOR UPDATE)
// - Range queries for the upcoming view and the overdue sweep

use chrono::NaiveDate;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::Result;
use crate::modules::installments::models::ScheduledInstallment;

const INSTALLMENT_COLUMNS: &str = r#"
    id, booking_id, installment_number, due_date, amount, status,
    paid_amount, paid_date, payment_id, created_at, updated_at
"#;

/// Repository for scheduled-installment database operations
pub struct InstallmentRepository {
    pool: MySqlPool,
}

impl InstallmentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Delete every installment belonging to a booking, within the caller's
    /// transaction
    pub async fn delete_by_booking_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        booking_id: &str,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM scheduled_installments WHERE booking_id = ?")
            .bind(booking_id)
            .execute(tx.as_mut())
            .await?;

        Ok(result.rows_affected())
    }

    /// Insert a batch of installments within the caller's transaction
    pub async fn insert_batch_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        installments: &[ScheduledInstallment],
    ) -> Result<()> {
        for installment in installments {
            sqlx::query(
                r#"
                INSERT INTO scheduled_installments (
                    id, booking_id, installment_number, due_date, amount,
                    status, paid_amount, paid_date, payment_id, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&installment.id)
            .bind(&installment.booking_id)
            .bind(installment.installment_number)
            .bind(installment.due_date)
            .bind(installment.amount)
            .bind(installment.status.to_string())
            .bind(installment.paid_amount)
            .bind(installment.paid_date)
            .bind(&installment.payment_id)
            .bind(installment.created_at)
            .bind(installment.updated_at)
            .execute(tx.as_mut())
            .await?;
        }

        Ok(())
    }

    /// All installments for a booking, ordered by installment number
    pub async fn find_by_booking(&self, booking_id: &str) -> Result<Vec<ScheduledInstallment>> {
        let installments = sqlx::query_as::<_, ScheduledInstallment>(&format!(
            r#"
            SELECT {INSTALLMENT_COLUMNS}
            FROM scheduled_installments
            WHERE booking_id = ?
            ORDER BY installment_number ASC
            "#
        ))
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(installments)
    }

    /// Find an installment by ID with a row lock, serializing concurrent
    /// reconciliation against the same row
    pub async fn find_by_id_for_update_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        id: &str,
    ) -> Result<Option<ScheduledInstallment>> {
        let installment = sqlx::query_as::<_, ScheduledInstallment>(&format!(
            r#"
            SELECT {INSTALLMENT_COLUMNS}
            FROM scheduled_installments
            WHERE id = ?
            FOR UPDATE
            "#
        ))
        .bind(id)
        .fetch_optional(tx.as_mut())
        .await?;

        Ok(installment)
    }

    /// Every installment referencing a payment, locked for update
    pub async fn find_by_payment_for_update_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        payment_id: &str,
    ) -> Result<Vec<ScheduledInstallment>> {
        let installments = sqlx::query_as::<_, ScheduledInstallment>(&format!(
            r#"
            SELECT {INSTALLMENT_COLUMNS}
            FROM scheduled_installments
            WHERE payment_id = ?
            ORDER BY installment_number ASC
            FOR UPDATE
            "#
        ))
        .bind(payment_id)
        .fetch_all(tx.as_mut())
        .await?;

        Ok(installments)
    }

    /// Persist reconciliation state (status, paid amount, paid date, payment
    /// back-reference) within the caller's transaction
    pub async fn update_payment_state_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        installment: &ScheduledInstallment,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_installments
            SET
                status = ?,
                paid_amount = ?,
                paid_date = ?,
                payment_id = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(installment.status.to_string())
        .bind(installment.paid_amount)
        .bind(installment.paid_date)
        .bind(&installment.payment_id)
        .bind(installment.updated_at)
        .bind(&installment.id)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    /// Open installments (pending, partially paid, or overdue) due on or
    /// before the cutoff date, for the upcoming-payments view
    pub async fn find_open_due_before(
        &self,
        cutoff: NaiveDate,
    ) -> Result<Vec<ScheduledInstallment>> {
        let installments = sqlx::query_as::<_, ScheduledInstallment>(&format!(
            r#"
            SELECT {INSTALLMENT_COLUMNS}
            FROM scheduled_installments
            WHERE status IN ('pending', 'partially_paid', 'overdue')
              AND due_date <= ?
            ORDER BY due_date ASC, installment_number ASC
            "#
        ))
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(installments)
    }

    /// Flip pending installments whose due date has passed to overdue.
    /// Returns the number of rows updated.
    pub async fn mark_overdue_before(&self, today: NaiveDate) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE scheduled_installments
            SET status = 'overdue', updated_at = ?
            WHERE status = 'pending' AND due_date < ?
            "#,
        )
        .bind(chrono::Utc::now().naive_utc())
        .bind(today)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
