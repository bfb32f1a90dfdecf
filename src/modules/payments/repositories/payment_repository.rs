// MySQL persistence for payments.

use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::Result;
use crate::modules::payments::models::Payment;

/// Repository for payment database operations
pub struct PaymentRepository {
    pool: MySqlPool,
}

impl PaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a payment within the caller's transaction
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        payment: &Payment,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, booking_id, amount, method, payment_date,
                reference, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.booking_id)
        .bind(payment.amount)
        .bind(payment.method.to_string())
        .bind(payment.payment_date)
        .bind(&payment.reference)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    /// Find a payment by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT
                id, booking_id, amount, method, payment_date,
                reference, created_at, updated_at
            FROM payments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Delete a payment within the caller's transaction; returns the number
    /// of rows removed
    pub async fn delete_tx(&self, tx: &mut Transaction<'_, MySql>, id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(id)
            .execute(tx.as_mut())
            .await?;

        Ok(result.rows_affected())
    }
}
