// Reconciliation between received payments and scheduled installments.
//
// Linking runs inside a transaction with a row lock on the installment, so
// two concurrent links against the same installment serialize instead of
// losing an update. A payment already linked to an installment is rejected
// rather than double-counted.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction};
use tracing::info;

use crate::core::{AppError, Clock, Result, SystemClock};
use crate::modules::installments::{
    models::ScheduledInstallment, repositories::InstallmentRepository,
};
use crate::modules::payments::{
    models::{Payment, PaymentMethod},
    repositories::PaymentRepository,
};

/// Service linking and unlinking payments against scheduled installments
pub struct ReconciliationService {
    pool: MySqlPool,
    installments: InstallmentRepository,
    payments: PaymentRepository,
    clock: Arc<dyn Clock>,
}

impl ReconciliationService {
    pub fn new(pool: MySqlPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: MySqlPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            installments: InstallmentRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool.clone()),
            pool,
            clock,
        }
    }

    /// Record a received payment and, when an installment is given, link it
    /// in the same transaction.
    pub async fn record_payment(
        &self,
        booking_id: String,
        installment_id: Option<String>,
        amount: Decimal,
        method: PaymentMethod,
        payment_date: NaiveDate,
        reference: Option<String>,
    ) -> Result<(Payment, Option<ScheduledInstallment>)> {
        let payment = Payment::new(booking_id, amount, method, payment_date, reference)?;

        let mut tx = self.pool.begin().await?;
        self.payments.insert_tx(&mut tx, &payment).await?;

        let linked = match installment_id {
            Some(installment_id) => Some(
                self.link_in_tx(&mut tx, &installment_id, &payment.id, payment.amount)
                    .await?,
            ),
            None => None,
        };

        tx.commit().await?;

        info!(
            payment_id = payment.id.as_str(),
            booking_id = payment.booking_id.as_str(),
            amount = %payment.amount,
            linked = linked.is_some(),
            "Payment recorded"
        );

        Ok((payment, linked))
    }

    /// Link an existing payment against an installment, applying the payment
    /// amount to the installment's paid state.
    pub async fn link_payment(
        &self,
        installment_id: &str,
        payment_id: &str,
    ) -> Result<ScheduledInstallment> {
        let payment = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Payment not found"))?;

        let mut tx = self.pool.begin().await?;
        let installment = self
            .link_in_tx(&mut tx, installment_id, payment_id, payment.amount)
            .await?;
        tx.commit().await?;

        Ok(installment)
    }

    /// Detach a payment from every installment referencing it, resetting
    /// their paid state.
    pub async fn unlink_payment(&self, payment_id: &str) -> Result<Vec<ScheduledInstallment>> {
        let mut tx = self.pool.begin().await?;
        let unlinked = self.unlink_in_tx(&mut tx, payment_id).await?;
        tx.commit().await?;

        Ok(unlinked)
    }

    /// Delete a payment, unlinking it from any installments first. Both run
    /// in one transaction so a failure leaves the payment and its links
    /// intact.
    pub async fn delete_payment(&self, payment_id: &str) -> Result<Vec<ScheduledInstallment>> {
        let mut tx = self.pool.begin().await?;

        let unlinked = self.unlink_in_tx(&mut tx, payment_id).await?;
        let deleted = self.payments.delete_tx(&mut tx, payment_id).await?;
        if deleted == 0 {
            return Err(AppError::not_found("Payment not found"));
        }

        tx.commit().await?;

        info!(
            payment_id = payment_id,
            unlinked = unlinked.len(),
            "Payment deleted"
        );

        Ok(unlinked)
    }

    async fn link_in_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        installment_id: &str,
        payment_id: &str,
        amount: Decimal,
    ) -> Result<ScheduledInstallment> {
        let mut installment = self
            .installments
            .find_by_id_for_update_tx(tx, installment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Installment not found"))?;

        installment.apply_payment(payment_id, amount, self.clock.today())?;
        self.installments
            .update_payment_state_tx(tx, &installment)
            .await?;

        info!(
            installment_id = installment_id,
            payment_id = payment_id,
            amount = %amount,
            status = %installment.status,
            "Payment linked to installment"
        );

        Ok(installment)
    }

    async fn unlink_in_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        payment_id: &str,
    ) -> Result<Vec<ScheduledInstallment>> {
        let installments = self
            .installments
            .find_by_payment_for_update_tx(tx, payment_id)
            .await?;

        let today = self.clock.today();
        let mut unlinked = Vec::with_capacity(installments.len());

        for mut installment in installments {
            installment.clear_payment(today);
            self.installments
                .update_payment_state_tx(tx, &installment)
                .await?;

            info!(
                installment_id = installment.id.as_str(),
                payment_id = payment_id,
                status = %installment.status,
                "Payment unlinked from installment"
            );

            unlinked.push(installment);
        }

        Ok(unlinked)
    }
}
