use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{round2, AppError, Result};

/// One dated, amount-bearing obligation derived from a booking's payment plan
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduledInstallment {
    pub id: String,
    pub booking_id: String,
    /// Sequential number (1, 2, 3...), unique within a booking
    pub installment_number: i32,
    /// Payment due date
    pub due_date: NaiveDate,
    /// Amount owed for this installment
    pub amount: Decimal,
    /// Current status
    #[sqlx(try_from = "String")]
    pub status: InstallmentStatus,
    /// Cumulative amount applied through reconciliation
    pub paid_amount: Decimal,
    /// Date the paid amount last changed
    pub paid_date: Option<NaiveDate>,
    /// Most recently linked payment
    pub payment_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Installment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    /// Not yet paid
    Pending,
    /// Partially covered by a linked payment
    PartiallyPaid,
    /// Fully covered
    Paid,
    /// Due date passed without full payment
    Overdue,
}

impl InstallmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for InstallmentStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "partially_paid" => Ok(Self::PartiallyPaid),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            _ => Err(format!("Invalid installment status: {}", value)),
        }
    }
}

impl ScheduledInstallment {
    /// Create a new pending installment
    ///
    /// # Arguments
    /// * `booking_id` - Owning booking ID
    /// * `installment_number` - Sequential number (1-based)
    /// * `due_date` - Payment due date
    /// * `amount` - Amount owed for this installment
    pub fn new(
        booking_id: String,
        installment_number: i32,
        due_date: NaiveDate,
        amount: Decimal,
    ) -> Result<Self> {
        if installment_number < 1 {
            return Err(AppError::validation(format!(
                "Installment number must be at least 1, got {}",
                installment_number
            )));
        }

        if amount < Decimal::ZERO {
            return Err(AppError::validation(
                "Installment amount cannot be negative",
            ));
        }

        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            booking_id,
            installment_number,
            due_date,
            amount,
            status: InstallmentStatus::Pending,
            paid_amount: Decimal::ZERO,
            paid_date: None,
            payment_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a payment against this installment.
    ///
    /// Adds the payment amount to the cumulative paid amount and derives the
    /// new status: `paid` once the installment amount is covered,
    /// `partially_paid` otherwise. A payment already linked to this
    /// installment is rejected so a repeated call cannot double-count.
    pub fn apply_payment(
        &mut self,
        payment_id: &str,
        amount: Decimal,
        today: NaiveDate,
    ) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation("Payment amount must be positive"));
        }

        if self.payment_id.as_deref() == Some(payment_id) {
            return Err(AppError::conflict(format!(
                "Payment {} is already linked to installment {}",
                payment_id, self.installment_number
            )));
        }

        let new_paid = round2(self.paid_amount + amount);

        self.status = if new_paid >= self.amount {
            InstallmentStatus::Paid
        } else {
            InstallmentStatus::PartiallyPaid
        };
        self.paid_amount = new_paid;
        self.paid_date = Some(today);
        self.payment_id = Some(payment_id.to_string());
        self.updated_at = chrono::Utc::now().naive_utc();

        Ok(())
    }

    /// Remove any applied payment from this installment.
    ///
    /// Resets the paid amount and back-reference, then recomputes status from
    /// the due date: `overdue` when already past due, `pending` otherwise.
    pub fn clear_payment(&mut self, today: NaiveDate) {
        self.paid_amount = Decimal::ZERO;
        self.paid_date = None;
        self.payment_id = None;
        self.status = if self.due_date < today {
            InstallmentStatus::Overdue
        } else {
            InstallmentStatus::Pending
        };
        self.updated_at = chrono::Utc::now().naive_utc();
    }

    /// Amount still owed on this installment
    pub fn outstanding(&self) -> Decimal {
        (self.amount - self.paid_amount).max(Decimal::ZERO)
    }

    /// Check if installment is past its due date and not fully paid
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        if self.status == InstallmentStatus::Paid {
            return false;
        }

        self.due_date < today
    }
}
