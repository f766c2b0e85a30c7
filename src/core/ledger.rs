//! Ledger reconciliation - keeps a commitment's aggregates consistent with its payments.
//!
//! Everything here is pure and synchronous: functions take borrowed models and return new
//! ones, and never touch the database. [`crate::core::payment`] wraps them in a database
//! transaction so the updated commitment and the new payment are written together.
//!
//! Invariant maintained for every commitment: `valor_pago + valor_pendente == valor`,
//! with both sides non-negative.

use crate::{
    entities::{StatusCompromisso, TipoCompromisso, compromisso, pagamento},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outstanding balances at or below this are treated as fully paid (half a cent).
pub const SETTLED_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Maximum drift accepted between `valor` and `valor_pago + valor_pendente`.
pub const INVARIANT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Amounts must stay below this (10^13) to be stored without losing cents.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_316_134_912, 2328, 0, false, 0);

/// Who performed a write and when, copied into the audit columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamp {
    /// Acting user
    pub user: String,
    /// Time of the write
    pub at: DateTime<Utc>,
}

impl AuditStamp {
    /// Stamp for `user` at the current time.
    pub fn now(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            at: Utc::now(),
        }
    }
}

/// A payment the user wants to register, before it is validated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    /// Commitment being paid
    pub compromisso_id: String,
    /// Date the money moved
    pub data_pagamento: NaiveDate,
    /// Amount to pay
    pub valor: Decimal,
    /// Payment method label
    pub forma_pagamento: String,
    /// Optional category
    #[serde(default)]
    pub categoria_id: Option<String>,
    /// Free-form notes
    #[serde(default)]
    pub observacoes: Option<String>,
    /// Reference to an uploaded receipt
    #[serde(default)]
    pub comprovante: Option<String>,
}

/// Result of a successful registration: both records the caller must persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRegistration {
    /// Commitment with new aggregates, audit fields and version
    pub compromisso: compromisso::Model,
    /// Payment record to insert
    pub pagamento: pagamento::Model,
}

/// The three derived fields of a commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregates {
    /// Sum of payments
    pub valor_pago: Decimal,
    /// Total minus paid
    pub valor_pendente: Decimal,
    /// Status derived from the two amounts
    pub status: StatusCompromisso,
}

/// Totals over a set of commitments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Sum of `valor` over investment commitments
    pub total_investimentos: Decimal,
    /// Sum of `valor` over reimbursement commitments
    pub total_ressarcimentos: Decimal,
    /// Sum of `valor_pago` over all commitments
    pub total_pago: Decimal,
    /// Sum of `valor_pendente` over all commitments
    pub total_pendente: Decimal,
}

/// Checks that `valor` is positive, below [`MAX_AMOUNT`] and has at most two decimal places.
///
/// # Errors
/// [`Error::InvalidAmount`] otherwise.
pub fn validate_amount(valor: Decimal) -> Result<()> {
    if valor <= Decimal::ZERO || valor >= MAX_AMOUNT || valor.normalize().scale() > 2 {
        return Err(Error::InvalidAmount { amount: valor });
    }
    Ok(())
}

/// Derives the settlement status from the total and the amount paid so far.
#[must_use]
pub fn derive_status(valor: Decimal, valor_pago: Decimal) -> StatusCompromisso {
    let valor_pendente = valor - valor_pago;
    if valor_pendente <= SETTLED_TOLERANCE {
        StatusCompromisso::PagoIntegralmente
    } else if valor_pago > Decimal::ZERO {
        StatusCompromisso::PagoParcialmente
    } else {
        StatusCompromisso::Pendente
    }
}

/// Aggregates for a freshly created commitment: nothing paid.
#[must_use]
pub fn initial_aggregates(valor: Decimal) -> Aggregates {
    Aggregates {
        valor_pago: Decimal::ZERO,
        valor_pendente: valor,
        status: derive_status(valor, Decimal::ZERO),
    }
}

/// Recomputes the aggregates from the authoritative list of payments.
///
/// Used whenever payments are removed, so there is no compensating arithmetic to get wrong.
#[must_use]
pub fn recompute_aggregates(valor: Decimal, payments: &[pagamento::Model]) -> Aggregates {
    let valor_pago: Decimal = payments.iter().map(|p| p.valor).sum();
    Aggregates {
        valor_pago,
        valor_pendente: (valor - valor_pago).max(Decimal::ZERO),
        status: derive_status(valor, valor_pago),
    }
}

/// Returns a copy of `commitment` carrying `aggregates`, with audit fields refreshed and the
/// row version bumped.
#[must_use]
pub fn with_aggregates(
    commitment: &compromisso::Model,
    aggregates: Aggregates,
    audit: &AuditStamp,
) -> compromisso::Model {
    compromisso::Model {
        valor_pago: aggregates.valor_pago,
        valor_pendente: aggregates.valor_pendente,
        status: aggregates.status,
        versao: commitment.versao + 1,
        data_atualizacao: audit.at,
        atualizado_por: audit.user.clone(),
        ..commitment.clone()
    }
}

/// Validates `new_payment` against `commitment` and computes both records to persist.
///
/// `existing_payments` are the commitment's current payments; when their sum disagrees with
/// the stored `valor_pago` a warning is logged, but the stored aggregate stays authoritative.
///
/// # Errors
/// - [`Error::InvalidAmount`] when the amount fails [`validate_amount`]
/// - [`Error::CommitmentAlreadySettled`] when nothing is left to pay
/// - [`Error::ExceedsOutstandingBalance`] when the amount is above `valor_pendente`
/// - [`Error::Validation`] when the payment targets another commitment
pub fn register_payment(
    commitment: &compromisso::Model,
    existing_payments: &[pagamento::Model],
    new_payment: &NewPayment,
    audit: &AuditStamp,
) -> Result<PaymentRegistration> {
    validate_amount(new_payment.valor)?;

    if new_payment.compromisso_id != commitment.id {
        return Err(Error::validation(format!(
            "payment targets commitment {} but {} was given",
            new_payment.compromisso_id, commitment.id
        )));
    }

    if commitment.valor_pendente <= SETTLED_TOLERANCE {
        return Err(Error::CommitmentAlreadySettled {
            id: commitment.id.clone(),
        });
    }

    if new_payment.valor > commitment.valor_pendente {
        return Err(Error::ExceedsOutstandingBalance {
            amount: new_payment.valor,
            outstanding: commitment.valor_pendente,
        });
    }

    let paid_by_rows: Decimal = existing_payments.iter().map(|p| p.valor).sum();
    if (paid_by_rows - commitment.valor_pago).abs() > INVARIANT_TOLERANCE {
        tracing::warn!(
            compromisso_id = %commitment.id,
            stored = %commitment.valor_pago,
            from_payments = %paid_by_rows,
            "Stored valor_pago disagrees with payment rows"
        );
    }

    let novo_valor_pago = commitment.valor_pago + new_payment.valor;
    // Recomputed from the total so rounding never accumulates.
    let novo_valor_pendente = (commitment.valor - novo_valor_pago).max(Decimal::ZERO);
    let aggregates = Aggregates {
        valor_pago: novo_valor_pago,
        valor_pendente: novo_valor_pendente,
        status: derive_status(commitment.valor, novo_valor_pago),
    };

    let pagamento = pagamento::Model {
        id: uuid::Uuid::new_v4().to_string(),
        compromisso_id: commitment.id.clone(),
        data_pagamento: new_payment.data_pagamento,
        valor: new_payment.valor,
        forma_pagamento: new_payment.forma_pagamento.trim().to_string(),
        categoria_id: new_payment.categoria_id.clone(),
        observacoes: new_payment.observacoes.clone(),
        comprovante: new_payment.comprovante.clone(),
        data_criacao: audit.at,
        criado_por: audit.user.clone(),
    };

    Ok(PaymentRegistration {
        compromisso: with_aggregates(commitment, aggregates, audit),
        pagamento,
    })
}

/// Whether `valor_pago + valor_pendente == valor` within [`INVARIANT_TOLERANCE`] and
/// neither side is negative.
#[must_use]
pub fn check_invariant(commitment: &compromisso::Model) -> bool {
    commitment.valor_pago >= Decimal::ZERO
        && commitment.valor_pendente >= Decimal::ZERO
        && (commitment.valor_pago + commitment.valor_pendente - commitment.valor).abs()
            <= INVARIANT_TOLERANCE
}

/// Totals per commitment type plus paid/pending totals. Empty input gives all zeros.
#[must_use]
pub fn compute_summary(commitments: &[compromisso::Model]) -> Summary {
    commitments.iter().fold(Summary::default(), |mut acc, c| {
        match c.tipo_compromisso {
            TipoCompromisso::Investimento => acc.total_investimentos += c.valor,
            TipoCompromisso::Ressarcimento => acc.total_ressarcimentos += c.valor,
        }
        acc.total_pago += c.valor_pago;
        acc.total_pendente += c.valor_pendente;
        acc
    })
}

/// Investments as a percentage of sales. Zero when there are no sales.
#[must_use]
pub fn compute_roi(total_investimentos: Decimal, total_vendas: Decimal) -> Decimal {
    if total_vendas <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    total_investimentos
        .checked_div(total_vendas)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{sample_commitment, sample_new_payment};

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn audit() -> AuditStamp {
        AuditStamp::now("tester")
    }

    #[test]
    fn test_derive_status() {
        assert_eq!(derive_status(dec(1000), dec(0)), StatusCompromisso::Pendente);
        assert_eq!(
            derive_status(dec(1000), dec(1)),
            StatusCompromisso::PagoParcialmente
        );
        assert_eq!(
            derive_status(dec(1000), dec(1000)),
            StatusCompromisso::PagoIntegralmente
        );
        // Less than half a cent pending counts as paid
        assert_eq!(
            derive_status(Decimal::new(100_004, 3), dec(100)),
            StatusCompromisso::PagoIntegralmente
        );
        assert_eq!(
            derive_status(Decimal::new(10001, 2), dec(100)),
            StatusCompromisso::PagoParcialmente
        );
    }

    #[test]
    fn test_initial_aggregates() {
        let aggregates = initial_aggregates(dec(250));
        assert_eq!(aggregates.valor_pago, Decimal::ZERO);
        assert_eq!(aggregates.valor_pendente, dec(250));
        assert_eq!(aggregates.status, StatusCompromisso::Pendente);
    }

    #[test]
    fn test_partial_then_full_payment() {
        let commitment = sample_commitment("c1", dec(1000));
        assert_eq!(commitment.status, StatusCompromisso::Pendente);

        let first =
            register_payment(&commitment, &[], &sample_new_payment("c1", dec(400)), &audit())
                .unwrap();
        assert_eq!(first.compromisso.valor_pago, dec(400));
        assert_eq!(first.compromisso.valor_pendente, dec(600));
        assert_eq!(first.compromisso.status, StatusCompromisso::PagoParcialmente);
        assert_eq!(first.compromisso.versao, commitment.versao + 1);
        assert_eq!(first.pagamento.compromisso_id, "c1");
        assert_eq!(first.pagamento.valor, dec(400));

        let second = register_payment(
            &first.compromisso,
            &[first.pagamento.clone()],
            &sample_new_payment("c1", dec(600)),
            &audit(),
        )
        .unwrap();
        assert_eq!(second.compromisso.valor_pago, dec(1000));
        assert_eq!(second.compromisso.valor_pendente, Decimal::ZERO);
        assert_eq!(
            second.compromisso.status,
            StatusCompromisso::PagoIntegralmente
        );
    }

    #[test]
    fn test_exact_payment_settles() {
        let commitment = sample_commitment("c1", Decimal::new(12345, 2));
        let result = register_payment(
            &commitment,
            &[],
            &sample_new_payment("c1", Decimal::new(12345, 2)),
            &audit(),
        )
        .unwrap();
        assert_eq!(result.compromisso.valor_pendente, Decimal::ZERO);
        assert_eq!(
            result.compromisso.status,
            StatusCompromisso::PagoIntegralmente
        );
    }

    #[test]
    fn test_overpayment_rejected() {
        let commitment = sample_commitment("c1", dec(500));
        let before = commitment.clone();

        let result =
            register_payment(&commitment, &[], &sample_new_payment("c1", dec(600)), &audit());
        assert!(matches!(
            result.unwrap_err(),
            Error::ExceedsOutstandingBalance { amount, outstanding }
                if amount == dec(600) && outstanding == dec(500)
        ));
        assert_eq!(commitment, before);
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let commitment = sample_commitment("c1", dec(500));
        for amount in [Decimal::ZERO, dec(-10)] {
            let result =
                register_payment(&commitment, &[], &sample_new_payment("c1", amount), &audit());
            assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        }
    }

    #[test]
    fn test_validate_amount_bounds() {
        assert!(validate_amount(Decimal::new(1, 2)).is_ok());
        assert!(validate_amount(Decimal::new(99_999_999_999_999, 2)).is_ok());
        // Trailing zeros do not count as precision
        assert!(validate_amount(Decimal::new(1010, 3)).is_ok());

        for amount in [
            Decimal::ZERO,
            MAX_AMOUNT,
            Decimal::new(1001, 3),
            Decimal::new(123_456_789_012_345_678, 2),
        ] {
            assert!(matches!(
                validate_amount(amount).unwrap_err(),
                Error::InvalidAmount { .. }
            ));
        }
    }

    #[test]
    fn test_sub_cent_payment_rejected() {
        let commitment = sample_commitment("c1", dec(500));
        let result = register_payment(
            &commitment,
            &[],
            &sample_new_payment("c1", Decimal::new(10_005, 3)),
            &audit(),
        );
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
    }

    #[test]
    fn test_settled_commitment_rejects_payment() {
        let commitment = sample_commitment("c1", dec(100));
        let payment = sample_new_payment("c1", dec(100));
        let settled = register_payment(&commitment, &[], &payment, &audit())
            .unwrap()
            .compromisso;

        let result =
            register_payment(&settled, &[], &sample_new_payment("c1", dec(1)), &audit());
        assert!(matches!(
            result.unwrap_err(),
            Error::CommitmentAlreadySettled { id } if id == "c1"
        ));
    }

    #[test]
    fn test_payment_for_other_commitment_rejected() {
        let commitment = sample_commitment("c1", dec(100));
        let result =
            register_payment(&commitment, &[], &sample_new_payment("c2", dec(10)), &audit());
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
    }

    #[test]
    fn test_invariant_holds_over_payment_sequence() {
        let mut commitment = sample_commitment("c1", Decimal::new(100_000, 2));
        let mut payments = Vec::new();
        let amounts = [
            Decimal::new(3333, 2),
            Decimal::new(1, 2),
            Decimal::new(25_000, 2),
            Decimal::new(9999, 2),
            Decimal::new(50_000, 2),
        ];

        for amount in amounts {
            let payment = sample_new_payment("c1", amount);
            let registration =
                register_payment(&commitment, &payments, &payment, &audit()).unwrap();
            commitment = registration.compromisso;
            payments.push(registration.pagamento);
            assert!(check_invariant(&commitment));
            assert_eq!(commitment.status, StatusCompromisso::PagoParcialmente);
        }

        let rest = commitment.valor_pendente;
        let payment = sample_new_payment("c1", rest);
        let last = register_payment(&commitment, &payments, &payment, &audit()).unwrap();
        assert!(check_invariant(&last.compromisso));
        assert_eq!(last.compromisso.status, StatusCompromisso::PagoIntegralmente);
    }

    #[test]
    fn test_recompute_aggregates_after_removal() {
        let commitment = sample_commitment("c1", dec(1000));
        let payment = sample_new_payment("c1", dec(400));
        let first = register_payment(&commitment, &[], &payment, &audit()).unwrap();
        let second = register_payment(
            &first.compromisso,
            &[first.pagamento.clone()],
            &sample_new_payment("c1", dec(600)),
            &audit(),
        )
        .unwrap();

        let remaining = [second.pagamento];
        let aggregates = recompute_aggregates(commitment.valor, &remaining);
        assert_eq!(aggregates.valor_pago, dec(600));
        assert_eq!(aggregates.valor_pendente, dec(400));
        assert_eq!(aggregates.status, StatusCompromisso::PagoParcialmente);

        let none = recompute_aggregates(commitment.valor, &[]);
        assert_eq!(none, initial_aggregates(commitment.valor));
    }

    #[test]
    fn test_check_invariant_detects_drift() {
        let mut commitment = sample_commitment("c1", dec(100));
        assert!(check_invariant(&commitment));
        commitment.valor_pago = dec(10);
        assert!(!check_invariant(&commitment));
    }

    #[test]
    fn test_compute_summary() {
        let mut investment = sample_commitment("c1", dec(100));
        investment.valor_pago = dec(50);
        investment.valor_pendente = dec(50);

        let mut reimbursement = sample_commitment("c2", dec(200));
        reimbursement.tipo_compromisso = TipoCompromisso::Ressarcimento;
        reimbursement.valor_pago = dec(200);
        reimbursement.valor_pendente = Decimal::ZERO;

        let commitments = vec![investment, reimbursement];
        let summary = compute_summary(&commitments);
        assert_eq!(
            summary,
            Summary {
                total_investimentos: dec(100),
                total_ressarcimentos: dec(200),
                total_pago: dec(250),
                total_pendente: dec(50),
            }
        );

        // Pure: same input, same output
        assert_eq!(compute_summary(&commitments), summary);
    }

    #[test]
    fn test_compute_summary_empty() {
        assert_eq!(compute_summary(&[]), Summary::default());
    }

    #[test]
    fn test_compute_roi() {
        assert_eq!(compute_roi(dec(100), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(compute_roi(dec(100), dec(400)), dec(25));
        assert_eq!(compute_roi(Decimal::ZERO, dec(400)), Decimal::ZERO);
        assert_eq!(compute_roi(dec(100), dec(-5)), Decimal::ZERO);
    }
}
