//! Payment business logic - registering and removing payments against commitments.
//!
//! Both operations run inside one database transaction: the commitment is re-read, the
//! pure ledger functions compute the new aggregates, and the commitment write is guarded
//! by its row version. Either both the payment row and the commitment aggregates change,
//! or neither does.

use crate::{
    core::{
        commitment::{self, page_bounds},
        ledger::{self, AuditStamp, NewPayment, PaymentRegistration},
    },
    entities::{Pagamento, compromisso, pagamento},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::Deserialize;

/// Filters and pagination for [`list_payments`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuery {
    /// Only payments of this commitment
    pub compromisso_id: Option<String>,
    /// Inclusive lower date bound
    pub data_inicio: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub data_fim: Option<NaiveDate>,
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size
    pub limit: Option<u64>,
}

/// Registers a payment and updates its commitment's aggregates atomically.
///
/// # Errors
/// Returns an error if:
/// - The commitment does not exist
/// - The payment method is empty
/// - The ledger rejects the amount (see [`ledger::register_payment`])
/// - The commitment was modified concurrently
/// - The database write fails
pub async fn register_payment(
    db: &DatabaseConnection,
    new_payment: NewPayment,
    audit: &AuditStamp,
) -> Result<PaymentRegistration> {
    if new_payment.forma_pagamento.trim().is_empty() {
        return Err(Error::validation("Payment method is required"));
    }

    let txn = db.begin().await?;
    let current = commitment::require_commitment(&txn, &new_payment.compromisso_id).await?;
    let registration = apply_payment(&txn, &current, &new_payment, audit).await?;
    txn.commit().await?;

    tracing::info!(
        compromisso_id = %registration.compromisso.id,
        pagamento_id = %registration.pagamento.id,
        valor = %registration.pagamento.valor,
        status = registration.compromisso.status.label(),
        "Payment registered"
    );
    Ok(registration)
}

/// Validates `new_payment` against the `current` snapshot and writes both records through `db`.
///
/// The commitment write fails with [`Error::ConcurrentModification`] if the stored row has
/// moved past `current.versao`; the payment row is then never inserted.
async fn apply_payment<C>(
    db: &C,
    current: &compromisso::Model,
    new_payment: &NewPayment,
    audit: &AuditStamp,
) -> Result<PaymentRegistration>
where
    C: ConnectionTrait,
{
    let existing = commitment::payments_of(db, &current.id).await?;
    let registration = ledger::register_payment(current, &existing, new_payment, audit)
        .inspect_err(|e| {
            tracing::warn!(
                compromisso_id = %current.id,
                valor = %new_payment.valor,
                error = %e,
                "Payment rejected"
            );
        })?;

    commitment::save_versioned(db, current.versao, &registration.compromisso).await?;
    insert_payment(db, &registration.pagamento).await?;
    Ok(registration)
}

async fn insert_payment<C>(db: &C, payment: &pagamento::Model) -> Result<pagamento::Model>
where
    C: ConnectionTrait,
{
    let model = pagamento::ActiveModel {
        id: Set(payment.id.clone()),
        compromisso_id: Set(payment.compromisso_id.clone()),
        data_pagamento: Set(payment.data_pagamento),
        valor: Set(payment.valor),
        forma_pagamento: Set(payment.forma_pagamento.clone()),
        categoria_id: Set(payment.categoria_id.clone()),
        observacoes: Set(payment.observacoes.clone()),
        comprovante: Set(payment.comprovante.clone()),
        data_criacao: Set(payment.data_criacao),
        criado_por: Set(payment.criado_por.clone()),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Deletes a payment and recomputes its commitment's aggregates from the remaining payments.
///
/// Returns the commitment as it stands after the removal.
pub async fn delete_payment(
    db: &DatabaseConnection,
    payment_id: &str,
    audit: &AuditStamp,
) -> Result<compromisso::Model> {
    let txn = db.begin().await?;

    let payment = Pagamento::find_by_id(payment_id.to_string())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Pagamento", payment_id))?;
    let compromisso_id = payment.compromisso_id.clone();

    payment.delete(&txn).await?;

    let current = commitment::require_commitment(&txn, &compromisso_id).await?;
    let remaining = commitment::payments_of(&txn, &compromisso_id).await?;
    let aggregates = ledger::recompute_aggregates(current.valor, &remaining);
    let updated = ledger::with_aggregates(&current, aggregates, audit);

    commitment::save_versioned(&txn, current.versao, &updated).await?;
    txn.commit().await?;

    tracing::info!(
        pagamento_id = %payment_id,
        compromisso_id = %compromisso_id,
        status = updated.status.label(),
        "Payment deleted"
    );
    Ok(updated)
}

/// Finds a payment by id.
pub async fn get_payment_by_id(
    db: &DatabaseConnection,
    payment_id: &str,
) -> Result<Option<pagamento::Model>> {
    Pagamento::find_by_id(payment_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all payments of one commitment, most recent first.
pub async fn list_payments_for_commitment(
    db: &DatabaseConnection,
    compromisso_id: &str,
) -> Result<Vec<pagamento::Model>> {
    commitment::payments_of(db, compromisso_id).await
}

/// Lists payments matching `query`, most recent first.
pub async fn list_payments(
    db: &DatabaseConnection,
    query: &PaymentQuery,
) -> Result<Vec<pagamento::Model>> {
    let mut select = Pagamento::find();

    if let Some(compromisso_id) = query.compromisso_id.as_deref().filter(|s| !s.is_empty()) {
        select = select.filter(pagamento::Column::CompromissoId.eq(compromisso_id));
    }
    if let Some(from) = query.data_inicio {
        select = select.filter(pagamento::Column::DataPagamento.gte(from));
    }
    if let Some(to) = query.data_fim {
        select = select.filter(pagamento::Column::DataPagamento.lte(to));
    }

    let (offset, limit) = page_bounds(query.page, query.limit);
    select
        .order_by_desc(pagamento::Column::DataPagamento)
        .order_by_asc(pagamento::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every payment without pagination, for the feed.
pub async fn all_payments(db: &DatabaseConnection) -> Result<Vec<pagamento::Model>> {
    Pagamento::find()
        .order_by_desc(pagamento::Column::DataPagamento)
        .all(db)
        .await
        .map_err(Into::into)
}
