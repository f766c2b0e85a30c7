//! Commitment business logic - creating, listing, editing and deleting commitments.
//!
//! Aggregate fields are never accepted from callers: they start from
//! [`ledger::initial_aggregates`] and are afterwards only changed by payment registration,
//! payment deletion or a change of the total. Every write that touches them goes through
//! [`save_versioned`], a compare-and-swap on the `versao` column, so two sessions editing the
//! same commitment cannot silently overwrite each other.

use crate::{
    core::ledger::{self, AuditStamp},
    entities::{
        Cliente, Compromisso, Pagamento, StatusCompromisso, TipoCompromisso, compromisso,
        pagamento,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{Condition, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::Deserialize;

/// Default page size for list queries
pub const DEFAULT_PAGE_SIZE: u64 = 50;
/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: u64 = 500;
/// Offsets are bound as signed 64-bit integers
const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

/// Input for a new commitment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommitment {
    /// Owning customer
    pub cliente_id: String,
    /// Commitment date
    pub data: NaiveDate,
    /// Total amount, positive
    pub valor: Decimal,
    /// Short title, required
    pub titulo: String,
    /// Free-form description
    #[serde(default)]
    pub descricao: String,
    /// Investment or reimbursement
    pub tipo_compromisso: TipoCompromisso,
    /// Optional category
    #[serde(default)]
    pub categoria_id: Option<String>,
}

/// Partial update of a commitment's descriptive fields and total
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentUpdate {
    /// New commitment date
    pub data: Option<NaiveDate>,
    /// New total; aggregates are recomputed
    pub valor: Option<Decimal>,
    /// New title
    pub titulo: Option<String>,
    /// New description
    pub descricao: Option<String>,
    /// New commitment type
    pub tipo_compromisso: Option<TipoCompromisso>,
    /// `Some(None)` clears the category
    #[serde(default, deserialize_with = "deserialize_some")]
    pub categoria_id: Option<Option<String>>,
}

fn deserialize_some<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Filters and pagination for [`list_commitments`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentQuery {
    /// Only this customer
    pub cliente_id: Option<String>,
    /// Only this status
    pub status: Option<StatusCompromisso>,
    /// Inclusive lower date bound
    pub data_inicio: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub data_fim: Option<NaiveDate>,
    /// Case-insensitive match on title or description
    pub search: Option<String>,
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size
    pub limit: Option<u64>,
}

/// Resolves `page`/`limit` into `(offset, limit)`, clamping the limit.
#[must_use]
pub fn page_bounds(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = page
        .unwrap_or(1)
        .saturating_sub(1)
        .saturating_mul(limit)
        .min(MAX_OFFSET);
    (offset, limit)
}

fn validate_title(titulo: &str) -> Result<()> {
    if titulo.trim().is_empty() {
        return Err(Error::validation("Commitment title cannot be empty"));
    }
    Ok(())
}

/// Creates a commitment for an existing customer with nothing paid yet.
///
/// # Errors
/// Returns an error if:
/// - The total is not a positive amount in cents below [`ledger::MAX_AMOUNT`]
/// - The title is empty
/// - The customer does not exist
pub async fn create_commitment(
    db: &DatabaseConnection,
    input: NewCommitment,
    audit: &AuditStamp,
) -> Result<compromisso::Model> {
    ledger::validate_amount(input.valor)?;
    validate_title(&input.titulo)?;

    Cliente::find_by_id(input.cliente_id.clone())
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Cliente", input.cliente_id.clone()))?;

    let aggregates = ledger::initial_aggregates(input.valor);
    let model = compromisso::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        cliente_id: Set(input.cliente_id),
        data: Set(input.data),
        valor: Set(input.valor),
        titulo: Set(input.titulo.trim().to_string()),
        descricao: Set(input.descricao),
        tipo_compromisso: Set(input.tipo_compromisso),
        categoria_id: Set(input.categoria_id),
        valor_pago: Set(aggregates.valor_pago),
        valor_pendente: Set(aggregates.valor_pendente),
        status: Set(aggregates.status),
        versao: Set(1),
        data_criacao: Set(audit.at),
        criado_por: Set(audit.user.clone()),
        data_atualizacao: Set(audit.at),
        atualizado_por: Set(audit.user.clone()),
    };

    let created = model.insert(db).await?;
    tracing::info!(
        compromisso_id = %created.id,
        cliente_id = %created.cliente_id,
        valor = %created.valor,
        "Commitment created"
    );
    Ok(created)
}

/// Finds a commitment by id.
pub async fn get_commitment_by_id<C>(db: &C, id: &str) -> Result<Option<compromisso::Model>>
where
    C: ConnectionTrait,
{
    Compromisso::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a commitment by id, failing with [`Error::NotFound`] when absent.
pub async fn require_commitment<C>(db: &C, id: &str) -> Result<compromisso::Model>
where
    C: ConnectionTrait,
{
    get_commitment_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("Compromisso", id))
}

/// Lists commitments matching `query`, most recent first.
pub async fn list_commitments(
    db: &DatabaseConnection,
    query: &CommitmentQuery,
) -> Result<Vec<compromisso::Model>> {
    let mut select = Compromisso::find();

    if let Some(cliente_id) = query.cliente_id.as_deref().filter(|s| !s.is_empty()) {
        select = select.filter(compromisso::Column::ClienteId.eq(cliente_id));
    }
    if let Some(status) = query.status {
        select = select.filter(compromisso::Column::Status.eq(status));
    }
    if let Some(from) = query.data_inicio {
        select = select.filter(compromisso::Column::Data.gte(from));
    }
    if let Some(to) = query.data_fim {
        select = select.filter(compromisso::Column::Data.lte(to));
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        select = select.filter(
            Condition::any()
                .add(compromisso::Column::Titulo.contains(search))
                .add(compromisso::Column::Descricao.contains(search)),
        );
    }

    let (offset, limit) = page_bounds(query.page, query.limit);
    let items = select
        .order_by_desc(compromisso::Column::Data)
        .order_by_asc(compromisso::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;

    tracing::debug!(count = items.len(), "Listed commitments");
    Ok(items)
}

/// Lists every commitment without pagination, for reports and the feed.
pub async fn all_commitments(db: &DatabaseConnection) -> Result<Vec<compromisso::Model>> {
    Compromisso::find()
        .order_by_desc(compromisso::Column::Data)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Writes every column of `updated` if the stored row is still at `expected_version`.
///
/// # Errors
/// [`Error::ConcurrentModification`] when another writer got there first.
pub async fn save_versioned<C>(
    db: &C,
    expected_version: i32,
    updated: &compromisso::Model,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let changes = compromisso::ActiveModel {
        cliente_id: Set(updated.cliente_id.clone()),
        data: Set(updated.data),
        valor: Set(updated.valor),
        titulo: Set(updated.titulo.clone()),
        descricao: Set(updated.descricao.clone()),
        tipo_compromisso: Set(updated.tipo_compromisso),
        categoria_id: Set(updated.categoria_id.clone()),
        valor_pago: Set(updated.valor_pago),
        valor_pendente: Set(updated.valor_pendente),
        status: Set(updated.status),
        versao: Set(updated.versao),
        data_atualizacao: Set(updated.data_atualizacao),
        atualizado_por: Set(updated.atualizado_por.clone()),
        ..Default::default()
    };

    let result = Compromisso::update_many()
        .set(changes)
        .filter(compromisso::Column::Id.eq(updated.id.as_str()))
        .filter(compromisso::Column::Versao.eq(expected_version))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        tracing::warn!(
            compromisso_id = %updated.id,
            expected_version,
            "Commitment changed since it was read"
        );
        return Err(Error::ConcurrentModification {
            id: updated.id.clone(),
        });
    }
    Ok(())
}

/// Edits a commitment. Changing the total recomputes the aggregates from the payments.
///
/// # Errors
/// Returns an error if:
/// - The commitment does not exist
/// - The new title is empty or the new total is not positive
/// - The new total is below what has already been paid
/// - The row was modified concurrently
pub async fn update_commitment(
    db: &DatabaseConnection,
    id: &str,
    changes: CommitmentUpdate,
    audit: &AuditStamp,
) -> Result<compromisso::Model> {
    let txn = db.begin().await?;
    let current = require_commitment(&txn, id).await?;
    let mut updated = current.clone();

    if let Some(titulo) = changes.titulo {
        validate_title(&titulo)?;
        updated.titulo = titulo.trim().to_string();
    }
    if let Some(descricao) = changes.descricao {
        updated.descricao = descricao;
    }
    if let Some(data) = changes.data {
        updated.data = data;
    }
    if let Some(tipo) = changes.tipo_compromisso {
        updated.tipo_compromisso = tipo;
    }
    if let Some(categoria_id) = changes.categoria_id {
        updated.categoria_id = categoria_id;
    }

    let mut aggregates = ledger::Aggregates {
        valor_pago: current.valor_pago,
        valor_pendente: current.valor_pendente,
        status: current.status,
    };
    if let Some(valor) = changes.valor {
        ledger::validate_amount(valor)?;
        let payments = payments_of(&txn, id).await?;
        aggregates = ledger::recompute_aggregates(valor, &payments);
        if aggregates.valor_pago > valor {
            return Err(Error::validation(format!(
                "Total {valor} is below the {} already paid",
                aggregates.valor_pago
            )));
        }
        updated.valor = valor;
    }

    let updated = ledger::with_aggregates(&updated, aggregates, audit);
    save_versioned(&txn, current.versao, &updated).await?;
    txn.commit().await?;

    tracing::info!(compromisso_id = %id, versao = updated.versao, "Commitment updated");
    Ok(updated)
}

/// Deletes a commitment together with all of its payments, atomically.
pub async fn delete_commitment(db: &DatabaseConnection, id: &str) -> Result<()> {
    let txn = db.begin().await?;
    let commitment = require_commitment(&txn, id).await?;

    let removed = Pagamento::delete_many()
        .filter(pagamento::Column::CompromissoId.eq(id))
        .exec(&txn)
        .await?;
    commitment.delete(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        compromisso_id = %id,
        payments_removed = removed.rows_affected,
        "Commitment deleted"
    );
    Ok(())
}

pub(crate) async fn payments_of<C>(db: &C, compromisso_id: &str) -> Result<Vec<pagamento::Model>>
where
    C: ConnectionTrait,
{
    Pagamento::find()
        .filter(pagamento::Column::CompromissoId.eq(compromisso_id))
        .order_by_desc(pagamento::Column::DataPagamento)
        .all(db)
        .await
        .map_err(Into::into)
}
