//! Sales and the financial report.
//!
//! Sales are the revenue side of the ROI figure: investments booked as commitments
//! divided by sales in the same period.

use crate::{
    core::ledger::{self, Summary},
    entities::{Cliente, Compromisso, Venda, compromisso, venda},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// Input for recording a sale
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    /// Customer who bought
    pub cliente_id: String,
    /// Sale date
    pub data: NaiveDate,
    /// Sale amount, positive
    pub valor: Decimal,
    /// Free-form description
    #[serde(default)]
    pub descricao: Option<String>,
}

/// Period and optional customer for sales listings and reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    /// Inclusive lower bound
    pub data_inicio: Option<NaiveDate>,
    /// Inclusive upper bound
    pub data_fim: Option<NaiveDate>,
    /// Only this customer
    pub cliente_id: Option<String>,
}

/// Commitment totals, sales and ROI for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    /// Commitment totals for the period
    #[serde(flatten)]
    pub summary: Summary,
    /// Sum of sales in the period
    pub total_vendas: Decimal,
    /// Investments as a percentage of sales, rounded to two places
    pub roi: Decimal,
    /// Number of commitments in the period
    pub quantidade_compromissos: usize,
}

/// Records a sale for an existing customer.
pub async fn create_sale(db: &DatabaseConnection, input: NewSale) -> Result<venda::Model> {
    ledger::validate_amount(input.valor)?;
    Cliente::find_by_id(input.cliente_id.clone())
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Cliente", input.cliente_id.clone()))?;

    let model = venda::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        cliente_id: Set(input.cliente_id),
        data: Set(input.data),
        valor: Set(input.valor),
        descricao: Set(input.descricao),
        data_criacao: Set(Utc::now()),
    };
    let created = model.insert(db).await?;
    tracing::info!(venda_id = %created.id, valor = %created.valor, "Sale recorded");
    Ok(created)
}

/// Lists sales in the period, most recent first.
pub async fn list_sales(
    db: &DatabaseConnection,
    period: &ReportPeriod,
) -> Result<Vec<venda::Model>> {
    let mut select = Venda::find();
    if let Some(from) = period.data_inicio {
        select = select.filter(venda::Column::Data.gte(from));
    }
    if let Some(to) = period.data_fim {
        select = select.filter(venda::Column::Data.lte(to));
    }
    if let Some(cliente_id) = period.cliente_id.as_deref().filter(|s| !s.is_empty()) {
        select = select.filter(venda::Column::ClienteId.eq(cliente_id));
    }
    select
        .order_by_desc(venda::Column::Data)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sum of sales in the period.
pub async fn total_sales(db: &DatabaseConnection, period: &ReportPeriod) -> Result<Decimal> {
    Ok(list_sales(db, period).await?.iter().map(|v| v.valor).sum())
}

async fn commitments_in(
    db: &DatabaseConnection,
    period: &ReportPeriod,
) -> Result<Vec<compromisso::Model>> {
    let mut select = Compromisso::find();
    if let Some(from) = period.data_inicio {
        select = select.filter(compromisso::Column::Data.gte(from));
    }
    if let Some(to) = period.data_fim {
        select = select.filter(compromisso::Column::Data.lte(to));
    }
    if let Some(cliente_id) = period.cliente_id.as_deref().filter(|s| !s.is_empty()) {
        select = select.filter(compromisso::Column::ClienteId.eq(cliente_id));
    }
    select.all(db).await.map_err(Into::into)
}

/// Builds the commitment summary and ROI for a period.
pub async fn generate_report(
    db: &DatabaseConnection,
    period: &ReportPeriod,
) -> Result<FinancialReport> {
    let commitments = commitments_in(db, period).await?;
    let summary = ledger::compute_summary(&commitments);
    let total_vendas = total_sales(db, period).await?;
    let roi = ledger::compute_roi(summary.total_investimentos, total_vendas).round_dp(2);

    tracing::debug!(
        commitments = commitments.len(),
        total_vendas = %total_vendas,
        roi = %roi,
        "Financial report generated"
    );
    Ok(FinancialReport {
        summary,
        total_vendas,
        roi,
        quantidade_compromissos: commitments.len(),
    })
}
