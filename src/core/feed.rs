//! Unified feed - commitments and payments merged into one list for display.
//!
//! A pure projection: inputs are borrowed, a fresh list is returned, and calling it twice
//! with the same inputs yields the same output.

use crate::entities::{StatusCompromisso, TipoCompromisso, cliente, compromisso, pagamento};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// What a feed entry was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Built from a commitment
    Commitment,
    /// Built from a payment
    Payment,
}

/// One line of the unified feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    /// Source record kind
    pub kind: FeedKind,
    /// Id of the commitment or payment
    pub id: String,
    /// Commitment date or payment date
    pub date: NaiveDate,
    /// Commitment id (own id for commitments, parent id for payments)
    pub compromisso_id: String,
    /// Commitment title; empty when a payment's parent is unknown
    pub titulo: String,
    /// Customer of the commitment; empty when unknown
    pub cliente_id: String,
    /// Customer display name; empty when unknown
    pub cliente_nome: String,
    /// Customer retail group; empty when unknown
    pub grupo_rede: String,
    /// Commitment total or payment amount
    pub valor: Decimal,
    /// Only set for commitments
    pub status: Option<StatusCompromisso>,
    /// Type of the commitment, or of the paid commitment
    pub tipo_compromisso: Option<TipoCompromisso>,
    /// Category of the commitment or payment
    pub categoria_id: Option<String>,
    /// Only set for payments
    pub forma_pagamento: Option<String>,
}

/// Builds the feed, most recent first. Entries with the same date keep insertion order,
/// commitments before payments.
#[must_use]
pub fn build_feed(
    commitments: &[compromisso::Model],
    payments: &[pagamento::Model],
    customers: &[cliente::Model],
) -> Vec<FeedEntry> {
    let commitments_by_id: HashMap<&str, &compromisso::Model> =
        commitments.iter().map(|c| (c.id.as_str(), c)).collect();
    let customers_by_id: HashMap<&str, &cliente::Model> =
        customers.iter().map(|c| (c.id.as_str(), c)).collect();

    let customer_fields = |cliente_id: &str| {
        customers_by_id
            .get(cliente_id)
            .map_or((String::new(), String::new()), |c| {
                (c.display_name().to_string(), c.grupo_rede.clone())
            })
    };

    let commitment_entries = commitments.iter().map(|c| {
        let (cliente_nome, grupo_rede) = customer_fields(&c.cliente_id);
        FeedEntry {
            kind: FeedKind::Commitment,
            id: c.id.clone(),
            date: c.data,
            compromisso_id: c.id.clone(),
            titulo: c.titulo.clone(),
            cliente_id: c.cliente_id.clone(),
            cliente_nome,
            grupo_rede,
            valor: c.valor,
            status: Some(c.status),
            tipo_compromisso: Some(c.tipo_compromisso),
            categoria_id: c.categoria_id.clone(),
            forma_pagamento: None,
        }
    });

    let payment_entries = payments.iter().map(|p| {
        let parent = commitments_by_id.get(p.compromisso_id.as_str());
        let cliente_id = parent.map(|c| c.cliente_id.clone()).unwrap_or_default();
        let (cliente_nome, grupo_rede) = customer_fields(&cliente_id);
        FeedEntry {
            kind: FeedKind::Payment,
            id: p.id.clone(),
            date: p.data_pagamento,
            compromisso_id: p.compromisso_id.clone(),
            titulo: parent.map(|c| c.titulo.clone()).unwrap_or_default(),
            cliente_id,
            cliente_nome,
            grupo_rede,
            valor: p.valor,
            status: None,
            tipo_compromisso: parent.map(|c| c.tipo_compromisso),
            categoria_id: p.categoria_id.clone(),
            forma_pagamento: Some(p.forma_pagamento.clone()),
        }
    });

    let mut feed: Vec<FeedEntry> = commitment_entries.chain(payment_entries).collect();
    feed.sort_by(|a, b| b.date.cmp(&a.date));
    feed
}
