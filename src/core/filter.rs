//! Feed filtering - an AND of independent predicates over [`FeedEntry`] values.
//!
//! Every absent filter passes. Filtering never reorders the feed.

use crate::{
    core::feed::{FeedEntry, FeedKind},
    entities::StatusCompromisso,
};
use chrono::NaiveDate;
use serde::Deserialize;

/// Which kinds of entries to keep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoFiltro {
    /// Commitments and payments
    #[default]
    Todos,
    /// Commitments only
    Compromissos,
    /// Payments only
    Pagamentos,
}

/// User-selected filters, usually taken from the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedFilters {
    /// Which entry kinds to keep
    pub tipo: TipoFiltro,
    /// Applies to commitments only
    pub status: Option<StatusCompromisso>,
    /// Inclusive lower bound
    pub data_inicio: Option<NaiveDate>,
    /// Inclusive upper bound
    pub data_fim: Option<NaiveDate>,
    /// Exact category match
    pub categoria_id: Option<String>,
    /// Exact customer match
    pub cliente_id: Option<String>,
    /// Exact retail group match
    pub grupo_rede: Option<String>,
    /// Free text over title, customer name and group
    pub busca: Option<String>,
}

fn equals_if_set(filter: Option<&str>, value: Option<&str>) -> bool {
    match filter.filter(|f| !f.is_empty()) {
        None => true,
        Some(expected) => value == Some(expected),
    }
}

impl FeedFilters {
    /// Whether `entry` passes every filter.
    #[must_use]
    pub fn matches(&self, entry: &FeedEntry) -> bool {
        let kind_ok = match self.tipo {
            TipoFiltro::Todos => true,
            TipoFiltro::Compromissos => entry.kind == FeedKind::Commitment,
            TipoFiltro::Pagamentos => entry.kind == FeedKind::Payment,
        };
        if !kind_ok {
            return false;
        }

        if let Some(status) = self.status {
            if entry.kind == FeedKind::Commitment && entry.status != Some(status) {
                return false;
            }
        }

        if self.data_inicio.is_some_and(|from| entry.date < from)
            || self.data_fim.is_some_and(|to| entry.date > to)
        {
            return false;
        }

        if !equals_if_set(self.categoria_id.as_deref(), entry.categoria_id.as_deref())
            || !equals_if_set(self.cliente_id.as_deref(), Some(&entry.cliente_id))
            || !equals_if_set(self.grupo_rede.as_deref(), Some(&entry.grupo_rede))
        {
            return false;
        }

        match self.busca.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            None => true,
            Some(busca) => {
                let needle = busca.to_lowercase();
                [&entry.titulo, &entry.cliente_nome, &entry.grupo_rede]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Keeps the entries of `feed` that pass `filters`, in their original order.
#[must_use]
pub fn apply_filters(feed: &[FeedEntry], filters: &FeedFilters) -> Vec<FeedEntry> {
    feed.iter()
        .filter(|entry| filters.matches(entry))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_date;
    use rust_decimal::Decimal;

    fn entry(id: &str, kind: FeedKind, day: u32) -> FeedEntry {
        FeedEntry {
            kind,
            id: id.to_string(),
            date: test_date(day),
            compromisso_id: "c1".to_string(),
            titulo: "Bonificação Natal".to_string(),
            cliente_id: "cli-1".to_string(),
            cliente_nome: "Mercado Central".to_string(),
            grupo_rede: "Rede Sul".to_string(),
            valor: Decimal::from(100),
            status: (kind == FeedKind::Commitment).then_some(StatusCompromisso::Pendente),
            tipo_compromisso: None,
            categoria_id: Some("cat-1".to_string()),
            forma_pagamento: None,
        }
    }

    fn sample_feed() -> Vec<FeedEntry> {
        vec![
            entry("p2", FeedKind::Payment, 20),
            entry("c1", FeedKind::Commitment, 10),
            entry("p1", FeedKind::Payment, 5),
        ]
    }

    fn ids(feed: &[FeedEntry]) -> Vec<&str> {
        feed.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let feed = sample_feed();
        assert_eq!(apply_filters(&feed, &FeedFilters::default()), feed);
    }

    #[test]
    fn test_tipo_filter() {
        let feed = sample_feed();
        let commitments = FeedFilters {
            tipo: TipoFiltro::Compromissos,
            ..FeedFilters::default()
        };
        assert_eq!(ids(&apply_filters(&feed, &commitments)), vec!["c1"]);

        let payments = FeedFilters {
            tipo: TipoFiltro::Pagamentos,
            ..FeedFilters::default()
        };
        assert_eq!(ids(&apply_filters(&feed, &payments)), vec!["p2", "p1"]);
    }

    #[test]
    fn test_status_filter_ignores_payments() {
        let feed = sample_feed();
        let filters = FeedFilters {
            status: Some(StatusCompromisso::PagoIntegralmente),
            ..FeedFilters::default()
        };
        assert_eq!(ids(&apply_filters(&feed, &filters)), vec!["p2", "p1"]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let feed = sample_feed();
        let filters = FeedFilters {
            data_inicio: Some(test_date(5)),
            data_fim: Some(test_date(10)),
            ..FeedFilters::default()
        };
        assert_eq!(ids(&apply_filters(&feed, &filters)), vec!["c1", "p1"]);
    }

    #[test]
    fn test_equality_filters() {
        let mut feed = sample_feed();
        feed[0].cliente_id = "cli-2".to_string();
        feed[1].categoria_id = None;

        let by_customer = FeedFilters {
            cliente_id: Some("cli-1".to_string()),
            ..FeedFilters::default()
        };
        assert_eq!(ids(&apply_filters(&feed, &by_customer)), vec!["c1", "p1"]);

        let by_category = FeedFilters {
            categoria_id: Some("cat-1".to_string()),
            ..FeedFilters::default()
        };
        assert_eq!(ids(&apply_filters(&feed, &by_category)), vec!["p2", "p1"]);

        let empty_value = FeedFilters {
            grupo_rede: Some(String::new()),
            ..FeedFilters::default()
        };
        assert_eq!(apply_filters(&feed, &empty_value).len(), 3);
    }

    #[test]
    fn test_busca_is_case_insensitive() {
        let mut feed = sample_feed();
        feed[2].titulo = "Outro".to_string();
        feed[2].cliente_nome = "Outro".to_string();
        feed[2].grupo_rede = "Outra".to_string();

        let by_title = FeedFilters {
            busca: Some("NATAL".to_string()),
            ..FeedFilters::default()
        };
        assert_eq!(ids(&apply_filters(&feed, &by_title)), vec!["p2", "c1"]);

        let by_group = FeedFilters {
            busca: Some("rede sul".to_string()),
            ..FeedFilters::default()
        };
        assert_eq!(ids(&apply_filters(&feed, &by_group)), vec!["p2", "c1"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let feed = sample_feed();
        let filters = FeedFilters {
            tipo: TipoFiltro::Pagamentos,
            data_inicio: Some(test_date(10)),
            busca: Some("mercado".to_string()),
            ..FeedFilters::default()
        };
        assert_eq!(ids(&apply_filters(&feed, &filters)), vec!["p2"]);
    }
}
