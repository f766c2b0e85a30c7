//! Payment entity - a partial or full settlement against one commitment.
//!
//! Payments are immutable once registered; removing one recomputes the parent's aggregates.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pagamentos")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Opaque identifier (UUID text)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Commitment this payment settles
    pub compromisso_id: String,
    /// Date the money moved
    pub data_pagamento: Date,
    /// Amount paid, always positive
    pub valor: Decimal,
    /// Payment method label (e.g. `"PIX"`, `"Boleto"`)
    pub forma_pagamento: String,
    /// Optional category
    pub categoria_id: Option<String>,
    /// Free-form notes
    pub observacoes: Option<String>,
    /// Reference to an uploaded receipt file
    pub comprovante: Option<String>,
    /// Creation time
    pub data_criacao: DateTimeUtc,
    /// User who registered the payment
    pub criado_por: String,
}

/// Defines relationships between Pagamento and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one commitment
    #[sea_orm(
        belongs_to = "super::compromisso::Entity",
        from = "Column::CompromissoId",
        to = "super::compromisso::Column::Id"
    )]
    Compromisso,
}

impl Related<super::compromisso::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compromisso.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
