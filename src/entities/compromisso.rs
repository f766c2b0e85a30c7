//! Commitment entity - an investment or reimbursement owed to/from a customer.
//!
//! `valor_pago`, `valor_pendente` and `status` are aggregates kept in step with the
//! commitment's payments. They are only ever written together, inside the same database
//! transaction that inserts or deletes a payment, guarded by the `versao` row version.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of commitment
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TipoCompromisso {
    /// Money invested in the customer (counts towards ROI)
    #[sea_orm(string_value = "Investimento")]
    Investimento,
    /// Money to be reimbursed
    #[sea_orm(string_value = "Ressarcimento")]
    Ressarcimento,
}

/// Settlement status derived from paid and pending amounts
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum StatusCompromisso {
    /// Nothing paid yet
    #[sea_orm(string_value = "Pendente")]
    Pendente,
    /// Some, but not all, paid
    #[sea_orm(string_value = "Pago Parcialmente")]
    #[serde(rename = "Pago Parcialmente")]
    PagoParcialmente,
    /// Outstanding balance is zero
    #[sea_orm(string_value = "Pago Integralmente")]
    #[serde(rename = "Pago Integralmente")]
    PagoIntegralmente,
}

impl StatusCompromisso {
    /// Label used in the UI, CSV and JSON payloads
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pendente => "Pendente",
            Self::PagoParcialmente => "Pago Parcialmente",
            Self::PagoIntegralmente => "Pago Integralmente",
        }
    }
}

/// Commitment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "compromissos")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Opaque identifier (UUID text)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning customer
    pub cliente_id: String,
    /// Date the commitment was made
    pub data: Date,
    /// Total amount
    pub valor: Decimal,
    /// Short title shown in lists
    pub titulo: String,
    /// Free-form description
    pub descricao: String,
    /// Investment or reimbursement
    pub tipo_compromisso: TipoCompromisso,
    /// Optional soft reference to a category
    pub categoria_id: Option<String>,
    /// Sum of the payments' amounts
    pub valor_pago: Decimal,
    /// `valor - valor_pago`
    pub valor_pendente: Decimal,
    /// Derived from `valor_pago` / `valor_pendente`
    pub status: StatusCompromisso,
    /// Row version, bumped on every aggregate write
    pub versao: i32,
    /// Creation time
    pub data_criacao: DateTimeUtc,
    /// User who created the commitment
    pub criado_por: String,
    /// Last update time
    pub data_atualizacao: DateTimeUtc,
    /// User behind the last update
    pub atualizado_por: String,
}

/// Defines relationships between Compromisso and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One commitment has many payments
    #[sea_orm(has_many = "super::pagamento::Entity")]
    Pagamentos,
    /// Each commitment belongs to one customer
    #[sea_orm(
        belongs_to = "super::cliente::Entity",
        from = "Column::ClienteId",
        to = "super::cliente::Column::Id"
    )]
    Cliente,
}

impl Related<super::pagamento::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pagamentos.def()
    }
}

impl Related<super::cliente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cliente.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
