//! Sale entity - revenue per customer, the denominator of the ROI report.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendas")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Opaque identifier (UUID text)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Customer who bought
    pub cliente_id: String,
    /// Sale date
    pub data: Date,
    /// Sale amount
    pub valor: Decimal,
    /// Free-form description
    pub descricao: Option<String>,
    /// Creation time
    pub data_criacao: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
