//! Payment method entity - the list of labels offered when registering a payment.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment method database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "formas_pagamento")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Opaque identifier (UUID text)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Unique label, e.g. `"PIX"`
    #[sea_orm(unique)]
    pub nome: String,
    /// Whether the method is offered for new payments
    pub ativo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
