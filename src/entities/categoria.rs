//! Category entity - labeled, colored tag for commitments and payments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categorias_conta_corrente")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Opaque identifier (UUID text)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name, unique across categories
    #[sea_orm(unique)]
    pub nome: String,
    /// Free-form description
    pub descricao: String,
    /// Hex color, `#RRGGBB`
    pub cor: String,
    /// Inactive categories are hidden from pickers but kept for history
    pub ativo: bool,
}

/// Categories are referenced softly by id, without foreign keys
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
