//! Customer entity - the CRM record.
//!
//! Fields mirror the 21 columns of the customer CSV import/export format, in the
//! same order, plus identity and audit timestamps.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clientes")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Opaque identifier (UUID text)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// `"PF"` (person) or `"PJ"` (company)
    pub tipo_pessoa: String,
    /// CPF or CNPJ, unique per customer
    #[sea_orm(unique)]
    pub cpf_cnpj: String,
    /// Legal name
    pub razao_social: String,
    /// Trading name
    pub nome_fantasia: String,
    /// State registration
    pub inscricao_estadual: String,
    /// e.g. `"Ativo"`, `"Inativo"`
    pub situacao: String,
    /// Market segment
    pub segmento: String,
    /// Group or retail network the customer belongs to
    pub grupo_rede: String,
    /// Postal code
    pub cep: String,
    /// Street
    pub logradouro: String,
    /// Street number
    pub numero: String,
    /// Address complement
    pub complemento: String,
    /// District
    pub bairro: String,
    /// State
    pub uf: String,
    /// City
    pub municipio: String,
    /// Contact e-mail
    pub email: String,
    /// Landline
    pub telefone_fixo: String,
    /// Mobile phone
    pub telefone_celular: String,
    /// Default discount, percent
    pub desconto_padrao: Decimal,
    /// Financial discount, percent
    pub desconto_financeiro: Decimal,
    /// Minimum order amount
    pub pedido_minimo: Decimal,
    /// Creation time
    pub data_criacao: DateTimeUtc,
    /// Last update time
    pub data_atualizacao: DateTimeUtc,
}

/// Defines relationships between Cliente and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One customer has many commitments
    #[sea_orm(has_many = "super::compromisso::Entity")]
    Compromissos,
}

impl Related<super::compromisso::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compromissos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Name shown in lists: trading name when present, legal name otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.nome_fantasia.trim().is_empty() {
            &self.razao_social
        } else {
            &self.nome_fantasia
        }
    }
}
