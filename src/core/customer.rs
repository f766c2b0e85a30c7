//! Customer (CRM) business logic - CRUD, search and bulk CSV import/export.

use crate::{
    core::{
        commitment::page_bounds,
        csv_export,
        csv_import::{self, ImportReport, RowOutcome},
    },
    entities::{Cliente, Compromisso, cliente, compromisso},
    errors::{Error, Result},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{Condition, PaginatorTrait, QueryOrder, QuerySelect, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// Editable customer fields, in CSV column order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInput {
    /// `PF` or `PJ`
    pub tipo_pessoa: String,
    /// CPF or CNPJ, unique, required
    pub cpf_cnpj: String,
    /// Legal name, required
    pub razao_social: String,
    /// Trading name
    pub nome_fantasia: String,
    /// State registration
    pub inscricao_estadual: String,
    /// Account status label
    pub situacao: String,
    /// Market segment
    pub segmento: String,
    /// Retail group or chain
    pub grupo_rede: String,
    /// Postal code, required
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
    /// Minimum order value
    pub pedido_minimo: Decimal,
}

impl CustomerInput {
    /// Checks the fields every customer must carry.
    ///
    /// # Errors
    /// [`Error::Validation`] when legal name, CPF/CNPJ or CEP is blank.
    pub fn validate(&self) -> Result<()> {
        if [&self.razao_social, &self.cpf_cnpj, &self.cep]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(Error::validation("required fields missing"));
        }
        Ok(())
    }

    fn into_active_model(self, id: String) -> cliente::ActiveModel {
        let now = Utc::now();
        cliente::ActiveModel {
            id: Set(id),
            tipo_pessoa: Set(self.tipo_pessoa),
            cpf_cnpj: Set(self.cpf_cnpj.trim().to_string()),
            razao_social: Set(self.razao_social.trim().to_string()),
            nome_fantasia: Set(self.nome_fantasia),
            inscricao_estadual: Set(self.inscricao_estadual),
            situacao: Set(self.situacao),
            segmento: Set(self.segmento),
            grupo_rede: Set(self.grupo_rede),
            cep: Set(self.cep.trim().to_string()),
            logradouro: Set(self.logradouro),
            numero: Set(self.numero),
            complemento: Set(self.complemento),
            bairro: Set(self.bairro),
            uf: Set(self.uf),
            municipio: Set(self.municipio),
            email: Set(self.email),
            telefone_fixo: Set(self.telefone_fixo),
            telefone_celular: Set(self.telefone_celular),
            desconto_padrao: Set(self.desconto_padrao),
            desconto_financeiro: Set(self.desconto_financeiro),
            pedido_minimo: Set(self.pedido_minimo),
            data_criacao: Set(now),
            data_atualizacao: Set(now),
        }
    }
}

/// Search and pagination for [`list_customers`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    /// Matches legal name, trading name, CPF/CNPJ or group
    pub search: Option<String>,
    /// Only this retail group
    pub grupo_rede: Option<String>,
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size
    pub limit: Option<u64>,
}

async fn find_by_document(
    db: &DatabaseConnection,
    cpf_cnpj: &str,
) -> Result<Option<cliente::Model>> {
    Cliente::find()
        .filter(cliente::Column::CpfCnpj.eq(cpf_cnpj.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a customer.
///
/// # Errors
/// Returns an error if required fields are missing or the CPF/CNPJ is already registered.
pub async fn create_customer(
    db: &DatabaseConnection,
    input: CustomerInput,
) -> Result<cliente::Model> {
    input.validate()?;
    if find_by_document(db, &input.cpf_cnpj).await?.is_some() {
        return Err(Error::DuplicateName {
            name: input.cpf_cnpj,
        });
    }

    let created = input
        .into_active_model(uuid::Uuid::new_v4().to_string())
        .insert(db)
        .await?;
    tracing::info!(cliente_id = %created.id, "Customer created");
    Ok(created)
}

/// Finds a customer by id.
pub async fn get_customer_by_id(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<cliente::Model>> {
    Cliente::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Replaces a customer's fields, keeping its id and creation date.
pub async fn update_customer(
    db: &DatabaseConnection,
    id: &str,
    input: CustomerInput,
) -> Result<cliente::Model> {
    input.validate()?;
    let current = get_customer_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("Cliente", id))?;

    if let Some(other) = find_by_document(db, &input.cpf_cnpj).await? {
        if other.id != current.id {
            return Err(Error::DuplicateName {
                name: input.cpf_cnpj,
            });
        }
    }

    let mut model = input.into_active_model(current.id.clone());
    model.data_criacao = Set(current.data_criacao);
    let updated = model.update(db).await?;
    tracing::info!(cliente_id = %id, "Customer updated");
    Ok(updated)
}

/// Deletes a customer that has no commitments.
///
/// # Errors
/// [`Error::Validation`] when commitments still reference the customer.
pub async fn delete_customer(db: &DatabaseConnection, id: &str) -> Result<()> {
    let current = get_customer_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("Cliente", id))?;

    let commitments = Compromisso::find()
        .filter(compromisso::Column::ClienteId.eq(id))
        .count(db)
        .await?;
    if commitments > 0 {
        return Err(Error::validation(format!(
            "Customer has {commitments} commitment(s); delete them first"
        )));
    }

    current.delete(db).await?;
    tracing::info!(cliente_id = %id, "Customer deleted");
    Ok(())
}

/// Lists customers ordered by legal name.
pub async fn list_customers(
    db: &DatabaseConnection,
    query: &CustomerQuery,
) -> Result<Vec<cliente::Model>> {
    let mut select = Cliente::find();

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        select = select.filter(
            Condition::any()
                .add(cliente::Column::RazaoSocial.contains(search))
                .add(cliente::Column::NomeFantasia.contains(search))
                .add(cliente::Column::CpfCnpj.contains(search))
                .add(cliente::Column::GrupoRede.contains(search)),
        );
    }
    if let Some(grupo) = query.grupo_rede.as_deref().filter(|s| !s.is_empty()) {
        select = select.filter(cliente::Column::GrupoRede.eq(grupo));
    }

    let (offset, limit) = page_bounds(query.page, query.limit);
    select
        .order_by_asc(cliente::Column::RazaoSocial)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every customer, for exports and lookups.
pub async fn all_customers(db: &DatabaseConnection) -> Result<Vec<cliente::Model>> {
    Cliente::find()
        .order_by_asc(cliente::Column::RazaoSocial)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Validates a CSV file and stores every valid row.
///
/// Rows are matched to existing customers by CPF/CNPJ: matches are updated, the rest
/// created. A row that fails to save is reported as an error row; the import never aborts.
pub async fn import_customers(db: &DatabaseConnection, text: &str) -> Result<ImportReport> {
    let mut report = csv_import::validate_file(text);

    for row in &mut report.results {
        let RowOutcome::Success { record } = &row.outcome else {
            continue;
        };

        let saved = match find_by_document(db, &record.cpf_cnpj).await? {
            Some(existing) => update_customer(db, &existing.id, record.clone()).await,
            None => create_customer(db, record.clone()).await,
        };

        if let Err(e) = saved {
            tracing::warn!(linha = row.linha, error = %e, "Import row could not be saved");
            row.outcome = RowOutcome::Error {
                message: e.to_string(),
            };
        }
    }

    report.recount();
    tracing::info!(
        total = report.total,
        success = report.success_count,
        errors = report.error_count,
        "Customer import finished"
    );
    Ok(report)
}

/// Exports every customer as CSV text.
pub async fn export_customers(db: &DatabaseConnection) -> Result<String> {
    let customers = all_customers(db).await?;
    tracing::info!(count = customers.len(), "Exporting customers");
    csv_export::export_customers(&customers)
}
