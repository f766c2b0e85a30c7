//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        commitment::{self, NewCommitment},
        customer::{self, CustomerInput},
        ledger::{self, AuditStamp, NewPayment},
    },
    entities::{TipoCompromisso, cliente, compromisso},
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Fixed date used by fixtures
pub fn test_date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap_or_default()
}

/// Audit stamp for the `"test_user"` actor
pub fn test_audit() -> AuditStamp {
    AuditStamp::now("test_user")
}

/// Customer input with the three required fields filled in.
pub fn customer_input(cpf_cnpj: &str, razao_social: &str) -> CustomerInput {
    CustomerInput {
        tipo_pessoa: "PJ".to_string(),
        cpf_cnpj: cpf_cnpj.to_string(),
        razao_social: razao_social.to_string(),
        cep: "01001-000".to_string(),
        ..CustomerInput::default()
    }
}

/// Creates a test customer with sensible defaults.
pub async fn create_test_customer(
    db: &DatabaseConnection,
    cpf_cnpj: &str,
    razao_social: &str,
) -> Result<cliente::Model> {
    customer::create_customer(db, customer_input(cpf_cnpj, razao_social)).await
}

/// Commitment input with defaults: investment dated 2024-03-01.
pub fn commitment_input(cliente_id: &str, valor: Decimal) -> NewCommitment {
    NewCommitment {
        cliente_id: cliente_id.to_string(),
        data: test_date(1),
        valor,
        titulo: "Test commitment".to_string(),
        descricao: String::new(),
        tipo_compromisso: TipoCompromisso::Investimento,
        categoria_id: None,
    }
}

/// Creates a test commitment with defaults.
pub async fn create_test_commitment(
    db: &DatabaseConnection,
    cliente_id: &str,
    valor: Decimal,
) -> Result<compromisso::Model> {
    commitment::create_commitment(db, commitment_input(cliente_id, valor), &test_audit()).await
}

/// Sets up a complete test environment with a customer and a commitment.
/// Returns (db, customer, commitment) for common test scenarios.
pub async fn setup_with_commitment(
    valor: Decimal,
) -> Result<(DatabaseConnection, cliente::Model, compromisso::Model)> {
    let db = setup_test_db().await?;
    let customer = create_test_customer(&db, "12.345.678/0001-90", "Mercado Central Ltda").await?;
    let commitment = create_test_commitment(&db, &customer.id, valor).await?;
    Ok((db, customer, commitment))
}

/// In-memory commitment (never persisted) with nothing paid.
pub fn sample_commitment(id: &str, valor: Decimal) -> compromisso::Model {
    let audit = test_audit();
    let aggregates = ledger::initial_aggregates(valor);
    compromisso::Model {
        id: id.to_string(),
        cliente_id: "cli-1".to_string(),
        data: test_date(1),
        valor,
        titulo: format!("Compromisso {id}"),
        descricao: String::new(),
        tipo_compromisso: TipoCompromisso::Investimento,
        categoria_id: None,
        valor_pago: aggregates.valor_pago,
        valor_pendente: aggregates.valor_pendente,
        status: aggregates.status,
        versao: 1,
        data_criacao: audit.at,
        criado_por: audit.user.clone(),
        data_atualizacao: audit.at,
        atualizado_por: audit.user,
    }
}

/// Payment request against `compromisso_id`, paid by PIX on 2024-03-10.
pub fn sample_new_payment(compromisso_id: &str, valor: Decimal) -> NewPayment {
    NewPayment {
        compromisso_id: compromisso_id.to_string(),
        data_pagamento: test_date(10),
        valor,
        forma_pagamento: "PIX".to_string(),
        categoria_id: None,
        observacoes: None,
        comprovante: None,
    }
}
