//! Payment method business logic - the labels offered when registering a payment.

use crate::{
    config::app::FormaPagamentoConfig,
    entities::{FormaPagamento, forma_pagamento},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// Input for creating or replacing a payment method
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentMethodInput {
    /// Unique label
    pub nome: String,
    /// Inactive methods are hidden from default listings
    #[serde(default = "default_ativo")]
    pub ativo: bool,
}

const fn default_ativo() -> bool {
    true
}

async fn find_by_name(
    db: &DatabaseConnection,
    nome: &str,
) -> Result<Option<forma_pagamento::Model>> {
    FormaPagamento::find()
        .filter(forma_pagamento::Column::Nome.eq(nome.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a payment method with a unique name.
pub async fn create_payment_method(
    db: &DatabaseConnection,
    input: PaymentMethodInput,
) -> Result<forma_pagamento::Model> {
    if input.nome.trim().is_empty() {
        return Err(Error::validation("Payment method name cannot be empty"));
    }
    if find_by_name(db, &input.nome).await?.is_some() {
        return Err(Error::DuplicateName { name: input.nome });
    }

    let model = forma_pagamento::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        nome: Set(input.nome.trim().to_string()),
        ativo: Set(input.ativo),
    };
    let created = model.insert(db).await?;
    tracing::info!(nome = %created.nome, "Payment method created");
    Ok(created)
}

/// Renames or (de)activates a payment method.
pub async fn update_payment_method(
    db: &DatabaseConnection,
    id: &str,
    input: PaymentMethodInput,
) -> Result<forma_pagamento::Model> {
    if input.nome.trim().is_empty() {
        return Err(Error::validation("Payment method name cannot be empty"));
    }
    let current = FormaPagamento::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("FormaPagamento", id))?;

    if let Some(other) = find_by_name(db, &input.nome).await? {
        if other.id != current.id {
            return Err(Error::DuplicateName { name: input.nome });
        }
    }

    let mut model: forma_pagamento::ActiveModel = current.into();
    model.nome = Set(input.nome.trim().to_string());
    model.ativo = Set(input.ativo);
    model.update(db).await.map_err(Into::into)
}

/// Deletes a payment method. Existing payments keep their label.
pub async fn delete_payment_method(db: &DatabaseConnection, id: &str) -> Result<()> {
    let result = FormaPagamento::delete_by_id(id.to_string()).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("FormaPagamento", id));
    }
    Ok(())
}

/// Lists payment methods alphabetically.
pub async fn list_payment_methods(
    db: &DatabaseConnection,
    include_inactive: bool,
) -> Result<Vec<forma_pagamento::Model>> {
    let mut select = FormaPagamento::find();
    if !include_inactive {
        select = select.filter(forma_pagamento::Column::Ativo.eq(true));
    }
    select
        .order_by_asc(forma_pagamento::Column::Nome)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates the configured payment methods that do not exist yet.
pub async fn seed_payment_methods(
    db: &DatabaseConnection,
    seeds: &[FormaPagamentoConfig],
) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        if find_by_name(db, &seed.nome).await?.is_none() {
            create_payment_method(
                db,
                PaymentMethodInput {
                    nome: seed.nome.clone(),
                    ativo: true,
                },
            )
            .await?;
            created += 1;
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_payment_method_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;
        let seeds = vec![
            FormaPagamentoConfig {
                nome: "PIX".to_string(),
            },
            FormaPagamentoConfig {
                nome: "Boleto".to_string(),
            },
        ];
        assert_eq!(seed_payment_methods(&db, &seeds).await?, 2);
        assert_eq!(seed_payment_methods(&db, &seeds).await?, 0);

        let methods = list_payment_methods(&db, false).await?;
        assert_eq!(
            methods.iter().map(|m| m.nome.as_str()).collect::<Vec<_>>(),
            vec!["Boleto", "PIX"]
        );

        let duplicate = create_payment_method(
            &db,
            PaymentMethodInput {
                nome: "PIX".to_string(),
                ativo: true,
            },
        )
        .await;
        assert!(matches!(duplicate.unwrap_err(), Error::DuplicateName { .. }));

        let boleto = &methods[0];
        update_payment_method(
            &db,
            &boleto.id,
            PaymentMethodInput {
                nome: "Boleto".to_string(),
                ativo: false,
            },
        )
        .await?;
        assert_eq!(list_payment_methods(&db, false).await?.len(), 1);
        assert_eq!(list_payment_methods(&db, true).await?.len(), 2);

        delete_payment_method(&db, &boleto.id).await?;
        assert_eq!(list_payment_methods(&db, true).await?.len(), 1);
        Ok(())
    }
}
