//! Category business logic - the labeled, colored tags used on commitments and payments.

use crate::{
    config::app::CategoriaConfig,
    entities::{Categoria, categoria},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// Input for creating or replacing a category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    /// Unique display name
    pub nome: String,
    /// Free-form description
    #[serde(default)]
    pub descricao: String,
    /// Hex color, `#RRGGBB`
    pub cor: String,
    /// Inactive categories are hidden from default listings
    #[serde(default = "default_ativo")]
    pub ativo: bool,
}

const fn default_ativo() -> bool {
    true
}

/// Whether `cor` is a `#RRGGBB` hex color.
#[must_use]
pub fn is_valid_color(cor: &str) -> bool {
    cor.len() == 7
        && cor.starts_with('#')
        && cor[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn validate(input: &CategoryInput) -> Result<()> {
    if input.nome.trim().is_empty() {
        return Err(Error::validation("Category name cannot be empty"));
    }
    if !is_valid_color(&input.cor) {
        return Err(Error::validation(format!(
            "Invalid color '{}', expected #RRGGBB",
            input.cor
        )));
    }
    Ok(())
}

async fn find_by_name(db: &DatabaseConnection, nome: &str) -> Result<Option<categoria::Model>> {
    Categoria::find()
        .filter(categoria::Column::Nome.eq(nome.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a category with a unique name.
pub async fn create_category(
    db: &DatabaseConnection,
    input: CategoryInput,
) -> Result<categoria::Model> {
    validate(&input)?;
    if find_by_name(db, &input.nome).await?.is_some() {
        return Err(Error::DuplicateName { name: input.nome });
    }

    let model = categoria::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        nome: Set(input.nome.trim().to_string()),
        descricao: Set(input.descricao),
        cor: Set(input.cor.to_uppercase()),
        ativo: Set(input.ativo),
    };
    let created = model.insert(db).await?;
    tracing::info!(categoria_id = %created.id, nome = %created.nome, "Category created");
    Ok(created)
}

/// Replaces a category's fields.
pub async fn update_category(
    db: &DatabaseConnection,
    id: &str,
    input: CategoryInput,
) -> Result<categoria::Model> {
    validate(&input)?;
    let current = Categoria::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Categoria", id))?;

    if let Some(other) = find_by_name(db, &input.nome).await? {
        if other.id != current.id {
            return Err(Error::DuplicateName { name: input.nome });
        }
    }

    let mut model: categoria::ActiveModel = current.into();
    model.nome = Set(input.nome.trim().to_string());
    model.descricao = Set(input.descricao);
    model.cor = Set(input.cor.to_uppercase());
    model.ativo = Set(input.ativo);
    model.update(db).await.map_err(Into::into)
}

/// Deletes a category. Commitments and payments keep the dangling id.
pub async fn delete_category(db: &DatabaseConnection, id: &str) -> Result<()> {
    let result = Categoria::delete_by_id(id.to_string()).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Categoria", id));
    }
    tracing::info!(categoria_id = %id, "Category deleted");
    Ok(())
}

/// Lists categories alphabetically, optionally including inactive ones.
pub async fn list_categories(
    db: &DatabaseConnection,
    include_inactive: bool,
) -> Result<Vec<categoria::Model>> {
    let mut select = Categoria::find();
    if !include_inactive {
        select = select.filter(categoria::Column::Ativo.eq(true));
    }
    select
        .order_by_asc(categoria::Column::Nome)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates the configured categories that do not exist yet. Returns how many were created.
pub async fn seed_categories(db: &DatabaseConnection, seeds: &[CategoriaConfig]) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        if find_by_name(db, &seed.nome).await?.is_some() {
            continue;
        }
        create_category(
            db,
            CategoryInput {
                nome: seed.nome.clone(),
                descricao: seed.descricao.clone(),
                cor: seed.cor.clone(),
                ativo: true,
            },
        )
        .await?;
        created += 1;
    }
    Ok(created)
}
