//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod categoria;
pub mod cliente;
pub mod compromisso;
pub mod forma_pagamento;
pub mod pagamento;
pub mod venda;

// Re-export specific types to avoid conflicts
pub use categoria::{Column as CategoriaColumn, Entity as Categoria, Model as CategoriaModel};
pub use cliente::{Column as ClienteColumn, Entity as Cliente, Model as ClienteModel};
pub use compromisso::{
    Column as CompromissoColumn, Entity as Compromisso, Model as CompromissoModel,
    StatusCompromisso, TipoCompromisso,
};
pub use forma_pagamento::{
    Column as FormaPagamentoColumn, Entity as FormaPagamento, Model as FormaPagamentoModel,
};
pub use pagamento::{Column as PagamentoColumn, Entity as Pagamento, Model as PagamentoModel};
pub use venda::{Column as VendaColumn, Entity as Venda, Model as VendaModel};
