//! Customer CSV export: UTF-8 with BOM, comma-delimited, every field double-quoted.

use crate::{
    entities::cliente,
    errors::{Error, Result},
};
use csv::{QuoteStyle, WriterBuilder};

/// Column headers, in file order
pub const HEADER: [&str; 21] = [
    "Tipo Pessoa",
    "CPF/CNPJ",
    "Razão Social",
    "Nome Fantasia",
    "Inscrição Estadual",
    "Situação",
    "Segmento",
    "Grupo/Rede",
    "CEP",
    "Logradouro",
    "Número",
    "Complemento",
    "Bairro",
    "UF",
    "Município",
    "E-mail",
    "Telefone Fixo",
    "Telefone Celular",
    "Desconto Padrão %",
    "Desconto Financeiro %",
    "Pedido Mínimo",
];

/// Number of columns in the customer file
pub const COLUMN_COUNT: usize = HEADER.len();

fn customer_row(c: &cliente::Model) -> [String; COLUMN_COUNT] {
    [
        c.tipo_pessoa.clone(),
        c.cpf_cnpj.clone(),
        c.razao_social.clone(),
        c.nome_fantasia.clone(),
        c.inscricao_estadual.clone(),
        c.situacao.clone(),
        c.segmento.clone(),
        c.grupo_rede.clone(),
        c.cep.clone(),
        c.logradouro.clone(),
        c.numero.clone(),
        c.complemento.clone(),
        c.bairro.clone(),
        c.uf.clone(),
        c.municipio.clone(),
        c.email.clone(),
        c.telefone_fixo.clone(),
        c.telefone_celular.clone(),
        c.desconto_padrao.normalize().to_string(),
        c.desconto_financeiro.normalize().to_string(),
        c.pedido_minimo.normalize().to_string(),
    ]
}

/// Renders `customers` as CSV text, header first.
pub fn export_customers(customers: &[cliente::Model]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer("\u{feff}".as_bytes().to_vec());

    writer.write_record(HEADER)?;
    for customer in customers {
        writer.write_record(customer_row(customer))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn customer(razao_social: &str) -> cliente::Model {
        cliente::Model {
            id: "c1".to_string(),
            tipo_pessoa: "PJ".to_string(),
            cpf_cnpj: "12.345.678/0001-90".to_string(),
            razao_social: razao_social.to_string(),
            nome_fantasia: String::new(),
            inscricao_estadual: String::new(),
            situacao: "Ativo".to_string(),
            segmento: String::new(),
            grupo_rede: "Rede Sul".to_string(),
            cep: "01001-000".to_string(),
            logradouro: String::new(),
            numero: String::new(),
            complemento: String::new(),
            bairro: String::new(),
            uf: "SP".to_string(),
            municipio: "São Paulo".to_string(),
            email: String::new(),
            telefone_fixo: String::new(),
            telefone_celular: String::new(),
            desconto_padrao: Decimal::new(250, 2),
            desconto_financeiro: Decimal::ZERO,
            pedido_minimo: Decimal::from(100),
            data_criacao: Utc::now(),
            data_atualizacao: Utc::now(),
        }
    }

    #[test]
    fn test_export_header_and_bom() {
        let text = export_customers(&[]).unwrap();
        assert!(text.starts_with('\u{feff}'));
        let first_line = text.trim_start_matches('\u{feff}').lines().next().unwrap();
        assert!(first_line.starts_with("\"Tipo Pessoa\",\"CPF/CNPJ\",\"Razão Social\""));
        assert!(first_line.ends_with("\"Pedido Mínimo\""));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_export_escapes_quotes_and_commas() {
        let text = export_customers(&[customer("Loja \"Central\", Filial")]).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("\"Loja \"\"Central\"\", Filial\""));
        assert!(row.ends_with("\"2.5\",\"0\",\"100\""));
    }
}
