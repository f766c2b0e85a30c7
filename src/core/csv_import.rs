//! Customer CSV import validation.
//!
//! Every data row is checked on its own and produces one [`RowResult`]; a malformed row
//! never stops the rest of the file from being read. Only structure and the required
//! fields are validated here. Numeric columns fall back to zero when unparseable.

use crate::core::{csv_export::COLUMN_COUNT, customer::CustomerInput};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

const BOM: char = '\u{feff}';

/// Outcome of validating one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RowOutcome {
    /// Row is valid and carries the parsed customer
    Success {
        /// Parsed customer fields
        record: CustomerInput,
    },
    /// Row was rejected
    Error {
        /// Reason shown to the user
        message: String,
    },
}

/// One validated row with its position in the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowResult {
    /// 1-based line number in the file (the header is line 1)
    pub linha: u64,
    /// Parsed record or rejection reason
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

/// Totals and per-row results for a whole file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Number of data rows (header excluded)
    pub total: usize,
    /// Rows that passed validation
    pub success_count: usize,
    /// Rows that were rejected
    pub error_count: usize,
    /// One entry per data row, in file order
    pub results: Vec<RowResult>,
}

impl ImportReport {
    /// Recomputes the counters from `results`.
    pub fn recount(&mut self) {
        self.total = self.results.len();
        self.success_count = self
            .results
            .iter()
            .filter(|r| matches!(r.outcome, RowOutcome::Success { .. }))
            .count();
        self.error_count = self.total - self.success_count;
    }
}

/// Parses a number written either as `1234.56` or in Brazilian style `1.234,56`.
/// Percent signs and surrounding spaces are ignored; anything unparseable is zero.
#[must_use]
pub fn parse_decimal_or_zero(raw: &str) -> Decimal {
    let cleaned = raw.trim().trim_end_matches('%').trim();
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned.to_string()
    };
    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

/// Validates one row already split into columns.
#[must_use]
pub fn validate_row(columns: &[&str]) -> RowOutcome {
    if columns.len() < COLUMN_COUNT {
        return RowOutcome::Error {
            message: "insufficient columns".to_string(),
        };
    }

    let col = |i: usize| columns[i].trim().to_string();
    let record = CustomerInput {
        tipo_pessoa: col(0),
        cpf_cnpj: col(1),
        razao_social: col(2),
        nome_fantasia: col(3),
        inscricao_estadual: col(4),
        situacao: col(5),
        segmento: col(6),
        grupo_rede: col(7),
        cep: col(8),
        logradouro: col(9),
        numero: col(10),
        complemento: col(11),
        bairro: col(12),
        uf: col(13),
        municipio: col(14),
        email: col(15),
        telefone_fixo: col(16),
        telefone_celular: col(17),
        desconto_padrao: parse_decimal_or_zero(columns[18]),
        desconto_financeiro: parse_decimal_or_zero(columns[19]),
        pedido_minimo: parse_decimal_or_zero(columns[20]),
    };

    match record.validate() {
        Ok(()) => RowOutcome::Success { record },
        Err(_) => RowOutcome::Error {
            message: "required fields missing".to_string(),
        },
    }
}

/// Validates a whole CSV file. The first line is the header and is skipped.
#[must_use]
pub fn validate_file(text: &str) -> ImportReport {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut report = ImportReport::default();
    for (index, record) in reader.records().enumerate() {
        let fallback_line = index as u64 + 2;
        let result = match record {
            Ok(record) => {
                let columns: Vec<&str> = record.iter().collect();
                RowResult {
                    linha: record.position().map_or(fallback_line, csv::Position::line),
                    outcome: validate_row(&columns),
                }
            }
            Err(e) => RowResult {
                linha: e.position().map_or(fallback_line, csv::Position::line),
                outcome: RowOutcome::Error {
                    message: e.to_string(),
                },
            },
        };
        report.results.push(result);
    }

    report.recount();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row(razao_social: &str, cpf_cnpj: &str, cep: &str) -> Vec<String> {
        let mut row = vec![String::new(); COLUMN_COUNT];
        row[0] = "PJ".to_string();
        row[1] = cpf_cnpj.to_string();
        row[2] = razao_social.to_string();
        row[8] = cep.to_string();
        row[18] = "10".to_string();
        row
    }

    fn as_refs(row: &[String]) -> Vec<&str> {
        row.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_validate_row_success() {
        let row = full_row("ACME Ltda", "12.345.678/0001-90", "01001-000");
        match validate_row(&as_refs(&row)) {
            RowOutcome::Success { record } => {
                assert_eq!(record.razao_social, "ACME Ltda");
                assert_eq!(record.desconto_padrao, Decimal::from(10));
                assert_eq!(record.pedido_minimo, Decimal::ZERO);
            }
            RowOutcome::Error { message } => panic!("unexpected error: {message}"),
        }
    }

    #[test]
    fn test_validate_row_insufficient_columns() {
        let row = vec!["PJ", "123", "ACME"];
        assert_eq!(
            validate_row(&row),
            RowOutcome::Error {
                message: "insufficient columns".to_string()
            }
        );
    }

    #[test]
    fn test_validate_row_required_fields() {
        for row in [
            full_row("", "123", "01001-000"),
            full_row("ACME", " ", "01001-000"),
            full_row("ACME", "123", ""),
        ] {
            assert_eq!(
                validate_row(&as_refs(&row)),
                RowOutcome::Error {
                    message: "required fields missing".to_string()
                }
            );
        }
    }

    #[test]
    fn test_parse_decimal_or_zero() {
        assert_eq!(parse_decimal_or_zero("12.5"), Decimal::new(125, 1));
        assert_eq!(parse_decimal_or_zero("12,5"), Decimal::new(125, 1));
        assert_eq!(parse_decimal_or_zero("1.234,56"), Decimal::new(123_456, 2));
        assert_eq!(parse_decimal_or_zero(" 7% "), Decimal::from(7));
        assert_eq!(parse_decimal_or_zero("abc"), Decimal::ZERO);
        assert_eq!(parse_decimal_or_zero(""), Decimal::ZERO);
    }

    #[test]
    fn test_validate_file_counts_rows() {
        let header = crate::core::csv_export::HEADER.join(",");
        let good = "PJ,1,ACME,,,Ativo,,,01001-000,,,,,SP,São Paulo,,,,5,0,0";
        let missing = "PJ,2,,,,Ativo,,,01001-000,,,,,SP,São Paulo,,,,5,0,0";
        let short = "PJ,3,Curta";
        let text = format!("\u{feff}{header}\n{good}\n{missing}\n{short}\n");

        let report = validate_file(&text);
        assert_eq!(report.total, 3);
        assert_eq!(report.success_count, 1);
        assert_eq!(report.error_count, 2);
        assert_eq!(report.results[0].linha, 2);
        assert_eq!(report.results[2].linha, 4);
        assert!(matches!(
            &report.results[2].outcome,
            RowOutcome::Error { message } if message == "insufficient columns"
        ));
    }

    #[test]
    fn test_validate_file_quoted_fields() {
        let header = crate::core::csv_export::HEADER.join(",");
        let row = "\"PJ\",\"1\",\"Loja \"\"Central\"\", Filial\",,,,,,\"01001-000\",,,,,,,,,,,,";
        let report = validate_file(&format!("{header}\n{row}\n"));
        assert_eq!(report.success_count, 1);
        match &report.results[0].outcome {
            RowOutcome::Success { record } => {
                assert_eq!(record.razao_social, "Loja \"Central\", Filial");
            }
            RowOutcome::Error { message } => panic!("unexpected error: {message}"),
        }
    }

    #[test]
    fn test_validate_file_header_only() {
        let header = crate::core::csv_export::HEADER.join(",");
        let report = validate_file(&header);
        assert_eq!(report, ImportReport::default());
    }
}
