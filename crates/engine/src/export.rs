//! Spreadsheet export of the list pages.
//!
//! A [`Table`] is built from already filtered and ordered records through a
//! column schema and a projection closure, then encoded as `.xlsx` (styled)
//! or `.csv`. Nothing here filters or sorts.
use chrono::{DateTime, NaiveDate, Utc};
use rust_xlsxwriter::{Color, ColNum, Format, FormatAlign, FormatPattern, RowNum, Workbook};

use crate::{
    Category, Directory, EngineError, MoneyCents, Person, ResultEngine, Transaction,
    TransactionKind,
};

const HEADER_FILL: u32 = 0x111827;
const INCOME_COLOR: u32 = 0x008000;
const EXPENSE_COLOR: u32 = 0xFF0000;
const CURRENCY_FORMAT: &str = "\"R$ \"#,##0.00";
const UNRESOLVED: &str = "N/A";

/// One column of an export schema.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Column {
    pub header: &'static str,
    pub key: &'static str,
    pub width: f64,
}

impl Column {
    pub const fn new(header: &'static str, key: &'static str, width: f64) -> Self {
        Self { header, key, width }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    /// Written with the currency format, colored by kind.
    Amount {
        amount: MoneyCents,
        kind: TransactionKind,
    },
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub sheet_name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Projects every record through `project(record, column.key)`, keeping
    /// the record order.
    pub fn build<R, F>(
        sheet_name: impl Into<String>,
        columns: &[Column],
        records: impl IntoIterator<Item = R>,
        project: F,
    ) -> Self
    where
        F: Fn(&R, &str) -> CellValue,
    {
        let rows = records
            .into_iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| project(&record, column.key))
                    .collect()
            })
            .collect();
        Self {
            sheet_name: sheet_name.into(),
            columns: columns.to_vec(),
            rows,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

/// An encoded file, ready to be written or downloaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Table {
    pub fn export(&self, format: ExportFormat, file_stem: &str) -> ResultEngine<Export> {
        let bytes = match format {
            ExportFormat::Xlsx => encode_xlsx(self)?,
            ExportFormat::Csv => encode_csv(self)?,
        };
        Ok(Export {
            file_name: format!("{file_stem}.{}", format.extension()),
            bytes,
        })
    }
}

fn column_number(index: usize) -> ResultEngine<ColNum> {
    ColNum::try_from(index).map_err(|_| EngineError::Export(format!("too many columns: {index}")))
}

fn row_number(index: usize) -> ResultEngine<RowNum> {
    RowNum::try_from(index).map_err(|_| EngineError::Export(format!("too many rows: {index}")))
}

/// Encodes `table` as a single-sheet workbook with a styled header row.
pub fn encode_xlsx(table: &Table) -> ResultEngine<Vec<u8>> {
    let header_format = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_font_color(Color::White)
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let income_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(INCOME_COLOR))
        .set_num_format(CURRENCY_FORMAT);
    let expense_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(EXPENSE_COLOR))
        .set_num_format(CURRENCY_FORMAT);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(table.sheet_name.as_str())?;

    for (index, column) in table.columns.iter().enumerate() {
        let col = column_number(index)?;
        worksheet.set_column_width(col, column.width)?;
        worksheet.write_string_with_format(0, col, column.header, &header_format)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_num = row_number(index + 1)?;
        for (col_index, cell) in row.iter().enumerate() {
            let col = column_number(col_index)?;
            match cell {
                CellValue::Text(text) => {
                    worksheet.write_string(row_num, col, text.as_str())?;
                }
                CellValue::Integer(value) => {
                    worksheet.write_number(row_num, col, *value as f64)?;
                }
                CellValue::Amount { amount, kind } => {
                    let format = match kind {
                        TransactionKind::Income => &income_format,
                        TransactionKind::Expense => &expense_format,
                    };
                    worksheet.write_number_with_format(row_num, col, amount.to_major(), format)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Encodes `table` as CSV: header labels, then one record per row.
pub fn encode_csv(table: &Table) -> ResultEngine<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(table.columns.iter().map(|c| c.header))?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| match cell {
            CellValue::Text(text) => text.clone(),
            CellValue::Integer(value) => value.to_string(),
            CellValue::Amount { amount, .. } => amount.to_decimal_string(),
        }))?;
    }
    writer
        .into_inner()
        .map_err(|err| EngineError::Export(err.to_string()))
}

pub const TRANSACTION_SHEET: &str = "Relatório de Caixa";
pub const TRANSACTION_COLUMNS: [Column; 6] = [
    Column::new("DATA", "data", 15.0),
    Column::new("HISTÓRICO", "desc", 40.0),
    Column::new("CATEGORIA", "cat", 20.0),
    Column::new("RESPONSÁVEL", "pess", 20.0),
    Column::new("VALOR (R$)", "val", 15.0),
    Column::new("STATUS", "status", 15.0),
];

pub const PEOPLE_SHEET: &str = "Pessoas";
pub const PEOPLE_COLUMNS: [Column; 2] = [
    Column::new("NOME", "nome", 30.0),
    Column::new("IDADE", "idade", 10.0),
];

pub const CATEGORY_SHEET: &str = "Categorias";
pub const CATEGORY_COLUMNS: [Column; 2] = [
    Column::new("DESCRIÇÃO", "desc", 30.0),
    Column::new("FINALIDADE", "final", 20.0),
];

/// `dd/mm/yyyy`, as shown in tables and exports.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn transactions_table<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    directory: &Directory<'_>,
) -> Table {
    Table::build(
        TRANSACTION_SHEET,
        &TRANSACTION_COLUMNS,
        transactions,
        |tx, key| match key {
            "data" => CellValue::Text(display_date(tx.due_date)),
            "desc" => CellValue::Text(tx.description.to_uppercase()),
            "cat" => CellValue::text(
                directory
                    .category_description(tx.category_id)
                    .unwrap_or(UNRESOLVED),
            ),
            "pess" => CellValue::text(directory.person_name(tx.person_id).unwrap_or(UNRESOLVED)),
            "val" => CellValue::Amount {
                amount: tx.amount,
                kind: tx.kind,
            },
            "status" => CellValue::text(if tx.paid { "PAGO" } else { "PENDENTE" }),
            _ => CellValue::Text(String::new()),
        },
    )
}

pub fn people_table<'a>(people: impl IntoIterator<Item = &'a Person>) -> Table {
    Table::build(PEOPLE_SHEET, &PEOPLE_COLUMNS, people, |person, key| match key {
        "nome" => CellValue::Text(person.name.clone()),
        "idade" => CellValue::Integer(i64::from(person.age)),
        _ => CellValue::Text(String::new()),
    })
}

pub fn categories_table<'a>(categories: impl IntoIterator<Item = &'a Category>) -> Table {
    Table::build(
        CATEGORY_SHEET,
        &CATEGORY_COLUMNS,
        categories,
        |category, key| match key {
            "desc" => CellValue::Text(category.description.clone()),
            "final" => CellValue::text(category.purpose.as_str()),
            _ => CellValue::Text(String::new()),
        },
    )
}

/// `FinanceCore_Relatorio_<unix millis>`.
pub fn transactions_file_stem(now: DateTime<Utc>) -> String {
    format!("FinanceCore_Relatorio_{}", now.timestamp_millis())
}

/// `<dataset>_FinanceCore_<dd-mm-yyyy>`.
pub fn dated_file_stem(dataset: &str, date: NaiveDate) -> String {
    format!("{dataset}_FinanceCore_{}", date.format("%d-%m-%Y"))
}
