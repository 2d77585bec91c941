use crate::error::CatalogError;
use catalog_common::model::product::ProductInput;
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Header that carries the natural key. Header lookups are case-sensitive.
pub const KEY_COLUMN: &str = "sku";
const NAME_COLUMN: &str = "name";
const DESCRIPTION_COLUMN: &str = "description";
const PRICE_COLUMN: &str = "price";

/// One data row of an upload, fields as written in the file.
///
/// Columns missing from the header, or cells missing from a short row, read
/// as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRow {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: String,
}

impl UploadRow {
    /// The upsert this row asks for, or `None` when its key is blank.
    pub fn to_input(&self) -> Option<ProductInput> {
        ProductInput::new(
            &self.sku,
            self.name.clone(),
            Some(self.description.clone()),
            parse_price(&self.price),
        )
    }
}

struct ColumnIndex {
    sku: Option<usize>,
    name: Option<usize>,
    description: Option<usize>,
    price: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |title: &str| headers.iter().position(|h| h == title);
        Self {
            sku: find(KEY_COLUMN),
            name: find(NAME_COLUMN),
            description: find(DESCRIPTION_COLUMN),
            price: find(PRICE_COLUMN),
        }
    }

    fn row(&self, record: &StringRecord) -> UploadRow {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };
        UploadRow {
            sku: cell(self.sku),
            name: cell(self.name),
            description: cell(self.description),
            price: cell(self.price),
        }
    }
}

fn reader(content: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes())
}

/// Parses every data row. Blank-key rows are kept so they still count
/// towards the job's row total.
pub fn parse_rows(content: &str) -> Result<Vec<UploadRow>, CatalogError> {
    let mut reader = reader(content);
    let columns = ColumnIndex::from_headers(reader.headers()?);
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(columns.row(&record?));
    }
    Ok(rows)
}

/// Rejects content that could never ingest anything: an unreadable header or
/// one without the key column.
pub fn validate_header(content: &str) -> Result<(), CatalogError> {
    let mut reader = reader(content);
    let headers = reader
        .headers()
        .map_err(|e| CatalogError::InvalidUpload(format!("unreadable CSV header: {}", e)))?;
    if headers.iter().any(|h| h == KEY_COLUMN) {
        Ok(())
    } else {
        Err(CatalogError::InvalidUpload(format!(
            "CSV header must contain a '{}' column",
            KEY_COLUMN
        )))
    }
}

/// Numeric coercion of a price cell. Blank or unparseable values become zero.
pub fn parse_price(raw: &str) -> Decimal {
    let raw = raw.trim();
    if raw.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map(|price| price.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_header_names_to_fields() {
        let rows = parse_rows("price,sku,name,description\n9.99,A-1,Widget,Blue\n").unwrap();
        assert_eq!(
            rows,
            vec![UploadRow {
                sku: "A-1".into(),
                name: "Widget".into(),
                description: "Blue".into(),
                price: "9.99".into(),
            }]
        );
    }

    #[test]
    fn short_rows_and_missing_columns_read_as_empty() {
        let rows = parse_rows("sku,name,price\nA-1\nB-2,Bolt,1\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "");
        assert_eq!(rows[0].price, "");
        assert_eq!(rows[1].description, "");
    }

    #[test]
    fn header_lookup_is_case_sensitive() {
        let rows = parse_rows("SKU,name\nA-1,Widget\n").unwrap();
        assert_eq!(rows[0].sku, "");
        assert!(rows[0].to_input().is_none());
    }

    #[test]
    fn quoted_cells_keep_delimiters() {
        let rows = parse_rows("sku,name,description\nA-1,\"Widget, large\",\"says \"\"hi\"\"\"\n")
            .unwrap();
        assert_eq!(rows[0].name, "Widget, large");
        assert_eq!(rows[0].description, "says \"hi\"");
    }

    #[test]
    fn blank_keys_produce_no_input() {
        let row = UploadRow { sku: "   ".into(), ..Default::default() };
        assert!(row.to_input().is_none());
    }

    #[test]
    fn input_normalizes_key_and_defaults_to_active() {
        let row = UploadRow {
            sku: "  AbC-9 ".into(),
            name: "Gear".into(),
            description: "".into(),
            price: "3.5".into(),
        };
        let input = row.to_input().unwrap();
        assert_eq!(input.sku, "abc-9");
        assert_eq!(input.price, Decimal::new(350, 2));
        assert_eq!(input.description.as_deref(), Some(""));
        assert!(input.active);
    }

    #[test]
    fn price_coercion_is_lenient() {
        assert_eq!(parse_price(""), Decimal::ZERO);
        assert_eq!(parse_price("n/a"), Decimal::ZERO);
        assert_eq!(parse_price(" 12 "), Decimal::new(12, 0));
        assert_eq!(parse_price("19.999"), Decimal::new(2000, 2));
        assert_eq!(parse_price("1e2"), Decimal::new(100, 0));
        assert_eq!(parse_price("-4.25"), Decimal::new(-425, 2));
    }

    #[test]
    fn header_validation() {
        assert!(validate_header("sku,name\n").is_ok());
        assert!(matches!(
            validate_header("id,name\n1,x\n"),
            Err(CatalogError::InvalidUpload(_))
        ));
        assert!(matches!(validate_header(""), Err(CatalogError::InvalidUpload(_))));
    }

    #[test]
    fn header_only_file_has_no_rows() {
        assert!(parse_rows("sku,name,description,price\n").unwrap().is_empty());
    }
}
