//! Product dataset loading.
//!
//! Supported inputs:
//! - CSV with a header row (`product_id`, `category`, `brand`, `price`,
//!   `rating`, `num_reviews`, `specs`, and optionally `model`, `currency`,
//!   `sample_review`); `specs` holds JSON text.
//! - A JSON array of product objects using the same field names; `specs` may
//!   be an object or JSON text.
//!
//! A blank, unparseable, or non-object `specs` value becomes an empty map.
//! Every other field must parse or the load fails.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::ProductCatalog;
use crate::domain::product::{Product, ProductId, Specs};
use crate::errors::{ApplicationError, DomainError};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not open dataset `{path}`: {source}")]
    Open { path: PathBuf, source: std::io::Error },
    #[error("unsupported dataset format for `{0}` (expected .csv or .json)")]
    UnsupportedFormat(PathBuf),
    #[error("invalid CSV row {row} in `{path}`: {source}")]
    Csv { path: PathBuf, row: u64, source: csv::Error },
    #[error("invalid JSON dataset `{path}`: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error(transparent)]
    Catalog(#[from] DomainError),
}

impl From<DatasetError> for ApplicationError {
    fn from(value: DatasetError) -> Self {
        match value {
            DatasetError::Catalog(error) => ApplicationError::Domain(error),
            other => ApplicationError::Dataset(other.to_string()),
        }
    }
}

/// Parse the file at `path` and build a catalog from it.
pub fn load_catalog(path: &Path) -> Result<ProductCatalog, DatasetError> {
    let products = load_products(path)?;
    let catalog = ProductCatalog::new(products)?;
    info!(
        event_name = "dataset.load.completed",
        path = %path.display(),
        product_count = catalog.len(),
        "loaded product dataset"
    );
    Ok(catalog)
}

pub fn load_products(path: &Path) -> Result<Vec<Product>, DatasetError> {
    let extension =
        path.extension().and_then(|value| value.to_str()).map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => {
            let file = File::open(path)
                .map_err(|source| DatasetError::Open { path: path.to_path_buf(), source })?;
            read_csv(file, path)
        }
        Some("json") => {
            let file = File::open(path)
                .map_err(|source| DatasetError::Open { path: path.to_path_buf(), source })?;
            read_json(file, path)
        }
        _ => Err(DatasetError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Parse a `specs` cell. Anything that is not a JSON object becomes empty.
pub fn parse_specs(raw: &str) -> Specs {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Specs::new();
    }
    serde_json::from_str::<Specs>(trimmed).unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    product_id: i64,
    category: String,
    brand: String,
    price: f64,
    rating: f64,
    num_reviews: u64,
    #[serde(default)]
    specs: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    sample_review: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonRow {
    product_id: i64,
    category: String,
    brand: String,
    price: f64,
    rating: f64,
    num_reviews: u64,
    #[serde(default)]
    specs: Option<Value>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    sample_review: Option<String>,
}

fn read_csv(reader: impl std::io::Read, path: &Path) -> Result<Vec<Product>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut products = Vec::new();
    let mut malformed_specs = 0usize;

    for (index, record) in reader.deserialize::<CsvRow>().enumerate() {
        let row = record.map_err(|source| DatasetError::Csv {
            path: path.to_path_buf(),
            row: index as u64 + 1,
            source,
        })?;

        let raw_specs = row.specs.unwrap_or_default();
        let specs = parse_specs(&raw_specs);
        if specs.is_empty() && !is_blank_specs(&raw_specs) {
            malformed_specs += 1;
        }

        products.push(Product {
            id: ProductId(row.product_id),
            category: row.category,
            brand: row.brand,
            price: row.price,
            rating: row.rating,
            num_reviews: row.num_reviews,
            specs,
            model: non_blank(row.model),
            currency: non_blank(row.currency),
            sample_review: non_blank(row.sample_review),
        });
    }

    report_malformed_specs(path, malformed_specs);
    Ok(products)
}

fn read_json(reader: impl std::io::Read, path: &Path) -> Result<Vec<Product>, DatasetError> {
    let rows: Vec<JsonRow> = serde_json::from_reader(reader)
        .map_err(|source| DatasetError::Json { path: path.to_path_buf(), source })?;
    let mut malformed_specs = 0usize;

    let products = rows
        .into_iter()
        .map(|row| {
            let specs = match row.specs {
                Some(Value::Object(map)) => {
                    serde_json::from_value::<Specs>(Value::Object(map)).unwrap_or_default()
                }
                Some(Value::String(raw)) => {
                    let specs = parse_specs(&raw);
                    if specs.is_empty() && !is_blank_specs(&raw) {
                        malformed_specs += 1;
                    }
                    specs
                }
                Some(Value::Null) | None => Specs::new(),
                Some(_) => {
                    malformed_specs += 1;
                    Specs::new()
                }
            };

            Product {
                id: ProductId(row.product_id),
                category: row.category,
                brand: row.brand,
                price: row.price,
                rating: row.rating,
                num_reviews: row.num_reviews,
                specs,
                model: non_blank(row.model),
                currency: non_blank(row.currency),
                sample_review: non_blank(row.sample_review),
            }
        })
        .collect();

    report_malformed_specs(path, malformed_specs);
    Ok(products)
}

fn is_blank_specs(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") || trimmed == "{}"
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn report_malformed_specs(path: &Path, count: usize) {
    if count > 0 {
        warn!(
            event_name = "dataset.load.specs_normalized",
            path = %path.display(),
            row_count = count,
            "malformed specs replaced with empty maps"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{load_catalog, load_products, parse_specs, DatasetError};
    use crate::errors::ApplicationError;
    use crate::domain::product::{ProductId, SpecValue};
    use crate::errors::DomainError;

    const CSV_HEADER: &str = "product_id,category,brand,model,price,currency,rating,num_reviews,specs,sample_review\n";

    #[test]
    fn parse_specs_normalizes_bad_input_to_empty() {
        assert!(parse_specs("").is_empty());
        assert!(parse_specs("NaN").is_empty());
        assert!(parse_specs("{not json").is_empty());
        assert!(parse_specs("[1, 2]").is_empty());
        assert!(parse_specs("\"text\"").is_empty());

        let specs = parse_specs(r#"{"ram": "8GB", "battery": 5000}"#);
        assert_eq!(specs["ram"], SpecValue::Text("8GB".to_owned()));
        assert_eq!(specs["battery"], SpecValue::Number(5000u64.into()));
    }

    #[test]
    fn loads_csv_rows_in_file_order() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("products.csv");
        fs::write(
            &path,
            format!(
                "{CSV_HEADER}\
                 3,Phones,Nova,Nova 5,499.0,USD,4.3,120,\"{{\"\"ram\"\": \"\"8GB\"\"}}\",Great value || Solid\n\
                 1,Laptops,Orbit,,1299.5,USD,4.8,40,not-json,\n\
                 2,Phones,Zen,Zen Mini,299.0,,3.9,15,,\n"
            ),
        )
        .expect("write fixture");

        let products = load_products(&path).expect("csv should load");

        assert_eq!(products.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ProductId(3), ProductId(1), ProductId(2)]);
        assert_eq!(products[0].specs["ram"], SpecValue::Text("8GB".to_owned()));
        assert_eq!(products[0].model.as_deref(), Some("Nova 5"));
        assert_eq!(products[0].sample_review.as_deref(), Some("Great value || Solid"));
        assert!(products[1].specs.is_empty());
        assert!(products[1].model.is_none());
        assert!(products[2].currency.is_none());
        assert!(products[2].specs.is_empty());
    }

    #[test]
    fn csv_without_optional_columns_loads() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("minimal.csv");
        fs::write(
            &path,
            "product_id,category,brand,price,rating,num_reviews\n7,Audio,Pulse,59.9,4.0,12\n",
        )
        .expect("write fixture");

        let products = load_products(&path).expect("csv should load");

        assert_eq!(products.len(), 1);
        assert!(products[0].specs.is_empty());
        assert!(products[0].model.is_none());
    }

    #[test]
    fn csv_type_errors_report_the_row() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("broken.csv");
        fs::write(
            &path,
            "product_id,category,brand,price,rating,num_reviews\n1,Audio,Pulse,10,4,1\n2,Audio,Pulse,cheap,4,1\n",
        )
        .expect("write fixture");

        let error = load_products(&path).expect_err("bad price should fail");

        assert!(matches!(error, DatasetError::Csv { row: 2, .. }), "unexpected error: {error}");
    }

    #[test]
    fn loads_json_with_object_or_text_specs() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("products.json");
        fs::write(
            &path,
            r#"[
                {"product_id": 1, "category": "Audio", "brand": "Pulse", "price": 99.0, "rating": 4.5, "num_reviews": 10, "specs": {"color": "black"}},
                {"product_id": 2, "category": "Audio", "brand": "Echo", "price": 49.0, "rating": 4.0, "num_reviews": 3, "specs": "{\"color\": \"white\"}"},
                {"product_id": 3, "category": "Audio", "brand": "Echo", "price": 29.0, "rating": 3.0, "num_reviews": 0, "specs": 17}
            ]"#,
        )
        .expect("write fixture");

        let products = load_products(&path).expect("json should load");

        assert_eq!(products[0].specs["color"], SpecValue::Text("black".to_owned()));
        assert_eq!(products[1].specs["color"], SpecValue::Text("white".to_owned()));
        assert!(products[2].specs.is_empty());
    }

    #[test]
    fn duplicate_ids_fail_catalog_construction() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("dupes.csv");
        fs::write(
            &path,
            "product_id,category,brand,price,rating,num_reviews\n1,Audio,Pulse,10,4,1\n1,Audio,Echo,12,4,1\n",
        )
        .expect("write fixture");

        let error = load_catalog(&path).expect_err("duplicate ids should fail");

        assert!(matches!(error, DatasetError::Catalog(DomainError::DuplicateProductId(ProductId(1)))));
    }

    #[test]
    fn unknown_extension_and_missing_file_are_errors() {
        let dir = TempDir::new().expect("temp dir");

        let unsupported = load_products(&dir.path().join("products.xlsx"));
        assert!(matches!(unsupported, Err(DatasetError::UnsupportedFormat(_))));

        let missing = load_products(&dir.path().join("absent.csv"));
        assert!(matches!(missing, Err(DatasetError::Open { .. })));
    }

    #[test]
    fn dataset_errors_lift_into_application_errors() {
        let dir = TempDir::new().expect("temp dir");

        let missing = load_catalog(&dir.path().join("absent.csv")).expect_err("missing file");
        assert!(matches!(ApplicationError::from(missing), ApplicationError::Dataset(ref message) if message.contains("absent.csv")));

        let duplicate = DatasetError::Catalog(DomainError::DuplicateProductId(ProductId(3)));
        assert_eq!(
            ApplicationError::from(duplicate),
            ApplicationError::Domain(DomainError::DuplicateProductId(ProductId(3)))
        );
    }
}
