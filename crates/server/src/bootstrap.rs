use std::sync::Arc;

use recommender_core::config::{AppConfig, ConfigError, LoadOptions};
use recommender_core::dataset::{load_catalog, DatasetError};
use recommender_core::ranking::RecommendationEngine;
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub engine: RecommendationEngine,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("dataset load failed: {0}")]
    Dataset(#[from] DatasetError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

/// Load the catalog named by `config` and wrap it in a shared engine.
pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        dataset_path = %config.dataset.path.display(),
        "starting application bootstrap"
    );

    let catalog = load_catalog(&config.dataset.path)?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        product_count = catalog.len(),
        category_count = catalog.list_categories().len(),
        "product catalog loaded"
    );

    Ok(Application { config, engine: RecommendationEngine::new(Arc::new(catalog)) })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use recommender_core::config::{ConfigOverrides, LoadOptions};
    use recommender_core::domain::filter::FilterSpec;
    use recommender_core::ranking::SortBy;
    use tempfile::TempDir;

    use crate::bootstrap::{bootstrap, BootstrapError};

    fn options_for(path: std::path::PathBuf) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides { dataset_path: Some(path), ..ConfigOverrides::default() },
            ..LoadOptions::default()
        }
    }

    #[test]
    fn bootstrap_fails_fast_when_dataset_is_missing() {
        let dir = TempDir::new().expect("temp dir");

        let result = bootstrap(options_for(dir.path().join("absent.csv")));

        assert!(matches!(result, Err(BootstrapError::Dataset(_))));
        let message = result.err().expect("error").to_string();
        assert!(message.contains("absent.csv"));
    }

    #[test]
    fn bootstrap_rejects_unsupported_dataset_extension() {
        let dir = TempDir::new().expect("temp dir");

        let result = bootstrap(options_for(dir.path().join("products.xlsx")));

        assert!(matches!(result, Err(BootstrapError::Config(_))));
    }

    #[test]
    fn bootstrap_loads_catalog_and_serves_queries() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("products.csv");
        fs::write(
            &path,
            "product_id,category,brand,price,rating,num_reviews,specs\n\
             1,Phones,Nova,499.0,4.3,120,\"{\"\"ram\"\": \"\"8GB\"\"}\"\n\
             2,Phones,Zen,299.0,3.9,15,\n\
             3,Audio,Pulse,89.0,4.6,410,\n",
        )
        .expect("write fixture");

        let app = bootstrap(options_for(path.clone())).expect("bootstrap should succeed");

        assert_eq!(app.config.dataset.path, path);
        assert_eq!(app.engine.catalog().len(), 3);
        let phones = app.engine.recommend(
            &FilterSpec::new().with_category("Phones"),
            SortBy::PriceAsc,
            10,
        );
        assert_eq!(phones.iter().map(|entry| entry.product.id.0).collect::<Vec<_>>(), vec![2, 1]);
    }
}
