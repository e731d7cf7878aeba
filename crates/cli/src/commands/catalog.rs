use std::fs;
use std::path::Path;

use serde::Serialize;
use storefront_core::catalog::filter::format_usd;
use storefront_core::catalog::{describe_results, Catalog, FilterCriteria};
use storefront_core::errors::ErrorClass;

use crate::commands::CommandResult;

const COMMAND: &str = "catalog";

#[derive(Clone, Debug, Default)]
pub struct CatalogQuery {
    pub search: String,
    pub category: String,
    pub device_type: String,
    pub price: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProductRow {
    id: u32,
    name: String,
    category: &'static str,
    device_type: &'static str,
    price: String,
    rating: f32,
    pre_order: bool,
}

pub fn run(query: &CatalogQuery, catalog_file: Option<&Path>) -> CommandResult {
    let catalog = match catalog_file {
        Some(path) => match load_catalog(path) {
            Ok(catalog) => catalog,
            Err(message) => {
                return CommandResult::classified(COMMAND, ErrorClass::Validation, message)
            }
        },
        None => Catalog::storefront(),
    };

    search(&catalog, query)
}

pub fn search(catalog: &Catalog, query: &CatalogQuery) -> CommandResult {
    let criteria = FilterCriteria::from_labels(
        &query.search,
        &query.category,
        &query.device_type,
        query.price.as_deref(),
    );

    let matches = catalog.filter(&criteria);
    let summary = describe_results(&criteria, matches.len(), catalog.len());
    let rows: Vec<ProductRow> = matches
        .iter()
        .map(|product| ProductRow {
            id: product.id.0,
            name: product.name.clone(),
            category: product.category.as_str(),
            device_type: product.device_type.as_str(),
            price: format_usd(product.price),
            rating: product.rating,
            pre_order: product.is_pre_order(),
        })
        .collect();

    tracing::debug!(
        event_name = "catalog.filtered",
        shown = rows.len(),
        total = catalog.len(),
        "catalog filtered"
    );

    CommandResult::success_with(COMMAND, summary, rows)
}

fn load_catalog(path: &Path) -> Result<Catalog, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("could not read catalog `{}`: {error}", path.display()))?;
    Catalog::from_json(&raw).map_err(|error| error.to_string())
}
