pub mod filter;
mod seed;

use std::sync::Arc;

use thiserror::Error;

use crate::domain::product::{Product, ProductId};

pub use filter::{
    describe_results, FilterCriteria, PriceBucket, PriceRange, Selection, PRICE_BUCKETS,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not decode catalog: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("duplicate product id {0} in catalog")]
    DuplicateId(ProductId),
}

/// Immutable product list handed to the filter engine and the order wizard.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }

        Ok(Self { products: products.into_iter().map(Arc::new).collect() })
    }

    /// The SNI laptop, desktop and audio-player lineup.
    pub fn storefront() -> Self {
        Self { products: seed::storefront_products().into_iter().map(Arc::new).collect() }
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(raw)?;
        Self::new(products)
    }

    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, product_id: ProductId) -> Option<Arc<Product>> {
        self.products.iter().find(|product| product.id == product_id).cloned()
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Arc<Product>> {
        filter::filter(&self.products, criteria)
    }
}
