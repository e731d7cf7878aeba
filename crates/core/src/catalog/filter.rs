use std::sync::Arc;

use crate::domain::product::{Category, DeviceType, Product};

/// Either the "All" sentinel or a single required value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(required) => required == value,
        }
    }
}

/// Price window with an inclusive lower bound and an exclusive upper bound.
/// `max: None` is the unbounded top bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl PriceRange {
    pub fn bounded(min: u32, max: u32) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn at_least(min: u32) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, price: u32) -> bool {
        price >= self.min && self.max.map_or(true, |max| price < max)
    }

    /// An inverted or empty window carries no usable constraint.
    pub fn is_well_formed(&self) -> bool {
        self.max.map_or(true, |max| max > self.min)
    }

    pub fn label(&self) -> String {
        if let Some(bucket) = PRICE_BUCKETS.iter().find(|bucket| bucket.range == *self) {
            return bucket.label.to_string();
        }

        match self.max {
            Some(max) => format!("{} - {}", format_usd(self.min), format_usd(max)),
            None => format!("{}+", format_usd(self.min)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceBucket {
    pub label: &'static str,
    pub range: PriceRange,
}

pub const PRICE_BUCKETS: [PriceBucket; 5] = [
    PriceBucket { label: "Under $500", range: PriceRange { min: 0, max: Some(500) } },
    PriceBucket { label: "$500 - $1,000", range: PriceRange { min: 500, max: Some(1_000) } },
    PriceBucket { label: "$1,000 - $2,000", range: PriceRange { min: 1_000, max: Some(2_000) } },
    PriceBucket { label: "$2,000 - $3,000", range: PriceRange { min: 2_000, max: Some(3_000) } },
    PriceBucket { label: "$3,000+", range: PriceRange { min: 3_000, max: None } },
];

pub fn price_bucket(label: &str) -> Option<PriceRange> {
    PRICE_BUCKETS.iter().find(|bucket| bucket.label == label.trim()).map(|bucket| bucket.range)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_term: String,
    pub category: Selection<Category>,
    pub device_type: Selection<DeviceType>,
    pub price_range: Option<PriceRange>,
}

impl FilterCriteria {
    /// Builds criteria from the raw strings a UI hands over. Unknown category,
    /// device type or price labels impose no constraint.
    pub fn from_labels(
        search_term: &str,
        category: &str,
        device_type: &str,
        price_label: Option<&str>,
    ) -> Self {
        Self {
            search_term: search_term.to_string(),
            category: Category::parse(category).map_or(Selection::All, Selection::Only),
            device_type: DeviceType::parse(device_type).map_or(Selection::All, Selection::Only),
            price_range: price_label.and_then(price_bucket),
        }
    }

    pub fn with_search(mut self, search_term: impl Into<String>) -> Self {
        self.search_term = search_term.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Selection::Only(category);
        self
    }

    pub fn with_device_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = Selection::Only(device_type);
        self
    }

    pub fn with_price_range(mut self, price_range: PriceRange) -> Self {
        self.price_range = Some(price_range);
        self
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_match_all(&self) -> bool {
        self.search_term.is_empty()
            && self.category == Selection::All
            && self.device_type == Selection::All
            && self.effective_price_range().is_none()
    }

    fn effective_price_range(&self) -> Option<PriceRange> {
        self.price_range.filter(PriceRange::is_well_formed)
    }
}

pub fn matches(product: &Product, criteria: &FilterCriteria) -> bool {
    let needle = criteria.search_term.to_lowercase();
    matches_prepared(product, criteria, &needle)
}

/// Returns the products satisfying every active dimension, in catalog order.
pub fn filter(products: &[Arc<Product>], criteria: &FilterCriteria) -> Vec<Arc<Product>> {
    let needle = criteria.search_term.to_lowercase();
    products
        .iter()
        .filter(|product| matches_prepared(product, criteria, &needle))
        .cloned()
        .collect()
}

fn matches_prepared(product: &Product, criteria: &FilterCriteria, needle: &str) -> bool {
    matches_search(product, needle)
        && criteria.category.admits(&product.category)
        && criteria.device_type.admits(&product.device_type)
        && criteria.effective_price_range().map_or(true, |range| range.contains(product.price))
}

fn matches_search(product: &Product, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    product.name.to_lowercase().contains(needle)
        || product.category.as_str().to_lowercase().contains(needle)
        || product.specs.values().any(|value| value.to_lowercase().contains(needle))
        || product.features.iter().any(|feature| feature.to_lowercase().contains(needle))
}

/// Result-count line shown above the product grid.
pub fn describe_results(criteria: &FilterCriteria, shown: usize, total: usize) -> String {
    let mut line = format!("Showing {shown} of {total} products");
    if !criteria.search_term.is_empty() {
        line.push_str(&format!(" for \"{}\"", criteria.search_term));
    }
    if let Selection::Only(category) = criteria.category {
        line.push_str(&format!(" in {category}"));
    }
    if let Selection::Only(device_type) = criteria.device_type {
        line.push_str(&format!(" - {device_type}s"));
    }
    if let Some(range) = criteria.effective_price_range() {
        line.push_str(&format!(" in {}", range.label()));
    }
    line
}

pub fn format_usd(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}
