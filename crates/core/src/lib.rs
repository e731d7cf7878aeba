pub mod admin;
pub mod api;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod validation;

pub use admin::{filter_warranties, StatusFilter, WarrantyForm, WarrantyQuery, WarrantyStats};
pub use api::{
    ApiError, InMemoryStorefrontApi, OrderReceipt, StorefrontApi, WarrantyCheckOutcome,
    WarrantyVerifyOutcome,
};
pub use catalog::{Catalog, CatalogError, FilterCriteria, PriceRange};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::order::{CustomerDetails, CustomerField, OrderConfiguration, OrderRequest};
pub use domain::product::{Category, DeviceType, Product, ProductId};
pub use domain::warranty::{WarrantyPayload, WarrantyRecord, WarrantyStatus};
pub use errors::{ApplicationError, DomainError, ErrorClass, InterfaceError};
pub use flows::{OrderWizard, WarrantyReport, WarrantyWizard};
