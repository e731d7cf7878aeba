use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Gaming,
    Professional,
    #[serde(rename = "Content Creation")]
    ContentCreation,
    Premium,
    Portable,
    Classic,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Gaming,
        Self::Professional,
        Self::ContentCreation,
        Self::Premium,
        Self::Portable,
        Self::Classic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gaming => "Gaming",
            Self::Professional => "Professional",
            Self::ContentCreation => "Content Creation",
            Self::Premium => "Premium",
            Self::Portable => "Portable",
            Self::Classic => "Classic",
        }
    }

    /// Exact, case-sensitive match against the display names.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == raw)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Laptop,
    Pc,
    Ipod,
}

impl DeviceType {
    pub const ALL: [DeviceType; 3] = [Self::Laptop, Self::Pc, Self::Ipod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Laptop => "laptop",
            Self::Pc => "pc",
            Self::Ipod => "ipod",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|device_type| device_type.as_str() == raw)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sellable catalog entry. Products are never mutated after the catalog is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub device_type: DeviceType,
    pub price: u32,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub is_pre_order: Option<bool>,
}

impl Product {
    pub fn is_pre_order(&self) -> bool {
        self.is_pre_order.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, DeviceType, Product};

    #[test]
    fn category_parse_is_case_sensitive() {
        assert_eq!(Category::parse("Content Creation"), Some(Category::ContentCreation));
        assert_eq!(Category::parse("gaming"), None);
        assert_eq!(DeviceType::parse("pc"), Some(DeviceType::Pc));
        assert_eq!(DeviceType::parse("PC"), None);
    }

    #[test]
    fn product_decodes_from_catalog_json_shape() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 10,
                "name": "SNI Pod Pro",
                "category": "Premium",
                "deviceType": "ipod",
                "price": 399,
                "specs": { "storage": "256GB", "battery": "40 hours" },
                "features": ["Lossless Audio"],
                "rating": 4.8,
                "reviews": 234,
                "isPreOrder": true
            }"#,
        )
        .expect("product json should decode");

        assert_eq!(product.device_type, DeviceType::Ipod);
        assert_eq!(product.specs.get("storage").map(String::as_str), Some("256GB"));
        assert!(product.is_pre_order());
    }
}
