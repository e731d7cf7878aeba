use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Color {
    #[default]
    Black,
    Grey,
    DarkGreen,
}

impl Color {
    pub const ALL: [Color; 3] = [Self::Black, Self::Grey, Self::DarkGreen];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Grey => "grey",
            Self::DarkGreen => "darkGreen",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Black => "Black",
            Self::Grey => "Grey",
            Self::DarkGreen => "Dark Green",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.key().eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RamSize {
    #[serde(rename = "8GB")]
    Gb8,
    #[default]
    #[serde(rename = "16GB")]
    Gb16,
    #[serde(rename = "32GB")]
    Gb32,
    #[serde(rename = "64GB")]
    Gb64,
}

impl RamSize {
    pub const ALL: [RamSize; 4] = [Self::Gb8, Self::Gb16, Self::Gb32, Self::Gb64];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Gb8 => "8GB",
            Self::Gb16 => "16GB",
            Self::Gb32 => "32GB",
            Self::Gb64 => "64GB",
        }
    }

    pub fn price_delta(&self) -> u32 {
        match self {
            Self::Gb8 => 0,
            Self::Gb16 => 200,
            Self::Gb32 => 500,
            Self::Gb64 => 1_000,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.label().eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageSize {
    #[serde(rename = "256GB")]
    Gb256,
    #[default]
    #[serde(rename = "512GB")]
    Gb512,
    #[serde(rename = "1TB")]
    Tb1,
    #[serde(rename = "2TB")]
    Tb2,
}

impl StorageSize {
    pub const ALL: [StorageSize; 4] = [Self::Gb256, Self::Gb512, Self::Tb1, Self::Tb2];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Gb256 => "256GB",
            Self::Gb512 => "512GB",
            Self::Tb1 => "1TB",
            Self::Tb2 => "2TB",
        }
    }

    pub fn price_delta(&self) -> u32 {
        match self {
            Self::Gb256 => 0,
            Self::Gb512 => 150,
            Self::Tb1 => 300,
            Self::Tb2 => 600,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.label().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Hardware selections made in the first order step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfiguration {
    pub color: Color,
    pub ram: RamSize,
    pub storage: StorageSize,
}

impl OrderConfiguration {
    pub fn final_price(&self, base_price: u32) -> u32 {
        base_price
            .saturating_add(self.ram.price_delta())
            .saturating_add(self.storage.price_delta())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomerField {
    FirstName,
    LastName,
    Address,
    City,
    ZipCode,
    Mobile,
    Email,
}

impl CustomerField {
    pub const ALL: [CustomerField; 7] = [
        Self::FirstName,
        Self::LastName,
        Self::Address,
        Self::City,
        Self::ZipCode,
        Self::Mobile,
        Self::Email,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Address => "address",
            Self::City => "city",
            Self::ZipCode => "zipCode",
            Self::Mobile => "mobile",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub mobile: String,
    pub email: String,
    pub zip_code: String,
}

impl CustomerDetails {
    pub fn get(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::FirstName => &self.first_name,
            CustomerField::LastName => &self.last_name,
            CustomerField::Address => &self.address,
            CustomerField::City => &self.city,
            CustomerField::ZipCode => &self.zip_code,
            CustomerField::Mobile => &self.mobile,
            CustomerField::Email => &self.email,
        }
    }

    pub fn set(&mut self, field: CustomerField, value: impl Into<String>) {
        let slot = match field {
            CustomerField::FirstName => &mut self.first_name,
            CustomerField::LastName => &mut self.last_name,
            CustomerField::Address => &mut self.address,
            CustomerField::City => &mut self.city,
            CustomerField::ZipCode => &mut self.zip_code,
            CustomerField::Mobile => &mut self.mobile,
            CustomerField::Email => &mut self.email,
        };
        *slot = value.into();
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedProduct {
    pub id: ProductId,
    pub name: String,
    pub base_price: u32,
    pub selected_color: Color,
    pub selected_ram: RamSize,
    pub selected_storage: StorageSize,
    pub final_price: u32,
}

/// Body of `POST /api/orders`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub product: OrderedProduct,
    pub customer: CustomerDetails,
    pub order_date: DateTime<Utc>,
}

impl OrderRequest {
    pub fn new(
        product: &Product,
        configuration: OrderConfiguration,
        customer: CustomerDetails,
        order_date: DateTime<Utc>,
    ) -> Self {
        Self {
            product: OrderedProduct {
                id: product.id,
                name: product.name.clone(),
                base_price: product.price,
                selected_color: configuration.color,
                selected_ram: configuration.ram,
                selected_storage: configuration.storage,
                final_price: configuration.final_price(product.price),
            },
            customer,
            order_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, CustomerDetails, CustomerField, OrderConfiguration, RamSize, StorageSize};

    #[test]
    fn final_price_adds_ram_and_storage_deltas() {
        let configuration = OrderConfiguration {
            color: Color::Grey,
            ram: RamSize::Gb16,
            storage: StorageSize::Gb512,
        };

        assert_eq!(configuration.final_price(1_000), 1_350);
        assert_eq!(OrderConfiguration::default().final_price(1_000), 1_350);
    }

    #[test]
    fn option_labels_match_wire_values() {
        assert_eq!(serde_json::to_string(&RamSize::Gb64).expect("ram"), "\"64GB\"");
        assert_eq!(serde_json::to_string(&StorageSize::Tb1).expect("storage"), "\"1TB\"");
        assert_eq!(serde_json::to_string(&Color::DarkGreen).expect("color"), "\"darkGreen\"");
        assert_eq!(RamSize::parse("32gb"), Some(RamSize::Gb32));
        assert_eq!(Color::parse("darkgreen"), Some(Color::DarkGreen));
        assert_eq!(StorageSize::parse("3TB"), None);
    }

    #[test]
    fn customer_fields_round_trip_through_accessors() {
        let mut customer = CustomerDetails::default();
        for field in CustomerField::ALL {
            customer.set(field, field.key());
        }

        assert_eq!(customer.get(CustomerField::ZipCode), "zipCode");
        let json = serde_json::to_value(&customer).expect("customer json");
        assert_eq!(json["zipCode"], "zipCode");
        assert_eq!(json["firstName"], "firstName");
    }
}
