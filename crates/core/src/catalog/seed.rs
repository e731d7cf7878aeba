use std::collections::BTreeMap;

use crate::domain::product::{Category, DeviceType, Product, ProductId};

struct Entry {
    id: u32,
    name: &'static str,
    category: Category,
    device_type: DeviceType,
    price: u32,
    specs: &'static [(&'static str, &'static str)],
    features: &'static [&'static str],
    rating: f32,
    reviews: u32,
    pre_order: Option<bool>,
}

const LINEUP: &[Entry] = &[
    Entry {
        id: 1,
        name: "SNI Phantom X1",
        category: Category::Gaming,
        device_type: DeviceType::Laptop,
        price: 2_499,
        specs: &[
            ("cpu", "Intel Core i9-13900H"),
            ("gpu", "RTX 4080"),
            ("ram", "32GB DDR5"),
            ("storage", "1TB NVMe SSD"),
            ("display", "17.3\" 4K 144Hz"),
            ("battery", "90Wh"),
        ],
        features: &["RGB Backlit Keyboard", "Advanced Cooling", "Premium Build"],
        rating: 4.9,
        reviews: 127,
        pre_order: None,
    },
    Entry {
        id: 2,
        name: "SNI ProBook 15",
        category: Category::Professional,
        device_type: DeviceType::Laptop,
        price: 1_899,
        specs: &[
            ("cpu", "Intel Core i7-13700H"),
            ("gpu", "RTX 4060"),
            ("ram", "16GB DDR5"),
            ("storage", "512GB NVMe SSD"),
            ("display", "15.6\" 2K 120Hz"),
            ("battery", "70Wh"),
        ],
        features: &["Business Grade Security", "All-Day Battery", "Sleek Design"],
        rating: 4.7,
        reviews: 89,
        pre_order: None,
    },
    Entry {
        id: 3,
        name: "SNI Velocity V2",
        category: Category::Gaming,
        device_type: DeviceType::Laptop,
        price: 3_299,
        specs: &[
            ("cpu", "AMD Ryzen 9 7940HX"),
            ("gpu", "RTX 4090"),
            ("ram", "64GB DDR5"),
            ("storage", "2TB NVMe SSD"),
            ("display", "18\" 4K 165Hz"),
            ("battery", "99Wh"),
        ],
        features: &["Liquid Cooling", "Mechanical Keyboard", "Premium Audio"],
        rating: 4.9,
        reviews: 156,
        pre_order: None,
    },
    Entry {
        id: 4,
        name: "SNI WorkStation Pro",
        category: Category::Professional,
        device_type: DeviceType::Laptop,
        price: 2_799,
        specs: &[
            ("cpu", "Intel Core i9-13900HX"),
            ("gpu", "RTX 4070"),
            ("ram", "32GB DDR5"),
            ("storage", "1TB NVMe SSD"),
            ("display", "16\" 3K 120Hz"),
            ("battery", "85Wh"),
        ],
        features: &["ISV Certified", "Enterprise Support", "Durable Build"],
        rating: 4.8,
        reviews: 73,
        pre_order: None,
    },
    Entry {
        id: 5,
        name: "SNI Stream 14",
        category: Category::ContentCreation,
        device_type: DeviceType::Laptop,
        price: 1_599,
        specs: &[
            ("cpu", "AMD Ryzen 7 7735HS"),
            ("gpu", "RTX 4050"),
            ("ram", "16GB DDR5"),
            ("storage", "512GB NVMe SSD"),
            ("display", "14\" 2.8K 90Hz"),
            ("battery", "65Wh"),
        ],
        features: &["Color Accurate Display", "Lightweight", "Creator Tools"],
        rating: 4.6,
        reviews: 94,
        pre_order: None,
    },
    Entry {
        id: 6,
        name: "SNI Elite X1",
        category: Category::Gaming,
        device_type: DeviceType::Laptop,
        price: 1_999,
        specs: &[
            ("cpu", "Intel Core i7-13650HX"),
            ("gpu", "RTX 4070"),
            ("ram", "16GB DDR5"),
            ("storage", "1TB NVMe SSD"),
            ("display", "15.6\" 2K 165Hz"),
            ("battery", "80Wh"),
        ],
        features: &["High Refresh Rate", "Advanced RGB", "Optimized Gaming"],
        rating: 4.7,
        reviews: 112,
        pre_order: None,
    },
    Entry {
        id: 7,
        name: "SNI Tower Pro",
        category: Category::Gaming,
        device_type: DeviceType::Pc,
        price: 3_299,
        specs: &[
            ("cpu", "Intel Core i9-13900K"),
            ("gpu", "RTX 4090"),
            ("ram", "64GB DDR5"),
            ("storage", "2TB NVMe SSD"),
            ("display", "Support 4K 144Hz"),
            ("power", "1000W 80+ Gold"),
        ],
        features: &["Liquid Cooling", "RGB Lighting", "Premium Case"],
        rating: 4.9,
        reviews: 89,
        pre_order: None,
    },
    Entry {
        id: 8,
        name: "SNI Compact Mini",
        category: Category::Professional,
        device_type: DeviceType::Pc,
        price: 1_899,
        specs: &[
            ("cpu", "Intel Core i7-13700"),
            ("gpu", "RTX 4060"),
            ("ram", "32GB DDR5"),
            ("storage", "1TB NVMe SSD"),
            ("display", "Support 4K 60Hz"),
            ("power", "650W 80+ Gold"),
        ],
        features: &["Compact Design", "Quiet Operation", "Business Ready"],
        rating: 4.7,
        reviews: 156,
        pre_order: None,
    },
    Entry {
        id: 9,
        name: "SNI Creator Station",
        category: Category::ContentCreation,
        device_type: DeviceType::Pc,
        price: 4_599,
        specs: &[
            ("cpu", "AMD Ryzen 9 7950X"),
            ("gpu", "RTX 4080"),
            ("ram", "128GB DDR5"),
            ("storage", "4TB NVMe SSD"),
            ("display", "Support 8K 60Hz"),
            ("power", "1200W 80+ Platinum"),
        ],
        features: &["8K Ready", "Professional Grade", "Creator Optimized"],
        rating: 4.9,
        reviews: 73,
        pre_order: None,
    },
    Entry {
        id: 10,
        name: "SNI Pod Pro",
        category: Category::Premium,
        device_type: DeviceType::Ipod,
        price: 399,
        specs: &[
            ("storage", "256GB"),
            ("battery", "40 hours"),
            ("display", "3.5\" Retina"),
            ("audio", "Lossless Audio"),
            ("connectivity", "WiFi + Bluetooth"),
            ("water", "IPX7 Waterproof"),
        ],
        features: &["Lossless Audio", "Premium Build", "Long Battery"],
        rating: 4.8,
        reviews: 234,
        pre_order: Some(true),
    },
    Entry {
        id: 11,
        name: "SNI Pod Air",
        category: Category::Portable,
        device_type: DeviceType::Ipod,
        price: 299,
        specs: &[
            ("storage", "128GB"),
            ("battery", "30 hours"),
            ("display", "3.2\" HD"),
            ("audio", "High-Res Audio"),
            ("connectivity", "Bluetooth 5.0"),
            ("water", "IPX5 Water Resistant"),
        ],
        features: &["Lightweight", "Wireless", "Affordable"],
        rating: 4.6,
        reviews: 189,
        pre_order: Some(true),
    },
    Entry {
        id: 12,
        name: "SNI Pod Classic",
        category: Category::Classic,
        device_type: DeviceType::Ipod,
        price: 199,
        specs: &[
            ("storage", "64GB"),
            ("battery", "25 hours"),
            ("display", "2.8\" LCD"),
            ("audio", "Standard Audio"),
            ("connectivity", "USB-C"),
            ("water", "Basic Protection"),
        ],
        features: &["Classic Design", "Simple Interface", "Budget Friendly"],
        rating: 4.4,
        reviews: 145,
        pre_order: Some(false),
    },
];

pub(crate) fn storefront_products() -> Vec<Product> {
    LINEUP
        .iter()
        .map(|entry| Product {
            id: ProductId(entry.id),
            name: entry.name.to_string(),
            category: entry.category,
            device_type: entry.device_type,
            price: entry.price,
            specs: entry
                .specs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect::<BTreeMap<_, _>>(),
            features: entry.features.iter().map(|feature| feature.to_string()).collect(),
            rating: entry.rating,
            reviews: entry.reviews,
            is_pre_order: entry.pre_order,
        })
        .collect()
}
