//! Products Data

use crate::domain::products::records::ProductUuid;

/// Stock count assigned to products created without one.
pub const DEFAULT_STOCK_COUNT: u32 = 10;

/// Category filter value that lists every product.
pub const ALL_CATEGORIES: &str = "all";

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: u64,
    pub image_url: String,
    pub count_in_stock: u32,
}

/// Normalise a category filter: blank values and `all` mean no filter.
#[must_use]
pub fn category_filter(category: Option<&str>) -> Option<&str> {
    category
        .map(str::trim)
        .filter(|category| !category.is_empty() && !category.eq_ignore_ascii_case(ALL_CATEGORIES))
}
