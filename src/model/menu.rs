use crate::model::StoreId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One orderable variant from a store's catalog (e.g. a 14" hand tossed pizza).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub code: String,
    pub name: String,
    pub price: String,
    pub product_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_code: Option<String>,
}

impl Variant {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
        product_code: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            price: price.into(),
            product_code: product_code.into(),
            size_code: None,
        }
    }

    pub fn with_size(mut self, size_code: impl Into<String>) -> Self {
        self.size_code = Some(size_code.into());
        self
    }
}

/// The priced product catalog offered by a single store.
///
/// Lookup logic lives in [`crate::menu`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub store_id: StoreId,
    #[serde(default)]
    pub variants: BTreeMap<String, Variant>,
}

impl Menu {
    pub fn new(store_id: impl Into<StoreId>) -> Self {
        Self {
            store_id: store_id.into(),
            variants: BTreeMap::new(),
        }
    }

    /// Adds a variant keyed by its code, replacing any previous variant with that code.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.insert(variant.code.clone(), variant);
        self
    }
}
