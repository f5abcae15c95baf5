//! Product line items and their topping mappings.
//!
//! A [`ProductItem`] is what ends up inside an [`Order`](crate::model::Order).
//! Toppings are kept in a [`ToppingMap`] keyed by topping code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Default amount used when a topping is added without one.
pub const DEFAULT_TOPPING_AMOUNT: &str = "1.0";

/// Which part of the item a topping covers.
///
/// Serialized with the ordering API's coverage tokens (`1/1`, `1/2`, `2/2`).
/// Tokens outside those three are kept verbatim in [`ToppingPlacement::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToppingPlacement {
    Whole,
    LeftHalf,
    RightHalf,
    Other(String),
}

impl ToppingPlacement {
    pub fn token(&self) -> &str {
        match self {
            ToppingPlacement::Whole => "1/1",
            ToppingPlacement::LeftHalf => "1/2",
            ToppingPlacement::RightHalf => "2/2",
            ToppingPlacement::Other(token) => token,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ToppingPlacement::Other(_))
    }
}

impl From<String> for ToppingPlacement {
    fn from(token: String) -> Self {
        match token.as_str() {
            "1/1" => ToppingPlacement::Whole,
            "1/2" => ToppingPlacement::LeftHalf,
            "2/2" => ToppingPlacement::RightHalf,
            _ => ToppingPlacement::Other(token),
        }
    }
}

impl From<ToppingPlacement> for String {
    fn from(placement: ToppingPlacement) -> Self {
        match placement {
            ToppingPlacement::Other(token) => token,
            known => known.token().to_string(),
        }
    }
}

impl Display for ToppingPlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Placement and amount of one topping on a product item.
///
/// The amount is kept as the string the user supplied; it is only
/// interpreted as a decimal when the order is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topping {
    pub placement: ToppingPlacement,
    pub amount: String,
}

impl Topping {
    pub fn new(placement: ToppingPlacement, amount: impl Into<String>) -> Self {
        Self {
            placement,
            amount: amount.into(),
        }
    }
}

impl Default for Topping {
    fn default() -> Self {
        Self::new(ToppingPlacement::Whole, DEFAULT_TOPPING_AMOUNT)
    }
}

/// Mapping from topping code to its placement on an item.
///
/// Keys are unique. [`ToppingMap::set`] is last-write-wins: setting a code
/// that is already present replaces its placement and amount outright, there
/// is no merging of halves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToppingMap(BTreeMap<String, Topping>);

impl ToppingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the topping for `code`, returning the previous value.
    pub fn set(&mut self, code: impl Into<String>, topping: Topping) -> Option<Topping> {
        self.0.insert(code.into(), topping)
    }

    pub fn get(&self, code: &str) -> Option<&Topping> {
        self.0.get(code)
    }

    pub fn remove(&mut self, code: &str) -> Option<Topping> {
        self.0.remove(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Topping)> {
        self.0.iter()
    }
}

/// A single line item in an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductItem {
    pub code: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub toppings: ToppingMap,
}

impl ProductItem {
    /// Creates a new ProductItem with a quantity of one and no toppings.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            quantity: 1,
            size: None,
            toppings: ToppingMap::new(),
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}
