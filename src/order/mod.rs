//! Order mutation rules: products, toppings and validation.
//!
//! Every mutation is checked before anything is changed, so a failed call
//! leaves the [`Order`] exactly as it was.

pub mod error;
pub mod topping;

pub use error::*;
pub use topping::*;

use crate::model::{Order, ProductItem, Topping, ToppingPlacement};
use tracing::{debug, warn};

/// Largest topping amount accepted without a warning.
const MAX_REGULAR_AMOUNT: f64 = 2.0;

/// Result of a successful [`Order::validate`].
///
/// A `Warning` still means the order can be saved and submitted; the messages
/// are meant to be shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid,
    Warning(Vec<String>),
}

impl Validation {
    pub fn is_warning(&self) -> bool {
        matches!(self, Validation::Warning(_))
    }
}

impl Order {
    /// Appends a product. The same code may appear as several line items.
    pub fn add_product(&mut self, item: ProductItem) {
        debug!(order = %self.name, code = %item.code, "Adding product");
        self.products.push(item);
    }

    /// Removes the first item with `code`.
    pub fn remove_product(&mut self, code: &str) -> Result<ProductItem, OrderError> {
        let index = self
            .products
            .iter()
            .position(|item| item.code == code)
            .ok_or_else(|| OrderError::ProductNotFound {
                order: self.name.clone(),
                code: code.to_string(),
            })?;
        Ok(self.products.remove(index))
    }

    /// First item with `code`, if any.
    pub fn find_item(&self, code: &str) -> Option<&ProductItem> {
        self.products.iter().find(|item| item.code == code)
    }

    pub fn find_item_mut(&mut self, code: &str) -> Option<&mut ProductItem> {
        self.products.iter_mut().find(|item| item.code == code)
    }

    /// Parses `spec` and sets the topping on the first item with `code`.
    pub fn apply_topping(&mut self, code: &str, spec: &str) -> Result<(), OrderError> {
        self.apply_toppings(code, &[spec])
    }

    /// Parses every spec, then sets them all on the first item with `code`.
    ///
    /// Nothing is applied unless every spec parses and the item exists. Later
    /// specs for the same topping overwrite earlier ones.
    pub fn apply_toppings<S: AsRef<str>>(&mut self, code: &str, specs: &[S]) -> Result<(), OrderError> {
        let parsed = specs
            .iter()
            .map(|spec| parse_topping(spec.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let order = self.name.clone();
        let item = self.find_item_mut(code).ok_or_else(|| OrderError::ItemNotFound {
            order,
            code: code.to_string(),
        })?;
        for spec in parsed {
            debug!(item = %item.code, ?spec, "Applying topping");
            item.toppings.set(spec.code.clone(), spec.topping());
        }
        Ok(())
    }

    /// Removes `topping` from the first item with `code`.
    ///
    /// Returns the removed topping, or `None` if the item did not have it.
    pub fn remove_topping(&mut self, code: &str, topping: &str) -> Result<Option<Topping>, OrderError> {
        let order = self.name.clone();
        let item = self.find_item_mut(code).ok_or_else(|| OrderError::ItemNotFound {
            order,
            code: code.to_string(),
        })?;
        Ok(item.toppings.remove(topping))
    }

    /// Runs the domain checks.
    ///
    /// Hard failures (no products, missing or incomplete address, no service
    /// method, zero quantity, non-numeric topping amount) return
    /// [`OrderError::ValidationError`]. Questionable but acceptable settings
    /// (unrecognized placement tokens, unusually large amounts) return
    /// [`Validation::Warning`].
    pub fn validate(&self) -> Result<Validation, OrderError> {
        if self.products.is_empty() {
            return Err(OrderError::ValidationError(format!(
                "order {:?} has no products",
                self.name
            )));
        }
        let address = self
            .address
            .as_ref()
            .ok_or_else(|| OrderError::ValidationError("order has no address".into()))?;
        if [&address.street, &address.city, &address.state, &address.zip]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(OrderError::ValidationError(format!(
                "incomplete address: {address}"
            )));
        }
        if self.service_method.is_none() {
            return Err(OrderError::ValidationError("order has no service method".into()));
        }

        let mut warnings = Vec::new();
        for item in &self.products {
            if item.quantity == 0 {
                return Err(OrderError::ValidationError(format!(
                    "product {:?} has a quantity of zero",
                    item.code
                )));
            }
            for (code, topping) in item.toppings.iter() {
                let amount: f64 = topping.amount.parse().map_err(|_| {
                    OrderError::ValidationError(format!(
                        "topping {code:?} on {:?} has a non-numeric amount {:?}",
                        item.code, topping.amount
                    ))
                })?;
                if !(amount > 0.0) {
                    return Err(OrderError::ValidationError(format!(
                        "topping {code:?} on {:?} must have a positive amount",
                        item.code
                    )));
                }
                if amount > MAX_REGULAR_AMOUNT {
                    warnings.push(format!(
                        "topping {code:?} on {:?} has an unusually large amount {}",
                        item.code, topping.amount
                    ));
                }
                if let ToppingPlacement::Other(token) = &topping.placement {
                    warnings.push(format!(
                        "topping {code:?} on {:?} has an unrecognized placement {token:?}",
                        item.code
                    ));
                }
            }
        }

        if warnings.is_empty() {
            Ok(Validation::Valid)
        } else {
            warn!(order = %self.name, count = warnings.len(), "Order has warnings");
            Ok(Validation::Warning(warnings))
        }
    }
}
