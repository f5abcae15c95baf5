//! Parser for the compact topping spec `name[:side[:amount]]`.
//!
//! | Spec              | Code      | Placement   | Amount |
//! |-------------------|-----------|-------------|--------|
//! | `pepperoni`       | pepperoni | whole       | `1.0`  |
//! | `olive:left`      | olive     | left half   | `1.0`  |
//! | `basil:right:0.5` | basil     | right half  | `0.5`  |
//!
//! `side` keywords (`left`, `right`, `full`) match case-insensitively. Any other
//! side is kept verbatim as [`ToppingPlacement::Other`]. The amount is never
//! interpreted here.

use super::OrderError;
use crate::model::{Topping, ToppingPlacement, DEFAULT_TOPPING_AMOUNT};
use std::str::FromStr;
use tracing::warn;

const MAX_FIELDS: usize = 3;

/// A parsed topping spec, ready to be applied to a product item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToppingSpec {
    pub code: String,
    pub placement: ToppingPlacement,
    pub amount: String,
}

impl ToppingSpec {
    pub fn topping(&self) -> Topping {
        Topping::new(self.placement.clone(), self.amount.clone())
    }
}

impl FromStr for ToppingSpec {
    type Err = OrderError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = spec.split(':').collect();
        if fields[0].is_empty() || fields.len() > MAX_FIELDS {
            return Err(OrderError::InvalidToppingFormat(spec.to_string()));
        }

        let placement = match fields.get(1) {
            None => ToppingPlacement::Whole,
            Some(side) => parse_side(side),
        };
        let amount = fields
            .get(2)
            .map_or_else(|| DEFAULT_TOPPING_AMOUNT.to_string(), |amount| amount.to_string());

        Ok(Self {
            code: fields[0].to_string(),
            placement,
            amount,
        })
    }
}

fn parse_side(side: &str) -> ToppingPlacement {
    match side.to_ascii_lowercase().as_str() {
        "left" => ToppingPlacement::LeftHalf,
        "right" => ToppingPlacement::RightHalf,
        "full" => ToppingPlacement::Whole,
        _ => {
            let placement = ToppingPlacement::from(side.to_string());
            if !placement.is_known() {
                warn!(side, "Unrecognized topping side, passing through");
            }
            placement
        }
    }
}

/// Parses a single topping spec.
pub fn parse_topping(spec: &str) -> Result<ToppingSpec, OrderError> {
    spec.parse()
}
