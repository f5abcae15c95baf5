use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::locator::LocatorError;

/// Geographic coordinates attached to an address once it has been geocoded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A street address used for store lookup and order delivery.
///
/// Addresses are treated as immutable values: an order carries a snapshot,
/// and the store locator compares snapshots to decide whether its memo is
/// still valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Address {
    /// Creates a new Address without coordinates.
    ///
    /// # Arguments
    /// * `street` - First address line
    /// * `city` - City name
    /// * `state` - Two letter state code
    /// * `zip` - Postal code
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
            coordinates: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(Coordinates { latitude, longitude });
        self
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }
}

/// How an order is fulfilled. Affects which stores are eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceMethod {
    Delivery,
    Carryout,
}

impl ServiceMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMethod::Delivery => "Delivery",
            ServiceMethod::Carryout => "Carryout",
        }
    }
}

impl Display for ServiceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceMethod {
    type Err = LocatorError;

    /// Accepts `delivery` or `carryout` in any case. Everything else,
    /// including the empty string, is a [`LocatorError::BadServiceMethod`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("delivery") {
            Ok(ServiceMethod::Delivery)
        } else if s.eq_ignore_ascii_case("carryout") {
            Ok(ServiceMethod::Carryout)
        } else {
            Err(LocatorError::BadServiceMethod(s.to_string()))
        }
    }
}
