//! Errors raised while resolving demand into production chains

use thiserror::Error;

use crate::models::{Product, ResidentType};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalcError {
    /// Demand was requested for a product no recipe produces
    #[error("no production found for product {0}")]
    NoProducer(Product),

    #[error("invalid population for {resident}: {count}")]
    InvalidPopulation { resident: ResidentType, count: f64 },

    #[error("invalid demand for {product}: {rate}")]
    InvalidDemand { product: Product, rate: f64 },

    /// A prerequisite names a recipe key missing from the catalog
    #[error("unknown recipe '{0}'")]
    UnknownRecipe(String),

    #[error("production catalog contains a cycle through '{0}'")]
    CyclicCatalog(String),

    #[error("invalid recipe '{key}': {reason}")]
    InvalidRecipe { key: String, reason: String },

    #[error("unknown tag '{0}'")]
    UnknownTag(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;
