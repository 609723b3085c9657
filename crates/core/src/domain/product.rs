use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-form attribute value carried in a product's `specs` map. Numbers keep
/// their JSON form, so integers are written back without a fractional part.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<SpecValue>),
    Map(BTreeMap<String, SpecValue>),
}

pub type Specs = BTreeMap<String, SpecValue>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "product_id")]
    pub id: ProductId,
    pub category: String,
    pub brand: String,
    pub price: f64,
    pub rating: f64,
    pub num_reviews: u64,
    #[serde(default)]
    pub specs: Specs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_review: Option<String>,
}

impl Product {
    /// Minimal product used by fixtures and offline tooling; optional display
    /// fields start empty.
    pub fn new(
        id: i64,
        category: impl Into<String>,
        brand: impl Into<String>,
        price: f64,
        rating: f64,
        num_reviews: u64,
    ) -> Self {
        Self {
            id: ProductId(id),
            category: category.into(),
            brand: brand.into(),
            price,
            rating,
            num_reviews,
            specs: Specs::new(),
            model: None,
            currency: None,
            sample_review: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
