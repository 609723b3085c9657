//! Immutable in-memory product catalog.
//!
//! A catalog is built once from a fully parsed product list and never mutated
//! afterwards; a reload builds a fresh instance and swaps the shared handle.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::domain::filter::FilterSpec;
use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;

#[derive(Clone, Debug, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

/// Inclusive price bounds. Both ends are NaN when no product matched, which
/// serializes as JSON `null`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn is_empty(&self) -> bool {
        self.min.is_nan() && self.max.is_nan()
    }
}

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> Result<Self, DomainError> {
        let mut index = HashMap::with_capacity(products.len());

        for (position, product) in products.iter().enumerate() {
            validate_product(product)?;
            if index.insert(product.id, position).is_some() {
                return Err(DomainError::DuplicateProductId(product.id));
            }
        }

        Ok(Self { products, index })
    }

    /// Products in load order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).map(|position| &self.products[*position])
    }

    pub fn list_categories(&self) -> Vec<String> {
        self.products
            .iter()
            .map(|product| product.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    pub fn list_brands(&self, category: Option<&str>) -> Vec<String> {
        self.in_category(category)
            .map(|product| product.brand.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    pub fn price_range(&self, category: Option<&str>) -> PriceRange {
        self.in_category(category).fold(PriceRange { min: f64::NAN, max: f64::NAN }, |range, product| {
            PriceRange { min: range.min.min(product.price), max: range.max.max(product.price) }
        })
    }

    pub fn filter(&self, spec: &FilterSpec) -> Vec<&Product> {
        self.products.iter().filter(|product| spec.matches(product)).collect()
    }

    /// Other products sharing the reference's category, in load order.
    pub fn peers_of<'a>(&'a self, reference: &'a Product) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |product| product.category == reference.category && product.id != reference.id)
    }

    /// One-based page of the raw listing. Page zero is treated as the first
    /// page; pages past the end are empty.
    pub fn page(&self, page: usize, page_size: usize) -> &[Product] {
        let start = page.saturating_sub(1).saturating_mul(page_size);
        if start >= self.products.len() {
            return &[];
        }
        let end = start.saturating_add(page_size).min(self.products.len());
        &self.products[start..end]
    }

    fn in_category<'a>(&'a self, category: Option<&'a str>) -> impl Iterator<Item = &'a Product> + 'a {
        let category = category.filter(|value| !value.is_empty());
        self.products
            .iter()
            .filter(move |product| category.map_or(true, |wanted| product.category == wanted))
    }
}

fn validate_product(product: &Product) -> Result<(), DomainError> {
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(DomainError::InvalidPrice { id: product.id, price: product.price });
    }
    if !(0.0..=5.0).contains(&product.rating) {
        return Err(DomainError::InvalidRating { id: product.id, rating: product.rating });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ProductCatalog;
    use crate::domain::filter::FilterSpec;
    use crate::domain::product::{Product, ProductId};
    use crate::errors::DomainError;

    fn catalog() -> ProductCatalog {
        ProductCatalog::new(vec![
            Product::new(10, "Laptops", "Orbit", 1200.0, 4.6, 310),
            Product::new(11, "Phones", "Nova", 650.0, 4.1, 95),
            Product::new(12, "Laptops", "Acme", 899.0, 3.9, 40),
            Product::new(13, "Phones", "Acme", 420.0, 4.4, 1500),
            Product::new(14, "Laptops", "Orbit", 1500.0, 4.8, 12),
        ])
        .expect("fixture catalog should be valid")
    }

    #[test]
    fn categories_are_sorted_and_unique() {
        assert_eq!(catalog().list_categories(), vec!["Laptops", "Phones"]);
    }

    #[test]
    fn brands_can_be_restricted_to_a_category() {
        let catalog = catalog();

        assert_eq!(catalog.list_brands(None), vec!["Acme", "Nova", "Orbit"]);
        assert_eq!(catalog.list_brands(Some("Laptops")), vec!["Acme", "Orbit"]);
        assert_eq!(catalog.list_brands(Some("")), vec!["Acme", "Nova", "Orbit"]);
        assert!(catalog.list_brands(Some("Cameras")).is_empty());
    }

    #[test]
    fn price_range_reports_no_data_for_unknown_category() {
        let catalog = catalog();

        let laptops = catalog.price_range(Some("Laptops"));
        assert_eq!((laptops.min, laptops.max), (899.0, 1500.0));
        assert!(!laptops.is_empty());

        let overall = catalog.price_range(None);
        assert_eq!((overall.min, overall.max), (420.0, 1500.0));

        let missing = catalog.price_range(Some("Cameras"));
        assert!(missing.is_empty());
        assert_eq!(
            serde_json::to_value(missing).expect("range should serialize"),
            serde_json::json!({ "min": null, "max": null })
        );
    }

    #[test]
    fn filter_keeps_load_order_and_applies_every_constraint() {
        let catalog = catalog();
        let spec = FilterSpec::new()
            .with_category("Laptops")
            .with_brands(["Orbit", "Acme"])
            .with_price_bounds(Some(899.0), Some(1500.0))
            .with_min_rating(3.9);

        let ids: Vec<i64> = catalog.filter(&spec).iter().map(|product| product.id.0).collect();
        assert_eq!(ids, vec![10, 12, 14]);

        let narrowed = spec.with_min_rating(4.7);
        let ids: Vec<i64> = catalog.filter(&narrowed).iter().map(|product| product.id.0).collect();
        assert_eq!(ids, vec![14]);
    }

    #[test]
    fn unconstrained_filter_returns_everything() {
        let catalog = catalog();
        assert_eq!(catalog.filter(&FilterSpec::new()).len(), catalog.len());
    }

    #[test]
    fn lookup_by_id() {
        let catalog = catalog();

        assert_eq!(catalog.get(ProductId(13)).map(|product| product.brand.as_str()), Some("Acme"));
        assert!(catalog.get(ProductId(99)).is_none());
    }

    #[test]
    fn peers_exclude_the_reference() {
        let catalog = catalog();
        let reference = catalog.get(ProductId(10)).expect("fixture product");

        let ids: Vec<i64> = catalog.peers_of(reference).map(|product| product.id.0).collect();
        assert_eq!(ids, vec![12, 14]);
    }

    #[test]
    fn pages_slice_the_listing() {
        let catalog = catalog();

        assert_eq!(catalog.page(1, 2).len(), 2);
        assert_eq!(catalog.page(3, 2).iter().map(|p| p.id.0).collect::<Vec<_>>(), vec![14]);
        assert_eq!(catalog.page(0, 2)[0].id, ProductId(10));
        assert!(catalog.page(4, 2).is_empty());
        assert!(catalog.page(1, 0).is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = ProductCatalog::new(vec![
            Product::new(1, "Phones", "Nova", 100.0, 4.0, 1),
            Product::new(1, "Phones", "Zen", 120.0, 4.0, 1),
        ]);

        assert_eq!(result.err(), Some(DomainError::DuplicateProductId(ProductId(1))));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let negative_price =
            ProductCatalog::new(vec![Product::new(1, "Phones", "Nova", -1.0, 4.0, 1)]);
        assert!(matches!(negative_price, Err(DomainError::InvalidPrice { .. })));

        let high_rating = ProductCatalog::new(vec![Product::new(2, "Phones", "Nova", 1.0, 5.5, 1)]);
        assert!(matches!(high_rating, Err(DomainError::InvalidRating { .. })));
    }
}
