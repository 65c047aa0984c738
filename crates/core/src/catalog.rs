//! The product catalog.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A product the assistant can take orders for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    /// Display name, also the catalog key.
    pub name: String,
    /// One-line description shown to the user and the model.
    pub details: String,
}

impl Product {
    /// Creates a product.
    #[inline]
    pub fn new<N: Into<String>, D: Into<String>>(name: N, details: D) -> Self {
        Self {
            name: name.into(),
            details: details.into(),
        }
    }
}

/// A read-only, ordered table of products.
///
/// Names are unique and non-empty. The catalog is loaded once at startup
/// and shared between sessions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Creates a catalog from the given products, keeping their order.
    pub fn new(products: Vec<Product>) -> Result<Self, Error> {
        if products.is_empty() {
            return Err(Error::invalid_catalog().with_reason("catalog is empty"));
        }
        let mut seen = HashSet::new();
        for product in &products {
            if product.name.trim().is_empty() {
                return Err(Error::invalid_catalog()
                    .with_reason("product name must not be empty"));
            }
            if !seen.insert(product.name.as_str()) {
                return Err(Error::invalid_catalog().with_reason(format!(
                    "duplicate product: {}",
                    product.name
                )));
            }
        }
        Ok(Self { products })
    }

    /// Parses a catalog from a JSON array of `{"name", "details"}` objects.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let products = serde_json::from_str::<Vec<Product>>(json)
            .map_err(|err| Error::invalid_catalog().with_reason(format!("{err}")))?;
        Self::new(products)
    }

    /// Looks up a product by its exact name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Looks up a product ignoring case, for hosts that accept typed names.
    #[inline]
    pub fn find_ignore_case(&self, name: &str) -> Option<&Product> {
        let name = name.trim().to_lowercase();
        self.products.iter().find(|p| p.name.to_lowercase() == name)
    }

    /// Returns the products in catalog order.
    #[inline]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Returns the number of products.
    #[inline]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Always `false`, a catalog cannot be built empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    /// The built-in electronics catalog.
    fn default() -> Self {
        let products = [
            ("Smartphone", "128GB, Dual SIM, AMOLED display"),
            ("Laptop", "16GB RAM, 512GB SSD, Intel i7"),
            ("Headphones", "Wireless, Noise Cancelling"),
            ("Smartwatch", "Fitness tracker, Heart-rate monitor"),
            ("Camera", "DSLR, 24MP, 4K Video"),
        ]
        .into_iter()
        .map(|(name, details)| Product::new(name, details))
        .collect();
        Self { products }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.products()[0].name, "Smartphone");
        assert_eq!(catalog.get("Camera").unwrap().details, "DSLR, 24MP, 4K Video");
        assert!(catalog.get("camera").is_none());
        assert_eq!(catalog.find_ignore_case(" camera ").unwrap().name, "Camera");
    }

    #[test]
    fn test_from_json_keeps_order() {
        let catalog = Catalog::from_json(
            r#"[
                {"name": "Tablet", "details": "10 inch, 256GB"},
                {"name": "E-reader", "details": "6 inch, glare-free"}
            ]"#,
        )
        .unwrap();
        let names: Vec<_> =
            catalog.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Tablet", "E-reader"]);
    }

    #[test]
    fn test_rejects_bad_catalogs() {
        let err = Catalog::from_json("[]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCatalog);

        let err = Catalog::from_json(r#"{"name": "Tablet"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCatalog);

        let err = Catalog::new(vec![
            Product::new("Tablet", "a"),
            Product::new("Tablet", "b"),
        ])
        .unwrap_err();
        assert_eq!(err.reason(), "duplicate product: Tablet");

        let err = Catalog::new(vec![Product::new("  ", "blank")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCatalog);
    }
}
