//! Authoritative set of product listings and their stock levels.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::product::{NewProduct, Product};

use super::{read_guard, write_guard};

/// Rating every new listing starts out with.
const SEED_RATING: f32 = 5.0;

#[derive(Default)]
pub struct CatalogStore {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole catalog, used when loading a persisted snapshot.
    pub fn replace_all(&self, products: Vec<Product>) -> Result<(), DomainError> {
        let mut map = write_guard(&self.products)?;
        *map = products.into_iter().map(|p| (p.id, p)).collect();
        Ok(())
    }

    pub fn add_product(
        &self,
        seller_id: Uuid,
        seller_name: &str,
        fields: NewProduct,
    ) -> Result<Product, DomainError> {
        if fields.name.trim().is_empty() {
            return Err(DomainError::Validation("product name is required".to_string()));
        }
        if fields.image.trim().is_empty() {
            return Err(DomainError::Validation("product image is required".to_string()));
        }
        if fields.price < 0 {
            return Err(DomainError::Validation("price must not be negative".to_string()));
        }

        let product = Product {
            id: Uuid::new_v4(),
            seller_id,
            seller_name: seller_name.to_string(),
            name: fields.name,
            description: fields.description,
            category: fields.category,
            price: fields.price,
            image: fields.image,
            rating: SEED_RATING,
            review_count: 0,
            stock: fields.stock,
            allow_pre_order: fields.allow_pre_order,
            created_at: Utc::now(),
        };

        let mut map = write_guard(&self.products)?;
        map.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn get(&self, product_id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(read_guard(&self.products)?.get(&product_id).cloned())
    }

    /// Newest listings first.
    pub fn list(&self) -> Result<Vec<Product>, DomainError> {
        let map = read_guard(&self.products)?;
        let mut all: Vec<Product> = map.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    /// Check-and-decrement under the store lock, so two checkouts racing for
    /// the last unit cannot both succeed.
    pub fn decrement_stock(&self, product_id: Uuid) -> Result<Product, DomainError> {
        let mut map = write_guard(&self.products)?;
        let product = map.get_mut(&product_id).ok_or(DomainError::NotFound)?;
        if product.stock == 0 {
            return Err(DomainError::OutOfStock);
        }
        product.stock -= 1;
        Ok(product.clone())
    }

    /// Owner-gated edit of the seller-controlled fields.
    pub fn update_product(
        &self,
        product_id: Uuid,
        requester_id: Uuid,
        edit: ProductEdit,
    ) -> Result<Product, DomainError> {
        if let Some(price) = edit.price {
            if price < 0 {
                return Err(DomainError::Validation("price must not be negative".to_string()));
            }
        }
        let mut map = write_guard(&self.products)?;
        let product = map.get_mut(&product_id).ok_or(DomainError::NotFound)?;
        if product.seller_id != requester_id {
            return Err(DomainError::Authorization(
                "only the owning seller may edit a listing".to_string(),
            ));
        }
        if let Some(name) = edit.name {
            if name.trim().is_empty() {
                return Err(DomainError::Validation("product name is required".to_string()));
            }
            product.name = name;
        }
        if let Some(description) = edit.description {
            product.description = description;
        }
        if let Some(price) = edit.price {
            product.price = price;
        }
        if let Some(image) = edit.image {
            product.image = image;
        }
        if let Some(stock) = edit.stock {
            product.stock = stock;
        }
        if let Some(allow_pre_order) = edit.allow_pre_order {
            product.allow_pre_order = allow_pre_order;
        }
        Ok(product.clone())
    }

    pub fn delete_product(&self, product_id: Uuid, requester_id: Uuid) -> Result<(), DomainError> {
        let mut map = write_guard(&self.products)?;
        let product = map.get(&product_id).ok_or(DomainError::NotFound)?;
        if product.seller_id != requester_id {
            return Err(DomainError::Authorization(
                "only the owning seller may delete a listing".to_string(),
            ));
        }
        map.remove(&product_id);
        Ok(())
    }

    /// Cascade for store/account deletion. Idempotent.
    pub fn delete_all_by_seller(&self, seller_id: Uuid) -> Result<usize, DomainError> {
        let mut map = write_guard(&self.products)?;
        let before = map.len();
        map.retain(|_, p| p.seller_id != seller_id);
        Ok(before - map.len())
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Default, Clone)]
pub struct ProductEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub image: Option<String>,
    pub stock: Option<u32>,
    pub allow_pre_order: Option<bool>,
}
