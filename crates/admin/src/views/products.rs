//! Products view.

use serde_json::Value;
use shopdesk_core::ProductId;
use tracing::{info, instrument};

use super::{Collection, ResourceView, call, schema_error};
use crate::api::{ApiClient, HttpError, decode_item, decode_list};
use crate::components::TableColumn;
use crate::error::AdminError;
use crate::models::{NewProduct, Product, ProductUpdate};

const PRODUCTS_PATH: &str = "/admin/products";

/// Catalog management with a category filter.
#[derive(Debug)]
pub struct ProductsView {
    api: ApiClient,
    cache: Collection<Product>,
    category_filter: Option<String>,
}

impl ProductsView {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: Collection::new("Product"),
            category_filter: None,
        }
    }

    /// Show only products in `category` (case-insensitive); `None` shows all.
    pub fn set_category_filter(&mut self, category: Option<&str>) {
        self.category_filter = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToString::to_string);
    }

    /// Distinct categories present in the cache, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .cache
            .items()
            .iter()
            .filter_map(|p| p.category.as_deref())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Fetch the catalog and replace the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn list(&mut self) -> Result<&[Product], AdminError> {
        const ACTION: &str = "Failed to fetch products";
        let value = call(&self.api, ACTION, self.api.get_value(PRODUCTS_PATH, &[])).await?;
        let products = decode_list(value, "products").map_err(schema_error(ACTION))?;
        self.cache.replace_all(products);
        Ok(self.cache.items())
    }

    /// Create a product and add it to the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. If the backend accepts the
    /// product but does not return it, the cache is refetched and a schema
    /// error is reported.
    #[instrument(skip_all, fields(name = %product.name))]
    pub async fn create(&mut self, product: &NewProduct) -> Result<Product, AdminError> {
        const ACTION: &str = "Failed to create product";
        let value: Value = call(&self.api, ACTION, self.api.post(PRODUCTS_PATH, product)).await?;

        match decode_item::<Product>(value, "product").map_err(schema_error(ACTION))? {
            Some(created) => {
                info!(product_id = %created.id, "Product created");
                self.cache.upsert(created.clone());
                Ok(created)
            }
            None => {
                self.list().await?;
                Err(AdminError::request(
                    ACTION,
                    HttpError::Schema("response did not include the product".to_string()),
                ))
            }
        }
    }

    /// Change some fields of a product.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or invalid update or an
    /// unlisted id, or an error if the request fails.
    #[instrument(skip(self, update), fields(product_id = %id))]
    pub async fn update(
        &mut self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, AdminError> {
        const ACTION: &str = "Failed to update product";
        update.validate()?;
        self.cache.require(id)?;

        let path = format!("{PRODUCTS_PATH}/{id}");
        let value = call(&self.api, ACTION, self.api.put(&path, update)).await?;

        match decode_item::<Product>(value, "product").map_err(schema_error(ACTION))? {
            Some(updated) => self.cache.upsert(updated),
            None => {
                self.cache.patch(id, |product| update.apply_to(product));
            }
        }
        Ok(self.cache.require(id)?.clone())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownEntity` if `id` was not listed, or an
    /// error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&mut self, id: ProductId) -> Result<(), AdminError> {
        const ACTION: &str = "Failed to delete product";
        self.cache.require(id)?;

        let path = format!("{PRODUCTS_PATH}/{id}");
        call(&self.api, ACTION, self.api.delete(&path)).await?;

        self.cache.remove(id);
        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

impl ResourceView for ProductsView {
    type Entity = Product;

    const NOUN: &'static str = "products";

    fn cache(&self) -> &Collection<Product> {
        &self.cache
    }

    fn visible(&self) -> Vec<&Product> {
        match self.category_filter.as_deref() {
            Some(category) => self.cache.filtered(move |p| p.in_category(category)),
            None => self.cache.items().iter().collect(),
        }
    }

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::numeric("id", "ID"),
            TableColumn::new("name", "Name"),
            TableColumn::new("category", "Category"),
            TableColumn::numeric("price", "Price"),
            TableColumn::numeric("stock", "Stock"),
        ]
    }

    fn row(product: &Product) -> Vec<String> {
        vec![
            product.id.to_string(),
            product.name.clone(),
            product.category.clone().unwrap_or_else(|| "-".to_string()),
            product.price.to_string(),
            product.stock_quantity.to_string(),
        ]
    }
}
