//! Products page.
//!
//! # Usage
//!
//! ```bash
//! shopdesk products list --category pantry
//! shopdesk products create --name "Mango Pickle" --price 249.50 --stock 12 --category Pantry
//! shopdesk products update 4 --stock 0
//! shopdesk products delete 4
//! ```

use shopdesk_admin::models::{NewProduct, ProductUpdate};
use shopdesk_admin::{AdminConsole, AdminError, ValidationError};
use shopdesk_core::{Price, ProductId};

use super::{CliError, Output};

pub async fn list(
    console: &AdminConsole,
    out: Output,
    category: Option<&str>,
) -> Result<(), CliError> {
    let mut view = console.products().await?;
    view.set_category_filter(category);
    view.list().await?;
    out.view(&view)
}

/// Product fields given on the command line.
#[derive(Default)]
pub struct ProductArgs {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

pub async fn create(console: &AdminConsole, out: Output, args: ProductArgs) -> Result<(), CliError> {
    let price = args
        .price
        .ok_or(ValidationError::Required("Price"))
        .map_err(AdminError::from)?;
    let product = NewProduct::new(
        args.name.as_deref().unwrap_or_default(),
        price,
        args.stock.unwrap_or(0),
    )
    .map_err(AdminError::from)?
    .description(args.description.as_deref())
    .category(args.category.as_deref())
    .image_url(args.image_url.as_deref());

    let mut view = console.products().await?;
    let created = view.create(&product).await?;
    out.record(
        &created,
        format!("Created product {} ({})", created.id, created.name),
    )
}

pub async fn update(
    console: &AdminConsole,
    out: Output,
    id: ProductId,
    args: ProductArgs,
) -> Result<(), CliError> {
    let update = ProductUpdate {
        name: args.name,
        description: args.description,
        price: args.price,
        stock_quantity: args.stock,
        category: args.category,
        image_url: args.image_url,
    };
    update.validate().map_err(AdminError::from)?;

    let mut view = console.products().await?;
    view.list().await?;
    let product = view.update(id, &update).await?;
    out.record(
        &product,
        format!("Updated product {} ({})", product.id, product.name),
    )
}

pub async fn delete(console: &AdminConsole, out: Output, id: ProductId) -> Result<(), CliError> {
    let mut view = console.products().await?;
    view.list().await?;
    view.delete(id).await?;
    out.line(format!("Deleted product {id}"))
}
