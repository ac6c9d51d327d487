//! Catalog route handlers.

use axum::{Json, extract::Path};
use serde::Serialize;
use simpshopy_core::{CurrencyCode, Product, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequireStore;

/// A product as shown to shoppers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    /// Display price, e.g. `5000 FCFA` or `$19.99`.
    pub price: String,
    /// Amount rounded to the currency's minor units.
    pub amount: String,
    pub currency_code: CurrencyCode,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let digits = product.price.currency_code.minor_units() as usize;
        Self {
            id: product.id,
            handle: product.handle.clone(),
            title: product.title.clone(),
            price: product.price.format(),
            amount: format!("{:.digits$}", product.price.rounded()),
            currency_code: product.price.currency_code,
        }
    }
}

/// Catalog listing response.
#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<ProductView>,
    /// False when the catalog could not be read for this request.
    pub catalog_available: bool,
}

/// `GET /api/store/products`.
pub async fn list(RequireStore(context): RequireStore) -> Json<ProductList> {
    Json(ProductList {
        products: context.products.iter().map(ProductView::from).collect(),
        catalog_available: context.catalog_warning.is_none(),
    })
}

/// `GET /store/{slug}/products`.
///
/// # Errors
///
/// Returns `AppError::StoreNotFound` when `{slug}` is not the resolved store.
pub async fn store_list(
    Path(slug): Path<String>,
    RequireStore(context): RequireStore,
) -> Result<Json<ProductList>> {
    if !context.store.slug.as_str().eq_ignore_ascii_case(&slug) {
        return Err(AppError::StoreNotFound);
    }
    Ok(list(RequireStore(context)).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use simpshopy_core::{Price, ProductStatus, StoreId};

    use super::*;
    use crate::testing::product;

    #[test]
    fn test_product_view_formats_price() {
        let mut tee = product(StoreId::generate(), "tee", ProductStatus::Active);
        let view = ProductView::from(&tee);
        assert_eq!(view.price, "5000 FCFA");
        assert_eq!(view.amount, "5000");

        tee.price = Price::new(Decimal::new(19_999, 3), CurrencyCode::USD);
        let view = ProductView::from(&tee);
        assert_eq!(view.price, "$20.00");
        assert_eq!(view.amount, "20.00");
    }
}
