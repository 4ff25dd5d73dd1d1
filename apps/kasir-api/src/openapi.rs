//! OpenAPI document, served at `/api-docs/openapi.json`.

use utoipa::OpenApi;

use crate::error::{ErrorBody, ErrorCode};
use crate::routes::checkout::CheckoutRequest;
use crate::routes::health::HealthResponse;
use crate::routes::{categories, checkout, health, products, report, MessageResponse};
use kasir_core::{
    BestSellingProduct, Category, CategoryInput, CheckoutItem, Product, ProductInput,
    SalesReport, Transaction, TransactionDetail,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kasir API",
        description = "Point-of-sale backend: catalog, checkout and sales reports"
    ),
    paths(
        health::health,
        categories::list_categories,
        categories::create_category,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        checkout::checkout,
        report::report_range,
        report::report_today,
    ),
    components(schemas(
        Category,
        CategoryInput,
        Product,
        ProductInput,
        CheckoutItem,
        CheckoutRequest,
        Transaction,
        TransactionDetail,
        SalesReport,
        BestSellingProduct,
        MessageResponse,
        HealthResponse,
        ErrorBody,
        ErrorCode,
    )),
    tags(
        (name = "categories", description = "Product groupings"),
        (name = "products", description = "Products and stock"),
        (name = "checkout", description = "Atomic sales"),
        (name = "report", description = "Revenue and best seller"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_business_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/categories",
            "/api/categories/{id}",
            "/api/produk",
            "/api/produk/{id}",
            "/api/checkout",
            "/api/report",
            "/api/report/today",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
