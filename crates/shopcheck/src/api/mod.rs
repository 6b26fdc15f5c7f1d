//! Catalog REST API client and checks (feature `api`).

mod checks;
mod client;

pub use checks::{run_checks, ApiCheck, Verdict, PERFORMANCE_BUDGET, UNKNOWN_PRODUCT_ID};
pub use client::{ApiResponse, CatalogClient, ProductPayload};
