use axum::response::IntoResponse;

// Undocumented root route; handy for quick liveness checks by hand.
pub async fn root() -> impl IntoResponse {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
