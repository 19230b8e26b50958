use axum::Json;
use micromob_core::pricing::{price_list, PriceList};

/// Static price texts for scooters and city bikes in all supported locales.
pub(super) async fn list_prices() -> Json<PriceList> {
    Json(price_list())
}
