//! # Gateways
//!
//! One gateway per upstream. Each gateway validates its input, makes exactly
//! one upstream call, and folds whatever comes back into an [`Outcome`].
//!
//! | Gateway | Upstream | Failure codes |
//! |---|---|---|
//! | [`order::OrderGateway`] | order macro endpoint | 500, 502 |
//! | [`user::UserLookupGateway`] | user document store | 400, 404, 500 |
//! | [`geocode::GeocodeGateway`] | pincode resolver | 400, 404, 500 |
//! | [`recommend::RecommendationGateway`] | recommendation generator | 500 |
//!
//! No gateway retries. Timeouts live on the shared [`reqwest::Client`].
//!
//! [`Outcome`]: crate::error::Outcome
use std::time::Duration;

use reqwest::Client;

pub mod geocode;
pub mod order;
pub mod recommend;
pub mod user;

pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}
