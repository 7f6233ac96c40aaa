use std::sync::Arc;

use axum::{Json, body::Bytes, extract};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::Outcome,
    gateway::{
        geocode::Location, order::OrderAccepted, recommend::Recommendations, user::UserEmail,
    },
    state::State,
    utils::{parse_body, parse_optional_body, parse_relayed_body},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeRequest {
    #[serde(default)]
    pin_code: String,
}

#[derive(Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    phone: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    user_id: Option<String>,
}

pub async fn order_handler(
    extract::State(state): extract::State<Arc<State>>,
    body: Bytes,
) -> Outcome<Json<OrderAccepted>> {
    let payload: Value = parse_relayed_body(&body)?;

    state.orders.submit(&payload).await.map(Json)
}

pub async fn geocode_handler(
    extract::State(state): extract::State<Arc<State>>,
    body: Bytes,
) -> Outcome<Json<Location>> {
    let request: GeocodeRequest = parse_body(&body)?;

    state.geocoder.resolve(&request.pin_code).await.map(Json)
}

pub async fn lookup_handler(
    extract::State(state): extract::State<Arc<State>>,
    body: Bytes,
) -> Outcome<Json<UserEmail>> {
    let request: LookupRequest = parse_body(&body)?;

    state.users.lookup(&request.phone).await.map(Json)
}

pub async fn recommend_handler(
    extract::State(state): extract::State<Arc<State>>,
    body: Bytes,
) -> Outcome<Json<Recommendations>> {
    let request: RecommendRequest = parse_optional_body(&body)?;

    state
        .recommendations
        .recommend(request.user_id.as_deref())
        .await
        .map(Json)
}

pub async fn health_handler() -> &'static str {
    "ok"
}
