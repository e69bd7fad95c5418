use super::AppState;
use super::auth::CurrentUser;
use super::views::{OrderView, PromoView};
use crate::application::PaymentHandle;
use crate::application::orders::CheckoutRequest;
use crate::application::promos::PromoRequest;
use crate::error::{Result, StorefrontError};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::http::header::ORIGIN;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "_q")]
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl ConfirmRequest {
    fn into_transaction_id(self) -> Result<String> {
        self.transaction_id
            .map(|tx| tx.trim().to_string())
            .filter(|tx| !tx.is_empty())
            .ok_or_else(|| StorefrontError::MalformedPayload("transactionId is required".to_string()))
    }
}

fn origin(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

pub async fn list_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<OrderView>>> {
    let orders = state.orders.list(user.id, params.q.as_deref()).await?;
    Ok(Json(orders.into_iter().map(OrderView::from).collect()))
}

pub async fn get_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    path: std::result::Result<Path<u64>, PathRejection>,
) -> Result<Json<OrderView>> {
    let Path(id) = path?;
    let order = state.orders.get(user.id, id).await?;
    Ok(Json(order.into()))
}

pub async fn create_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    payload: std::result::Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<PaymentHandle>> {
    let Json(request) = payload?;
    let handle = state
        .orders
        .checkout(&user, request, origin(&headers))
        .await?;
    Ok(Json(handle))
}

pub async fn confirm_order(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    payload: std::result::Result<Json<ConfirmRequest>, JsonRejection>,
) -> Result<Json<OrderView>> {
    let Json(request) = payload?;
    let order = state
        .orders
        .confirm(&request.into_transaction_id()?)
        .await?;
    Ok(Json(order.into()))
}

pub async fn list_promos(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PromoView>>> {
    let promos = state.promos.list(user.id, params.q.as_deref()).await?;
    Ok(Json(promos.into_iter().map(PromoView::from).collect()))
}

pub async fn get_promo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    path: std::result::Result<Path<u64>, PathRejection>,
) -> Result<Json<PromoView>> {
    let Path(id) = path?;
    let promo = state.promos.get(user.id, id).await?;
    Ok(Json(promo.into()))
}

pub async fn create_promo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    payload: std::result::Result<Json<PromoRequest>, JsonRejection>,
) -> Result<Json<PaymentHandle>> {
    let Json(request) = payload?;
    let handle = state
        .promos
        .issue(&user, request, origin(&headers))
        .await?;
    Ok(Json(handle))
}

pub async fn confirm_promo(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    payload: std::result::Result<Json<ConfirmRequest>, JsonRejection>,
) -> Result<Json<PromoView>> {
    let Json(request) = payload?;
    let promo = state
        .promos
        .confirm(&request.into_transaction_id()?)
        .await?;
    Ok(Json(promo.into()))
}

pub async fn health() -> &'static str {
    "ok"
}
