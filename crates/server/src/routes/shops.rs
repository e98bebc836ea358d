use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use models::{CoffeeShop, ShopPatch};
use service::policy::Action;
use service::shops::{self, ShopFilter};

use crate::auth::{authorize, ServerState};
use crate::errors::ApiError;
use crate::routes::{parse_id, parse_page};

#[derive(Deserialize)]
pub struct ShopQuery {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateShop {
    pub name: String,
    pub address: String,
}

#[derive(Deserialize)]
pub struct UpdateShop {
    pub id: i64,
    #[serde(flatten)]
    pub patch: ShopPatch,
}

/// `?id=` fetches one shop with its drinks; otherwise a filtered,
/// ordered, paginated listing.
pub async fn list_or_get(
    State(state): State<ServerState>,
    Query(query): Query<ShopQuery>,
) -> Result<Response, ApiError> {
    if let Some(raw) = &query.id {
        let shop = shops::get_shop(state.store.as_ref(), parse_id(raw)?).await?;
        return Ok(Json(shop).into_response());
    }

    let page = parse_page(query.page.as_deref())?;
    let filter = ShopFilter { name: query.name.clone(), address: query.address.clone() };
    let results = shops::list_shops(state.store.as_ref(), &filter, query.ordering.as_deref()).await?;

    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(name) = query.name {
        params.push(("name", name));
    }
    if let Some(address) = query.address {
        params.push(("address", address));
    }
    if let Some(ordering) = query.ordering {
        params.push(("ordering", ordering));
    }
    Ok(Json(state.paginator.paginate(results, page, "/shops/", &params)).into_response())
}

pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<CreateShop>,
) -> Result<(StatusCode, Json<CoffeeShop>), ApiError> {
    authorize(&state, &headers, Action::MutateShop)?;
    let created = shops::create_shop(state.store.as_ref(), &body.name, &body.address).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<UpdateShop>,
) -> Result<Json<CoffeeShop>, ApiError> {
    authorize(&state, &headers, Action::MutateShop)?;
    let updated = shops::update_shop(state.store.as_ref(), body.id, body.patch).await?;
    Ok(Json(updated))
}
