use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use models::{CoffeeDrink, DrinkPatch, Price};
use service::drinks;
use service::policy::Action;
use service::store::NewDrink;

use crate::auth::{authorize, ServerState};
use crate::errors::ApiError;
use crate::routes::parse_id;

#[derive(Deserialize)]
pub struct DrinkQuery {
    pub id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateDrink {
    pub name: String,
    pub price: Price,
    pub shop: i64,
    pub volume: i16,
}

#[derive(Deserialize)]
pub struct UpdateDrink {
    pub id: i64,
    #[serde(flatten)]
    pub patch: DrinkPatch,
}

fn required_id(query: &DrinkQuery) -> Result<i64, ApiError> {
    let raw = query.id.as_deref().ok_or_else(|| ApiError::BadRequest("id is required".into()))?;
    parse_id(raw)
}

pub async fn get_one(
    State(state): State<ServerState>,
    Query(query): Query<DrinkQuery>,
) -> Result<Json<CoffeeDrink>, ApiError> {
    let drink = drinks::get_drink(state.store.as_ref(), required_id(&query)?).await?;
    Ok(Json(drink))
}

pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<CreateDrink>,
) -> Result<(StatusCode, Json<CoffeeDrink>), ApiError> {
    authorize(&state, &headers, Action::MutateDrink)?;
    let input = NewDrink { name: body.name, price: body.price, shop: body.shop, volume: body.volume };
    let created = drinks::create_drink(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<UpdateDrink>,
) -> Result<Json<CoffeeDrink>, ApiError> {
    authorize(&state, &headers, Action::MutateDrink)?;
    let updated = drinks::update_drink(state.store.as_ref(), body.id, body.patch).await?;
    Ok(Json(updated))
}

/// Multipart upload; the `photo` part carries the image bytes.
pub async fn upload_photo(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<DrinkQuery>,
    multipart: Multipart,
) -> Result<Json<CoffeeDrink>, ApiError> {
    authorize(&state, &headers, Action::MutateDrink)?;
    let id = required_id(&query)?;
    let bytes = read_photo_part(multipart).await?;
    let updated = drinks::attach_photo(state.store.as_ref(), id, bytes).await?;
    Ok(Json(updated))
}

pub(crate) async fn read_photo_part(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("photo") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("unreadable photo part: {e}")))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(ApiError::BadRequest("missing photo part".into()))
}
