use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use models::{Rating, Review, ReviewPatch};
use service::pagination::Page;
use service::policy::Action;
use service::reviews;
use service::store::NewReview;

use crate::auth::{authorize, ServerState};
use crate::errors::ApiError;
use crate::routes::{parse_id, parse_page};

#[derive(Deserialize)]
pub struct ReviewQuery {
    /// Drink id; review listings are always scoped to one drink.
    pub id: Option<String>,
    pub page: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateReview {
    pub drink: i64,
    pub notes: Option<String>,
    #[serde(default)]
    pub descriptors: Vec<i64>,
    pub overall_rating: Rating,
}

#[derive(Deserialize)]
pub struct UpdateReview {
    pub id: i64,
    #[serde(flatten)]
    pub patch: ReviewPatch,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<Page<Review>>, ApiError> {
    let raw = query.id.as_deref().ok_or_else(|| ApiError::BadRequest("id is required".into()))?;
    let drink = parse_id(raw)?;
    let page = parse_page(query.page.as_deref())?;

    let results = reviews::list_for_drink(state.store.as_ref(), drink).await?;
    let params = [("id", drink.to_string())];
    Ok(Json(state.paginator.paginate(results, page, "/reviews/", &params)))
}

/// Create a review authored by the caller.
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<CreateReview>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let caller = authorize(&state, &headers, Action::CreateReview)?;
    let input = NewReview {
        drink: body.drink,
        author: caller.user_id,
        notes: body.notes,
        descriptors: body.descriptors,
        overall_rating: body.overall_rating,
    };
    let created = reviews::create_review(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a review; only its author may do so.
pub async fn update(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<UpdateReview>,
) -> Result<Json<Review>, ApiError> {
    let existing = reviews::get_review(state.store.as_ref(), body.id).await?;
    authorize(&state, &headers, Action::UpdateReview { author: existing.author })?;
    let updated = reviews::update_review(state.store.as_ref(), body.id, body.patch).await?;
    Ok(Json(updated))
}
