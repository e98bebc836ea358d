use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use models::{Descriptor, DescriptorPatch};
use service::descriptors;
use service::pagination::Page;
use service::policy::Action;
use service::store::NewDescriptor;

use crate::auth::{authorize, ServerState};
use crate::errors::ApiError;
use crate::routes::parse_page;

#[derive(Deserialize)]
pub struct DescriptorQuery {
    pub page: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: String,
    pub parent: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateDescriptor {
    pub id: i64,
    #[serde(flatten)]
    pub patch: DescriptorPatch,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<DescriptorQuery>,
) -> Result<Json<Page<Descriptor>>, ApiError> {
    let page = parse_page(query.page.as_deref())?;
    let results = descriptors::list_descriptors(state.store.as_ref()).await?;
    Ok(Json(state.paginator.paginate(results, page, "/descriptors/", &[])))
}

pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<CreateDescriptor>,
) -> Result<(StatusCode, Json<Descriptor>), ApiError> {
    authorize(&state, &headers, Action::MutateDescriptor)?;
    let input = NewDescriptor {
        name: body.name,
        description: body.description,
        color: body.color,
        parent: body.parent,
    };
    let created = descriptors::create_descriptor(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<UpdateDescriptor>,
) -> Result<Json<Descriptor>, ApiError> {
    authorize(&state, &headers, Action::MutateDescriptor)?;
    let updated = descriptors::update_descriptor(state.store.as_ref(), body.id, body.patch).await?;
    Ok(Json(updated))
}
