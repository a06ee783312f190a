//! Request handlers.
//!
//! Store calls are synchronous SQLite work and run on the blocking pool.

use crate::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use scrapbook_model::{
    ElementDraft, NewPage, NewScrapbook, NewSong, PagePatch, ScrapbookPatch, ValidationError,
};
use scrapbook_storage::{EntityRef, LayoutUpdate};
use scrapbook_types::{ErrorKind, PageId, ScrapbookId, SongId, UserId};
use serde::Deserialize;
use serde_json::{Value, json};

type Body<T> = Result<Json<T>, JsonRejection>;
type Created = (StatusCode, Json<Value>);

async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "blocking task failed");
        ApiError::new(ErrorKind::Storage, "the operation could not be completed")
    })?
}

/// Turns an undecodable element payload into a response.
///
/// A caller who may not change the page learns that first; the payload
/// error is only reported to the owner.
async fn reject_payload(state: &AppState, page_id: PageId, user: UserId, err: ValidationError) -> ApiError {
    let ownership = state.ownership.clone();
    let entity = EntityRef::Page(page_id);
    let allowed = blocking(move || {
        ownership.resolve(&entity, &user)?.require(&entity)?;
        Ok(())
    })
    .await;
    match allowed {
        Ok(()) => err.into(),
        Err(denied) => denied,
    }
}

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

// ── scrapbooks ───────────────────────────────────────────────────

pub async fn list_scrapbooks(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Value>> {
    let scrapbooks = blocking(move || Ok(state.scrapbooks.list_for_owner(&user.user_id)?)).await?;
    Ok(Json(json!({ "scrapbooks": scrapbooks })))
}

pub async fn get_scrapbook(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<ScrapbookId>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let scrapbook = blocking(move || Ok(state.scrapbooks.get(&id, &user.user_id)?)).await?;
    Ok(Json(json!({ "scrapbook": scrapbook })))
}

pub async fn create_scrapbook(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Body<NewScrapbook>,
) -> ApiResult<Created> {
    let Json(input) = body?;
    let scrapbook = blocking(move || Ok(state.scrapbooks.create(&user.user_id, &input)?)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "scrapbook": scrapbook }))))
}

pub async fn update_scrapbook(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<ScrapbookId>, PathRejection>,
    body: Body<ScrapbookPatch>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let Json(patch) = body?;
    blocking(move || Ok(state.scrapbooks.update(&id, &user.user_id, &patch)?)).await?;
    Ok(success())
}

pub async fn delete_scrapbook(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<ScrapbookId>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    blocking(move || Ok(state.scrapbooks.delete(&id, &user.user_id)?)).await?;
    Ok(success())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSongBody {
    pub song_id: SongId,
}

pub async fn add_song(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<ScrapbookId>, PathRejection>,
    body: Body<AddSongBody>,
) -> ApiResult<Created> {
    let Path(id) = id?;
    let Json(body) = body?;
    blocking(move || Ok(state.scrapbooks.add_song(&id, &user.user_id, &body.song_id)?)).await?;
    Ok((StatusCode::CREATED, success()))
}

pub async fn create_page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<ScrapbookId>, PathRejection>,
    body: Body<NewPage>,
) -> ApiResult<Created> {
    let Path(id) = id?;
    let Json(input) = body?;
    let page = blocking(move || Ok(state.scrapbooks.create_page(&id, &user.user_id, &input)?)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "page": page }))))
}

// ── pages ────────────────────────────────────────────────────────

/// Body of a layout replacement.
///
/// Elements stay as raw JSON until each one is decoded, so a decode error
/// can name the offending index.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBody {
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub background_image_url: Option<String>,
    #[serde(default)]
    pub elements: Option<Vec<Value>>,
}

impl LayoutBody {
    fn into_update(self) -> Result<LayoutUpdate, ValidationError> {
        let elements = self
            .elements
            .map(|values| {
                values
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| ElementDraft::from_json(value).map_err(|e| e.within("elements", i)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        Ok(LayoutUpdate {
            page: PagePatch {
                background_color: self.background_color,
                background_image_url: self.background_image_url,
            },
            elements,
        })
    }
}

pub async fn replace_layout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<PageId>, PathRejection>,
    body: Body<LayoutBody>,
) -> ApiResult<Json<Value>> {
    let Path(page_id) = id?;
    let Json(body) = body?;
    let update = match body.into_update() {
        Ok(update) => update,
        Err(err) => return Err(reject_payload(&state, page_id, user.user_id, err).await),
    };
    blocking(move || Ok(state.layouts.replace_layout(&page_id, &user.user_id, &update)?)).await?;
    Ok(success())
}

pub async fn add_element(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<PageId>, PathRejection>,
    body: Body<Value>,
) -> ApiResult<Created> {
    let Path(page_id) = id?;
    let Json(value) = body?;
    let draft = match ElementDraft::from_json(value) {
        Ok(draft) => draft,
        Err(err) => {
            return Err(reject_payload(&state, page_id, user.user_id, err.nested("element")).await);
        }
    };
    let element =
        blocking(move || Ok(state.layouts.add_element(&page_id, &user.user_id, &draft)?)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "element": element }))))
}

// ── songs ────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SongQuery {
    pub search: Option<String>,
}

pub async fn list_songs(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    query: Result<Query<SongQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query?;
    let songs = blocking(move || Ok(state.songs.list(query.search.as_deref())?)).await?;
    Ok(Json(json!({ "songs": songs })))
}

pub async fn create_song(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    body: Body<NewSong>,
) -> ApiResult<Created> {
    let Json(input) = body?;
    let song = blocking(move || Ok(state.songs.create(&input)?)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "song": song }))))
}

// ── misc ─────────────────────────────────────────────────────────

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

pub async fn fallback() -> ApiError {
    ApiError::new(ErrorKind::NotFound, "no such route")
}
