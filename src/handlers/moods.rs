use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::dto::{
    AddMoodRequest, ReplaceMoodsRequest, UpdateMoodRequest, VocabularyResponse,
};
use crate::error::AppResult;
use crate::models::mood::{MoodDefinition, MoodPatch};
use crate::snapshots::UserSnapshot;
use crate::AppState;

fn vocabulary_response(snapshot: &UserSnapshot) -> VocabularyResponse {
    VocabularyResponse {
        revision: snapshot.revision,
        is_default: snapshot.uses_default_moods(),
        moods: snapshot.vocabulary().into_definitions(),
    }
}

pub async fn get_moods(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<VocabularyResponse>> {
    let snapshot = state.hub.current(&user_id).await;
    Ok(Json(vocabulary_response(&snapshot)))
}

pub async fn replace_moods(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<ReplaceMoodsRequest>,
) -> AppResult<Json<VocabularyResponse>> {
    let mut moods = Vec::with_capacity(body.moods.len());
    for req in body.moods {
        req.validate()?;
        moods.push(MoodDefinition::try_from(req)?);
    }

    let snapshot = state.hub.replace_moods(&user_id, moods).await?;
    Ok(Json(vocabulary_response(&snapshot)))
}

pub async fn add_mood(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<AddMoodRequest>,
) -> AppResult<Json<MoodDefinition>> {
    body.validate()?;

    let (_, added) = state
        .hub
        .edit_moods(&user_id, |vocab| {
            vocab
                .add(&body.symbol, body.score, &body.label)
                .map(|def| def.clone())
        })
        .await?;
    Ok(Json(added))
}

pub async fn update_mood(
    State(state): State<AppState>,
    Path((user_id, symbol)): Path<(String, String)>,
    Json(body): Json<UpdateMoodRequest>,
) -> AppResult<Json<MoodDefinition>> {
    body.validate()?;
    let patch = MoodPatch::from(body);

    let (_, updated) = state
        .hub
        .edit_moods(&user_id, |vocab| {
            vocab.update(&symbol, &patch).map(|def| def.clone())
        })
        .await?;
    Ok(Json(updated))
}

pub async fn delete_mood(
    State(state): State<AppState>,
    Path((user_id, symbol)): Path<(String, String)>,
) -> AppResult<Json<VocabularyResponse>> {
    let (snapshot, removed) = state
        .hub
        .edit_moods(&user_id, |vocab| vocab.remove(&symbol))
        .await?;

    tracing::debug!(user_id = %user_id, symbol = %removed.symbol, "Mood removed");
    Ok(Json(vocabulary_response(&snapshot)))
}
