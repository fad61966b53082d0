use crate::{
    application::upload_file::use_case::UploadFileUseCase,
    domain::upload::entity::{UploadRequest, UploadResult},
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub result: UploadResult,
}

/// Pull the file out of the form.
///
/// The first field named `field_name` wins; later ones and every other field are
/// skipped. A part with neither a filename nor a body is what a browser sends for
/// an empty file input, so it counts as no file at all.
async fn read_file_field(
    multipart: &mut Multipart,
    field_name: &str,
) -> Result<Option<UploadRequest>, AppError> {
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        if file.is_some() || field.name() != Some(field_name) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        if file_name.is_empty() && data.is_empty() {
            tracing::debug!(field = field_name, "ignoring empty file field");
            continue;
        }

        file = Some(UploadRequest {
            file_name,
            content_type,
            data,
        });
    }

    Ok(file)
}

pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut multipart = multipart?;
    let request = read_file_field(&mut multipart, &state.config.upload_field_name)
        .await?
        .ok_or(AppError::NoFile)?;

    let use_case = UploadFileUseCase::new(state.storage.clone(), state.clock.clone());
    let result = use_case.execute(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Success",
            result,
        }),
    ))
}
