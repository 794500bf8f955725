use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use facewatch_core::pipeline::media_url::RequestOrigin;
use facewatch_core::pipeline::upload_response::UploadResponse;
use facewatch_core::shared::constants::UPLOAD_FIELD;
use facewatch_core::upload::domain::upload_request::{UploadRequest, UploadedFile};

use crate::app::AppState;

const FALLBACK_HOST: &str = "localhost";

/// `/upload/`: accepts any method so that non-POST calls get the JSON 405
/// body instead of the router's empty one.
pub async fn upload_image(State(state): State<AppState>, request: Request) -> Response {
    let origin = request_origin(request.headers());
    let method = request.method().clone();

    let file = if method == Method::POST {
        match Multipart::from_request(request, &state).await {
            Ok(multipart) => match read_image_field(multipart).await {
                Ok(file) => file,
                Err(e) => return multipart_error(e),
            },
            Err(rejection) => {
                log::debug!("Upload without multipart body: {rejection}");
                None
            }
        }
    } else {
        None
    };

    let upload = UploadRequest {
        method: method.to_string(),
        file,
    };
    let pipeline = state.pipeline.clone();
    let response =
        match tokio::task::spawn_blocking(move || pipeline.handle_upload(upload, &origin)).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Upload task failed: {e}");
                UploadResponse::error(500, format!("An unexpected error occurred: {e}"))
            }
        };
    into_http(response)
}

/// Scheme is plain HTTP; TLS-terminating proxies should set a public base URL.
fn request_origin(headers: &HeaderMap) -> RequestOrigin {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .filter(|host| !host.is_empty())
        .unwrap_or(FALLBACK_HOST);
    RequestOrigin::http(host)
}

async fn read_image_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let declared_name = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await?.to_vec();
        return Ok(Some(UploadedFile {
            declared_name,
            content,
        }));
    }
    Ok(None)
}

fn multipart_error(e: MultipartError) -> Response {
    log::info!("Rejected malformed upload: {e}");
    let response = UploadResponse::error(e.status().as_u16(), e.body_text());
    into_http(response)
}

pub(crate) fn into_http(response: UploadResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body)).into_response()
}
