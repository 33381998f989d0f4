use std::{convert::Infallible, path::PathBuf, sync::Arc};

use serde::Serialize;
use tracing::{error, info};
use warp::{
    http::StatusCode,
    reply::{self, Response},
    Filter, Rejection, Reply,
};

use crate::{
    chat::{AnswerService, ChatRequest, ChatResponse},
    settings::Web,
};

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub(crate) async fn serve(service: Arc<AnswerService>, web: &Web) {
    info!("Listening on {}", web.address);
    warp::serve(routes(service, web.static_dir.clone()))
        .run(web.address)
        .await;
}

/// `GET /` serves the chat page, `POST /api/chat` answers a question.
pub(crate) fn routes(
    service: Arc<AnswerService>,
    static_dir: PathBuf,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let chat = warp::path!("api" / "chat")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::any().map(move || service.clone()))
        .and_then(chat);

    let page = warp::get().and(warp::fs::dir(static_dir));

    chat.or(page)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

async fn chat(request: ChatRequest, service: Arc<AnswerService>) -> Result<Response, Infallible> {
    match service.answer(request.context(), request.question()).await {
        Ok(answer) => Ok(reply::json(&ChatResponse { answer }).into_response()),
        Err(e) => {
            error!("Chat request failed: {e}");
            Ok(error_reply(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::UnsupportedMediaType>() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        error!("Unhandled rejection: {err:?}");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
    };
    Ok(error_reply(status, message))
}

fn error_reply(status: StatusCode, error: String) -> Response {
    reply::with_status(reply::json(&ErrorResponse { error }), status).into_response()
}
