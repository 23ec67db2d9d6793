//! The HTTP service: axum in front of a [`Dispatcher`]

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header::HOST, HeaderMap, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{Dispatcher, IncomingRequest};

pub mod response;

/// Build the router. Every path goes to the dispatcher.
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new().fallback(handle).with_state(dispatcher)
}

async fn handle(
    State(dispatcher): State<Arc<Dispatcher>>,
    Query(query): Query<Vec<(String, String)>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let id = Uuid::new_v4();
    let span = info_span!("request", %id, path = uri.path());
    async move {
        let host = headers.get(HOST).and_then(|value| value.to_str().ok());
        let mut request = IncomingRequest::new(uri.path()).with_go_get(is_go_get(&query));
        request.host = host;

        match dispatcher.handle(&request).await {
            Ok(response) => response.into_response(),
            Err(err) => {
                if err.is_client_error() {
                    debug!(%err, "rejected request");
                } else {
                    warn!(%err, "failed to answer request");
                }
                err.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

/// Return `true` if the first `go-get` parameter of the decoded `query` is `1`.
fn is_go_get(query: &[(String, String)]) -> bool {
    query
        .iter()
        .find(|(key, _)| key == "go-get")
        .is_some_and(|(_, value)| value == "1")
}
