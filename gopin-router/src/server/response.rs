//! Converting dispatch results into HTTP responses

use axum::{
    http::{
        header::{CONTENT_TYPE, LOCATION},
        StatusCode,
    },
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::{
    shape::{ADVERTISEMENT_CONTENT_TYPE, HTML_CONTENT_TYPE},
    Error, PackageResponse,
};

impl IntoResponse for PackageResponse {
    fn into_response(self) -> Response {
        match self {
            PackageResponse::Redirect { location } => {
                info!(%location, "responding with a permanent redirect");
                (StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response()
            }
            PackageResponse::Advertisement(data) => {
                info!(bytes = data.len(), "responding with git refs");
                ([(CONTENT_TYPE, ADVERTISEMENT_CONTENT_TYPE)], data).into_response()
            }
            PackageResponse::GoGet(html) => {
                info!("responding with go get metadata");
                ([(CONTENT_TYPE, HTML_CONTENT_TYPE)], html).into_response()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
