use axum::{
    extract::Request,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;
use std::{convert::Infallible, future::Future, pin::Pin};
use tower::Service;

#[derive(RustEmbed)]
#[folder = "static/"]
#[prefix = "/"]
struct Assets;

/// Serves files embedded from `static/` at build time.
#[derive(Default, Clone)]
pub struct AssetsService;

impl AssetsService {
    pub fn new() -> Self {
        Self
    }
}

impl Service<Request> for AssetsService {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let path = req.uri().path().to_owned();

        Box::pin(async move {
            let resp = match Assets::get(&path) {
                Some(content) => {
                    let mime = mime_guess::from_path(&path).first_or_octet_stream();

                    (
                        [(header::CONTENT_TYPE, mime.as_ref().to_owned())],
                        content.data,
                    )
                        .into_response()
                }
                _ => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
            };

            Ok(resp)
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    #[tokio::test]
    async fn test_serves_embedded_stylesheet() {
        let req = Request::builder()
            .uri("/app.css")
            .body(Body::empty())
            .unwrap();

        let resp = AssetsService::new().call(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/css");
    }

    #[tokio::test]
    async fn test_unknown_asset_is_404() {
        let req = Request::builder()
            .uri("/missing.js")
            .body(Body::empty())
            .unwrap();

        let resp = AssetsService::new().call(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
