use reqwest::multipart::{Form, Part};

use crate::error::TransportError;

mod config;
mod consts;

pub use config::{Config, ConfigBuilder};

/// Whatever HTTP response the server produced, success or not. Interpreting
/// the status and body is the gateway's job.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: u16,
    body: Vec<u8>,
    content_type: Option<String>,
}

impl RawResponse {
    pub(crate) fn new(status: u16, body: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            status,
            body,
            content_type,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, or `None` when the server sent nothing back.
    pub fn body_text(&self) -> Option<String> {
        if self.body.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.body).into_owned())
        }
    }

    /// Bounded excerpt for error messages.
    pub fn body_preview(&self) -> String {
        String::from_utf8_lossy(&self.body)
            .chars()
            .take(consts::BODY_PREVIEW_CHARS)
            .collect()
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// One-shot multipart transport to the pose server. Holds a connection pool
/// but no per-request state; retrying is the caller's decision, never made
/// here.
pub struct PoseClient {
    http: reqwest::Client,
    config: Config,
}

impl PoseClient {
    pub fn new(config: Config) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// POSTs `image` as a single multipart part named `image`. Query pairs
    /// with a `None` value are left out of the URL entirely, never sent as
    /// empty strings.
    pub async fn send(
        &self,
        path: &str,
        image: Vec<u8>,
        file_name: &str,
        query: &[(&str, Option<&str>)],
    ) -> Result<RawResponse, TransportError> {
        let url = self.config.endpoint(path);
        let pairs: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(key, value)| value.map(|value| (*key, value)))
            .collect();

        let part = Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(consts::IMAGE_MIME)?;
        let form = Form::new().part(consts::IMAGE_PART_NAME, part);

        tracing::debug!("POST {} query={:?}", url, pairs);
        let mut request = self.http.post(&url).multipart(form);
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = response.bytes().await?.to_vec();

        if self.config.log_bodies() {
            tracing::debug!(
                "{} -> {} ({} bytes): {}",
                path,
                status,
                body.len(),
                String::from_utf8_lossy(&body)
            );
        }

        Ok(RawResponse::new(status, body, content_type))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use axum::extract::{Multipart, Query};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(base_url: &str) -> PoseClient {
        let config = Config::builder()
            .with_base_url(base_url)
            .with_request_timeout(Duration::from_millis(500))
            .build();
        PoseClient::new(config).unwrap()
    }

    async fn echo(
        Query(params): Query<HashMap<String, String>>,
        mut multipart: Multipart,
    ) -> Json<serde_json::Value> {
        let mut parts = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap();
            parts.push(serde_json::json!({
                "name": name,
                "file_name": file_name,
                "len": bytes.len(),
            }));
        }
        Json(serde_json::json!({ "query": params, "parts": parts }))
    }

    #[tokio::test]
    async fn posts_one_image_part_and_omits_absent_query_params() {
        let base = serve(Router::new().route("/analyze_pose", post(echo))).await;
        let client = client_for(&base);

        let raw = client
            .send(
                "analyze_pose",
                b"jpegdata".to_vec(),
                "shot.jpg",
                &[("format", Some("simple")), ("mode", None)],
            )
            .await
            .unwrap();

        assert_eq!(raw.status(), 200);
        let echoed: serde_json::Value = serde_json::from_slice(raw.body()).unwrap();
        assert_eq!(echoed["query"]["format"], "simple");
        assert!(echoed["query"].get("mode").is_none());
        assert_eq!(echoed["parts"][0]["name"], "image");
        assert_eq!(echoed["parts"][0]["file_name"], "shot.jpg");
        assert_eq!(echoed["parts"][0]["len"], 8);
    }

    #[tokio::test]
    async fn sends_mode_when_selected() {
        let base = serve(Router::new().route("/analyze_pose", post(echo))).await;
        let client = client_for(&base);

        let raw = client
            .send(
                "analyze_pose",
                b"jpegdata".to_vec(),
                "shot.jpg",
                &[("format", Some("full")), ("mode", Some("squat"))],
            )
            .await
            .unwrap();

        let echoed: serde_json::Value = serde_json::from_slice(raw.body()).unwrap();
        assert_eq!(echoed["query"]["format"], "full");
        assert_eq!(echoed["query"]["mode"], "squat");
    }

    #[tokio::test]
    async fn non_2xx_is_a_response_not_an_error() {
        let base = serve(Router::new().route(
            "/analyze_pose",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "server error") }),
        ))
        .await;
        let client = client_for(&base);

        let raw = client
            .send("analyze_pose", b"x".to_vec(), "x.jpg", &[])
            .await
            .unwrap();

        assert_eq!(raw.status(), 500);
        assert!(!raw.is_success());
        assert_eq!(raw.body_text().as_deref(), Some("server error"));
    }

    #[tokio::test]
    async fn exceeding_the_request_timeout_yields_timeout() {
        let base = serve(Router::new().route(
            "/analyze_pose",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        ))
        .await;
        let config = Config::builder()
            .with_base_url(&base)
            .with_request_timeout(Duration::from_millis(100))
            .build();
        let client = PoseClient::new(config).unwrap();

        let err = client
            .send("analyze_pose", b"x".to_vec(), "x.jpg", &[])
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Timeout);
    }

    #[tokio::test]
    async fn dead_port_yields_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let client = client_for(&base);

        let err = client
            .send("analyze_pose", b"x".to_vec(), "x.jpg", &[])
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::ConnectionRefused);
    }
}
