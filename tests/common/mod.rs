/// Shared test fixtures and utilities for test modules
#[allow(dead_code)]
pub mod fixtures {
    use axum::body::{self, Body};
    use axum::extract::Request;
    use axum::http::header::CONTENT_TYPE;
    use axum::response::Response;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// The payload the website posts when a visitor shares device and page data
    pub fn device_and_page_payload() -> serde_json::Value {
        serde_json::json!({
            "device": { "userAgent": "UA1" },
            "page": { "url": "http://x" }
        })
    }

    pub fn collect_request(body: &serde_json::Value) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/collect")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn body_text(response: Response) -> String {
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// A URL nothing is listening on
    pub async fn refused_endpoint() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/webhook", addr)
    }

    /// In-memory log sink usable as a tracing writer
    #[derive(Clone, Default)]
    pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl LogCapture {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
