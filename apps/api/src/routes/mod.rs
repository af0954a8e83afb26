pub mod cv;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // CV rendering
        .route("/cv/:id", get(cv::handle_generate_single))
        .route("/cv/bulk-by-ids", post(cv::handle_generate_by_ids))
        .route("/cv/bulk-by-quantity", post(cv::handle_generate_by_quantity))
        // Legacy paths kept for existing clients
        .route("/api/Pdf/generatePdf/:id", get(cv::handle_generate_single))
        .route("/api/Pdf/generatePdfByIds", post(cv::handle_generate_by_ids))
        .route(
            "/api/Pdf/generatePdfByQuantity",
            post(cv::handle_generate_by_quantity),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::batch::BatchOrchestrator;
    use crate::layout::a4_two_column;
    use crate::render::RenderContext;
    use crate::store::memory::MemoryCvStore;

    struct Harness {
        router: Router,
        store: Arc<MemoryCvStore>,
        _scratch: TempDir,
    }

    fn harness(rows: &[(i32, &str)]) -> Harness {
        let scratch = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryCvStore::new());
        for (id, json) in rows {
            store.insert(*id, json);
        }
        let orchestrator = BatchOrchestrator::new(
            store.clone(),
            RenderContext::new(a4_two_column(), None),
            4,
            scratch.path(),
        );
        Harness {
            router: build_router(AppState::new(orchestrator)),
            store,
            _scratch: scratch,
        }
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_json(router: Router, uri: &str, body: &str) -> Response {
        router
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    fn header_str<'a>(response: &'a Response, name: header::HeaderName) -> &'a str {
        response.headers()[name].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(&[]);
        let response = get(h.router, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_single_cv_returns_pdf_and_keeps_flag() {
        let h = harness(&[(7, r#"{"Name":"Jane Doe","Skills":"Go"}"#)]);
        let response = get(h.router, "/cv/7").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, header::CONTENT_TYPE), "application/pdf");
        assert_eq!(
            header_str(&response, header::CONTENT_DISPOSITION),
            "attachment; filename=\"Jane_Doe.pdf\""
        );

        let pdf = body_bytes(response).await;
        let doc = lopdf::Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert!(!h.store.is_generated(7));
    }

    #[tokio::test]
    async fn test_single_cv_not_found() {
        let h = harness(&[]);
        let response = get(h.router, "/cv/99").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_legacy_single_path() {
        let h = harness(&[(3, r#"{"Name":"Ann"}"#)]);
        let response = get(h.router, "/api/Pdf/generatePdf/3").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bulk_by_ids_returns_zip() {
        let h = harness(&[(1, r#"{"Name":"Ann"}"#), (2, "{broken"), (3, r#"{"Name":"Bob"}"#)]);
        let response = post_json(h.router, "/cv/bulk-by-ids", "[1,2,3]").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, header::CONTENT_TYPE), "application/zip");
        assert_eq!(
            header_str(&response, header::CONTENT_DISPOSITION),
            "attachment; filename=\"bulk_pdfs_by_ids.zip\""
        );

        let bytes = body_bytes(response).await;
        let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        assert!(h.store.is_generated(1));
        assert!(!h.store.is_generated(2));
        assert!(h.store.is_generated(3));
    }

    #[tokio::test]
    async fn test_bulk_by_ids_nothing_pending() {
        let h = harness(&[]);
        let response = post_json(h.router, "/api/Pdf/generatePdfByIds", "[4,5]").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bulk_by_quantity_zero_is_rejected_without_store_access() {
        let h = harness(&[(1, r#"{"Name":"Ann"}"#)]);
        let response = post_json(h.router, "/cv/bulk-by-quantity", "0").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(h.store.calls(), 0);
        assert!(!h.store.is_generated(1));
    }

    #[tokio::test]
    async fn test_bulk_by_quantity_returns_zip() {
        let h = harness(&[(5, r#"{"Name":"E"}"#), (2, r#"{"Name":"B"}"#), (9, r#"{"Name":"I"}"#)]);
        let response = post_json(h.router, "/api/Pdf/generatePdfByQuantity", "2").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header_str(&response, header::CONTENT_DISPOSITION),
            "attachment; filename=\"bulk_pdfs_by_quantity.zip\""
        );
        assert!(h.store.is_generated(2));
        assert!(h.store.is_generated(5));
        assert!(!h.store.is_generated(9));
    }
}
