#[cfg(feature = "server")]
pub mod http {
    use axum::{
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Json},
        routing::{get, post},
        Router,
    };
    use chainer::{parse_item, Item, KnowledgeBase};
    use serde::{Deserialize, Serialize};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tower_http::cors::CorsLayer;
    use tracing::{error, info};

    type SharedKb = Arc<RwLock<KnowledgeBase>>;

    #[derive(Debug, Deserialize)]
    struct ItemRequest {
        item: String,
    }

    #[derive(Debug, Serialize)]
    struct AssertResponse {
        asserted: String,
        facts: usize,
        rules: usize,
    }

    #[derive(Debug, Serialize)]
    struct ErrorResponse {
        error: String,
    }

    type ApiError = (StatusCode, Json<ErrorResponse>);

    pub fn router(kb: KnowledgeBase) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/kb", get(show_kb))
            .route("/assert", post(assert_item))
            .route("/ask", post(ask))
            .route("/retract", post(retract))
            .layer(CorsLayer::permissive())
            .with_state(Arc::new(RwLock::new(kb)))
    }

    pub async fn start_server(kb: KnowledgeBase, host: &str, port: u16) -> anyhow::Result<()> {
        let app = router(kb);

        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        info!("Chainer server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    async fn health_check() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "ok",
            "service": "chainer",
            "version": env!("CARGO_PKG_VERSION")
        }))
    }

    async fn show_kb(State(kb): State<SharedKb>) -> impl IntoResponse {
        Json(kb.read().await.snapshot())
    }

    async fn assert_item(
        State(kb): State<SharedKb>,
        Json(payload): Json<ItemRequest>,
    ) -> Result<impl IntoResponse, ApiError> {
        let item = parse_request(&payload)?;
        let mut kb = kb.write().await;
        kb.assert(item.clone());

        Ok(Json(AssertResponse {
            asserted: item.to_string(),
            facts: kb.fact_count(),
            rules: kb.rule_count(),
        }))
    }

    async fn ask(
        State(kb): State<SharedKb>,
        Json(payload): Json<ItemRequest>,
    ) -> Result<impl IntoResponse, ApiError> {
        let query = parse_request(&payload)?;
        let answers = kb.read().await.ask(query);
        info!("Answered query with {} result(s)", answers.len());
        Ok(Json(answers))
    }

    async fn retract(
        State(kb): State<SharedKb>,
        Json(payload): Json<ItemRequest>,
    ) -> Result<impl IntoResponse, ApiError> {
        let item = parse_request(&payload)?;
        let retraction = kb.write().await.retract(item);
        Ok(Json(retraction))
    }

    fn parse_request(payload: &ItemRequest) -> Result<Item, ApiError> {
        if payload.item.trim().is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Item cannot be empty".to_string(),
                }),
            ));
        }

        parse_item(&payload.item).map_err(|e| {
            error!("Failed to parse item: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to parse item: {}", e),
                }),
            )
        })
    }

}

#[cfg(not(feature = "server"))]
pub mod http {
    pub async fn start_server(
        _kb: chainer::KnowledgeBase,
        _host: &str,
        _port: u16,
    ) -> anyhow::Result<()> {
        anyhow::bail!("Server feature not enabled. Recompile with --features server")
    }
}
