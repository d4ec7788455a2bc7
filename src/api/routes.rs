use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::report::{self, Record, RenderError, ACCOUNT_FIELD, PLATFORM_FIELD};
use crate::upstream::{or_empty, StractApi};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<StractApi>,
}

/// Create the report router.
///
/// Static routes are matched before the `:platform` capture, so `/geral` is
/// never treated as a platform name.
pub fn create_router(api: Arc<StractApi>) -> Router {
    let state = AppState { api };

    Router::new()
        .route("/", get(identity))
        .route("/geral", get(general_report))
        .route("/geral/resumo", get(general_summary))
        .route("/:platform", get(platform_report))
        .route("/:platform/resumo", get(platform_summary))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ===== Route Handlers =====

/// Static identity document served at the root.
async fn identity() -> Json<serde_json::Value> {
    Json(json!({
        "nome": "Guilherme Henrique",
        "email": "ghp17@outlook.com",
        "linkedin": "https://linkedin.com/in/ghpxd",
    }))
}

/// Detail report for one platform: one CSV row per insight, with platform and
/// account context columns. No derived metric, no aggregation.
async fn platform_report(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<CsvResponse, ApiError> {
    let rows = collect_platform_rows(&state.api, &platform, true).await;
    Ok(CsvResponse(report::to_csv(&rows)?))
}

/// Summary report for one platform, grouped by account.
async fn platform_summary(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<CsvResponse, ApiError> {
    let rows = collect_platform_rows(&state.api, &platform, false).await;
    let summary = report::aggregate(&rows, ACCOUNT_FIELD);
    Ok(CsvResponse(report::to_csv(&summary)?))
}

/// Cross-platform detail report with the conditional cost-per-click column.
async fn general_report(State(state): State<AppState>) -> Result<CsvResponse, ApiError> {
    let rows = collect_general_rows(&state.api).await;
    Ok(CsvResponse(report::to_csv(&rows)?))
}

/// Cross-platform summary, grouped by platform.
async fn general_summary(State(state): State<AppState>) -> Result<CsvResponse, ApiError> {
    let rows = collect_general_rows(&state.api).await;
    let summary = report::aggregate(&rows, PLATFORM_FIELD);
    Ok(CsvResponse(report::to_csv(&summary)?))
}

// ===== Row Collection =====

/// Fetch and flatten every insight of one platform, sequentially per account.
/// The summary flow carries only the account column, so the platform context
/// column is optional here.
async fn collect_platform_rows(
    api: &StractApi,
    platform: &str,
    with_platform_column: bool,
) -> Vec<Record> {
    let platform_context = with_platform_column.then_some(platform);
    let mut rows = Vec::new();

    for account in or_empty(
        api.accounts(platform).await,
        &format!("accounts for platform {platform}"),
    ) {
        let metrics = or_empty(
            api.insights(platform, &account).await,
            &format!("insights for account {account} on {platform}"),
        );
        for metric in &metrics {
            rows.push(report::flatten(platform_context, Some(&account), metric));
        }
    }

    rows
}

/// Fetch and flatten every insight of every platform, deriving cost per click
/// where the owning platform is Google Analytics.
async fn collect_general_rows(api: &StractApi) -> Vec<Record> {
    let mut rows = Vec::new();

    for platform in or_empty(api.platforms().await, "the platform list") {
        for account in or_empty(
            api.accounts(&platform).await,
            &format!("accounts for platform {platform}"),
        ) {
            let metrics = or_empty(
                api.insights(&platform, &account).await,
                &format!("insights for account {account} on {platform}"),
            );
            for metric in &metrics {
                let mut row = report::flatten(Some(&platform), Some(&account), metric);
                report::apply_cost_per_click(&platform, &mut row);
                rows.push(row);
            }
        }
    }

    rows
}

// ===== Responses =====

/// CSV body with the `text/csv` content type.
pub struct CsvResponse(pub String);

impl IntoResponse for CsvResponse {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "text/csv")], self.0).into_response()
    }
}

// ===== Error Handling =====

/// The only failure a handler can surface: the CSV writer itself erroring.
/// Upstream fetch problems degrade to empty row sets long before this point.
#[derive(Debug)]
enum ApiError {
    Render(RenderError),
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::Render(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Render(err) => {
                tracing::error!("CSV rendering failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identity_document_is_static_json() {
        let Json(body) = identity().await;
        assert_eq!(body["nome"], "Guilherme Henrique");
        assert_eq!(body["email"], "ghp17@outlook.com");
        assert_eq!(body["linkedin"], "https://linkedin.com/in/ghpxd");
    }

    #[test]
    fn render_errors_map_to_internal_server_error() {
        let err = ApiError::Render(RenderError::Flush(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
