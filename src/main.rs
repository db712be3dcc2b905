//! Stakeholder 360 - interactive org-chart viewer over an uploaded workbook.
//!
//! Flow mirrors the dashboard: upload a workbook, explicitly select a sheet,
//! optionally filter, pick a stakeholder, get back the mini org chart and the
//! grouped profile tables as JSON.

mod dataset;
mod error;
mod filter;
mod hierarchy;
mod profile;
mod session;
mod sheet_parser;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use dataset::{columns, StakeholderRow};
use error::AppError;
use filter::{FilterOptions, FilterSelection};
use hierarchy::{GraphConfig, HierarchyGraph};
use profile::DetailTable;
use session::SessionStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    sessions: SessionStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stakeholder_360=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState {
        sessions: SessionStore::new(),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session))
        .route("/sessions/:id/sheet", put(select_sheet))
        .route(
            "/sessions/:id/filters",
            get(get_filter_options).put(set_filters),
        )
        .route("/sessions/:id/stakeholders", get(list_stakeholders))
        .route("/sessions/:id/stakeholders/:name", get(stakeholder_view))
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024)) // 50MB
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr =
        std::env::var("STAKEHOLDER360_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[derive(serde::Serialize)]
struct UploadResponse {
    session_id: String,
    source_file: String,
    sheets: Vec<String>,
    /// Headers every selectable sheet must carry; lets a frontend validate
    /// before the user picks one.
    required_columns: &'static [&'static str],
}

/// Upload a workbook and create a session. No sheet is selected yet:
/// selection is an explicit follow-up step, never a default.
async fn create_session(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let mut filename = String::new();
    let mut file_data = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().unwrap_or("workbook").to_string();
            file_data = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read file: {}", e)))?
                .to_vec();
            break;
        }
    }

    if file_data.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No file uploaded".to_string()));
    }

    info!("Received file: {} ({} bytes)", filename, file_data.len());

    let workbook = sheet_parser::parse_upload(&filename, &file_data)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, format!("{:#}", e)))?;

    let sheets = workbook.sheet_names();
    let source_file = workbook.source_file.clone();
    let session_id = state.sessions.create(workbook);

    Ok(Json(UploadResponse {
        session_id,
        source_file,
        sheets,
        required_columns: columns::ALL,
    }))
}

#[derive(serde::Serialize)]
struct SessionSummary {
    id: String,
    source_file: String,
    sheets: Vec<String>,
    selected_sheet: Option<String>,
    filters: FilterSelection,
    rows: Option<usize>,
    dropped_rows: Option<usize>,
}

/// Session summary: sheets on offer plus the current selection state.
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSummary>, AppError> {
    state.sessions.with(&id, |session| {
        Ok(Json(SessionSummary {
            id: session.id.clone(),
            source_file: session.workbook.source_file.clone(),
            sheets: session.workbook.sheet_names(),
            selected_sheet: session.dataset.as_ref().map(|d| d.sheet_name.clone()),
            filters: session.filters.clone(),
            rows: session.dataset.as_ref().map(|d| d.len()),
            dropped_rows: session.dataset.as_ref().map(|d| d.dropped_rows),
        }))
    })
}

#[derive(serde::Deserialize)]
struct SelectSheetRequest {
    name: String,
}

#[derive(serde::Serialize)]
struct SelectSheetResponse {
    sheet: String,
    rows: usize,
    dropped_rows: usize,
}

/// Select and ingest a sheet into the typed dataset.
async fn select_sheet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SelectSheetRequest>,
) -> Result<Json<SelectSheetResponse>, AppError> {
    state.sessions.with_mut(&id, |session| {
        let dataset = session.select_sheet(&request.name)?;
        Ok(Json(SelectSheetResponse {
            sheet: dataset.sheet_name.clone(),
            rows: dataset.len(),
            dropped_rows: dataset.dropped_rows,
        }))
    })
}

/// Distinct values for each filterable column of the current dataset.
async fn get_filter_options(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FilterOptions>, AppError> {
    state
        .sessions
        .with(&id, |session| Ok(Json(filter::filter_options(session.dataset()?))))
}

#[derive(serde::Serialize)]
struct StakeholderList {
    stakeholders: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

fn stakeholder_list(
    dataset: &dataset::Dataset,
    filters: &FilterSelection,
) -> StakeholderList {
    let stakeholders = filter::stakeholder_options(dataset, filters);
    let warning = stakeholders.is_empty().then(|| {
        "No stakeholders match the current filters. Adjust or clear filters.".to_string()
    });
    StakeholderList {
        stakeholders,
        warning,
    }
}

/// Set the session's filter selection; responds with the resulting options.
async fn set_filters(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(filters): Json<FilterSelection>,
) -> Result<Json<StakeholderList>, AppError> {
    state.sessions.with_mut(&id, |session| {
        let list = stakeholder_list(session.dataset()?, &filters);
        session.filters = filters;
        Ok(Json(list))
    })
}

/// Stakeholder options under the session's current filters.
async fn list_stakeholders(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StakeholderList>, AppError> {
    state.sessions.with(&id, |session| {
        Ok(Json(stakeholder_list(session.dataset()?, &session.filters)))
    })
}

#[derive(serde::Serialize)]
struct StakeholderView {
    stakeholder: StakeholderRow,
    graph: HierarchyGraph,
    config: GraphConfig,
    tables: Vec<DetailTable>,
}

/// The full 360 view for one stakeholder: org chart plus detail tables.
///
/// Filters gate which names are selectable, but the row and its hierarchy are
/// always computed from the full dataset so managers and reports outside the
/// filtered view stay visible.
async fn stakeholder_view(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> Result<Json<StakeholderView>, AppError> {
    state.sessions.with(&id, |session| {
        let dataset = session.dataset()?;

        if filter::stakeholder_options(dataset, &session.filters).is_empty() {
            return Err(AppError::NoMatches);
        }

        let row = dataset
            .resolve(&name)
            .ok_or_else(|| AppError::StakeholderNotFound(name.clone()))?;

        let graph = hierarchy::build(row, dataset);
        let tables = profile::detail_tables(row);

        Ok(Json(StakeholderView {
            stakeholder: row.clone(),
            graph,
            config: GraphConfig::default(),
            tables,
        }))
    })
}
