mod assets;
pub mod request;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::{
    config::PlannerConfig,
    input::PlanningInput,
    planner::{Assessment, Planner, PlannerBuilder},
    render::{RenderError, RenderedImage},
    report::ReportView,
    scenario::{default_roads, default_temperature, default_weather},
};

use self::request::RequestError;

pub struct AppState {
    planner: Planner,
}

impl AppState {
    pub fn new(planner: Planner) -> Self {
        Self { planner }
    }
}

pub struct WebServerConfig {
    pub planner: PlannerConfig,
    pub host: String,
    pub port: u16,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<RequestError> for ApiError {
    fn from(value: RequestError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: value.to_string(),
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(value: RenderError) -> Self {
        Self::internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "request failed");
        } else {
            warn!(status = %self.status, message = %self.message, "rejected request");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub layout_image: String,
    pub title: String,
    pub report: ReportView,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    pub population: i64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_weather")]
    pub weather: String,
    #[serde(default = "default_roads")]
    pub roads: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/:name", get(static_asset))
        .route("/api/generate-layout", post(generate_layout))
        .route("/api/get-recommendations", post(get_recommendations))
        .route("/api/layout.png", get(layout_png))
        .route("/api/contact", post(submit_contact))
        .with_state(state)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        planner,
        host,
        port,
    } = config;

    let state = Arc::new(AppState::new(PlannerBuilder::from_config(&planner).build()));
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address {host}:{port}"))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, grid_size = planner.grid.size, "city planner listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down web server");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn static_asset(Path(name): Path<String>) -> Response {
    match assets::lookup(&name) {
        Some(asset) => ([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn plan_and_render(
    state: Arc<AppState>,
    input: PlanningInput,
) -> Result<(ReportView, RenderedImage), ApiError> {
    tokio::task::spawn_blocking(move || -> Result<(ReportView, RenderedImage), ApiError> {
        let plan = state.planner.plan(&input);
        let image = state.planner.render(&plan)?;
        Ok((plan.report.view(), image))
    })
    .await
    .map_err(|err| ApiError::internal(format!("layout task failed: {err}")))?
}

async fn generate_layout(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let input = request::layout_input(&body)?;
    info!(
        population = input.population(),
        temperature = input.temperature(),
        weather = input.weather(),
        roads = input.roads_descriptor(),
        "generating layout"
    );
    let (report, image) = plan_and_render(state, input).await?;
    Ok(Json(GenerateResponse {
        success: true,
        layout_image: image.to_data_url(),
        title: image.title,
        report,
    }))
}

async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Assessment>, ApiError> {
    let input = request::recommendation_input(&body)?;
    Ok(Json(state.planner.assess(&input)))
}

async fn layout_png(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LayoutQuery>,
) -> Result<Response, ApiError> {
    let input = PlanningInput::new(query.population, query.temperature, query.weather, query.roads);
    let (_, image) = plan_and_render(state, input).await?;
    Ok((
        [(header::CONTENT_TYPE, image.mime_type)],
        Body::from(Bytes::from(image.bytes)),
    )
        .into_response())
}

async fn submit_contact(Json(body): Json<Value>) -> Result<Json<ContactResponse>, ApiError> {
    let contact = request::contact_message(&body)?;
    info!(
        name = %contact.name,
        email = %contact.email,
        subject = %contact.subject,
        message = %contact.message,
        "contact form submission"
    );
    Ok(Json(ContactResponse {
        success: true,
        message: "Thank you for contacting us! We will get back to you soon.",
    }))
}
