use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use horizonviz::config::Params;
use horizonviz::explain::{ExplainClient, Generation};
use horizonviz::render;
use horizonviz::scene::Scene;

#[derive(Deserialize)]
struct RenderRequest {
    radius: Option<f64>,
    width: Option<usize>,
    height: Option<usize>,
    grid_resolution: Option<usize>,
    contour_step: Option<f64>,
}

#[derive(Serialize)]
struct RenderResponse {
    layers: Vec<Layer>,
    scene: Scene,
    timings: Vec<TimingEntry>,
    width: usize,
    height: usize,
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

#[derive(Deserialize)]
struct ExplainRequest {
    radius: Option<f64>,
    question: Option<String>,
}

#[derive(Serialize)]
struct ExplainResponse {
    text: String,
    generation: u64,
}

struct AppState {
    explain: ExplainClient,
    generation: Generation,
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> String {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder
        .write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)
        .expect("PNG encode failed");
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    format!("data:image/png;base64,{}", b64)
}

async fn render_handler(Json(req): Json<RenderRequest>) -> Json<RenderResponse> {
    let defaults = Params::default();
    // The HTTP boundary is the input control: radius is clamped into
    // the configured slider range here, never inside the pipeline.
    let radius = req
        .radius
        .unwrap_or(defaults.default_radius)
        .clamp(defaults.min_radius, defaults.max_radius);
    let width = req.width.unwrap_or(500).max(1);
    let height = req.height.unwrap_or(500).max(1);
    let grid_resolution = req.grid_resolution.unwrap_or(defaults.grid_resolution).max(2);
    let contour_step = req.contour_step.unwrap_or(defaults.contour_step);

    tracing::info!(radius, width, height, grid_resolution, "render request");

    let response = tokio::task::spawn_blocking(move || {
        let params = Params {
            grid_resolution,
            contour_step,
            ..defaults
        };
        let (frame, timings) = horizonviz::render_frame(radius, width, height, &params);

        let layers = vec![
            Layer {
                name: "field".into(),
                data_url: encode_png(
                    &render::render_field(&frame.field),
                    frame.field.w,
                    frame.field.h,
                ),
            },
            Layer {
                name: "contours".into(),
                data_url: encode_png(&render::rasterize_contours(&frame.scene), width, height),
            },
            Layer {
                name: "composite".into(),
                data_url: encode_png(&frame.rgba, width, height),
            },
        ];

        let timing_entries = timings
            .iter()
            .map(|t| TimingEntry {
                name: t.name.to_string(),
                ms: t.ms,
            })
            .collect();

        RenderResponse {
            layers,
            scene: frame.scene,
            timings: timing_entries,
            width,
            height,
        }
    })
    .await
    .unwrap();

    Json(response)
}

async fn explain_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExplainRequest>,
) -> Json<ExplainResponse> {
    let defaults = Params::default();
    let radius = req
        .radius
        .unwrap_or(defaults.default_radius)
        .clamp(defaults.min_radius, defaults.max_radius);

    // Capture a token at dispatch; a response from a superseded
    // request is reported as stale via its generation number.
    let token = state.generation.begin();
    let text = state.explain.explain(radius, req.question.as_deref()).await;

    if !state.generation.is_current(token) {
        tracing::debug!(token, "discarding superseded explanation");
    }

    Json(ExplainResponse {
        text,
        generation: token,
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let state = Arc::new(AppState {
        explain: ExplainClient::from_env(),
        generation: Generation::new(),
    });

    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/render", post(render_handler))
        .route("/api/explain", post(explain_handler))
        .fallback_service(frontend)
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("horizonviz server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
