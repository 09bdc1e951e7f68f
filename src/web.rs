use actix_files::Files;
use actix_web::error::InternalError;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::config::{PlanConfig, RoomConfig, SessionConfig, DEFAULT_BRANCH_NAME};
use crate::error::SeatingError;
use crate::parser::read_roster;
use crate::seating::{generate, SeatingReport};

/// Server-wide settings. Nothing here changes between requests.
pub struct AppState {
    pub default_branch_name: String,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            default_branch_name: DEFAULT_BRANCH_NAME.to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub branch_name: Option<String>,
    /// Contents of the uploaded roster sheet, as CSV
    #[serde(default)]
    pub student_csv: String,
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
    #[serde(default)]
    pub sessions: Vec<SessionConfig>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    success: bool,
    #[serde(flatten)]
    report: SeatingReport,
}

fn error_response(err: &SeatingError) -> HttpResponse {
    let body = serde_json::json!({"success": false, "error": err.to_string()});
    if err.is_input_error() {
        warn!(error = %err, "generation rejected");
        HttpResponse::BadRequest().json(body)
    } else {
        error!(error = %err, "generation failed");
        HttpResponse::InternalServerError().json(body)
    }
}

// Seating generation endpoint
async fn generate_seating(req: web::Json<GenerateRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let req = req.into_inner();

    if req.student_csv.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "No student file uploaded."
        })));
    }

    let roster = match read_roster(req.student_csv.as_bytes()) {
        Ok(roster) => roster,
        Err(e) => return Ok(error_response(&e)),
    };

    let config = PlanConfig {
        branch_name: req
            .branch_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| state.default_branch_name.clone()),
        rooms: req.rooms,
        sessions: req.sessions,
    };

    match generate(&roster, &config) {
        Ok(report) => {
            info!(plans = report.seating_plans.len(), "seating generated");
            Ok(HttpResponse::Ok().json(GenerateResponse { success: true, report }))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}

/// Malformed request bodies answer with the same JSON error shape as the handler
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024 * 1024)
        .error_handler(|err, _req| {
            let body = serde_json::json!({
                "success": false,
                "error": format!("Invalid JSON configuration format: {}", err)
            });
            InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        })
}

/// Registers the API routes; shared by the server and the endpoint tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/api/health", web::get().to(health))
        .route("/api/generate", web::post().to(generate_seating));
}

pub async fn start_server(bind: &str, port: u16, static_dir: Option<PathBuf>) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::default());
    info!(bind, port, "starting web server");

    HttpServer::new(move || {
        let mut app = App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure);
        if let Some(dir) = &static_dir {
            app = app.service(Files::new("/static", dir.clone()).show_files_listing());
        }
        app
    })
    .bind((bind, port))?
    .run()
    .await
}
