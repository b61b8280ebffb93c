use crate::classifier::StudentClassifier;
use crate::error::PredictorError;
use crate::config::{REPORT_FILE_NAME, ROSTER_PATH};
use crate::export::at_risk_report_csv;
use crate::pages::{init_dashboard, init_insights, init_page, render_shell, Page, HOMEPAGE};
use crate::predictor::GpaPredictor;
use crate::roster::{RosterRepository, RosterSource, RosterSourceKind};
use crate::theme::{Preferences, ThemeState};
use crate::views::{find_profile, search_students};
use actix_web::{http::header, web, App, HttpRequest, HttpResponse, HttpServer};
use log::{error, info, warn};
use serde::Deserialize;

/// Shared state handed to every handler
pub struct AppState<S = RosterSourceKind> {
    pub roster: RosterRepository<S>,
    pub classifier: StudentClassifier,
    pub preferences: Preferences,
}

impl<S: RosterSource> AppState<S> {
    pub fn new(source: S, classifier: StudentClassifier, preferences: Preferences) -> Self {
        Self {
            roster: RosterRepository::new(source),
            classifier,
            preferences,
        }
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

// Homepage endpoint
async fn serve_homepage() -> HttpResponse {
    HttpResponse::Ok().content_type("text/html").body(HOMEPAGE)
}

// Dashboard, search and insights shells
async fn serve_page(req: HttpRequest) -> HttpResponse {
    match Page::from_path(req.path()) {
        Some(page) => HttpResponse::Ok().content_type("text/html").body(render_shell(page)),
        None => HttpResponse::NotFound().finish(),
    }
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("Student Dashboard is running!")
}

async fn get_students<S: RosterSource + 'static>(state: web::Data<AppState<S>>) -> HttpResponse {
    let students = state.roster.fetch_students().await;
    HttpResponse::Ok().json(&*students)
}

async fn get_dashboard<S: RosterSource + 'static>(state: web::Data<AppState<S>>) -> HttpResponse {
    HttpResponse::Ok().json(init_dashboard(state.get_ref()).await)
}

async fn get_insights<S: RosterSource + 'static>(state: web::Data<AppState<S>>) -> HttpResponse {
    HttpResponse::Ok().json(init_insights(state.get_ref()).await)
}

async fn get_page_view<S: RosterSource + 'static>(
    state: web::Data<AppState<S>>,
    name: web::Path<String>,
) -> HttpResponse {
    match Page::from_path(&format!("/{}", name.into_inner())) {
        Some(page) => HttpResponse::Ok().json(init_page(page, state.get_ref()).await),
        None => HttpResponse::NotFound().finish(),
    }
}

async fn search<S: RosterSource + 'static>(
    state: web::Data<AppState<S>>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    let students = state.roster.fetch_students().await;
    HttpResponse::Ok().json(search_students(&students, &query.q))
}

async fn get_profile<S: RosterSource + 'static>(
    state: web::Data<AppState<S>>,
    student_id: web::Path<String>,
) -> HttpResponse {
    let students = state.roster.fetch_students().await;
    match find_profile(&state.classifier, &students, &student_id) {
        Some(profile) => HttpResponse::Ok().json(profile),
        None => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("student {} not found", student_id.as_str())
        })),
    }
}

async fn get_prediction<S: RosterSource + 'static>(
    state: web::Data<AppState<S>>,
    student_id: web::Path<String>,
) -> HttpResponse {
    let students = state.roster.fetch_students().await;
    let Some(student) = students.iter().find(|s| s.student_id == student_id.as_str()) else {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("student {} not found", student_id.as_str())
        }));
    };

    match GpaPredictor::train(&students).and_then(|predictor| predictor.predict(student)) {
        Ok(prediction) => HttpResponse::Ok().json(prediction),
        Err(err @ PredictorError::InsufficientData { .. }) => {
            warn!("GPA predictor unavailable: {}", err);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({ "error": err.to_string() }))
        }
        Err(err @ PredictorError::MissingFeatures(_)) => {
            HttpResponse::UnprocessableEntity().json(serde_json::json!({ "error": err.to_string() }))
        }
        Err(err) => {
            error!("GPA prediction failed: {}", err);
            HttpResponse::InternalServerError().finish()
        }
    }
}

async fn download_report<S: RosterSource + 'static>(state: web::Data<AppState<S>>) -> HttpResponse {
    let students = state.roster.fetch_students().await;
    match at_risk_report_csv(&state.classifier, &students) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", REPORT_FILE_NAME),
            ))
            .body(csv),
        Err(err) => {
            error!("Failed to build at-risk report: {}", err);
            HttpResponse::InternalServerError().finish()
        }
    }
}

async fn get_theme<S: RosterSource + 'static>(state: web::Data<AppState<S>>) -> HttpResponse {
    HttpResponse::Ok().json(ThemeState::from(state.preferences.theme()))
}

async fn toggle_theme<S: RosterSource + 'static>(state: web::Data<AppState<S>>) -> HttpResponse {
    HttpResponse::Ok().json(ThemeState::from(state.preferences.toggle_theme()))
}

async fn refresh_roster<S: RosterSource + 'static>(state: web::Data<AppState<S>>) -> HttpResponse {
    state.roster.invalidate().await;
    HttpResponse::NoContent().finish()
}

/// Register every route
pub fn configure<S: RosterSource + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(serve_homepage))
        .route("/dashboard", web::get().to(serve_page))
        .route("/search", web::get().to(serve_page))
        .route("/insights", web::get().to(serve_page))
        .route("/health", web::get().to(health_check))
        .route(ROSTER_PATH, web::get().to(get_students::<S>))
        .route("/api/students/{id}/profile", web::get().to(get_profile::<S>))
        .route("/api/students/{id}/prediction", web::get().to(get_prediction::<S>))
        .route("/api/dashboard", web::get().to(get_dashboard::<S>))
        .route("/api/insights", web::get().to(get_insights::<S>))
        .route("/api/pages/{page}", web::get().to(get_page_view::<S>))
        .route("/api/search", web::get().to(search::<S>))
        .route("/api/reports/at-risk.csv", web::get().to(download_report::<S>))
        .route("/api/theme", web::get().to(get_theme::<S>))
        .route("/api/theme/toggle", web::post().to(toggle_theme::<S>))
        .route("/api/roster/refresh", web::post().to(refresh_roster::<S>));
}

pub async fn start_server<S: RosterSource + 'static>(state: AppState<S>, bind: &str, port: u16) -> std::io::Result<()> {
    let state = web::Data::new(state);

    info!("Starting Student Dashboard on http://{}:{}", bind, port);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure::<S>))
        .bind((bind, port))?
        .run()
        .await
}
