use actix_web::{http::header, http::StatusCode, test, web, App, HttpResponse, HttpServer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::io::Write;
use student_dashboard::classifier::StudentClassifier;
use student_dashboard::data::save_flat_csv;
use student_dashboard::generate::generate_roster;
use student_dashboard::model::{Grade, Student};
use student_dashboard::roster::{FileRosterSource, HttpRosterSource, RosterRepository, StaticRosterSource};
use student_dashboard::server::{configure, AppState};
use student_dashboard::theme::{Preferences, Theme};

fn roster() -> Vec<Student> {
    vec![
        Student::new(
            "23WU000001",
            "Diya Sharma",
            vec![
                Grade::new("Operating Systems", 6.0, 8.0, 95.0, 90.0),
                Grade::new("Computer Networks", 6.0, 7.0, 85.0, 90.0),
            ],
        ),
        Student::new(
            "23WU000002",
            "Kabir Shah",
            vec![
                Grade::new("Operating Systems", 5.0, 4.0, 55.0, 60.0),
                Grade::new("Computer Networks", 5.0, 5.4, 75.0, 60.0),
            ],
        ),
    ]
}

fn state(students: Vec<Student>) -> web::Data<AppState<StaticRosterSource>> {
    web::Data::new(AppState::new(
        StaticRosterSource::new(students),
        StudentClassifier::default(),
        Preferences::with_theme(Theme::Light),
    ))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(configure::<StaticRosterSource>),
        )
        .await
    };
}

#[actix_web::test]
async fn test_roster_endpoint_serves_students() {
    let state = state(roster());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/students").to_request();
    let body: Vec<Student> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, roster());
}

#[actix_web::test]
async fn test_dashboard_view_model() {
    let state = state(roster());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/dashboard").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["kpis"]["total_students"], 2);
    assert_eq!(body["top_performers"][0]["student_name"], "Diya Sharma");
    assert_eq!(body["at_risk"].as_array().unwrap().len(), 1);
    assert_eq!(body["gpa_chart"]["kind"], "bar");
}

#[actix_web::test]
async fn test_dashboard_with_empty_roster() {
    let state = state(Vec::new());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/dashboard").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["kpis"]["total_students"], 0);
    assert_eq!(body["kpis"]["avg_gpa"], 0.0);
    assert!(body["top_performers"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_page_view_dispatch() {
    let state = state(roster());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/pages/search").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["page"], "search");
    assert_eq!(body["total_students"], 2);

    let req = test::TestRequest::get().uri("/api/pages/insights").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["page"], "insights");
    assert_eq!(body["scatter"]["points"].as_array().unwrap().len(), 4);

    let req = test::TestRequest::get().uri("/api/pages/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_page_shells() {
    let state = state(roster());
    let app = app!(state);

    for path in ["/", "/dashboard", "/search", "/insights"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", path);
    }
}

#[actix_web::test]
async fn test_search_and_profile() {
    let state = state(roster());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/search?q=kab").to_request();
    let hits: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["student_id"], "23WU000002");

    let req = test::TestRequest::get().uri("/api/search?q=k").to_request();
    let hits: Value = test::call_and_read_body_json(&app, req).await;
    assert!(hits.as_array().unwrap().is_empty());

    let req = test::TestRequest::get().uri("/api/students/23WU000002/profile").to_request();
    let profile: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile["insights"].as_array().unwrap().len(), 2);
    assert_eq!(profile["insights"][0]["kind"], "core_concepts");
    assert_eq!(profile["insights"][0]["resource"], "https://www.docker.com/get-started/");

    let req = test::TestRequest::get().uri("/api/students/nobody/profile").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_prediction_over_generated_roster() {
    let students = generate_roster(60, &mut StdRng::seed_from_u64(11)).unwrap();
    let actual = students[0].average_gpa();
    let state = state(students);
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/students/23WU000001/prediction").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["student_id"], "23WU000001");
    assert!((body["actual_gpa"].as_f64().unwrap() - actual).abs() < 0.006);
    let predicted = body["predicted_gpa"].as_f64().unwrap();
    assert!(predicted.is_finite());
    let trained = body["evaluation"]["trained_on"].as_u64().unwrap();
    let evaluated = body["evaluation"]["evaluated_on"].as_u64().unwrap();
    assert_eq!(trained + evaluated, 60);
    assert!(evaluated >= 2);

    let req = test::TestRequest::get().uri("/api/students/nobody/prediction").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_prediction_needs_enough_students() {
    let state = state(roster());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/students/23WU000001/prediction").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_prediction_for_student_without_participation() {
    let mut students = generate_roster(20, &mut StdRng::seed_from_u64(5)).unwrap();
    students.push(Student::new("TRANSFER01", "Zara Khan", vec![Grade::new("Operating Systems", 6.0, 6.5, 80.0, 85.0)]));
    let state = state(students);
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/students/TRANSFER01/prediction").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_report_download() {
    let state = state(roster());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/reports/at-risk.csv").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap().to_string();
    assert!(disposition.contains("at_risk_students_report.csv"));

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with("Student ID,Name,Subject,Issue,Recommendation,Resource\n"));
    assert_eq!(text.lines().count(), 3);
}

#[actix_web::test]
async fn test_theme_toggle() {
    let state = state(roster());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/theme").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["theme"], "light");

    let req = test::TestRequest::post().uri("/api/theme/toggle").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["dark_mode"], true);

    assert_eq!(state.preferences.theme(), Theme::Dark);
}

#[actix_web::test]
async fn test_refresh_invalidates_cache() {
    let state = state(roster());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/students").to_request();
    test::call_service(&app, req).await;
    assert!(state.roster.is_cached().await);

    let req = test::TestRequest::post().uri("/api/roster/refresh").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(!state.roster.is_cached().await);
}

#[actix_web::test]
async fn test_upstream_http_500_yields_empty_roster() {
    let server = HttpServer::new(|| {
        App::new().route(
            "/api/students",
            web::get().to(|| async { HttpResponse::InternalServerError().finish() }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let source = HttpRosterSource::new(format!("http://{}/api/students", addr)).unwrap();
    let repo = RosterRepository::new(source);

    let students = repo.fetch_students().await;

    assert!(students.is_empty());
    assert!(!repo.is_cached().await);
    handle.stop(false).await;
}

#[actix_web::test]
async fn test_upstream_roster_is_fetched_once() {
    let server = HttpServer::new(|| {
        App::new().route("/api/students", web::get().to(|| async { HttpResponse::Ok().json(roster()) }))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let source = HttpRosterSource::new(format!("http://{}/api/students", addr)).unwrap();
    let repo = RosterRepository::new(source);

    assert_eq!(repo.fetch_students().await.len(), 2);
    // upstream gone: the cached roster is still served
    handle.stop(false).await;
    assert_eq!(repo.fetch_students().await.len(), 2);
}

#[tokio::test]
async fn test_json_roster_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(serde_json::to_string(&roster()).unwrap().as_bytes()).unwrap();
    file.flush().unwrap();

    let repo = RosterRepository::new(FileRosterSource::new(file.path()));

    assert_eq!(*repo.fetch_students().await, roster());
}

#[tokio::test]
async fn test_generated_roster_file_is_served() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.csv");
    let students = generate_roster(25, &mut StdRng::seed_from_u64(9)).unwrap();
    save_flat_csv(&path, &students).unwrap();

    let repo = RosterRepository::new(FileRosterSource::new(&path));

    assert_eq!(*repo.fetch_students().await, students);
}

#[tokio::test]
async fn test_bundled_sample_roster_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/student_performance.csv");
    let repo = RosterRepository::new(FileRosterSource::new(path));

    let students = repo.fetch_students().await;

    assert_eq!(students.len(), 30);
    assert!(students.iter().all(|s| s.grades.len() == 6));
}
