use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};

use exam_seating::web::{configure, AppState};

const ROSTER_CSV: &str = "I Yr,II Yr\nIS001,IIS001\nIS002,IIS002\nIS003,IIS003\n";

fn request_body(student_csv: &str, rows: u32) -> Value {
    json!({
        "branch_name": "Mechanical",
        "student_csv": student_csv,
        "rooms": [{"name": "R1", "rows": rows, "cols": 2, "door": "left", "seating_pattern": "I Yr, II Yr"}],
        "sessions": [{"date": "2024-05-12", "shifts": [{"time": "AM", "years": [
            {"year": "I Yr", "subject": "CS101"},
            {"year": "II Yr", "subject": "CS201"}
        ]}]}]
    })
}

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::default()))
                .configure(configure),
        )
        .await
    };
}

#[actix_web::test]
async fn generates_plan() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(request_body(ROSTER_CSV, 3))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["branch_name"], "Mechanical");
    assert_eq!(body["seating_plans"][0]["headers"], json!(["I Yr", "II Yr"]));
    assert_eq!(body["seating_plans"][0]["door"], "left");
    assert_eq!(body["seating_plans"][0]["total_in_room"], 6);
    assert_eq!(body["room_attendance_data"][0]["students"][0]["enrollment"], "IS001");
    assert_eq!(body["master_timetable"][0]["IV Yr"], "-");
}

#[actix_web::test]
async fn capacity_error_is_bad_request() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(request_body(ROSTER_CSV, 2))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Rooms insufficient for 2024-05-12 AM! Capacity: 4, Students scheduled: 6");
}

#[actix_web::test]
async fn missing_roster_is_rejected() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(request_body("", 3))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No student file uploaded.");
}

#[actix_web::test]
async fn missing_sessions_is_a_configuration_error() {
    let app = app!();
    let mut body = request_body(ROSTER_CSV, 3);
    body["sessions"] = json!([]);
    let req = test::TestRequest::post().uri("/api/generate").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing rooms or exam sessions.");
}

#[actix_web::test]
async fn unknown_year_label_is_rejected_as_json_error() {
    let app = app!();
    let mut body = request_body(ROSTER_CSV, 3);
    body["sessions"][0]["shifts"][0]["years"][0]["year"] = json!("V Yr");
    let req = test::TestRequest::post().uri("/api/generate").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON configuration format"));
}

#[actix_web::test]
async fn oversized_room_is_rejected_without_taking_the_server_down() {
    let app = app!();
    let mut body = request_body(ROSTER_CSV, 3);
    body["rooms"][0]["rows"] = json!("4294967295");
    body["rooms"][0]["cols"] = json!(1);
    let req = test::TestRequest::post().uri("/api/generate").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Room R1 has 4294967295 x 1 seats"));

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn health_check() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}
