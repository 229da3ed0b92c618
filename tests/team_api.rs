//! Manager-only team views and feedback.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_log, get_auth, post_json_auth, register};
use serde_json::json;

#[tokio::test]
async fn developers_are_forbidden_from_manager_endpoints() {
    let app = common::build_test_app();
    let (_, developer) = common::manager_and_developer(&app).await;
    let log = create_log(&app, &developer.token, "2024-01-01").await;

    let response = get_auth(&app, "/api/team/logs", &developer.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"]["kind"], "forbidden");

    let response = get_auth(&app, "/api/team/developers", &developer.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json!({ "log_id": log["id"], "feedback_text": "self review" });
    let response = post_json_auth(&app, "/api/feedback", &developer.token, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn manager_sees_report_feedback_round_trip() {
    let app = common::build_test_app();
    let (manager, developer) = common::manager_and_developer(&app).await;

    let body = json!({
        "date": "2024-01-01",
        "tasks": [{ "description": "fix bug", "time_spent": 2.0, "completed": true }],
        "total_time": 2.0,
        "mood": 4,
    });
    let response = post_json_auth(&app, "/api/logs", &developer.token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let log_id = body_json(response).await["id"].clone();

    let json = body_json(get_auth(&app, "/api/team/logs", &manager.token).await).await;
    let logs = json.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["user_name"], "d1");
    assert_eq!(logs[0]["total_time"], 2.0);
    assert!(logs[0]["feedback"].is_null());

    let body = json!({ "log_id": log_id, "feedback_text": "good job" });
    let response = post_json_auth(&app, "/api/feedback", &manager.token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let feedback = body_json(response).await;
    assert_eq!(feedback["manager_id"], manager.id.as_str());
    assert_eq!(feedback["feedback_text"], "good job");

    let json = body_json(get_auth(&app, "/api/notifications", &developer.token).await).await;
    let notifications = json.as_array().unwrap();
    assert!(notifications.iter().any(|n| n["type"] == "feedback"));

    let json = body_json(get_auth(&app, "/api/logs", &developer.token).await).await;
    assert_eq!(json[0]["feedback"], "good job");

    let json = body_json(get_auth(&app, "/api/team/logs", &manager.token).await).await;
    assert_eq!(json[0]["feedback"], "good job");
}

#[tokio::test]
async fn earliest_feedback_is_shown() {
    let app = common::build_test_app();
    let (manager, developer) = common::manager_and_developer(&app).await;
    let log = create_log(&app, &developer.token, "2024-01-01").await;

    for text in ["first", "second"] {
        let body = json!({ "log_id": log["id"], "feedback_text": text });
        let response = post_json_auth(&app, "/api/feedback", &manager.token, body).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let json = body_json(get_auth(&app, "/api/logs", &developer.token).await).await;
    assert_eq!(json[0]["feedback"], "first");
}

#[tokio::test]
async fn team_logs_exclude_other_teams() {
    let app = common::build_test_app();
    let (manager, developer) = common::manager_and_developer(&app).await;
    let other_manager = register(&app, "m2", "pw", "manager", None).await;
    let outsider = register(&app, "d9", "pw", "developer", Some(&other_manager.id)).await;

    create_log(&app, &developer.token, "2024-01-01").await;
    create_log(&app, &outsider.token, "2024-01-01").await;

    let json = body_json(get_auth(&app, "/api/team/logs", &manager.token).await).await;
    let logs = json.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["user_id"], developer.id.as_str());

    let uri = format!("/api/team/logs?developer_id={}", outsider.id);
    let response = get_auth(&app, &uri, &manager.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn team_logs_filter_by_developer_and_date() {
    let app = common::build_test_app();
    let manager = register(&app, "m1", "pw", "manager", None).await;
    let d1 = register(&app, "d1", "pw", "developer", Some(&manager.id)).await;
    let d2 = register(&app, "d2", "pw", "developer", Some(&manager.id)).await;

    create_log(&app, &d1.token, "2024-01-01").await;
    create_log(&app, &d1.token, "2024-01-05").await;
    create_log(&app, &d2.token, "2024-01-02").await;

    let json = body_json(get_auth(&app, "/api/team/logs", &manager.token).await).await;
    let dates: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-05", "2024-01-02", "2024-01-01"]);

    let uri = format!("/api/team/logs?developer_id={}", d1.id);
    let json = body_json(get_auth(&app, &uri, &manager.token).await).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let uri = format!(
        "/api/team/logs?developer_id={}&start_date=2024-01-02&end_date=2024-01-31",
        d1.id
    );
    let json = body_json(get_auth(&app, &uri, &manager.token).await).await;
    let logs = json.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["date"], "2024-01-05");

    // A blank developer_id means the whole team.
    let json = body_json(get_auth(&app, "/api/team/logs?developer_id=", &manager.token).await).await;
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn team_developers_lists_direct_reports() {
    let app = common::build_test_app();
    let (manager, _) = common::manager_and_developer(&app).await;
    register(&app, "d2", "pw", "developer", Some(&manager.id)).await;
    register(&app, "loner", "pw", "developer", None).await;

    let response = get_auth(&app, "/api/team/developers", &manager.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let mut names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["d1", "d2"]);
}

#[tokio::test]
async fn feedback_on_foreign_report_log_is_forbidden() {
    let app = common::build_test_app();
    let (manager, _) = common::manager_and_developer(&app).await;
    let outsider = register(&app, "d9", "pw", "developer", None).await;
    let log = create_log(&app, &outsider.token, "2024-01-01").await;

    let body = json!({ "log_id": log["id"], "feedback_text": "not yours" });
    let response = post_json_auth(&app, "/api/feedback", &manager.token, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(get_auth(&app, "/api/notifications", &outsider.token).await).await;
    assert!(json.as_array().unwrap().iter().all(|n| n["type"] != "feedback"));
}

#[tokio::test]
async fn feedback_on_unknown_log_is_stored_without_notification() {
    let app = common::build_test_app();
    let (manager, developer) = common::manager_and_developer(&app).await;

    let body = json!({ "log_id": uuid::Uuid::new_v4(), "feedback_text": "orphan" });
    let response = post_json_auth(&app, "/api/feedback", &manager.token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["feedback_text"], "orphan");

    let json = body_json(get_auth(&app, "/api/notifications", &developer.token).await).await;
    assert!(json.as_array().unwrap().iter().all(|n| n["type"] != "feedback"));
}

#[tokio::test]
async fn empty_feedback_text_is_rejected() {
    let app = common::build_test_app();
    let (manager, developer) = common::manager_and_developer(&app).await;
    let log = create_log(&app, &developer.token, "2024-01-01").await;

    let body = json!({ "log_id": log["id"], "feedback_text": "" });
    let response = post_json_auth(&app, "/api/feedback", &manager.token, body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
