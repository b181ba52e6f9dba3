mod helpers;

use helpers::setup::spawn_app;
use serde_json::{json, Value};

fn valid_reminder_body() -> Value {
    json!({
        "title": "Dentist",
        "message": "Leave for the dentist appointment",
        "phoneNumber": "+12025550123",
        "scheduledFor": "2030-06-01T14:00:00Z",
        "timezone": "America/New_York"
    })
}

#[actix_web::test]
async fn test_status_ok() {
    let (_, address) = spawn_app().await;

    let res = reqwest::get(format!("{}/", address))
        .await
        .expect("Expected status response");
    assert_eq!(res.status(), reqwest::StatusCode::OK);
}

#[actix_web::test]
async fn test_create_and_get_reminder() {
    let (_, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/reminders", address))
        .json(&valid_reminder_body())
        .send()
        .await
        .expect("Expected create response");
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);

    let created: Value = res.json().await.expect("Expected reminder json");
    assert_eq!(created["status"], "scheduled");
    assert_eq!(created["phoneNumber"], "+12025550123");
    assert_eq!(created["scheduledFor"], "2030-06-01T14:00:00Z");
    assert_eq!(created["timezone"], "America/New_York");

    let id = created["id"].as_str().expect("Expected reminder id");
    let res = client
        .get(format!("{}/reminders/{}", address, id))
        .send()
        .await
        .expect("Expected get response");
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let fetched: Value = res.json().await.expect("Expected reminder json");
    assert_eq!(fetched, created);

    let res = client
        .get(format!("{}/reminders", address))
        .send()
        .await
        .expect("Expected list response");
    let reminders: Vec<Value> = res.json().await.expect("Expected reminder list json");
    assert_eq!(reminders, vec![fetched]);
}

#[actix_web::test]
async fn test_create_reminder_rejects_invalid_phone_numbers() {
    let (_, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let mut body = valid_reminder_body();
    body["phoneNumber"] = "12025550123".into();

    let res = client
        .post(format!("{}/reminders", address))
        .json(&body)
        .send()
        .await
        .expect("Expected create response");
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_create_reminder_rejects_nonexistent_local_times() {
    let (_, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let mut body = valid_reminder_body();
    // Clocks spring past 02:30 on this date in America/New_York
    body["scheduledFor"] = "2030-03-10T02:30:00".into();

    let res = client
        .post(format!("{}/reminders", address))
        .json(&body)
        .send()
        .await
        .expect("Expected create response");
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_reminder() {
    let (_, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/reminders", address))
        .json(&valid_reminder_body())
        .send()
        .await
        .expect("Expected create response")
        .json()
        .await
        .expect("Expected reminder json");
    let id = created["id"].as_str().expect("Expected reminder id");

    let res = client
        .put(format!("{}/reminders/{}", address, id))
        .json(&json!({ "title": "Dentist!" }))
        .send()
        .await
        .expect("Expected update response");
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let updated: Value = res.json().await.expect("Expected reminder json");
    assert_eq!(updated["title"], "Dentist!");
    assert_eq!(updated["message"], created["message"]);

    let res = client
        .put(format!("{}/reminders/{}", address, callme_domain::ID::new()))
        .json(&json!({ "title": "Dentist!" }))
        .send()
        .await
        .expect("Expected update response");
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_delete_reminder_removes_it_and_its_call_logs() {
    let (_, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/reminders", address))
        .json(&valid_reminder_body())
        .send()
        .await
        .expect("Expected create response")
        .json()
        .await
        .expect("Expected reminder json");
    let id = created["id"].as_str().expect("Expected reminder id");

    let res = client
        .delete(format!("{}/reminders/{}", address, id))
        .send()
        .await
        .expect("Expected delete response");
    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/reminders/{}", address, id))
        .send()
        .await
        .expect("Expected get response");
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/reminders/{}/call-logs", address, id))
        .send()
        .await
        .expect("Expected call logs response");
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_snooze_is_rejected_for_scheduled_reminders() {
    let (_, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/reminders", address))
        .json(&valid_reminder_body())
        .send()
        .await
        .expect("Expected create response")
        .json()
        .await
        .expect("Expected reminder json");
    let id = created["id"].as_str().expect("Expected reminder id");

    let res = client
        .post(format!("{}/reminders/{}/snooze", address, id))
        .json(&json!({ "minutes": 15 }))
        .send()
        .await
        .expect("Expected snooze response");
    assert_eq!(res.status(), reqwest::StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_call_logs_start_out_empty() {
    let (_, address) = spawn_app().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/reminders", address))
        .json(&valid_reminder_body())
        .send()
        .await
        .expect("Expected create response")
        .json()
        .await
        .expect("Expected reminder json");
    let id = created["id"].as_str().expect("Expected reminder id");

    let res = client
        .get(format!("{}/reminders/{}/call-logs", address, id))
        .send()
        .await
        .expect("Expected call logs response");
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let logs: Vec<Value> = res.json().await.expect("Expected call logs json");
    assert!(logs.is_empty());
}
