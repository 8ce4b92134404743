//! Integration tests for `/api/v1/inquiries/{id}/assignment/*`.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{
    body_json, create_inquiry, create_rule, get, load_balance_rule, post, post_json, seed_engineer,
};
use serde_json::{json, Value};
use sqlx::PgPool;

/// One load-balance rule on "bolts"; engineer 1 carries 3 inquiries,
/// engineer 2 carries 1.
async fn seed_bolts_desk(app: &Router) {
    create_rule(app, load_balance_rule("Bolts desk", 10, &["bolts"])).await;
    seed_engineer(app, 1, &["bolts"], 3).await;
    seed_engineer(app, 2, &["bolts"], 1).await;
}

async fn data(app: &Router, uri: &str) -> Value {
    let response = get(app, uri).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    let mut json = body_json(response).await;
    json["data"].take()
}

// ---------------------------------------------------------------------------
// Suggestion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn suggestion_picks_lowest_workload(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    seed_bolts_desk(&app).await;
    let inquiry = create_inquiry(&app, "bolts").await;

    let suggestion = data(&app, &format!("/api/v1/inquiries/{inquiry}/assignment/suggestion")).await;
    assert_eq!(suggestion["suggested_engineer"]["engineer_id"], 2);
    assert_eq!(suggestion["outcome"], "suggested");
    assert_eq!(suggestion["basis"], "lowest_workload");

    // Advisory only.
    let row = data(&app, &format!("/api/v1/inquiries/{inquiry}")).await;
    assert!(row["assigned_engineer_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn suggestion_without_matching_rule_names_reason(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    seed_bolts_desk(&app).await;
    let inquiry = create_inquiry(&app, "nuts").await;

    let suggestion = data(&app, &format!("/api/v1/inquiries/{inquiry}/assignment/suggestion")).await;
    assert!(suggestion["suggested_engineer"].is_null());
    assert_eq!(suggestion["reason"], "no matching rule");
    assert_eq!(suggestion["outcome"], "no_matching_rule");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn suggestion_for_missing_inquiry_is_404(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let response = get(&app, "/api/v1/inquiries/77/assignment/suggestion").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn matching_rules_are_ordered_by_priority(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let late = create_rule(&app, load_balance_rule("Late", 20, &["bolts"])).await;
    let early = create_rule(&app, load_balance_rule("Early", 10, &["bolts"])).await;
    create_rule(&app, load_balance_rule("Nuts", 1, &["nuts"])).await;
    let inquiry = create_inquiry(&app, "bolts").await;

    let rules = data(&app, &format!("/api/v1/inquiries/{inquiry}/assignment/rules")).await;
    let ids: Vec<_> = rules
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![early, late]);
}

// ---------------------------------------------------------------------------
// Auto-assign
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn auto_assign_writes_once_then_conflicts(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    seed_bolts_desk(&app).await;
    let inquiry = create_inquiry(&app, "bolts").await;
    let uri = format!("/api/v1/inquiries/{inquiry}/assignment/auto");

    let response = post(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let write = &json["data"];
    assert_eq!(write["inquiry"]["assigned_engineer_id"], 2);
    assert_eq!(write["inquiry"]["version"], 2);
    assert_eq!(write["record"]["assignment_type"], "auto");
    assert_eq!(write["record"]["rule_id"], 1);

    let again = post(&app, &uri).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(again).await["code"], "ALREADY_ASSIGNED");

    let engineers = data(&app, "/api/v1/engineers/workload").await;
    assert_eq!(engineers[1]["engineer_id"], 2);
    assert_eq!(engineers[1]["current_inquiries"], 2);

    let history = data(&app, &format!("/api/v1/inquiries/{inquiry}/assignment/history")).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn auto_assign_refused_when_rule_disables_it(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let mut rule = load_balance_rule("Manual bolts", 10, &["bolts"]);
    rule["auto_assign"] = json!(false);
    create_rule(&app, rule).await;
    seed_engineer(&app, 1, &["bolts"], 0).await;
    let inquiry = create_inquiry(&app, "bolts").await;

    let response = post(&app, &format!("/api/v1/inquiries/{inquiry}/assignment/auto")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "AUTO_ASSIGN_DISABLED");
    assert!(json["error"].as_str().unwrap().contains("Manual bolts"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn auto_assign_reports_no_match_and_empty_roster(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    create_rule(&app, load_balance_rule("Bolts desk", 10, &["bolts"])).await;
    let nuts = create_inquiry(&app, "nuts").await;
    let bolts = create_inquiry(&app, "bolts").await;

    let no_match = post(&app, &format!("/api/v1/inquiries/{nuts}/assignment/auto")).await;
    assert_eq!(body_json(no_match).await["code"], "NO_MATCH");

    let empty = post(&app, &format!("/api/v1/inquiries/{bolts}/assignment/auto")).await;
    assert_eq!(empty.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(empty).await["code"], "NO_ENGINEERS_AVAILABLE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn auto_assign_publishes_inquiry_assigned(pool: PgPool) {
    let (app, state) = common::build_test_app(pool);
    seed_bolts_desk(&app).await;
    let inquiry = create_inquiry(&app, "bolts").await;
    let mut rx = state.event_bus.subscribe();

    post(&app, &format!("/api/v1/inquiries/{inquiry}/assignment/auto")).await;

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type, "inquiry.assigned");
    assert_eq!(event.source_entity_id, Some(inquiry));
    assert_eq!(event.actor.as_deref(), Some("auto"));
    assert_eq!(event.payload["engineer_id"], 2);
}

// ---------------------------------------------------------------------------
// Manual assign
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_assign_and_reassign_rules(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    seed_bolts_desk(&app).await;
    let inquiry = create_inquiry(&app, "bolts").await;
    let uri = format!("/api/v1/inquiries/{inquiry}/assignment/manual");

    let unknown = post_json(&app, &uri, json!({ "engineer_id": 9 })).await;
    assert_eq!(body_json(unknown).await["code"], "UNKNOWN_ENGINEER");

    let premature = post_json(
        &app,
        &uri,
        json!({ "engineer_id": 1, "assignment_type": "reassign" }),
    )
    .await;
    assert_eq!(body_json(premature).await["code"], "INVALID_REASSIGNMENT");

    let first = post_json(
        &app,
        &uri,
        json!({ "engineer_id": 1, "reason": "  customer asked for Ana  ", "assigned_by": "lead" }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_json(first).await;
    assert_eq!(json["data"]["record"]["reason"], "customer asked for Ana");
    assert_eq!(json["data"]["record"]["assigned_by"], "lead");

    let overwrite = post_json(&app, &uri, json!({ "engineer_id": 2 })).await;
    assert_eq!(overwrite.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(overwrite).await["code"], "ALREADY_ASSIGNED");

    let same = post_json(
        &app,
        &uri,
        json!({ "engineer_id": 1, "assignment_type": "reassign" }),
    )
    .await;
    assert_eq!(same.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let moved = post_json(
        &app,
        &uri,
        json!({ "engineer_id": 2, "assignment_type": "reassign" }),
    )
    .await;
    assert_eq!(moved.status(), StatusCode::OK);
    let json = body_json(moved).await;
    assert_eq!(json["data"]["record"]["previous_engineer_id"], 1);
    assert_eq!(json["data"]["inquiry"]["assigned_engineer_id"], 2);

    let history = data(&app, &format!("/api/v1/inquiries/{inquiry}/assignment/history")).await;
    assert_eq!(history.as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Confirm
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn confirm_is_idempotent_and_rejects_stale_versions(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    seed_bolts_desk(&app).await;
    let inquiry = create_inquiry(&app, "bolts").await;
    let uri = format!("/api/v1/inquiries/{inquiry}/assignment/confirm");
    let cmd = json!({ "engineer_id": 2, "expected_version": 1, "assignment_type": "assign" });

    let first = post_json(&app, &uri, cmd.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let replay = post_json(&app, &uri, cmd).await;
    assert_eq!(replay.status(), StatusCode::OK);
    let json = body_json(replay).await;
    assert!(json["data"]["record"].is_null());
    assert_eq!(json["data"]["inquiry"]["version"], 2);

    let stale = post_json(
        &app,
        &uri,
        json!({ "engineer_id": 1, "expected_version": 1, "assignment_type": "reassign" }),
    )
    .await;
    assert_eq!(stale.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(stale).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn confirm_refuses_auto_type_from_callers(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let mut rule = load_balance_rule("Manual bolts", 10, &["bolts"]);
    rule["auto_assign"] = json!(false);
    create_rule(&app, rule).await;
    seed_engineer(&app, 1, &["nuts"], 0).await;
    let inquiry = create_inquiry(&app, "bolts").await;

    let response = post_json(
        &app,
        &format!("/api/v1/inquiries/{inquiry}/assignment/confirm"),
        json!({
            "engineer_id": 1,
            "expected_version": 1,
            "assignment_type": "auto",
            "rule_id": 999,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let row = data(&app, &format!("/api/v1/inquiries/{inquiry}")).await;
    assert!(row["assigned_engineer_id"].is_null());
    assert_eq!(row["version"], 1);
    let history = data(&app, &format!("/api/v1/inquiries/{inquiry}/assignment/history")).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn confirm_rejects_unknown_rule_and_normalizes_reason(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    seed_bolts_desk(&app).await;
    let inquiry = create_inquiry(&app, "bolts").await;
    let uri = format!("/api/v1/inquiries/{inquiry}/assignment/confirm");

    let unknown_rule = post_json(
        &app,
        &uri,
        json!({
            "engineer_id": 1,
            "expected_version": 1,
            "assignment_type": "assign",
            "rule_id": 999,
        }),
    )
    .await;
    assert_eq!(unknown_rule.status(), StatusCode::NOT_FOUND);
    let json = body_json(unknown_rule).await;
    assert!(json["error"].as_str().unwrap().contains("AssignmentRule"));

    let long_reason = format!("   {}   ", "x".repeat(700));
    let accepted = post_json(
        &app,
        &uri,
        json!({
            "engineer_id": 1,
            "expected_version": 1,
            "assignment_type": "assign",
            "rule_id": 1,
            "reason": long_reason,
        }),
    )
    .await;
    assert_eq!(accepted.status(), StatusCode::OK);
    let json = body_json(accepted).await;
    let reason = json["data"]["record"]["reason"].as_str().unwrap();
    assert_eq!(reason.len(), 500);
    assert!(!reason.starts_with(' '));
    assert_eq!(json["data"]["record"]["rule_id"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn confirm_reassign_to_current_engineer_matches_manual(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    seed_bolts_desk(&app).await;
    let inquiry = create_inquiry(&app, "bolts").await;

    let assigned = post_json(
        &app,
        &format!("/api/v1/inquiries/{inquiry}/assignment/confirm"),
        json!({ "engineer_id": 1, "expected_version": 1, "assignment_type": "assign" }),
    )
    .await;
    assert_eq!(assigned.status(), StatusCode::OK);

    let via_confirm = post_json(
        &app,
        &format!("/api/v1/inquiries/{inquiry}/assignment/confirm"),
        json!({ "engineer_id": 1, "expected_version": 2, "assignment_type": "reassign" }),
    )
    .await;
    let via_manual = post_json(
        &app,
        &format!("/api/v1/inquiries/{inquiry}/assignment/manual"),
        json!({ "engineer_id": 1, "assignment_type": "reassign" }),
    )
    .await;

    assert_eq!(via_confirm.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(via_manual.status(), via_confirm.status());
    assert_eq!(body_json(via_confirm).await["code"], "INVALID_REASSIGNMENT");
    assert_eq!(body_json(via_manual).await["code"], "INVALID_REASSIGNMENT");
}
