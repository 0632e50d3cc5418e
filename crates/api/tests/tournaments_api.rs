//! HTTP-level integration tests for tournaments: freeze lifecycle, locked
//! guard, export to the shop ledger and summaries.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create, delete, get, post_json, put_json, seed_catalog};
use serde_json::json;
use sqlx::PgPool;

/// Seed the catalog and a tournament with two strung jobs and one racket
/// still to string. Returns the tournament id.
async fn seed_tournament(pool: &PgPool) -> i64 {
    seed_catalog(pool).await;
    let tournament = create(
        pool,
        "/api/v1/tournaments",
        json!({"name": "Open", "start_date": "2024-10-05", "end_date": "2024-10-06"}),
    )
    .await;
    let id = tournament["id"].as_i64().unwrap();

    for racket_done in [true, true, false] {
        create(
            pool,
            "/api/v1/jobs",
            json!({
                "tournament_id": id,
                "club": "Plain Club",
                "cordage": "Base Poly",
                "stringer": "Kellian",
                "date": "2024-10-05",
                "racket_done": racket_done,
            }),
        )
        .await;
    }
    id
}

async fn post(pool: &PgPool, uri: &str) -> serde_json::Value {
    let response = post_json(build_test_app(pool.clone()).await, uri, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK, "POST {uri}");
    body_json(response).await
}

async fn tournament_jobs(pool: &PgPool, id: i64) -> Vec<serde_json::Value> {
    let json = body_json(
        get(
            build_test_app(pool.clone()).await,
            &format!("/api/v1/jobs?tournament_id={id}"),
        )
        .await,
    )
    .await;
    json["data"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Freeze lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_finalize_edit_rate_unfreeze(pool: PgPool) {
    let id = seed_tournament(&pool).await;

    let report = post(&pool, &format!("/api/v1/tournaments/{id}/finalize")).await;
    assert_eq!(report["frozen"], 2);
    assert_eq!(report["not_strung"], 1);
    assert_eq!(report["frozen_total"], 1400);

    let tournament = body_json(
        get(build_test_app(pool.clone()).await, &format!("/api/v1/tournaments/{id}")).await,
    )
    .await;
    assert_eq!(tournament["locked"], true);

    // Raise the rate: frozen jobs keep their commission.
    let cordages = body_json(get(build_test_app(pool.clone()).await, "/api/v1/cordages").await).await;
    let base_poly = cordages["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Base Poly")
        .unwrap()["id"]
        .clone();
    let response = put_json(
        build_test_app(pool.clone()).await,
        &format!("/api/v1/cordages/{base_poly}"),
        json!({"tournament_gain_cents": 900}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let strung: Vec<_> = tournament_jobs(&pool, id)
        .await
        .into_iter()
        .filter(|j| j["status"] != "A FAIRE")
        .collect();
    for job in &strung {
        let quote = body_json(
            get(
                build_test_app(pool.clone()).await,
                &format!("/api/v1/jobs/{}/quote", job["id"]),
            )
            .await,
        )
        .await;
        assert_eq!(quote["data"]["commission"]["rule"], "frozen");
        assert_eq!(quote["data"]["commission"]["amount"], 700);
    }

    let cleared = post(&pool, &format!("/api/v1/tournaments/{id}/unfreeze")).await;
    assert_eq!(cleared["cleared"], 2);

    let quote = body_json(
        get(
            build_test_app(pool.clone()).await,
            &format!("/api/v1/jobs/{}/quote", strung[0]["id"]),
        )
        .await,
    )
    .await;
    assert_eq!(quote["data"]["commission"]["rule"], "cordage_rate");
    assert_eq!(quote["data"]["commission"]["amount"], 900);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_finalize_twice_changes_nothing(pool: PgPool) {
    let id = seed_tournament(&pool).await;
    post(&pool, &format!("/api/v1/tournaments/{id}/finalize")).await;

    let again = post(&pool, &format!("/api/v1/tournaments/{id}/finalize")).await;
    assert_eq!(again["frozen"], 0);
    assert_eq!(again["already_frozen"], 2);
    assert_eq!(again["frozen_total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_finalize_unknown_tournament_returns_404(pool: PgPool) {
    let response = post_json(
        build_test_app(pool).await,
        "/api/v1/tournaments/999999/finalize",
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_locked_tournament_rejects_job_writes(pool: PgPool) {
    let id = seed_tournament(&pool).await;
    let job_id = tournament_jobs(&pool, id).await[0]["id"].clone();
    post(&pool, &format!("/api/v1/tournaments/{id}/finalize")).await;

    let response = post_json(
        build_test_app(pool.clone()).await,
        "/api/v1/jobs",
        json!({"tournament_id": id, "club": "Plain Club", "cordage": "Base Poly"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json(
        build_test_app(pool.clone()).await,
        &format!("/api/v1/jobs/{job_id}/toggle"),
        json!({"flag": "messaged", "value": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let response = put_json(
        build_test_app(pool.clone()).await,
        &format!("/api/v1/jobs/{job_id}"),
        json!({"express": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = delete(
        build_test_app(pool).await,
        &format!("/api/v1/jobs/{job_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Tournament CRUD and summaries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tournament_dates_must_be_ordered(pool: PgPool) {
    let response = post_json(
        build_test_app(pool).await,
        "/api/v1/tournaments",
        json!({"name": "Backwards", "start_date": "2024-10-06", "end_date": "2024-10-05"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_tournament_returns_409(pool: PgPool) {
    create(&pool, "/api/v1/tournaments", json!({"name": "Open"})).await;
    let response = post_json(
        build_test_app(pool).await,
        "/api/v1/tournaments",
        json!({"name": "Open"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_summaries_count_strung_jobs(pool: PgPool) {
    seed_tournament(&pool).await;
    let json = body_json(
        get(build_test_app(pool).await, "/api/v1/tournaments/summaries").await,
    )
    .await;
    let summaries = json["data"].as_array().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["name"], "Open");
    assert_eq!(summaries[0]["jobs"], 2);
    assert_eq!(summaries[0]["revenue"], 3600);
    assert_eq!(summaries[0]["commission"], 1400);
    assert_eq!(summaries[0]["clubs"][0]["club"], "Plain Club");
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_export_copies_once_unless_forced(pool: PgPool) {
    let id = seed_tournament(&pool).await;
    let uri = format!("/api/v1/tournaments/{id}/export");

    let first = post(&pool, &uri).await;
    assert_eq!(first["created"].as_array().unwrap().len(), 3);
    assert_eq!(first["already_exported"], 0);

    let second = post(&pool, &uri).await;
    assert_eq!(second["created"], json!([]));
    assert_eq!(second["already_exported"], 3);

    let forced = post(&pool, &format!("{uri}?force=true")).await;
    assert_eq!(forced["created"].as_array().unwrap().len(), 3);

    let shop = body_json(
        get(build_test_app(pool.clone()).await, "/api/v1/jobs?magasin=true").await,
    )
    .await;
    let shop = shop["data"].as_array().unwrap();
    assert_eq!(shop.len(), 6);
    assert!(shop.iter().all(|j| j["tournament"].is_null()));
    assert!(shop.iter().any(|j| j["status"] == "A FAIRE"));

    // Shop copies of tournament jobs stay out of the season's magasin totals.
    let report = body_json(
        get(build_test_app(pool).await, "/api/v1/reports/season?season=2024-2025").await,
    )
    .await;
    assert_eq!(report["totals"]["jobs"], 2);
    assert_eq!(report["duplicate_exports"], 4);
    assert_eq!(report["totals"]["magasin_commission"], 0);
}
