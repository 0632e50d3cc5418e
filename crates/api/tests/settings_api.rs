//! HTTP-level integration tests for engine settings and the tariff matrix.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create, get, post_json, put_json, seed_catalog};
use serde_json::json;
use sqlx::PgPool;

fn setting<'a>(view: &'a serde_json::Value, key: &str) -> &'a serde_json::Value {
    &view["settings"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["key"] == key)
        .unwrap_or_else(|| panic!("missing setting {key}"))["value"]
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seeded_settings_are_complete(pool: PgPool) {
    let response = get(build_test_app(pool).await, "/api/v1/settings").await;
    assert_eq!(response.status(), StatusCode::OK);

    let view = body_json(response).await;
    assert_eq!(view["settings"].as_array().unwrap().len(), 13);
    assert_eq!(view["tariff"].as_array().unwrap().len(), 6);
    assert_eq!(view["gaps"], json!([]));
    assert_eq!(setting(&view, "partner_club"), "FABREGUES");
    assert_eq!(setting(&view, "tournament_gain_14_cents"), "1166");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_express_surcharge_change_applies_to_quotes(pool: PgPool) {
    seed_catalog(&pool).await;
    let response = put_json(
        build_test_app(pool.clone()).await,
        "/api/v1/settings/express_surcharge_cents",
        json!({"value": "500"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(setting(&body_json(response).await, "express_surcharge_cents"), "500");

    let job = create(
        &pool,
        "/api/v1/jobs",
        json!({"club": "Plain Club", "cordage": "Base Poly", "express": true}),
    )
    .await;
    assert_eq!(job["price_cents"], 2300);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_express_on_complimentary_can_be_disabled(pool: PgPool) {
    seed_catalog(&pool).await;
    put_json(
        build_test_app(pool.clone()).await,
        "/api/v1/settings/express_on_complimentary",
        json!({"value": "false"}),
    )
    .await;

    let job = create(
        &pool,
        "/api/v1/jobs",
        json!({"club": "Plain Club", "cordage": "Base Poly", "express": true, "complimentary": true}),
    )
    .await;
    assert_eq!(job["price_cents"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_euro_amount_stored_as_cents(pool: PgPool) {
    let response = put_json(
        build_test_app(pool).await,
        "/api/v1/settings/magasin_gain_14_cents",
        json!({"value": "6,20 €"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(setting(&body_json(response).await, "magasin_gain_14_cents"), "620");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_settings_rejected(pool: PgPool) {
    let response = put_json(
        build_test_app(pool.clone()).await,
        "/api/v1/settings/no_such_setting",
        json!({"value": "1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        build_test_app(pool.clone()).await,
        "/api/v1/settings/supplied_price_cents",
        json!({"value": "-5"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let view = body_json(get(build_test_app(pool).await, "/api/v1/settings").await).await;
    assert_eq!(setting(&view, "supplied_price_cents"), "1200");
}

// ---------------------------------------------------------------------------
// Tariff
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tariff_row_update(pool: PgPool) {
    seed_catalog(&pool).await;
    let response = put_json(
        build_test_app(pool.clone()).await,
        "/api/v1/settings/tariff",
        json!({
            "club_supplies_base": false,
            "club_supplies_specific": false,
            "cordage_is_base": true,
            "price_cents": 1900,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let job = create(
        &pool,
        "/api/v1/jobs",
        json!({"club": "Plain Club", "cordage": "Base Poly"}),
    )
    .await;
    assert_eq!(job["price_cents"], 1900);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unreachable_tariff_key_rejected(pool: PgPool) {
    let response = put_json(
        build_test_app(pool).await,
        "/api/v1/settings/tariff",
        json!({
            "club_supplies_base": false,
            "club_supplies_specific": true,
            "cordage_is_base": true,
            "price_cents": 1000,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reload_picks_up_direct_edits(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    sqlx::query("DELETE FROM tariff_matrix WHERE cordage_is_base = FALSE AND club_supplies_base = FALSE")
        .execute(&pool)
        .await
        .unwrap();

    let view = body_json(post_json(app, "/api/v1/settings/reload", json!({})).await).await;
    let gaps = view["gaps"].as_array().unwrap();
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0]["kind"], "missing_tariff_row");
}
