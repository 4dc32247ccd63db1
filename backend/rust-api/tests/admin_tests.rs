mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

async fn admin_get(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, Method::GET, uri, None, Some(&admin_token())).await
}

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = create_test_app();

    for uri in ["/api/admin/teams", "/api/admin/leaderboard", "/api/admin/stats"] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");

        let (status, _) = send(&app, Method::GET, uri, None, Some(&token("team"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");

        let (status, _) = admin_get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn test_leaderboard_ranks_round1_finishers() {
    let app = create_test_app();
    let idle = register_team(&app, "Idle Team").await;
    let mid = register_team(&app, "Middle Team").await;
    let top = register_team(&app, "Top Team").await;
    let tied = register_team(&app, "Tied Team").await;

    complete_round1(&app, &mid, 8).await;
    complete_round1(&app, &top, 12).await;
    complete_round1(&app, &tied, 8).await;

    let (status, board) = admin_get(&app, "/api/admin/leaderboard").await;
    assert_eq!(status, StatusCode::OK);

    let entries = board.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e["teamId"] != idle.as_str()));

    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["teamName"], "Top Team");
    assert_eq!(entries[0]["scores"]["round1"], 550);
    assert_eq!(entries[0]["scores"]["total"], 550);
    assert_eq!(entries[0]["verified"], false);

    // equal totals keep registration order
    assert_eq!(entries[1]["teamName"], "Middle Team");
    assert_eq!(entries[2]["teamName"], "Tied Team");
    assert_eq!(entries[2]["rank"], 3);
}

#[tokio::test]
async fn test_event_stats() {
    let app = create_test_app();

    let (_, empty) = admin_get(&app, "/api/admin/stats").await;
    assert_eq!(empty["teams"]["total"], 0);
    assert!(empty["scores"].is_null());

    let a = register_team(&app, "Stats Alpha").await;
    let b = register_team(&app, "Stats Beta").await;
    register_team(&app, "Stats Gamma").await;
    complete_round1(&app, &a, 8).await;
    complete_round2(&app, &a).await;
    complete_round1(&app, &b, 12).await;

    let (status, stats) = admin_get(&app, "/api/admin/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats["teams"],
        json!({
            "total": 3,
            "round1Completed": 2,
            "round2Completed": 1,
            "round3Completed": 0,
            "round3Verified": 0
        })
    );

    let sector_total: u64 = stats["sectors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["count"].as_u64().unwrap())
        .sum();
    assert_eq!(sector_total, 3);

    assert_eq!(stats["scores"]["avgRound1"], 350.0);
    assert_eq!(stats["scores"]["avgRound2"], 34.0);
    assert_eq!(stats["scores"]["maxTotal"], 550);
    assert_eq!(stats["scores"]["minTotal"], 218);
}

#[tokio::test]
async fn test_admin_teams_view() {
    let app = create_test_app();
    let low = register_team(&app, "Low Scorer").await;
    let high = register_team(&app, "High Scorer").await;
    complete_round1(&app, &high, 12).await;

    let (status, body) = admin_get(&app, "/api/admin/teams").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["stats"]["round1Completed"], 1);
    assert_eq!(body["teams"][0]["_id"], high.as_str());
    assert_eq!(body["teams"][1]["_id"], low.as_str());
}

#[tokio::test]
async fn test_round3_override_uses_25_minute_cap() {
    let app = create_test_app();
    let team_id = register_team(&app, "Override Me").await;
    complete_round1(&app, &team_id, 8).await;
    complete_round2(&app, &team_id).await;
    submit_round3(&app, &team_id, 10, 12).await;
    let uri = format!("/api/admin/round3/time/{}", team_id);
    let admin = admin_token();

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "timeTaken": 20 })),
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["teamName"], "Override Me");
    assert_eq!(body["round3"]["timeTaken"], 20);
    assert_eq!(body["round3"]["testCasesPassed"], 10);
    assert_eq!(body["round3"]["finalScore"], 15);
    assert_eq!(body["round3"]["adminVerified"], true);
    assert_eq!(body["totalScore"], 150 + 68 + 15);

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "timeTaken": 26 })),
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "testCasesPassed": 11 })),
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/admin/round3/time/64b000000000000000000000",
        Some(json!({ "timeTaken": 5 })),
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_team_requires_super_admin() {
    let app = create_test_app();
    let team_id = register_team(&app, "Doomed Team").await;
    let uri = format!("/api/admin/teams/{}", team_id);

    let (status, _) = send(&app, Method::DELETE, &uri, None, Some(&admin_token())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let super_admin = super_admin_token();
    let (status, body) = send(&app, Method::DELETE, &uri, None, Some(&super_admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["teamId"], team_id.as_str());

    let (status, _) = get(&app, &format!("/api/teams/{}", team_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, None, Some(&super_admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
