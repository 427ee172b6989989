//! End-to-end workout flows through the HTTP API.
//!
//! Needs PostgreSQL: run with `cargo test -- --ignored` with Docker available
//! or `TEST_DATABASE_URL` pointing at a server.

mod common;

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::TestApp;

fn sets_of(workout: &Value, exercise_name: &str) -> Vec<Value> {
    workout["exercises"]
        .as_array()
        .unwrap()
        .iter()
        .find(|exercise| exercise["exercise_name"] == exercise_name)
        .unwrap_or_else(|| panic!("{exercise_name} missing from workout"))["sets"]
        .as_array()
        .unwrap()
        .clone()
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_full_training_cycle() {
    let app = TestApp::new().await;
    let catalog = app.seed_exercises().await;
    let token = app.onboard("alice", "beginner", Some("strength")).await;

    let plan = app
        .create_plan(
            &token,
            json!([{ "exercise_ids": [catalog["Bench Press"], catalog["Plank"]] }]),
        )
        .await;

    let day = &plan["days"][0];
    assert_eq!(day["name"], "Training #1");
    assert_eq!(plan["name"], "alice's Plan");
    let bench = &day["exercises"][0];
    assert_eq!(bench["target_sets"], 2);
    assert_eq!(bench["target_reps_min"], 6);
    assert_eq!(bench["target_reps_max"], 8);
    assert_eq!(bench["warmup_sets"], 1);
    let plank = &day["exercises"][1];
    assert_eq!(plank["target_sets"], 3);
    assert_eq!(plank["target_reps_min"], 15);
    assert_eq!(plank["warmup_sets"], 0);

    let day_id = day["id"].as_str().unwrap();
    let (status, workout) = app
        .post(&format!("/api/workouts/start/{day_id}"), &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{workout}");
    assert_eq!(workout["name"], "Training #1");
    assert_eq!(workout["is_completed"], false);

    let bench_sets = sets_of(&workout, "Bench Press");
    let layout: Vec<(i64, bool)> = bench_sets
        .iter()
        .map(|set| (set["set_number"].as_i64().unwrap(), set["is_warmup"].as_bool().unwrap()))
        .collect();
    assert_eq!(layout, vec![(1, true), (2, false), (3, false)]);
    assert_eq!(sets_of(&workout, "Plank").len(), 3);

    let warmup_id = bench_sets[0]["id"].as_str().unwrap();
    let working_id = bench_sets[1]["id"].as_str().unwrap();

    let (status, _) = app
        .put(
            &format!("/api/sets/{warmup_id}"),
            &token,
            json!({ "weight": 50.0, "reps": 10, "is_completed": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .put(
            &format!("/api/sets/{working_id}"),
            &token,
            json!({ "weight": 100.0, "reps": 10, "is_completed": true, "rpe": 8, "notes": "solid" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Set updated");

    let workout_id = workout["id"].as_str().unwrap();
    let (status, finished) = app
        .post(&format!("/api/workouts/{workout_id}/finish"), &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(finished["is_completed"], true);
    assert_eq!(finished["total_volume"], 1000.0);

    let (status, history) = app.get("/api/workouts/history", &token).await;
    assert_eq!(status, StatusCode::OK);
    let workouts = history["workouts"].as_array().unwrap();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0]["total_volume"], 1000.0);
    assert_eq!(workouts[0]["exercise_count"], 2);
    assert_eq!(history["has_more"], false);
    assert_eq!(history["chart"].as_array().unwrap().len(), 1);
    assert_eq!(history["stats"]["total_workouts"], 1);
    assert_eq!(history["stats"]["current_streak"], 1);
    assert_eq!(history["stats"]["total_volume"], 1000.0);

    let (status, stats) = app.get("/api/workouts/stats", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats, history["stats"]);

    let (status, _) = app.get("/api/workouts/active", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_stats_are_zero_without_workouts() {
    let app = TestApp::new().await;
    let token = app.onboard("newbie", "intermediate", None).await;

    let (status, stats) = app.get("/api/workouts/stats", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({ "total_workouts": 0, "current_streak": 0, "total_volume": 0.0, "avg_duration": 0 })
    );
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_new_plan_replaces_active_plan() {
    let app = TestApp::new().await;
    let catalog = app.seed_exercises().await;
    let token = app.onboard("bob", "advanced", Some("muscle_gain")).await;

    let first = app
        .create_plan(&token, json!([{ "name": "Push", "exercise_ids": [catalog["Bench Press"]] }]))
        .await;
    let second = app
        .create_plan(
            &token,
            json!([
                { "name": "Legs", "exercise_ids": [catalog["Back Squat"], catalog["Standing Calf Raise"]] },
                { "exercise_ids": [catalog["Pull-up"]], "is_optional": true }
            ]),
        )
        .await;

    assert_eq!(second["days"][1]["name"], "Training #2");
    assert_eq!(second["days"][1]["is_optional"], true);
    let squat = &second["days"][0]["exercises"][0];
    assert_eq!(squat["target_sets"], 5);
    assert_eq!(squat["target_reps_min"], 8);
    assert_eq!(squat["target_reps_max"], 12);
    let calves = &second["days"][0]["exercises"][1];
    assert_eq!(calves["target_sets"], 3);
    assert_eq!(calves["warmup_sets"], 1);

    let (status, plans) = app.get("/api/plans", &token).await;
    assert_eq!(status, StatusCode::OK);
    let active: Vec<&Value> = plans
        .as_array()
        .unwrap()
        .iter()
        .filter(|plan| plan["is_active"] == true)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], second["id"]);

    let (status, active_plan) = app.get("/api/plans/active", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active_plan["id"], second["id"]);

    let first_id = first["id"].as_str().unwrap();
    let (status, old) = app.get(&format!("/api/plans/{first_id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(old["is_active"], false);
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_plan_edit_recomputes_swapped_exercise() {
    let app = TestApp::new().await;
    let catalog = app.seed_exercises().await;
    let token = app.onboard("carol", "intermediate", None).await;

    let plan = app
        .create_plan(&token, json!([{ "exercise_ids": [catalog["Bench Press"]] }]))
        .await;
    let plan_id = plan["id"].as_str().unwrap();
    let plan_exercise_id = plan["days"][0]["exercises"][0]["id"].clone();
    assert_eq!(plan["days"][0]["exercises"][0]["target_sets"], 4);

    let (status, updated) = app
        .put(
            &format!("/api/plans/{plan_id}"),
            &token,
            json!({
                "name": "Core focus",
                "exercise_swaps": [{ "plan_exercise_id": plan_exercise_id, "exercise_id": catalog["Plank"] }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["name"], "Core focus");
    let swapped = &updated["days"][0]["exercises"][0];
    assert_eq!(swapped["exercise_name"], "Plank");
    assert_eq!(swapped["target_sets"], 3);
    assert_eq!(swapped["target_reps_max"], 20);
    assert_eq!(swapped["warmup_sets"], 0);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/plans/{plan_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let remaining = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM workout_plan_exercises")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_plan_creation_validation() {
    let app = TestApp::new().await;
    let catalog = app.seed_exercises().await;
    let token = app.register("dave").await;

    let (status, body) = app
        .post(
            "/api/plans",
            &token,
            json!({ "days": [{ "exercise_ids": [catalog["Bench Press"]] }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    app.put("/api/users/level", &token, json!({ "level": "beginner" }))
        .await;

    let (status, _) = app
        .post(
            "/api/plans",
            &token,
            json!({ "days": [{ "exercise_ids": [uuid::Uuid::new_v4()] }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/plans", &token, json!({ "days": [{ "exercise_ids": [] }] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/api/plans", &token, json!({ "days": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let eight_days: Vec<Value> = (0..8)
        .map(|_| json!({ "exercise_ids": [catalog["Plank"]] }))
        .collect();
    let (status, _) = app.post("/api/plans", &token, json!({ "days": eight_days })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/plans",
            &token,
            json!({ "name": "   ", "days": [{ "exercise_ids": [catalog["Plank"]] }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_retired_exercises_cannot_be_planned() {
    let app = TestApp::new().await;
    let catalog = app.seed_exercises().await;
    let token = app.onboard("erin", "intermediate", None).await;

    sqlx::query("UPDATE exercises SET is_active = FALSE WHERE id = $1")
        .bind(catalog["Pull-up"])
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, body) = app
        .post(
            "/api/plans",
            &token,
            json!({ "days": [{ "exercise_ids": [catalog["Bench Press"], catalog["Pull-up"]] }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("Unknown exercise"));

    let plan = app
        .create_plan(&token, json!([{ "exercise_ids": [catalog["Bench Press"]] }]))
        .await;
    let plan_exercise_id = plan["days"][0]["exercises"][0]["id"].clone();
    let (status, _) = app
        .put(
            &format!("/api/plans/{}", plan["id"].as_str().unwrap()),
            &token,
            json!({ "exercise_swaps": [{
                "plan_exercise_id": plan_exercise_id,
                "exercise_id": catalog["Pull-up"]
            }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_only_one_open_workout() {
    let app = TestApp::new().await;
    let catalog = app.seed_exercises().await;
    let token = app.onboard("erin", "beginner", None).await;

    let plan = app
        .create_plan(
            &token,
            json!([
                { "exercise_ids": [catalog["Bench Press"]] },
                { "exercise_ids": [catalog["Back Squat"]] }
            ]),
        )
        .await;
    let day_one = plan["days"][0]["id"].as_str().unwrap();
    let day_two = plan["days"][1]["id"].as_str().unwrap();

    let (status, _) = app
        .post(&format!("/api/workouts/start/{day_one}"), &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(&format!("/api/workouts/start/{day_two}"), &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, active) = app.get("/api/workouts/active", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["plan_day_id"], plan["days"][0]["id"]);
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_resources_are_private_to_their_owner() {
    let app = TestApp::new().await;
    let catalog = app.seed_exercises().await;
    let owner = app.onboard("frank", "beginner", None).await;
    let intruder = app.onboard("grace", "beginner", None).await;

    let plan = app
        .create_plan(&owner, json!([{ "exercise_ids": [catalog["Bench Press"]] }]))
        .await;
    let plan_id = plan["id"].as_str().unwrap();
    let day_id = plan["days"][0]["id"].as_str().unwrap();

    let (status, workout) = app
        .post(&format!("/api/workouts/start/{day_id}"), &owner, json!({}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let workout_id = workout["id"].as_str().unwrap();
    let set_id = sets_of(&workout, "Bench Press")[0]["id"].as_str().unwrap().to_string();

    let (status, body) = app.get(&format!("/api/plans/{plan_id}"), &intruder).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = app
        .post(&format!("/api/workouts/start/{day_id}"), &intruder, json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get(&format!("/api/workouts/{workout_id}"), &intruder).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put(&format!("/api/sets/{set_id}"), &intruder, json!({ "weight": 1.0, "reps": 1 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/sets/{set_id}"), Some(&intruder), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(&format!("/api/workouts/{workout_id}/finish"), &intruder, json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let missing = uuid::Uuid::new_v4();
    let (status, _) = app.get(&format!("/api/workouts/{missing}"), &owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_finished_workout_is_read_only() {
    let app = TestApp::new().await;
    let catalog = app.seed_exercises().await;
    let token = app.onboard("heidi", "intermediate", None).await;

    let plan = app
        .create_plan(&token, json!([{ "exercise_ids": [catalog["Pull-up"]] }]))
        .await;
    let day_id = plan["days"][0]["id"].as_str().unwrap();
    let (_, workout) = app
        .post(&format!("/api/workouts/start/{day_id}"), &token, json!({}))
        .await;
    let workout_id = workout["id"].as_str().unwrap();
    let sets = sets_of(&workout, "Pull-up");
    assert_eq!(sets.len(), 6);
    let set_id = sets[2]["id"].as_str().unwrap();

    let (status, body) = app
        .put(&format!("/api/sets/{set_id}"), &token, json!({ "weight": 10.0, "reps": 5, "rpe": 11 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/sets/{set_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Set deleted");

    let (status, _) = app
        .post(&format!("/api/workouts/{workout_id}/finish"), &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let remaining_set = sets[3]["id"].as_str().unwrap();
    let (status, body) = app
        .put(&format!("/api/sets/{remaining_set}"), &token, json!({ "weight": 10.0, "reps": 5 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/sets/{remaining_set}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post(&format!("/api/workouts/{workout_id}/finish"), &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, detail) = app.get(&format!("/api/workouts/{workout_id}"), &token).await;
    assert_eq!(sets_of(&detail, "Pull-up").len(), 5);
}
