use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use tower::ServiceExt;
use trivia_core::db::open_db_in_memory;
use trivia_server::{build_router, AppState};

fn app() -> Router {
    build_router(AppState::new(open_db_in_memory().unwrap()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create(app: &Router, question: &str, category: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/questions",
        Some(json!({
            "question": question,
            "answer": "answer",
            "difficulty": 2,
            "category": category,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["created"].as_i64().unwrap()
}

#[tokio::test]
async fn index_and_unknown_routes() {
    let app = app();
    let (status, _) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/books?page=1000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "resource not found");
}

#[tokio::test]
async fn categories_are_listed_by_id() {
    let app = app();
    let (status, body) = send(&app, "GET", "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"]["1"], "Science");
    assert_eq!(body["categories"]["4"], "History");
    assert_eq!(body["categories"].as_object().unwrap().len(), 6);
}

#[tokio::test]
async fn question_pages_and_out_of_range_page() {
    let app = app();
    for n in 1..=12 {
        create(&app, &format!("question {n}"), 1).await;
    }

    let (status, body) = send(&app, "GET", "/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"].as_array().unwrap().len(), 10);
    assert_eq!(body["totalQuestions"], 12);
    assert_eq!(body["questions"][0]["question"], "question 12");
    assert_eq!(body["categories"]["2"], "Art");
    assert!(body["currentCategory"].is_null());

    let (status, body) = send(&app, "GET", "/questions?page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, "GET", "/questions?page=1000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "resource not found");

    let (status, _) = send(&app, "GET", "/questions?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_store_lists_an_empty_first_page() {
    let app = app();
    let (status, body) = send(&app, "GET", "/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalQuestions"], 0);
    assert!(body["questions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_echoes_fields_and_accepts_numeric_strings() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/questions",
        Some(json!({
            "question": "What is my name?",
            "answer": "xavi",
            "difficulty": "10",
            "category": "4",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["question"]["question"], "What is my name?");
    assert_eq!(body["question"]["answer"], "xavi");
    assert_eq!(body["question"]["difficulty"], 10);
    assert_eq!(body["question"]["category"], 4);

    let id = body["created"].as_i64().unwrap();
    let (status, body) = send(&app, "GET", &format!("/questions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["id"], id);
}

#[tokio::test]
async fn create_rejects_bad_payloads_with_400() {
    let app = app();
    let payloads = [
        json!({"question": "q", "answer": "a", "difficulty": 1}),
        json!({"question": "  ", "answer": "a", "difficulty": 1, "category": 1}),
        json!({"question": "q", "answer": "a", "difficulty": 1, "category": 99}),
        json!({"question": "q", "answer": "a", "difficulty": "hard", "category": 1}),
    ];
    for payload in payloads {
        let (status, body) = send(&app, "POST", "/questions", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body["success"], false);
    }

    let (_, body) = send(&app, "GET", "/questions", None).await;
    assert_eq!(body["totalQuestions"], 0);
}

#[tokio::test]
async fn delete_removes_question_and_missing_id_is_422() {
    let app = app();
    let id = create(&app, "delete me", 3).await;

    let (status, body) = send(&app, "DELETE", &format!("/questions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], id);

    let (status, _) = send(&app, "GET", &format!("/questions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", &format!("/questions/{id}"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "unprocessable");

    let (status, _) = send(&app, "DELETE", "/questions/1000", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn search_matches_case_insensitively() {
    let app = app();
    create(&app, "What is the Title of this film?", 5).await;
    create(&app, "Which river is longest?", 3).await;

    let (status, body) = send(
        &app,
        "POST",
        "/questions/search",
        Some(json!({"searchTerm": "title"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalQuestions"], 1);
    assert_eq!(body["questions"][0]["category"], 5);

    let (_, body) = send(&app, "POST", "/questions/search", Some(json!({"searchTerm": ""}))).await;
    assert_eq!(body["totalQuestions"], 2);

    let (_, body) = send(
        &app,
        "POST",
        "/questions/search",
        Some(json!({"search_term": "nope"})),
    )
    .await;
    assert_eq!(body["totalQuestions"], 0);

    let (status, _) = send(&app, "POST", "/questions/search", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn category_questions_report_current_category() {
    let app = app();
    create(&app, "history one", 4).await;
    create(&app, "history two", 4).await;
    create(&app, "science one", 1).await;

    let (status, body) = send(&app, "GET", "/categories/4/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalQuestions"], 2);
    assert_eq!(body["currentCategory"], 4);

    let (status, body) = send(&app, "GET", "/categories/42/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalQuestions"], 0);
}

#[tokio::test]
async fn quiz_walks_unseen_questions_then_returns_null() {
    let app = app();
    let mut expected = BTreeSet::new();
    expected.insert(create(&app, "history one", 4).await);
    expected.insert(create(&app, "history two", 4).await);
    create(&app, "science one", 1).await;

    let mut previous: Vec<i64> = Vec::new();
    for _ in 0..2 {
        let (status, body) = send(
            &app,
            "POST",
            "/quizzes",
            Some(json!({
                "previous_questions": previous,
                "quiz_category": {"type": "History", "id": "4"},
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"]["category"], 4);
        let id = body["question"]["id"].as_i64().unwrap();
        assert!(!previous.contains(&id));
        previous.push(id);
    }
    assert_eq!(previous.iter().copied().collect::<BTreeSet<_>>(), expected);

    let (status, body) = send(
        &app,
        "POST",
        "/quizzes",
        Some(json!({
            "previousQuestions": previous,
            "quizCategory": {"type": "History", "id": 4},
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["question"].is_null());
}

#[tokio::test]
async fn quiz_click_type_means_any_category() {
    let app = app();
    let id = create(&app, "only question", 6).await;

    let (status, body) = send(
        &app,
        "POST",
        "/quizzes",
        Some(json!({"previous_questions": [], "quiz_category": {"type": "click", "id": 0}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["id"], id);

    let (status, _) = send(
        &app,
        "POST",
        "/quizzes",
        Some(json!({"quiz_category": {"type": "Sports"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
