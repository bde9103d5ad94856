use axum::{
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, routes};

pub fn create(app_state: AppState, app_url: &str) -> Router<()> {
    let identity: HeaderName = app_state.identity_header.0.clone();
    let app_origin = HeaderValue::from_str(app_url).ok();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, identity])
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            app_origin.as_ref().is_some_and(|allowed| allowed == origin)
        }));

    Router::new()
        .nest("/health", routes::health::router())
        .nest("/users", routes::users::router())
        .nest("/expense-categories", routes::categories::router())
        .nest("/budgets", routes::budgets::router())
        .nest("/expenses", routes::expenses::router())
        .nest("/emis", routes::emis::router())
        .nest("/investments", routes::investments::router())
        .nest("/financial-overview", routes::overview::router())
        .nest("/projects", routes::projects::router())
        .nest("/project-tasks", routes::project_tasks::router())
        .nest("/habits", routes::habits::router())
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use time::macros::date;
    use tower::ServiceExt;

    use super::*;
    use crate::factory::in_memory_app_state;

    fn app() -> Router {
        create(in_memory_app_state(date!(2024 - 03 - 15)), "http://localhost:5173")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, user: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, user: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("x-user-id", user)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_identity() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["health"]["status"], "ok");
    }

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        let response = app()
            .oneshot(post("/expense-categories", None, json!({ "name": "Food" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["statusCode"], 401);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["error"]["message"], "Not authenticated");
    }

    #[tokio::test]
    async fn create_returns_created_envelope() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post(
                "/budgets",
                Some("1"),
                json!({
                    "categoryName": "Food",
                    "budgetedAmount": 500,
                    "startDate": "2024-03-01",
                    "endDate": "2024-03-31"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["statusCode"], 201);
        assert_eq!(body["error"], Value::Null);
        assert_eq!(body["data"]["budget"]["spentAmount"], 0.0);
        assert_eq!(body["data"]["budget"]["remainingAmount"], 500.0);

        let response = app
            .clone()
            .oneshot(post(
                "/expenses",
                Some("1"),
                json!({
                    "amount": 120,
                    "date": "2024-03-10",
                    "category": "Food",
                    "paymentMethod": "UPI"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.oneshot(get("/budgets", "1")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["budgets"][0]["spentAmount"], 120.0);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let response = app()
            .oneshot(post(
                "/expenses",
                Some("1"),
                json!({ "amount": 10, "category": "Food", "paymentMethod": "Cheque" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn unknown_resource_is_not_found() {
        let response = app().oneshot(get("/habits/42", "1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["statusCode"], 404);
    }

    #[tokio::test]
    async fn invalid_overview_range_is_rejected() {
        let response = app()
            .oneshot(get("/financial-overview?range=hourly", "1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn overview_at_calendar_edge_is_bad_request() {
        let response = app()
            .oneshot(get("/financial-overview?range=weekly&date=9999-12-31", "1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Date out of range");
    }
}
