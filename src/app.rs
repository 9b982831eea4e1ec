use std::net::SocketAddr;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::config::AppConfig;
use crate::state::AppState;
use crate::{ai, meals, medications, plan, weight};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1",
              Router::new()
                  .merge(meals::router())
                  .merge(medications::router())
                  .merge(plan::router())
                  .merge(ai::router())
                  .merge(weight::router())
                  .route("/health", get(|| async { "ok" }))
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::nutrition::fake::{FakeLookup, FakeResponse};
    use crate::nutrition::NutritionalInfo;

    fn app() -> Router {
        let lookup = FakeLookup::new().with(
            "Chicken Breast",
            FakeResponse::Resolve(NutritionalInfo::new(10.0, 5.0, 20.0, 2.0)),
        );
        build_app(AppState::fake(Arc::new(lookup)))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn create_salad(app: &Router) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/meals",
            Some(json!({
                "name": "Chicken Salad",
                "ingredients": [
                    { "name": "Chicken Breast", "amount": "150", "unit": "g" },
                    { "name": "Lettuce", "amount": "100", "unit": "g" }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health() {
        let resp = app()
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_meals_are_rejected() {
        let app = app();
        let (status, _) = send(&app, Method::POST, "/api/v1/meals", Some(json!({ "name": "Salad", "ingredients": [] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, Method::POST, "/api/v1/meals", Some(json!({ "name": "", "ingredients": [] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, meals) = send(&app, Method::GET, "/api/v1/meals", None).await;
        assert_eq!(meals, json!([]));
    }

    #[tokio::test]
    async fn meal_lifecycle() {
        let app = app();
        let id = create_salad(&app).await;

        let (status, meal) = send(&app, Method::GET, &format!("/api/v1/meals/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(meal["name"], "Chicken Salad");
        assert_eq!(meal["ingredients"][1]["unit"], "g");

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/meals/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &format!("/api/v1/meals/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn planning_and_summary() {
        let app = app();
        let id = create_salad(&app).await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/plan/2024-03-05/slots/lunch",
            Some(json!({ "meal_id": id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["replaced"], Value::Null);

        let (_, summary) = send(&app, Method::GET, "/api/v1/plan/2024-03-05/summary", None).await;
        assert_eq!(summary["loading"], true);
        assert_eq!(summary["meals"][0]["id"], id.as_str());

        // let the spawned lookup finish
        let mut summary = summary;
        for _ in 0..100 {
            if summary["loading"] == false {
                break;
            }
            tokio::task::yield_now().await;
            summary = send(&app, Method::GET, "/api/v1/plan/2024-03-05/summary", None).await.1;
        }
        assert_eq!(summary["loading"], false);
        assert_eq!(
            summary["totals"],
            json!({ "protein": 10.0, "fat": 5.0, "carbs": 20.0, "sugar": 2.0 })
        );

        let (_, day) = send(&app, Method::GET, "/api/v1/plan/2024-03-05", None).await;
        assert_eq!(day["meals"][0]["slot"], "Lunch");
        assert_eq!(day["meals"][0]["nutrition"]["state"], "resolved");

        let (_, days) = send(&app, Method::GET, "/api/v1/plan?month=2024-03", None).await;
        assert_eq!(days, json!({ "month": "2024-03", "days": ["2024-03-05"] }));
    }

    #[tokio::test]
    async fn empty_day_summary() {
        let app = app();
        let (status, summary) = send(&app, Method::GET, "/api/v1/plan/2024-03-06/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary, json!({ "meals": [], "totals": null, "loading": false }));
    }

    #[tokio::test]
    async fn plan_rejects_unknown_meals_and_bad_input() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/v1/plan/2024-03-05/slots/Dinner",
            Some(json!({ "meal_id": "m-missing" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/api/v1/plan/2024-13-40/summary", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, Method::GET, "/api/v1/plan?month=March", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, Method::DELETE, "/api/v1/plan/2024-03-05/slots/Snack", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn articles_without_ai_are_null() {
        let app = app();
        let id = create_salad(&app).await;
        send(&app, Method::PUT, "/api/v1/plan/2024-03-05/slots/Lunch", Some(json!({ "meal_id": id }))).await;
        let (status, body) = send(&app, Method::GET, "/api/v1/plan/2024-03-05/articles", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn weight_is_recorded_for_today() {
        let app = app();
        let (status, entry) = send(&app, Method::POST, "/api/v1/weight", Some(json!({ "value": 80, "unit": "kg" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(entry["weight"], 176.4);
        assert_eq!(entry["bmi"], 25.2);

        let (status, _) = send(&app, Method::POST, "/api/v1/weight", Some(json!({ "value": -1 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, entries) = send(&app, Method::GET, "/api/v1/weight?range=1M", None).await;
        assert_eq!(entries.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn medication_list_lifecycle() {
        let app = app();
        let (status, med) = send(
            &app,
            Method::POST,
            "/api/v1/medications",
            Some(json!({ "name": "Metformin", "description": "Lowers blood glucose.", "category": "Pharmaceutical" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(med["dosage"], "");
        assert_eq!(med["measurement"], "mg");
        assert_eq!(med["route"], "oral");
        let id = med["id"].as_str().unwrap().to_string();

        let (status, med) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/medications/{id}"),
            Some(json!({ "dosage": "500" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(med["dosage"], "500");
        assert_eq!(med["category"], "Pharmaceutical");

        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/medications/{id}"),
            Some(json!({ "name": " " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, list) = send(&app, Method::GET, "/api/v1/medications", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/medications/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &format!("/api/v1/medications/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/medications/{id}"),
            Some(json!({ "dosage": "1" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_medication_is_rejected() {
        let app = app();
        let (status, _) = send(&app, Method::POST, "/api/v1/medications", Some(json!({ "name": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn medication_search_and_articles_without_ai_are_empty() {
        let app = app();
        let (status, found) = send(&app, Method::GET, "/api/v1/search/medications?q=metformin", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, json!([]));
        let (status, articles) = send(&app, Method::GET, "/api/v1/articles?topics=Nutrition,Fitness", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(articles, json!([]));
    }

    #[tokio::test]
    async fn search_requires_a_query() {
        let app = app();
        let (status, _) = send(&app, Method::POST, "/api/v1/search", Some(json!({ "query": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, body) = send(&app, Method::POST, "/api/v1/search", Some(json!({ "query": "creatine" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
        let (_, names) = send(&app, Method::GET, "/api/v1/ingredients/search?q=chick", None).await;
        assert_eq!(names, json!([]));
    }
}
