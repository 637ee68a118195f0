use actix_web::{web, HttpResponse, Responder};
use recipe_repo::HealthCheck;
use std::sync::Arc;
use tracing::warn;

#[get("/health")]
pub async fn health(health_check: web::Data<Arc<dyn HealthCheck>>) -> impl Responder {
    if health_check.check().await {
        HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
    } else {
        warn!("Health check failed");
        HttpResponse::ServiceUnavailable().json(serde_json::json!({"status": "unavailable"}))
    }
}

#[cfg(test)]
mod tests {
    use super::health;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::web::Data;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use recipe_repo::HealthCheck;
    use rstest::rstest;
    use std::sync::Arc;

    struct FixedHealth(bool);

    #[async_trait]
    impl HealthCheck for FixedHealth {
        async fn check(&self) -> bool {
            self.0
        }
    }

    #[rstest]
    #[case::healthy(true, StatusCode::OK)]
    #[case::unhealthy(false, StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn reports_repository_state(#[case] healthy: bool, #[case] expected: StatusCode) {
        let health_check: Arc<dyn HealthCheck> = Arc::new(FixedHealth(healthy));
        let app = App::new()
            .app_data(Data::new(health_check))
            .service(health);
        let service = test::init_service(app).await;

        let request = TestRequest::get().uri("/health").to_request();
        let response = test::call_service(&service, request).await;
        assert_eq!(response.status(), expected);
    }
}
