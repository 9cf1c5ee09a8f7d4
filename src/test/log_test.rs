#[cfg(test)]
pub mod tests {
    use actix_web::{test, web, App, HttpResponse};

    use crate::middleware::access_log::AccessLog;
    use crate::utils::log::log_request;

    #[actix_rt::test]
    async fn test_log_request_format() {
        let req = test::TestRequest::post()
            .uri("/generate?model=flux-dev")
            .insert_header(("User-Agent", "curl/8.0"))
            .peer_addr("10.0.0.7:5123".parse().unwrap())
            .to_http_request();

        let line = log_request(&req, 200, None);
        assert!(line.starts_with("10.0.0.7 - - ["));
        assert!(line.contains("\"POST /generate?model=flux-dev HTTP/1.1\" 200 \"-\" \"curl/8.0\""));

        let line = log_request(&req, 500, Some("timeout"));
        assert!(line.ends_with("\"curl/8.0\" \"timeout\""));
    }

    #[actix_rt::test]
    async fn test_access_log_passes_responses_through() {
        let app = test::init_service(
            App::new()
                .wrap(AccessLog)
                .route("/ok", web::get().to(|| async { HttpResponse::Ok().body("fine") }))
                .route("/bad", web::get().to(|| async { HttpResponse::BadRequest().finish() }))
        ).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/ok").to_request()).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(test::read_body(resp).await, "fine");

        let resp = test::call_service(&app, test::TestRequest::get().uri("/bad").to_request()).await;
        assert_eq!(resp.status(), 400);
    }
}
