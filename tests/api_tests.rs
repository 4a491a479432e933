mod common;

#[cfg(test)]
mod api_tests {
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::{json, Value};
    use uuid::Uuid;

    use procurement_server::configure_api;
    use procurement_server::procurement::ProcurementRequest;

    use crate::common::{bearer, sample_request, test_state, ADMIN_TOKEN, END_USER_TOKEN};

    macro_rules! app {
        ($dir:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(test_state($dir)))
                    .configure(configure_api),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_statuses_are_public() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());

        let req = test::TestRequest::get()
            .uri("/api/procurement/statuses")
            .to_request();
        let body: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            vec!["Pending", "Approved", "Rejected", "In Progress", "Completed"]
        );
    }

    #[actix_web::test]
    async fn test_missing_session_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());

        let req = test::TestRequest::get().uri("/api/procurement").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["redirect"], "/");
    }

    #[actix_web::test]
    async fn test_admins_are_sent_to_admin_area() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());

        let req = test::TestRequest::get()
            .uri("/api/procurement")
            .insert_header(bearer(ADMIN_TOKEN))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["redirect"], "/admn");
    }

    #[actix_web::test]
    async fn test_landing_decision() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());

        let req = test::TestRequest::get()
            .uri("/api/session/landing")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["redirect"], Value::Null);

        let req = test::TestRequest::get()
            .uri("/api/session/landing")
            .insert_header(bearer(ADMIN_TOKEN))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["redirect"], "/admn");
    }

    #[actix_web::test]
    async fn test_new_request_template() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());

        let req = test::TestRequest::get()
            .uri("/api/procurement/new")
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let body: ProcurementRequest = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.items.len(), 1);
        assert!(body.request_number.is_empty());
    }

    #[actix_web::test]
    async fn test_save_creates_then_updates() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());
        let record = sample_request("PR-2026-001");

        let req = test::TestRequest::post()
            .uri("/api/procurement")
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(&record)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/procurement")
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(&record)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/procurement")
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let list: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["requestNumber"], "PR-2026-001");
        assert_eq!(list[0]["grandTotal"], 350.0);
        assert_eq!(list[0]["status"], "Pending");
    }

    #[actix_web::test]
    async fn test_save_without_items_keeps_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());
        let mut record = sample_request("PR-2026-009");
        record.items.clear();

        let req = test::TestRequest::post()
            .uri("/api/procurement")
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(&record)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let saved: ProcurementRequest = test::read_body_json(resp).await;
        assert_eq!(saved.items.len(), 1);

        let req = test::TestRequest::get()
            .uri(&format!("/api/procurement/{}", record.id))
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let stored: ProcurementRequest = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stored.items.len(), 1);
    }

    #[actix_web::test]
    async fn test_save_without_request_number_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());

        let req = test::TestRequest::post()
            .uri("/api/procurement")
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(&sample_request("  "))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "PR Number is required.");

        let req = test::TestRequest::get()
            .uri("/api/procurement")
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let list: Value = test::call_and_read_body_json(&app, req).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_request_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());

        let req = test::TestRequest::get()
            .uri(&format!("/api/procurement/{}", Uuid::new_v4()))
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_patch_header_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());
        let record = sample_request("PR-2026-002");

        let req = test::TestRequest::post()
            .uri("/api/procurement")
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(&record)
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/procurement/{}", record.id))
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(json!({ "office": "Budget Office", "status": "In Progress" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["office"], "Budget Office");
        assert_eq!(body["status"], "In Progress");
        assert_eq!(body["requestNumber"], "PR-2026-002");

        let req = test::TestRequest::patch()
            .uri(&format!("/api/procurement/{}", record.id))
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(json!({ "requestNumber": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri(&format!("/api/procurement/{}", record.id))
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let stored: ProcurementRequest = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stored.request_number, "PR-2026-002");
    }

    #[actix_web::test]
    async fn test_line_item_operations() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());
        let record = sample_request("PR-2026-003");
        let first = record.items[0].id;
        let second = record.items[1].id;

        let req = test::TestRequest::post()
            .uri("/api/procurement")
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(&record)
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/procurement/{}/items", record.id))
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let body: ProcurementRequest = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.items.len(), 3);
        let added = body.items[2].id;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/procurement/{}/items/{}", record.id, added))
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(json!({ "description": "Stapler", "quantity": "4", "unitCost": "75" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["items"][2]["description"], "Stapler");
        assert_eq!(body["items"][2]["quantity"], "4");

        for id in [first, second, added] {
            let req = test::TestRequest::delete()
                .uri(&format!("/api/procurement/{}/items/{}", record.id, id))
                .insert_header(bearer(END_USER_TOKEN))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/procurement/{}", record.id))
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let stored: ProcurementRequest = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].id, added);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/procurement/{}/items/{}", record.id, Uuid::new_v4()))
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(json!({ "unit": "box" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_exports() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());
        let record = sample_request("PR-2026-004");

        let req = test::TestRequest::post()
            .uri("/api/procurement")
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(&record)
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/procurement/{}/preview", record.id))
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.starts_with("<div class=\"pr-preview\""));
        assert!(html.contains("350.00"));

        let req = test::TestRequest::get()
            .uri(&format!("/api/procurement/{}/print", record.id))
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-disposition").unwrap(),
            "inline; filename=\"PR_PR-2026-004.html\""
        );

        let req = test::TestRequest::post()
            .uri(&format!("/api/procurement/{}/print", record.id))
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["outcome"], "downloaded");
        assert_eq!(body["location"], "PR_PR-2026-004.html");
        assert!(dir.path().join("PR_PR-2026-004.html").exists());
    }

    #[cfg(feature = "xlsx")]
    #[actix_web::test]
    async fn test_xlsx_export() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());
        let record = sample_request("PR-2026-005");

        let req = test::TestRequest::post()
            .uri("/api/procurement")
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(&record)
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/procurement/{}/xlsx", record.id))
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-disposition").unwrap(),
            "attachment; filename=\"PR_PR-2026-005.xlsx\""
        );
        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"PK"));
    }

    #[cfg(not(feature = "xlsx"))]
    #[actix_web::test]
    async fn test_xlsx_export_without_writer() {
        let dir = tempfile::tempdir().unwrap();
        let app = app!(dir.path());
        let record = sample_request("PR-2026-005");

        let req = test::TestRequest::post()
            .uri("/api/procurement")
            .insert_header(bearer(END_USER_TOKEN))
            .set_json(&record)
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/procurement/{}/xlsx", record.id))
            .insert_header(bearer(END_USER_TOKEN))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "XLSX library not loaded.");
    }
}
