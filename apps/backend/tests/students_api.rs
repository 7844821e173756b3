mod common;

use actix_web::test;
use campus_backend::entities::students;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::json;

use common::{
    admin, assert_error_envelope, bearer, build_app, call_json, count_row, regular_user, student,
};

#[actix_web::test]
async fn test_create_student() {
    let caller = regular_user();
    let created = student("12345");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // auth guard account re-read
        .append_query_results([vec![caller.clone()]])
        // duplicate pre-check finds nothing
        .append_query_results([Vec::<students::Model>::new()])
        // insert returning
        .append_query_results([vec![created.clone()]])
        .into_connection();
    let app = build_app(db).await;

    let req = test::TestRequest::post()
        .uri("/students")
        .insert_header(bearer(&caller))
        .set_json(json!({
            "ra": created.ra,
            "cpf": created.cpf,
            "name": created.name,
            "email": created.email,
        }))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status.as_u16(), 201);
    assert_eq!(body["ra"], "12345");
    assert_eq!(body["name"], created.name);
}

#[actix_web::test]
async fn test_create_student_duplicate_ra() {
    let caller = regular_user();
    let existing = student("12345");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller.clone()]])
        .append_query_results([vec![existing.clone()]])
        .into_connection();
    let app = build_app(db).await;

    let req = test::TestRequest::post()
        .uri("/students")
        .insert_header(bearer(&caller))
        .set_json(json!({
            "ra": "12345",
            "cpf": "99999999999",
            "name": "Another Name",
            "email": "other@example.edu",
        }))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_error_envelope(
        status,
        &body,
        409,
        "/students",
        &["a student with RA '12345' already exists"],
    );
}

#[actix_web::test]
async fn test_create_student_duplicate_cpf() {
    let caller = regular_user();
    let existing = student("99999");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller.clone()]])
        .append_query_results([vec![existing.clone()]])
        .into_connection();
    let app = build_app(db).await;

    let req = test::TestRequest::post()
        .uri("/students")
        .insert_header(bearer(&caller))
        .set_json(json!({
            "ra": "12345",
            "cpf": existing.cpf,
            "name": "Another Name",
            "email": "other@example.edu",
        }))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status.as_u16(), 409);
    assert_eq!(
        body["errors"][0],
        format!("a student with CPF '{}' already exists", existing.cpf)
    );
}

#[actix_web::test]
async fn test_create_student_empty_fields() {
    let caller = regular_user();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller.clone()]])
        .into_connection();
    let app = build_app(db).await;

    let req = test::TestRequest::post()
        .uri("/students")
        .insert_header(bearer(&caller))
        .set_json(json!({ "ra": "", "cpf": "", "name": "x", "email": "x@y.z" }))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_error_envelope(
        status,
        &body,
        400,
        "/students",
        &[
            "the 'ra' field must not be empty",
            "the 'cpf' field must not be empty",
        ],
    );
}

#[actix_web::test]
async fn test_list_students_pagination_envelope() {
    let caller = regular_user();
    let page_rows: Vec<students::Model> =
        (1..=10).map(|n| student(&format!("{:05}", n))).collect();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller.clone()]])
        .append_query_results([vec![count_row(25)]])
        .append_query_results([page_rows])
        .into_connection();
    let app = build_app(db).await;

    let req = test::TestRequest::get()
        .uri("/students?page=1&limit=10")
        .insert_header(bearer(&caller))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status.as_u16(), 200);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["meta"]["totalItems"], 25);
    assert_eq!(body["meta"]["itemCount"], 10);
    assert_eq!(body["meta"]["itemsPerPage"], 10);
    assert_eq!(body["meta"]["totalPages"], 3);
    assert_eq!(body["meta"]["currentPage"], 1);
    assert_eq!(body["links"]["first"], "/students?limit=10");
    assert_eq!(body["links"]["previous"], "");
    assert_eq!(body["links"]["next"], "/students?page=2&limit=10");
    assert_eq!(body["links"]["last"], "/students?page=3&limit=10");
}

#[actix_web::test]
async fn test_list_students_requires_page_and_limit() {
    let caller = regular_user();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller.clone()]])
        .into_connection();
    let app = build_app(db).await;

    let req = test::TestRequest::get()
        .uri("/students")
        .insert_header(bearer(&caller))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_error_envelope(
        status,
        &body,
        400,
        "/students",
        &[
            "the 'page' parameter is required",
            "the 'limit' parameter is required",
        ],
    );
}

#[actix_web::test]
async fn test_list_students_rejects_zero_page() {
    let caller = regular_user();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller.clone()]])
        .into_connection();
    let app = build_app(db).await;

    let req = test::TestRequest::get()
        .uri("/students?page=0&limit=10")
        .insert_header(bearer(&caller))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_error_envelope(
        status,
        &body,
        400,
        "/students",
        &["the 'page' parameter must be an integer greater than or equal to 1"],
    );
}

#[actix_web::test]
async fn test_list_students_rejects_overflowing_page() {
    let caller = regular_user();
    // Only the auth guard's account re-read should reach the store.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller.clone()]])
        .into_connection();
    let app = build_app(db).await;

    let req = test::TestRequest::get()
        .uri("/students?page=18446744073709551615&limit=18446744073709551615")
        .insert_header(bearer(&caller))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_error_envelope(
        status,
        &body,
        400,
        "/students",
        &["the requested page is out of range"],
    );
}

#[actix_web::test]
async fn test_get_student_not_found() {
    let caller = regular_user();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller.clone()]])
        .append_query_results([Vec::<students::Model>::new()])
        .into_connection();
    let app = build_app(db).await;

    let req = test::TestRequest::get()
        .uri("/students/00000")
        .insert_header(bearer(&caller))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_error_envelope(
        status,
        &body,
        404,
        "/students/00000",
        &["requested resource not found"],
    );
}

#[actix_web::test]
async fn test_update_student() {
    let caller = regular_user();
    let existing = student("12345");
    let mut updated = existing.clone();
    updated.name = "Renamed".to_string();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller.clone()]])
        .append_query_results([vec![existing], vec![updated.clone()]])
        .into_connection();
    let app = build_app(db).await;

    let req = test::TestRequest::patch()
        .uri("/students/12345")
        .insert_header(bearer(&caller))
        .set_json(json!({ "name": "Renamed" }))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status.as_u16(), 200);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["ra"], "12345");
}

#[actix_web::test]
async fn test_delete_student() {
    let caller = admin();
    let existing = student("12345");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller.clone()]])
        .append_query_results([vec![existing]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let app = build_app(db).await;

    let req = test::TestRequest::delete()
        .uri("/students/12345")
        .insert_header(bearer(&caller))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 204);
}

#[actix_web::test]
async fn test_delete_missing_student_is_404() {
    let caller = admin();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller.clone()]])
        .append_query_results([Vec::<students::Model>::new()])
        .into_connection();
    let app = build_app(db).await;

    let req = test::TestRequest::delete()
        .uri("/students/00000")
        .insert_header(bearer(&caller))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status.as_u16(), 404);
    assert_eq!(body["errors"][0], "requested resource not found");
}
