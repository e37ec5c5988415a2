mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;

use common::{PASSWORD, bearer, configure_api, create_user, send, session, session_with_expiry};
use rust_college_system::models::users::entities::UserType;
use rust_college_system::storage::Storage;

#[actix_web::test]
async fn test_protected_endpoints_reject_missing_or_bad_tokens() {
    let storage = common::storage().await;
    let student = create_user(&storage, "s1@college.edu", UserType::Student).await;
    let expired = session_with_expiry(&storage, student.id, chrono::Utc::now().timestamp() - 10).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    for uri in ["/api/courses", "/api/grades", "/api/notices", "/api/users/1"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "missing token on {uri}");

        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer("not-a-token"))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "bogus token on {uri}");

        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&expired))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "expired token on {uri}");
    }

    // 未认证的写请求不能产生数据
    let req = test::TestRequest::post()
        .uri("/api/courses")
        .set_json(json!({"code": "CS101", "name": "Intro", "credits": 3}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(storage.get_course_by_code("CS101").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_login_me_logout_flow() {
    let storage = common::storage().await;
    create_user(&storage, "faculty@college.edu", UserType::Faculty).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "faculty@college.edu", "password": "wrong-password"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "faculty@college.edu"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required parameters: password");

    // 邮箱大小写不敏感
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "Faculty@College.edu", "password": PASSWORD}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert!(body["data"]["user"].get("password_hash").is_none());

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "faculty@college.edu");

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_register_is_admin_only() {
    let storage = common::storage().await;
    let admin = create_user(&storage, "admin@college.edu", UserType::Admin).await;
    let faculty = create_user(&storage, "prof@college.edu", UserType::Faculty).await;
    let admin_token = session(&storage, admin.id).await;
    let faculty_token = session(&storage, faculty.id).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    let payload = json!({
        "full_name": "New Student",
        "email": "new@college.edu",
        "password": "Str0ngPass!",
        "user_type": "student"
    });

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(bearer(&faculty_token))
        .set_json(payload.clone())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(bearer(&admin_token))
        .set_json(payload.clone())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["user_type"], "student");

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(bearer(&admin_token))
        .set_json(payload)
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");
}

#[actix_web::test]
async fn test_health_and_unknown_actions() {
    let storage = common::storage().await;
    let admin = create_user(&storage, "admin@college.edu", UserType::Admin).await;
    let token = session(&storage, admin.id).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let req = test::TestRequest::get()
        .uri("/api/courses/1/unknown-action")
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let req = test::TestRequest::patch()
        .uri("/api/courses")
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
