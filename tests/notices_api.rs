mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;

use common::{bearer, configure_api, create_user, id_of, send, session};
use rust_college_system::models::users::entities::UserType;
use rust_college_system::storage::Storage;

#[actix_web::test]
async fn test_reading_a_notice_twice_records_one_receipt() {
    let storage = common::storage().await;
    let admin = create_user(&storage, "admin@college.edu", UserType::Admin).await;
    let student = create_user(&storage, "s1@college.edu", UserType::Student).await;
    let admin_token = session(&storage, admin.id).await;
    let student_token = session(&storage, student.id).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/notices")
        .insert_header(bearer(&admin_token))
        .set_json(json!({
            "title": "Holiday",
            "content": "Campus closed on Monday",
            "notice_type": "general"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let notice_id = id_of(&body);

    let req = test::TestRequest::get()
        .uri("/api/notices/unread-count")
        .insert_header(bearer(&student_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["unread"], 1);

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri(&format!("/api/notices/{notice_id}"))
            .insert_header(bearer(&student_token))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["read_count"], 1);
    }
    assert_eq!(storage.count_notice_reads(notice_id).await.unwrap(), 1);

    let req = test::TestRequest::get()
        .uri("/api/notices")
        .insert_header(bearer(&student_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["is_read"], true);

    let req = test::TestRequest::get()
        .uri("/api/notices/unread-count")
        .insert_header(bearer(&student_token))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"]["unread"], 0);
}

#[actix_web::test]
async fn test_notice_audience_and_ownership() {
    let storage = common::storage().await;
    let faculty = create_user(&storage, "prof@college.edu", UserType::Faculty).await;
    let other_faculty = create_user(&storage, "other@college.edu", UserType::Faculty).await;
    let enrolled = create_user(&storage, "in@college.edu", UserType::Student).await;
    let outsider = create_user(&storage, "out@college.edu", UserType::Student).await;
    let faculty_token = session(&storage, faculty.id).await;
    let other_token = session(&storage, other_faculty.id).await;
    let enrolled_token = session(&storage, enrolled.id).await;
    let outsider_token = session(&storage, outsider.id).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"code": "EE101", "name": "Circuits", "credits": 3}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let course_id = id_of(&body);

    let req = test::TestRequest::post()
        .uri(&format!("/api/courses/{course_id}/enroll"))
        .insert_header(bearer(&enrolled_token))
        .to_request();
    send(&app, req).await;

    // 教师不能发布全校公告
    let req = test::TestRequest::post()
        .uri("/api/notices")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"title": "All", "content": "x", "notice_type": "general"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/notices")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"title": "Lab", "content": "Bring kits", "notice_type": "course"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "course_id is required for course notices");

    let req = test::TestRequest::post()
        .uri("/api/notices")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({
            "title": "Lab",
            "content": "Bring kits",
            "notice_type": "course",
            "course_id": course_id
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let notice_id = id_of(&body);

    let req = test::TestRequest::get()
        .uri(&format!("/api/notices/{notice_id}"))
        .insert_header(bearer(&enrolled_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/notices/{notice_id}"))
        .insert_header(bearer(&outsider_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/notices")
        .insert_header(bearer(&outsider_token))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert!(body["data"]["items"].as_array().unwrap().is_empty());

    let req = test::TestRequest::put()
        .uri(&format!("/api/notices/{notice_id}"))
        .insert_header(bearer(&other_token))
        .set_json(json!({"title": "Hijacked"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/notices/{notice_id}"))
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"notice_type": "general"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No updatable fields supplied");

    let req = test::TestRequest::put()
        .uri(&format!("/api/notices/{notice_id}"))
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"title": "Lab moved"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Lab moved");

    let req = test::TestRequest::put()
        .uri(&format!("/api/notices/{notice_id}"))
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"expiry_date": "2099-01-01"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let notice = storage.get_notice_by_id(notice_id).await.unwrap().unwrap();
    assert!(notice.expiry_date.is_some());

    // null 和空字符串都会清除过期时间
    for cleared in [json!(null), json!("")] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/notices/{notice_id}"))
            .insert_header(bearer(&faculty_token))
            .set_json(json!({"expiry_date": cleared}))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["expiry_date"].is_null());
        let notice = storage.get_notice_by_id(notice_id).await.unwrap().unwrap();
        assert!(notice.expiry_date.is_none());
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/api/notices/{notice_id}"))
        .insert_header(bearer(&faculty_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/notices/{notice_id}"))
        .insert_header(bearer(&faculty_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_departments_are_admin_managed() {
    let storage = common::storage().await;
    let admin = create_user(&storage, "admin@college.edu", UserType::Admin).await;
    let student = create_user(&storage, "s1@college.edu", UserType::Student).await;
    let admin_token = session(&storage, admin.id).await;
    let student_token = session(&storage, student.id).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/departments")
        .insert_header(bearer(&student_token))
        .set_json(json!({"code": "CSE", "name": "Computer Science"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/departments")
        .insert_header(bearer(&admin_token))
        .set_json(json!({"code": "CSE", "name": "Computer Science"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/departments")
        .insert_header(bearer(&admin_token))
        .set_json(json!({"code": "CSE", "name": "Again"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/departments")
        .insert_header(bearer(&student_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
