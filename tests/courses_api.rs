mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;

use common::{bearer, configure_api, create_user, id_of, send, session};
use rust_college_system::models::users::entities::UserType;
use rust_college_system::storage::Storage;

#[actix_web::test]
async fn test_course_creation_and_capacity() {
    let storage = common::storage().await;
    let faculty = create_user(&storage, "prof@college.edu", UserType::Faculty).await;
    let s1 = create_user(&storage, "s1@college.edu", UserType::Student).await;
    let s2 = create_user(&storage, "s2@college.edu", UserType::Student).await;
    let faculty_token = session(&storage, faculty.id).await;
    let s1_token = session(&storage, s1.id).await;
    let s2_token = session(&storage, s2.id).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    // 学生不能开课
    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(bearer(&s1_token))
        .set_json(json!({"code": "CS101", "name": "Intro", "credits": 3}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"code": "CS101", "name": "Intro"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required parameters: credits");

    // 数字字段接受字符串形式
    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"code": "CS101", "name": "Intro", "credits": "3", "max_students": 1}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["instructor_id"], faculty.id);
    let course_id = id_of(&body);

    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"code": "CS101", "name": "Duplicate", "credits": 2}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 超出 32 位范围的数值直接拒绝，不能被截断
    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({
            "code": "CS102",
            "name": "Overflow",
            "credits": 4294967299i64,
            "max_students": 4294967296i64
        }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(storage.get_course_by_code("CS102").await.unwrap().is_none());

    let req = test::TestRequest::put()
        .uri(&format!("/api/courses/{course_id}"))
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"max_students": 4294967296i64}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let course = storage.get_course_by_id(course_id).await.unwrap().unwrap();
    assert_eq!(course.max_students, 1);

    let enroll_uri = format!("/api/courses/{course_id}/enroll");
    let req = test::TestRequest::post()
        .uri(&enroll_uri)
        .insert_header(bearer(&s1_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&enroll_uri)
        .insert_header(bearer(&s1_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Student is already enrolled in this course");

    let req = test::TestRequest::post()
        .uri(&enroll_uri)
        .insert_header(bearer(&s2_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Course is full");

    // 未选课的学生看不到课程详情
    let req = test::TestRequest::get()
        .uri(&format!("/api/courses/{course_id}"))
        .insert_header(bearer(&s2_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/courses")
        .insert_header(bearer(&s1_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::delete()
        .uri(&enroll_uri)
        .insert_header(bearer(&s1_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&enroll_uri)
        .insert_header(bearer(&s1_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_course_delete_removes_dependents() {
    let storage = common::storage().await;
    let faculty = create_user(&storage, "prof@college.edu", UserType::Faculty).await;
    let student = create_user(&storage, "s1@college.edu", UserType::Student).await;
    let other_faculty = create_user(&storage, "other@college.edu", UserType::Faculty).await;
    let faculty_token = session(&storage, faculty.id).await;
    let student_token = session(&storage, student.id).await;
    let other_token = session(&storage, other_faculty.id).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"code": "MA201", "name": "Linear Algebra", "credits": 4}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let course_id = id_of(&body);

    let req = test::TestRequest::post()
        .uri(&format!("/api/courses/{course_id}/enroll"))
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"student_id": student.id}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/assignments")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({
            "course_id": course_id,
            "title": "Homework 1",
            "due_date": "2099-01-01",
            "total_marks": 100,
            "weightage": 20
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let assignment_id = id_of(&body);

    let req = test::TestRequest::post()
        .uri(&format!("/api/assignments/{assignment_id}/submit"))
        .insert_header(bearer(&student_token))
        .set_json(json!({"file_path": "/uploads/hw1.pdf"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/attendance/mark")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({
            "course_id": course_id,
            "date": "2025-03-01",
            "records": [{"student_id": student.id, "status": "present"}]
        }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/notices")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({
            "title": "Quiz",
            "content": "Quiz on Friday",
            "notice_type": "course",
            "course_id": course_id,
            "attachments": [{"file_name": "syllabus.pdf", "file_path": "/files/syllabus.pdf"}]
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let notice_id = id_of(&body);

    // 只有任课教师或管理员可以删除
    let req = test::TestRequest::delete()
        .uri(&format!("/api/courses/{course_id}"))
        .insert_header(bearer(&other_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/courses/{course_id}"))
        .insert_header(bearer(&faculty_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    assert!(storage.get_course_by_id(course_id).await.unwrap().is_none());
    assert!(storage.get_assignment_by_id(assignment_id).await.unwrap().is_none());
    assert!(storage.get_submission(assignment_id, student.id).await.unwrap().is_none());
    assert!(storage.get_enrollment(student.id, course_id).await.unwrap().is_none());
    assert!(storage.get_notice_by_id(notice_id).await.unwrap().is_none());
    assert!(storage.list_notice_attachments(notice_id).await.unwrap().is_empty());
    assert!(storage.list_enrolled_course_ids(student.id).await.unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/courses/{course_id}"))
        .insert_header(bearer(&faculty_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
