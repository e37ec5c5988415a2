mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;

use common::{bearer, configure_api, create_user, id_of, send, session};
use rust_college_system::models::assignments::entities::SubmissionStatus;
use rust_college_system::models::users::entities::UserType;
use rust_college_system::storage::Storage;

#[actix_web::test]
async fn test_resubmission_and_grading() {
    let storage = common::storage().await;
    let faculty = create_user(&storage, "prof@college.edu", UserType::Faculty).await;
    let student = create_user(&storage, "s1@college.edu", UserType::Student).await;
    let faculty_token = session(&storage, faculty.id).await;
    let student_token = session(&storage, student.id).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"code": "CS201", "name": "Data Structures", "credits": 4}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let course_id = id_of(&body);

    let req = test::TestRequest::post()
        .uri("/api/assignments")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({
            "course_id": course_id,
            "title": "Linked lists",
            "due_date": "2099-06-30T12:00:00Z",
            "total_marks": 50
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let assignment_id = id_of(&body);
    let submit_uri = format!("/api/assignments/{assignment_id}/submit");

    // 未选课不能提交
    let req = test::TestRequest::post()
        .uri(&submit_uri)
        .insert_header(bearer(&student_token))
        .set_json(json!({"file_path": "/uploads/v1.zip"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/api/courses/{course_id}/enroll"))
        .insert_header(bearer(&student_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&submit_uri)
        .insert_header(bearer(&student_token))
        .set_json(json!({"file_path": "/uploads/v1.zip"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["submission"]["status"], "submitted");
    assert_eq!(body["data"]["resubmitted"], false);

    let req = test::TestRequest::post()
        .uri(&submit_uri)
        .insert_header(bearer(&student_token))
        .set_json(json!({"file_path": "/uploads/v2.zip", "comments": "fixed a bug"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["resubmitted"], true);

    let req = test::TestRequest::get()
        .uri(&format!("/api/assignments/{assignment_id}/submissions"))
        .insert_header(bearer(&faculty_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let submissions = body["data"].as_array().unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0]["file_path"], "/uploads/v2.zip");

    // 越界分数被拒绝，原状态保持不变
    let grade_uri = format!("/api/assignments/{assignment_id}/grade");
    for score in [-1.0, 50.5] {
        let req = test::TestRequest::post()
            .uri(&grade_uri)
            .insert_header(bearer(&faculty_token))
            .set_json(json!({"student_id": student.id, "score": score}))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    let untouched = storage
        .get_submission(assignment_id, student.id)
        .await
        .unwrap()
        .unwrap();
    assert!(untouched.score.is_none());
    assert!(untouched.graded_by.is_none());

    let req = test::TestRequest::post()
        .uri(&grade_uri)
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"student_id": student.id, "score": "42.5", "feedback": "Good"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["score"], 42.5);
    assert_eq!(body["data"]["status"], "graded");

    // 已批改的提交再给越界分数，原批改结果不变
    let graded = storage
        .get_submission(assignment_id, student.id)
        .await
        .unwrap()
        .unwrap();
    for score in [60.0, -1.0] {
        let req = test::TestRequest::post()
            .uri(&grade_uri)
            .insert_header(bearer(&faculty_token))
            .set_json(json!({"student_id": student.id, "score": score, "feedback": "Redo"}))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    let after = storage
        .get_submission(assignment_id, student.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.score, Some(42.5));
    assert_eq!(after.graded_by, Some(faculty.id));
    assert_eq!(after.graded_at, graded.graded_at);
    assert_eq!(after.status, SubmissionStatus::Graded);
    assert_eq!(after.feedback.as_deref(), Some("Good"));

    let req = test::TestRequest::get()
        .uri(&format!("/api/assignments/{assignment_id}/submission"))
        .insert_header(bearer(&student_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["feedback"], "Good");
}

#[actix_web::test]
async fn test_gpa_weights_credits_and_skips_ungraded() {
    let storage = common::storage().await;
    let faculty = create_user(&storage, "prof@college.edu", UserType::Faculty).await;
    let student = create_user(&storage, "s1@college.edu", UserType::Student).await;
    let faculty_token = session(&storage, faculty.id).await;
    let student_token = session(&storage, student.id).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    let mut course_ids = Vec::new();
    for (code, credits) in [("PH101", 3), ("CH101", 4), ("EN101", 2)] {
        let req = test::TestRequest::post()
            .uri("/api/courses")
            .insert_header(bearer(&faculty_token))
            .set_json(json!({"code": code, "name": code, "credits": credits}))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        let course_id = id_of(&body);

        let req = test::TestRequest::post()
            .uri(&format!("/api/courses/{course_id}/enroll"))
            .insert_header(bearer(&faculty_token))
            .set_json(json!({"student_id": student.id}))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        course_ids.push(course_id);
    }

    for (course_id, letter) in [(course_ids[0], "A"), (course_ids[1], "b")] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/grades/{course_id}"))
            .insert_header(bearer(&faculty_token))
            .set_json(json!({"grades": [{"student_id": student.id, "grade_letter": letter}]}))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["updated"], 1);
    }

    let req = test::TestRequest::get()
        .uri("/api/grades/gpa")
        .insert_header(bearer(&student_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["gpa"], 3.43);
    assert_eq!(body["data"]["total_credits"], 7);
    assert_eq!(body["data"]["graded_courses"], 2);

    let req = test::TestRequest::get()
        .uri("/api/grades")
        .insert_header(bearer(&student_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["gpa"]["gpa"], 3.43);

    // 另一位教师只看到自己课程的成绩行，但 GPA 覆盖学生的全部课程
    let other = create_user(&storage, "other@college.edu", UserType::Faculty).await;
    let other_token = session(&storage, other.id).await;
    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(bearer(&other_token))
        .set_json(json!({"code": "BI101", "name": "Biology", "credits": 2}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let bio_id = id_of(&body);

    let req = test::TestRequest::post()
        .uri(&format!("/api/courses/{bio_id}/enroll"))
        .insert_header(bearer(&other_token))
        .set_json(json!({"student_id": student.id}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&format!("/api/grades/{bio_id}"))
        .insert_header(bearer(&other_token))
        .set_json(json!({"grades": [{"student_id": student.id, "grade_letter": "C"}]}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/grades?student_id={}", student.id))
        .insert_header(bearer(&other_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    // (3×4.0 + 4×3.0 + 2×2.0) / 9
    assert_eq!(body["data"]["gpa"]["gpa"], 3.11);
    assert_eq!(body["data"]["gpa"]["total_credits"], 9);
}

#[actix_web::test]
async fn test_attendance_skips_students_not_enrolled() {
    let storage = common::storage().await;
    let faculty = create_user(&storage, "prof@college.edu", UserType::Faculty).await;
    let enrolled = create_user(&storage, "in@college.edu", UserType::Student).await;
    let outsider = create_user(&storage, "out@college.edu", UserType::Student).await;
    let faculty_token = session(&storage, faculty.id).await;
    let enrolled_token = session(&storage, enrolled.id).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({"code": "BI101", "name": "Biology", "credits": 3}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let course_id = id_of(&body);

    let req = test::TestRequest::post()
        .uri(&format!("/api/courses/{course_id}/enroll"))
        .insert_header(bearer(&enrolled_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/attendance/mark")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({
            "course_id": course_id,
            "date": "2025-02-10",
            "records": [
                {"student_id": outsider.id, "status": "present"},
                {"student_id": enrolled.id, "status": "late"}
            ]
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["inserted"], 1);
    assert_eq!(body["data"]["skipped"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/attendance?course_id={course_id}"))
        .insert_header(bearer(&faculty_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["student_id"], enrolled.id);

    // 迟到计入出勤
    let req = test::TestRequest::get()
        .uri(&format!("/api/attendance/summary?course_id={course_id}"))
        .insert_header(bearer(&enrolled_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["percentage"], 100.0);

    let req = test::TestRequest::post()
        .uri("/api/attendance/mark")
        .insert_header(bearer(&faculty_token))
        .set_json(json!({
            "course_id": course_id,
            "date": "2025-02-10",
            "records": [{"student_id": enrolled.id, "status": "tardy"}]
        }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_students_cannot_read_each_others_records() {
    let storage = common::storage().await;
    let admin = create_user(&storage, "admin@college.edu", UserType::Admin).await;
    let s1 = create_user(&storage, "s1@college.edu", UserType::Student).await;
    let s2 = create_user(&storage, "s2@college.edu", UserType::Student).await;
    let admin_token = session(&storage, admin.id).await;
    let s2_token = session(&storage, s2.id).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(configure_api),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(bearer(&admin_token))
        .set_json(json!({"code": "HI101", "name": "History", "credits": 2}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let course_id = id_of(&body);

    let req = test::TestRequest::post()
        .uri("/api/assignments")
        .insert_header(bearer(&admin_token))
        .set_json(json!({
            "course_id": course_id,
            "title": "Essay",
            "due_date": "2099-01-01",
            "total_marks": 10
        }))
        .to_request();
    let (_, body) = send(&app, req).await;
    let assignment_id = id_of(&body);

    let uris = [
        format!("/api/grades?student_id={}", s1.id),
        format!("/api/grades/gpa?student_id={}", s1.id),
        format!("/api/attendance/summary?course_id={course_id}&student_id={}", s1.id),
        format!("/api/attendance?course_id={course_id}&student_id={}", s1.id),
        format!("/api/assignments/{assignment_id}/submission?student_id={}", s1.id),
        format!("/api/users/{}", s1.id),
    ];

    for uri in &uris {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&s2_token))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "student access to {uri}");
    }

    // 管理员可以读取，提交不存在时为 404
    for uri in &uris[..4] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&admin_token))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK, "admin access to {uri}");
    }
    let req = test::TestRequest::get()
        .uri(&uris[5])
        .insert_header(bearer(&admin_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
}
