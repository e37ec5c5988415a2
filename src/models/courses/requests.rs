use serde::Deserialize;

use crate::models::common::serde_helpers::{
    deserialize_option_i32, deserialize_option_i64, deserialize_string_to_i32,
};

/// 未指定容量时的默认值
pub const DEFAULT_MAX_STUDENTS: i32 = 60;

// 课程列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseListQuery {
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub size: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub department_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_i32")]
    pub semester: Option<i32>,
    pub search: Option<String>,
}

// 课程可见范围
#[derive(Debug, Clone, Copy)]
pub enum CourseScope {
    All,
    TaughtBy(i64),
    EnrolledBy(i64),
}

// 创建课程请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_string_to_i32")]
    pub credits: i32,
    #[serde(default, deserialize_with = "deserialize_option_i32")]
    pub semester: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub department_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub instructor_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_i32")]
    pub max_students: Option<i32>,
}

// 更新课程请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_i32")]
    pub credits: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_option_i32")]
    pub semester: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub department_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_i32")]
    pub max_students: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub instructor_id: Option<i64>,
}

impl UpdateCourseRequest {
    pub const OWNER_FIELDS: &'static [&'static str] = &[
        "name",
        "description",
        "credits",
        "semester",
        "department_id",
        "max_students",
    ];

    pub const ADMIN_FIELDS: &'static [&'static str] = &[
        "name",
        "description",
        "credits",
        "semester",
        "department_id",
        "max_students",
        "instructor_id",
    ];
}

// 选课/退课请求，学生本人操作时不需要 student_id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollRequest {
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub student_id: Option<i64>,
}

// 添加课程资料
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaterialRequest {
    pub title: String,
    pub description: Option<String>,
    pub file_path: Option<String>,
}

// 添加课表时段
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScheduleRequest {
    #[serde(deserialize_with = "deserialize_string_to_i32")]
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}
