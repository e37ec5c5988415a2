use serde::Deserialize;

use crate::models::common::serde_helpers::{
    deserialize_option_f64, deserialize_option_i64, deserialize_string_to_f64,
    deserialize_string_to_i64,
};

// 作业列表查询
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentListQuery {
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub course_id: Option<i64>,
}

// 创建作业请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
    #[serde(deserialize_with = "deserialize_string_to_f64")]
    pub total_marks: f64,
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub weightage: Option<f64>,
}

// 更新作业请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub total_marks: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub weightage: Option<f64>,
}

impl UpdateAssignmentRequest {
    pub const FIELDS: &'static [&'static str] =
        &["title", "description", "due_date", "total_marks", "weightage"];
}

// 写入存储的新作业
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: i64,
    pub total_marks: f64,
    pub weightage: f64,
    pub created_by: i64,
}

// 写入存储的作业变更
#[derive(Debug, Clone, Default)]
pub struct AssignmentChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<i64>,
    pub total_marks: Option<f64>,
    pub weightage: Option<f64>,
}

// 提交作业
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAssignmentRequest {
    pub file_path: String,
    pub comments: Option<String>,
}

// 查询单个提交
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionQuery {
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub student_id: Option<i64>,
}

// 批改提交
#[derive(Debug, Clone, Deserialize)]
pub struct GradeSubmissionRequest {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub student_id: i64,
    #[serde(deserialize_with = "deserialize_string_to_f64")]
    pub score: f64,
    pub feedback: Option<String>,
}
