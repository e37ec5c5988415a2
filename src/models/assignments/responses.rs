use serde::Serialize;

use super::entities::{Assignment, Submission};

// 列表/详情中的作业，学生会附带自己的提交
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentView {
    #[serde(flatten)]
    pub assignment: Assignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_submission: Option<Submission>,
}

// 带学生信息的提交
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionWithStudent {
    #[serde(flatten)]
    pub submission: Submission,
    pub student_name: String,
    pub student_email: String,
}

// 提交结果，resubmitted 表示覆盖了已有提交
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub submission: Submission,
    pub resubmitted: bool,
}
