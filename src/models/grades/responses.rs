use serde::Serialize;

use super::entities::{AssignmentScore, GpaSummary, GradeDistribution, GradeRow};
use crate::models::courses::entities::Course;

// 学生成绩列表
#[derive(Debug, Clone, Serialize)]
pub struct GradeListResponse {
    pub items: Vec<GradeRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<GpaSummary>,
}

// 课程成绩单
#[derive(Debug, Clone, Serialize)]
pub struct CourseGradeSheet {
    pub course: Course,
    pub students: Vec<GradeRow>,
    pub distribution: GradeDistribution,
}

// 作业得分明细
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentBreakdownResponse {
    pub course_id: i64,
    pub student_id: i64,
    pub items: Vec<AssignmentScore>,
    pub total_weighted: f64,
}

// 批量录入结果
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BatchGradeResponse {
    pub updated: u64,
    pub skipped: u64,
}
