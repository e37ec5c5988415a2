use serde::Serialize;

use super::entities::{Course, ScheduleSlot};
use crate::models::PaginationInfo;

// 列表中的课程，附带已选人数
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    #[serde(flatten)]
    pub course: Course,
    pub enrolled_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseListResponse {
    pub items: Vec<CourseSummary>,
    pub pagination: PaginationInfo,
}

// 课程详情
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub instructor_name: Option<String>,
    pub enrolled_count: u64,
    pub schedule: Vec<ScheduleSlot>,
}

// 课程中的学生及其成绩列
#[derive(Debug, Clone, Serialize)]
pub struct CourseStudent {
    pub student_id: i64,
    pub full_name: String,
    pub email: String,
    pub roll_number: Option<String>,
    pub grade_point: Option<f64>,
    pub grade_letter: Option<String>,
    pub remarks: Option<String>,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
