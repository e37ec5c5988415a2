use serde::Serialize;

use super::entities::AttendanceRecord;

// 批量记考勤结果
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MarkAttendanceResponse {
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
}

// 带学生姓名的考勤记录
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceView {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub student_name: String,
}

// 学生出勤统计
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSummaryRow {
    pub student_id: i64,
    pub full_name: String,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub total_dates: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSummaryResponse {
    pub course_id: i64,
    pub total_dates: u64,
    pub items: Vec<AttendanceSummaryRow>,
}
