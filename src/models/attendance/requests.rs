use serde::Deserialize;

use crate::models::common::serde_helpers::{deserialize_option_i64, deserialize_string_to_i64};

// 单条考勤输入
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceEntry {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub student_id: i64,
    pub status: String,
    pub remarks: Option<String>,
}

// 批量记考勤
#[derive(Debug, Clone, Deserialize)]
pub struct MarkAttendanceRequest {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub course_id: i64,
    pub date: String,
    pub records: Vec<AttendanceEntry>,
}

// 考勤查询
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceQuery {
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub course_id: Option<i64>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub student_id: Option<i64>,
}

// 修改单条考勤
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAttendanceRequest {
    pub status: Option<String>,
    pub remarks: Option<String>,
}

impl UpdateAttendanceRequest {
    pub const FIELDS: &'static [&'static str] = &["status", "remarks"];
}
