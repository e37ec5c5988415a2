use serde::Deserialize;

use crate::models::common::serde_helpers::{
    deserialize_option_f64, deserialize_option_i64, deserialize_string_to_i64,
};

// 成绩查询
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeQuery {
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub student_id: Option<i64>,
}

// 单个学生的成绩录入
#[derive(Debug, Clone, Deserialize)]
pub struct GradeEntry {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub student_id: i64,
    pub grade_letter: String,
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub grade_point: Option<f64>,
    pub remarks: Option<String>,
}

// 批量录入成绩
#[derive(Debug, Clone, Deserialize)]
pub struct BatchGradeRequest {
    pub grades: Vec<GradeEntry>,
}

// 校验后写入存储的成绩
#[derive(Debug, Clone)]
pub struct GradeUpdate {
    pub student_id: i64,
    pub grade_letter: String,
    pub grade_point: f64,
    pub remarks: Option<String>,
}
