use serde::Serialize;

// 考勤状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::Absent => write!(f, "absent"),
            AttendanceStatus::Late => write!(f, "late"),
        }
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "late" => Ok(AttendanceStatus::Late),
            _ => Err(format!(
                "Invalid attendance status '{s}'. Allowed: present, absent, late"
            )),
        }
    }
}

// 考勤记录
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub date: String,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
    pub recorded_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 出勤率：迟到计为出勤，分母为课程已记录的不同日期数，保留两位小数
pub fn attendance_percentage(present: u64, late: u64, total_dates: u64) -> f64 {
    if total_dates == 0 {
        return 0.0;
    }
    let pct = (present + late) as f64 / total_dates as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(attendance_percentage(2, 0, 3), 66.67);
        assert_eq!(attendance_percentage(1, 1, 4), 50.0);
        assert_eq!(attendance_percentage(3, 0, 3), 100.0);
    }

    #[test]
    fn test_percentage_without_dates() {
        assert_eq!(attendance_percentage(0, 0, 0), 0.0);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("late".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Late));
        assert!("excused".parse::<AttendanceStatus>().is_err());
    }
}
