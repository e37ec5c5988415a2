use serde::Serialize;

// 课程
#[derive(Debug, Clone, Serialize)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub credits: i32,
    pub semester: Option<i32>,
    pub department_id: Option<i64>,
    pub instructor_id: Option<i64>,
    pub max_students: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Course {
    pub fn is_taught_by(&self, user_id: i64) -> bool {
        self.instructor_id == Some(user_id)
    }
}

// 选课记录，成绩列也存在这里
#[derive(Debug, Clone, Serialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub grade_point: Option<f64>,
    pub grade_letter: Option<String>,
    pub remarks: Option<String>,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课程资料
#[derive(Debug, Clone, Serialize)]
pub struct CourseMaterial {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub uploaded_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 课表时段，day_of_week 0 表示周一
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSlot {
    pub id: i64,
    pub course_id: i64,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}
