use serde::{Deserialize, Serialize};

// 用户类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Student, // 学生
    Faculty, // 教师
    Admin,   // 管理员
}

impl UserType {
    pub const STUDENT: &'static str = "student";
    pub const FACULTY: &'static str = "faculty";
    pub const ADMIN: &'static str = "admin";

    pub fn all() -> &'static [UserType] {
        &[UserType::Student, UserType::Faculty, UserType::Admin]
    }

    pub fn is_admin(&self) -> bool {
        *self == UserType::Admin
    }

    pub fn is_faculty(&self) -> bool {
        *self == UserType::Faculty
    }

    pub fn is_student(&self) -> bool {
        *self == UserType::Student
    }
}

impl<'de> Deserialize<'de> for UserType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Student => write!(f, "{}", UserType::STUDENT),
            UserType::Faculty => write!(f, "{}", UserType::FACULTY),
            UserType::Admin => write!(f, "{}", UserType::ADMIN),
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserType::STUDENT => Ok(UserType::Student),
            UserType::FACULTY => Ok(UserType::Faculty),
            UserType::ADMIN => Ok(UserType::Admin),
            _ => Err(format!(
                "Invalid user_type '{s}'. Allowed: student, faculty, admin"
            )),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,   // 活跃
    Inactive, // 停用
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            _ => Err(format!("Invalid status '{s}'. Allowed: active, inactive")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub user_type: UserType,
    pub status: UserStatus,
    pub phone: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

// 学生档案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub user_id: i64,
    pub department_id: Option<i64>,
    pub roll_number: Option<String>,
    pub semester: Option<i32>,
    pub batch: Option<String>,
}

// 教师档案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyProfile {
    pub user_id: i64,
    pub department_id: Option<i64>,
    pub designation: Option<String>,
    pub specialization: Option<String>,
}

// 按用户类型区分的档案
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserProfile {
    Student(StudentProfile),
    Faculty(FacultyProfile),
}

impl UserProfile {
    pub fn department_id(&self) -> Option<i64> {
        match self {
            UserProfile::Student(p) => p.department_id,
            UserProfile::Faculty(p) => p.department_id,
        }
    }
}
