use serde::Serialize;

// 公告类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeType {
    General,
    Course,
    Department,
}

impl std::fmt::Display for NoticeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeType::General => write!(f, "general"),
            NoticeType::Course => write!(f, "course"),
            NoticeType::Department => write!(f, "department"),
        }
    }
}

impl std::str::FromStr for NoticeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(NoticeType::General),
            "course" => Ok(NoticeType::Course),
            "department" => Ok(NoticeType::Department),
            _ => Err(format!(
                "Invalid notice_type '{s}'. Allowed: general, course, department"
            )),
        }
    }
}

// 公告
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub notice_type: NoticeType,
    pub course_id: Option<i64>,
    pub department_id: Option<i64>,
    pub created_by: i64,
    pub expiry_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Notice {
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.expiry_date.is_some_and(|exp| exp <= now)
    }
}

// 公告附件
#[derive(Debug, Clone, Serialize)]
pub struct NoticeAttachment {
    pub id: i64,
    pub notice_id: i64,
    pub file_name: String,
    pub file_path: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 调用者能看到的公告范围
#[derive(Debug, Clone)]
pub enum NoticeAudience {
    /// 管理员，不做受众过滤
    Everything,
    /// 通用公告 + 相关课程 + 所属院系，可选包含本人发布的
    Scoped {
        course_ids: Vec<i64>,
        department_id: Option<i64>,
        author_id: Option<i64>,
    },
}

impl NoticeAudience {
    /// 单条公告是否对该受众可见（不含过期判断）
    pub fn can_see(&self, notice: &Notice) -> bool {
        match self {
            NoticeAudience::Everything => true,
            NoticeAudience::Scoped {
                course_ids,
                department_id,
                author_id,
            } => {
                if author_id.is_some_and(|id| id == notice.created_by) {
                    return true;
                }
                match notice.notice_type {
                    NoticeType::General => true,
                    NoticeType::Course => notice
                        .course_id
                        .is_some_and(|cid| course_ids.contains(&cid)),
                    NoticeType::Department => {
                        department_id.is_some() && notice.department_id == *department_id
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn notice(notice_type: NoticeType, course_id: Option<i64>, department_id: Option<i64>) -> Notice {
        let now = Utc::now();
        Notice {
            id: 1,
            title: "t".into(),
            content: "c".into(),
            notice_type,
            course_id,
            department_id,
            created_by: 99,
            expiry_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_scoped_audience() {
        let audience = NoticeAudience::Scoped {
            course_ids: vec![1, 2],
            department_id: Some(5),
            author_id: None,
        };
        assert!(audience.can_see(&notice(NoticeType::General, None, None)));
        assert!(audience.can_see(&notice(NoticeType::Course, Some(2), None)));
        assert!(!audience.can_see(&notice(NoticeType::Course, Some(3), None)));
        assert!(audience.can_see(&notice(NoticeType::Department, None, Some(5))));
        assert!(!audience.can_see(&notice(NoticeType::Department, None, Some(6))));
    }

    #[test]
    fn test_author_sees_own_notice() {
        let audience = NoticeAudience::Scoped {
            course_ids: vec![],
            department_id: None,
            author_id: Some(99),
        };
        assert!(audience.can_see(&notice(NoticeType::Course, Some(3), None)));
    }

    #[test]
    fn test_department_notice_hidden_without_department() {
        let audience = NoticeAudience::Scoped {
            course_ids: vec![],
            department_id: None,
            author_id: None,
        };
        assert!(!audience.can_see(&notice(NoticeType::Department, None, None)));
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let mut n = notice(NoticeType::General, None, None);
        assert!(!n.is_expired(now));
        n.expiry_date = Some(now);
        assert!(n.is_expired(now));
        n.expiry_date = Some(now + Duration::days(1));
        assert!(!n.is_expired(now));
    }
}
