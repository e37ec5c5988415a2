//! 权限矩阵
//!
//! 每个需要角色判断的操作对应一个 `Permission`，允许的用户类型集中在这里维护。
//! `RequireRole` 中间件和各 service 都通过 `UserType::can` 查询。

use super::entities::UserType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    RegisterUser,
    ListUsers,
    DeleteUser,
    ManageUserAccounts,
    CreateCourse,
    ManageCourse,
    EnrollSelf,
    CreateAssignment,
    SubmitAssignment,
    GradeSubmission,
    MarkAttendance,
    RecordGrades,
    PostNotice,
    PostGeneralNotice,
    ManageDepartments,
    ViewAllRecords,
}

impl Permission {
    /// 允许执行该操作的用户类型
    pub fn allowed(&self) -> &'static [UserType] {
        use UserType::*;
        match self {
            Permission::RegisterUser
            | Permission::DeleteUser
            | Permission::ManageUserAccounts
            | Permission::PostGeneralNotice
            | Permission::ManageDepartments
            | Permission::ViewAllRecords => &[Admin],
            Permission::ListUsers
            | Permission::CreateCourse
            | Permission::ManageCourse
            | Permission::CreateAssignment
            | Permission::GradeSubmission
            | Permission::MarkAttendance
            | Permission::RecordGrades
            | Permission::PostNotice => &[Faculty, Admin],
            Permission::EnrollSelf | Permission::SubmitAssignment => &[Student],
        }
    }
}

impl UserType {
    pub fn can(&self, permission: Permission) -> bool {
        permission.allowed().contains(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_only_permissions() {
        for p in [
            Permission::RegisterUser,
            Permission::DeleteUser,
            Permission::ManageDepartments,
            Permission::PostGeneralNotice,
        ] {
            assert!(UserType::Admin.can(p));
            assert!(!UserType::Faculty.can(p));
            assert!(!UserType::Student.can(p));
        }
    }

    #[test]
    fn test_teaching_permissions() {
        for p in [
            Permission::CreateCourse,
            Permission::CreateAssignment,
            Permission::GradeSubmission,
            Permission::MarkAttendance,
            Permission::RecordGrades,
        ] {
            assert!(UserType::Faculty.can(p));
            assert!(UserType::Admin.can(p));
            assert!(!UserType::Student.can(p));
        }
    }

    #[test]
    fn test_student_permissions() {
        assert!(UserType::Student.can(Permission::SubmitAssignment));
        assert!(!UserType::Faculty.can(Permission::SubmitAssignment));
        assert!(!UserType::Admin.can(Permission::SubmitAssignment));
        assert!(UserType::Student.can(Permission::EnrollSelf));
    }
}
