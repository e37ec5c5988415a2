//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::attendance::{
    ActiveModel as AttendanceActiveModel, Entity as Attendance, Model as AttendanceModel,
};
pub use super::course_materials::{
    ActiveModel as CourseMaterialActiveModel, Entity as CourseMaterials,
    Model as CourseMaterialModel,
};
pub use super::course_schedules::{
    ActiveModel as CourseScheduleActiveModel, Entity as CourseSchedules,
    Model as CourseScheduleModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::departments::{
    ActiveModel as DepartmentActiveModel, Entity as Departments, Model as DepartmentModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::faculty_profiles::{
    ActiveModel as FacultyProfileActiveModel, Entity as FacultyProfiles,
    Model as FacultyProfileModel,
};
pub use super::notice_attachments::{
    ActiveModel as NoticeAttachmentActiveModel, Entity as NoticeAttachments,
    Model as NoticeAttachmentModel,
};
pub use super::notice_reads::{
    ActiveModel as NoticeReadActiveModel, Entity as NoticeReads, Model as NoticeReadModel,
};
pub use super::notices::{ActiveModel as NoticeActiveModel, Entity as Notices, Model as NoticeModel};
pub use super::password_resets::{
    ActiveModel as PasswordResetActiveModel, Entity as PasswordResets,
    Model as PasswordResetModel,
};
pub use super::sessions::{
    ActiveModel as SessionActiveModel, Entity as Sessions, Model as SessionModel,
};
pub use super::student_profiles::{
    ActiveModel as StudentProfileActiveModel, Entity as StudentProfiles,
    Model as StudentProfileModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
