//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod assignments;
pub mod attendance;
pub mod course_materials;
pub mod course_schedules;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod faculty_profiles;
pub mod notice_attachments;
pub mod notice_reads;
pub mod notices;
pub mod password_resets;
pub mod sessions;
pub mod student_profiles;
pub mod submissions;
pub mod users;
