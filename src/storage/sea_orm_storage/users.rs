use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::prelude::*;
use crate::entity::{
    attendance, courses, enrollments, faculty_profiles, notice_reads, password_resets, sessions,
    student_profiles, submissions, users,
};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserProfile, UserStatus, UserType},
        requests::{CreateUserRequest, ProfileFields, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建用户，按类型写入档案
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_err("开启事务失败"))?;

        let model = UserActiveModel {
            full_name: Set(req.full_name),
            email: Set(req.email),
            password_hash: Set(req.password_hash),
            user_type: Set(req.user_type.to_string()),
            status: Set(UserStatus::Active.to_string()),
            phone: Set(req.phone),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let user = model.insert(&txn).await.map_err(write_err("创建用户失败"))?;

        insert_profile(&txn, user.id, req.user_type, &req.profile)
            .await
            .map_err(write_err("创建用户档案失败"))?;

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok(user.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询用户失败"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(read_err("查询用户失败"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 获取用户档案，管理员没有档案
    pub async fn get_user_profile_impl(
        &self,
        user_id: i64,
        user_type: UserType,
    ) -> Result<Option<UserProfile>> {
        let profile = match user_type {
            UserType::Student => StudentProfiles::find()
                .filter(student_profiles::Column::UserId.eq(user_id))
                .one(&self.db)
                .await
                .map_err(read_err("查询学生档案失败"))?
                .map(|m| UserProfile::Student(m.into_profile())),
            UserType::Faculty => FacultyProfiles::find()
                .filter(faculty_profiles::Column::UserId.eq(user_id))
                .one(&self.db)
                .await
                .map_err(read_err("查询教师档案失败"))?
                .map(|m| UserProfile::Faculty(m.into_profile())),
            UserType::Admin => None,
        };

        Ok(profile)
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
        page: u64,
        size: u64,
    ) -> Result<UserListResponse> {
        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(users::Column::FullName.contains(search))
                    .add(users::Column::Email.contains(search)),
            );
        }

        // 类型筛选
        if let Some(user_type) = query.user_type {
            select = select.filter(users::Column::UserType.eq(user_type.to_string()));
        }

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(users::Column::Status.eq(status.to_string()));
        }

        // 院系筛选，学生和教师档案都算
        if let Some(department_id) = query.department_id {
            let mut ids: Vec<i64> = StudentProfiles::find()
                .select_only()
                .column(student_profiles::Column::UserId)
                .filter(student_profiles::Column::DepartmentId.eq(department_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(read_err("查询院系学生失败"))?;
            let faculty_ids: Vec<i64> = FacultyProfiles::find()
                .select_only()
                .column(faculty_profiles::Column::UserId)
                .filter(faculty_profiles::Column::DepartmentId.eq(department_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(read_err("查询院系教师失败"))?;
            ids.extend(faculty_ids);
            select = select.filter(users::Column::Id.is_in(ids));
        }

        select = select
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(read_err("查询用户总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(read_err("查询用户页数失败"))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(read_err("查询用户列表失败"))?;

        Ok(UserListResponse {
            items: items.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新用户及档案
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_err("开启事务失败"))?;

        let Some(existing) = Users::find_by_id(id)
            .one(&txn)
            .await
            .map_err(read_err("查询用户失败"))?
        else {
            return Ok(None);
        };
        let user_type = existing
            .user_type
            .parse::<UserType>()
            .unwrap_or(UserType::Student);

        let mut model: UserActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());
        if let Some(full_name) = update.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let user = model.update(&txn).await.map_err(write_err("更新用户失败"))?;

        if !update.profile.is_empty() {
            upsert_profile(&txn, id, user_type, &update.profile)
                .await
                .map_err(write_err("更新用户档案失败"))?;
        }

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok(Some(user.into_user()))
    }

    /// 删除用户及其所有从属数据
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_err("开启事务失败"))?;

        let deleted = delete_user_cascade(&txn, id)
            .await
            .map_err(write_err("删除用户失败"))?;

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok(deleted)
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(users::Column::LastLogin, Expr::value(now))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(write_err("更新最后登录时间失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新密码哈希
    pub async fn update_password_impl(&self, id: i64, password_hash: &str) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(write_err("更新密码失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(read_err("统计用户数量失败"))
    }
}

async fn insert_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    user_type: UserType,
    fields: &ProfileFields,
) -> std::result::Result<(), DbErr> {
    match user_type {
        UserType::Student => {
            StudentProfileActiveModel {
                user_id: Set(user_id),
                department_id: Set(fields.department_id),
                roll_number: Set(fields.roll_number.clone()),
                semester: Set(fields.semester),
                batch: Set(fields.batch.clone()),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
        UserType::Faculty => {
            FacultyProfileActiveModel {
                user_id: Set(user_id),
                department_id: Set(fields.department_id),
                designation: Set(fields.designation.clone()),
                specialization: Set(fields.specialization.clone()),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
        UserType::Admin => {}
    }
    Ok(())
}

/// 只覆盖提供了的档案字段，档案不存在时新建
async fn upsert_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    user_type: UserType,
    fields: &ProfileFields,
) -> std::result::Result<(), DbErr> {
    match user_type {
        UserType::Student => {
            let existing = StudentProfiles::find()
                .filter(student_profiles::Column::UserId.eq(user_id))
                .one(conn)
                .await?;
            let Some(existing) = existing else {
                return insert_profile(conn, user_id, user_type, fields).await;
            };
            let mut model: StudentProfileActiveModel = existing.into();
            if let Some(department_id) = fields.department_id {
                model.department_id = Set(Some(department_id));
            }
            if let Some(ref roll_number) = fields.roll_number {
                model.roll_number = Set(Some(roll_number.clone()));
            }
            if let Some(semester) = fields.semester {
                model.semester = Set(Some(semester));
            }
            if let Some(ref batch) = fields.batch {
                model.batch = Set(Some(batch.clone()));
            }
            model.update(conn).await?;
        }
        UserType::Faculty => {
            let existing = FacultyProfiles::find()
                .filter(faculty_profiles::Column::UserId.eq(user_id))
                .one(conn)
                .await?;
            let Some(existing) = existing else {
                return insert_profile(conn, user_id, user_type, fields).await;
            };
            let mut model: FacultyProfileActiveModel = existing.into();
            if let Some(department_id) = fields.department_id {
                model.department_id = Set(Some(department_id));
            }
            if let Some(ref designation) = fields.designation {
                model.designation = Set(Some(designation.clone()));
            }
            if let Some(ref specialization) = fields.specialization {
                model.specialization = Set(Some(specialization.clone()));
            }
            model.update(conn).await?;
        }
        UserType::Admin => {}
    }
    Ok(())
}

/// 删除用户拥有的数据；所授课程保留，任课教师置空
pub(crate) async fn delete_user_cascade<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> std::result::Result<bool, DbErr> {
    Sessions::delete_many()
        .filter(sessions::Column::UserId.eq(id))
        .exec(conn)
        .await?;
    PasswordResets::delete_many()
        .filter(password_resets::Column::UserId.eq(id))
        .exec(conn)
        .await?;
    StudentProfiles::delete_many()
        .filter(student_profiles::Column::UserId.eq(id))
        .exec(conn)
        .await?;
    FacultyProfiles::delete_many()
        .filter(faculty_profiles::Column::UserId.eq(id))
        .exec(conn)
        .await?;
    Enrollments::delete_many()
        .filter(enrollments::Column::StudentId.eq(id))
        .exec(conn)
        .await?;
    Submissions::delete_many()
        .filter(submissions::Column::StudentId.eq(id))
        .exec(conn)
        .await?;
    Attendance::delete_many()
        .filter(attendance::Column::StudentId.eq(id))
        .exec(conn)
        .await?;
    NoticeReads::delete_many()
        .filter(notice_reads::Column::UserId.eq(id))
        .exec(conn)
        .await?;
    Courses::update_many()
        .col_expr(courses::Column::InstructorId, Expr::value(Option::<i64>::None))
        .filter(courses::Column::InstructorId.eq(id))
        .exec(conn)
        .await?;

    let result = Users::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
