use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::prelude::*;
use crate::entity::{password_resets, sessions, users};
use crate::errors::Result;
use crate::models::auth::{
    entities::{PasswordReset, Session},
    requests::NewSession,
};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 创建会话，顺带清理该用户已过期的会话
    pub async fn create_session_impl(&self, session: NewSession) -> Result<Session> {
        let now = chrono::Utc::now().timestamp();

        Sessions::delete_many()
            .filter(sessions::Column::UserId.eq(session.user_id))
            .filter(sessions::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .map_err(write_err("清理过期会话失败"))?;

        let model = SessionActiveModel {
            token: Set(session.token),
            user_id: Set(session.user_id),
            expires_at: Set(session.expires_at),
            ip_address: Set(session.ip_address),
            user_agent: Set(session.user_agent),
            created_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(write_err("创建会话失败"))?;

        Ok(result.into_session())
    }

    /// 获取未过期的会话
    pub async fn get_valid_session_impl(&self, token: &str, now: i64) -> Result<Option<Session>> {
        let result = Sessions::find_by_id(token.to_string())
            .filter(sessions::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .map_err(read_err("查询会话失败"))?;

        Ok(result.map(|m| m.into_session()))
    }

    /// 删除会话
    pub async fn delete_session_impl(&self, token: &str) -> Result<bool> {
        let result = Sessions::delete_by_id(token.to_string())
            .exec(&self.db)
            .await
            .map_err(write_err("删除会话失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 写入或替换重置令牌，每个用户最多一条
    pub async fn upsert_password_reset_impl(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<PasswordReset> {
        let now = chrono::Utc::now().timestamp();

        let model = PasswordResetActiveModel {
            user_id: Set(user_id),
            token: Set(token.to_string()),
            expires_at: Set(expires_at),
            created_at: Set(now),
        };

        PasswordResets::insert(model)
            .on_conflict(
                OnConflict::column(password_resets::Column::UserId)
                    .update_columns([
                        password_resets::Column::Token,
                        password_resets::Column::ExpiresAt,
                        password_resets::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_err("保存重置令牌失败"))?;

        Ok(PasswordReset {
            user_id,
            token: token.to_string(),
            expires_at: chrono::DateTime::<chrono::Utc>::from_timestamp(expires_at, 0)
                .unwrap_or_default(),
        })
    }

    /// 使用重置令牌更新密码：令牌作废，所有会话失效
    pub async fn reset_password_impl(
        &self,
        token: &str,
        password_hash: &str,
        now: i64,
    ) -> Result<Option<i64>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_err("开启事务失败"))?;

        let Some(reset) = PasswordResets::find()
            .filter(password_resets::Column::Token.eq(token))
            .filter(password_resets::Column::ExpiresAt.gt(now))
            .one(&txn)
            .await
            .map_err(read_err("查询重置令牌失败"))?
        else {
            return Ok(None);
        };

        Users::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(reset.user_id))
            .exec(&txn)
            .await
            .map_err(write_err("更新密码失败"))?;

        PasswordResets::delete_by_id(reset.user_id)
            .exec(&txn)
            .await
            .map_err(write_err("删除重置令牌失败"))?;

        Sessions::delete_many()
            .filter(sessions::Column::UserId.eq(reset.user_id))
            .exec(&txn)
            .await
            .map_err(write_err("清理会话失败"))?;

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok(Some(reset.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{entities::UserType, requests::CreateUserRequest};
    use crate::storage::sea_orm_storage::test_support::memory_storage;

    async fn seed_user(storage: &SeaOrmStorage) -> i64 {
        storage
            .create_user_impl(CreateUserRequest {
                full_name: "Admin".to_string(),
                email: "admin@test.local".to_string(),
                password_hash: "old".to_string(),
                user_type: UserType::Admin,
                phone: None,
                profile: Default::default(),
            })
            .await
            .unwrap()
            .id
    }

    fn new_session(user_id: i64, token: &str, expires_at: i64) -> NewSession {
        NewSession {
            token: token.to_string(),
            user_id,
            expires_at,
            ip_address: None,
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn test_expired_session_is_not_valid() {
        let storage = memory_storage().await;
        let user_id = seed_user(&storage).await;
        let now = chrono::Utc::now().timestamp();

        storage
            .create_session_impl(new_session(user_id, "live", now + 3600))
            .await
            .unwrap();
        storage
            .create_session_impl(new_session(user_id, "stale", now + 1))
            .await
            .unwrap();

        assert!(storage.get_valid_session_impl("live", now).await.unwrap().is_some());
        assert!(
            storage
                .get_valid_session_impl("stale", now + 10)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_reset_token_replaced_and_single_use() {
        let storage = memory_storage().await;
        let user_id = seed_user(&storage).await;
        let now = chrono::Utc::now().timestamp();

        storage
            .upsert_password_reset_impl(user_id, "first", now + 600)
            .await
            .unwrap();
        storage
            .upsert_password_reset_impl(user_id, "second", now + 600)
            .await
            .unwrap();
        storage
            .create_session_impl(new_session(user_id, "sess", now + 3600))
            .await
            .unwrap();

        assert_eq!(storage.reset_password_impl("first", "new", now).await.unwrap(), None);
        assert_eq!(
            storage.reset_password_impl("second", "new", now).await.unwrap(),
            Some(user_id)
        );
        assert_eq!(storage.reset_password_impl("second", "again", now).await.unwrap(), None);

        let user = storage.get_user_by_id_impl(user_id).await.unwrap().unwrap();
        assert_eq!(user.password_hash, "new");
        assert!(storage.get_valid_session_impl("sess", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_reset_token_rejected() {
        let storage = memory_storage().await;
        let user_id = seed_user(&storage).await;
        let now = chrono::Utc::now().timestamp();

        storage
            .upsert_password_reset_impl(user_id, "old-token", now - 1)
            .await
            .unwrap();
        assert_eq!(
            storage.reset_password_impl("old-token", "x", now).await.unwrap(),
            None
        );
    }
}
