pub mod courses;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::middlewares::CurrentUser;
use crate::storage::Storage;
use crate::utils::RequestContext;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    // 获取用户列表
    pub async fn list_users(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, user, ctx, request).await
    }

    // 根据ID获取用户
    pub async fn get_user(
        &self,
        user: CurrentUser,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_user(self, user, user_id, request).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        user: CurrentUser,
        user_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user, user_id, ctx, request).await
    }

    // 删除用户
    pub async fn delete_user(
        &self,
        user: CurrentUser,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user, user_id, request).await
    }

    // 用户的课程
    pub async fn list_user_courses(
        &self,
        user: CurrentUser,
        user_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::list_user_courses(self, user, user_id, ctx, request).await
    }
}
