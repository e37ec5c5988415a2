pub mod change_password;
pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod me;
pub mod register;
pub mod reset_password;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{CollegeError, Result};
use crate::middlewares::CurrentUser;
use crate::storage::Storage;
use crate::utils::RequestContext;
use crate::utils::validate::validate_password_simple;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录
    pub async fn login(&self, ctx: RequestContext, request: &HttpRequest) -> ActixResult<HttpResponse> {
        login::handle_login(self, ctx, request).await
    }

    // 注销
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, request).await
    }

    // 管理员注册新用户
    pub async fn register(&self, ctx: RequestContext, request: &HttpRequest) -> ActixResult<HttpResponse> {
        register::handle_register(self, ctx, request).await
    }

    // 忘记密码
    pub async fn forgot_password(
        &self,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        forgot_password::handle_forgot_password(self, ctx, request).await
    }

    // 使用重置令牌设置新密码
    pub async fn reset_password(
        &self,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        reset_password::handle_reset_password(self, ctx, request).await
    }

    // 当前用户信息
    pub async fn me(&self, user: CurrentUser, request: &HttpRequest) -> ActixResult<HttpResponse> {
        me::handle_me(self, user, request).await
    }

    // 修改密码
    pub async fn change_password(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        change_password::handle_change_password(self, user, ctx, request).await
    }
}

/// 邮箱统一去空白并转小写
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn check_password_policy(password: &str) -> Result<()> {
    validate_password_simple(password).map_err(CollegeError::validation)
}
