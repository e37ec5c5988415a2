/*!
 * 会话认证中间件
 *
 * 校验 `Authorization: Bearer <token>`：令牌必须对应一条未过期的会话，
 * 会话所属用户必须存在且处于启用状态。通过后把用户放进请求扩展，
 * 处理程序用 `CurrentUser` 提取。
 *
 * ```rust,ignore
 * web::scope("/api/courses")
 *     .wrap(RequireSession)
 *     .route("", web::get().to(list_courses))
 * ```
 *
 * 认证失败返回 401，查询会话时的数据库错误按 500 原样返回，
 * OPTIONS 预检请求直接放行为 200。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::{Method, StatusCode, header::HeaderMap},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;
use crate::errors::{CollegeError, Result};
use crate::models::{ErrorCode, users::entities::User};
use crate::storage::Storage;

const BEARER_PREFIX: &str = "Bearer ";

/// 从请求头取出 Bearer 令牌
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// 根据请求头解析当前用户
pub async fn authenticate(storage: &dyn Storage, headers: &HeaderMap) -> Result<User> {
    let token = bearer_token(headers)
        .ok_or_else(|| CollegeError::authentication("Missing or invalid Authorization header"))?;

    let now = chrono::Utc::now().timestamp();
    let session = storage
        .get_valid_session(token, now)
        .await?
        .ok_or_else(|| CollegeError::authentication("Invalid or expired session"))?;

    let user = storage
        .get_user_by_id(session.user_id)
        .await?
        .ok_or_else(|| CollegeError::authentication("User not found"))?;

    if !user.is_active() {
        return Err(CollegeError::authentication("User is not active"));
    }

    Ok(user)
}

#[derive(Clone)]
pub struct RequireSession;

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == Method::OPTIONS {
                return Ok(req.into_response(
                    actix_web::HttpResponse::Ok().finish().map_into_right_body(),
                ));
            }

            let Some(storage) = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|data| data.get_ref().clone())
            else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Storage not configured",
                    )
                    .map_into_right_body(),
                ));
            };

            match authenticate(storage.as_ref(), req.headers()).await {
                Ok(user) => {
                    debug!("Session authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    if err.status().is_server_error() {
                        error!(
                            "Session lookup failed for request to {}: {}",
                            req.path(),
                            err.format_simple()
                        );
                    } else {
                        info!(
                            "Session authentication failed for request to {}: {}",
                            req.path(),
                            err.message()
                        );
                    }
                    Ok(req.into_response(
                        create_error_response(err.status(), err.api_code(), err.message())
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

/// 已认证的当前用户
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn from_request_sync(req: &HttpRequest) -> Result<Self> {
        req.extensions()
            .get::<User>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| CollegeError::authentication("Authentication required"))
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = CollegeError;
    type Future = Ready<Result<Self>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_request_sync(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::storage::SeaOrmStorage;
    use actix_web::{App, HttpResponse, test};
    use sea_orm::ConnectionTrait;

    async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        })
        .await
        .unwrap()
    }

    #[actix_web::test]
    async fn test_unknown_token_is_unauthorized() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .service(
                    web::scope("/api/ping")
                        .wrap(RequireSession)
                        .route("", web::get().to(|| async { HttpResponse::Ok().finish() })),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/ping")
            .insert_header(("Authorization", "Bearer abc"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_session_lookup_failure_is_server_error() {
        let storage = memory_storage().await;
        storage
            .db
            .execute_unprepared("DROP TABLE sessions")
            .await
            .unwrap();
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .service(
                    web::scope("/api/ping")
                        .wrap(RequireSession)
                        .route("", web::get().to(|| async { HttpResponse::Ok().finish() })),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/ping")
            .insert_header(("Authorization", "Bearer abc"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["code"], ErrorCode::InternalServerError as i32);
    }
}
