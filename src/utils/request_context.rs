//! 请求上下文
//!
//! 把一次请求归一成 方法 + `/api` 之后的路径段 + 参数表。
//! 参数表先取查询串，再用 JSON 或表单请求体覆盖同名键；只有 POST/PUT/DELETE 读取请求体。
//! 这里不做校验，由各个动作调用 `require` / `update_fields` 决定。

use actix_web::http::{Method, header};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::{CollegeError, Result};

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub segments: Vec<String>,
    pub params: Map<String, Value>,
}

impl RequestContext {
    /// 从已经读取的各部分构建
    pub fn build(
        method: Method,
        path: &str,
        query: &str,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<Self> {
        let mut params = Map::new();

        let query_pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| CollegeError::validation(format!("Invalid query string: {e}")))?;
        for (key, value) in query_pairs {
            params.insert(key, Value::String(value));
        }

        let reads_body = matches!(method, Method::POST | Method::PUT | Method::DELETE);
        if reads_body && !body.iter().all(u8::is_ascii_whitespace) {
            let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
            if content_type.starts_with("application/x-www-form-urlencoded") {
                let form: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
                    .map_err(|e| CollegeError::validation(format!("Invalid form body: {e}")))?;
                for (key, value) in form {
                    params.insert(key, Value::String(value));
                }
            } else {
                let value: Value = serde_json::from_slice(body)
                    .map_err(|e| CollegeError::validation(format!("Invalid JSON body: {e}")))?;
                match value {
                    Value::Object(map) => params.extend(map),
                    _ => {
                        return Err(CollegeError::validation(
                            "Request body must be a JSON object",
                        ));
                    }
                }
            }
        }

        Ok(Self {
            method,
            segments: path_segments(path),
            params,
        })
    }

    /// 路径段，下标从资源名开始
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.params.get(key).is_some_and(|v| !is_missing(v))
    }

    /// 键存在但值为 null 或空字符串
    pub fn is_blank(&self, key: &str) -> bool {
        self.params.get(key).is_some_and(is_missing)
    }

    /// 检查必填参数，一次列出所有缺失项
    pub fn require(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| !self.has(name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CollegeError::validation(format!(
                "Missing required parameters: {}",
                missing.join(", ")
            )))
        }
    }

    /// 整个参数表反序列化为请求结构体
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        from_map(self.params.clone())
    }

    /// 先 require 再 parse
    pub fn parse_required<T: DeserializeOwned>(&self, names: &[&str]) -> Result<T> {
        self.require(names)?;
        self.parse()
    }

    /// 只保留白名单内出现的键，一个都没有时报错
    pub fn update_fields(&self, allowed: &[&str]) -> Result<Map<String, Value>> {
        let fields: Map<String, Value> = self
            .params
            .iter()
            .filter(|(key, _)| allowed.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if fields.is_empty() {
            return Err(CollegeError::validation("No updatable fields supplied"));
        }
        Ok(fields)
    }

    /// 白名单过滤后反序列化为更新结构体
    pub fn parse_update<T: DeserializeOwned>(&self, allowed: &[&str]) -> Result<T> {
        from_map(self.update_fields(allowed)?)
    }
}

fn from_map<T: DeserializeOwned>(map: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| CollegeError::validation(format!("Invalid parameters: {e}")))
}

fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn path_segments(path: &str) -> Vec<String> {
    let mut segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .collect();
    if segments.first().is_some_and(|s| s == "api") {
        segments.remove(0);
    }
    segments
}

impl FromRequest for RequestContext {
    type Error = CollegeError;
    type Future = LocalBoxFuture<'static, Result<Self>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let body = web::Bytes::from_request(&req, payload);

        Box::pin(async move {
            let bytes = if matches!(*req.method(), Method::POST | Method::PUT | Method::DELETE) {
                body.await
                    .map_err(|e| CollegeError::validation(format!("Invalid request body: {e}")))?
            } else {
                web::Bytes::new()
            };

            let content_type = req
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());

            RequestContext::build(
                req.method().clone(),
                req.path(),
                req.query_string(),
                content_type,
                &bytes,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn ctx(method: Method, path: &str, query: &str, ct: Option<&str>, body: &str) -> RequestContext {
        RequestContext::build(method, path, query, ct, body.as_bytes()).unwrap()
    }

    #[test]
    fn test_segments_after_api_prefix() {
        let c = ctx(Method::GET, "/api/courses/7/enroll", "", None, "");
        assert_eq!(c.segments, vec!["courses", "7", "enroll"]);
        assert_eq!(c.segment(1), Some("7"));

        let decoded = ctx(Method::GET, "/api/users/a%20b", "", None, "");
        assert_eq!(decoded.segment(1), Some("a b"));
    }

    #[test]
    fn test_body_overrides_query() {
        let c = ctx(
            Method::POST,
            "/api/x",
            "a=1&b=2",
            Some("application/json"),
            r#"{"b": 3, "c": "x"}"#,
        );
        assert_eq!(c.params["a"], Value::String("1".into()));
        assert_eq!(c.params["b"], Value::from(3));
        assert_eq!(c.get_str("c"), Some("x"));
    }

    #[test]
    fn test_form_body() {
        let c = ctx(
            Method::PUT,
            "/api/x",
            "",
            Some("application/x-www-form-urlencoded; charset=utf-8"),
            "name=Data+Structures&credits=4",
        );
        assert_eq!(c.get_str("name"), Some("Data Structures"));
        assert_eq!(c.get_str("credits"), Some("4"));
    }

    #[test]
    fn test_get_ignores_body() {
        let c = ctx(Method::GET, "/api/x", "", Some("application/json"), "not json");
        assert!(c.params.is_empty());
    }

    #[test]
    fn test_invalid_json_is_bad_request() {
        let err = RequestContext::build(
            Method::POST,
            "/api/x",
            "",
            Some("application/json"),
            b"{oops",
        )
        .unwrap_err();
        assert_eq!(err.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_require_lists_every_missing_name() {
        let c = ctx(
            Method::POST,
            "/api/x",
            "",
            Some("application/json"),
            r#"{"email": "", "password": null, "full_name": "Jo"}"#,
        );
        let err = c
            .require(&["full_name", "email", "password", "user_type"])
            .unwrap_err();
        assert_eq!(
            err.message(),
            "Missing required parameters: email, password, user_type"
        );
    }

    #[test]
    fn test_update_fields_allow_list() {
        #[derive(Deserialize)]
        struct Update {
            name: Option<String>,
            credits: Option<i64>,
        }

        let c = ctx(
            Method::PUT,
            "/api/courses/1",
            "",
            Some("application/json"),
            r#"{"name": "New", "instructor_id": 9}"#,
        );
        let update: Update = c.parse_update(&["name", "credits"]).unwrap();
        assert_eq!(update.name.as_deref(), Some("New"));
        assert_eq!(update.credits, None);

        let err = c.update_fields(&["description"]).unwrap_err();
        assert_eq!(err.message(), "No updatable fields supplied");
    }
}
