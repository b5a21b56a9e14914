use crate::error::ApiResult;
use checkin_shared::protocol::HttpMethod;
use std::collections::HashMap;

#[cfg(test)]
use crate::error::ApiError;
#[cfg(test)]
use std::cell::RefCell;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 待上传的文件（已读入内存）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// multipart 表单中的一个文件字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub file: UploadFile,
}

/// multipart 表单
///
/// 由传输层转换为运行时原生的表单对象，边界由运行时生成。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, file: UploadFile) -> Self {
        self.parts.push(FormPart {
            name: name.to_string(),
            file,
        });
        self
    }
}

/// 请求体
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// 已序列化的 JSON 文本
    Json(String),
    Multipart(MultipartForm),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 客户端特性 (Trait)
///
/// 浏览器中的 fetch future 不是 `Send` 的，因此使用 `?Send`。
/// 实现方只负责单次发送：不重试、不缓存。网络失败返回 `Transport` 错误。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
enum MockReply {
    Respond(u16, String),
    Fail(String),
}

#[cfg(test)]
pub struct MockHttpClient {
    // URL -> 预设响应
    replies: RefCell<HashMap<String, MockReply>>,
    // 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            replies: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.replies
            .borrow_mut()
            .insert(url.to_string(), MockReply::Respond(status, body.to_string()));
    }

    pub fn mock_raw(&self, url: &str, status: u16, body: &str) {
        self.replies
            .borrow_mut()
            .insert(url.to_string(), MockReply::Respond(status, body.to_string()));
    }

    pub fn mock_failure(&self, url: &str, message: &str) {
        self.replies
            .borrow_mut()
            .insert(url.to_string(), MockReply::Fail(message.to_string()));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let url = req.url.clone();
        self.requests.borrow_mut().push(req);

        match self.replies.borrow().get(&url) {
            Some(MockReply::Respond(status, body)) => Ok(HttpResponse {
                status: *status,
                status_text: String::new(),
                body: body.clone(),
            }),
            Some(MockReply::Fail(message)) => Err(ApiError::transport(message.clone())),
            None => Ok(HttpResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: String::new(),
            }),
        }
    }
}
