//! 后端 API 客户端
//!
//! 负责拼接地址、内容协商、注入 Bearer 令牌以及错误规范化。
//! 每个请求只发送一次：不重试、不缓存。

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse, MultipartForm, RequestBody, UploadFile};
use crate::session::SessionHandle;
use checkin_shared::protocol::{
    ApiRequest, AssignBarcodeRequest, DeassignBarcodeRequest, EntryHistoryRequest,
    EntryStatsRequest, GetPaperRequest, HttpMethod, ListEntriesRequest, ListParticipantsRequest,
    ListPapersRequest, MarkEntryRequest, SearchPapersRequest, SearchParticipantsRequest,
    UploadTarget,
};
use checkin_shared::{
    CONTENT_TYPE_JSON, Entry, EntryHistory, EntryStats, ErrorBody, HEADER_ACCEPT,
    HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, MarkEntryResponse, MessageResponse, Paper,
    Participant, Venue,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub struct CheckinApi<C> {
    http: Arc<C>,
    config: ClientConfig,
    session: SessionHandle,
}

impl<C> Clone for CheckinApi<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            config: self.config.clone(),
            session: self.session.clone(),
        }
    }
}

impl<C: HttpClient> CheckinApi<C> {
    pub fn new(http: C, config: ClientConfig, session: SessionHandle) -> Self {
        Self {
            http: Arc::new(http),
            config,
            session,
        }
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    // =========================================================
    // 请求适配层
    // =========================================================

    /// 发送类型化请求
    pub async fn call<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let body = match R::METHOD {
            HttpMethod::Get => None,
            HttpMethod::Post => Some(RequestBody::Json(serde_json::to_string(req)?)),
        };
        self.request(R::METHOD, &req.path(), body).await
    }

    /// 发送请求并解析响应体
    ///
    /// - JSON 请求体设置 `Content-Type: application/json`
    /// - multipart 请求体不设置 `Content-Type`，由运行时生成带 boundary 的值
    /// - 会话中存在令牌时附加 `Authorization: Bearer <token>`，否则不附加
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<RequestBody>,
    ) -> ApiResult<T> {
        let mut req = HttpRequest::new(&self.config.url(path), method)
            .with_header(HEADER_ACCEPT, CONTENT_TYPE_JSON);

        if let Some(body) = body {
            if matches!(body, RequestBody::Json(_)) {
                req = req.with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
            }
            req = req.with_body(body);
        }

        if let Some(token) = self.session.token() {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        log::debug!("[Api] {} {}", method.as_str(), path);
        let res = self.http.send(req).await.inspect_err(|e| {
            log::warn!("[Api] {} {} 网络错误: {}", method.as_str(), path, e);
        })?;
        log::debug!("[Api] {} {} -> {}", method.as_str(), path, res.status);

        decode_response(res)
    }

    // =========================================================
    // 参会者
    // =========================================================

    /// 搜索参会者（邮箱、手机号或注册编号）
    ///
    /// 空查询在本地拦截，不发出请求。
    pub async fn search_participants(&self, query: &str) -> ApiResult<Vec<Participant>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::validation("Please enter a search query"));
        }
        self.call(&SearchParticipantsRequest {
            query: query.to_string(),
        })
        .await
    }

    pub async fn list_participants(&self) -> ApiResult<Vec<Participant>> {
        self.call(&ListParticipantsRequest).await
    }

    pub async fn upload_participants(&self, file: UploadFile) -> ApiResult<MessageResponse> {
        self.upload(UploadTarget::Participants, file).await
    }

    pub async fn assign_barcode(&self, email: &str, barcode: &str) -> ApiResult<MessageResponse> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(ApiError::validation("Please enter a barcode"));
        }
        if email.trim().is_empty() {
            return Err(ApiError::validation("No participant selected"));
        }
        self.call(&AssignBarcodeRequest {
            email: email.to_string(),
            barcode: barcode.to_string(),
        })
        .await
    }

    pub async fn deassign_barcode(&self, email: &str) -> ApiResult<MessageResponse> {
        if email.trim().is_empty() {
            return Err(ApiError::validation("No participant selected"));
        }
        self.call(&DeassignBarcodeRequest {
            email: email.to_string(),
        })
        .await
    }

    // =========================================================
    // 检录
    // =========================================================

    /// 标记入场
    ///
    /// 客户端只校验条码非空；去重等业务规则由后端负责。
    pub async fn mark_entry(&self, barcode: &str, venue: Venue) -> ApiResult<MarkEntryResponse> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(ApiError::validation("Please enter a barcode and select venue"));
        }
        self.call(&MarkEntryRequest {
            barcode: barcode.to_string(),
            venue,
        })
        .await
    }

    pub async fn entry_history(&self, barcode: &str) -> ApiResult<EntryHistory> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(ApiError::validation("Please enter a barcode"));
        }
        self.call(&EntryHistoryRequest {
            barcode: barcode.to_string(),
        })
        .await
    }

    pub async fn list_entries(&self, filter: &ListEntriesRequest) -> ApiResult<Vec<Entry>> {
        self.call(filter).await
    }

    pub async fn entry_stats(&self) -> ApiResult<EntryStats> {
        self.call(&EntryStatsRequest).await
    }

    // =========================================================
    // 论文
    // =========================================================

    pub async fn search_papers(&self, query: &str) -> ApiResult<Vec<Paper>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::validation("Please enter a search query"));
        }
        self.call(&SearchPapersRequest {
            query: query.to_string(),
        })
        .await
    }

    pub async fn list_papers(&self) -> ApiResult<Vec<Paper>> {
        self.call(&ListPapersRequest).await
    }

    pub async fn get_paper(&self, id: &str) -> ApiResult<Paper> {
        self.call(&GetPaperRequest { id: id.to_string() }).await
    }

    pub async fn upload_papers(&self, file: UploadFile) -> ApiResult<MessageResponse> {
        self.upload(UploadTarget::Papers, file).await
    }

    async fn upload(&self, target: UploadTarget, file: UploadFile) -> ApiResult<MessageResponse> {
        let form = MultipartForm::new().with_file(UploadTarget::FIELD_NAME, file);
        self.request(HttpMethod::Post, target.path(), Some(RequestBody::Multipart(form)))
            .await
    }
}

// =========================================================
// 响应解析与错误规范化
// =========================================================

/// 空响应体视为 `null`；非 JSON 响应体保留为字符串
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn decode_response<T: DeserializeOwned>(res: HttpResponse) -> ApiResult<T> {
    let body = parse_body(&res.body);

    if !res.is_success() {
        let err = ApiError::backend(res.status, error_message(&res, body));
        log::warn!("[Api] 后端错误 {}: {}", res.status, err);
        return Err(err);
    }

    Ok(serde_json::from_value(body)?)
}

/// 错误消息优先级：`{error}` 字段 > `{message}` 字段 > 纯文本响应体 > 状态文本 > 默认文本
fn error_message(res: &HttpResponse, body: Value) -> String {
    match body {
        Value::String(text) if !text.trim().is_empty() => text,
        Value::Null | Value::String(_) => fallback_message(res),
        other => serde_json::from_value::<ErrorBody>(other.clone())
            .map(|b| b.error)
            .ok()
            .or_else(|| other.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| other.to_string()),
    }
}

fn fallback_message(res: &HttpResponse) -> String {
    if res.status_text.trim().is_empty() {
        "Request failed".to_string()
    } else {
        res.status_text.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::request::MockHttpClient;
    use checkin_shared::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY};
    use serde_json::json;

    const BASE: &str = "http://test.local";

    fn api() -> CheckinApi<MockHttpClient> {
        CheckinApi::new(
            MockHttpClient::new(),
            ClientConfig::new(BASE),
            SessionHandle::new(),
        )
    }

    fn signed_in_api(token: &str) -> CheckinApi<MockHttpClient> {
        use crate::session::{KeyValueStore, MemoryStore, SessionStore};

        let storage = MemoryStore::new();
        storage.set(STORAGE_TOKEN_KEY, token);
        storage.set(STORAGE_USER_KEY, r#"{"name":"Ravi","role":"COORDINATOR"}"#);
        let handle = SessionHandle::new();
        SessionStore::new(storage, handle.clone()).rehydrate();

        CheckinApi::new(MockHttpClient::new(), ClientConfig::new(BASE), handle)
    }

    fn sample_file() -> UploadFile {
        UploadFile::new(
            "report.xlsx",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            vec![0x50, 0x4b, 0x03, 0x04],
        )
    }

    #[tokio::test]
    async fn no_token_means_no_authorization_header() {
        let api = api();
        api.http()
            .mock_response(&format!("{BASE}/entries/stats"), 200, json!({}));

        api.entry_stats().await.unwrap();

        let req = api.http().last_request().unwrap();
        assert!(req.header("Authorization").is_none());
        assert_eq!(req.header("Accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn token_is_sent_as_bearer_on_every_request() {
        let api = signed_in_api("tok-123");
        api.http()
            .mock_response(&format!("{BASE}/papers/all"), 200, json!([]));
        api.http().mock_response(
            &format!("{BASE}/participants/upload-excel"),
            200,
            json!({ "message": "ok" }),
        );

        api.list_papers().await.unwrap();
        api.upload_participants(sample_file()).await.unwrap();

        for req in api.http().requests.borrow().iter() {
            assert_eq!(req.header("Authorization"), Some("Bearer tok-123"));
        }
        assert_eq!(api.http().request_count(), 2);
    }

    #[tokio::test]
    async fn multipart_upload_leaves_content_type_to_runtime() {
        let api = signed_in_api("tok");
        api.http().mock_response(
            &format!("{BASE}/upload-papers"),
            200,
            json!({ "message": "12 papers imported" }),
        );

        let res = api.upload_papers(sample_file()).await.unwrap();
        assert_eq!(res.message, "12 papers imported");

        let req = api.http().last_request().unwrap();
        assert!(req.header("Content-Type").is_none());
        match req.body {
            Some(RequestBody::Multipart(form)) => {
                assert_eq!(form.parts.len(), 1);
                assert_eq!(form.parts[0].name, "file");
                assert_eq!(form.parts[0].file.file_name, "report.xlsx");
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn json_post_sets_content_type_and_body() {
        let api = api();
        api.http().mock_response(
            &format!("{BASE}/participants/assign-barcode"),
            200,
            json!({ "message": "Barcode assigned" }),
        );

        let res = api.assign_barcode("asha@example.org", " BC100 ").await.unwrap();
        assert_eq!(res.message, "Barcode assigned");

        let req = api.http().last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("content-type"), Some("application/json"));
        let Some(RequestBody::Json(body)) = req.body else {
            panic!("expected JSON body");
        };
        let sent: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(sent, json!({ "email": "asha@example.org", "barcode": "BC100" }));
    }

    #[tokio::test]
    async fn get_requests_carry_no_body() {
        let api = api();
        api.http()
            .mock_response(&format!("{BASE}/participants"), 200, json!([]));

        api.list_participants().await.unwrap();

        let req = api.http().last_request().unwrap();
        assert!(req.body.is_none());
        assert!(req.header("Content-Type").is_none());
    }

    #[tokio::test]
    async fn backend_error_field_is_surfaced_verbatim() {
        let api = api();
        api.http().mock_response(
            &format!("{BASE}/entries/mark"),
            409,
            json!({ "error": "Already entered" }),
        );

        let err = api.mark_entry("BC100", Venue::MainHall).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Backend);
        assert_eq!(err.status, Some(409));
        assert_eq!(err.message, "Already entered");
    }

    #[tokio::test]
    async fn error_without_json_body_uses_text_then_status() {
        let api = api();
        api.http()
            .mock_raw(&format!("{BASE}/entries/stats"), 502, "Bad gateway upstream");
        let err = api.entry_stats().await.unwrap_err();
        assert_eq!(err.message, "Bad gateway upstream");

        // 未预设的地址返回 404，响应体为空，使用状态文本
        let err = api.list_papers().await.unwrap_err();
        assert_eq!(err.status, Some(404));
        assert_eq!(err.message, "Not Found");

        api.http().mock_raw(&format!("{BASE}/participants"), 500, "");
        let err = api.list_participants().await.unwrap_err();
        assert_eq!(err.message, "Request failed");
    }

    #[tokio::test]
    async fn transport_failure_is_propagated_unchanged() {
        let api = api();
        api.http()
            .mock_failure(&format!("{BASE}/entries/stats"), "TypeError: Failed to fetch");

        let err = api.entry_stats().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(err.message, "TypeError: Failed to fetch");
        assert_eq!(api.http().request_count(), 1);
    }

    #[tokio::test]
    async fn unexpected_success_body_is_a_decode_error() {
        let api = api();
        api.http()
            .mock_raw(&format!("{BASE}/papers/all"), 200, "<html>oops</html>");

        let err = api.list_papers().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }

    #[tokio::test]
    async fn empty_search_short_circuits() {
        let api = api();

        let err = api.search_participants("   ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.message, "Please enter a search query");

        let err = api.mark_entry("", Venue::Auditorium).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(api.http().request_count(), 0);
    }

    #[tokio::test]
    async fn search_encodes_query() {
        let api = api();
        api.http().mock_response(
            &format!("{BASE}/participants/search?query=%2B91%2098765"),
            200,
            json!([{ "referenceNo": "R1", "name": "Asha", "email": "a@x.org" }]),
        );

        let found = api.search_participants(" +91 98765 ").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reference_no, "R1");
    }

    #[tokio::test]
    async fn unauthorized_does_not_clear_session() {
        let api = signed_in_api("expired");
        api.http().mock_response(
            &format!("{BASE}/entries/stats"),
            401,
            json!({ "error": "Token expired" }),
        );

        let err = api.entry_stats().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(api.session().token().as_deref(), Some("expired"));
    }
}
