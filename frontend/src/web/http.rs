//! HTTP 传输层
//!
//! 基于 `gloo-net` 的 fetch 封装，实现核心库的 [`HttpClient`]。
//! multipart 请求体转换为浏览器 `FormData`，由运行时生成带 boundary 的 Content-Type。

use checkin::{ApiError, ApiResult, HttpClient, HttpRequest, HttpResponse, MultipartForm, RequestBody};
use checkin_shared::protocol::HttpMethod;
use gloo_net::http::{Method, RequestBuilder};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

/// 浏览器 fetch 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

fn js_error(e: JsValue) -> ApiError {
    ApiError::transport(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// 构建 FormData
fn to_form_data(form: &MultipartForm) -> ApiResult<FormData> {
    let data = FormData::new().map_err(js_error)?;

    for part in &form.parts {
        let bytes = js_sys::Uint8Array::from(part.file.bytes.as_slice());
        let chunks = js_sys::Array::of1(&bytes);

        let options = BlobPropertyBag::new();
        options.set_type(&part.file.content_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&chunks, &options)
            .map_err(js_error)?;

        data.append_with_blob_and_filename(&part.name, &blob, &part.file.file_name)
            .map_err(js_error)?;
    }

    Ok(data)
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let method = match req.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        let mut builder = RequestBuilder::new(&req.url).method(method);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match &req.body {
            None => builder.build(),
            Some(RequestBody::Json(json)) => builder.body(json.as_str()),
            Some(RequestBody::Multipart(form)) => builder.body(to_form_data(form)?),
        }
        .map_err(|e| ApiError::transport(e.to_string()))?;

        let res = request
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let status = res.status();
        let status_text = res.status_text();
        // 读取响应体失败时按空响应体处理，由上层回退到状态文本
        let body = res.text().await.unwrap_or_default();

        Ok(HttpResponse {
            status,
            status_text,
            body,
        })
    }
}
