//! 文件读写
//!
//! - 读取 `<input type="file">` 选中的文件
//! - 将生成的文本内容作为文件下载

use checkin::{ApiError, ApiResult, UploadFile};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, File, HtmlAnchorElement, HtmlInputElement, Url};

fn js_error(e: wasm_bindgen::JsValue) -> ApiError {
    ApiError::file(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// 取出文件输入框中的第一个文件
pub fn selected_file(input: &HtmlInputElement) -> Option<File> {
    input.files()?.get(0)
}

/// 将浏览器文件读入内存
pub async fn read_file(file: &File) -> ApiResult<UploadFile> {
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(js_error)?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let content_type = match file.type_() {
        t if t.is_empty() => "application/octet-stream".to_string(),
        t => t,
    };

    Ok(UploadFile::new(file.name(), content_type, bytes))
}

/// 触发浏览器下载
pub fn download_text(file_name: &str, mime: &str, content: &str) -> ApiResult<()> {
    let parts = js_sys::Array::of1(&content.into());
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_error)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ApiError::file("无法获取 document 对象"))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| ApiError::file("无法创建下载链接"))?;

    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url).map_err(js_error)?;
    log::info!("[File] 已导出 {}", file_name);
    Ok(())
}
