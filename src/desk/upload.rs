use crate::error::{ApiError, ApiResult};
use crate::request::UploadFile;
use checkin_shared::MessageResponse;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Done(String),
    Failed(String),
}

impl UploadStatus {
    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadStatus::Uploading)
    }
}

/// 文件导入台（参会者 Excel / 论文表）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadDesk {
    pub file: Option<UploadFile>,
    pub status: UploadStatus,
}

impl UploadDesk {
    pub fn new() -> Self {
        Self::default()
    }

    /// 选择新文件会清除上一次的结果
    pub fn select(&mut self, file: Option<UploadFile>) {
        self.file = file;
        self.status = UploadStatus::Idle;
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.file_name.as_str())
    }

    pub fn begin(&mut self) -> ApiResult<UploadFile> {
        if self.status.is_uploading() {
            return Err(ApiError::validation("Upload already in progress"));
        }
        let Some(file) = self.file.clone() else {
            let err = ApiError::validation("Please select a file");
            self.status = UploadStatus::Failed(err.message().to_string());
            return Err(err);
        };
        self.status = UploadStatus::Uploading;
        Ok(file)
    }

    /// 成功后清空已选文件，失败时保留以便重试
    pub fn finish(&mut self, result: ApiResult<MessageResponse>) {
        match result {
            Ok(res) => {
                let message = if res.message.trim().is_empty() {
                    "Upload complete".to_string()
                } else {
                    res.message
                };
                log::info!("[Upload] {}", message);
                self.file = None;
                self.status = UploadStatus::Done(message);
            }
            Err(e) => {
                log::warn!("[Upload] 失败: {}", e);
                self.status = UploadStatus::Failed(e.message().to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CheckinApi;
    use crate::config::ClientConfig;
    use crate::request::{MockHttpClient, RequestBody};
    use crate::session::SessionHandle;
    use serde_json::json;

    const BASE: &str = "http://test.local";

    fn workbook() -> UploadFile {
        UploadFile::new("delegates.xlsx", "application/octet-stream", vec![1, 2, 3])
    }

    #[test]
    fn missing_file_is_rejected() {
        let mut desk = UploadDesk::new();
        assert!(desk.begin().unwrap_err().is_validation());
        assert_eq!(desk.status, UploadStatus::Failed("Please select a file".to_string()));
    }

    #[tokio::test]
    async fn successful_import_reports_backend_message() {
        let api = CheckinApi::new(MockHttpClient::new(), ClientConfig::new(BASE), SessionHandle::new());
        api.http().mock_response(
            &format!("{BASE}/participants/upload-excel"),
            200,
            json!({ "message": "Imported 42 participants" }),
        );

        let mut desk = UploadDesk::new();
        desk.select(Some(workbook()));
        assert_eq!(desk.file_name(), Some("delegates.xlsx"));

        let file = desk.begin().unwrap();
        assert!(desk.status.is_uploading());
        assert!(desk.begin().is_err());
        desk.finish(api.upload_participants(file).await);

        assert_eq!(desk.status, UploadStatus::Done("Imported 42 participants".to_string()));
        assert!(desk.file.is_none());

        let req = api.http().last_request().unwrap();
        match req.body {
            Some(RequestBody::Multipart(form)) => {
                assert_eq!(form.parts.len(), 1);
                assert_eq!(form.parts[0].name, "file");
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[test]
    fn failed_import_keeps_file_for_retry() {
        let mut desk = UploadDesk::new();
        desk.select(Some(workbook()));
        desk.begin().unwrap();
        desk.finish(Err(ApiError::backend(400, "Invalid file format")));

        assert_eq!(desk.status, UploadStatus::Failed("Invalid file format".to_string()));
        assert!(desk.file.is_some());

        desk.select(None);
        assert_eq!(desk.status, UploadStatus::Idle);
    }
}
