use thiserror::Error;

// =========================================================
// 错误类别
// =========================================================

/// 错误类别
///
/// 区分错误来源，视图据此决定提示方式（行内提示 / 横幅）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 必填字段为空，在发出请求之前拦截
    Validation,
    /// 网络或传输层失败，原样透传
    Transport,
    /// 后端返回非 2xx，消息已规范化为 `{error}` 中的文本
    Backend,
    /// 成功响应体与预期结构不符
    Decode,
    /// 本地键值存储不可用
    Storage,
    /// 浏览器文件读取或下载失败
    File,
}

impl ErrorKind {
    /// 机器可读的错误代码
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Transport => "TRANSPORT",
            ErrorKind::Backend => "BACKEND",
            ErrorKind::Decode => "DECODE",
            ErrorKind::Storage => "STORAGE",
            ErrorKind::File => "FILE",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端统一错误类型
///
/// `Display` 只输出 `message`，可直接展示给用户。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    /// 后端响应的 HTTP 状态码（仅 `Backend` 类别存在）
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    // --- Convenience constructors ---

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Backend,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    pub fn file(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::File, message)
    }

    // --- Accessors ---

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    /// 后端拒绝了凭据（如令牌过期）
    ///
    /// 客户端不会因此自动注销，由调用方决定如何提示。
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Backend && self.status == Some(401)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::decode(e.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = ApiError::backend(409, "Already entered");
        assert_eq!(err.to_string(), "Already entered");
        assert_eq!(err.error_code(), "BACKEND");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn unauthorized_only_for_backend_401() {
        assert!(ApiError::backend(401, "jwt expired").is_unauthorized());
        assert!(!ApiError::transport("401").is_unauthorized());
    }

    #[test]
    fn file_failures_have_their_own_code() {
        let err = ApiError::file("NotReadableError");
        assert_eq!(err.kind, ErrorKind::File);
        assert_eq!(err.error_code(), "FILE");
        assert_ne!(err.kind, ErrorKind::Storage);
    }
}
