//! 客户端配置
//!
//! 浏览器中没有运行时环境变量，后端地址在编译期通过
//! `CHECKIN_API_URL` 注入，未设置时回退到本地开发地址。

/// 默认后端地址（本地开发）
pub const DEFAULT_API_URL: &str = "http://localhost:4000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::resolve(Some(&base_url.into()))
    }

    /// 读取编译期注入的 `CHECKIN_API_URL`
    pub fn from_env() -> Self {
        Self::resolve(option_env!("CHECKIN_API_URL"))
    }

    /// 空值或空白值使用默认地址；去掉末尾的 `/`
    pub fn resolve(value: Option<&str>) -> Self {
        let base_url = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        Self { base_url }
    }

    /// 拼接完整请求地址
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::resolve(None)
    }
}
