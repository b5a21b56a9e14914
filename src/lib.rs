//! 会议签到客户端核心
//!
//! 与平台无关的逻辑层：HTTP 适配、会话、路由守卫、类型化 API、
//! 各页面的视图模型以及 CSV 导出。浏览器相关的实现（fetch、localStorage、
//! DOM）由 `checkin-frontend` 通过 [`HttpClient`] 与 [`KeyValueStore`] 注入。

pub mod api;
pub mod config;
pub mod desk;
pub mod error;
pub mod export;
pub mod guard;
pub mod request;
pub mod route;
pub mod scope;
pub mod session;

pub use api::CheckinApi;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use guard::{Access, GuardState};
pub use request::{HttpClient, HttpRequest, HttpResponse, MultipartForm, RequestBody, UploadFile};
pub use route::AppRoute;
pub use scope::RequestScope;
pub use session::{KeyValueStore, MemoryStore, Session, SessionHandle, SessionStore};
