//! 会话模块
//!
//! 会话由组合根（应用顶层）创建一次，通过 [`SessionHandle`] 显式传递给
//! API 客户端和会话存储，不使用全局可变单例。
//!
//! 令牌和用户资料总是成对设置、成对清除。

use crate::api::CheckinApi;
use crate::error::{ApiError, ApiResult};
use crate::request::HttpClient;
use checkin_shared::protocol::LoginRequest;
use checkin_shared::{LoginResponse, Role, STORAGE_TOKEN_KEY, STORAGE_USER_KEY, User};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

// =========================================================
// 会话状态
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { token: String, user: User },
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            Session::Anonymous => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            Session::Anonymous => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }
}

/// 共享会话句柄
///
/// 单线程环境下仅由 login / logout / rehydrate 写入，请求期间只读。
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn token(&self) -> Option<String> {
        self.snapshot().token().map(str::to_string)
    }

    pub fn user(&self) -> Option<User> {
        self.snapshot().user().cloned()
    }

    fn replace(&self, session: Session) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session;
    }
}

// =========================================================
// 持久化存储抽象
// =========================================================

/// 同步键值存储（浏览器中对应 LocalStorage）
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    /// 返回是否写入成功
    fn set(&self, key: &str, value: &str) -> bool;
    /// 返回是否删除成功
    fn delete(&self, key: &str) -> bool;
}

/// 内存键值存储
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.data
            .lock()
            .map(|mut d| d.insert(key.to_string(), value.to_string()))
            .is_ok()
    }

    fn delete(&self, key: &str) -> bool {
        self.data.lock().map(|mut d| d.remove(key)).is_ok()
    }
}

// =========================================================
// 会话存储
// =========================================================

pub struct SessionStore<S: KeyValueStore> {
    storage: S,
    handle: SessionHandle,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S, handle: SessionHandle) -> Self {
        Self { storage, handle }
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn current(&self) -> Session {
        self.handle.snapshot()
    }

    /// 启动时从持久化存储恢复会话
    ///
    /// 不向后端重新校验令牌。令牌与用户资料不完整或无法解析时视为未登录，
    /// 并清除残留的键。
    pub fn rehydrate(&self) -> Session {
        let token = self.storage.get(STORAGE_TOKEN_KEY).filter(|t| !t.is_empty());
        let user = self
            .storage
            .get(STORAGE_USER_KEY)
            .and_then(|raw| match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("[Session] 存储的用户资料无法解析: {}", e);
                    None
                }
            });

        let session = match (token, user) {
            (Some(token), Some(user)) => {
                log::info!("[Session] 已恢复会话: {} ({})", user.name, user.role);
                Session::Authenticated { token, user }
            }
            (None, None) => Session::Anonymous,
            _ => {
                log::warn!("[Session] 会话数据不完整，已清除");
                self.clear_storage();
                Session::Anonymous
            }
        };

        self.handle.replace(session.clone());
        session
    }

    /// 登录
    ///
    /// 成功后写入持久化存储和共享句柄，并返回后端响应（含角色），
    /// 由调用方决定跳转目标。失败时不修改任何状态。
    pub async fn login<C: HttpClient>(
        &self,
        api: &CheckinApi<C>,
        identifier: &str,
        password: &str,
    ) -> ApiResult<LoginResponse> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(ApiError::validation("Please enter your staff ID or email and password"));
        }

        let res = api
            .call(&LoginRequest {
                identifier: identifier.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.persist(&res);
        self.handle.replace(Session::Authenticated {
            token: res.token.clone(),
            user: res.user.clone(),
        });
        log::info!("[Session] 登录成功: {} ({})", res.user.name, res.user.role);

        Ok(res)
    }

    /// 注销：无条件清除持久化存储和内存状态，可重复调用
    pub fn logout(&self) {
        self.clear_storage();
        self.handle.replace(Session::Anonymous);
        log::info!("[Session] 已注销");
    }

    fn persist(&self, res: &LoginResponse) {
        let user_json = match serde_json::to_string(&res.user) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("[Session] 用户资料序列化失败: {}", e);
                return;
            }
        };
        // 存储失败不影响本次会话，只是刷新后需要重新登录
        if !self.storage.set(STORAGE_TOKEN_KEY, &res.token)
            || !self.storage.set(STORAGE_USER_KEY, &user_json)
        {
            log::warn!("[Session] {}", ApiError::storage("无法写入本地存储"));
        }
    }

    fn clear_storage(&self) {
        self.storage.delete(STORAGE_TOKEN_KEY);
        self.storage.delete(STORAGE_USER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ErrorKind;
    use crate::guard::{Access, GuardState};
    use crate::request::MockHttpClient;
    use crate::route::AppRoute;
    use serde_json::json;

    const LOGIN_URL: &str = "http://test.local/auth/login";

    fn setup() -> (CheckinApi<MockHttpClient>, SessionStore<MemoryStore>) {
        let handle = SessionHandle::new();
        let api = CheckinApi::new(
            MockHttpClient::new(),
            ClientConfig::new("http://test.local"),
            handle.clone(),
        );
        let store = SessionStore::new(MemoryStore::new(), handle);
        (api, store)
    }

    fn mock_admin_login(api: &CheckinApi<MockHttpClient>) {
        api.http().mock_response(
            LOGIN_URL,
            200,
            json!({ "token": "abc", "user": { "name": "A", "role": "ADMIN" } }),
        );
    }

    #[tokio::test]
    async fn login_persists_token_and_user() {
        let (api, store) = setup();
        mock_admin_login(&api);

        let res = store.login(&api, "  admin@x.com ", "secret").await.unwrap();
        assert_eq!(res.user.role, Role::Admin);

        assert_eq!(store.storage().get(STORAGE_TOKEN_KEY).as_deref(), Some("abc"));
        let stored: User =
            serde_json::from_str(&store.storage().get(STORAGE_USER_KEY).unwrap()).unwrap();
        assert_eq!(stored.name, "A");
        assert_eq!(store.handle().token().as_deref(), Some("abc"));

        // 标识符在发送前被去除首尾空白
        let body = match api.http().last_request().unwrap().body {
            Some(crate::request::RequestBody::Json(body)) => body,
            other => panic!("unexpected body: {:?}", other),
        };
        let sent: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(sent, json!({ "identifier": "admin@x.com", "password": "secret" }));
    }

    #[tokio::test]
    async fn failed_login_leaves_state_untouched() {
        let (api, store) = setup();
        api.http()
            .mock_response(LOGIN_URL, 401, json!({ "error": "Invalid credentials" }));

        let err = store.login(&api, "admin@x.com", "wrong").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Backend);
        assert_eq!(err.message, "Invalid credentials");
        assert!(store.storage().is_empty());
        assert_eq!(store.current(), Session::Anonymous);
    }

    #[tokio::test]
    async fn empty_credentials_skip_the_network() {
        let (api, store) = setup();

        let err = store.login(&api, "   ", "secret").await.unwrap_err();
        assert!(err.is_validation());
        let err = store.login(&api, "admin@x.com", "").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(api.http().request_count(), 0);
    }

    #[tokio::test]
    async fn login_then_logout_restores_empty_storage() {
        let (api, store) = setup();
        mock_admin_login(&api);

        store.login(&api, "admin@x.com", "secret").await.unwrap();
        store.logout();

        assert!(store.storage().get(STORAGE_TOKEN_KEY).is_none());
        assert!(store.storage().get(STORAGE_USER_KEY).is_none());
        assert_eq!(store.current(), Session::Anonymous);

        // 幂等
        store.logout();
        assert!(store.storage().is_empty());
    }

    #[tokio::test]
    async fn rehydrated_session_matches_fresh_login() {
        let (api, store) = setup();
        mock_admin_login(&api);
        store.login(&api, "admin@x.com", "secret").await.unwrap();
        let fresh = GuardState::from_session(&store.current());

        // 模拟页面刷新：同一份存储，新的内存句柄
        let reloaded = SessionStore::new(store.storage().clone(), SessionHandle::new());
        let restored = reloaded.rehydrate();
        let restored_state = GuardState::from_session(&restored);

        assert_eq!(restored_state, fresh);
        for route in [AppRoute::Login, AppRoute::Home, AppRoute::Admin, AppRoute::Staff] {
            assert_eq!(
                crate::guard::check(&route, fresh),
                crate::guard::check(&route, restored_state)
            );
        }
        assert_eq!(crate::guard::check(&AppRoute::Admin, restored_state), Access::Allow);
    }

    #[test]
    fn partial_storage_is_purged_on_rehydrate() {
        let storage = MemoryStore::new();
        storage.set(STORAGE_TOKEN_KEY, "orphan");
        let store = SessionStore::new(storage, SessionHandle::new());

        assert_eq!(store.rehydrate(), Session::Anonymous);
        assert!(store.storage().is_empty());
    }

    #[test]
    fn corrupt_user_profile_is_treated_as_logged_out() {
        let storage = MemoryStore::new();
        storage.set(STORAGE_TOKEN_KEY, "abc");
        storage.set(STORAGE_USER_KEY, "{not json");
        let store = SessionStore::new(storage, SessionHandle::new());

        assert!(!store.rehydrate().is_authenticated());
        assert!(store.handle().token().is_none());
        assert!(store.storage().is_empty());
    }
}
