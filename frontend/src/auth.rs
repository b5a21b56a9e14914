//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的守卫状态信号来检查认证与角色。

use crate::web::{BrowserStorage, FetchHttpClient};
use checkin::{ApiResult, CheckinApi, ClientConfig, GuardState, Session, SessionHandle, SessionStore};
use checkin_shared::{LoginResponse, User};
use leptos::prelude::*;
use std::sync::Arc;

/// 浏览器环境下的 API 客户端
pub type Api = CheckinApi<FetchHttpClient>;

/// 认证上下文
///
/// 包含会话快照信号和共享的 API 客户端，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话快照（只读）
    pub state: ReadSignal<Session>,
    set_state: WriteSignal<Session>,
    api: StoredValue<Api>,
    sessions: StoredValue<Arc<SessionStore<BrowserStorage>>>,
}

impl AuthContext {
    /// 创建认证上下文
    ///
    /// 会话句柄在这里创建一次，API 客户端与会话存储共享同一个句柄。
    pub fn new(config: ClientConfig) -> Self {
        let handle = SessionHandle::new();
        let api = CheckinApi::new(FetchHttpClient, config, handle.clone());
        let sessions = SessionStore::new(BrowserStorage, handle);

        let (state, set_state) = signal(Session::Anonymous);
        Self {
            state,
            set_state,
            api: StoredValue::new(api),
            sessions: StoredValue::new(Arc::new(sessions)),
        }
    }

    /// 获取守卫状态信号（用于路由服务注入）
    pub fn guard_state_signal(&self) -> Signal<GuardState> {
        let state = self.state;
        Signal::derive(move || state.with(GuardState::from_session))
    }

    pub fn api(&self) -> Api {
        self.api.get_value()
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user().cloned())
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// 初始化认证状态
///
/// 从 LocalStorage 恢复上次的会话，不向后端重新校验。
pub fn init_auth(ctx: &AuthContext) {
    let session = ctx.sessions.with_value(|s| s.rehydrate());
    ctx.set_state.set(session);
}

/// 登录并保存状态
///
/// 跳转由路由服务监听守卫状态变化后自动完成。
pub async fn login(ctx: AuthContext, identifier: String, password: String) -> ApiResult<LoginResponse> {
    let sessions = ctx.sessions.get_value();
    let api = ctx.api();

    let res = sessions.login(&api, &identifier, &password).await?;
    ctx.set_state.set(sessions.current());
    Ok(res)
}

/// 注销并清除状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    ctx.sessions.with_value(|s| s.logout());
    ctx.set_state.set(Session::Anonymous);
}
