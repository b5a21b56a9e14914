//! 会议签到前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `checkin`: 与平台无关的核心（API、会话、守卫、视图模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `components`: UI 组件层

mod auth;
mod components {
    pub mod admin_dashboard;
    pub mod common;
    pub mod dashboard;
    pub mod history_lookup;
    pub mod login;
    pub mod mark_entry_panel;
    pub mod staff_dashboard;
}
pub mod logger;

use crate::auth::{AuthContext, init_auth};
use crate::components::admin_dashboard::AdminDashboardPage;
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::components::staff_dashboard::StaffDashboardPage;
use checkin::{AppRoute, ClientConfig};

use leptos::prelude::*;

// 浏览器运行时适配层
// fetch 传输、LocalStorage、History 路由与文件读写都集中在此模块。
pub(crate) mod web {
    pub mod file;
    mod http;
    pub mod router;
    mod storage;

    pub use http::FetchHttpClient;
    pub use storage::BrowserStorage;
}

use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。守卫已将未知路径重定向，
/// `NotFound` 分支只在重定向生效前短暂出现。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Home => view! { <DashboardPage /> }.into_any(),
        AppRoute::Admin => view! { <AdminDashboardPage /> }.into_any(),
        AppRoute::Staff => view! { <StaffDashboardPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文（组合根：会话句柄与 API 客户端在此创建）
    let auth_ctx = AuthContext::new(ClientConfig::from_env());
    provide_context(auth_ctx);

    // 2. 从 LocalStorage 恢复会话
    init_auth(&auth_ctx);

    // 3. 获取守卫状态信号，用于注入路由服务（解耦！）
    let guard_state = auth_ctx.guard_state_signal();

    view! {
        // 4. 路由器组件：注入守卫状态实现角色守卫
        <Router guard_state=guard_state>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
