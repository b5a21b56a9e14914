//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问要求。

use checkin_shared::Role;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面
    Login,
    /// 首页 (需要认证，任意角色)
    #[default]
    Home,
    /// 管理员面板
    Admin,
    /// 工作人员工具 (协调员与管理员)
    Staff,
    /// 未知路径
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("/");
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/login" => Self::Login,
            "/admin" => Self::Admin,
            "/staff" => Self::Staff,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Home => "/",
            Self::Admin => "/admin",
            Self::Staff => "/staff",
            Self::NotFound => "/404",
        }
    }

    /// 定义该路由是否需要认证
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Home | Self::Admin | Self::Staff)
    }

    /// 允许访问的角色；`None` 表示任意已认证角色
    pub fn required_roles(&self) -> Option<&'static [Role]> {
        match self {
            Self::Admin => Some(&[Role::Admin]),
            Self::Staff => Some(&[Role::Coordinator, Role::Admin]),
            _ => None,
        }
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 角色不符或路径未知时的重定向目标
    pub fn fallback_redirect() -> Self {
        Self::Home
    }

    /// 登录成功后按角色决定的落地页
    pub fn landing_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Coordinator => Self::Staff,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_for_known_routes() {
        for route in [AppRoute::Login, AppRoute::Home, AppRoute::Admin, AppRoute::Staff] {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn trailing_slash_and_query_are_ignored() {
        assert_eq!(AppRoute::from_path("/admin/"), AppRoute::Admin);
        assert_eq!(AppRoute::from_path("/staff?tab=history"), AppRoute::Staff);
        assert_eq!(AppRoute::from_path(""), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::NotFound);
    }
}
