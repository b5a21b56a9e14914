//! 路由守卫
//!
//! 纯函数：只依据内存中的会话状态决定放行或重定向，不发起任何网络请求。

use crate::route::AppRoute;
use crate::session::Session;
use checkin_shared::Role;

/// 守卫可观察到的认证状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Unauthenticated,
    Authenticated(Role),
}

impl GuardState {
    pub fn from_session(session: &Session) -> Self {
        match session.role() {
            Some(role) => Self::Authenticated(role),
            None => Self::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Authenticated(role) => Some(*role),
            Self::Unauthenticated => None,
        }
    }
}

/// 守卫决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(AppRoute),
}

/// **核心守卫逻辑**
pub fn check(route: &AppRoute, state: GuardState) -> Access {
    if *route == AppRoute::NotFound {
        return Access::Redirect(AppRoute::fallback_redirect());
    }

    match state {
        GuardState::Unauthenticated => {
            if route.requires_auth() {
                Access::Redirect(AppRoute::auth_failure_redirect())
            } else {
                Access::Allow
            }
        }
        GuardState::Authenticated(role) => {
            if route.should_redirect_when_authenticated() {
                return Access::Redirect(AppRoute::landing_for(role));
            }
            match route.required_roles() {
                Some(roles) if !roles.contains(&role) => {
                    Access::Redirect(AppRoute::fallback_redirect())
                }
                _ => Access::Allow,
            }
        }
    }
}

/// 跟随重定向直到得到可渲染的路由
pub fn resolve(route: AppRoute, state: GuardState) -> AppRoute {
    let mut current = route;
    // 重定向链最多为 NotFound -> Home -> Login
    for _ in 0..4 {
        match check(&current, state) {
            Access::Allow => return current,
            Access::Redirect(next) => {
                log::debug!("[Guard] {} -> {}", current, next);
                current = next;
            }
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: GuardState = GuardState::Authenticated(Role::Admin);
    const COORDINATOR: GuardState = GuardState::Authenticated(Role::Coordinator);

    #[test]
    fn unauthenticated_is_sent_to_login() {
        let state = GuardState::Unauthenticated;
        for route in [AppRoute::Home, AppRoute::Admin, AppRoute::Staff] {
            assert_eq!(check(&route, state), Access::Redirect(AppRoute::Login));
        }
        assert_eq!(check(&AppRoute::Login, state), Access::Allow);
        assert_eq!(resolve(AppRoute::NotFound, state), AppRoute::Login);
    }

    #[test]
    fn admin_reaches_every_dashboard_but_not_login() {
        assert_eq!(check(&AppRoute::Admin, ADMIN), Access::Allow);
        assert_eq!(check(&AppRoute::Staff, ADMIN), Access::Allow);
        assert_eq!(check(&AppRoute::Home, ADMIN), Access::Allow);
        assert_eq!(check(&AppRoute::Login, ADMIN), Access::Redirect(AppRoute::Admin));
    }

    #[test]
    fn coordinator_is_kept_out_of_admin() {
        assert_eq!(check(&AppRoute::Admin, COORDINATOR), Access::Redirect(AppRoute::Home));
        assert_eq!(check(&AppRoute::Staff, COORDINATOR), Access::Allow);
        assert_eq!(resolve(AppRoute::Login, COORDINATOR), AppRoute::Staff);
    }

    #[test]
    fn unknown_paths_fall_back_to_home() {
        assert_eq!(resolve(AppRoute::NotFound, COORDINATOR), AppRoute::Home);
        assert_eq!(resolve(AppRoute::from_path("/nope"), ADMIN), AppRoute::Home);
    }

    #[test]
    fn state_follows_session() {
        assert_eq!(
            GuardState::from_session(&Session::Anonymous),
            GuardState::Unauthenticated
        );
    }
}
