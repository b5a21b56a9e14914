use crate::auth::{logout, use_auth};
use checkin::RequestScope;
use checkin::desk::{Notice, Tone};
use leptos::prelude::*;

/// 为当前视图创建请求作用域，视图销毁时自动取消挂起的请求
pub fn use_request_scope() -> RequestScope {
    let scope = RequestScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.cancel()
    });
    scope
}

/// 行内提示
#[component]
pub fn NoticeBanner(#[prop(into)] notice: Signal<Option<Notice>>) -> impl IntoView {
    move || {
        notice.get().map(|n| {
            let class = match n.tone {
                Tone::Success => "alert alert-success text-sm py-2",
                Tone::Error => "alert alert-error text-sm py-2",
                Tone::Info => "alert alert-info text-sm py-2",
            };
            view! {
                <div role="alert" class=class>
                    <span>{n.message}</span>
                </div>
            }
        })
    }
}

/// 页面顶栏：标题、当前用户与注销按钮
#[component]
pub fn PageHeader(#[prop(into)] title: String) -> impl IntoView {
    let auth = use_auth();

    let user_label = move || {
        auth.user()
            .map(|u| format!("{} ({})", u.name, u.role))
            .unwrap_or_default()
    };

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl">
            <div class="flex-1 gap-2">
                <span class="btn btn-ghost text-xl">{title}</span>
                <span class="badge badge-neutral hidden md:inline-flex">{user_label}</span>
            </div>
            <div class="flex-none gap-2">
                <button on:click=move |_| logout(&auth) class="btn btn-outline btn-error gap-2">
                    "Sign out"
                </button>
            </div>
        </div>
    }
}

/// 加载中占位
#[component]
pub fn Spinner(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <span class="loading loading-spinner loading-md"></span>
        {label.map(|l| format!(" {}", l))}
    }
}
