use crate::auth::use_auth;
use crate::components::common::PageHeader;
use crate::web::router::Link;
use checkin::AppRoute;
use checkin::guard::{self, Access};
use leptos::prelude::*;

/// 首页：问候语和当前角色可进入的面板
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let guard_state = auth.guard_state_signal();

    let greeting = move || {
        auth.user()
            .map(|u| format!("Welcome, {}", u.name))
            .unwrap_or_default()
    };
    let role = move || auth.user().map(|u| u.role.to_string()).unwrap_or_default();
    let can_open = move |route: AppRoute| guard::check(&route, guard_state.get()) == Access::Allow;

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-5xl mx-auto space-y-8">
                <PageHeader title="Dashboard" />

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h2 class="card-title">{greeting}</h2>
                        <p class="text-base-content/70">
                            "Signed in as " <span class="badge badge-primary">{role}</span>
                        </p>
                    </div>
                </div>

                <div class="grid gap-4 md:grid-cols-2">
                    <Show when=move || can_open(AppRoute::Admin)>
                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <h3 class="card-title">"Admin Dashboard"</h3>
                                <p>"Participants, barcodes, imports, entry logs and papers."</p>
                                <div class="card-actions justify-end">
                                    <Link to=AppRoute::Admin class="btn btn-primary">"Open"</Link>
                                </div>
                            </div>
                        </div>
                    </Show>
                    <Show when=move || can_open(AppRoute::Staff)>
                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <h3 class="card-title">"Staff Dashboard"</h3>
                                <p>"Scan barcodes and mark venue entries."</p>
                                <div class="card-actions justify-end">
                                    <Link to=AppRoute::Staff class="btn btn-secondary">"Open"</Link>
                                </div>
                            </div>
                        </div>
                    </Show>
                </div>
            </div>
        </div>
    }
}
