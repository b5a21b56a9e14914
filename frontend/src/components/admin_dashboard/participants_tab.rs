use crate::auth::use_auth;
use crate::components::common::{NoticeBanner, Spinner, use_request_scope};
use checkin::desk::Notice;
use checkin_shared::Participant;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 参会者名单
#[component]
pub fn ParticipantsTab() -> impl IntoView {
    let auth = use_auth();
    let scope = use_request_scope();

    let (participants, set_participants) = signal(Vec::<Participant>::new());
    let (loading, set_loading) = signal(false);
    let (notice, set_notice) = signal(Option::<Notice>::None);

    let load = move || {
        let api = auth.api();
        let scope = scope.clone();
        set_loading.set(true);
        set_notice.set(None);
        spawn_local(async move {
            let Some(result) = scope.run(api.list_participants()).await else {
                return;
            };
            match result {
                Ok(list) => set_participants.set(list),
                Err(e) => set_notice.set(Some(Notice::error(format!("Failed to load participants: {}", e)))),
            }
            set_loading.set(false);
        });
    };

    // 初始加载
    let initial = load.clone();
    Effect::new(move |_| initial());

    let total = move || participants.with(|p| p.len());
    let with_barcode = move || participants.with(|p| p.iter().filter(|x| x.has_barcode()).count());

    view! {
        <div class="space-y-6">
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"Participants"</div>
                    <div class="stat-value text-primary">{total}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Barcodes Assigned"</div>
                    <div class="stat-value text-success">{with_barcode}</div>
                    <div class="stat-desc">{move || format!("{} pending", total() - with_barcode())}</div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <h3 class="card-title">"All Participants"</h3>
                        <button on:click=move |_| load() disabled=move || loading.get() class="btn btn-ghost btn-sm">
                            "Refresh"
                        </button>
                    </div>
                    <div class="px-6">
                        <NoticeBanner notice=notice />
                    </div>

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Reference No"</th>
                                    <th>"Name"</th>
                                    <th>"Email"</th>
                                    <th class="hidden md:table-cell">"Institution"</th>
                                    <th>"Barcode"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || loading.get() && total() == 0>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            <Spinner label="Loading..." />
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || !loading.get() && total() == 0>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            "No participants imported yet."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || participants.get()
                                    key=|p| p.reference_no.clone()
                                    children=move |p| {
                                        let name = p.display_name();
                                        let barcode = p.barcode.clone().filter(|b| !b.is_empty());
                                        view! {
                                            <tr>
                                                <td class="font-mono text-sm">{p.reference_no}</td>
                                                <td>{name}</td>
                                                <td class="text-sm">{p.email}</td>
                                                <td class="hidden md:table-cell text-sm opacity-70">
                                                    {p.institution.unwrap_or_else(|| "-".to_string())}
                                                </td>
                                                <td>
                                                    {match barcode {
                                                        Some(b) => view! { <span class="badge badge-success font-mono">{b}</span> }.into_any(),
                                                        None => view! { <span class="badge badge-ghost">"Not assigned"</span> }.into_any(),
                                                    }}
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </div>
    }
}
