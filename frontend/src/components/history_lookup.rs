use crate::auth::use_auth;
use crate::components::common::{NoticeBanner, use_request_scope};
use crate::components::mark_entry_panel::EntryTable;
use checkin::desk::HistoryDesk;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 按条码查询入场历史
#[component]
pub fn HistoryLookup() -> impl IntoView {
    let auth = use_auth();
    let scope = use_request_scope();
    let desk = RwSignal::new(HistoryDesk::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(Ok(barcode)) = desk.try_update(HistoryDesk::begin) else {
            return;
        };

        let api = auth.api();
        let scope = scope.clone();
        spawn_local(async move {
            if let Some(result) = scope.run(api.entry_history(&barcode)).await {
                desk.update(|d| d.finish(result));
            }
        });
    };

    let participant = move || {
        desk.with(|d| {
            d.history
                .as_ref()
                .map(|h| (h.participant.display_name(), h.participant.reference_no.clone()))
        })
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body gap-4">
                <h3 class="card-title">"Entry History"</h3>
                <form class="join w-full" on:submit=on_submit>
                    <input
                        type="text"
                        placeholder="Barcode"
                        class="input input-bordered join-item w-full font-mono"
                        prop:value=move || desk.with(|d| d.barcode.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            desk.update(|d| d.barcode = value);
                        }
                    />
                    <button class="btn btn-primary join-item" disabled=move || desk.with(|d| d.loading)>
                        "Look up"
                    </button>
                </form>

                <NoticeBanner notice=Signal::derive(move || desk.with(|d| d.notice.clone())) />

                {move || participant().map(|(name, reference)| view! {
                    <div class="text-sm">
                        <span class="font-bold">{name}</span>
                        " · "
                        <span class="font-mono">{reference}</span>
                    </div>
                })}

                <Show when=move || desk.with(|d| d.history.as_ref().is_some_and(|h| !h.entries.is_empty()))>
                    <EntryTable entries=Signal::derive(move || {
                        desk.with(|d| d.history.as_ref().map(|h| h.entries.clone()).unwrap_or_default())
                    }) />
                </Show>
            </div>
        </div>
    }
}
