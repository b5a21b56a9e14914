use crate::auth::use_auth;
use crate::components::common::use_request_scope;
use checkin::desk::MarkEntryDesk;
use checkin_shared::{Entry, Venue};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 扫码入场面板
///
/// 管理员面板与工作人员面板共用。
#[component]
pub fn MarkEntryPanel() -> impl IntoView {
    let auth = use_auth();
    let scope = use_request_scope();
    let desk = RwSignal::new(MarkEntryDesk::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(Ok((barcode, venue))) = desk.try_update(MarkEntryDesk::begin) else {
            return;
        };

        let api = auth.api();
        let scope = scope.clone();
        spawn_local(async move {
            let Some(result) = scope.run(api.mark_entry(&barcode, venue)).await else {
                return;
            };
            let follow_up = desk.try_update(|d| d.finish(&barcode, result)).flatten();

            if let Some(barcode) = follow_up {
                if let Some(history) = scope.run(api.entry_history(&barcode)).await {
                    desk.update(|d| d.apply_history(history));
                }
            }
        });
    };

    let on_venue = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        if let Ok(venue) = value.parse::<Venue>() {
            desk.update(|d| d.venue = venue);
        }
    };

    let outcome = move || desk.with(|d| d.outcome.clone());
    let loading = move || desk.with(|d| d.loading);

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body gap-4" on:submit=on_submit>
                <h3 class="card-title">"Mark Entry"</h3>

                <div class="form-control">
                    <label class="label" for="venue">
                        <span class="label-text">"Venue"</span>
                    </label>
                    <select id="venue" class="select select-bordered" on:change=on_venue>
                        {Venue::ALL
                            .iter()
                            .map(|v| {
                                let v = *v;
                                view! {
                                    <option
                                        value=v.as_str()
                                        selected=move || desk.with(|d| d.venue == v)
                                    >
                                        {v.as_str()}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </div>

                <div class="form-control">
                    <label class="label" for="barcode">
                        <span class="label-text">"Barcode"</span>
                    </label>
                    <input
                        id="barcode"
                        type="text"
                        autofocus
                        placeholder="Scan or type a barcode"
                        class="input input-bordered font-mono"
                        prop:value=move || desk.with(|d| d.barcode_scanned.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            desk.update(|d| d.barcode_scanned = value);
                        }
                    />
                </div>

                <button class="btn btn-primary" disabled=loading>
                    {move || if loading() {
                        view! { <span class="loading loading-spinner"></span> "Marking..." }.into_any()
                    } else {
                        "Mark Entry".into_any()
                    }}
                </button>

                {move || outcome().map(|o| {
                    let class = if o.success { "alert alert-success" } else { "alert alert-error" };
                    let who = o.participant.map(|p| format!("{} · {}", p.display_name(), p.reference_no));
                    view! {
                        <div role="alert" class=class>
                            <div>
                                <div class="font-bold">{o.message}</div>
                                {who.map(|w| view! { <div class="text-sm">{w}</div> })}
                            </div>
                        </div>
                    }
                })}

                <Show when=move || desk.with(|d| !d.history.is_empty())>
                    <EntryTable entries=Signal::derive(move || desk.with(|d| d.history.clone())) />
                </Show>
            </form>
        </div>
    }
}

/// 入场记录表
#[component]
pub fn EntryTable(
    #[prop(into)] entries: Signal<Vec<Entry>>,
    #[prop(optional)] show_participant: bool,
) -> impl IntoView {
    view! {
        <div class="overflow-x-auto w-full">
            <table class="table table-zebra table-sm w-full">
                <thead>
                    <tr>
                        {show_participant.then(|| view! {
                            <th>"Participant"</th>
                            <th>"Reference No"</th>
                        })}
                        <th>"Venue"</th>
                        <th>"Time"</th>
                        <th>"Marked By"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || entries.get()
                        key=|e| e.id.to_string()
                        children=move |entry| {
                            let participant = entry.participant.as_ref();
                            let name = participant.map(|p| p.display_name()).unwrap_or_else(|| "-".to_string());
                            let reference = participant.map(|p| p.reference_no.clone()).unwrap_or_else(|| "-".to_string());
                            view! {
                                <tr>
                                    {show_participant.then(move || view! {
                                        <td>{name}</td>
                                        <td class="font-mono">{reference}</td>
                                    })}
                                    <td>{entry.venue.as_str()}</td>
                                    <td class="font-mono text-xs">{entry.display_time()}</td>
                                    <td>{entry.staff_id.to_string()}</td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </div>
    }
}
