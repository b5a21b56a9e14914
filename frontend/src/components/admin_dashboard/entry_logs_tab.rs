use crate::auth::use_auth;
use crate::components::common::{NoticeBanner, use_request_scope};
use crate::components::mark_entry_panel::EntryTable;
use crate::web::file::download_text;
use checkin::desk::{ALL_VENUES, EntryLogDesk, Notice};
use checkin::export;
use checkin_shared::Venue;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 入场日志、统计与 CSV 导出
#[component]
pub fn EntryLogsTab() -> impl IntoView {
    let auth = use_auth();
    let scope = use_request_scope();
    let desk = RwSignal::new(EntryLogDesk::new());

    let load = move || {
        let filter = desk.try_update(|d| d.begin()).unwrap_or_default();
        let api = auth.api();
        let scope = scope.clone();
        spawn_local(async move {
            let both = async { futures::join!(api.list_entries(&filter), api.entry_stats()) };
            let Some((entries, stats)) = scope.run(both).await else {
                return;
            };
            desk.update(|d| {
                d.finish_entries(entries);
                d.finish_stats(stats);
            });
        });
    };

    let initial = load.clone();
    Effect::new(move |_| initial());

    let apply = load.clone();
    let clear = load.clone();

    let on_export = move |_: leptos::ev::MouseEvent| {
        let csv = desk.with(|d| d.export_csv());
        let file_name = export::file_name(chrono::Utc::now().date_naive());
        let outcome = csv
            .map_err(|e| e.to_string())
            .and_then(|content| {
                download_text(&file_name, "text/csv;charset=utf-8", &content).map_err(|e| e.to_string())
            });
        if let Err(e) = outcome {
            log::warn!("[EntryLog] 导出失败: {}", e);
            desk.update(|d| d.notice = Some(Notice::error(format!("Export failed: {}", e))));
        }
    };

    let stats = move || desk.with(|d| d.stats.clone());

    view! {
        <div class="space-y-6">
            {move || stats().map(|s| view! {
                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Total Entries"</div>
                        <div class="stat-value text-primary">{s.total_entries}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Unique Participants"</div>
                        <div class="stat-value text-secondary">{s.unique_participants}</div>
                    </div>
                    {s.entries_by_venue.into_iter().map(|v| view! {
                        <div class="stat">
                            <div class="stat-title">{v.venue.as_str()}</div>
                            <div class="stat-value text-2xl">{v.count}</div>
                        </div>
                    }).collect_view()}
                </div>
            })}

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body gap-4">
                    <div class="flex flex-wrap items-end gap-4">
                        <div class="form-control">
                            <label class="label"><span class="label-text">"Venue"</span></label>
                            <select
                                class="select select-bordered"
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    desk.update(|d| d.set_venue(&value));
                                }
                            >
                                <option value=ALL_VENUES selected=move || desk.with(|d| d.venue.is_none())>
                                    "All Venues"
                                </option>
                                {Venue::ALL.iter().map(|v| {
                                    let v = *v;
                                    view! {
                                        <option value=v.as_str() selected=move || desk.with(|d| d.venue == Some(v))>
                                            {v.as_str()}
                                        </option>
                                    }
                                }).collect_view()}
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"Date"</span></label>
                            <input
                                type="date"
                                class="input input-bordered"
                                prop:value=move || desk.with(|d| d.date_value())
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    desk.update(|d| d.set_date(&value));
                                }
                            />
                        </div>
                        <button class="btn btn-primary" disabled=move || desk.with(|d| d.loading) on:click=move |_| apply()>
                            "Apply"
                        </button>
                        <Show when=move || desk.with(|d| d.has_filters())>
                            <button
                                class="btn btn-ghost"
                                on:click={
                                    let clear = clear.clone();
                                    move |_| {
                                        desk.update(|d| d.clear_filters());
                                        clear();
                                    }
                                }
                            >
                                "Clear Filters"
                            </button>
                        </Show>
                        <div class="flex-1"></div>
                        <button class="btn btn-outline" disabled=move || desk.with(|d| !d.can_export()) on:click=on_export>
                            "Export CSV"
                        </button>
                    </div>

                    <NoticeBanner notice=Signal::derive(move || desk.with(|d| d.notice.clone())) />

                    <Show
                        when=move || desk.with(|d| !d.entries.is_empty())
                        fallback=move || view! {
                            <p class="text-center py-8 text-base-content/50">
                                {move || if desk.with(|d| d.loading) { "Loading..." } else { "No entries found." }}
                            </p>
                        }
                    >
                        <EntryTable
                            entries=Signal::derive(move || desk.with(|d| d.entries.clone()))
                            show_participant=true
                        />
                    </Show>
                </div>
            </div>
        </div>
    }
}
