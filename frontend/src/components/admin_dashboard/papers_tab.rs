use super::upload_form::UploadForm;
use crate::auth::use_auth;
use crate::components::common::{NoticeBanner, use_request_scope};
use checkin::desk::PaperDesk;
use checkin_shared::protocol::UploadTarget;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 论文目录
#[component]
pub fn PapersTab() -> impl IntoView {
    let auth = use_auth();
    let scope = use_request_scope();
    let desk = RwSignal::new(PaperDesk::new());

    let load_all = {
        let scope = scope.clone();
        move || {
            desk.update(|d| d.begin_load());
            let api = auth.api();
            let scope = scope.clone();
            spawn_local(async move {
                if let Some(result) = scope.run(api.list_papers()).await {
                    desk.update(|d| d.finish_load(result));
                }
            });
        }
    };

    let initial = load_all.clone();
    Effect::new(move |_| initial());

    let on_search = {
        let scope = scope.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(Ok(query)) = desk.try_update(PaperDesk::begin_search) else {
                return;
            };
            let api = auth.api();
            let scope = scope.clone();
            spawn_local(async move {
                if let Some(result) = scope.run(api.search_papers(&query)).await {
                    desk.update(|d| d.finish_load(result));
                }
            });
        }
    };

    let open_detail = move |id: String| {
        let api = auth.api();
        let scope = scope.clone();
        spawn_local(async move {
            if let Some(result) = scope.run(api.get_paper(&id)).await {
                desk.update(|d| d.finish_detail(result));
            }
        });
    };

    let reload = load_all.clone();
    let on_imported = Callback::new(move |()| reload());

    view! {
        <div class="grid gap-6 lg:grid-cols-3">
            <div class="lg:col-span-2 card bg-base-100 shadow-xl">
                <div class="card-body gap-4">
                    <div class="flex items-center justify-between">
                        <h3 class="card-title">"Papers"</h3>
                        <button class="btn btn-ghost btn-sm" on:click=move |_| load_all()>
                            "Show all"
                        </button>
                    </div>
                    <form class="join w-full" on:submit=on_search>
                        <input
                            type="text"
                            placeholder="Search by title, author or ID"
                            class="input input-bordered join-item w-full"
                            prop:value=move || desk.with(|d| d.query.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                desk.update(|d| d.query = value);
                            }
                        />
                        <button class="btn btn-primary join-item" disabled=move || desk.with(|d| d.loading)>
                            "Search"
                        </button>
                    </form>

                    <NoticeBanner notice=Signal::derive(move || desk.with(|d| d.notice.clone())) />

                    {move || desk.with(|d| d.selected.clone()).map(|paper| view! {
                        <div class="alert">
                            <div>
                                <div class="font-mono text-xs opacity-70">{paper.id.to_string()}</div>
                                <div class="font-bold">{paper.title}</div>
                                <div class="text-sm">{paper.authors}</div>
                            </div>
                            <button class="btn btn-sm btn-ghost" on:click=move |_| desk.update(|d| d.close_detail())>
                                "Close"
                            </button>
                        </div>
                    })}

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra table-sm w-full">
                            <thead>
                                <tr>
                                    <th>"ID"</th>
                                    <th>"Title"</th>
                                    <th class="hidden md:table-cell">"Authors"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || desk.with(|d| d.papers.clone())
                                    key=|p| p.id.to_string()
                                    children={
                                        let open_detail = open_detail.clone();
                                        move |paper| {
                                            let id = paper.id.to_string();
                                            let open_detail = open_detail.clone();
                                            view! {
                                                <tr>
                                                    <td class="font-mono text-xs">{id.clone()}</td>
                                                    <td>{paper.title}</td>
                                                    <td class="hidden md:table-cell text-sm opacity-70">{paper.authors}</td>
                                                    <td>
                                                        <button class="btn btn-ghost btn-xs" on:click=move |_| open_detail(id.clone())>
                                                            "View"
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>

            <UploadForm
                target=UploadTarget::Papers
                title="Import Papers"
                hint="Excel workbook listing paper IDs, titles and authors."
                on_done=on_imported
            />
        </div>
    }
}
