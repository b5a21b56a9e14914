use crate::auth::use_auth;
use crate::components::common::{NoticeBanner, use_request_scope};
use checkin::desk::ParticipantDesk;
use checkin_shared::Participant;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 参会者查询与条码绑定
#[component]
pub fn SearchTab() -> impl IntoView {
    let auth = use_auth();
    let scope = use_request_scope();
    let desk = RwSignal::new(ParticipantDesk::new());

    let on_search = {
        let scope = scope.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(Ok(query)) = desk.try_update(ParticipantDesk::begin_search) else {
                return;
            };
            let api = auth.api();
            let scope = scope.clone();
            spawn_local(async move {
                if let Some(result) = scope.run(api.search_participants(&query)).await {
                    desk.update(|d| d.finish_search(result));
                }
            });
        }
    };

    let on_assign = {
        let scope = scope.clone();
        move |_: leptos::ev::MouseEvent| {
            let Some(Ok((email, barcode))) = desk.try_update(ParticipantDesk::begin_assign) else {
                return;
            };
            let api = auth.api();
            let scope = scope.clone();
            spawn_local(async move {
                if let Some(result) = scope.run(api.assign_barcode(&email, &barcode)).await {
                    desk.update(|d| d.finish_assign(&barcode, result));
                }
            });
        }
    };

    let on_deassign = move |_: leptos::ev::MouseEvent| {
        let Some(Ok(email)) = desk.try_update(ParticipantDesk::begin_deassign) else {
            return;
        };
        let api = auth.api();
        let scope = scope.clone();
        spawn_local(async move {
            if let Some(result) = scope.run(api.deassign_barcode(&email)).await {
                desk.update(|d| d.finish_deassign(result));
            }
        });
    };

    let loading = move || desk.with(|d| d.loading);
    let editing = move || desk.with(|d| d.editing_barcode);
    let confirming = move || desk.with(|d| d.confirm_deassign);
    let has_barcode = move || desk.with(|d| d.selected.as_ref().is_some_and(Participant::has_barcode));

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body gap-4">
                <h3 class="card-title">"Find Participant"</h3>
                <form class="join w-full" on:submit=on_search>
                    <input
                        type="text"
                        placeholder="Email, mobile number or reference number"
                        class="input input-bordered join-item w-full"
                        prop:value=move || desk.with(|d| d.query.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            desk.update(|d| d.query = value);
                        }
                    />
                    <button class="btn btn-primary join-item" disabled=loading>"Search"</button>
                </form>

                <NoticeBanner notice=Signal::derive(move || desk.with(|d| d.notice.clone())) />

                {move || desk.with(|d| d.selected.clone()).map(|p| view! { <ParticipantCard participant=p /> })}

                <Show when=move || desk.with(|d| d.selected.is_some())>
                    <div class="divider">"Barcode"</div>
                    <Show
                        when=editing
                        fallback=move || view! {
                            <div class="flex flex-wrap items-center gap-2">
                                <span class="font-mono badge badge-lg">
                                    {move || desk.with(|d| {
                                        d.selected
                                            .as_ref()
                                            .and_then(|p| p.barcode.clone())
                                            .unwrap_or_else(|| "Not assigned".to_string())
                                    })}
                                </span>
                                <button class="btn btn-sm btn-primary" on:click=move |_| desk.update(|d| d.start_barcode_edit())>
                                    {move || if has_barcode() { "Update" } else { "Assign" }}
                                </button>
                                <Show when=move || has_barcode() && !confirming()>
                                    <button class="btn btn-sm btn-outline btn-error" on:click=move |_| desk.update(|d| d.request_deassign())>
                                        "Remove"
                                    </button>
                                </Show>
                            </div>
                        }
                    >
                        <div class="join w-full">
                            <input
                                type="text"
                                placeholder="Scan or type a barcode"
                                class="input input-bordered join-item w-full font-mono"
                                prop:value=move || desk.with(|d| d.barcode_input.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    desk.update(|d| d.barcode_input = value);
                                }
                            />
                            <button class="btn btn-primary join-item" disabled=loading on:click=on_assign.clone()>
                                "Save"
                            </button>
                            <button class="btn join-item" on:click=move |_| desk.update(|d| d.cancel_barcode_edit())>
                                "Cancel"
                            </button>
                        </div>
                    </Show>
                    <Show when=confirming>
                        <div role="alert" class="alert alert-warning">
                            <span>"Remove the barcode from this participant?"</span>
                            <div class="flex gap-2">
                                <button class="btn btn-sm btn-error" disabled=loading on:click=on_deassign.clone()>
                                    "Confirm"
                                </button>
                                <button class="btn btn-sm" on:click=move |_| desk.update(|d| d.cancel_deassign())>
                                    "Cancel"
                                </button>
                            </div>
                        </div>
                    </Show>
                </Show>
            </div>
        </div>
    }
}

#[component]
fn ParticipantCard(participant: Participant) -> impl IntoView {
    let row = |label: &'static str, value: Option<String>| {
        view! {
            <tr>
                <th class="w-48">{label}</th>
                <td>{value.filter(|v| !v.is_empty()).unwrap_or_else(|| "-".to_string())}</td>
            </tr>
        }
    };

    view! {
        <div class="overflow-x-auto">
            <table class="table table-sm">
                <tbody>
                    {row("Name", Some(participant.display_name()))}
                    {row("Reference No", Some(participant.reference_no.clone()))}
                    {row("Email", Some(participant.email.clone()))}
                    {row("Mobile", participant.mobile_no.clone())}
                    {row("Institution", participant.institution.clone())}
                    {row("Designation", participant.designation.clone())}
                    {row("Category", participant.registered_category.clone())}
                    {row("Country", participant.country.clone())}
                    {row("Paper ID", participant.paper_id.clone())}
                    {row("Amount Paid", participant.amount_paid.map(|a| format!("{:.2}", a)))}
                </tbody>
            </table>
        </div>
    }
}
