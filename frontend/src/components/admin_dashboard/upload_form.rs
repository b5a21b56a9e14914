use crate::auth::use_auth;
use crate::components::common::use_request_scope;
use crate::web::file::{read_file, selected_file};
use checkin::desk::{UploadDesk, UploadStatus};
use checkin_shared::protocol::UploadTarget;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

/// Excel 导入表单（参会者 / 论文）
#[component]
pub fn UploadForm(
    target: UploadTarget,
    #[prop(into)] title: String,
    #[prop(into)] hint: String,
    /// 导入成功后回调（如刷新列表）
    #[prop(optional, into)]
    on_done: Option<Callback<()>>,
) -> impl IntoView {
    let auth = use_auth();
    let scope = use_request_scope();
    let desk = RwSignal::new(UploadDesk::new());

    let on_file = {
        let scope = scope.clone();
        move |ev: leptos::ev::Event| {
            let Some(file) = ev
                .target()
                .and_then(|t| t.dyn_into::<leptos::web_sys::HtmlInputElement>().ok())
                .and_then(|input| selected_file(&input))
            else {
                desk.update(|d| d.select(None));
                return;
            };

            let scope = scope.clone();
            spawn_local(async move {
                match scope.run(read_file(&file)).await {
                    Some(Ok(upload)) => desk.update(|d| d.select(Some(upload))),
                    Some(Err(e)) => {
                        log::warn!("[Upload] 读取文件失败: {}", e);
                        desk.update(|d| d.select(None));
                    }
                    None => {}
                }
            });
        }
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(Ok(file)) = desk.try_update(UploadDesk::begin) else {
            return;
        };

        let api = auth.api();
        let scope = scope.clone();
        spawn_local(async move {
            let upload = async {
                match target {
                    UploadTarget::Participants => api.upload_participants(file).await,
                    UploadTarget::Papers => api.upload_papers(file).await,
                }
            };
            let Some(result) = scope.run(upload).await else {
                return;
            };
            let succeeded = result.is_ok();
            desk.update(|d| d.finish(result));
            if succeeded {
                if let Some(cb) = on_done {
                    cb.run(());
                }
            }
        });
    };

    let status = move || desk.with(|d| d.status.clone());
    let uploading = move || desk.with(|d| d.status.is_uploading());

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body gap-4" on:submit=on_submit>
                <h3 class="card-title">{title}</h3>
                <p class="text-base-content/70 text-sm">{hint}</p>

                <input
                    type="file"
                    accept=".xlsx,.xls"
                    class="file-input file-input-bordered w-full"
                    on:change=on_file
                />
                {move || desk.with(|d| d.file_name().map(|n| format!("Selected: {}", n)))
                    .map(|label| view! { <p class="text-sm font-mono">{label}</p> })}

                <button class="btn btn-primary" disabled=uploading>
                    {move || if uploading() {
                        view! { <span class="loading loading-spinner"></span> "Uploading..." }.into_any()
                    } else {
                        "Upload".into_any()
                    }}
                </button>

                {move || match status() {
                    UploadStatus::Idle | UploadStatus::Uploading => None,
                    UploadStatus::Done(message) => Some(view! {
                        <div role="alert" class="alert alert-success text-sm py-2"><span>{message}</span></div>
                    }.into_any()),
                    UploadStatus::Failed(message) => Some(view! {
                        <div role="alert" class="alert alert-error text-sm py-2"><span>{message}</span></div>
                    }.into_any()),
                }}
            </form>
        </div>
    }
}
