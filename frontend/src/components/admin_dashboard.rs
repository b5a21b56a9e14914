mod entry_logs_tab;
mod papers_tab;
mod participants_tab;
mod search_tab;
mod upload_form;

use crate::components::common::PageHeader;
use crate::components::history_lookup::HistoryLookup;
use crate::components::mark_entry_panel::MarkEntryPanel;
use checkin_shared::protocol::UploadTarget;
use entry_logs_tab::EntryLogsTab;
use leptos::prelude::*;
use papers_tab::PapersTab;
use participants_tab::ParticipantsTab;
use search_tab::SearchTab;
use upload_form::UploadForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Search,
    MarkEntry,
    Participants,
    Import,
    EntryLogs,
    Papers,
}

impl Tab {
    const ALL: [Tab; 6] = [
        Tab::Search,
        Tab::MarkEntry,
        Tab::Participants,
        Tab::Import,
        Tab::EntryLogs,
        Tab::Papers,
    ];

    fn label(&self) -> &'static str {
        match self {
            Tab::Search => "Search & Barcode",
            Tab::MarkEntry => "Mark Entry",
            Tab::Participants => "Participants",
            Tab::Import => "Import",
            Tab::EntryLogs => "Entry Logs",
            Tab::Papers => "Papers",
        }
    }
}

/// 管理员面板
///
/// 每个标签页持有自己的请求作用域，切换标签即取消旧标签的挂起请求。
#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let (tab, set_tab) = signal(Tab::Search);

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <PageHeader title="Admin Dashboard" />

                <div role="tablist" class="tabs tabs-boxed bg-base-100 shadow">
                    {Tab::ALL
                        .iter()
                        .map(|t| {
                            let t = *t;
                            view! {
                                <a
                                    role="tab"
                                    class=move || if tab.get() == t { "tab tab-active" } else { "tab" }
                                    on:click=move |_| set_tab.set(t)
                                >
                                    {t.label()}
                                </a>
                            }
                        })
                        .collect_view()}
                </div>

                {move || match tab.get() {
                    Tab::Search => view! { <SearchTab /> }.into_any(),
                    Tab::MarkEntry => view! {
                        <div class="grid gap-6 lg:grid-cols-2">
                            <MarkEntryPanel />
                            <HistoryLookup />
                        </div>
                    }
                    .into_any(),
                    Tab::Participants => view! { <ParticipantsTab /> }.into_any(),
                    Tab::Import => view! {
                        <UploadForm
                            target=UploadTarget::Participants
                            title="Import Participants"
                            hint="Excel workbook (.xlsx or .xls) exported from the registration system."
                        />
                    }
                    .into_any(),
                    Tab::EntryLogs => view! { <EntryLogsTab /> }.into_any(),
                    Tab::Papers => view! { <PapersTab /> }.into_any(),
                }}
            </div>
        </div>
    }
}
