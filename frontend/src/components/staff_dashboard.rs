use crate::components::common::PageHeader;
use crate::components::history_lookup::HistoryLookup;
use crate::components::mark_entry_panel::MarkEntryPanel;
use leptos::prelude::*;

/// 工作人员面板：扫码入场与历史查询
///
/// 子面板各自持有请求作用域。
#[component]
pub fn StaffDashboardPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-5xl mx-auto space-y-8">
                <PageHeader title="Staff Dashboard" />
                <div class="grid gap-6 lg:grid-cols-2">
                    <MarkEntryPanel />
                    <HistoryLookup />
                </div>
            </div>
        </div>
    }
}
