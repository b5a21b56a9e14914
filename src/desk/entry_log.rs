use super::Notice;
use crate::error::ApiResult;
use crate::export::{self, ExportError};
use checkin_shared::protocol::ListEntriesRequest;
use checkin_shared::{Entry, EntryStats, Venue};
use chrono::NaiveDate;

/// 下拉框中“全部会场”的取值
pub const ALL_VENUES: &str = "all";

/// 入场日志与统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryLogDesk {
    pub venue: Option<Venue>,
    pub date: Option<NaiveDate>,
    pub entries: Vec<Entry>,
    pub stats: Option<EntryStats>,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl EntryLogDesk {
    pub fn new() -> Self {
        Self::default()
    }

    // --- 过滤条件 ---

    /// `"all"` 或无法识别的值都视为不过滤
    pub fn set_venue(&mut self, value: &str) {
        self.venue = match value {
            ALL_VENUES | "" => None,
            other => other.parse().ok(),
        };
    }

    /// 接受 `<input type="date">` 的 `YYYY-MM-DD`
    pub fn set_date(&mut self, value: &str) {
        self.date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok();
    }

    pub fn venue_value(&self) -> &'static str {
        self.venue.map(|v| v.as_str()).unwrap_or(ALL_VENUES)
    }

    pub fn date_value(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    pub fn has_filters(&self) -> bool {
        self.venue.is_some() || self.date.is_some()
    }

    pub fn clear_filters(&mut self) {
        self.venue = None;
        self.date = None;
    }

    pub fn filter(&self) -> ListEntriesRequest {
        ListEntriesRequest {
            venue: self.venue,
            date: self.date,
        }
    }

    // --- 加载 ---

    pub fn begin(&mut self) -> ListEntriesRequest {
        self.loading = true;
        self.notice = None;
        self.filter()
    }

    pub fn finish_entries(&mut self, result: ApiResult<Vec<Entry>>) {
        self.loading = false;
        match result {
            Ok(entries) => self.entries = entries,
            Err(e) => {
                self.notice = Some(Notice::error(format!("Failed to load entries: {}", e)));
            }
        }
    }

    /// 统计失败不打断日志展示
    pub fn finish_stats(&mut self, result: ApiResult<EntryStats>) {
        match result {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => log::warn!("[EntryLog] 获取统计失败: {}", e),
        }
    }

    // --- 导出 ---

    pub fn can_export(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn export_csv(&self) -> Result<String, ExportError> {
        export::entries_to_csv(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CheckinApi;
    use crate::config::ClientConfig;
    use crate::request::MockHttpClient;
    use crate::session::SessionHandle;
    use serde_json::json;

    const BASE: &str = "http://test.local";

    #[test]
    fn filter_values_follow_form_inputs() {
        let mut desk = EntryLogDesk::new();
        assert_eq!(desk.venue_value(), "all");
        assert!(!desk.has_filters());

        desk.set_venue("Conference Room B");
        desk.set_date("2024-03-02");
        assert_eq!(desk.venue, Some(Venue::ConferenceRoomB));
        assert_eq!(desk.date_value(), "2024-03-02");
        assert!(desk.has_filters());

        desk.set_venue("all");
        desk.set_date("");
        assert!(!desk.has_filters());
    }

    #[tokio::test]
    async fn filtered_load_hits_encoded_query() {
        let api = CheckinApi::new(MockHttpClient::new(), ClientConfig::new(BASE), SessionHandle::new());
        api.http().mock_response(
            &format!("{BASE}/entries/all?venue=Main%20Hall&date=2024-03-01"),
            200,
            json!([{
                "id": 5,
                "venue": "Main Hall",
                "timestamp": "2024-03-01T08:00:00Z",
                "staffId": "STF09"
            }]),
        );
        api.http().mock_response(
            &format!("{BASE}/entries/stats"),
            200,
            json!({
                "totalEntries": 1,
                "uniqueParticipants": 1,
                "entriesByVenue": [{ "venue": "Main Hall", "count": 1 }]
            }),
        );

        let mut desk = EntryLogDesk::new();
        desk.set_venue("Main Hall");
        desk.set_date("2024-03-01");

        let filter = desk.begin();
        desk.finish_entries(api.list_entries(&filter).await);
        desk.finish_stats(api.entry_stats().await);

        assert_eq!(desk.entries.len(), 1);
        assert_eq!(desk.stats.as_ref().unwrap().total_entries, 1);
        assert!(desk.can_export());
        assert!(desk.export_csv().unwrap().contains("STF09"));

        desk.clear_filters();
        assert_eq!(desk.filter(), ListEntriesRequest::default());
    }

    #[test]
    fn load_failure_keeps_previous_rows() {
        let mut desk = EntryLogDesk::new();
        desk.begin();
        desk.finish_entries(Err(crate::error::ApiError::transport("offline")));
        assert!(desk.entries.is_empty());
        assert_eq!(
            desk.notice.unwrap().message,
            "Failed to load entries: offline"
        );
        assert!(!desk.loading);
    }
}
