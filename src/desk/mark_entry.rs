use crate::error::{ApiError, ApiResult};
use checkin_shared::{Entry, EntryHistory, MarkEntryResponse, Participant, Venue};

/// 一次标记入场的结果
#[derive(Debug, Clone, PartialEq)]
pub struct EntryOutcome {
    pub success: bool,
    pub message: String,
    pub participant: Option<Participant>,
    pub entry: Option<Entry>,
}

impl EntryOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            participant: None,
            entry: None,
        }
    }
}

/// 入场检录台
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkEntryDesk {
    pub barcode_scanned: String,
    pub venue: Venue,
    pub outcome: Option<EntryOutcome>,
    pub history: Vec<Entry>,
    pub loading: bool,
}

impl MarkEntryDesk {
    pub fn new() -> Self {
        Self::default()
    }

    /// 校验并准备请求参数
    pub fn begin(&mut self) -> ApiResult<(String, Venue)> {
        let barcode = self.barcode_scanned.trim();
        if barcode.is_empty() {
            let err = ApiError::validation("Please enter a barcode and select venue");
            self.outcome = Some(EntryOutcome::failed(err.message()));
            return Err(err);
        }
        let barcode = barcode.to_string();
        self.loading = true;
        self.outcome = None;
        Ok((barcode, self.venue))
    }

    /// 应用标记结果
    ///
    /// 成功时清空扫码输入并返回条码，调用方据此刷新入场历史；
    /// 失败时原样展示后端消息，保留扫码输入。
    pub fn finish(&mut self, barcode: &str, result: ApiResult<MarkEntryResponse>) -> Option<String> {
        self.loading = false;
        match result {
            Ok(res) => {
                self.outcome = Some(EntryOutcome {
                    success: true,
                    message: res.message,
                    participant: res.participant,
                    entry: res.entry,
                });
                self.barcode_scanned.clear();
                Some(barcode.to_string())
            }
            Err(e) => {
                self.outcome = Some(EntryOutcome::failed(e.message()));
                None
            }
        }
    }

    /// 历史加载失败只记录日志，不影响标记结果
    pub fn apply_history(&mut self, result: ApiResult<EntryHistory>) {
        match result {
            Ok(history) => self.history = history.entries,
            Err(e) => log::warn!("[MarkEntry] 获取入场历史失败: {}", e),
        }
    }
}
