use super::Notice;
use crate::error::{ApiError, ApiResult};
use checkin_shared::EntryHistory;

/// 按条码查询某位参会者的全部入场记录
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryDesk {
    pub barcode: String,
    pub history: Option<EntryHistory>,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl HistoryDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> ApiResult<String> {
        let barcode = self.barcode.trim().to_string();
        if barcode.is_empty() {
            let err = ApiError::validation("Please enter a barcode");
            self.notice = Some(Notice::from(&err));
            return Err(err);
        }
        self.loading = true;
        self.notice = None;
        Ok(barcode)
    }

    pub fn finish(&mut self, result: ApiResult<EntryHistory>) {
        self.loading = false;
        match result {
            Ok(history) => {
                if history.entries.is_empty() {
                    self.notice = Some(Notice::info("No entries recorded yet"));
                }
                self.history = Some(history);
            }
            Err(e) => {
                self.history = None;
                self.notice = Some(Notice::from(&e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_failure_clears_previous_result() {
        let mut desk = HistoryDesk::new();
        desk.barcode = "BC1".to_string();
        desk.begin().unwrap();
        desk.finish(Ok(serde_json::from_value(json!({
            "participant": { "referenceNo": "R", "name": "N", "email": "e@x.org" },
            "entries": []
        }))
        .unwrap()));
        assert!(desk.history.is_some());
        assert_eq!(desk.notice.as_ref().unwrap().message, "No entries recorded yet");

        desk.barcode = "BC404".to_string();
        desk.begin().unwrap();
        desk.finish(Err(ApiError::backend(404, "Participant not found")));
        assert!(desk.history.is_none());
        assert!(desk.notice.as_ref().unwrap().is_error());
    }

    #[test]
    fn blank_barcode_is_rejected() {
        let mut desk = HistoryDesk::new();
        assert!(desk.begin().is_err());
        assert!(!desk.loading);
    }
}
