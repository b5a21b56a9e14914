use super::Notice;
use crate::error::{ApiError, ApiResult};
use checkin_shared::{MessageResponse, Participant};

/// 参会者查询与条码绑定台
///
/// 搜索结果只取第一条匹配，条码的绑定 / 解绑都针对当前选中的参会者。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantDesk {
    pub query: String,
    pub selected: Option<Participant>,
    pub barcode_input: String,
    pub editing_barcode: bool,
    pub confirm_deassign: bool,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl ParticipantDesk {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================
    // 搜索
    // =========================================================

    pub fn begin_search(&mut self) -> ApiResult<String> {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            return Err(self.reject("Please enter a search query"));
        }
        self.selected = None;
        self.barcode_input.clear();
        self.editing_barcode = false;
        self.confirm_deassign = false;
        self.notice = None;
        self.loading = true;
        Ok(query)
    }

    pub fn finish_search(&mut self, result: ApiResult<Vec<Participant>>) {
        self.loading = false;
        match result {
            Ok(found) => match found.into_iter().next() {
                Some(participant) => {
                    self.barcode_input = participant.barcode.clone().unwrap_or_default();
                    self.selected = Some(participant);
                }
                None => self.notice = Some(Notice::info("No participant found")),
            },
            Err(e) => self.notice = Some(Notice::from(&e)),
        }
    }

    // =========================================================
    // 条码绑定
    // =========================================================

    pub fn start_barcode_edit(&mut self) {
        self.editing_barcode = true;
        self.confirm_deassign = false;
    }

    /// 放弃编辑，输入框恢复为当前条码
    pub fn cancel_barcode_edit(&mut self) {
        self.editing_barcode = false;
        self.barcode_input = self.current_barcode();
    }

    /// 返回 `(email, barcode)`
    pub fn begin_assign(&mut self) -> ApiResult<(String, String)> {
        let barcode = self.barcode_input.trim().to_string();
        if barcode.is_empty() {
            return Err(self.reject("Please enter a barcode"));
        }
        let Some(email) = self.selected.as_ref().map(|p| p.email.clone()) else {
            return Err(self.reject("No participant selected"));
        };
        self.loading = true;
        self.notice = None;
        Ok((email, barcode))
    }

    pub fn finish_assign(&mut self, barcode: &str, result: ApiResult<MessageResponse>) {
        self.loading = false;
        match result {
            Ok(res) => {
                if let Some(p) = self.selected.as_mut() {
                    p.barcode = Some(barcode.to_string());
                }
                self.barcode_input = barcode.to_string();
                self.editing_barcode = false;
                self.notice = Some(Notice::success(or_default(
                    res.message,
                    "Barcode assigned successfully",
                )));
            }
            Err(e) => self.notice = Some(Notice::from(&e)),
        }
    }

    // =========================================================
    // 条码解绑（需二次确认）
    // =========================================================

    pub fn request_deassign(&mut self) {
        if self.selected.as_ref().is_some_and(Participant::has_barcode) {
            self.confirm_deassign = true;
        }
    }

    pub fn cancel_deassign(&mut self) {
        self.confirm_deassign = false;
    }

    /// 只有在确认之后才返回 email
    pub fn begin_deassign(&mut self) -> ApiResult<String> {
        if !self.confirm_deassign {
            return Err(ApiError::validation("Deassign not confirmed"));
        }
        let Some(email) = self.selected.as_ref().map(|p| p.email.clone()) else {
            return Err(self.reject("No participant selected"));
        };
        self.loading = true;
        self.notice = None;
        Ok(email)
    }

    pub fn finish_deassign(&mut self, result: ApiResult<MessageResponse>) {
        self.loading = false;
        self.confirm_deassign = false;
        match result {
            Ok(res) => {
                if let Some(p) = self.selected.as_mut() {
                    p.barcode = None;
                }
                self.barcode_input.clear();
                self.editing_barcode = false;
                self.notice = Some(Notice::success(or_default(
                    res.message,
                    "Barcode deassigned successfully",
                )));
            }
            Err(e) => self.notice = Some(Notice::from(&e)),
        }
    }

    fn current_barcode(&self) -> String {
        self.selected
            .as_ref()
            .and_then(|p| p.barcode.clone())
            .unwrap_or_default()
    }

    fn reject(&mut self, message: &str) -> ApiError {
        let err = ApiError::validation(message);
        self.notice = Some(Notice::from(&err));
        err
    }
}

fn or_default(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CheckinApi;
    use crate::config::ClientConfig;
    use crate::desk::Tone;
    use crate::request::MockHttpClient;
    use crate::session::SessionHandle;
    use serde_json::json;

    const BASE: &str = "http://test.local";

    fn api() -> CheckinApi<MockHttpClient> {
        CheckinApi::new(
            MockHttpClient::new(),
            ClientConfig::new(BASE),
            SessionHandle::new(),
        )
    }

    fn found(desk: &mut ParticipantDesk, barcode: Option<&str>) {
        desk.query = "asha".to_string();
        desk.begin_search().unwrap();
        desk.finish_search(Ok(vec![Participant {
            id: None,
            reference_no: "REF-1".to_string(),
            prefix: None,
            name: "Asha".to_string(),
            email: "asha@example.org".to_string(),
            mobile_no: None,
            gender: None,
            designation: None,
            institution: None,
            state: None,
            country: None,
            registered_category: None,
            paper_id: None,
            registration_date: None,
            transaction_id: None,
            invoice_no: None,
            amount_paid: None,
            barcode: barcode.map(str::to_string),
        }]));
    }

    #[tokio::test]
    async fn search_selects_first_match() {
        let api = api();
        api.http().mock_response(
            &format!("{BASE}/participants/search?query=REF-1"),
            200,
            json!([
                { "referenceNo": "REF-1", "name": "Asha", "email": "a@x.org", "barcode": "BC1" },
                { "referenceNo": "REF-2", "name": "Bala", "email": "b@x.org" }
            ]),
        );

        let mut desk = ParticipantDesk::new();
        desk.query = " REF-1 ".to_string();
        let query = desk.begin_search().unwrap();
        desk.finish_search(api.search_participants(&query).await);

        assert_eq!(desk.selected.as_ref().unwrap().reference_no, "REF-1");
        assert_eq!(desk.barcode_input, "BC1");
        assert!(desk.notice.is_none());
    }

    #[test]
    fn empty_result_is_reported() {
        let mut desk = ParticipantDesk::new();
        desk.query = "nobody".to_string();
        desk.begin_search().unwrap();
        desk.finish_search(Ok(vec![]));

        assert!(desk.selected.is_none());
        assert_eq!(desk.notice.unwrap().message, "No participant found");
    }

    #[test]
    fn blank_query_is_rejected_locally() {
        let mut desk = ParticipantDesk::new();
        desk.query = "  ".to_string();
        assert!(desk.begin_search().unwrap_err().is_validation());
        assert!(!desk.loading);
        assert_eq!(desk.notice.unwrap().message, "Please enter a search query");
    }

    #[tokio::test]
    async fn assign_updates_selected_participant() {
        let api = api();
        api.http().mock_response(
            &format!("{BASE}/participants/assign-barcode"),
            200,
            json!({ "message": "Barcode assigned" }),
        );

        let mut desk = ParticipantDesk::new();
        found(&mut desk, None);
        desk.start_barcode_edit();
        desk.barcode_input = "BC777".to_string();

        let (email, barcode) = desk.begin_assign().unwrap();
        assert_eq!(email, "asha@example.org");
        desk.finish_assign(&barcode, api.assign_barcode(&email, &barcode).await);

        assert_eq!(desk.selected.as_ref().unwrap().barcode.as_deref(), Some("BC777"));
        assert!(!desk.editing_barcode);
        let notice = desk.notice.unwrap();
        assert_eq!(notice.tone, Tone::Success);
        assert_eq!(notice.message, "Barcode assigned");
    }

    #[tokio::test]
    async fn assign_conflict_keeps_previous_barcode() {
        let api = api();
        api.http().mock_response(
            &format!("{BASE}/participants/assign-barcode"),
            409,
            json!({ "error": "Barcode already in use" }),
        );

        let mut desk = ParticipantDesk::new();
        found(&mut desk, Some("OLD"));
        desk.start_barcode_edit();
        desk.barcode_input = "TAKEN".to_string();

        let (email, barcode) = desk.begin_assign().unwrap();
        desk.finish_assign(&barcode, api.assign_barcode(&email, &barcode).await);

        assert_eq!(desk.selected.as_ref().unwrap().barcode.as_deref(), Some("OLD"));
        assert!(desk.editing_barcode);
        assert_eq!(desk.notice.as_ref().unwrap().message, "Barcode already in use");

        desk.cancel_barcode_edit();
        assert_eq!(desk.barcode_input, "OLD");
    }

    #[tokio::test]
    async fn deassign_requires_confirmation() {
        let api = api();
        api.http().mock_response(
            &format!("{BASE}/participants/deassign-barcode"),
            200,
            json!({ "message": "" }),
        );

        let mut desk = ParticipantDesk::new();
        found(&mut desk, Some("BC1"));
        assert!(desk.begin_deassign().is_err());

        desk.request_deassign();
        assert!(desk.confirm_deassign);
        let email = desk.begin_deassign().unwrap();
        desk.finish_deassign(api.deassign_barcode(&email).await);

        assert!(!desk.selected.as_ref().unwrap().has_barcode());
        assert!(desk.barcode_input.is_empty());
        assert!(!desk.confirm_deassign);
        assert_eq!(desk.notice.unwrap().message, "Barcode deassigned successfully");
        assert_eq!(api.http().request_count(), 1);
    }
}
