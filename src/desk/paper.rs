use super::Notice;
use crate::error::{ApiError, ApiResult};
use checkin_shared::Paper;

/// 论文目录：列表、检索与详情
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaperDesk {
    pub papers: Vec<Paper>,
    pub query: String,
    pub selected: Option<Paper>,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl PaperDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.notice = None;
    }

    /// 列表与检索结果共用
    pub fn finish_load(&mut self, result: ApiResult<Vec<Paper>>) {
        self.loading = false;
        match result {
            Ok(papers) => {
                if papers.is_empty() {
                    self.notice = Some(Notice::info("No papers found"));
                }
                self.papers = papers;
            }
            Err(e) => self.notice = Some(Notice::from(&e)),
        }
    }

    pub fn begin_search(&mut self) -> ApiResult<String> {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            let err = ApiError::validation("Please enter a search query");
            self.notice = Some(Notice::from(&err));
            return Err(err);
        }
        self.begin_load();
        Ok(query)
    }

    pub fn finish_detail(&mut self, result: ApiResult<Paper>) {
        match result {
            Ok(paper) => self.selected = Some(paper),
            Err(e) => self.notice = Some(Notice::from(&e)),
        }
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
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

    #[tokio::test]
    async fn search_then_open_detail() {
        let api = CheckinApi::new(MockHttpClient::new(), ClientConfig::new(BASE), SessionHandle::new());
        api.http().mock_response(
            &format!("{BASE}/papers/search?query=graph%20neural"),
            200,
            json!([{ "id": "P-12", "title": "Graph Neural Scheduling", "authors": "K. Rao" }]),
        );
        api.http().mock_response(
            &format!("{BASE}/papers/P-12"),
            200,
            json!({ "id": "P-12", "title": "Graph Neural Scheduling", "authors": "K. Rao" }),
        );

        let mut desk = PaperDesk::new();
        desk.query = "graph neural".to_string();
        let query = desk.begin_search().unwrap();
        desk.finish_load(api.search_papers(&query).await);
        assert_eq!(desk.papers.len(), 1);

        let id = desk.papers[0].id.to_string();
        desk.finish_detail(api.get_paper(&id).await);
        assert_eq!(desk.selected.as_ref().unwrap().authors, "K. Rao");

        desk.close_detail();
        assert!(desk.selected.is_none());
    }

    #[test]
    fn empty_catalogue_is_reported() {
        let mut desk = PaperDesk::new();
        desk.begin_load();
        desk.finish_load(Ok(vec![]));
        assert_eq!(desk.notice.unwrap().message, "No papers found");
    }
}
