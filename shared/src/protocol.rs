use crate::{
    Entry, EntryHistory, EntryStats, LoginResponse, MarkEntryResponse, MessageResponse, Paper,
    Participant, Venue,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use urlencoding::encode;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// `POST` requests are sent with the request itself as the JSON body;
/// `GET` requests carry their parameters in [`ApiRequest::path`].
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, including any encoded path or query parameters.
    fn path(&self) -> String;
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

// =========================================================
// Participants
// =========================================================

/// Free-text lookup by email, mobile number or reference number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParticipantsRequest {
    pub query: String,
}

impl ApiRequest for SearchParticipantsRequest {
    type Response = Vec<Participant>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/participants/search?query={}", encode(&self.query))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParticipantsRequest;

impl ApiRequest for ListParticipantsRequest {
    type Response = Vec<Participant>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/participants".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignBarcodeRequest {
    pub email: String,
    pub barcode: String,
}

impl ApiRequest for AssignBarcodeRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/participants/assign-barcode".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeassignBarcodeRequest {
    pub email: String,
}

impl ApiRequest for DeassignBarcodeRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/participants/deassign-barcode".to_string()
    }
}

// =========================================================
// Entries
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkEntryRequest {
    pub barcode: String,
    pub venue: Venue,
}

impl ApiRequest for MarkEntryRequest {
    type Response = MarkEntryResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/entries/mark".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryHistoryRequest {
    pub barcode: String,
}

impl ApiRequest for EntryHistoryRequest {
    type Response = EntryHistory;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/entries/history/{}", encode(&self.barcode))
    }
}

/// Entry log listing, optionally narrowed to one venue and/or one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListEntriesRequest {
    pub venue: Option<Venue>,
    pub date: Option<NaiveDate>,
}

impl ApiRequest for ListEntriesRequest {
    type Response = Vec<Entry>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        let mut params = Vec::new();
        if let Some(venue) = self.venue {
            params.push(format!("venue={}", encode(venue.as_str())));
        }
        if let Some(date) = self.date {
            params.push(format!("date={}", date.format("%Y-%m-%d")));
        }
        if params.is_empty() {
            "/entries/all".to_string()
        } else {
            format!("/entries/all?{}", params.join("&"))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryStatsRequest;

impl ApiRequest for EntryStatsRequest {
    type Response = EntryStats;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/entries/stats".to_string()
    }
}

// =========================================================
// Papers
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPapersRequest {
    pub query: String,
}

impl ApiRequest for SearchPapersRequest {
    type Response = Vec<Paper>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/papers/search?query={}", encode(&self.query))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPapersRequest;

impl ApiRequest for ListPapersRequest {
    type Response = Vec<Paper>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/papers/all".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPaperRequest {
    pub id: String,
}

impl ApiRequest for GetPaperRequest {
    type Response = Paper;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/papers/{}", encode(&self.id))
    }
}

// =========================================================
// Bulk import (multipart)
// =========================================================

/// Excel import endpoints. These take a multipart form rather than JSON,
/// so they are described separately from [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    Participants,
    Papers,
}

impl UploadTarget {
    /// Name of the multipart field carrying the spreadsheet.
    pub const FIELD_NAME: &'static str = "file";

    pub fn path(&self) -> &'static str {
        match self {
            UploadTarget::Participants => "/participants/upload-excel",
            UploadTarget::Papers => "/upload-papers",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_parameters_are_encoded() {
        let req = SearchParticipantsRequest {
            query: "a+b@x.com".into(),
        };
        assert_eq!(req.path(), "/participants/search?query=a%2Bb%40x.com");

        let history = EntryHistoryRequest {
            barcode: "BC 1/2".into(),
        };
        assert_eq!(history.path(), "/entries/history/BC%201%2F2");
    }

    #[test]
    fn entry_filters_only_include_present_values() {
        assert_eq!(ListEntriesRequest::default().path(), "/entries/all");

        let req = ListEntriesRequest {
            venue: Some(Venue::ConferenceRoomA),
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        assert_eq!(
            req.path(),
            "/entries/all?venue=Conference%20Room%20A&date=2024-03-01"
        );

        let by_date = ListEntriesRequest {
            venue: None,
            date: NaiveDate::from_ymd_opt(2024, 12, 31),
        };
        assert_eq!(by_date.path(), "/entries/all?date=2024-12-31");
    }
}
