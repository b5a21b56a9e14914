use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const STORAGE_TOKEN_KEY: &str = "token";
pub const STORAGE_USER_KEY: &str = "user";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 后端记录 ID
///
/// 后端既可能返回数字 ID，也可能返回字符串 ID，这里统一兼容。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// 用户角色
///
/// 线上值 `STAFF` 与 `COORDINATOR` 属于同一访问级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    #[serde(alias = "STAFF")]
    Coordinator,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Coordinator => "COORDINATOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// 会场（固定的检录点集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Venue {
    #[default]
    #[serde(rename = "Main Hall")]
    MainHall,
    #[serde(rename = "Conference Room A")]
    ConferenceRoomA,
    #[serde(rename = "Conference Room B")]
    ConferenceRoomB,
    #[serde(rename = "Auditorium")]
    Auditorium,
    #[serde(rename = "Exhibition Area")]
    ExhibitionArea,
    #[serde(rename = "Dining Hall")]
    DiningHall,
    #[serde(rename = "Accommodation Check-in")]
    AccommodationCheckIn,
}

impl Venue {
    pub const ALL: [Venue; 7] = [
        Venue::MainHall,
        Venue::ConferenceRoomA,
        Venue::ConferenceRoomB,
        Venue::Auditorium,
        Venue::ExhibitionArea,
        Venue::DiningHall,
        Venue::AccommodationCheckIn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::MainHall => "Main Hall",
            Venue::ConferenceRoomA => "Conference Room A",
            Venue::ConferenceRoomB => "Conference Room B",
            Venue::Auditorium => "Auditorium",
            Venue::ExhibitionArea => "Exhibition Area",
            Venue::DiningHall => "Dining Hall",
            Venue::AccommodationCheckIn => "Accommodation Check-in",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVenue(pub String);

impl fmt::Display for UnknownVenue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown venue: {}", self.0)
    }
}

impl std::error::Error for UnknownVenue {}

impl FromStr for Venue {
    type Err = UnknownVenue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Venue::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVenue(s.to_string()))
    }
}

/// 参会者（由后端维护，前端只读）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub reference_no: String,
    #[serde(default)]
    pub prefix: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub mobile_no: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub registered_category: Option<String>,
    #[serde(default)]
    pub paper_id: Option<String>,
    #[serde(default)]
    pub registration_date: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub invoice_no: Option<String>,
    #[serde(default)]
    pub amount_paid: Option<f64>,
    #[serde(default)]
    pub barcode: Option<String>,
}

impl Participant {
    /// 带称谓的显示名
    pub fn display_name(&self) -> String {
        match self.prefix.as_deref().map(str::trim) {
            Some(prefix) if !prefix.is_empty() => format!("{} {}", prefix, self.name),
            _ => self.name.clone(),
        }
    }

    pub fn has_barcode(&self) -> bool {
        self.barcode.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// 检录记录（只追加）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: RecordId,
    pub venue: Venue,
    pub timestamp: DateTime<Utc>,
    pub staff_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<Participant>,
}

impl Entry {
    pub fn display_time(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub authors: String,
}

// =========================================================
// 响应模型 (Response Payloads)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// 仅包含提示消息的通用响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkEntryResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub participant: Option<Participant>,
    #[serde(default)]
    pub entry: Option<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryHistory {
    pub participant: Participant,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueCount {
    pub venue: Venue,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryStats {
    #[serde(default)]
    pub total_entries: u64,
    #[serde(default)]
    pub unique_participants: u64,
    #[serde(default)]
    pub entries_by_venue: Vec<VenueCount>,
}

/// 后端统一的错误响应体 `{ "error": "..." }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn staff_role_is_coordinator() {
        let user: User = serde_json::from_value(json!({ "name": "S", "role": "STAFF" })).unwrap();
        assert_eq!(user.role, Role::Coordinator);
        assert!(user.id.is_none());

        let admin: User =
            serde_json::from_value(json!({ "id": 7, "name": "A", "role": "ADMIN" })).unwrap();
        assert!(admin.role.is_admin());
        assert_eq!(admin.id, Some(RecordId::Number(7)));
    }

    #[test]
    fn venue_uses_display_names() {
        assert_eq!(
            serde_json::to_value(Venue::AccommodationCheckIn).unwrap(),
            json!("Accommodation Check-in")
        );
        assert_eq!("Dining Hall".parse::<Venue>(), Ok(Venue::DiningHall));
        assert!("Rooftop".parse::<Venue>().is_err());
    }

    #[test]
    fn participant_tolerates_sparse_payload() {
        let p: Participant = serde_json::from_value(json!({
            "id": "ck1",
            "referenceNo": "REF-1",
            "prefix": "Dr.",
            "name": "Asha",
            "email": "asha@example.org",
            "amountPaid": 1500
        }))
        .unwrap();

        assert_eq!(p.display_name(), "Dr. Asha");
        assert_eq!(p.amount_paid, Some(1500.0));
        assert!(!p.has_barcode());
        assert_eq!(p.id.unwrap().to_string(), "ck1");
    }

    #[test]
    fn entry_parses_rfc3339_timestamp() {
        let entry: Entry = serde_json::from_value(json!({
            "id": 3,
            "venue": "Main Hall",
            "timestamp": "2024-03-01T09:30:00.000Z",
            "staffId": "STF01"
        }))
        .unwrap();

        assert_eq!(entry.venue, Venue::MainHall);
        assert_eq!(entry.display_time(), "2024-03-01 09:30:00 UTC");
    }

    #[test]
    fn numeric_staff_id_is_accepted() {
        let entries: Vec<Entry> = serde_json::from_value(json!([
            { "id": 1, "venue": "Main Hall", "timestamp": "2024-03-01T10:00:00Z", "staffId": "STF01" },
            { "id": 2, "venue": "Main Hall", "timestamp": "2024-03-01T10:05:00Z", "staffId": 7 }
        ]))
        .unwrap();

        assert_eq!(entries[0].staff_id.to_string(), "STF01");
        assert_eq!(entries[1].staff_id, RecordId::Number(7));
        assert_eq!(entries[1].staff_id.to_string(), "7");
    }
}
