//! 入场记录导出为 CSV

use checkin_shared::{Entry, Participant};
use chrono::NaiveDate;
use thiserror::Error;

pub const CSV_HEADERS: [&str; 9] = [
    "Reference No",
    "Name",
    "Email",
    "Mobile",
    "Institution",
    "Category",
    "Venue",
    "Timestamp",
    "Marked By",
];

const MISSING: &str = "-";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV 缓冲区刷新失败: {0}")]
    Flush(String),
    #[error("CSV 内容不是有效的 UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// 下载文件名，例如 `entry-logs-2024-03-01.csv`
pub fn file_name(date: NaiveDate) -> String {
    format!("entry-logs-{}.csv", date.format("%Y-%m-%d"))
}

/// 按固定列顺序渲染；缺失的可选字段输出 `-`
pub fn entries_to_csv(entries: &[Entry]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for entry in entries {
        writer.write_record(row(entry))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

fn row(entry: &Entry) -> [String; 9] {
    let p = entry.participant.as_ref();
    let field = |get: fn(&Participant) -> Option<&str>| {
        p.and_then(get)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(MISSING)
            .to_string()
    };

    [
        field(|p| Some(p.reference_no.as_str())),
        field(|p| Some(p.name.as_str())),
        field(|p| Some(p.email.as_str())),
        field(|p| p.mobile_no.as_deref()),
        field(|p| p.institution.as_deref()),
        field(|p| p.registered_category.as_deref()),
        entry.venue.to_string(),
        entry.display_time(),
        match entry.staff_id.to_string() {
            staff if staff.trim().is_empty() => MISSING.to_string(),
            staff => staff,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> Entry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn renders_header_and_rows() {
        let entries = vec![
            entry(json!({
                "id": 1,
                "venue": "Main Hall",
                "timestamp": "2024-03-01T09:30:00Z",
                "staffId": "STF01",
                "participant": {
                    "referenceNo": "REF-1",
                    "name": "Asha, Dr.",
                    "email": "asha@example.org",
                    "mobileNo": "98400",
                    "registeredCategory": "Faculty"
                }
            })),
            entry(json!({
                "id": 2,
                "venue": "Auditorium",
                "timestamp": "2024-03-01T10:00:00Z",
                "staffId": ""
            })),
        ];

        let csv = entries_to_csv(&entries).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Reference No,Name,Email,Mobile,Institution,Category,Venue,Timestamp,Marked By"
        );
        assert_eq!(
            lines[1],
            "REF-1,\"Asha, Dr.\",asha@example.org,98400,-,Faculty,Main Hall,2024-03-01 09:30:00 UTC,STF01"
        );
        assert_eq!(lines[2], "-,-,-,-,-,-,Auditorium,2024-03-01 10:00:00 UTC,-");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn numeric_staff_id_is_exported() {
        let entries = vec![entry(json!({
            "id": 9,
            "venue": "Main Hall",
            "timestamp": "2024-03-01T11:00:00Z",
            "staffId": 7
        }))];

        let csv = entries_to_csv(&entries).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(",7"));
    }

    #[test]
    fn empty_log_still_has_header() {
        let csv = entries_to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn file_name_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(file_name(date), "entry-logs-2024-03-01.csv");
    }
}
