//! 视图模型（工作台）
//!
//! 每个页面的本地状态集中在一个结构体中，负责：
//! - 表单数据的持有与重置
//! - 请求前的本地校验
//! - 将 API 结果应用到界面状态
//!
//! 这里不做任何 I/O，网络调用由视图在 `begin_*` 与 `finish_*` 之间发起。

mod entry_log;
mod history;
mod mark_entry;
mod paper;
mod participant;
mod upload;

pub use entry_log::{ALL_VENUES, EntryLogDesk};
pub use history::HistoryDesk;
pub use mark_entry::{EntryOutcome, MarkEntryDesk};
pub use paper::PaperDesk;
pub use participant::ParticipantDesk;
pub use upload::{UploadDesk, UploadStatus};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
    Info,
}

/// 行内提示 / 横幅消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: Tone,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Info,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.tone == Tone::Error
    }
}

impl From<&ApiError> for Notice {
    fn from(e: &ApiError) -> Self {
        Notice::error(e.message())
    }
}
