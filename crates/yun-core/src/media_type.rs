//! 媒体类型定义.
//!
//! 对标 FFmpeg 的 `AVMediaType`.

use std::fmt;

/// 媒体流类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// 音频流
    Audio,
    /// 视频流
    Video,
    /// 数据流 (如时间码)
    Data,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Audio => "音频",
            Self::Video => "视频",
            Self::Data => "数据",
        };
        write!(f, "{name}")
    }
}
