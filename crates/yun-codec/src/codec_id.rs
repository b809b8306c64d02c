//! 编解码器标识符.
//!
//! 对标 FFmpeg 的 `AVCodecID`, 为每种编解码算法分配唯一标识.

use std::fmt;
use yun_core::MediaType;

/// 编解码器标识符
///
/// 唯一标识一种编解码算法, 与容器格式无关.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodecId {
    /// 未知编解码器
    None,

    // ========================
    // WMA 家族
    // ========================
    /// Windows Media Audio v1
    WmaV1,
    /// Windows Media Audio v2
    WmaV2,
    /// Windows Media Audio 9 Professional
    WmaPro,
    /// Windows Media Audio 9 Lossless
    WmaLossless,

    // ========================
    // 其他音频编解码器
    // ========================
    /// PCM 有符号 16 位小端
    PcmS16le,
}

impl CodecId {
    /// 获取编解码器对应的媒体类型
    pub const fn media_type(&self) -> MediaType {
        match self {
            Self::None => MediaType::Data,

            // 音频
            Self::WmaV1 | Self::WmaV2 | Self::WmaPro | Self::WmaLossless | Self::PcmS16le => {
                MediaType::Audio
            }
        }
    }

    /// 获取编解码器的人类可读名称
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::WmaV1 => "wmav1",
            Self::WmaV2 => "wmav2",
            Self::WmaPro => "wmapro",
            Self::WmaLossless => "wmalossless",
            Self::PcmS16le => "pcm_s16le",
        }
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
