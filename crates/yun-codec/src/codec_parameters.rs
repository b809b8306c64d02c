//! 编解码器参数.
//!
//! 打开解码器时由调用方提供的流配置, 一般取自容器头
//! (对 WMA 即 WAVEFORMATEX 及其尾部私有数据).

use yun_core::{ChannelLayout, SampleFormat};

use crate::codec_id::CodecId;

/// 打开解码器所需的流参数
#[derive(Debug, Clone)]
pub struct CodecParameters {
    /// 编解码器标识
    pub codec_id: CodecId,
    /// 额外数据 (如 WAVEFORMATEX 尾部的编码器私有配置)
    pub extra_data: Vec<u8>,
    /// 码率 (bits/s)
    pub bit_rate: u64,
    /// 媒体类型特定参数
    pub params: CodecParamsType,
}

/// 按媒体类型区分的参数分支
#[derive(Debug, Clone)]
pub enum CodecParamsType {
    /// 音频参数
    Audio(AudioCodecParams),
    /// 无特定参数
    None,
}

/// 音频流参数
#[derive(Debug, Clone)]
pub struct AudioCodecParams {
    /// 采样率 (Hz)
    pub sample_rate: u32,
    /// 声道布局
    pub channel_layout: ChannelLayout,
    /// 采样格式
    pub sample_format: SampleFormat,
    /// 每帧采样数 (0 表示可变)
    pub frame_size: u32,
    /// 压缩块大小 (容器的 nBlockAlign, 字节; 0 表示未知)
    pub block_align: u32,
}

impl CodecParameters {
    /// 音频流取参数分支, 其余返回 `None`
    pub fn audio(&self) -> Option<&AudioCodecParams> {
        match &self.params {
            CodecParamsType::Audio(a) => Some(a),
            _ => None,
        }
    }
}
