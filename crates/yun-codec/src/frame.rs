//! 解码后的帧数据 (Frame).
//!
//! 对标 FFmpeg 的 `AVFrame`, 表示解码后的原始音频数据.

use yun_core::{ChannelLayout, Rational, SampleFormat};

/// 解码输出的一帧原始音频
///
/// 平面格式时 data 中每个 Vec 对应一个声道, 交错格式只有一个
/// Vec, 各声道样本交替排列.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// 音频采样数据 (平面格式: 每声道一个 Vec; 交错格式: 单个 Vec)
    pub data: Vec<Vec<u8>>,
    /// 本帧包含的采样数 (每声道)
    pub nb_samples: u32,
    /// 采样率 (Hz)
    pub sample_rate: u32,
    /// 采样格式
    pub sample_format: SampleFormat,
    /// 声道布局
    pub channel_layout: ChannelLayout,
    /// 显示时间戳 (PTS)
    pub pts: i64,
    /// 时间基
    pub time_base: Rational,
    /// 帧时长 (以 time_base 为单位)
    pub duration: i64,
}

impl AudioFrame {
    /// 按格式与布局预置数据平面, 时间戳留空待解码器回填
    pub fn new(
        nb_samples: u32,
        sample_rate: u32,
        sample_format: SampleFormat,
        channel_layout: ChannelLayout,
    ) -> Self {
        let plane_count = if sample_format.is_planar() {
            channel_layout.channels as usize
        } else {
            1
        };
        Self {
            data: vec![Vec::new(); plane_count],
            nb_samples,
            sample_rate,
            sample_format,
            channel_layout,
            pts: yun_core::timestamp::NOPTS_VALUE,
            time_base: Rational::UNDEFINED,
            duration: 0,
        }
    }
}

/// 帧 (目前仅音频)
#[derive(Debug, Clone)]
pub enum Frame {
    /// 音频帧
    Audio(AudioFrame),
}
