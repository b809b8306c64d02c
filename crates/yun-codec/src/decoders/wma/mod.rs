//! WMA v1/v2 音频解码器 (定点实现)
//!
//! 覆盖标准 WMA (0x160/0x161) 的音频路径: 超帧拆分与比特储备, 变长块
//! MDCT, 指数包络 (VLC 增量 / LSP 两种编码), run-level 频谱系数,
//! 高频噪声整形与 MS 立体声. 全程 Q16.16/Q16.48 定点运算, 不依赖浮点.

mod exponent;
mod fft;
mod mdct;
mod tables;
mod vlc;
mod window;

#[cfg(test)]
mod tests;

use std::collections::VecDeque;

use log::{debug, warn};
use yun_core::bitcache::BitCache;
use yun_core::fixed::{
    FIXED_ONE, Fixed32, Fixed64, div64, mul32, mul32b, sat32, sat64, sqrt32, to_fixed32, widen32,
};
use yun_core::{ChannelLayout, Rational, SampleFormat, YunError, YunResult};

use crate::codec_id::CodecId;
use crate::codec_parameters::CodecParameters;
use crate::decoder::Decoder;
use crate::frame::{AudioFrame, Frame};
use crate::packet::Packet;

use self::exponent::{build_lsp_cos_table, decode_exp_lsp, decode_exp_vlc, interpolate_array};
use self::mdct::MdctContext;
use self::tables::{
    COEF_VLC_LENGTHS_A, COEF_VLC_LENGTHS_B, CRITICAL_FREQS, EXP_VLC_LENGTHS, HGAIN_VLC_LENGTHS,
    LEVEL_RUNS_A, LEVEL_RUNS_B, NOISE_TAB_SIZE, POW_GAIN, SQRT3_Q16,
};
use self::vlc::Vlc;
use self::window::{build_sine_window, stitch_block_window};

/// 最小块长为 1 << 7
const BLOCK_MIN_BITS: u32 = 7;
/// 块尺寸档位上限 (128 到 2048 共 5 档)
const BLOCK_NB_SIZES: usize = 5;
/// 每个块尺寸最多的高频噪声带数
const HIGH_BAND_MAX_SIZE: usize = 16;
/// 编码超帧的字节上限, 也是比特储备缓冲的容量
const MAX_CODED_SUPERFRAME_SIZE: usize = 16384;
/// 最大声道数
const MAX_CHANNELS: usize = 2;

/// floor(log2(v)), v = 0 时返回 0
fn ilog2(v: u32) -> u32 {
    31 - (v | 1).leading_zeros()
}

/// (a · b · m) >> 64, 饱和到 Q16.16. a/b 为 Q16.16, m 为 Q16.48
fn dequant3(a: Fixed32, b: Fixed32, m: Fixed64) -> Fixed32 {
    sat32(sat64(((a as i128) * (b as i128) * (m as i128)) >> 64))
}

/// WMA v1/v2 解码器
pub struct WmaDecoder {
    /// 协议版本 (1 或 2)
    version: u32,
    /// 是否已打开
    opened: bool,

    // ---- 流参数 ----
    sample_rate: u32,
    nb_channels: usize,
    bit_rate: u32,
    /// 一个超帧的字节数, 也是输入分包粒度
    block_align: usize,

    // ---- 码流特性开关 (extradata flags2) ----
    use_exp_vlc: bool,
    use_bit_reservoir: bool,
    use_variable_block_len: bool,
    use_noise_coding: bool,

    // ---- 帧/块几何 ----
    frame_len_bits: u32,
    frame_len: usize,
    nb_block_sizes: usize,
    /// 低频起始系数下标 (v1 为 3, v2 为 0)
    coefs_start: usize,
    /// 每个块尺寸的有效系数上限
    coefs_end: [usize; BLOCK_NB_SIZES],
    exponent_sizes: [usize; BLOCK_NB_SIZES],
    exponent_bands: [[u16; 25]; BLOCK_NB_SIZES],
    high_band_start: [usize; BLOCK_NB_SIZES],
    exponent_high_sizes: [usize; BLOCK_NB_SIZES],
    exponent_high_bands: [[usize; HIGH_BAND_MAX_SIZE]; BLOCK_NB_SIZES],
    /// 超帧头里 bit_offset 字段的位宽 (不含固定的 +3)
    byte_offset_bits: u32,

    // ---- 噪声整形 ----
    noise_mult: Fixed32,
    noise_table: Vec<Fixed32>,
    noise_index: usize,

    // ---- 窗与变换 ----
    windows: Vec<Vec<i32>>,
    mdct_ctx: Vec<MdctContext>,

    // ---- 码本 ----
    exp_vlc: Option<Vlc>,
    hgain_vlc: Option<Vlc>,
    coef_vlc: Vec<Vlc>,
    run_table: Vec<Vec<u16>>,
    level_table: Vec<Vec<u16>>,
    /// LSP 包络模式的余弦表 (use_exp_vlc 时为空)
    lsp_cos_table: Vec<i32>,

    // ---- 块解码状态 ----
    reset_block_lengths: bool,
    block_len_bits: u32,
    next_block_len_bits: u32,
    prev_block_len_bits: u32,
    block_len: usize,
    block_num: usize,
    block_pos: usize,
    ms_stereo: bool,
    channel_coded: [bool; MAX_CHANNELS],
    exponents: [Vec<Fixed32>; MAX_CHANNELS],
    max_exponent: [Fixed32; MAX_CHANNELS],
    high_band_coded: [[bool; HIGH_BAND_MAX_SIZE]; MAX_CHANNELS],
    high_band_values: [[i32; HIGH_BAND_MAX_SIZE]; MAX_CHANNELS],
    /// run-level 解出的整数电平
    coefs1: [Vec<i16>; MAX_CHANNELS],
    /// 反量化后的 MDCT 系数
    coefs: [Vec<Fixed32>; MAX_CHANNELS],
    /// 重叠相加缓冲, 长度 2 × frame_len
    frame_out: [Vec<Fixed32>; MAX_CHANNELS],

    // ---- 比特储备 (跨超帧的残帧) ----
    last_superframe: Vec<u8>,
    last_bitoffset: u32,

    // ---- 输入/输出队列 ----
    buffer: Vec<u8>,
    pending: VecDeque<AudioFrame>,
    next_pts: i64,
    eof: bool,
}

impl WmaDecoder {
    pub fn create_v1() -> YunResult<Box<dyn Decoder>> {
        Ok(Box::new(Self::new(1)))
    }

    pub fn create_v2() -> YunResult<Box<dyn Decoder>> {
        Ok(Box::new(Self::new(2)))
    }

    fn new(version: u32) -> Self {
        Self {
            version,
            opened: false,
            sample_rate: 0,
            nb_channels: 0,
            bit_rate: 0,
            block_align: 0,
            use_exp_vlc: false,
            use_bit_reservoir: false,
            use_variable_block_len: false,
            use_noise_coding: false,
            frame_len_bits: 0,
            frame_len: 0,
            nb_block_sizes: 0,
            coefs_start: 0,
            coefs_end: [0; BLOCK_NB_SIZES],
            exponent_sizes: [0; BLOCK_NB_SIZES],
            exponent_bands: [[0; 25]; BLOCK_NB_SIZES],
            high_band_start: [0; BLOCK_NB_SIZES],
            exponent_high_sizes: [0; BLOCK_NB_SIZES],
            exponent_high_bands: [[0; HIGH_BAND_MAX_SIZE]; BLOCK_NB_SIZES],
            byte_offset_bits: 0,
            noise_mult: 0,
            noise_table: Vec::new(),
            noise_index: 0,
            windows: Vec::new(),
            mdct_ctx: Vec::new(),
            exp_vlc: None,
            hgain_vlc: None,
            coef_vlc: Vec::new(),
            run_table: Vec::new(),
            level_table: Vec::new(),
            lsp_cos_table: Vec::new(),
            reset_block_lengths: true,
            block_len_bits: 0,
            next_block_len_bits: 0,
            prev_block_len_bits: 0,
            block_len: 0,
            block_num: 0,
            block_pos: 0,
            ms_stereo: false,
            channel_coded: [false; MAX_CHANNELS],
            exponents: [Vec::new(), Vec::new()],
            max_exponent: [0; MAX_CHANNELS],
            high_band_coded: [[false; HIGH_BAND_MAX_SIZE]; MAX_CHANNELS],
            high_band_values: [[0; HIGH_BAND_MAX_SIZE]; MAX_CHANNELS],
            coefs1: [Vec::new(), Vec::new()],
            coefs: [Vec::new(), Vec::new()],
            frame_out: [Vec::new(), Vec::new()],
            last_superframe: Vec::new(),
            last_bitoffset: 0,
            buffer: Vec::new(),
            pending: VecDeque::new(),
            next_pts: 0,
            eof: false,
        }
    }

    /// 按流参数与 extradata 完成全部初始化
    fn init(&mut self, params: &CodecParameters) -> YunResult<()> {
        let audio = params
            .audio()
            .ok_or_else(|| YunError::InvalidArgument("WMA 需要音频流参数".into()))?;
        if audio.sample_rate == 0 {
            return Err(YunError::InvalidArgument("采样率不能为 0".into()));
        }
        let nb_channels = audio.channel_layout.channels as usize;
        if nb_channels == 0 || nb_channels > MAX_CHANNELS {
            return Err(YunError::Unsupported(format!(
                "不支持的声道数: {nb_channels}"
            )));
        }
        if audio.block_align == 0 {
            return Err(YunError::InvalidArgument("block_align 不能为 0".into()));
        }
        if params.bit_rate == 0 {
            return Err(YunError::InvalidArgument("码率不能为 0".into()));
        }
        self.sample_rate = audio.sample_rate;
        self.nb_channels = nb_channels;
        self.block_align = audio.block_align as usize;
        self.bit_rate = params.bit_rate as u32;

        // extradata 过短时按 flags2 = 0 处理 (全部特性关闭)
        let extradata = &params.extra_data;
        let flags2: u32 = if self.version == 1 && extradata.len() >= 4 {
            (extradata[2] as u32) | ((extradata[3] as u32) << 8)
        } else if self.version == 2 && extradata.len() >= 6 {
            (extradata[4] as u32) | ((extradata[5] as u32) << 8)
        } else {
            0
        };
        self.use_exp_vlc = flags2 & 0x0001 != 0;
        self.use_bit_reservoir = flags2 & 0x0002 != 0;
        self.use_variable_block_len = flags2 & 0x0004 != 0;

        // MDCT 帧长按采样率分档
        self.frame_len_bits = if self.sample_rate <= 16000 {
            9
        } else if self.sample_rate <= 22050 || (self.sample_rate <= 32000 && self.version == 1) {
            10
        } else {
            11
        };
        self.frame_len = 1 << self.frame_len_bits;
        if self.use_variable_block_len {
            let mut nb = ((flags2 >> 3) & 3) as u32 + 1;
            if self.bit_rate / self.nb_channels as u32 >= 32000 {
                nb += 2;
            }
            let nb_max = self.frame_len_bits - BLOCK_MIN_BITS;
            if nb > nb_max {
                nb = nb_max;
            }
            self.nb_block_sizes = nb as usize + 1;
        } else {
            self.nb_block_sizes = 1;
        }

        // v2 按归一化采样率选择码率分档
        self.use_noise_coding = true;
        let mut high_freq: i64 = (self.sample_rate as i64) << 15;
        let sample_rate1 = if self.version == 2 {
            match self.sample_rate {
                r if r >= 44100 => 44100,
                r if r >= 22050 => 22050,
                r if r >= 16000 => 16000,
                r if r >= 11025 => 11025,
                r if r >= 8000 => 8000,
                r => r,
            }
        } else {
            self.sample_rate
        };

        // 每采样比特数, Q16.16
        let bps: Fixed32 = sat32(
            ((self.bit_rate as i64) << 16) / (self.nb_channels as i64 * self.sample_rate as i64),
        );
        let bytes_per_frame = (((bps as i64) * self.frame_len as i64) / 8) >> 16;
        self.byte_offset_bits = ilog2(bytes_per_frame.max(0) as u32) + 2;

        // 按码率决定是否启用噪声编码, 以及重建的高频上限
        let bps1 = if self.nb_channels == 2 {
            mul32(bps, 0x1999a)
        } else {
            bps
        };
        if sample_rate1 == 44100 {
            if bps1 >= 0x9c29 {
                self.use_noise_coding = false;
            } else {
                high_freq = (high_freq * 0x6666) >> 16;
            }
        } else if sample_rate1 == 22050 {
            if bps1 >= 0x128f6 {
                self.use_noise_coding = false;
            } else if bps1 >= 0xb852 {
                high_freq = (high_freq * 0xb333) >> 16;
            } else {
                high_freq = (high_freq * 0x999a) >> 16;
            }
        } else if sample_rate1 == 16000 {
            if bps > 0x8000 {
                high_freq = (high_freq * 0x8000) >> 16;
            } else {
                high_freq = (high_freq * 0x4ccd) >> 16;
            }
        } else if sample_rate1 == 11025 {
            high_freq = (high_freq * 0xb333) >> 16;
        } else if sample_rate1 == 8000 {
            if bps <= 0xa000 {
                high_freq = (high_freq * 0x8000) >> 16;
            } else if bps > 0xc000 {
                self.use_noise_coding = false;
            } else {
                high_freq = (high_freq * 0xa666) >> 16;
            }
        } else if bps >= 0xcccd {
            high_freq = (high_freq * 0xc000) >> 16;
        } else if bps >= 0x999a {
            high_freq = (high_freq * 0x999a) >> 16;
        } else {
            high_freq = (high_freq * 0x8000) >> 16;
        }

        // 每个块尺寸的指数频带划分与高频噪声带
        self.coefs_start = if self.version == 1 { 3 } else { 0 };
        for k in 0..self.nb_block_sizes {
            let block_len = self.frame_len >> k;
            let rate = self.sample_rate as u64;

            if self.version == 1 {
                let mut lpos = 0u64;
                let mut count = 0usize;
                for i in 0..CRITICAL_FREQS.len() {
                    let a = CRITICAL_FREQS[i] as u64;
                    let mut pos = (block_len as u64 * 2 * a + (rate >> 1)) / rate;
                    if pos > block_len as u64 {
                        pos = block_len as u64;
                    }
                    self.exponent_bands[k][i] = (pos - lpos) as u16;
                    count = i + 1;
                    if pos >= block_len as u64 {
                        break;
                    }
                    lpos = pos;
                }
                self.exponent_sizes[k] = count;
            } else {
                let mut lpos = 0u64;
                let mut j = 0usize;
                for &freq in CRITICAL_FREQS.iter() {
                    let a = freq as u64;
                    let mut pos = (block_len as u64 * 2 * a + (rate << 1)) / (4 * rate);
                    pos <<= 2;
                    if pos > block_len as u64 {
                        pos = block_len as u64;
                    }
                    if pos > lpos {
                        self.exponent_bands[k][j] = (pos - lpos) as u16;
                        j += 1;
                    }
                    if pos >= block_len as u64 {
                        break;
                    }
                    lpos = pos;
                }
                self.exponent_sizes[k] = j;
            }

            self.coefs_end[k] = (self.frame_len - self.frame_len * 9 / 100) >> k;

            let rate = self.sample_rate as i64;
            self.high_band_start[k] =
                ((2 * block_len as i64 * high_freq + (rate << 15)) / (rate << 16)) as usize;

            let mut j = 0usize;
            let mut pos = 0usize;
            for i in 0..self.exponent_sizes[k] {
                let mut start = pos;
                pos += self.exponent_bands[k][i] as usize;
                let mut end = pos;
                if start < self.high_band_start[k] {
                    start = self.high_band_start[k];
                }
                if end > self.coefs_end[k] {
                    end = self.coefs_end[k];
                }
                if end > start && j < HIGH_BAND_MAX_SIZE {
                    self.exponent_high_bands[k][j] = end - start;
                    j += 1;
                }
            }
            self.exponent_high_sizes[k] = j;
        }

        // 正弦窗与各尺寸 IMDCT
        self.windows.clear();
        self.mdct_ctx.clear();
        for i in 0..self.nb_block_sizes {
            self.windows
                .push(build_sine_window(self.frame_len_bits - i as u32));
            self.mdct_ctx
                .push(MdctContext::new(self.frame_len_bits - i as u32 + 1));
        }

        // 噪声发生器与高频增益码本
        if self.use_noise_coding {
            self.noise_mult = if self.use_exp_vlc { 0x51f } else { 0xa3d };
            let norm = mul32(SQRT3_Q16, self.noise_mult);
            let mut seed: u32 = 1;
            let mut noise_table = vec![0i32; NOISE_TAB_SIZE];
            for v in noise_table.iter_mut() {
                seed = seed.wrapping_mul(314159).wrapping_add(1);
                *v = mul32b(seed as i32, norm);
            }
            self.noise_table = noise_table;
            self.hgain_vlc = Some(Vlc::build(9, &HGAIN_VLC_LENGTHS)?);
        } else {
            self.noise_table = Vec::new();
            self.hgain_vlc = None;
        }

        if self.use_exp_vlc {
            self.exp_vlc = Some(Vlc::build(9, &EXP_VLC_LENGTHS)?);
            self.lsp_cos_table = Vec::new();
        } else {
            self.exp_vlc = None;
            self.lsp_cos_table = build_lsp_cos_table(self.frame_len);
        }

        // 系数码本: 主声道一套, MS 差分声道一套
        self.coef_vlc = vec![
            Vlc::build(9, &COEF_VLC_LENGTHS_A)?,
            Vlc::build(9, &COEF_VLC_LENGTHS_B)?,
        ];
        let (run_a, level_a) = build_run_level(&LEVEL_RUNS_A, COEF_VLC_LENGTHS_A.len());
        let (run_b, level_b) = build_run_level(&LEVEL_RUNS_B, COEF_VLC_LENGTHS_B.len());
        self.run_table = vec![run_a, run_b];
        self.level_table = vec![level_a, level_b];

        // 工作缓冲
        for ch in 0..MAX_CHANNELS {
            self.exponents[ch] = vec![0; self.frame_len];
            self.coefs1[ch] = vec![0; self.frame_len];
            self.coefs[ch] = vec![0; self.frame_len];
            self.frame_out[ch] = vec![0; 2 * self.frame_len];
        }
        self.max_exponent = [0; MAX_CHANNELS];
        self.noise_index = 0;
        self.reset_block_lengths = true;
        self.block_len_bits = self.frame_len_bits;
        self.prev_block_len_bits = self.frame_len_bits;
        self.next_block_len_bits = self.frame_len_bits;
        self.block_len = self.frame_len;
        self.block_num = 0;
        self.block_pos = 0;
        self.ms_stereo = false;
        self.channel_coded = [false; MAX_CHANNELS];

        self.last_superframe = Vec::new();
        self.last_bitoffset = 0;
        self.buffer.clear();
        self.pending.clear();
        self.next_pts = 0;
        self.eof = false;
        self.opened = true;

        debug!(
            "wmav{} 初始化: rate={} ch={} frame_len={} 变块长={} 噪声={} exp_vlc={} 储备={}",
            self.version,
            self.sample_rate,
            self.nb_channels,
            self.frame_len,
            self.use_variable_block_len,
            self.use_noise_coding,
            self.use_exp_vlc,
            self.use_bit_reservoir,
        );
        Ok(())
    }

    /// 解一个超帧 (一个 block_align 大小的数据包), 返回交错 PCM
    fn decode_superframe(&mut self, buf: &[u8]) -> YunResult<Vec<i16>> {
        match self.decode_superframe_inner(buf) {
            Ok(samples) => Ok(samples),
            Err(e) => {
                warn!("wmav{} 超帧解码失败, 重置比特储备: {e}", self.version);
                self.reservoir_reset();
                Err(e)
            }
        }
    }

    fn decode_superframe_inner(&mut self, buf: &[u8]) -> YunResult<Vec<i16>> {
        if buf.is_empty() {
            self.reservoir_reset();
            return Ok(Vec::new());
        }
        let mut samples = Vec::with_capacity(self.frame_len * self.nb_channels * 2);
        let mut gb = BitCache::new(buf, buf.len() * 8);

        if self.use_bit_reservoir {
            gb.skip(4); // 超帧序号
            let nb_frames = gb.get(4) as i32 - 1;
            let bit_offset = gb.get(self.byte_offset_bits + 3) as usize;

            if !self.last_superframe.is_empty() {
                // 上一包的残帧: 接上本包开头的 bit_offset 位后解码
                if self.last_superframe.len() + ((bit_offset + 7) >> 3) > MAX_CODED_SUPERFRAME_SIZE
                {
                    return Err(YunError::InvalidData("比特储备超出上限".into()));
                }
                let mut carry = std::mem::take(&mut self.last_superframe);
                let mut len = bit_offset as u32;
                while len > 7 {
                    carry.push(gb.get(8) as u8);
                    len -= 8;
                }
                if len > 0 {
                    carry.push((gb.get(len) << (8 - len)) as u8);
                }

                let mut cgb = BitCache::new(&carry, carry.len() * 8);
                if self.last_bitoffset > 0 {
                    cgb.skip(self.last_bitoffset);
                }
                self.decode_frame(&mut cgb, &mut samples)?;
            }

            // 从 bit_offset 起解出本包内的完整帧
            let pos0 = bit_offset + 4 + 4 + self.byte_offset_bits as usize + 3;
            if pos0 >> 3 > buf.len() {
                return Err(YunError::InvalidData("超帧位偏移越界".into()));
            }
            let frames_buf = &buf[pos0 >> 3..];
            let mut fgb = BitCache::new(frames_buf, frames_buf.len() * 8);
            if pos0 & 7 != 0 {
                fgb.skip((pos0 & 7) as u32);
            }
            self.reset_block_lengths = true;
            for _ in 0..nb_frames.max(0) {
                self.decode_frame(&mut fgb, &mut samples)?;
            }

            // 留存最后一个不完整帧, 等下一包续上
            let pos = fgb.bits_read() + (pos0 & !7);
            self.last_bitoffset = (pos & 7) as u32;
            let pos_bytes = pos >> 3;
            if pos_bytes > buf.len() {
                return Err(YunError::InvalidData("超帧尾部越界".into()));
            }
            if buf.len() - pos_bytes > MAX_CODED_SUPERFRAME_SIZE {
                return Err(YunError::InvalidData("超帧尾部过长".into()));
            }
            self.last_superframe.clear();
            self.last_superframe.extend_from_slice(&buf[pos_bytes..]);
        } else {
            self.decode_frame(&mut gb, &mut samples)?;
        }
        Ok(samples)
    }

    /// 解一帧 frame_len 采样, PCM 追加到 samples (交错排列)
    fn decode_frame(&mut self, gb: &mut BitCache<'_>, samples: &mut Vec<i16>) -> YunResult<()> {
        self.block_num = 0;
        self.block_pos = 0;
        loop {
            if self.decode_block(gb)? {
                break;
            }
        }
        if gb.overran() {
            return Err(YunError::InvalidData("帧码流越界".into()));
        }

        // 重叠相加缓冲前半段即本帧输出, 四舍五入收窄到 16 位
        let n = self.frame_len;
        let base = samples.len();
        samples.resize(base + n * self.nb_channels, 0);
        for ch in 0..self.nb_channels {
            for i in 0..n {
                let x = self.frame_out[ch][i] as i64;
                let a = ((x + (1 << 14)) >> 15).clamp(-32768, 32767) as i16;
                samples[base + i * self.nb_channels + ch] = a;
            }
            // 后半帧滑动到前半, 供下一帧重叠
            self.frame_out[ch].copy_within(n..2 * n, 0);
            for v in &mut self.frame_out[ch][n..] {
                *v = 0;
            }
        }
        Ok(())
    }

    /// 解一个块. 返回 true 表示本帧最后一个块已完成
    fn decode_block(&mut self, gb: &mut BitCache<'_>) -> YunResult<bool> {
        // 块长: 变块长模式下码流给出与 frame_len_bits 的差值
        if self.use_variable_block_len {
            let n = ilog2(self.nb_block_sizes as u32 - 1) + 1;
            if self.reset_block_lengths {
                self.reset_block_lengths = false;
                let v = gb.get(n) as usize;
                if v >= self.nb_block_sizes {
                    return Err(YunError::InvalidData(format!("无效的上一块长档位: {v}")));
                }
                self.prev_block_len_bits = self.frame_len_bits - v as u32;
                let v = gb.get(n) as usize;
                if v >= self.nb_block_sizes {
                    return Err(YunError::InvalidData(format!("无效的当前块长档位: {v}")));
                }
                self.block_len_bits = self.frame_len_bits - v as u32;
            } else {
                self.prev_block_len_bits = self.block_len_bits;
                self.block_len_bits = self.next_block_len_bits;
            }
            let v = gb.get(n) as usize;
            if v >= self.nb_block_sizes {
                return Err(YunError::InvalidData(format!("无效的下一块长档位: {v}")));
            }
            self.next_block_len_bits = self.frame_len_bits - v as u32;
        } else {
            self.next_block_len_bits = self.frame_len_bits;
            self.prev_block_len_bits = self.frame_len_bits;
            self.block_len_bits = self.frame_len_bits;
        }
        self.block_len = 1 << self.block_len_bits;
        if self.block_pos + self.block_len > self.frame_len {
            return Err(YunError::InvalidData("块长超出帧边界".into()));
        }

        if self.nb_channels == 2 {
            self.ms_stereo = gb.get(1) != 0;
        }
        let mut any_coded = false;
        for ch in 0..self.nb_channels {
            let coded = gb.get(1) != 0;
            self.channel_coded[ch] = coded;
            any_coded |= coded;
        }
        if !any_coded {
            return Ok(self.finish_block());
        }

        let bsize = (self.frame_len_bits - self.block_len_bits) as usize;

        // 总增益, 127 为续读标记
        let mut total_gain = 1i32;
        loop {
            let a = gb.get(7) as i32;
            total_gain += a;
            if a != 127 {
                break;
            }
        }
        let coef_nb_bits = if total_gain < 15 {
            13
        } else if total_gain < 32 {
            12
        } else if total_gain < 40 {
            11
        } else if total_gain < 45 {
            10
        } else {
            9
        };

        let n = self.coefs_end[bsize] - self.coefs_start;
        let mut nb_coefs = [n; MAX_CHANNELS];

        // 高频带噪声标记与增益
        if self.use_noise_coding {
            let n1 = self.exponent_high_sizes[bsize];
            for ch in 0..self.nb_channels {
                if !self.channel_coded[ch] {
                    continue;
                }
                for i in 0..n1 {
                    let coded = gb.get(1) != 0;
                    self.high_band_coded[ch][i] = coded;
                    // 噪声替代的带不再传系数
                    if coded {
                        nb_coefs[ch] -= self.exponent_high_bands[bsize][i];
                    }
                }
            }
            for ch in 0..self.nb_channels {
                if !self.channel_coded[ch] {
                    continue;
                }
                let hgain_vlc = self
                    .hgain_vlc
                    .as_ref()
                    .ok_or_else(|| YunError::Codec("高频增益码本未初始化".into()))?;
                let mut values = [0i32; HIGH_BAND_MAX_SIZE];
                let mut last: Option<i32> = None;
                for i in 0..n1 {
                    if self.high_band_coded[ch][i] {
                        let v = match last {
                            None => gb.get(7) as i32 - 19,
                            Some(prev) => {
                                let code = hgain_vlc.get(gb)? as i32;
                                prev + code - 18
                            }
                        };
                        last = Some(v);
                        values[i] = v;
                    }
                }
                self.high_band_values[ch][..n1].copy_from_slice(&values[..n1]);
            }
        }

        // 短块可以选择沿用上一块的包络插值
        let parse_exponents = if self.block_len_bits != self.frame_len_bits {
            gb.get(1) != 0
        } else {
            true
        };
        if parse_exponents {
            for ch in 0..self.nb_channels {
                if !self.channel_coded[ch] {
                    continue;
                }
                let mut exps = std::mem::take(&mut self.exponents[ch]);
                let res = if self.use_exp_vlc {
                    match self.exp_vlc.as_ref() {
                        Some(exp_vlc) => decode_exp_vlc(
                            gb,
                            exp_vlc,
                            &self.exponent_bands[bsize][..self.exponent_sizes[bsize]],
                            self.version,
                            &mut exps[..self.block_len],
                        ),
                        None => Err(YunError::Codec("指数码本未初始化".into())),
                    }
                } else {
                    Ok(decode_exp_lsp(
                        gb,
                        &self.lsp_cos_table,
                        &mut exps[..self.block_len],
                    ))
                };
                self.exponents[ch] = exps;
                self.max_exponent[ch] = res?;
            }
        } else {
            for ch in 0..self.nb_channels {
                if self.channel_coded[ch] {
                    interpolate_array(
                        &mut self.exponents[ch],
                        1 << self.prev_block_len_bits,
                        self.block_len,
                    );
                }
            }
        }

        // run-level 频谱系数
        for ch in 0..self.nb_channels {
            if self.channel_coded[ch] {
                let tindex = usize::from(ch == 1 && self.ms_stereo);
                let mut coefs1 = std::mem::take(&mut self.coefs1[ch]);
                let block_len = self.block_len;
                let res = self.decode_run_level(
                    gb,
                    tindex,
                    nb_coefs[ch],
                    coef_nb_bits,
                    &mut coefs1[..block_len],
                );
                self.coefs1[ch] = coefs1;
                res?;
            }
            if self.version == 1 && self.nb_channels >= 2 {
                gb.align_to_byte();
            }
        }

        // 归一化因子: 1/(block_len/2), v1 额外乘 sqrt(block_len/2)
        let mut mdct_norm: Fixed32 = FIXED_ONE >> (self.block_len_bits - 1);
        if self.version == 1 {
            let n4 = (self.block_len >> 1) as i32;
            mdct_norm = mul32(mdct_norm, sqrt32(to_fixed32(n4)));
        }

        for ch in 0..self.nb_channels {
            if self.channel_coded[ch] {
                let mut coefs = std::mem::take(&mut self.coefs[ch]);
                self.dequant_channel(ch, bsize, nb_coefs[ch], total_gain, mdct_norm, &mut coefs);
                self.coefs[ch] = coefs;
            }
        }

        // MS 立体声在 MDCT 域还原
        if self.ms_stereo && self.channel_coded[1] {
            if !self.channel_coded[0] {
                for v in &mut self.coefs[0][..self.block_len] {
                    *v = 0;
                }
                self.channel_coded[0] = true;
            }
            for i in 0..self.block_len {
                let a = self.coefs[0][i];
                let b = self.coefs[1][i];
                self.coefs[0][i] = a.saturating_add(b);
                self.coefs[1][i] = a.saturating_sub(b);
            }
        }

        // 按前后块长拼出本块有效窗
        let block_len = self.block_len;
        let mut win = vec![0i32; 2 * block_len];
        stitch_block_window(
            &mut win,
            block_len,
            1 << self.prev_block_len_bits,
            1 << self.next_block_len_bits,
            &self.windows[bsize],
            &self.windows[(self.frame_len_bits - self.prev_block_len_bits) as usize],
            &self.windows[(self.frame_len_bits - self.next_block_len_bits) as usize],
        );

        // IMDCT, 加窗, 重叠相加
        for ch in 0..self.nb_channels {
            if !self.channel_coded[ch] {
                continue;
            }
            let mut output = self.mdct_ctx[bsize].imdct(&self.coefs[ch][..block_len]);
            for (o, &w) in output.iter_mut().zip(win.iter()) {
                *o = mul32(*o, w);
            }
            let index = self.frame_len / 2 + self.block_pos - block_len / 2;
            for (i, &o) in output.iter().enumerate() {
                let t = self.frame_out[ch][index + i];
                self.frame_out[ch][index + i] = t.saturating_add(o);
            }
            // MS 模式下差分声道未编码时, 两个声道输出相同
            if self.ms_stereo && !self.channel_coded[1] {
                for (i, &o) in output.iter().enumerate() {
                    let t = self.frame_out[1][index + i];
                    self.frame_out[1][index + i] = t.saturating_add(o);
                }
            }
        }

        Ok(self.finish_block())
    }

    /// run-level 解码一个声道的整数电平
    fn decode_run_level(
        &self,
        gb: &mut BitCache<'_>,
        tindex: usize,
        nb_coefs: usize,
        coef_nb_bits: u32,
        coefs1: &mut [i16],
    ) -> YunResult<()> {
        for v in coefs1.iter_mut() {
            *v = 0;
        }
        let vlc = &self.coef_vlc[tindex];
        let run_table = &self.run_table[tindex];
        let level_table = &self.level_table[tindex];
        let mut ptr = 0usize;
        loop {
            let code = vlc.get(gb)?;
            if code == 1 {
                // EOB
                break;
            }
            let (run, level) = if code == 0 {
                // 逃逸: 电平与游程直接编码
                let level = gb.get(coef_nb_bits) as i32;
                let run = gb.get(self.frame_len_bits) as usize;
                (run, level)
            } else {
                (run_table[code] as usize, level_table[code] as i32)
            };
            let sign = gb.get(1);
            let level = if sign == 0 { -level } else { level };
            ptr += run;
            if ptr >= nb_coefs {
                return Err(YunError::InvalidData("run-level 越过系数上限".into()));
            }
            coefs1[ptr] = level as i16;
            ptr += 1;
            // EOB 可以省略
            if ptr >= nb_coefs {
                break;
            }
        }
        Ok(())
    }

    /// 反量化: 电平 × 包络 × 总增益, 噪声编码时按区域混入噪声
    fn dequant_channel(
        &mut self,
        ch: usize,
        bsize: usize,
        nb_coefs: usize,
        total_gain: i32,
        mdct_norm: Fixed32,
        coefs: &mut [Fixed32],
    ) {
        let block_len = self.block_len;
        let coefs_start = self.coefs_start;
        let gain_idx = (total_gain.clamp(-20, 127) + 20) as usize;
        let mut mult: Fixed64 = div64(POW_GAIN[gain_idx], widen32(self.max_exponent[ch]));
        mult = sat64(((mult as i128) * (mdct_norm as i128)) >> 16);

        if self.use_noise_coding {
            let high_band_coded = self.high_band_coded[ch];
            let high_band_values = self.high_band_values[ch];
            let mut pos = 0usize;
            let mut exp_idx = 0usize;

            // 低频: 纯噪声
            for _ in 0..coefs_start {
                let noise = self.next_noise();
                coefs[pos] = dequant3(noise, self.exponents[ch][exp_idx], mult);
                pos += 1;
                exp_idx += 1;
            }

            let n1 = self.exponent_high_sizes[bsize];

            // 各高频带的包络能量, 用于匹配噪声功率
            let mut exp_power = [0i64; HIGH_BAND_MAX_SIZE];
            let mut last_high_band = 0usize;
            let mut ep = self.high_band_start[bsize].saturating_sub(coefs_start);
            for j in 0..n1 {
                let band_len = self.exponent_high_bands[bsize][j];
                if high_band_coded[j] {
                    let mut e2: i64 = 0;
                    for i in 0..band_len {
                        let v = self.exponents[ch][ep + i] as i64;
                        e2 += (v * v) >> 16;
                    }
                    exp_power[j] = e2 / band_len as i64;
                    last_high_band = j;
                }
                ep += band_len;
            }

            // 主频段 (j = 0) 与各高频带 (j >= 1)
            let mut coefs1_idx = 0usize;
            for j in 0..=n1 {
                let (band_len, noise_band) = if j == 0 {
                    (
                        self.high_band_start[bsize].saturating_sub(coefs_start),
                        false,
                    )
                } else {
                    (self.exponent_high_bands[bsize][j - 1], high_band_coded[j - 1])
                };
                if noise_band {
                    // 整带用指定功率的噪声重建
                    let denom = exp_power[last_high_band];
                    let ratio: Fixed32 = if denom == 0 {
                        i32::MAX
                    } else {
                        sat32((exp_power[j - 1] << 16) / denom)
                    };
                    let rt = sqrt32(ratio);
                    let hb_gain_idx = (high_band_values[j - 1].clamp(-20, 127) + 20) as usize;
                    let den = mul32(self.max_exponent[ch], self.noise_mult);
                    let mut mult1: Fixed64 = if den == 0 {
                        i64::MAX
                    } else {
                        sat64((rt as i128 * POW_GAIN[hb_gain_idx] as i128) / den as i128)
                    };
                    mult1 = sat64(((mult1 as i128) * (mdct_norm as i128)) >> 16);
                    for _ in 0..band_len {
                        let noise = self.next_noise();
                        coefs[pos] = dequant3(self.exponents[ch][exp_idx], noise, mult1);
                        pos += 1;
                        exp_idx += 1;
                    }
                } else {
                    // 已编码系数, 叠加轻噪声
                    for _ in 0..band_len {
                        let noise = self.next_noise();
                        let lvl = self.coefs1[ch][coefs1_idx] as i32;
                        coefs1_idx += 1;
                        let a = (lvl << 16).saturating_add(noise);
                        coefs[pos] = dequant3(a, self.exponents[ch][exp_idx], mult);
                        pos += 1;
                        exp_idx += 1;
                    }
                }
            }

            // 甚高频: 纯噪声, 包络延用最后一个值
            let last_exp = if exp_idx > 0 {
                self.exponents[ch][exp_idx - 1]
            } else {
                0
            };
            while pos < block_len {
                let noise = self.next_noise();
                coefs[pos] = dequant3(noise, last_exp, mult);
                pos += 1;
            }
        } else {
            for v in coefs.iter_mut().take(coefs_start) {
                *v = 0;
            }
            for i in 0..nb_coefs {
                let level = self.coefs1[ch][i] as i128;
                let e = self.exponents[ch][i] as i128;
                coefs[coefs_start + i] = sat32(sat64((level * e * (mult as i128)) >> 48));
            }
            for v in coefs.iter_mut().take(block_len).skip(coefs_start + nb_coefs) {
                *v = 0;
            }
        }
    }

    fn next_noise(&mut self) -> Fixed32 {
        let noise = self.noise_table[self.noise_index];
        self.noise_index = (self.noise_index + 1) & (NOISE_TAB_SIZE - 1);
        noise
    }

    fn finish_block(&mut self) -> bool {
        self.block_num += 1;
        self.block_pos += self.block_len;
        self.block_pos >= self.frame_len
    }

    fn make_frame(&mut self, samples: Vec<i16>) -> AudioFrame {
        let format = SampleFormat::S16;
        let nb_samples = (samples.len() / self.nb_channels) as u32;
        let mut data = Vec::with_capacity(samples.len() * format.bytes_per_sample() as usize);
        for s in &samples {
            data.extend_from_slice(&s.to_le_bytes());
        }
        let mut frame = AudioFrame::new(
            nb_samples,
            self.sample_rate,
            format,
            ChannelLayout::from_channels(self.nb_channels as u32),
        );
        frame.data = vec![data];
        frame.pts = self.next_pts;
        frame.time_base = Rational::new(1, self.sample_rate as i32);
        frame.duration = nb_samples as i64;
        self.next_pts += nb_samples as i64;
        frame
    }

    fn reservoir_reset(&mut self) {
        self.last_superframe.clear();
        self.last_bitoffset = 0;
    }
}

/// 展开 run/level 表: counts[l] 给出电平 l+1 的连续码字个数,
/// 码字 0/1 保留给逃逸与 EOB
fn build_run_level(counts: &[u8], n: usize) -> (Vec<u16>, Vec<u16>) {
    let mut run = vec![0u16; n];
    let mut level = vec![0u16; n];
    let mut i = 2usize;
    let mut lvl = 1u16;
    for &c in counts {
        for j in 0..c as usize {
            if i >= n {
                break;
            }
            run[i] = j as u16;
            level[i] = lvl;
            i += 1;
        }
        lvl += 1;
    }
    (run, level)
}

impl Decoder for WmaDecoder {
    fn codec_id(&self) -> CodecId {
        if self.version == 1 {
            CodecId::WmaV1
        } else {
            CodecId::WmaV2
        }
    }

    fn name(&self) -> &str {
        if self.version == 1 { "wmav1" } else { "wmav2" }
    }

    fn open(&mut self, params: &CodecParameters) -> YunResult<()> {
        self.init(params)
    }

    fn send_packet(&mut self, packet: &Packet) -> YunResult<()> {
        if !self.opened {
            return Err(YunError::Codec("WMA 解码器未打开".into()));
        }
        if packet.is_empty() {
            self.eof = true;
            return Ok(());
        }
        self.buffer.extend_from_slice(&packet.data);
        Ok(())
    }

    fn receive_frame(&mut self) -> YunResult<Frame> {
        if !self.opened {
            return Err(YunError::Codec("WMA 解码器未打开".into()));
        }
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(Frame::Audio(frame));
            }
            if self.buffer.len() < self.block_align {
                if self.eof {
                    return Err(YunError::Eof);
                }
                return Err(YunError::NeedMoreData);
            }
            let chunk: Vec<u8> = self.buffer[..self.block_align].to_vec();
            self.buffer.drain(..self.block_align);
            let samples = self.decode_superframe(&chunk)?;
            if samples.is_empty() {
                continue;
            }
            let frame = self.make_frame(samples);
            self.pending.push_back(frame);
        }
    }

    fn flush(&mut self) {
        self.buffer.clear();
        self.pending.clear();
        self.reservoir_reset();
        self.reset_block_lengths = true;
        self.block_len_bits = self.frame_len_bits;
        self.prev_block_len_bits = self.frame_len_bits;
        self.next_block_len_bits = self.frame_len_bits;
        self.block_len = self.frame_len;
        self.block_pos = 0;
        self.block_num = 0;
        self.noise_index = 0;
        for ch in 0..MAX_CHANNELS {
            for v in &mut self.frame_out[ch] {
                *v = 0;
            }
        }
        self.next_pts = 0;
        self.eof = false;
    }
}
