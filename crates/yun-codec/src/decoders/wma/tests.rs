//! WMA 解码器整体测试.
//!
//! 金样本码流按位手工构造 (合法的帧头/包络/run-level 序列), 期望 PCM
//! 为定点运算的精确结果, 任何一条运算路径变动都会使校验和偏离.

use super::*;
use crate::codec_parameters::{AudioCodecParams, CodecParamsType};

fn audio_params(
    version: u32,
    sample_rate: u32,
    channels: u32,
    bit_rate: u64,
    block_align: u32,
    extra: &[u8],
) -> CodecParameters {
    CodecParameters {
        codec_id: if version == 1 {
            CodecId::WmaV1
        } else {
            CodecId::WmaV2
        },
        extra_data: extra.to_vec(),
        bit_rate,
        params: CodecParamsType::Audio(AudioCodecParams {
            sample_rate,
            channel_layout: ChannelLayout::from_channels(channels),
            sample_format: SampleFormat::S16,
            frame_size: 0,
            block_align,
        }),
    }
}

fn open_raw(
    version: u32,
    sample_rate: u32,
    channels: u32,
    bit_rate: u64,
    block_align: u32,
    extra: &[u8],
) -> WmaDecoder {
    let mut dec = WmaDecoder::new(version);
    dec.init(&audio_params(
        version,
        sample_rate,
        channels,
        bit_rate,
        block_align,
        extra,
    ))
    .unwrap();
    dec
}

fn checksum(samples: &[i16]) -> u32 {
    samples
        .iter()
        .fold(0u32, |acc, &s| acc.wrapping_mul(31).wrapping_add(s as u16 as u32))
}

fn frame_pcm(frame: Frame) -> AudioFrame {
    let Frame::Audio(af) = frame;
    af
}

fn bytes_to_i16(data: &[u8]) -> Vec<i16> {
    data.chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect()
}

// ---- 金样本: v2 单声道 8 kHz / 16 kbps (指数 VLC, 无噪声编码) ----
//
// 两个超帧各含一帧: 增益 + 全零增量包络 + 若干 run-level 电平 (含一次
// 逃逸编码), 第二帧的包络含 ± 增量, 用于检验重叠相加的跨帧连续性.

const GOLDEN_V2_MONO_PKT1: [u8; 64] = [
    0xd0, 0x00, 0x00, 0x03, 0x3f, 0xfb, 0xc2, 0x80, 0x3a, 0xb0, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];
const GOLDEN_V2_MONO_PKT2: [u8; 64] = [
    0xd5, 0xea, 0x80, 0x00, 0x33, 0xbe, 0x1d, 0x60, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];
const GOLDEN_V2_MONO_PCM1_MID: [i16; 16] = [
    -963, -930, -892, -848, -799, -745, -687, -624, -557, -487, -414, -338,
    -259, -179, -97, -14,
];
const GOLDEN_V2_MONO_PCM2_MID: [i16; 16] = [
    978, 1073, 1164, 1248, 1327, 1400, 1466, 1525, 1577, 1621, 1657, 1685,
    1704, 1716, 1719, 1713,
];
const GOLDEN_V2_MONO_CRC1: u32 = 0xb5d909de;
const GOLDEN_V2_MONO_CRC2: u32 = 0xa1be5659;

// ---- 金样本: v1 单声道 8 kHz / 5.6 kbps (LSP 包络 + 高频噪声) ----
//
// 第一个高频带为噪声替代 (绝对增益 6), 低三个系数与甚高频由噪声
// 发生器填充, 其余电平叠加轻噪声.

const GOLDEN_V1_LSP_PKT: [u8; 64] = [
    0xd8, 0x86, 0x5b, 0x94, 0xa5, 0x8b, 0x2a, 0x11, 0x56, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];
const GOLDEN_V1_LSP_PCM_MID: [i16; 16] = [
    81, 338, 439, 216, -105, -295, -256, -110, 20, 104, 139, 82, -33, -113,
    -66, 64,
];
const GOLDEN_V1_LSP_CRC: u32 = 0xac65e939;

// ---- 金样本: v2 双声道 8 kHz / 32 kbps (比特储备) ----
//
// 第一包: 头 + 完整帧 F1 (MS 立体声, 两声道都编码) + F2 的前 32 位;
// 第二包: bit_offset=16 指向 F2 的剩余 16 位, 不含完整帧.

const GOLDEN_V2_RESERVOIR_PKT1: [u8; 16] = [
    0x02, 0x00, 0x0f, 0x60, 0x00, 0x00, 0x00, 0x00, 0x24, 0xd6, 0x0a, 0xa4,
    0x55, 0xf0, 0x00, 0x01,
];
const GOLDEN_V2_RESERVOIR_PKT2: [u8; 16] = [
    0x11, 0x01, 0x0d, 0xed, 0x60, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];
const GOLDEN_V2_RESERVOIR_PCM1_MID: [i16; 16] = [
    19, -62, 21, -63, 23, -65, 25, -66, 27, -67, 29, -69, 30, -70, 32, -71,
];
const GOLDEN_V2_RESERVOIR_PCM2_MID: [i16; 16] = [
    430, 35, 426, 38, 421, 41, 416, 44, 411, 47, 405, 50, 400, 53, 395, 56,
];
const GOLDEN_V2_RESERVOIR_CRC1: u32 = 0x982033de;
const GOLDEN_V2_RESERVOIR_CRC2: u32 = 0xb8a49e1c;

// ---- 金样本: v2 单声道变块长 (两个 256 块) ----
//
// 第一块给出 prev/cur/next 三个块长码, 第二块只给 next 并复用上一块
// 的包络 (parse_exponents = 0 走插值路径).

const GOLDEN_V2_VARBLOCK_PKT: [u8; 64] = [
    0xfb, 0x1b, 0x80, 0x00, 0x19, 0x75, 0x9a, 0xca, 0x15, 0x80, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];
const GOLDEN_V2_VARBLOCK_PCM_MID: [i16; 16] = [
    -95, -94, -94, -93, -93, -92, -91, -91, -90, -89, -88, -87, -86, -85,
    -84, -83,
];
const GOLDEN_V2_VARBLOCK_CRC: u32 = 0x70d85324;

const EXTRA_V2_PLAIN: [u8; 6] = [0, 0, 0, 0, 0x01, 0x00];
const EXTRA_V2_RESERVOIR: [u8; 6] = [0, 0, 0, 0, 0x03, 0x00];
const EXTRA_V2_VARBLOCK: [u8; 6] = [0, 0, 0, 0, 0x05, 0x00];
const EXTRA_V1_LSP: [u8; 4] = [0, 0, 0, 0];

#[test]
fn test_v2_mono_golden_frames() {
    let mut dec = open_raw(2, 8000, 1, 16000, 64, &EXTRA_V2_PLAIN);
    assert!(dec.use_exp_vlc);
    assert!(!dec.use_noise_coding);
    assert!(!dec.use_bit_reservoir);

    let pcm1 = dec.decode_superframe(&GOLDEN_V2_MONO_PKT1).unwrap();
    assert_eq!(pcm1.len(), 512);
    assert_eq!(&pcm1[200..216], &GOLDEN_V2_MONO_PCM1_MID);
    assert_eq!(checksum(&pcm1), GOLDEN_V2_MONO_CRC1);
    // 第一帧包络增量全零, 所有档位停在 POW_TAB 的 1.0
    assert_eq!(dec.max_exponent[0], FIXED_ONE);

    // 第二帧叠加在第一帧的重叠尾巴上
    let pcm2 = dec.decode_superframe(&GOLDEN_V2_MONO_PKT2).unwrap();
    assert_eq!(pcm2.len(), 512);
    assert_eq!(&pcm2[200..216], &GOLDEN_V2_MONO_PCM2_MID);
    assert_eq!(checksum(&pcm2), GOLDEN_V2_MONO_CRC2);
    // 第二帧的最大包络来自 +4 增量档位
    assert_eq!(dec.max_exponent[0], tables::POW_TAB[100]);
}

#[test]
fn test_v1_lsp_noise_golden_frame() {
    let mut dec = open_raw(1, 8000, 1, 5600, 64, &EXTRA_V1_LSP);
    assert!(!dec.use_exp_vlc);
    assert!(dec.use_noise_coding);
    assert_eq!(dec.noise_mult, 0xa3d);
    assert_eq!(dec.coefs_start, 3);

    let pcm = dec.decode_superframe(&GOLDEN_V1_LSP_PKT).unwrap();
    assert_eq!(pcm.len(), 512);
    assert_eq!(&pcm[200..216], &GOLDEN_V1_LSP_PCM_MID);
    assert_eq!(checksum(&pcm), GOLDEN_V1_LSP_CRC);
    // 噪声发生器指针走过低频 + 主频段 + 噪声带 + 甚高频
    assert!(dec.noise_index > 0);
}

#[test]
fn test_v2_reservoir_golden_via_protocol() {
    let mut dec = WmaDecoder::create_v2().unwrap();
    dec.open(&audio_params(2, 8000, 2, 32000, 16, &EXTRA_V2_RESERVOIR))
        .unwrap();

    dec.send_packet(&Packet::from_data(GOLDEN_V2_RESERVOIR_PKT1.to_vec()))
        .unwrap();
    let af = frame_pcm(dec.receive_frame().unwrap());
    assert_eq!(af.nb_samples, 512);
    assert_eq!(af.pts, 0);
    assert_eq!(af.duration, 512);
    assert_eq!(af.sample_rate, 8000);
    assert_eq!(af.sample_format, SampleFormat::S16);
    assert_eq!(af.channel_layout, ChannelLayout::from_channels(2));
    assert_eq!(af.time_base, Rational::new(1, 8000));
    let pcm1 = bytes_to_i16(&af.data[0]);
    assert_eq!(pcm1.len(), 1024);
    assert_eq!(&pcm1[400..416], &GOLDEN_V2_RESERVOIR_PCM1_MID);
    assert_eq!(checksum(&pcm1), GOLDEN_V2_RESERVOIR_CRC1);

    // 残帧还在储备里, 要等下一包
    assert!(matches!(dec.receive_frame(), Err(YunError::NeedMoreData)));

    dec.send_packet(&Packet::from_data(GOLDEN_V2_RESERVOIR_PKT2.to_vec()))
        .unwrap();
    let af2 = frame_pcm(dec.receive_frame().unwrap());
    assert_eq!(af2.pts, 512);
    let pcm2 = bytes_to_i16(&af2.data[0]);
    assert_eq!(pcm2.len(), 1024);
    assert_eq!(&pcm2[400..416], &GOLDEN_V2_RESERVOIR_PCM2_MID);
    assert_eq!(checksum(&pcm2), GOLDEN_V2_RESERVOIR_CRC2);
}

#[test]
fn test_v2_variable_block_golden() {
    let mut dec = open_raw(2, 8000, 1, 16000, 64, &EXTRA_V2_VARBLOCK);
    assert!(dec.use_variable_block_len);
    assert_eq!(dec.nb_block_sizes, 2);

    let pcm = dec.decode_superframe(&GOLDEN_V2_VARBLOCK_PKT).unwrap();
    assert_eq!(pcm.len(), 512);
    // 首块 256 点, 窗的左沿从 128 处才开始有能量
    assert!(pcm[..128].iter().all(|&s| s == 0));
    assert_eq!(&pcm[200..216], &GOLDEN_V2_VARBLOCK_PCM_MID);
    assert_eq!(checksum(&pcm), GOLDEN_V2_VARBLOCK_CRC);
}

#[test]
fn test_frame_geometry_v2_8000() {
    let dec = open_raw(2, 8000, 1, 16000, 64, &EXTRA_V2_PLAIN);
    assert_eq!(dec.frame_len, 512);
    assert_eq!(dec.coefs_start, 0);
    assert_eq!(dec.coefs_end[0], 466);
    assert_eq!(dec.high_band_start[0], 512);
    assert_eq!(dec.byte_offset_bits, 9);
    assert_eq!(dec.exponent_sizes[0], 18);
    let expect: [u16; 18] = [
        12, 12, 16, 12, 12, 16, 20, 16, 24, 24, 24, 32, 36, 40, 48, 60, 68,
        40,
    ];
    assert_eq!(&dec.exponent_bands[0][..18], &expect[..]);
    // 高频起点在频谱之外, 没有噪声带
    assert_eq!(dec.exponent_high_sizes[0], 0);
}

#[test]
fn test_frame_geometry_v1_8000() {
    let dec = open_raw(1, 8000, 1, 5600, 64, &EXTRA_V1_LSP);
    assert_eq!(dec.frame_len, 512);
    assert_eq!(dec.coefs_end[0], 466);
    assert_eq!(dec.high_band_start[0], 333);
    assert_eq!(dec.byte_offset_bits, 7);
    assert_eq!(dec.exponent_sizes[0], 18);
    let expect: [u16; 18] = [
        13, 13, 12, 13, 14, 16, 18, 19, 20, 25, 26, 31, 36, 41, 49, 57, 71,
        38,
    ];
    assert_eq!(&dec.exponent_bands[0][..18], &expect[..]);
    assert_eq!(dec.exponent_high_sizes[0], 3);
    assert_eq!(&dec.exponent_high_bands[0][..3], &[13, 57, 63]);
}

#[test]
fn test_frame_geometry_v2_44100_变块长() {
    let dec = open_raw(2, 44100, 2, 24000, 1024, &[0, 0, 0, 0, 0x1f, 0x00]);
    assert_eq!(dec.frame_len, 2048);
    assert_eq!(dec.nb_block_sizes, 5);
    assert!(dec.use_noise_coding);
    assert_eq!(dec.noise_mult, 0x51f);
    assert_eq!(dec.byte_offset_bits, 8);
    assert_eq!(dec.coefs_end, [1864, 932, 466, 233, 116]);
    assert_eq!(dec.high_band_start, [819, 410, 205, 102, 51]);
    assert_eq!(dec.exponent_sizes, [25, 25, 22, 18, 13]);
    // 最短块 (128 点) 的频带划分
    let expect: [u16; 13] = [4, 4, 4, 4, 4, 4, 8, 4, 8, 12, 12, 20, 40];
    assert_eq!(&dec.exponent_bands[4][..13], &expect[..]);
    assert_eq!(dec.exponent_high_sizes, [4, 4, 4, 4, 4]);
    assert_eq!(&dec.exponent_high_bands[0][..4], &[65, 232, 324, 424]);
    assert_eq!(&dec.exponent_high_bands[4][..4], &[5, 12, 20, 28]);
}

#[test]
fn test_init_rejects_bad_params() {
    let mut dec = WmaDecoder::new(2);
    let p = audio_params(2, 44100, 3, 128000, 4096, &[]);
    assert!(matches!(dec.init(&p), Err(YunError::Unsupported(_))));

    let p = audio_params(2, 44100, 0, 128000, 4096, &[]);
    assert!(matches!(dec.init(&p), Err(YunError::Unsupported(_))));

    let p = audio_params(2, 0, 2, 128000, 4096, &[]);
    assert!(matches!(dec.init(&p), Err(YunError::InvalidArgument(_))));

    let p = audio_params(2, 44100, 2, 0, 4096, &[]);
    assert!(matches!(dec.init(&p), Err(YunError::InvalidArgument(_))));

    let p = audio_params(2, 44100, 2, 128000, 0, &[]);
    assert!(matches!(dec.init(&p), Err(YunError::InvalidArgument(_))));

    let p = CodecParameters {
        codec_id: CodecId::WmaV2,
        extra_data: Vec::new(),
        bit_rate: 128000,
        params: CodecParamsType::None,
    };
    assert!(matches!(dec.init(&p), Err(YunError::InvalidArgument(_))));
}

#[test]
fn test_use_before_open_is_error() {
    let mut dec = WmaDecoder::create_v2().unwrap();
    let pkt = Packet::from_data(vec![0u8; 64]);
    assert!(matches!(dec.send_packet(&pkt), Err(YunError::Codec(_))));
    assert!(matches!(dec.receive_frame(), Err(YunError::Codec(_))));
}

#[test]
fn test_receive_buffers_partial_superframes() {
    let mut dec = WmaDecoder::create_v2().unwrap();
    dec.open(&audio_params(2, 8000, 1, 16000, 64, &EXTRA_V2_PLAIN))
        .unwrap();
    assert!(matches!(dec.receive_frame(), Err(YunError::NeedMoreData)));

    // 半个超帧不够解码, 凑齐后两半拼成一个完整超帧
    dec.send_packet(&Packet::from_data(GOLDEN_V2_MONO_PKT1[..32].to_vec()))
        .unwrap();
    assert!(matches!(dec.receive_frame(), Err(YunError::NeedMoreData)));
    dec.send_packet(&Packet::from_data(GOLDEN_V2_MONO_PKT1[32..].to_vec()))
        .unwrap();
    let af = frame_pcm(dec.receive_frame().unwrap());
    assert_eq!(af.nb_samples, 512);
    assert_eq!(checksum(&bytes_to_i16(&af.data[0])), GOLDEN_V2_MONO_CRC1);
}

#[test]
fn test_empty_packet_then_eof() {
    let mut dec = WmaDecoder::create_v2().unwrap();
    dec.open(&audio_params(2, 8000, 1, 16000, 64, &EXTRA_V2_PLAIN))
        .unwrap();
    dec.send_packet(&Packet::from_data(GOLDEN_V2_MONO_PKT1.to_vec()))
        .unwrap();
    dec.send_packet(&Packet::empty()).unwrap();
    // 先吐出已缓冲的帧, 再报 EOF
    let af = frame_pcm(dec.receive_frame().unwrap());
    assert_eq!(af.nb_samples, 512);
    assert!(matches!(dec.receive_frame(), Err(YunError::Eof)));
}

#[test]
fn test_garbage_packet_is_invalid_data() {
    let mut dec = open_raw(2, 8000, 1, 16000, 64, &EXTRA_V2_PLAIN);
    let res = dec.decode_superframe(&[0xff; 64]);
    assert!(matches!(res, Err(YunError::InvalidData(_))));
}

#[test]
fn test_reservoir_recovers_after_bad_packet() {
    let mut dec = open_raw(2, 8000, 2, 32000, 16, &EXTRA_V2_RESERVOIR);
    // 坏包的位偏移指向包外
    assert!(dec.decode_superframe(&[0xff; 16]).is_err());
    assert!(dec.last_superframe.is_empty());

    // 重置后正常的超帧序列不受影响
    let pcm1 = dec.decode_superframe(&GOLDEN_V2_RESERVOIR_PKT1).unwrap();
    assert_eq!(checksum(&pcm1), GOLDEN_V2_RESERVOIR_CRC1);
    let pcm2 = dec.decode_superframe(&GOLDEN_V2_RESERVOIR_PKT2).unwrap();
    assert_eq!(checksum(&pcm2), GOLDEN_V2_RESERVOIR_CRC2);
}

#[test]
fn test_flush_resets_stream_state() {
    let mut dec = WmaDecoder::create_v2().unwrap();
    dec.open(&audio_params(2, 8000, 1, 16000, 64, &EXTRA_V2_PLAIN))
        .unwrap();
    dec.send_packet(&Packet::from_data(GOLDEN_V2_MONO_PKT1.to_vec()))
        .unwrap();
    let af = frame_pcm(dec.receive_frame().unwrap());
    assert_eq!(af.pts, 0);

    dec.flush();
    assert!(matches!(dec.receive_frame(), Err(YunError::NeedMoreData)));

    // 重叠缓冲与 pts 清零后, 同一包解出与首帧完全一致的 PCM
    dec.send_packet(&Packet::from_data(GOLDEN_V2_MONO_PKT1.to_vec()))
        .unwrap();
    let af2 = frame_pcm(dec.receive_frame().unwrap());
    assert_eq!(af2.pts, 0);
    assert_eq!(checksum(&bytes_to_i16(&af2.data[0])), GOLDEN_V2_MONO_CRC1);
}

#[test]
fn test_uncoded_block_outputs_overlap_tail() {
    // 首位 0 表示声道未编码, 整块无数据, 仅输出上一块的重叠尾巴 (全零)
    let mut dec = open_raw(2, 8000, 1, 16000, 64, &EXTRA_V2_PLAIN);
    let mut pkt = [0u8; 64];
    pkt[0] = 0x00;
    let pcm = dec.decode_superframe(&pkt).unwrap();
    assert_eq!(pcm.len(), 512);
    assert!(pcm.iter().all(|&s| s == 0));
}

#[test]
fn test_run_level_overflow_is_rejected() {
    // 帧头与包络合法, 但逃逸编码的游程 500 越过系数上限 466
    let mut dec = open_raw(2, 8000, 1, 16000, 64, &EXTRA_V2_PLAIN);
    let mut pkt = [0u8; 64];
    pkt[..8].copy_from_slice(&[0xd0, 0x00, 0x00, 0x3f, 0xbc, 0x01, 0xfa, 0x6b]);
    let res = dec.decode_superframe(&pkt);
    assert!(matches!(res, Err(YunError::InvalidData(_))));
}
