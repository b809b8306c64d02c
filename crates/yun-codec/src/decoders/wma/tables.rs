//! WMA 解码静态数据表.
//!
//! 幂表与 LSP 码本为 Q16.16 / Q16.48 定点值, 全部预计算为字面量,
//! 运行时不做任何浮点求值. VLC 码本只存码长, 码字由
//! [`super::vlc::Vlc::build`] 按规范码递推得出.

/// Bark 临界频带上限 (Hz), 指数频带划分按块长折算到谱线
pub(super) const CRITICAL_FREQS: [u32; 25] = [
    100, 200, 300, 400, 510, 630, 770, 920, 1080, 1270, 1480, 1720, 2000, 2320, 2700, 3150, 3700,
    4400, 5300, 6400, 7700, 9500, 12000, 15500, 24500,
];

/// sqrt(3) 的 Q16.16 值, 噪声表的幅度归一
pub(super) const SQRT3_Q16: i32 = 0x1bb68;

/// 伪噪声表长度 (2 的幂, 下标按位与回绕)
pub(super) const NOISE_TAB_SIZE: usize = 8192;

/// 10^((i - 96) / 16) 的 Q16.16 值.
///
/// 指数 VLC 的 last_exp 经 +60 偏置后查此表, 合法域 last_exp ∈ [-60, 116];
/// 大端几项已饱和到 i32::MAX.
pub(super) const POW_TAB: [i32; 177] = [
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x00000000, 0x00000001, 0x00000001, 0x00000001,
    0x00000001, 0x00000001, 0x00000001, 0x00000001, 0x00000002, 0x00000002,
    0x00000002, 0x00000002, 0x00000003, 0x00000003, 0x00000004, 0x00000004,
    0x00000005, 0x00000006, 0x00000007, 0x00000008, 0x00000009, 0x0000000a,
    0x0000000c, 0x0000000d, 0x00000010, 0x00000012, 0x00000015, 0x00000018,
    0x0000001c, 0x00000020, 0x00000025, 0x0000002b, 0x00000031, 0x00000039,
    0x00000042, 0x0000004c, 0x00000057, 0x00000065, 0x00000075, 0x00000087,
    0x0000009b, 0x000000b3, 0x000000cf, 0x000000ef, 0x00000114, 0x0000013f,
    0x00000171, 0x000001aa, 0x000001eb, 0x00000238, 0x0000028f, 0x000002f5,
    0x0000036a, 0x000003f1, 0x0000048d, 0x00000542, 0x00000612, 0x00000703,
    0x00000818, 0x00000959, 0x00000acc, 0x00000c77, 0x00000e65, 0x000010a0,
    0x00001333, 0x0000162b, 0x0000199a, 0x00001d90, 0x00002223, 0x0000276c,
    0x00002d86, 0x00003492, 0x00003cb5, 0x0000461b, 0x000050f4, 0x00005d7c,
    0x00006bf4, 0x00007caa, 0x00008ff6, 0x0000a63e, 0x0000bff9, 0x0000ddb0,
    0x00010000, 0x000127a0, 0x00015562, 0x00018a39, 0x0001c73d, 0x00020db4,
    0x00025f12, 0x0002bd09, 0x0003298b, 0x0003a6d9, 0x0004378b, 0x0004dea3,
    0x00059f98, 0x00067e6b, 0x00077fbb, 0x0008a8de, 0x000a0000, 0x000b8c3e,
    0x000d55d1, 0x000f6636, 0x0011c865, 0x00148906, 0x0017b6b7, 0x001b625b,
    0x001f9f6e, 0x00248475, 0x002a2b6e, 0x0030b25e, 0x00383bf0, 0x0040f02b,
    0x004afd4b, 0x005698b0, 0x00640000, 0x00737a6b, 0x00855a26, 0x0099fe1e,
    0x00b1d3f4, 0x00cd5a3e, 0x00ed232b, 0x0111d78b, 0x013c3a4f, 0x016d2c94,
    0x01a5b24e, 0x01e6f7b0, 0x02325761, 0x028961b3, 0x02ede4eb, 0x0361f6de,
    0x03e80000, 0x0482c830, 0x0535857d, 0x0603ed31, 0x06f24787, 0x08058668,
    0x09435fab, 0x0ab26b6d, 0x0c5a4715, 0x0e43bdc4, 0x1078f70c, 0x1305acdd,
    0x15f769cb, 0x195dd0fa, 0x1d4af12d, 0x21d3a4ab, 0x27100000, 0x2d1bd1e1,
    0x341736de, 0x3c2743e8, 0x4576cb4a, 0x50374011, 0x5ca1bcb0, 0x6af83244,
    0x7b86c6cf, 0x7fffffff, 0x7fffffff, 0x7fffffff, 0x7fffffff, 0x7fffffff,
    0x7fffffff, 0x7fffffff, 0x7fffffff,
];

/// 10^((i - 20) / 20) 的 Q16.48 值.
///
/// 总增益与高频带增益经 clamp(-20, 127) + 20 偏置后查此表;
/// i ≥ 111 起饱和到 i64::MAX, 后续增益链全程饱和运算.
pub(super) const POW_GAIN: [i64; 148] = [
    0x000019999999999a, 0x00001cb94298ac6d, 0x0000203a7e5b2d0a, 0x0000242934bfda4a,
    0x00002892c18aed67, 0x00002d8621c6ed3e, 0x0000331426aef928, 0x0000394faecf8062,
    0x0000404de61f75c1, 0x000048268debbd11, 0x000050f44d892124, 0x00005ad50cdef0ee,
    0x000065ea59fdd493, 0x00007259db1bf2bd, 0x0000804dce799a13, 0x00008ff599e0e1c1,
    0x0000a1866ba7b6a4, 0x0000b53bef57455c, 0x0000cb59185e6e22, 0x0000e429057fd052,
    0x0001000000000000, 0x00011f3c99f6bc43, 0x00014248ef8fc260, 0x0001699c0f7e86e1,
    0x000195bb8f6d4605, 0x0001c73d51c54471, 0x0001fec982d5bb8b, 0x00023d1cd41b03d1,
    0x0002830afd3a998c, 0x0002d1818b3562ac, 0x0003298b075b4b6a, 0x00038c5280b56948,
    0x0003fb2783ea4dbc, 0x000477828f177b5d, 0x0005030a10c004ba, 0x00059f9802c8d18a,
    0x00064f40348d2266, 0x000714575968b59b, 0x0007f17af3b04d50, 0x0008e99a36fe2337,
    0x000a000000000000, 0x000b385e03a35aa2, 0x000c96d95b9d97c3, 0x000e20189af144c9,
    0x000fd9539a44bc33, 0x0011c86531b4ac69, 0x0013f3df1c59536e, 0x00166320490e2628,
    0x00191e6de449ff75, 0x001c2f0f7015dabc, 0x001f9f6e4990f227, 0x00237b3907161cce,
    0x0027cf8b2727095a, 0x002cab1996ead1a0, 0x00321e64a7802f40, 0x00383bf01bd82f5e,
    0x003f18820d8357f8, 0x0046cb697e171814, 0x004f6ecd84e30520, 0x0059200625ed6028,
    0x0064000000000000, 0x007033ac24618a48, 0x007de47d9427eda0, 0x008d40f60d6cafd8,
    0x009e7d4406af5a18, 0x00b1d3f3f10ebc18, 0x00c786b71b7d4230, 0x00dfdf42da8d7d90,
    0x00fb304aeae3fa98, 0x0119d69a60da8b80, 0x013c3a4edfa97590, 0x0162d03a46dd1fe0,
    0x018e1b6f87865d80, 0x01beaeffe52c3040, 0x01f52fee8b01d8c0, 0x023257611671d9a0,
    0x0276f51487216f60, 0x02c3f21eece6f0c0, 0x031a540730de3320, 0x037b403d7b45c200,
    0x03e8000000000000, 0x046204b96bcf66c0, 0x04eaece7c98f4840, 0x0584899c863ede80,
    0x0630e4a842d984c0, 0x06f247876a935900, 0x07cb432712e49600, 0x08beb89c8986e780,
    0x09cfe2ed2ce7ca00, 0x0b026207c8897300, 0x0c5a4714bc9e9780, 0x0ddc2246c4a33e80,
    0x0f8d125b4b3fa700, 0x1172d5fef3b9e300, 0x1393df516e127800, 0x15f769cae0728100,
    0x18a592cd474e5a00, 0x1ba7753541056800, 0x1f074847e8ae0000, 0x22d08266d0b99400,
    0x2710000000000000, 0x2bd42f3e361a0400, 0x312d410ddf98c400, 0x372d601d3e74c000,
    0x3de8ee929c7f3000, 0x4576cb4a29c17800, 0x4df09f86bceddc00, 0x5773361d5f44f400,
    0x621edd43c10e0000, 0x6e17d44dd55e8000, 0x7b86c6cf5e31e800, 0x7fffffffffffffff,
    0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff,
    0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff,
    0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff,
    0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff,
    0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff,
    0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff,
    0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff,
    0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff,
    0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff, 0x7fffffffffffffff,
];

/// LSP 量化码本, Q16.16 弧度.
///
/// 第 0 维与第 8/9 维为 3 位 (8 项), 其余为 4 位 (16 项);
/// 每行单调递增, 两端收到 [0.05, π - 0.05].
pub(super) const LSP_CODEBOOK: [&[i32]; 10] = [
    &[0x00ccd, 0x00cce, 0x00ccf, 0x01d3e, 0x0332f, 0x04920, 0x05f12, 0x07503],
    &[
        0x00d1e, 0x01b74, 0x029ca, 0x03820, 0x04676, 0x054cc, 0x06322, 0x07178, 0x07fce, 0x08e24,
        0x09c7a, 0x0aad0, 0x0b926, 0x0c77c, 0x0d5d2, 0x0e428,
    ],
    &[
        0x05d8b, 0x06be1, 0x07a37, 0x0888d, 0x096e3, 0x0a539, 0x0b38f, 0x0c1e5, 0x0d03b, 0x0de91,
        0x0ece7, 0x0fb3d, 0x10993, 0x117e9, 0x1263f, 0x13495,
    ],
    &[
        0x0adf7, 0x0bc4d, 0x0caa4, 0x0d8fa, 0x0e750, 0x0f5a6, 0x103fc, 0x11252, 0x120a8, 0x12efe,
        0x13d54, 0x14baa, 0x15a00, 0x16856, 0x176ac, 0x18502,
    ],
    &[
        0x0fe64, 0x10cba, 0x11b10, 0x12966, 0x137bc, 0x14612, 0x15468, 0x162be, 0x17114, 0x17f6a,
        0x18dc0, 0x19c16, 0x1aa6c, 0x1b8c2, 0x1c718, 0x1d56e,
    ],
    &[
        0x14ed1, 0x15d27, 0x16b7d, 0x179d3, 0x18829, 0x1967f, 0x1a4d5, 0x1b32b, 0x1c181, 0x1cfd7,
        0x1de2d, 0x1ec83, 0x1fad9, 0x2092f, 0x21785, 0x225db,
    ],
    &[
        0x19f3e, 0x1ad94, 0x1bbea, 0x1ca40, 0x1d896, 0x1e6ec, 0x1f542, 0x20398, 0x211ee, 0x22044,
        0x22e9a, 0x23cf0, 0x24b46, 0x2599c, 0x267f2, 0x27648,
    ],
    &[
        0x1efaa, 0x1fe00, 0x20c56, 0x21aac, 0x22903, 0x23759, 0x245af, 0x25405, 0x2625b, 0x270b1,
        0x27f07, 0x28d5d, 0x29bb3, 0x2aa09, 0x2b85f, 0x2c6b5,
    ],
    &[0x25ed0, 0x274c1, 0x28ab2, 0x2a0a4, 0x2b695, 0x2cc86, 0x2e278, 0x2f869],
    &[0x2af3c, 0x2c52e, 0x2db1f, 0x2f110, 0x30702, 0x31773, 0x31774, 0x31775],
];

/// 指数增量 VLC 码长表, 符号 - 60 为增量, 符号 60 (增量 0) 码长 1
pub(super) const EXP_VLC_LENGTHS: [u8; 121] = [
    18, 18, 18, 18, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 18,
    19, 18, 17, 17, 16, 17, 16, 16, 16, 16, 15, 15, 14, 14, 14, 14, 14, 14, 13, 13,
    12, 12, 12, 11, 12, 11, 10, 10, 10, 9, 9, 8, 8, 8, 7, 6, 6, 5, 4, 3,
    1, 4, 4, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 10, 11, 11, 11, 11, 12,
    12, 13, 13, 13, 14, 14, 16, 15, 16, 15, 18, 19, 19, 19, 19, 19, 19, 19, 19, 19,
    19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19,
    19,
];

/// 高频带增益 VLC 码长表, 符号 - 18 为增量
pub(super) const HGAIN_VLC_LENGTHS: [u8; 37] = [
    18, 18, 17, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4,
    3, 3, 2, 3, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14,
    15, 16, 17, 18, 18,
];

/// 系数 run/level 码本 A (低码率档): 符号 0 = 逃逸, 1 = EOB, 其余按
/// [`LEVEL_RUNS_A`] 展开为 (run, level) 对
pub(super) const COEF_VLC_LENGTHS_A: [u8; 262] = [
    13, 7, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5, 5, 6, 6, 6,
    6, 6, 6, 7, 7, 7, 7, 7, 7, 7, 8, 8, 8, 8, 8, 8,
    8, 9, 9, 9, 9, 9, 9, 9, 10, 10, 10, 10, 10, 10, 10, 11,
    11, 11, 11, 11, 11, 11, 12, 12, 12, 12, 12, 12, 12, 13, 13, 13,
    13, 13, 13, 13, 14, 14, 14, 14, 14, 14, 14, 15, 15, 15, 15, 15,
    15, 15, 16, 16, 16, 16, 16, 16, 16, 17, 17, 17, 17, 17, 17, 18,
    18, 18, 18, 18, 18, 18, 6, 6, 6, 6, 6, 6, 6, 7, 7, 7,
    7, 7, 7, 7, 8, 8, 8, 8, 8, 8, 9, 9, 9, 9, 9, 9,
    9, 10, 10, 10, 10, 10, 10, 10, 11, 11, 11, 11, 11, 11, 11, 12,
    12, 12, 12, 12, 12, 12, 13, 13, 13, 13, 13, 13, 13, 14, 14, 14,
    14, 14, 7, 7, 7, 8, 8, 8, 8, 8, 8, 8, 9, 9, 9, 9,
    9, 9, 9, 10, 10, 10, 10, 10, 10, 11, 11, 11, 11, 11, 11, 11,
    12, 12, 12, 12, 12, 12, 12, 12, 13, 13, 9, 9, 9, 9, 9, 9,
    10, 10, 10, 10, 10, 10, 10, 11, 11, 11, 11, 11, 11, 12, 10, 10,
    11, 11, 11, 11, 11, 11, 11, 12, 12, 12, 12, 12, 12, 12, 12, 13,
    13, 13, 13, 14, 14, 14, 14, 14, 15, 15, 15, 15, 17, 17, 17, 18,
    18, 20, 20, 21, 21, 20,
];

/// 码本 A 每个 level 值的 run 数 (level 从 1 开始)
pub(super) const LEVEL_RUNS_A: [u8; 14] = [100, 60, 40, 20, 12, 8, 6, 4, 3, 2, 2, 1, 1, 1];

/// 系数 run/level 码本 B (高码率档)
pub(super) const COEF_VLC_LENGTHS_B: [u8; 150] = [
    12, 6, 4, 4, 4, 4, 4, 4, 5, 5, 5, 5, 5, 6, 6, 6,
    6, 6, 7, 7, 7, 7, 7, 7, 8, 8, 8, 8, 8, 9, 9, 9,
    9, 9, 9, 10, 10, 10, 10, 10, 11, 11, 11, 11, 11, 11, 12, 12,
    12, 12, 12, 13, 13, 13, 13, 13, 14, 14, 14, 14, 14, 14, 5, 6,
    6, 6, 6, 6, 6, 7, 7, 7, 7, 7, 8, 8, 8, 8, 8, 8,
    9, 9, 9, 9, 9, 10, 10, 10, 10, 10, 10, 11, 11, 11, 11, 11,
    12, 12, 7, 7, 7, 8, 8, 8, 8, 8, 9, 9, 9, 9, 9, 9,
    10, 10, 10, 10, 10, 11, 9, 9, 9, 9, 9, 10, 10, 10, 10, 10,
    11, 11, 10, 11, 11, 11, 11, 11, 12, 12, 12, 13, 13, 13, 13, 14,
    14, 14, 15, 16, 17, 17,
];

/// 码本 B 每个 level 值的 run 数
pub(super) const LEVEL_RUNS_B: [u8; 10] = [60, 36, 20, 12, 8, 5, 3, 2, 1, 1];
