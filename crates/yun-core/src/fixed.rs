//! Q16.16 / Q16.48 定点运算核心.
//!
//! 音频变换路径完全不使用浮点: 乘除以 i64/i128 做中间精度,
//! 三角函数由折叠多项式和 CORDIC 旋转提供.
//! 溢出一律饱和 (或按约定显式截断), 不依赖回绕行为;
//! 除零与负数开方返回文档化的哨兵值而不是 panic.

/// Q16.16 定点数 (高 16 位整数部分, 低 16 位小数部分)
pub type Fixed32 = i32;

/// Q16.48 定点数, 用于增益链等需要更宽动态范围的中间量
pub type Fixed64 = i64;

/// Q16.16 的 1.0
pub const FIXED_ONE: Fixed32 = 1 << 16;

/// Q16.16 表示的圆周率
pub const PI_F: Fixed32 = 0x3243f;

/// sin32 的折叠阈值, 略高于 π/2 (0x1921f)
const FOLD_LIMIT: Fixed32 = 0x19220;

/// CORDIC 起始模长, s0.31 编码的 -0.607252935.
/// 注意该常量按位是负数, 象限修正时通过取反得到正向量.
const CORDIC_GAIN: i32 = 0xb245_8939u32 as i32;

/// atan(2^-i) / (2π) × 2^32, CORDIC 每步的相位增量
const ATAN_TAB: [u32; 32] = [
    0x20000000, 0x12e4051e, 0x09fb385b, 0x051111d4, 0x028b0d43, 0x0145d7e1,
    0x00a2f61e, 0x00517c55, 0x0028be53, 0x00145f2f, 0x000a2f98, 0x000517cc,
    0x00028be6, 0x000145f3, 0x0000a2fa, 0x0000517d, 0x000028be, 0x0000145f,
    0x00000a30, 0x00000518, 0x0000028c, 0x00000146, 0x000000a3, 0x00000051,
    0x00000029, 0x00000014, 0x0000000a, 0x00000005, 0x00000003, 0x00000001,
    0x00000001, 0x00000000,
];

/// log2(1 + i/256) × 2^16, 带一个越界表项以便线性插值
const LOG2_TAB: [u32; 257] = [
    0x00000, 0x00171, 0x002e0, 0x0044e, 0x005ba, 0x00725, 0x0088e, 0x009f7,
    0x00b5d, 0x00cc3, 0x00e27, 0x00f8a, 0x010eb, 0x0124b, 0x013aa, 0x01508,
    0x01664, 0x017bf, 0x01919, 0x01a71, 0x01bc8, 0x01d1e, 0x01e73, 0x01fc6,
    0x02119, 0x0226a, 0x023ba, 0x02508, 0x02656, 0x027a2, 0x028ed, 0x02a37,
    0x02b80, 0x02cc8, 0x02e0f, 0x02f54, 0x03098, 0x031dc, 0x0331e, 0x0345f,
    0x0359f, 0x036de, 0x0381b, 0x03958, 0x03a94, 0x03bce, 0x03d08, 0x03e41,
    0x03f78, 0x040af, 0x041e4, 0x04319, 0x0444c, 0x0457f, 0x046b0, 0x047e1,
    0x04910, 0x04a3f, 0x04b6c, 0x04c99, 0x04dc5, 0x04eef, 0x05019, 0x05142,
    0x0526a, 0x05391, 0x054b7, 0x055dc, 0x05700, 0x05824, 0x05946, 0x05a68,
    0x05b89, 0x05ca8, 0x05dc7, 0x05ee5, 0x06003, 0x0611f, 0x0623a, 0x06355,
    0x0646f, 0x06588, 0x066a0, 0x067b7, 0x068ce, 0x069e4, 0x06af8, 0x06c0c,
    0x06d20, 0x06e32, 0x06f44, 0x07055, 0x07165, 0x07274, 0x07383, 0x07490,
    0x0759d, 0x076aa, 0x077b5, 0x078c0, 0x079ca, 0x07ad3, 0x07bdb, 0x07ce3,
    0x07dea, 0x07ef0, 0x07ff6, 0x080fb, 0x081ff, 0x08302, 0x08405, 0x08507,
    0x08608, 0x08709, 0x08809, 0x08908, 0x08a06, 0x08b04, 0x08c01, 0x08cfe,
    0x08dfa, 0x08ef5, 0x08fef, 0x090e9, 0x091e2, 0x092db, 0x093d2, 0x094ca,
    0x095c0, 0x096b6, 0x097ab, 0x098a0, 0x09994, 0x09a87, 0x09b7a, 0x09c6c,
    0x09d5e, 0x09e4f, 0x09f3f, 0x0a02e, 0x0a11e, 0x0a20c, 0x0a2fa, 0x0a3e7,
    0x0a4d4, 0x0a5c0, 0x0a6ab, 0x0a796, 0x0a881, 0x0a96a, 0x0aa53, 0x0ab3c,
    0x0ac24, 0x0ad0c, 0x0adf2, 0x0aed9, 0x0afbe, 0x0b0a4, 0x0b188, 0x0b26c,
    0x0b350, 0x0b433, 0x0b515, 0x0b5f7, 0x0b6d9, 0x0b7ba, 0x0b89a, 0x0b97a,
    0x0ba59, 0x0bb38, 0x0bc16, 0x0bcf4, 0x0bdd1, 0x0bead, 0x0bf8a, 0x0c065,
    0x0c140, 0x0c21b, 0x0c2f5, 0x0c3cf, 0x0c4a8, 0x0c580, 0x0c658, 0x0c730,
    0x0c807, 0x0c8de, 0x0c9b4, 0x0ca8a, 0x0cb5f, 0x0cc34, 0x0cd08, 0x0cddc,
    0x0ceaf, 0x0cf82, 0x0d054, 0x0d126, 0x0d1f7, 0x0d2c8, 0x0d399, 0x0d469,
    0x0d538, 0x0d607, 0x0d6d6, 0x0d7a4, 0x0d872, 0x0d93f, 0x0da0c, 0x0dad9,
    0x0dba5, 0x0dc70, 0x0dd3b, 0x0de06, 0x0ded0, 0x0df9a, 0x0e063, 0x0e12c,
    0x0e1f5, 0x0e2bd, 0x0e385, 0x0e44c, 0x0e513, 0x0e5d9, 0x0e69f, 0x0e765,
    0x0e82a, 0x0e8ef, 0x0e9b3, 0x0ea77, 0x0eb3b, 0x0ebfe, 0x0ecc1, 0x0ed83,
    0x0ee45, 0x0ef06, 0x0efc8, 0x0f088, 0x0f149, 0x0f209, 0x0f2c8, 0x0f387,
    0x0f446, 0x0f505, 0x0f5c3, 0x0f680, 0x0f73e, 0x0f7fb, 0x0f8b7, 0x0f973,
    0x0fa2f, 0x0faea, 0x0fba5, 0x0fc60, 0x0fd1a, 0x0fdd4, 0x0fe8e, 0x0ff47,
    0x10000,
];

/// (2^(i/256) - 1) × 2^16, 同样带插值用的末表项
const EXP2_TAB: [u32; 257] = [
    0x00000, 0x000b2, 0x00164, 0x00217, 0x002ca, 0x0037d, 0x00431, 0x004e6,
    0x0059b, 0x00651, 0x00707, 0x007bd, 0x00874, 0x0092c, 0x009e4, 0x00a9c,
    0x00b56, 0x00c0f, 0x00cc9, 0x00d84, 0x00e3f, 0x00efa, 0x00fb6, 0x01073,
    0x01130, 0x011ee, 0x012ac, 0x0136b, 0x0142a, 0x014e9, 0x015aa, 0x0166a,
    0x0172c, 0x017ed, 0x018b0, 0x01972, 0x01a36, 0x01afa, 0x01bbe, 0x01c83,
    0x01d48, 0x01e0e, 0x01ed5, 0x01f9c, 0x02064, 0x0212c, 0x021f5, 0x022be,
    0x02388, 0x02452, 0x0251d, 0x025e8, 0x026b4, 0x02781, 0x0284e, 0x0291c,
    0x029ea, 0x02ab9, 0x02b88, 0x02c58, 0x02d28, 0x02df9, 0x02ecb, 0x02f9d,
    0x03070, 0x03143, 0x03217, 0x032ec, 0x033c1, 0x03496, 0x0356c, 0x03643,
    0x0371a, 0x037f2, 0x038cb, 0x039a4, 0x03a7e, 0x03b58, 0x03c33, 0x03d0e,
    0x03dea, 0x03ec7, 0x03fa4, 0x04082, 0x04161, 0x04240, 0x0431f, 0x04400,
    0x044e1, 0x045c2, 0x046a4, 0x04787, 0x0486a, 0x0494e, 0x04a33, 0x04b18,
    0x04bfe, 0x04ce4, 0x04dcb, 0x04eb3, 0x04f9b, 0x05084, 0x0516e, 0x05258,
    0x05343, 0x0542e, 0x0551a, 0x05607, 0x056f4, 0x057e2, 0x058d1, 0x059c1,
    0x05ab0, 0x05ba1, 0x05c92, 0x05d84, 0x05e77, 0x05f6a, 0x0605e, 0x06153,
    0x06248, 0x0633e, 0x06434, 0x0652c, 0x06624, 0x0671c, 0x06815, 0x0690f,
    0x06a0a, 0x06b05, 0x06c01, 0x06cfe, 0x06dfb, 0x06ef9, 0x06ff8, 0x070f7,
    0x071f7, 0x072f8, 0x073fa, 0x074fc, 0x075ff, 0x07702, 0x07807, 0x0790c,
    0x07a11, 0x07b18, 0x07c1f, 0x07d27, 0x07e2f, 0x07f38, 0x08042, 0x0814d,
    0x08259, 0x08365, 0x08472, 0x0857f, 0x0868e, 0x0879d, 0x088ac, 0x089bd,
    0x08ace, 0x08be0, 0x08cf3, 0x08e07, 0x08f1b, 0x09030, 0x09146, 0x0925c,
    0x09373, 0x0948c, 0x095a4, 0x096be, 0x097d8, 0x098f3, 0x09a0f, 0x09b2c,
    0x09c49, 0x09d67, 0x09e86, 0x09fa6, 0x0a0c6, 0x0a1e8, 0x0a30a, 0x0a42d,
    0x0a550, 0x0a675, 0x0a79a, 0x0a8c0, 0x0a9e7, 0x0ab0e, 0x0ac37, 0x0ad60,
    0x0ae8a, 0x0afb5, 0x0b0e0, 0x0b20d, 0x0b33a, 0x0b468, 0x0b597, 0x0b6c7,
    0x0b7f7, 0x0b929, 0x0ba5b, 0x0bb8e, 0x0bcc2, 0x0bdf7, 0x0bf2c, 0x0c063,
    0x0c19a, 0x0c2d2, 0x0c40b, 0x0c544, 0x0c67f, 0x0c7bb, 0x0c8f7, 0x0ca34,
    0x0cb72, 0x0ccb1, 0x0cdf1, 0x0cf31, 0x0d073, 0x0d1b5, 0x0d2f8, 0x0d43d,
    0x0d582, 0x0d6c7, 0x0d80e, 0x0d956, 0x0da9e, 0x0dbe8, 0x0dd32, 0x0de7d,
    0x0dfc9, 0x0e116, 0x0e264, 0x0e3b3, 0x0e503, 0x0e654, 0x0e7a5, 0x0e8f8,
    0x0ea4b, 0x0eb9f, 0x0ecf5, 0x0ee4b, 0x0efa2, 0x0f0fa, 0x0f253, 0x0f3ad,
    0x0f507, 0x0f663, 0x0f7c0, 0x0f91e, 0x0fa7c, 0x0fbdc, 0x0fd3c, 0x0fe9e,
    0x10000,
];

/// 饱和收窄到 i32
#[inline]
pub fn sat32(v: i64) -> Fixed32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// 饱和收窄到 i64
#[inline]
pub fn sat64(v: i128) -> Fixed64 {
    v.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// 整数转 Q16.16
#[inline]
pub fn to_fixed32(v: i32) -> Fixed32 {
    sat32((v as i64) << 16)
}

/// Q16.16 转 Q16.48
#[inline]
pub fn widen32(v: Fixed32) -> Fixed64 {
    (v as i64) << 32
}

/// Q16.48 转 Q16.16, 四舍五入后饱和
#[inline]
pub fn narrow64(v: Fixed64) -> Fixed32 {
    sat32((v.saturating_add(1 << 31)) >> 32)
}

/// Q16.16 乘法: (a × b) >> 16, 饱和
#[inline]
pub fn mul32(a: Fixed32, b: Fixed32) -> Fixed32 {
    sat32((a as i64 * b as i64) >> 16)
}

/// Q16.16 乘法, 移位前四舍五入
#[inline]
pub fn mul32_round(a: Fixed32, b: Fixed32) -> Fixed32 {
    sat32((a as i64 * b as i64 + (1 << 15)) >> 16)
}

/// Q16.16 × s0.31 乘法: (a × b) >> 31, 结果仍为输入 a 的标度.
/// FFT/MDCT 的旋转因子都归一化在 ±1 以内, 需要这条 31 位移出路径.
#[inline]
pub fn mul32b(a: Fixed32, b: Fixed32) -> Fixed32 {
    sat32((a as i64 * b as i64) >> 31)
}

/// Q16.48 乘法, i128 中间量
#[inline]
pub fn mul64(a: Fixed64, b: Fixed64) -> Fixed64 {
    sat64((a as i128 * b as i128) >> 48)
}

/// Q16.16 除法.
///
/// 被除数为 0 直接得 0; 除数为 0 返回 0x7fff_ffff 哨兵 (沿用解码器
/// 的历史约定, 不是 IEEE 语义).
pub fn div32(x: Fixed32, y: Fixed32) -> Fixed32 {
    if x == 0 {
        return 0;
    }
    if y == 0 {
        return 0x7fff_ffff;
    }
    sat32(((x as i64) << 16) / y as i64)
}

/// Q16.48 除法, 除数为 0 返回 i64::MAX 哨兵
pub fn div64(x: Fixed64, y: Fixed64) -> Fixed64 {
    if x == 0 {
        return 0;
    }
    if y == 0 {
        return i64::MAX;
    }
    sat64(((x as i128) << 48) / y as i128)
}

/// 逐位非恢复式开方, 输入输出均为 Q16.16.
///
/// 对 32 位操作数做 16 步数字提取, 结果左移 8 位落回 Q16.16.
/// 负输入返回 0 哨兵.
pub fn sqrt32(x: Fixed32) -> Fixed32 {
    if x < 0 {
        return 0;
    }
    let mut rem = x as u32;
    let mut root: u32 = 0;
    for k in (0..16).rev() {
        let s = root + (1 << (k * 2));
        root >>= 1;
        if s <= rem {
            rem -= s;
            root |= 1 << (k * 2);
        }
    }
    (root << 8) as Fixed32
}

/// Q16.16 正弦, 输入为弧度.
///
/// 反复减 π 并翻转符号把参数折叠进 (-π/2, π/2], 再走奇次多项式.
pub fn sin32(x: Fixed32) -> Fixed32 {
    let mut sign = 1i32;
    let mut x = x;
    if x < 0 {
        sign = -1;
        x = x.saturating_neg();
    }
    while x > FOLD_LIMIT {
        x -= PI_F;
        sign = -sign;
    }
    let x2 = (x as i64 * x as i64) >> 16;
    if sign != 1 {
        x = -x;
    }
    let mut t: i64 = 0;
    t = ((t - 0xd) * x2) >> 16;
    t = ((t + 0x222) * x2) >> 16;
    t = ((t - 0x2aab) * x2) >> 16;
    t += 0x10000;
    t = (t * x as i64) >> 16;
    sat32(t)
}

/// Q16.16 余弦: cos(x) = -sin(x - π/2)
pub fn cos32(x: Fixed32) -> Fixed32 {
    -sin32(x.saturating_sub(PI_F >> 1))
}

/// CORDIC 同时求 sin/cos.
///
/// 相位以 u32 表示一整圈: 0 对应 0, 2^32 对应 2π.
/// 返回 (sin, cos), s0.31 编码 (±2^31 对应 ±1).
/// 先按象限把相位搬进 CORDIC 可收敛的范围, 再做 31 步旋转;
/// 内部加减按回绕语义进行, 这是旋转递推本身的定义.
pub fn sincos_cordic(phase: u32) -> (Fixed32, Fixed32) {
    const QUARTER: u32 = 0xffff_ffff / 4;

    let mut x: i32 = CORDIC_GAIN;
    let mut y: i32 = 0;
    let mut z: u32 = phase;

    if z < QUARTER {
        x = x.wrapping_neg();
        z = z.wrapping_add(QUARTER);
    } else if z < 3 * QUARTER {
        z -= QUARTER;
    } else {
        x = x.wrapping_neg();
        z = z.wrapping_sub(3 * QUARTER);
    }

    for i in 0..31 {
        let x1 = x >> i;
        let y1 = y >> i;
        if z >= QUARTER {
            x = x.wrapping_sub(y1);
            y = y.wrapping_add(x1);
            z = z.wrapping_sub(ATAN_TAB[i]);
        } else {
            x = x.wrapping_add(y1);
            y = y.wrapping_sub(x1);
            z = z.wrapping_add(ATAN_TAB[i]);
        }
    }

    (y, x)
}

/// Q16.16 定点 log2, 8 位尾数表 + 线性插值.
///
/// 非正输入返回 i32::MIN 哨兵.
pub fn log2_fixed(x: Fixed32) -> Fixed32 {
    if x <= 0 {
        return i32::MIN;
    }
    let n = 31 - (x as u32).leading_zeros() as i32;
    let m = (x as u32) << (31 - n);
    let i = ((m >> 23) & 0xff) as usize;
    let r = (m >> 15) & 0xff;
    let frac = LOG2_TAB[i] + (((LOG2_TAB[i + 1] - LOG2_TAB[i]) * r) >> 8);
    ((n - 16) << 16) + frac as i32
}

/// Q16.16 定点 exp2, 上溢饱和到 i32::MAX, 下溢为 0
pub fn exp2_fixed(x: Fixed32) -> Fixed32 {
    let k = x >> 16;
    let f = (x & 0xffff) as u32;
    let i = (f >> 8) as usize;
    let r = f & 0xff;
    let m = (0x10000 + EXP2_TAB[i] + (((EXP2_TAB[i + 1] - EXP2_TAB[i]) * r) >> 8)) as i64;
    if k >= 15 {
        i32::MAX
    } else if k >= 0 {
        (m << k) as Fixed32
    } else if k > -48 {
        (m >> -k) as Fixed32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_f(x: Fixed32) -> f64 {
        x as f64 / 65536.0
    }

    #[test]
    fn test_mul32_basic() {
        assert_eq!(mul32(FIXED_ONE, FIXED_ONE), FIXED_ONE);
        assert_eq!(mul32(0x8000, 0x30000), 0x18000);
        assert_eq!(mul32(-0x24000, 0x18000), -0x36000);
        // 溢出饱和
        assert_eq!(mul32(0x7fff0000, 0x20000), i32::MAX);
        assert_eq!(mul32(-0x7fff0000, 0x20000), i32::MIN);
    }

    #[test]
    fn test_mul32b_unit_twiddle() {
        // s0.31 的 1.0 ≈ 2^31 - 1
        assert_eq!(mul32b(0x10000, 0x7fffffff), 0xffff);
        assert_eq!(mul32b(0x10000, 1 << 30), 0x8000);
        assert_eq!(mul32b(-0x20000, 1 << 30), -0x10000);
    }

    #[test]
    fn test_div32_sentinels() {
        assert_eq!(div32(0, 0), 0);
        assert_eq!(div32(5, 0), 0x7fff_ffff);
        assert_eq!(div32(0x10000, 0x30000), 0x5555);
        assert_eq!(div32(-0x20000, 0x30000), -43690);
    }

    #[test]
    fn test_div64_sentinels() {
        assert_eq!(div64(0, 0), 0);
        assert_eq!(div64(123, 0), i64::MAX);
        let one = 1i64 << 48;
        assert_eq!(div64(one, one), one);
        assert_eq!(div64(one, 2 * one), one / 2);
    }

    #[test]
    fn test_mul_div_roundtrip_within_1ulp() {
        // 采样覆盖正负与不同数量级, b 不为 0 且乘积不溢出
        let avals = [3, 0x1234, 0x10000, -0x8000, 0x7fff, -0x123456, 0x200000];
        let bvals = [0x10000, 0x8000, 0x30000, -0x10000, 0x5555, 0x100000];
        for &a in &avals {
            for &b in &bvals {
                let r = mul32(a, b);
                if r.unsigned_abs() >= 1 << 30 {
                    continue;
                }
                let back = div32(r, b);
                // 每一步各丢一次精度, 误差以 1/|b| 的 Q16.16 粒度为界
                let tol = (1i64 << 16) / (b as i64).abs() + 1;
                assert!(
                    (back as i64 - a as i64).abs() <= tol,
                    "a={a:#x} b={b:#x} back={back:#x}"
                );
            }
        }
    }

    #[test]
    fn test_mul64_q48() {
        let one = 1i64 << 48;
        assert_eq!(mul64(one, one), one);
        assert_eq!(mul64(one / 2, one / 2), one / 4);
        assert_eq!(mul64(-one, one * 3), -3 * one);
    }

    #[test]
    fn test_widen_narrow() {
        assert_eq!(widen32(0x10000), 1i64 << 48);
        assert_eq!(narrow64(1i64 << 48), 0x10000);
        assert_eq!(narrow64((1i64 << 48) + (1 << 31)), 0x10001);
        assert_eq!(narrow64(i64::MAX), i32::MAX);
    }

    #[test]
    fn test_sqrt32_exact_squares() {
        assert_eq!(sqrt32(0), 0);
        assert_eq!(sqrt32(0x10000), 0x10000);
        assert_eq!(sqrt32(0x40000), 0x20000);
        assert_eq!(sqrt32(0x90000), 0x30000);
        assert_eq!(sqrt32(-0x10000), 0);
    }

    #[test]
    fn test_sqrt32_against_f64() {
        for raw in [2, 0x100, 0x8000, 0x20000, 0x123456, 0x7fffffff] {
            let got = to_f(sqrt32(raw));
            let want = (raw as f64 / 65536.0).sqrt();
            // 低位截断造成的误差不超过一个 2^-8 台阶
            assert!((got - want).abs() < 1.0 / 128.0, "raw={raw:#x}");
        }
        assert_eq!(sqrt32(0x7fffffff), 0xb50400);
    }

    #[test]
    fn test_sin32_golden() {
        assert_eq!(sin32(0), 0);
        assert_eq!(sin32(0x8000), 31419);
        assert_eq!(sin32(-0x8000), -31420);
        assert_eq!(sin32(0x19220), 65510);
        assert_eq!(sin32(PI_F), 0);
        assert_eq!(cos32(0), 65512);
        assert_eq!(cos32(PI_F), -65510);
    }

    #[test]
    fn test_sin32_cos32_follow_f64() {
        // 多项式本身的最大偏差约 3.6e-4 (出现在 ±π/2 附近)
        let mut max_err: f64 = 0.0;
        let mut x = -PI_F;
        while x <= PI_F {
            max_err = max_err.max((to_f(sin32(x)) - to_f(x).sin()).abs());
            max_err = max_err.max((to_f(cos32(x)) - to_f(x).cos()).abs());
            x += 997;
        }
        assert!(max_err < 4.5e-4, "max_err={max_err}");
    }

    #[test]
    fn test_sin32_folding_far_from_origin() {
        // 远离原点的输入折叠后仍应与 f64 一致
        for &x in &[0x64887, -0x64887, 0x3243f * 3, 0x3243f * 7 + 0x8000] {
            let want = to_f(x).sin();
            assert!((to_f(sin32(x)) - want).abs() < 4.5e-4, "x={x:#x}");
        }
    }

    #[test]
    fn test_cordic_cardinal_points() {
        let (s, c) = sincos_cordic(0);
        assert_eq!((s, c), (13, 2147483631));
        let (s, c) = sincos_cordic(0x4000_0000);
        assert_eq!((s, c), (2147483634, -20));
        let (s, c) = sincos_cordic(0x8000_0000);
        assert_eq!((s, c), (-15, -2147483633));
        let (s, c) = sincos_cordic(0xc000_0000);
        assert_eq!((s, c), (-2147483630, 19));
    }

    #[test]
    fn test_cordic_against_f64() {
        // 2^-20 的精度要求, 实测好于 2e-8
        let scale = (1u64 << 31) as f64;
        let tol = 1.0 / (1 << 20) as f64;
        for k in 0..=256u64 {
            let phase = (k << 24) as u32;
            let ang = phase as f64 / (1u64 << 32) as f64 * std::f64::consts::TAU;
            let (s, c) = sincos_cordic(phase);
            assert!((s as f64 / scale - ang.sin()).abs() < tol, "phase={phase:#x}");
            assert!((c as f64 / scale - ang.cos()).abs() < tol, "phase={phase:#x}");
        }
    }

    #[test]
    fn test_log2_exp2_roundtrip() {
        for &x in &[1, 0x100, 0x8000, 0x10000, 0x18000, 0x123456, 0x7fff0000] {
            let back = exp2_fixed(log2_fixed(x));
            let rel = (back as f64 - x as f64).abs() / x as f64;
            assert!(rel < 3e-4, "x={x:#x} back={back:#x}");
        }
        assert_eq!(log2_fixed(0x10000), 0);
        assert_eq!(log2_fixed(0x40000), 2 << 16);
        assert_eq!(exp2_fixed(0), 0x10000);
        assert_eq!(exp2_fixed(3 << 16), 8 << 16);
        assert_eq!(exp2_fixed(-(1 << 16)), 0x8000);
    }

    #[test]
    fn test_log2_exp2_sentinels() {
        assert_eq!(log2_fixed(0), i32::MIN);
        assert_eq!(log2_fixed(-5), i32::MIN);
        assert_eq!(exp2_fixed(i32::MAX), i32::MAX);
        assert_eq!(exp2_fixed(i32::MIN), 0);
    }
}
