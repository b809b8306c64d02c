//! 定点基 2 复数 FFT, 为 IMDCT 的核心级联服务.
//!
//! 数据为 Q16.16 复数, 旋转因子为 CORDIC 生成的 s0.31 值, 复乘经
//! [`mul32b`] 右移 31 位落回数据标度. 蝶形不缩放, 加减一律饱和.

use yun_core::fixed::{div32, mul32b, sincos_cordic, to_fixed32};

/// Q16.16 复数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Complex {
    pub re: i32,
    pub im: i32,
}

/// 复乘, 一侧为 s0.31 旋转因子: (a × b) 每个分量右移 31 位
#[inline]
pub(super) fn cmul(a: Complex, b: Complex) -> Complex {
    Complex {
        re: mul32b(b.re, a.re).saturating_sub(mul32b(b.im, a.im)),
        im: mul32b(b.re, a.im).saturating_add(mul32b(b.im, a.re)),
    }
}

#[inline]
fn bf(p: Complex, q: Complex) -> (Complex, Complex) {
    (
        Complex {
            re: p.re.saturating_add(q.re),
            im: p.im.saturating_add(q.im),
        },
        Complex {
            re: p.re.saturating_sub(q.re),
            im: p.im.saturating_sub(q.im),
        },
    )
}

/// 预计算的 FFT 上下文 (每个变换尺寸一份, 随拥有它的解码器走)
pub(super) struct FftContext {
    nbits: u32,
    inverse: bool,
    /// e^(±2πj·i/n) 的 s0.31 值, n/2 项
    exptab: Vec<Complex>,
    /// 完整位反转置换表
    revtab: Vec<u16>,
}

impl FftContext {
    pub(super) fn new(nbits: u32, inverse: bool) -> Self {
        let n = 1usize << nbits;
        let mut exptab = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            // i/n 圈的相位, Q16 分数左移 16 位铺满 u32 全圈
            let frac = div32(to_fixed32(i as i32), to_fixed32(n as i32));
            let (s, c) = sincos_cordic((frac as u32) << 16);
            let im = if inverse { s } else { s.saturating_neg() };
            exptab.push(Complex { re: c, im });
        }

        let mut revtab = vec![0u16; n];
        for (i, slot) in revtab.iter_mut().enumerate() {
            let mut m = 0usize;
            for j in 0..nbits {
                m |= ((i >> j) & 1) << (nbits - j - 1);
            }
            *slot = m as u16;
        }

        Self {
            nbits,
            inverse,
            exptab,
            revtab,
        }
    }

    pub(super) fn revtab(&self) -> &[u16] {
        &self.revtab
    }

    /// 原地变换前 `1 << nbits` 个点, 输入须已按位反转序排好
    pub(super) fn calc(&self, z: &mut [Complex]) {
        let np = 1usize << self.nbits;
        debug_assert!(z.len() >= np && np >= 4);

        // 第 0 级: 相邻两点
        for k in (0..np).step_by(2) {
            let (a, b) = bf(z[k], z[k + 1]);
            z[k] = a;
            z[k + 1] = b;
        }

        // 第 1 级: 4 点组, 奇数支路的旋转因子为 ±j
        for k in (0..np).step_by(4) {
            let (a, b) = bf(z[k], z[k + 2]);
            z[k] = a;
            z[k + 2] = b;
            let q = z[k + 3];
            let rotated = if self.inverse {
                Complex {
                    re: q.im.saturating_neg(),
                    im: q.re,
                }
            } else {
                Complex {
                    re: q.im,
                    im: q.re.saturating_neg(),
                }
            };
            let (a, b) = bf(z[k + 1], rotated);
            z[k + 1] = a;
            z[k + 3] = b;
        }

        // 其余各级: 同级内旋转因子下标按 nblocks 步进
        let mut nblocks = np >> 3;
        let mut nloops = 4usize;
        let np2 = np >> 1;
        while nblocks != 0 {
            let mut base = 0usize;
            for _ in 0..nblocks {
                let mut p = base;
                let mut q = base + nloops;
                let (a, b) = bf(z[p], z[q]);
                z[p] = a;
                z[q] = b;
                p += 1;
                q += 1;
                let mut l = nblocks;
                while l < np2 {
                    let t = cmul(self.exptab[l], z[q]);
                    let (a, b) = bf(z[p], t);
                    z[p] = a;
                    z[q] = b;
                    p += 1;
                    q += 1;
                    l += nblocks;
                }
                base += 2 * nloops;
            }
            nblocks >>= 1;
            nloops <<= 1;
        }
    }
}
