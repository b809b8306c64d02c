//! 定点逆 MDCT: 预旋转 + n/4 点复 FFT + 后旋转展开.
//!
//! 与浮点参考相比本路径整体多一个 1/2 因子, 由 PCM 输出端的左移补回.

use yun_core::fixed::{sincos_cordic, to_fixed32};

use super::fft::{Complex, FftContext, cmul};

/// 单一尺寸的 IMDCT 上下文, n = 1 << nbits 为时域点数
pub(super) struct MdctContext {
    nbits: u32,
    fft: FftContext,
    /// -cos(2π(k + 1/8)/n), s0.31
    tcos: Vec<i32>,
    /// -sin(2π(k + 1/8)/n), s0.31
    tsin: Vec<i32>,
}

impl MdctContext {
    pub(super) fn new(nbits: u32) -> Self {
        let n = 1usize << nbits;
        let n4 = n >> 2;
        let mut tcos = Vec::with_capacity(n4);
        let mut tsin = Vec::with_capacity(n4);
        for i in 0..n4 {
            // (i + 1/8) / n 圈
            let ip = (to_fixed32(i as i32) + 0x2000) >> nbits;
            let (s, c) = sincos_cordic((ip as u32) << 16);
            tsin.push(s.saturating_neg());
            tcos.push(c.saturating_neg());
        }
        Self {
            nbits,
            fft: FftContext::new(nbits - 2, true),
            tcos,
            tsin,
        }
    }

    /// 输入 n/2 个 Q16.16 频域系数, 输出 n 个 Q16.16 时域样本
    pub(super) fn imdct(&self, input: &[i32]) -> Vec<i32> {
        let n = 1usize << self.nbits;
        let n2 = n >> 1;
        let n4 = n >> 2;
        let n8 = n >> 3;
        debug_assert!(input.len() >= n2);

        let revtab = self.fft.revtab();
        let mut z = vec![Complex::default(); n4];

        // 预旋转: 偶数谱线从头数, 奇数谱线从尾数, 写入位反转位置
        for k in 0..n4 {
            let tw = Complex {
                re: self.tcos[k],
                im: self.tsin[k],
            };
            let v = Complex {
                re: input[n2 - 1 - 2 * k],
                im: input[2 * k],
            };
            z[revtab[k] as usize] = cmul(tw, v);
        }
        for v in &mut z {
            v.re >>= 1;
            v.im >>= 1;
        }

        self.fft.calc(&mut z);

        // 后旋转
        for k in 0..n4 {
            let tw = Complex {
                re: self.tcos[k],
                im: self.tsin[k],
            };
            z[k] = cmul(tw, z[k]);
        }

        // 奇偶展开: 前半反对称, 后半对称
        let mut output = vec![0i32; n];
        for k in 0..n8 {
            let r1 = z[n8 + k].im;
            let r2 = z[n8 - 1 - k].re;
            let r3 = z[n8 + k].re;
            let r4 = z[n8 - 1 - k].im;

            output[2 * k] = r1.saturating_neg();
            output[n2 - 1 - 2 * k] = r1;
            output[2 * k + 1] = r2;
            output[n2 - 2 - 2 * k] = r2.saturating_neg();
            output[n2 + 2 * k] = r3.saturating_neg();
            output[n - 1 - 2 * k] = r3.saturating_neg();
            output[n2 + 2 * k + 1] = r4;
            output[n - 2 - 2 * k] = r4;
        }
        output
    }
}
