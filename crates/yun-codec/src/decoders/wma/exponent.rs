//! 频谱包络 (指数) 解码.
//!
//! 两套编码方式: VLC 增量码 (逐频带给出 10^(x/16) 档位) 和
//! LSP 谱线对 (10 个系数重建整条包络曲线, 思路同 Vorbis 的 floor0).
//! 块长变化且本块未携带包络时, 用 [`interpolate_array`] 把上一块的
//! 包络重采样到新块长.

use yun_core::bitcache::BitCache;
use yun_core::fixed::{
    FIXED_ONE, Fixed32, PI_F, cos32, div32, exp2_fixed, log2_fixed, mul64, sat32, to_fixed32,
    widen32,
};
use yun_core::{YunError, YunResult};

use super::tables::{LSP_CODEBOOK, POW_TAB};
use super::vlc::Vlc;

/// LSP 包络的系数个数
pub(super) const NB_LSP_COEFS: usize = 10;

fn band_mismatch() -> YunError {
    YunError::InvalidData("频带划分与块长不符".into())
}

/// 按 VLC 增量码解出一个声道的指数, 返回本块最大指数.
///
/// v1 首带单独给 5 bit 绝对档位; 之后的增量链基准固定为 36,
/// 与首带的绝对档位无关.
pub(super) fn decode_exp_vlc(
    gb: &mut BitCache<'_>,
    exp_vlc: &Vlc,
    bands: &[u16],
    version: u32,
    exponents: &mut [i32],
) -> YunResult<Fixed32> {
    let mut bands_iter = bands.iter();
    let mut pos = 0usize;
    let mut max_scale: Fixed32 = 0;
    let mut last_exp: i32;

    if version == 1 {
        last_exp = gb.get(5) as i32 + 10;
        let v = POW_TAB[(last_exp + 60) as usize];
        max_scale = v;
        let n = *bands_iter.next().ok_or_else(band_mismatch)? as usize;
        if pos + n > exponents.len() {
            return Err(band_mismatch());
        }
        exponents[pos..pos + n].fill(v);
        pos += n;
    }
    last_exp = 36;

    while pos < exponents.len() {
        let code = exp_vlc.get(gb)? as i32;
        last_exp += code - 60;
        if !(-60..=116).contains(&last_exp) {
            return Err(YunError::InvalidData(format!("指数档位越界: {last_exp}")));
        }
        let v = POW_TAB[(last_exp + 60) as usize];
        if v > max_scale {
            max_scale = v;
        }
        let n = *bands_iter.next().ok_or_else(band_mismatch)? as usize;
        if pos + n > exponents.len() {
            return Err(band_mismatch());
        }
        exponents[pos..pos + n].fill(v);
        pos += n;
    }
    Ok(max_scale)
}

/// 预计算 w[i] = 2·cos(π·i / frame_len), Q16.16
pub(super) fn build_lsp_cos_table(frame_len: usize) -> Vec<i32> {
    let wdel = div32(PI_F, to_fixed32(frame_len as i32));
    (0..frame_len)
        .map(|i| {
            // 多项式在峰值附近略有过冲, 压回 ±1 保证 2±w 非负
            let c = cos32(wdel * i as i32).clamp(-FIXED_ONE, FIXED_ONE);
            c << 1
        })
        .collect()
}

/// 读 10 个 LSP 系数 (首/末段 3 bit, 中段 4 bit) 并重建包络,
/// 返回本块最大指数.
pub(super) fn decode_exp_lsp(
    gb: &mut BitCache<'_>,
    lsp_cos_table: &[i32],
    exponents: &mut [i32],
) -> Fixed32 {
    let mut lsp = [0i32; NB_LSP_COEFS];
    for (i, coef) in lsp.iter_mut().enumerate() {
        let bits = if i == 0 || i >= 8 { 3 } else { 4 };
        let idx = gb.get(bits) as usize;
        *coef = LSP_CODEBOOK[i][idx];
    }
    lsp_to_curve(lsp_cos_table, &lsp, exponents)
}

/// x^(-1/4), x ≤ 0 时饱和到最大值
fn pow_m1_4(x: Fixed32) -> Fixed32 {
    if x <= 0 {
        return i32::MAX;
    }
    exp2_fixed(-(log2_fixed(x) >> 2))
}

/// 由 LSP 系数重建包络: 偶数下标系数进 q 链, 奇数下标进 p 链,
/// v = p²·(2-w) + q²·(2+w), 包络值取 v^(-1/4).
fn lsp_to_curve(cos_table: &[i32], lsp: &[i32; NB_LSP_COEFS], out: &mut [i32]) -> Fixed32 {
    let mut val_max: Fixed32 = 0;
    for (i, slot) in out.iter_mut().enumerate() {
        let w = cos_table[i];
        // p/q 以 Q16.48 累乘, 5 个因子幅度不超过 ±4, 不会溢出
        let mut p: i64 = 1 << 47;
        let mut q: i64 = 1 << 47;
        let mut j = 1;
        while j < NB_LSP_COEFS {
            q = mul64(q, widen32(w - lsp[j - 1]));
            p = mul64(p, widen32(w - lsp[j]));
            j += 2;
        }
        // 平方前压到 Q16.32, 乘 (2±w) 后回 Q16.16
        let p2 = (p >> 16) as i128;
        let q2 = (q >> 16) as i128;
        let sum = p2 * p2 * ((0x20000 - w) as i128) + q2 * q2 * ((0x20000 + w) as i128);
        let v = pow_m1_4(sat32((sum >> 64) as i64));
        if v > val_max {
            val_max = v;
        }
        *slot = v;
    }
    val_max
}

/// 把上一块的包络重采样到新的块长 (块长都是 2 的幂, 成整数倍)
pub(super) fn interpolate_array(scale: &mut [i32], old_size: usize, new_size: usize) {
    if new_size > old_size {
        let jincr = new_size / old_size;
        let mut j = new_size;
        for i in (0..old_size).rev() {
            let v = scale[i];
            for _ in 0..jincr {
                j -= 1;
                scale[j] = v;
            }
        }
    } else if new_size < old_size {
        let jincr = old_size / new_size;
        let mut j = 0;
        for i in 0..new_size {
            scale[i] = scale[j];
            j += jincr;
        }
    }
}
