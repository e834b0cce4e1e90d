//! # 结果数据导出
//!
//! 导出 χ⁽³⁾ 和格林函数到 CSV。
//!
//! ## 支持格式
//! - χ⁽³⁾: channel, n1, n2, nu1, nu2, re, im
//! - G(iωₙ): n, omega, re, im
//!
//! ## 依赖关系
//! - 被 `commands/chi3.rs`, `commands/gf.rs` 调用
//! - 使用 `csv` 库写入 CSV 文件

use crate::ed::chi3::Chi3Point;
use crate::ed::greens::GreensPoint;
use crate::error::{EdkitError, Result};

use std::path::Path;

/// 导出 χ⁽³⁾ 为 CSV 格式
pub fn chi3_to_csv(points: &[Chi3Point], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["channel", "n1", "n2", "nu1", "nu2", "re", "im"])?;

    for p in points {
        wtr.write_record(&[
            p.channel.to_string(),
            p.n1.to_string(),
            p.n2.to_string(),
            format!("{:.10}", p.nu1),
            format!("{:.10}", p.nu2),
            format!("{:.12e}", p.value.re),
            format!("{:.12e}", p.value.im),
        ])?;
    }

    wtr.flush().map_err(|e| EdkitError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出格林函数为 CSV 格式
pub fn greens_to_csv(points: &[GreensPoint], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["n", "omega", "re", "im"])?;

    for p in points {
        wtr.write_record(&[
            p.n.to_string(),
            format!("{:.10}", p.omega),
            format!("{:.12e}", p.value.re),
            format!("{:.12e}", p.value.im),
        ])?;
    }

    wtr.flush().map_err(|e| EdkitError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
