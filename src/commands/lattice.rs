//! # lattice 命令实现
//!
//! 生成 1 个关联格点 + N 个浴格点的 VLA 格点文件。
//!
//! ## 依赖关系
//! - 使用 `cli/lattice.rs` 定义的参数
//! - 使用 `models/lattice.rs`
//! - 使用 `utils/output.rs`

use crate::cli::lattice::LatticeArgs;
use crate::error::{EdkitError, Result};
use crate::models::lattice::{vla_lattice, write_lattice_file};
use crate::utils::output;

/// 执行 lattice 命令
pub fn execute(args: LatticeArgs) -> Result<()> {
    let hoppings = args.hoppings();

    output::print_header("VLA Lattice Generator");
    output::print_info(&format!(
        "Creating lattice file from scratch for VLA calc with 1 correlated and {} bath sites",
        hoppings.len()
    ));

    if !args.u.is_finite() {
        return Err(EdkitError::InvalidArgument(format!(
            "Interaction U must be finite, got {}",
            args.u
        )));
    }
    if let Some(bad) = hoppings.iter().find(|t| !t.is_finite()) {
        return Err(EdkitError::InvalidArgument(format!(
            "Hopping amplitude must be finite, got {}",
            bad
        )));
    }

    if args.output.exists() && !args.overwrite {
        return Err(EdkitError::OutputExists {
            path: args.output.display().to_string(),
        });
    }

    let lattice = vla_lattice(args.u, &hoppings);
    write_lattice_file(&lattice, &args.output)?;

    output::print_done(&format!("Saved to {}", args.output.display()));
    Ok(())
}
