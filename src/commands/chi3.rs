//! # chi3 命令实现
//!
//! 计算周期 Hubbard 团簇的三阶响应函数 χ⁽³⁾。
//!
//! ## 流程
//! 1. 构造 H = −t Σ c†c − μ Σ n + U Σ n↑n↓
//! 2. 对角化并做一致性检查
//! 3. 各通道在 Matsubara 网格上并行求值
//! 4. 打印表格，可选导出 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/chi3.rs` 定义的参数
//! - 使用 `ed/` 进行对角化与求值
//! - 使用 `batch/runner.rs` 并行计算频率点

use crate::batch::BatchRunner;
use crate::cli::chi3::Chi3Args;
use crate::ed::chi3::{frequency_grid, matsubara};
use crate::ed::hamiltonian::hubbard_cluster;
use crate::ed::{
    export, Channel, Chi3Calculator, Chi3Indices, Chi3Point, EigenSystem, FockSpace, ModeIndex,
};
use crate::error::{EdkitError, Result};
use crate::models::Grid2d;
use crate::utils::{output, progress};

use tabled::{Table, Tabled};

/// 结果表格行
#[derive(Debug, Clone, Tabled)]
struct Chi3Row {
    #[tabled(rename = "n1")]
    n1: i64,
    #[tabled(rename = "n2")]
    n2: i64,
    #[tabled(rename = "Re χ3")]
    re: String,
    #[tabled(rename = "Im χ3")]
    im: String,
}

/// 执行 chi3 命令
pub fn execute(args: Chi3Args) -> Result<()> {
    output::print_header("Third-Order Susceptibility of a Hubbard Cluster");

    validate(&args)?;

    let grid = Grid2d::new(args.nx, args.ny, !args.open);
    let mu = args.chemical_potential();

    output::print_info(&format!(
        "{}x{} cluster ({}), t = {}, U = {}, mu = {}, beta = {}",
        args.nx,
        args.ny,
        if args.open { "open" } else { "periodic" },
        args.t,
        args.u,
        mu,
        args.beta
    ));

    let (h, indices) = hubbard_cluster(&grid, args.t, args.u, mu)?;
    let fock = FockSpace::new(indices.len())?;
    output::print_info(&format!(
        "{} modes, Hilbert space dimension {}",
        fock.modes(),
        fock.dim()
    ));

    let spinner = progress::create_spinner("Diagonalizing Hamiltonian");
    let eig = fock
        .expression_matrix(&h)
        .and_then(|m| EigenSystem::new(&m, args.beta));
    spinner.finish_and_clear();
    let eig = eig?;

    output::print_success("Hamiltonian is Hermitian, eigenbasis is orthonormal");
    let levels: Vec<String> = eig.energies().iter().map(|e| format!("{:.6}", e)).collect();
    println!("E = [{}]", levels.join(", "));
    output::print_quantity("Ground energy", eig.ground_energy());
    output::print_quantity("ln Z", eig.log_partition_function());

    let mut calc = Chi3Calculator::new(&eig, fock, &indices)?;
    let runner = BatchRunner::new(args.jobs);
    let freqs = frequency_grid(args.n_min, args.n_max);
    let mut all_points = Vec::new();

    for channel in args.channel.channels() {
        let quad = resolve_indices(channel, &args)?;
        calc.prepare(&quad)?;

        let calc_ref = &calc;
        let points = runner
            .map(&freqs, channel.title(), |&(n1, n2)| {
                evaluate_point(calc_ref, channel, &quad, n1, n2, args.beta)
            })?
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        output::print_header(channel.title());
        output::print_info(&quad.to_string());
        print_table(&points);

        all_points.extend(points);
    }

    if let Some(path) = &args.output {
        export::chi3_to_csv(&all_points, path)?;
        output::print_done(&format!(
            "Wrote {} values to {}",
            all_points.len(),
            path.display()
        ));
    }

    Ok(())
}

/// 参数检查
fn validate(args: &Chi3Args) -> Result<()> {
    if args.nx == 0 || args.ny == 0 {
        return Err(EdkitError::InvalidArgument(format!(
            "Cluster size must be positive, got {}x{}",
            args.nx, args.ny
        )));
    }
    if args.n_min > args.n_max {
        return Err(EdkitError::InvalidArgument(format!(
            "Empty Matsubara range {}..={}",
            args.n_min, args.n_max
        )));
    }
    Ok(())
}

/// 默认指标叠加命令行覆盖
fn resolve_indices(channel: Channel, args: &Chi3Args) -> Result<Chi3Indices> {
    let mut quad = Chi3Indices::default_for(channel);

    let overrides = [
        (&args.x1p, &mut quad.x1p),
        (&args.x1, &mut quad.x1),
        (&args.x2p, &mut quad.x2p),
        (&args.x2, &mut quad.x2),
    ];
    for (given, slot) in overrides {
        if let Some(text) = given {
            *slot = text.parse::<ModeIndex>()?;
        }
    }

    Ok(quad)
}

fn evaluate_point(
    calc: &Chi3Calculator,
    channel: Channel,
    quad: &Chi3Indices,
    n1: i64,
    n2: i64,
    beta: f64,
) -> Result<Chi3Point> {
    let nu1 = matsubara(n1, beta);
    let nu2 = matsubara(n2, beta);
    let value = calc.evaluate(channel, quad, nu1, nu2)?;

    Ok(Chi3Point {
        channel,
        n1,
        n2,
        nu1,
        nu2,
        value,
    })
}

fn print_table(points: &[Chi3Point]) {
    let rows: Vec<Chi3Row> = points
        .iter()
        .map(|p| Chi3Row {
            n1: p.n1,
            n2: p.n2,
            re: format!("{:+.10e}", p.value.re),
            im: format!("{:+.10e}", p.value.im),
        })
        .collect();

    if !rows.is_empty() {
        println!("{}", Table::new(&rows));
    }
}
