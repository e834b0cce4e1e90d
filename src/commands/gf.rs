//! # gf 命令实现
//!
//! 从格点文件构造哈密顿量，计算热力学量和单粒子格林函数 G(iωₙ)。
//!
//! ## 功能
//! - 支持单文件和批量目录处理
//! - 并行计算（rayon）
//! - 导出 CSV 或绘制 PNG/SVG 图
//!
//! ## 依赖关系
//! - 使用 `cli/gf.rs` 定义的 GfArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `models/lattice.rs` 读取格点文件
//! - 使用 `ed/` 进行对角化与求值

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::gf::{GfArgs, GfOutputFormat};
use crate::ed::hamiltonian::from_lattice;
use crate::ed::{export, plot, EigenSystem, FockSpace, GreensFunction, GreensPoint, ModeIndex};
use crate::error::{EdkitError, Result};
use crate::models::lattice::parse_lattice_file;
use crate::utils::output;

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tabled::{Table, Tabled};

/// 基态简并判据
const DEGENERACY_TOL: f64 = 1e-9;

/// 单个格点文件的计算结果
#[derive(Debug, Clone)]
pub struct GfReport {
    pub name: String,
    pub baths: usize,
    pub dim: usize,
    pub ground_energy: f64,
    pub ground_degeneracy: usize,
    pub log_z: f64,
    pub z: f64,
    pub energy: f64,
    pub particles: f64,
    pub sum_rule: f64,
    pub points: Vec<GreensPoint>,
}

/// 表格行
#[derive(Debug, Clone, Tabled)]
struct GfRow {
    #[tabled(rename = "n")]
    n: i64,
    #[tabled(rename = "ωₙ")]
    omega: String,
    #[tabled(rename = "G(iωₙ)")]
    value: String,
}

/// 执行 gf 命令
pub fn execute(args: GfArgs) -> Result<()> {
    output::print_header("Green's Function from Lattice Files");

    if args.n_max <= 0 {
        return Err(EdkitError::InvalidArgument(format!(
            "--n-max must be positive, got {}",
            args.n_max
        )));
    }
    let mode: ModeIndex = args.index.parse()?;

    if args.input.is_file() {
        execute_single_file(&args, &mode)
    } else if args.input.is_dir() {
        execute_batch(&args, &mode)
    } else {
        Err(EdkitError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(args: &GfArgs, mode: &ModeIndex) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", args.input.display()));

    let report = compute_report(&args.input, mode, args.beta, args.n_max)?;
    print_report(&report, mode, args.show);

    if let Some(dir) = &args.output {
        fs::create_dir_all(dir).map_err(|e| EdkitError::FileWriteError {
            path: dir.display().to_string(),
            source: e,
        })?;

        let target = output_path(dir, &file_stem(&args.input), args.format);
        if target.exists() && !args.overwrite {
            output::print_skip(&format!("Output exists: {}", target.display()));
            return Ok(());
        }
        write_report(&report, &target, mode, args)?;
        output::print_done(&format!("Saved to {}", target.display()));
    }

    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &GfArgs, mode: &ModeIndex) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let output_dir = args.output.as_ref().ok_or_else(|| {
        EdkitError::InvalidArgument("--output is required in directory mode".to_string())
    })?;

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} lattice files", files.len()));

    fs::create_dir_all(output_dir).map_err(|e| EdkitError::FileWriteError {
        path: output_dir.display().to_string(),
        source: e,
    })?;

    let tasks = plan_outputs(&args.input, &files, output_dir, args.format)?;

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(&tasks, |(input, target)| {
        process_batch_file(input, target, mode, args)
    })?;

    for msg in &result.outputs {
        output::print_done(msg);
    }
    for msg in &result.skips {
        output::print_skip(msg);
    }

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} files, {} success, {} skipped, {} failed",
        result.total(),
        result.success,
        result.skipped,
        result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 为每个输入文件确定输出路径
///
/// 输出名由相对于输入目录的路径拼接而成（`run1/LatticeTest.json` →
/// `run1_LatticeTest_gf.csv`），不同输入映射到同一输出时报错。
fn plan_outputs(
    root: &Path,
    files: &[PathBuf],
    output_dir: &Path,
    format: GfOutputFormat,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut claimed: HashMap<PathBuf, &PathBuf> = HashMap::new();
    let mut tasks = Vec::with_capacity(files.len());

    for input in files {
        let target = output_path(output_dir, &relative_name(root, input), format);
        if let Some(previous) = claimed.insert(target.clone(), input) {
            return Err(EdkitError::InvalidArgument(format!(
                "'{}' and '{}' would both be written to '{}'",
                previous.display(),
                input.display(),
                target.display()
            )));
        }
        tasks.push((input.clone(), target));
    }

    Ok(tasks)
}

/// 处理批量模式中的单个文件
fn process_batch_file(
    input: &Path,
    target: &Path,
    mode: &ModeIndex,
    args: &GfArgs,
) -> ProcessResult {
    if target.exists() && !args.overwrite {
        return ProcessResult::Skipped(format!("Output exists, skipping: {}", target.display()));
    }

    let outcome = compute_report(input, mode, args.beta, args.n_max)
        .and_then(|report| write_report(&report, target, mode, args));

    match outcome {
        Ok(()) => ProcessResult::Success(format!("{} -> {}", input.display(), target.display())),
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 读取格点文件并完成全部计算
pub fn compute_report(path: &Path, mode: &ModeIndex, beta: f64, n_max: i64) -> Result<GfReport> {
    let lattice = parse_lattice_file(path)?;
    let (h, indices) = from_lattice(&lattice)?;
    let fock = FockSpace::new(indices.len())?;
    let eig = EigenSystem::new(&fock.expression_matrix(&h)?, beta)?;

    let pos = indices.require(mode)?;
    let gf = GreensFunction::new(&eig, &fock, pos, pos)?;

    Ok(GfReport {
        name: file_stem(path),
        baths: lattice.bath_count(),
        dim: fock.dim(),
        ground_energy: eig.ground_energy(),
        ground_degeneracy: eig
            .degeneracies(DEGENERACY_TOL)
            .first()
            .map(|&(_, count)| count)
            .unwrap_or(0),
        log_z: eig.log_partition_function(),
        z: eig.partition_function(),
        energy: eig.average_energy(),
        particles: eig.thermal_average(&fock.number_matrix()),
        sum_rule: gf.total_weight(),
        points: gf.values(n_max),
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("lattice")
        .to_string()
}

/// 相对路径去掉扩展名后用 `_` 连接各级目录
fn relative_name(root: &Path, input: &Path) -> String {
    let relative = input.strip_prefix(root).unwrap_or(input).with_extension("");
    let parts: Vec<&str> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        file_stem(input)
    } else {
        parts.join("_")
    }
}

fn output_path(dir: &Path, name: &str, format: GfOutputFormat) -> PathBuf {
    dir.join(format!("{}_gf.{}", name, format.extension()))
}

fn write_report(report: &GfReport, target: &Path, mode: &ModeIndex, args: &GfArgs) -> Result<()> {
    match args.format {
        GfOutputFormat::Csv => export::greens_to_csv(&report.points, target),
        GfOutputFormat::Png | GfOutputFormat::Svg => plot::generate_greens_plot(
            &report.points,
            target,
            &format!("{}  G[{}](iωₙ), β = {}", report.name, mode, args.beta),
            args.width,
            args.height,
            args.format == GfOutputFormat::Svg,
        ),
    }
}

fn print_report(report: &GfReport, mode: &ModeIndex, show: usize) {
    output::print_info(&format!(
        "{}: 1 correlated site + {} bath sites, Hilbert space dimension {}",
        report.name, report.baths, report.dim
    ));
    output::print_quantity("Ground energy", report.ground_energy);
    output::print_info(&format!("Ground state degeneracy {}", report.ground_degeneracy));
    output::print_quantity("ln Z", report.log_z);
    output::print_info(&format!("Z = {:.6e}", report.z));
    output::print_quantity("<E>", report.energy);
    output::print_quantity("<N>", report.particles);
    if (report.sum_rule - 1.0).abs() > 1e-8 {
        output::print_warning(&format!(
            "Spectral sum rule violated: Σ residues = {:.10}",
            report.sum_rule
        ));
    }

    let rows: Vec<GfRow> = report
        .points
        .iter()
        .take(show)
        .map(|p| GfRow {
            n: p.n,
            omega: format!("{:.6}", p.omega),
            value: output::format_complex(p.value),
        })
        .collect();

    if !rows.is_empty() {
        output::print_header(&format!("G[{}](iωₙ)", mode));
        println!("{}", Table::new(&rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ed::index::Spin;
    use crate::models::lattice::{vla_lattice, write_lattice_file};

    fn args(input: PathBuf, output: Option<PathBuf>) -> GfArgs {
        GfArgs {
            input,
            beta: 10.0,
            index: "0:up".to_string(),
            n_max: 8,
            show: 3,
            output,
            format: GfOutputFormat::Csv,
            width: 400,
            height: 300,
            pattern: "*.json".to_string(),
            recursive: false,
            overwrite: false,
            jobs: 2,
        }
    }

    #[test]
    fn test_single_site_lattice_matches_atom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atom.json");
        write_lattice_file(&vla_lattice(4.0, &[]), &path).unwrap();

        let report = compute_report(&path, &ModeIndex::new("0", Spin::Up), 10.0, 4).unwrap();
        assert_eq!(report.dim, 4);
        assert_eq!(report.baths, 0);
        assert_eq!(report.ground_degeneracy, 2);
        assert!((report.sum_rule - 1.0).abs() < 1e-12);
        // 半满原子: ⟨N⟩ = 1，⟨E⟩ 等于解析式
        assert!((report.particles - 1.0).abs() < 1e-12);
        let expected = crate::ed::thermal::closed_form_energy(10.0, 4.0);
        assert!((report.energy - expected).abs() < 1e-12);
        // 粒子-空穴对称：Re G = 0
        for p in &report.points {
            assert!(p.value.re.abs() < 1e-12);
        }
    }

    #[test]
    fn test_vla_particle_hole_symmetry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LatticeTest.json");
        write_lattice_file(&vla_lattice(4.0, &[0.5, 1.0]), &path).unwrap();

        let report = compute_report(&path, &ModeIndex::new("0", Spin::Up), 10.0, 4).unwrap();
        assert_eq!(report.dim, 64);
        assert!((report.particles - 3.0).abs() < 1e-8);
        for p in &report.points {
            assert!(p.value.re.abs() < 1e-8);
            assert!(p.value.im < 0.0);
        }
    }

    #[test]
    fn test_batch_mode_writes_outputs() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_lattice_file(&vla_lattice(4.0, &[0.5]), &input.path().join("a.json")).unwrap();
        write_lattice_file(&vla_lattice(2.0, &[1.0]), &input.path().join("b.json")).unwrap();
        fs::write(input.path().join("broken.json"), "{").unwrap();

        execute(args(input.path().to_path_buf(), Some(out.path().to_path_buf()))).unwrap();

        assert!(out.path().join("a_gf.csv").exists());
        assert!(out.path().join("b_gf.csv").exists());
        assert!(!out.path().join("broken_gf.csv").exists());
    }

    #[test]
    fn test_recursive_batch_keeps_same_named_files_apart() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        for (dir, u) in [("run1", 4.0), ("run2", 2.0)] {
            let sub = input.path().join(dir);
            fs::create_dir(&sub).unwrap();
            write_lattice_file(&vla_lattice(u, &[0.5]), &sub.join("LatticeTest.json")).unwrap();
        }

        let mut batch = args(input.path().to_path_buf(), Some(out.path().to_path_buf()));
        batch.recursive = true;
        execute(batch).unwrap();

        let first = fs::read_to_string(out.path().join("run1_LatticeTest_gf.csv")).unwrap();
        let second = fs::read_to_string(out.path().join("run2_LatticeTest_gf.csv")).unwrap();
        assert_ne!(first, second);
        assert!(!out.path().join("LatticeTest_gf.csv").exists());
    }

    #[test]
    fn test_colliding_output_names_are_rejected() {
        let root = Path::new("/data");
        let files = vec![
            PathBuf::from("/data/a_b/x.json"),
            PathBuf::from("/data/a/b_x.json"),
        ];
        let err = plan_outputs(root, &files, Path::new("/out"), GfOutputFormat::Csv).unwrap_err();
        assert!(matches!(err, EdkitError::InvalidArgument(_)));

        let tasks = plan_outputs(root, &files[..1], Path::new("/out"), GfOutputFormat::Svg).unwrap();
        assert_eq!(tasks[0].1, PathBuf::from("/out/a_b_x_gf.svg"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut batch = args(input.path().to_path_buf(), Some(out.path().to_path_buf()));
        batch.pattern = "[".to_string();
        let err = execute(batch).unwrap_err();
        assert!(matches!(err, EdkitError::InvalidArgument(_)));
    }

    #[test]
    fn test_batch_mode_requires_output() {
        let input = tempfile::tempdir().unwrap();
        assert!(execute(args(input.path().to_path_buf(), None)).is_err());
    }

    #[test]
    fn test_missing_input() {
        let err = execute(args(PathBuf::from("/nonexistent/lattice.json"), None)).unwrap_err();
        assert!(matches!(err, EdkitError::FileNotFound { .. }));
    }
}
