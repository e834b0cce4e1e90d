//! # 终端输出
//!
//! 统一的状态前缀（`[OK]`、`[ERR]` 等）、标题栏、物理量的对齐打印与复数格式化。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块和 `main.rs` 使用
//! - 使用 `colored` crate

use colored::{ColoredString, Colorize};
use num_complex::Complex64;

const RULE_WIDTH: usize = 60;
const LABEL_WIDTH: usize = 14;

fn rule() -> ColoredString {
    "─".repeat(RULE_WIDTH).dimmed()
}

pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 错误写到 stderr
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    println!("\n{}\n  {}\n{}\n", rule(), title.bold(), rule());
}

pub fn print_separator() {
    println!("{}", rule());
}

/// 打印 `label = value`，标签左对齐
pub fn print_quantity(label: &str, value: f64) {
    println!(
        "{} {:<width$} = {:.10}",
        "[*]".blue().bold(),
        label,
        value,
        width = LABEL_WIDTH
    );
}

/// 复数格式化为 `a+bj`
pub fn format_complex(z: Complex64) -> String {
    let sign = if z.im.is_sign_negative() { '-' } else { '+' };
    format!("{:.10e}{}{:.10e}j", z.re, sign, z.im.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_complex() {
        assert_eq!(format_complex(Complex64::new(1.0, -0.5)), "1.0000000000e0-5.0000000000e-1j");
        assert_eq!(format_complex(Complex64::new(0.0, 2.0)), "0.0000000000e0+2.0000000000e0j");
    }
}
