//! # 统一错误处理模块
//!
//! 定义 edkit 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// edkit 统一错误类型
#[derive(Error, Debug)]
pub enum EdkitError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Output already exists: {path} (use --overwrite)")]
    OutputExists { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 模型错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid lattice: {0}")]
    InvalidLattice(String),

    #[error("Unknown mode index: {0}")]
    UnknownIndex(String),

    #[error("Too many modes: {modes} (at most {max} supported)")]
    TooManyModes { modes: usize, max: usize },

    // ─────────────────────────────────────────────────────────────
    // 数值一致性错误
    // ─────────────────────────────────────────────────────────────
    #[error("Consistency check failed: {check} (deviation {deviation:.3e} > {tolerance:.1e})")]
    ConsistencyCheck {
        check: String,
        deviation: f64,
        tolerance: f64,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV / JSON 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, EdkitError>;
