//! # 批量执行器
//!
//! 并行执行批量处理任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代（结果保持输入顺序）
//! - 进度条显示
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/chi3.rs`, `commands/gf.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{EdkitError, Result};
use crate::utils::progress;

use rayon::prelude::*;

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 处理成功
    Success(String),
    /// 跳过（如文件已存在）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 成功生成的输出说明
    pub outputs: Vec<String>,
    /// 跳过原因
    pub skips: Vec<String>,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(msg) => {
                self.success += 1;
                self.outputs.push(msg);
            }
            ProcessResult::Skipped(msg) => {
                self.skipped += 1;
                self.skips.push(msg);
            }
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器（0 = 自动）
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 并行映射，结果与输入一一对应
    pub fn map<T, R, F>(&self, items: &[T], message: &str, processor: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        let pb = progress::create_progress_bar(items.len() as u64, message);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| EdkitError::Other(format!("Failed to build thread pool: {}", e)))?;

        let results = pool.install(|| {
            items
                .par_iter()
                .map(|item| {
                    let result = processor(item);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();
        Ok(results)
    }

    /// 并行处理文件列表并汇总
    pub fn run<T, F>(&self, items: &[T], processor: F) -> Result<BatchResult>
    where
        T: Sync,
        F: Fn(&T) -> ProcessResult + Sync + Send,
    {
        let results = self.map(items, "Processing", processor)?;

        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }

        Ok(batch_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_preserves_order() {
        let runner = BatchRunner::new(4);
        let items: Vec<i64> = (0..100).collect();
        let squares = runner.map(&items, "squares", |x| x * x).unwrap();
        assert_eq!(squares[7], 49);
        assert_eq!(squares.len(), 100);
    }

    #[test]
    fn test_run_counts() {
        let runner = BatchRunner::new(2);
        let items = vec![1, 2, 3, 4, 5];
        let result = runner
            .run(&items, |&x| match x % 3 {
                0 => ProcessResult::Skipped(x.to_string()),
                1 => ProcessResult::Success(x.to_string()),
                _ => ProcessResult::Failed(x.to_string(), "odd".to_string()),
            })
            .unwrap();

        assert_eq!(result.total(), 5);
        assert_eq!(result.success, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.failed, 2);
        assert_eq!(result.failures[0].0, "2");
        assert_eq!(result.outputs, vec!["1", "4"]);
        assert_eq!(result.skips, vec!["3"]);
    }

    #[test]
    fn test_zero_jobs_uses_all_cores() {
        let runner = BatchRunner::new(0);
        let doubled = runner.map(&[1, 2, 3], "double", |x| x * 2).unwrap();
        assert_eq!(doubled, vec![2, 4, 6]);
    }
}
