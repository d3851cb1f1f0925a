//! # Execution Planner Module / 执行计划模块
//!
//! This module turns the discovered target list into the list a run actually
//! builds: duplicates collapse, excluded targets are dropped, and the rest may
//! be split across several CI runners.
//!
//! 此模块将发现的目标列表转换为实际构建的列表：
//! 合并重复项、丢弃被排除的目标，其余目标可在多个 CI 运行器之间拆分。

use anyhow::{Result, bail};
use std::collections::HashSet;

use crate::core::models::Target;
use crate::infra::t;

/// Represents a complete execution plan for a sysroot matrix.
/// 表示 sysroot 矩阵的完整执行计划。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Targets to build, in discovery order.
    /// 要构建的目标，按发现顺序排列。
    pub targets: Vec<Target>,
    /// Number of repeated entries that were collapsed.
    /// 被合并的重复条目数量。
    pub duplicate_count: usize,
    /// Number of targets removed by the exclude list.
    /// 被排除列表移除的目标数量。
    pub excluded_count: usize,
    /// Whether the targets are split across multiple runners (CI environment).
    /// 目标是否分布在多个运行器上（CI 环境）。
    pub is_distributed: bool,
}

/// Creates an execution plan for the given targets.
///
/// # Arguments
/// * `targets` - The discovered targets, in source order
/// * `exclude` - Target names that must not be built
/// * `total_runners` - Optional total number of runners for distributed execution
/// * `runner_index` - Optional index of this runner (0-based)
pub fn plan_execution(
    targets: Vec<Target>,
    exclude: &[String],
    total_runners: Option<usize>,
    runner_index: Option<usize>,
) -> Result<ExecutionPlan> {
    let discovered = targets.len();
    let mut seen = HashSet::new();
    let unique: Vec<Target> = targets
        .into_iter()
        .filter(|target| seen.insert(target.clone()))
        .collect();
    let duplicate_count = discovered - unique.len();

    let excluded: HashSet<&str> = exclude.iter().map(|name| name.trim()).collect();
    let (kept, dropped): (Vec<_>, Vec<_>) = unique
        .into_iter()
        .partition(|target| !excluded.contains(target.as_str()));

    let (targets, is_distributed) = match (total_runners, runner_index) {
        (Some(total), Some(index)) => {
            if total == 0 {
                bail!(t!("plan.zero_runners").to_string());
            }
            if index >= total {
                bail!(t!("plan.index_out_of_range", index = index, total = total).to_string());
            }
            let shard = kept
                .into_iter()
                .enumerate()
                .filter(|(i, _)| i % total == index)
                .map(|(_, target)| target)
                .collect();
            (shard, true)
        }
        (None, None) => (kept, false),
        _ => bail!(t!("plan.incomplete_sharding").to_string()),
    };

    tracing::debug!(
        planned = targets.len(),
        duplicates = duplicate_count,
        excluded = dropped.len(),
        "execution plan ready"
    );

    Ok(ExecutionPlan {
        targets,
        duplicate_count,
        excluded_count: dropped.len(),
        is_distributed,
    })
}
