//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the sysroot matrix,
//! including data models, configuration, target discovery, planning and the
//! per-target build loop.
//!
//! 此模块包含 sysroot 矩阵的核心功能，
//! 包括数据模型、配置、目标发现、执行计划和逐目标构建循环。

pub mod config;
pub mod execution;
pub mod models;
pub mod planner;
pub mod targets;

// Re-exports
pub use config::MatrixConfig;
pub use execution::run_matrix;
pub use models::{MatrixReport, Target, TargetOutcome};
