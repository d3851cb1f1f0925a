//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the sysroot matrix,
//! including command execution, the failure-records directory and logging.
//!
//! 此模块为 sysroot 矩阵提供基础设施服务，
//! 包括命令执行、失败记录目录和日志。

pub mod command;
pub mod fs;
pub mod logging;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
