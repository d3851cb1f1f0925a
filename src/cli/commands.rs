//! # Commands Module / 命令模块
//!
//! - `run` - builds the sysroot matrix
//! - `init` - writes a `SysrootMatrix.toml`

pub mod init;
pub mod run;
