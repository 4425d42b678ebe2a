//! 访问控制错误类型
//!
//! 这里的错误都是编程错误或启动期配置错误，
//! 合法的"无权限"结果不会以错误形式出现。

use bgu_errors::AppError;
use thiserror::Error;

use crate::module::Module;
use crate::role::Role;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RbacError {
    /// 参数缺失（空字符串或纯空白）
    #[error("invalid argument: {name} must not be empty")]
    InvalidArgument { name: &'static str },

    #[error("unknown role: {value}")]
    UnknownRole { value: String },

    /// 仅在配置能力表时产生；查询时未知模块按 NONE 处理
    #[error("unknown module: {value}")]
    UnknownModule { value: String },

    #[error("unknown access level: {value}")]
    UnknownAccessLevel { value: String },

    #[error("unknown action: {value}")]
    UnknownAction { value: String },

    #[error("invalid permission entry for {role}/{module}: {reason}")]
    InvalidEntry {
        role: Role,
        module: Module,
        reason: String,
    },

    #[error("superuser role {role} must have FULL access to {module}")]
    SuperuserIncomplete { role: Role, module: Module },
}

pub type RbacResult<T> = Result<T, RbacError>;

impl From<RbacError> for AppError {
    fn from(error: RbacError) -> Self {
        match error {
            RbacError::InvalidArgument { .. }
            | RbacError::UnknownRole { .. }
            | RbacError::UnknownModule { .. }
            | RbacError::UnknownAccessLevel { .. }
            | RbacError::UnknownAction { .. } => AppError::validation(error.to_string()),
            RbacError::InvalidEntry { .. } | RbacError::SuperuserIncomplete { .. } => {
                AppError::configuration(error.to_string())
            }
        }
    }
}
