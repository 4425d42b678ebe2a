//! 决策展示
//!
//! 将判定结果转换为面向用户的文字与 UI 访问指示器，不做任何 I/O。

use serde::{Deserialize, Serialize};

use crate::permission::AccessLevel;
use crate::role::Role;

/// 认证失败时的统一提示，刻意不区分失败原因
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// 账号已停用
pub const DEACTIVATED_MESSAGE: &str = "Account is deactivated";

/// 权限不足提示
///
/// 消息中必须包含 "permission"，前端与测试依赖该约定。
pub fn permission_denied_message(action: impl std::fmt::Display, module: &str) -> String {
    format!(
        "You do not have permission to {} in the {} module.",
        action, module
    )
}

pub fn permission_granted_message(action: impl std::fmt::Display, module: &str) -> String {
    format!("Permission granted to {} in the {} module.", action, module)
}

/// 导航被拒绝时的原因
pub fn navigation_denied_reason(role: Role, module: &str) -> String {
    format!(
        "Access denied: {} does not have access to {} module",
        role.description(),
        module
    )
}

/// 单次权限检查结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCheck {
    pub allowed: bool,
    pub message: String,
}

impl PermissionCheck {
    pub fn granted(action: impl std::fmt::Display, module: &str) -> Self {
        Self {
            allowed: true,
            message: permission_granted_message(action, module),
        }
    }

    pub fn denied(action: impl std::fmt::Display, module: &str) -> Self {
        Self {
            allowed: false,
            message: permission_denied_message(action, module),
        }
    }
}

/// 导航校验结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationResult {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl NavigationResult {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: String) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorLevel {
    Full,
    Read,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorColor {
    Green,
    Yellow,
    Red,
}

/// UI 访问指示器（与门户矩阵颜色一致）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessIndicator {
    pub level: IndicatorLevel,
    pub color: IndicatorColor,
    pub label: String,
}

impl AccessIndicator {
    pub fn for_level(level: AccessLevel) -> Self {
        let (level, color, label) = match level {
            AccessLevel::Full => (IndicatorLevel::Full, IndicatorColor::Green, "Full Access (F)"),
            AccessLevel::Read => (IndicatorLevel::Read, IndicatorColor::Yellow, "Read-only (R)"),
            AccessLevel::None => (IndicatorLevel::None, IndicatorColor::Red, "No Access (N)"),
        };
        Self {
            level,
            color,
            label: label.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::Action;

    #[test]
    fn test_denied_message_names_action_and_module() {
        let check = PermissionCheck::denied(Action::Create, "sales");
        assert!(!check.allowed);
        assert_eq!(
            check.message,
            "You do not have permission to CREATE in the sales module."
        );
    }

    #[test]
    fn test_indicator_mapping() {
        let full = AccessIndicator::for_level(AccessLevel::Full);
        assert_eq!(full.level, IndicatorLevel::Full);
        assert_eq!(full.color, IndicatorColor::Green);

        let read = AccessIndicator::for_level(AccessLevel::Read);
        assert_eq!(read.color, IndicatorColor::Yellow);
        assert_eq!(read.label, "Read-only (R)");

        let none = AccessIndicator::for_level(AccessLevel::None);
        assert_eq!(none.level, IndicatorLevel::None);
        assert_eq!(none.color, IndicatorColor::Red);
    }

    #[test]
    fn test_indicator_serializes_lowercase() {
        let json = serde_json::to_value(AccessIndicator::for_level(AccessLevel::Read)).unwrap();
        assert_eq!(json["level"], "read");
        assert_eq!(json["color"], "yellow");
    }

    #[test]
    fn test_navigation_result_omits_reason_when_allowed() {
        let json = serde_json::to_value(NavigationResult::allow()).unwrap();
        assert_eq!(json, serde_json::json!({ "allowed": true }));
    }

    #[test]
    fn test_navigation_denied_reason_mentions_role_and_module() {
        let reason = navigation_denied_reason(Role::AdminHr, "finance");
        assert!(reason.starts_with("Access denied: Admin / HR"));
        assert!(reason.ends_with("access to finance module"));
    }
}
