//! 组织角色

use serde::{Deserialize, Serialize};

use crate::error::{RbacError, RbacResult};

/// 组织角色（封闭集合，运行期不增删）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// 管理层（MD / President），超级用户
    Management,
    FinanceTeam,
    /// 采购 / 商务拓展
    ProcurementBd,
    AdminHr,
    /// IMS / QHSE 合规
    ImsQhse,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Management,
        Role::FinanceTeam,
        Role::ProcurementBd,
        Role::AdminHr,
        Role::ImsQhse,
    ];

    /// 对每个模块都拥有 FULL 权限的角色
    pub const SUPERUSER: Role = Role::Management;

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Management => "MANAGEMENT",
            Role::FinanceTeam => "FINANCE_TEAM",
            Role::ProcurementBd => "PROCUREMENT_BD",
            Role::AdminHr => "ADMIN_HR",
            Role::ImsQhse => "IMS_QHSE",
        }
    }

    pub fn is_superuser(&self) -> bool {
        *self == Self::SUPERUSER
    }

    /// 角色说明，用于导航拒绝提示
    pub fn description(&self) -> &'static str {
        match self {
            Role::Management => "Management (MD / President) - Full access to all categories",
            Role::FinanceTeam => {
                "Finance Team - Full access to Finance, Read-only access to Contracts/Procurement"
            }
            Role::ProcurementBd => {
                "Procurement / BD Team - Full access to Procurement & Projects, Read-only access to Finance (for PO values)"
            }
            Role::AdminHr => {
                "Admin / HR - Full access to HR & Admin docs, Limited read-only access to others (licenses, permits)"
            }
            Role::ImsQhse => {
                "IMS / QHSE Officer - Full access to IMS / Compliance, Limited access to Operations/Projects"
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RbacError;

    /// 大小写敏感；空串视为缺失参数
    fn from_str(s: &str) -> RbacResult<Self> {
        if s.trim().is_empty() {
            return Err(RbacError::InvalidArgument { name: "role" });
        }
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| RbacError::UnknownRole {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(
            "management".parse::<Role>(),
            Err(RbacError::UnknownRole {
                value: "management".to_string()
            })
        );
    }

    #[test]
    fn test_empty_role_is_programmer_error() {
        assert_eq!(
            "".parse::<Role>(),
            Err(RbacError::InvalidArgument { name: "role" })
        );
        assert_eq!(
            "   ".parse::<Role>(),
            Err(RbacError::InvalidArgument { name: "role" })
        );
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&Role::ProcurementBd).unwrap();
        assert_eq!(json, "\"PROCUREMENT_BD\"");
        let role: Role = serde_json::from_str("\"IMS_QHSE\"").unwrap();
        assert_eq!(role, Role::ImsQhse);
    }

    #[test]
    fn test_only_management_is_superuser() {
        assert!(Role::Management.is_superuser());
        assert_eq!(Role::ALL.iter().filter(|r| r.is_superuser()).count(), 1);
    }
}
