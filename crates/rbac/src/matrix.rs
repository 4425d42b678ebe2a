//! 内置访问控制矩阵
//!
//! 颜色约定：绿色 (F) = 完全访问，黄色 (R) = 只读，红色 (N) = 无访问。
//! 每个角色分支都穷举全部模块，新增模块时编译器会在这里报错。

use crate::module::Module;
use crate::permission::AccessLevel;
use crate::role::Role;

/// 内置矩阵中 (角色, 模块) 的访问级别
pub fn builtin_level(role: Role, module: Module) -> AccessLevel {
    use AccessLevel::{Full as F, None as N, Read as R};
    use Module::*;

    match role {
        Role::Management => match module {
            Sales | Clients | Inventory | Purchase | Finance | Accounting | Employees
            | Organizational | Attendance | Payroll | Reports | Templates | Qhse | Settings
            | Administration | Procurement | Projects | Compliance | Correspondence => F,
        },

        Role::FinanceTeam => match module {
            Finance | Accounting | Payroll => F,
            Sales | Clients | Inventory | Purchase | Employees | Organizational | Attendance
            | Reports | Templates | Settings | Administration | Procurement | Projects => R,
            Qhse | Compliance | Correspondence => N,
        },

        Role::ProcurementBd => match module {
            Sales | Clients | Inventory | Purchase | Templates | Procurement | Projects => F,
            Finance | Accounting | Employees | Organizational | Attendance | Reports | Qhse
            | Settings | Correspondence => R,
            Payroll | Administration | Compliance => N,
        },

        Role::AdminHr => match module {
            Employees | Organizational | Attendance | Payroll | Templates | Settings
            | Administration => F,
            Sales | Clients | Inventory | Purchase | Reports | Correspondence => R,
            Finance | Accounting | Qhse | Procurement | Projects | Compliance => N,
        },

        Role::ImsQhse => match module {
            Qhse | Compliance => F,
            Inventory | Purchase | Employees | Organizational | Attendance | Reports
            | Templates | Settings | Projects | Correspondence => R,
            Sales | Clients | Finance | Accounting | Payroll | Administration | Procurement => N,
        },
    }
}

/// 内置矩阵的全部条目
pub fn builtin_entries() -> impl Iterator<Item = (Role, Module, AccessLevel)> {
    Role::ALL.into_iter().flat_map(|role| {
        Module::ALL
            .into_iter()
            .map(move |module| (role, module, builtin_level(role, module)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_pair() {
        assert_eq!(
            builtin_entries().count(),
            Role::ALL.len() * Module::ALL.len()
        );
    }

    #[test]
    fn test_management_full_everywhere() {
        for module in Module::ALL {
            assert_eq!(builtin_level(Role::Management, module), AccessLevel::Full);
        }
    }

    #[test]
    fn test_finance_team_row() {
        assert_eq!(builtin_level(Role::FinanceTeam, Module::Finance), AccessLevel::Full);
        assert_eq!(builtin_level(Role::FinanceTeam, Module::Payroll), AccessLevel::Full);
        assert_eq!(builtin_level(Role::FinanceTeam, Module::Sales), AccessLevel::Read);
        assert_eq!(builtin_level(Role::FinanceTeam, Module::Qhse), AccessLevel::None);
    }

    #[test]
    fn test_admin_hr_has_no_finance() {
        assert_eq!(builtin_level(Role::AdminHr, Module::Finance), AccessLevel::None);
        assert_eq!(builtin_level(Role::AdminHr, Module::Accounting), AccessLevel::None);
        assert_eq!(builtin_level(Role::AdminHr, Module::Payroll), AccessLevel::Full);
    }

    #[test]
    fn test_ims_qhse_row() {
        assert_eq!(builtin_level(Role::ImsQhse, Module::Qhse), AccessLevel::Full);
        assert_eq!(builtin_level(Role::ImsQhse, Module::Sales), AccessLevel::None);
        assert_eq!(builtin_level(Role::ImsQhse, Module::Projects), AccessLevel::Read);
    }

    #[test]
    fn test_procurement_row() {
        assert_eq!(builtin_level(Role::ProcurementBd, Module::Purchase), AccessLevel::Full);
        assert_eq!(builtin_level(Role::ProcurementBd, Module::Finance), AccessLevel::Read);
        assert_eq!(builtin_level(Role::ProcurementBd, Module::Payroll), AccessLevel::None);
    }
}
