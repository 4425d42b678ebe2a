//! 业务模块

use serde::{Deserialize, Serialize};

/// 受访问控制的业务模块
///
/// 边界上以字符串键出现（路由、导航路径），键匹配严格区分大小写，
/// 不做单复数或别名归一化。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Sales,
    Clients,
    Inventory,
    Purchase,
    Finance,
    Accounting,
    Employees,
    Organizational,
    Attendance,
    Payroll,
    Reports,
    Templates,
    Qhse,
    Settings,
    Administration,
    Procurement,
    Projects,
    Compliance,
    Correspondence,
}

impl Module {
    pub const ALL: [Module; 19] = [
        Module::Sales,
        Module::Clients,
        Module::Inventory,
        Module::Purchase,
        Module::Finance,
        Module::Accounting,
        Module::Employees,
        Module::Organizational,
        Module::Attendance,
        Module::Payroll,
        Module::Reports,
        Module::Templates,
        Module::Qhse,
        Module::Settings,
        Module::Administration,
        Module::Procurement,
        Module::Projects,
        Module::Compliance,
        Module::Correspondence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Sales => "sales",
            Module::Clients => "clients",
            Module::Inventory => "inventory",
            Module::Purchase => "purchase",
            Module::Finance => "finance",
            Module::Accounting => "accounting",
            Module::Employees => "employees",
            Module::Organizational => "organizational",
            Module::Attendance => "attendance",
            Module::Payroll => "payroll",
            Module::Reports => "reports",
            Module::Templates => "templates",
            Module::Qhse => "qhse",
            Module::Settings => "settings",
            Module::Administration => "administration",
            Module::Procurement => "procurement",
            Module::Projects => "projects",
            Module::Compliance => "compliance",
            Module::Correspondence => "correspondence",
        }
    }

    /// 按精确键查找模块，未知键返回 `None`
    pub fn from_key(key: &str) -> Option<Module> {
        Module::ALL.into_iter().find(|m| m.as_str() == key)
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 门户分类（访问控制矩阵中的大类）
///
/// 每个分类对应一个同名模块，分类权限直接取该模块的访问级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Administration,
    Finance,
    Procurement,
    Projects,
    Compliance,
    Correspondence,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Administration,
        Category::Finance,
        Category::Procurement,
        Category::Projects,
        Category::Compliance,
        Category::Correspondence,
    ];

    pub fn module(&self) -> Module {
        match self {
            Category::Administration => Module::Administration,
            Category::Finance => Module::Finance,
            Category::Procurement => Module::Procurement,
            Category::Projects => Module::Projects,
            Category::Compliance => Module::Compliance,
            Category::Correspondence => Module::Correspondence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_roundtrip() {
        for module in Module::ALL {
            assert_eq!(Module::from_key(module.as_str()), Some(module));
        }
    }

    #[test]
    fn test_from_key_does_not_normalize() {
        assert_eq!(Module::from_key("Sales"), None);
        assert_eq!(Module::from_key("SALES"), None);
        assert_eq!(Module::from_key("employee"), None);
        assert_eq!(Module::from_key("hr"), None);
        assert_eq!(Module::from_key(" sales"), None);
    }

    #[test]
    fn test_serde_key_matches_as_str() {
        for module in Module::ALL {
            let json = serde_json::to_string(&module).unwrap();
            assert_eq!(json, format!("\"{}\"", module.as_str()));
        }
    }
}
