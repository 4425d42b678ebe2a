//! 访问级别、操作与模块权限记录

use serde::{Deserialize, Serialize};

use crate::error::{RbacError, RbacResult};

/// 访问级别
///
/// 全序：`Full` ⊇ `Read` ⊇ `None`，派生的 `Ord` 即能力大小。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessLevel {
    None,
    Read,
    Full,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::None => "NONE",
            AccessLevel::Read => "READ",
            AccessLevel::Full => "FULL",
        }
    }

    /// 矩阵单字母代码（F / R / N）
    pub fn code(&self) -> char {
        match self {
            AccessLevel::None => 'N',
            AccessLevel::Read => 'R',
            AccessLevel::Full => 'F',
        }
    }

    /// 当前级别是否满足 `required`
    pub fn satisfies(&self, required: AccessLevel) -> bool {
        *self >= required
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccessLevel {
    type Err = RbacError;

    fn from_str(s: &str) -> RbacResult<Self> {
        match s {
            "FULL" => Ok(AccessLevel::Full),
            "READ" => Ok(AccessLevel::Read),
            "NONE" => Ok(AccessLevel::None),
            "" => Err(RbacError::InvalidArgument { name: "access" }),
            other => Err(RbacError::UnknownAccessLevel {
                value: other.to_string(),
            }),
        }
    }
}

/// CRUD 操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// 提示消息中使用的大写标签
    pub fn label(&self) -> &'static str {
        match self {
            Action::Create => "CREATE",
            Action::Read => "READ",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Action {
    type Err = RbacError;

    /// 接受 `create` 与 `CREATE` 两种写法
    fn from_str(s: &str) -> RbacResult<Self> {
        if s.trim().is_empty() {
            return Err(RbacError::InvalidArgument { name: "action" });
        }
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RbacError::UnknownAction {
                value: s.to_string(),
            })
    }
}

/// 四个相互独立的操作开关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ActionSet {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
}

impl ActionSet {
    pub const ALL: ActionSet = ActionSet {
        create: true,
        read: true,
        update: true,
        delete: true,
    };

    pub const READ_ONLY: ActionSet = ActionSet {
        create: false,
        read: true,
        update: false,
        delete: false,
    };

    pub const EMPTY: ActionSet = ActionSet {
        create: false,
        read: false,
        update: false,
        delete: false,
    };

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Create => self.create,
            Action::Read => self.read,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }
}

/// 模块权限记录
///
/// 不变式：
/// - `FULL` ⇒ 全部操作为 true
/// - `READ` ⇒ 仅 `read` 为 true
/// - `NONE` ⇒ 全部操作为 false
///
/// 字段公开以便构造自定义能力表，不变式在 [`AccessPolicy`](crate::AccessPolicy)
/// 构建时统一校验。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModulePermission {
    pub access: AccessLevel,
    pub actions: ActionSet,
}

impl ModulePermission {
    pub const FULL: ModulePermission = ModulePermission {
        access: AccessLevel::Full,
        actions: ActionSet::ALL,
    };

    pub const READ: ModulePermission = ModulePermission {
        access: AccessLevel::Read,
        actions: ActionSet::READ_ONLY,
    };

    /// 缺失条目的默认值（fail-closed）
    pub const NONE: ModulePermission = ModulePermission {
        access: AccessLevel::None,
        actions: ActionSet::EMPTY,
    };

    /// 由访问级别推导出满足不变式的记录
    pub const fn from_level(level: AccessLevel) -> Self {
        match level {
            AccessLevel::Full => Self::FULL,
            AccessLevel::Read => Self::READ,
            AccessLevel::None => Self::NONE,
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        self.actions.allows(action)
    }

    /// 校验访问级别与操作开关是否一致
    pub fn validate(&self) -> Result<(), String> {
        let expected = Self::from_level(self.access).actions;
        if self.actions == expected {
            return Ok(());
        }
        let mismatched: Vec<&str> = Action::ALL
            .into_iter()
            .filter(|a| self.actions.allows(*a) != expected.allows(*a))
            .map(|a| a.as_str())
            .collect();
        Err(format!(
            "access {} is inconsistent with actions [{}]",
            self.access,
            mismatched.join(", ")
        ))
    }
}

impl Default for ModulePermission {
    fn default() -> Self {
        Self::NONE
    }
}
