//! 访问控制能力表
//!
//! 启动时构建一次，之后只读；可在任意并发模型下无锁共享。

use std::collections::HashMap;

use crate::error::{RbacError, RbacResult};
use crate::matrix;
use crate::module::Module;
use crate::permission::{AccessLevel, ActionSet, ModulePermission};
use crate::role::Role;

/// 能力表：Role → Module → ModulePermission
///
/// 构建时保证：
/// - 每个显式条目满足 [`ModulePermission`] 的不变式
/// - 超级用户角色对每个已知模块均为 FULL
///
/// 缺失的 (角色, 模块) 组合按 [`ModulePermission::NONE`] 处理。
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    entries: HashMap<(Role, Module), ModulePermission>,
}

impl AccessPolicy {
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::default()
    }

    /// 内置矩阵构建的能力表
    pub fn builtin() -> RbacResult<Self> {
        Self::builder().with_builtin_matrix().build()
    }

    /// 查询权限记录，缺失时返回 fail-closed 默认值
    pub fn lookup(&self, role: Role, module: Module) -> ModulePermission {
        self.entries
            .get(&(role, module))
            .copied()
            .unwrap_or(ModulePermission::NONE)
    }

    /// 按字符串键查询；未知键（含大小写不符）按 NONE 处理
    pub fn lookup_key(&self, role: Role, module: &str) -> ModulePermission {
        Module::from_key(module)
            .map(|m| self.lookup(role, m))
            .unwrap_or(ModulePermission::NONE)
    }

    /// 显式条目（不含默认值）
    pub fn entry(&self, role: Role, module: Module) -> Option<&ModulePermission> {
        self.entries.get(&(role, module))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 能力表构建器
#[derive(Debug, Clone, Default)]
pub struct AccessPolicyBuilder {
    entries: HashMap<(Role, Module), ModulePermission>,
}

impl AccessPolicyBuilder {
    /// 载入内置矩阵（会覆盖已有条目）
    pub fn with_builtin_matrix(mut self) -> Self {
        for (role, module, level) in matrix::builtin_entries() {
            self.entries
                .insert((role, module), ModulePermission::from_level(level));
        }
        self
    }

    /// 设置显式条目，不变式在 [`build`](Self::build) 时校验
    pub fn entry(mut self, role: Role, module: Module, permission: ModulePermission) -> Self {
        self.entries.insert((role, module), permission);
        self
    }

    /// 按访问级别设置条目
    pub fn level(self, role: Role, module: Module, level: AccessLevel) -> Self {
        self.entry(role, module, ModulePermission::from_level(level))
    }

    /// 以字符串键覆盖条目（配置文件来源）
    ///
    /// 未给出 `actions` 时由访问级别推导；键必须指向已知角色与模块。
    pub fn override_entry(
        self,
        role: &str,
        module: &str,
        access: &str,
        actions: Option<ActionSet>,
    ) -> RbacResult<Self> {
        let role: Role = role.parse()?;
        if module.trim().is_empty() {
            return Err(RbacError::InvalidArgument { name: "module" });
        }
        let module = Module::from_key(module).ok_or_else(|| RbacError::UnknownModule {
            value: module.to_string(),
        })?;
        let access: AccessLevel = access.parse()?;
        let permission = ModulePermission {
            access,
            actions: actions.unwrap_or_else(|| ModulePermission::from_level(access).actions),
        };
        Ok(self.entry(role, module, permission))
    }

    /// 删除条目，使其回落到默认 NONE
    pub fn remove(mut self, role: Role, module: Module) -> Self {
        self.entries.remove(&(role, module));
        self
    }

    /// 校验并冻结能力表
    pub fn build(self) -> RbacResult<AccessPolicy> {
        for (&(role, module), permission) in &self.entries {
            permission
                .validate()
                .map_err(|reason| RbacError::InvalidEntry {
                    role,
                    module,
                    reason,
                })?;
        }

        let superuser = Role::SUPERUSER;
        for module in Module::ALL {
            let access = self
                .entries
                .get(&(superuser, module))
                .map(|p| p.access)
                .unwrap_or(AccessLevel::None);
            if access != AccessLevel::Full {
                return Err(RbacError::SuperuserIncomplete {
                    role: superuser,
                    module,
                });
            }
        }

        Ok(AccessPolicy {
            entries: self.entries,
        })
    }
}
