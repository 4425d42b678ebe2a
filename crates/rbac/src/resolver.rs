//! 权限判定
//!
//! 全部为纯函数：无 I/O、无隐藏状态，相同输入永远得到相同结果。
//!
//! 模块参数以字符串键传入（与路由、导航路径一致）：
//! - 空键或纯空白键是编程错误，返回 [`RbacError::InvalidArgument`]
//! - 未知键（含大小写不符）是合法输入，按 NONE 判定

use std::sync::Arc;

use http::Method;

use crate::authorizer::action_for_method;
use crate::error::{RbacError, RbacResult};
use crate::module::{Category, Module};
use crate::permission::{AccessLevel, Action, ModulePermission};
use crate::policy::AccessPolicy;
use crate::presenter::{self, AccessIndicator, NavigationResult, PermissionCheck};
use crate::role::Role;

/// 可参与导航过滤的条目
pub trait NavigationItem {
    /// 条目对应的模块键
    fn module_key(&self) -> &str;
}

impl NavigationItem for &str {
    fn module_key(&self) -> &str {
        self
    }
}

impl NavigationItem for String {
    fn module_key(&self) -> &str {
        self.as_str()
    }
}

impl NavigationItem for Module {
    fn module_key(&self) -> &str {
        self.as_str()
    }
}

/// 权限判定器
///
/// 持有注入的只读能力表，克隆开销仅为一次 `Arc` 计数。
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    policy: Arc<AccessPolicy>,
}

impl PermissionResolver {
    pub fn new(policy: Arc<AccessPolicy>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    fn lookup(&self, role: Role, module: &str) -> RbacResult<ModulePermission> {
        ensure_module_key(module)?;
        Ok(self.policy.lookup_key(role, module))
    }

    /// 是否至少具备 `required` 级别的访问权限
    ///
    /// `required = NONE` 恒为 true，仅作存在性探测。
    pub fn has_module_access(
        &self,
        role: Role,
        module: &str,
        required: AccessLevel,
    ) -> RbacResult<bool> {
        let permission = self.lookup(role, module)?;
        Ok(match required {
            AccessLevel::None => true,
            AccessLevel::Read => permission.access != AccessLevel::None,
            AccessLevel::Full => permission.access == AccessLevel::Full,
        })
    }

    /// 至少只读（READ 或 FULL）
    pub fn has_read_access(&self, role: Role, module: &str) -> RbacResult<bool> {
        self.has_module_access(role, module, AccessLevel::Read)
    }

    pub fn has_full_access(&self, role: Role, module: &str) -> RbacResult<bool> {
        self.has_module_access(role, module, AccessLevel::Full)
    }

    /// 恰好为只读（FULL 不算）
    pub fn has_read_only_access(&self, role: Role, module: &str) -> RbacResult<bool> {
        Ok(self.lookup(role, module)?.access == AccessLevel::Read)
    }

    pub fn has_no_access(&self, role: Role, module: &str) -> RbacResult<bool> {
        Ok(self.lookup(role, module)?.access == AccessLevel::None)
    }

    pub fn can_perform_action(&self, role: Role, module: &str, action: Action) -> RbacResult<bool> {
        Ok(self.lookup(role, module)?.allows(action))
    }

    /// 权限检查，拒绝时附带可直接展示的提示
    pub fn check_permission(
        &self,
        role: Role,
        module: &str,
        action: Action,
    ) -> RbacResult<PermissionCheck> {
        if self.can_perform_action(role, module, action)? {
            Ok(PermissionCheck::granted(action, module))
        } else {
            Ok(PermissionCheck::denied(action, module))
        }
    }

    /// 按 HTTP 动词检查；无法映射的动词一律拒绝
    pub fn has_http_permission(&self, role: Role, module: &str, method: &Method) -> RbacResult<bool> {
        match action_for_method(method) {
            Some(action) => self.can_perform_action(role, module, action),
            None => {
                ensure_module_key(module)?;
                Ok(false)
            }
        }
    }

    /// 显式权限条目；未知模块或缺失条目返回 `None`
    pub fn get_module_permission(
        &self,
        role: Role,
        module: &str,
    ) -> RbacResult<Option<ModulePermission>> {
        ensure_module_key(module)?;
        Ok(Module::from_key(module).and_then(|m| self.policy.entry(role, m).copied()))
    }

    pub fn get_module_access(&self, role: Role, module: &str) -> RbacResult<AccessLevel> {
        Ok(self.lookup(role, module)?.access)
    }

    /// 角色至少可读的全部模块（按模块声明顺序）
    pub fn get_accessible_modules(&self, role: Role) -> Vec<Module> {
        Module::ALL
            .into_iter()
            .filter(|m| self.policy.lookup(role, *m).access != AccessLevel::None)
            .collect()
    }

    pub fn get_access_level_indicator(
        &self,
        role: Role,
        module: &str,
    ) -> RbacResult<AccessIndicator> {
        Ok(AccessIndicator::for_level(self.get_module_access(role, module)?))
    }

    /// 导航校验：取路径第一段作为模块键，根路径始终允许
    pub fn validate_navigation(&self, role: Role, path: &str) -> NavigationResult {
        let Some(module) = path.split('/').find(|segment| !segment.is_empty()) else {
            return NavigationResult::allow();
        };

        if self.policy.lookup_key(role, module).access != AccessLevel::None {
            NavigationResult::allow()
        } else {
            NavigationResult::deny(presenter::navigation_denied_reason(role, module))
        }
    }

    /// 过滤出角色至少可读的导航条目；键为空的条目被丢弃
    pub fn filter_navigation<T, I>(&self, role: Role, items: I) -> Vec<T>
    where
        T: NavigationItem,
        I: IntoIterator<Item = T>,
    {
        items
            .into_iter()
            .filter(|item| matches!(self.has_read_access(role, item.module_key()), Ok(true)))
            .collect()
    }

    /// 门户分类访问级别（取同名模块）
    pub fn category_access(&self, role: Role, category: Category) -> AccessLevel {
        self.policy.lookup(role, category.module()).access
    }
}

fn ensure_module_key(module: &str) -> RbacResult<()> {
    if module.trim().is_empty() {
        return Err(RbacError::InvalidArgument { name: "module" });
    }
    Ok(())
}
