//! bgu-rbac - 访问控制核心库
//!
//! 角色 × 模块 × 访问级别 × 操作 的静态能力矩阵、纯函数式权限判定，
//! 以及每个受保护接口在执行任何操作之前调用的请求授权闸门。
//!
//! 分层（由内向外）:
//! - [`AccessPolicy`]: 进程级只读能力表，启动时构建并校验
//! - [`PermissionResolver`]: 基于能力表的无状态判定函数
//! - [`RequestAuthorizer`]: 认证 + 动词映射 + 权限判定，输出单一决策
//! - [`presenter`]: 拒绝原因与 UI 访问指示器

pub mod authorizer;
pub mod error;
pub mod identity;
pub mod matrix;
pub mod module;
pub mod permission;
pub mod policy;
pub mod presenter;
pub mod resolver;
pub mod role;

pub use authorizer::{AuthorizationDecision, RequestAuthorizer, action_for_method};
pub use error::{RbacError, RbacResult};
pub use identity::{AuthenticationError, Authenticator, Credential, SessionUser};
pub use module::{Category, Module};
pub use permission::{AccessLevel, Action, ActionSet, ModulePermission};
pub use policy::{AccessPolicy, AccessPolicyBuilder};
pub use presenter::{AccessIndicator, IndicatorColor, IndicatorLevel, NavigationResult, PermissionCheck};
pub use resolver::{NavigationItem, PermissionResolver};
pub use role::Role;
