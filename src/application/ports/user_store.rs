//! User Store Port - 用户 Data-Access Unit
//!
//! 同步接口，具体实现在 infrastructure/memory 层

use thiserror::Error;

use crate::domain::{NewUser, User, UserId, UserPatch};

/// User Store 错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserStoreError {
    #[error("User not found: {0}")]
    NotFound(UserId),
}

/// User Store Port
///
/// 所有读改写序列必须在实现内部互斥
pub trait UserStorePort: Send + Sync {
    /// 获取全部用户（拷贝）
    fn find_all(&self) -> Vec<User>;

    /// 根据 ID 查找用户
    fn find_one(&self, id: UserId) -> Result<User, UserStoreError>;

    /// 创建用户，id = 当前最大 id + 1
    fn create(&self, input: NewUser) -> User;

    /// 部分更新用户
    fn update(&self, id: UserId, patch: UserPatch) -> Result<User, UserStoreError>;

    /// 删除用户，返回删除前的记录
    fn delete(&self, id: UserId) -> Result<User, UserStoreError>;
}
