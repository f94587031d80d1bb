//! User Entity
//!
//! 进程内用户记录，id 由 Data-Access Unit 生成

use serde::{Deserialize, Serialize};

/// 用户 ID
pub type UserId = i64;

/// 用户实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// 创建用户输入
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// 用户部分更新输入（出现的字段覆盖原值）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    pub fn from_new(id: UserId, input: NewUser) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
        }
    }

    /// 浅合并：patch 中存在的字段胜出
    pub fn merged(&self, patch: UserPatch) -> Self {
        Self {
            id: self.id,
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            email: patch.email.unwrap_or_else(|| self.email.clone()),
        }
    }
}
