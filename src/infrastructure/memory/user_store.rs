//! In-Memory User Store Implementation

use parking_lot::Mutex;
use std::sync::Arc;

use crate::application::ports::{UserStoreError, UserStorePort};
use crate::domain::{NewUser, User, UserId, UserPatch};

/// 内存用户存储
///
/// 有序集合，生命周期与进程相同，不跨重启持久化
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    /// 带三条初始记录的存储
    pub fn seeded() -> Self {
        Self::new(vec![
            User {
                id: 1,
                name: "Leanne Graham".to_string(),
                email: "grahamleanne@mail.com".to_string(),
            },
            User {
                id: 2,
                name: "Ervin Howell".to_string(),
                email: "howellervin@mail.com".to_string(),
            },
            User {
                id: 3,
                name: "Clementine Brown".to_string(),
                email: "brownclementine@mail.com".to_string(),
            },
        ])
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl UserStorePort for InMemoryUserStore {
    fn find_all(&self) -> Vec<User> {
        self.users.lock().clone()
    }

    fn find_one(&self, id: UserId) -> Result<User, UserStoreError> {
        self.users
            .lock()
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(UserStoreError::NotFound(id))
    }

    fn create(&self, input: NewUser) -> User {
        let mut users = self.users.lock();
        // 空集合从 1 开始编号
        let next_id = users.iter().map(|user| user.id).max().unwrap_or(0) + 1;
        let user = User::from_new(next_id, input);
        users.push(user.clone());
        tracing::debug!(user_id = next_id, "User created");
        user
    }

    fn update(&self, id: UserId, patch: UserPatch) -> Result<User, UserStoreError> {
        let mut users = self.users.lock();
        let slot = users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or(UserStoreError::NotFound(id))?;
        *slot = slot.merged(patch);
        tracing::debug!(user_id = id, "User updated");
        Ok(slot.clone())
    }

    fn delete(&self, id: UserId) -> Result<User, UserStoreError> {
        let mut users = self.users.lock();
        let position = users
            .iter()
            .position(|user| user.id == id)
            .ok_or(UserStoreError::NotFound(id))?;
        let removed = users.remove(position);
        tracing::debug!(user_id = id, "User deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_seeded_store_has_three_users() {
        let store = InMemoryUserStore::seeded();
        let users = store.find_all();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].name, "Leanne Graham");
        assert_eq!(users[2].id, 3);
    }

    #[test]
    fn test_create_assigns_next_id() {
        let store = InMemoryUserStore::seeded();
        let created = store.create(new_user("X", "x@x.com"));

        assert_eq!(
            created,
            User {
                id: 4,
                name: "X".to_string(),
                email: "x@x.com".to_string(),
            }
        );
        assert_eq!(store.find_all().len(), 4);
    }

    #[test]
    fn test_create_uses_max_id_not_length() {
        let store = InMemoryUserStore::seeded();
        store.delete(2).unwrap();
        let created = store.create(new_user("Y", "y@y.com"));
        assert_eq!(created.id, 4);
    }

    #[test]
    fn test_create_on_empty_store_starts_at_one() {
        let store = InMemoryUserStore::new(Vec::new());
        let created = store.create(new_user("First", "first@mail.com"));
        assert_eq!(created.id, 1);
    }

    #[test]
    fn test_find_one_missing_is_not_found() {
        let store = InMemoryUserStore::seeded();
        assert_eq!(store.find_one(99), Err(UserStoreError::NotFound(99)));
    }

    #[test]
    fn test_find_one_is_idempotent() {
        let store = InMemoryUserStore::seeded();
        let first = store.find_one(2).unwrap();
        let second = store.find_one(2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_find_all_returns_a_copy() {
        let store = InMemoryUserStore::seeded();
        let mut snapshot = store.find_all();
        snapshot.clear();
        assert_eq!(store.find_all().len(), 3);
    }

    #[test]
    fn test_update_merges_fields() {
        let store = InMemoryUserStore::seeded();
        let patch = UserPatch {
            name: None,
            email: Some("ervin@mail.com".to_string()),
        };

        let updated = store.update(2, patch).unwrap();
        assert_eq!(updated.name, "Ervin Howell");
        assert_eq!(updated.email, "ervin@mail.com");
        assert_eq!(store.find_one(2).unwrap(), updated);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = InMemoryUserStore::seeded();
        let result = store.update(42, UserPatch::default());
        assert_eq!(result, Err(UserStoreError::NotFound(42)));
        assert_eq!(store.find_all().len(), 3);
    }

    #[test]
    fn test_delete_returns_removed_user() {
        let store = InMemoryUserStore::seeded();
        let removed = store.delete(2).unwrap();

        assert_eq!(removed.id, 2);
        assert_eq!(removed.name, "Ervin Howell");
        assert_eq!(store.find_all().len(), 2);
        assert!(store.find_one(2).is_err());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let store = InMemoryUserStore::seeded();
        assert_eq!(store.delete(99), Err(UserStoreError::NotFound(99)));
    }

    #[test]
    fn test_concurrent_creates_get_unique_ids() {
        let store = InMemoryUserStore::seeded().arc();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store.create(new_user(&format!("u{}", i), "u@mail.com")).id
                })
            })
            .collect();

        let mut ids: Vec<UserId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (4..12).collect::<Vec<_>>());
    }
}
