use moka::future::Cache;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::StagingConfig;
use crate::import::PreviewStore;
use crate::models::imports::entities::ImportTarget;
use crate::reconcile::MembershipPlan;

/// 导入暂存键：(控制台会话, 导入目标)，不同目标互不影响
pub type StagingKey = (String, ImportTarget);

/// 成员计划键：(控制台会话, 课程 ID)
pub type MembershipKey = (String, String);

pub type StagingCache = SessionCache<StagingKey, PreviewStore>;
pub type MembershipCache = SessionCache<MembershipKey, MembershipPlan>;

/// 基于 moka 的会话暂存，空闲超时后自动回收
///
/// 值包在异步互斥锁中，同一条目上的修改串行执行。
pub struct SessionCache<K, V> {
    inner: Cache<K, Arc<Mutex<V>>>,
}

impl<K, V> Clone for SessionCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> SessionCache<K, V>
where
    K: Hash + Eq + Send + Sync + std::fmt::Debug + 'static,
    V: Send + 'static,
{
    pub fn new(max_capacity: u64, idle_ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_idle(idle_ttl)
            .build();
        Self { inner }
    }

    pub fn from_config(config: &StagingConfig) -> Self {
        debug!(
            "Session cache initialized with max capacity: {}, idle ttl: {}s",
            config.max_sessions, config.idle_ttl_secs
        );
        Self::new(
            config.max_sessions,
            Duration::from_secs(config.idle_ttl_secs),
        )
    }

    pub async fn get(&self, key: &K) -> Option<Arc<Mutex<V>>> {
        self.inner.get(key).await
    }

    /// 取出条目，不存在时用 `init` 创建
    pub async fn get_or_insert_with<F>(&self, key: K, init: F) -> Arc<Mutex<V>>
    where
        F: FnOnce() -> V,
    {
        self.inner
            .get_with(key, async move { Arc::new(Mutex::new(init())) })
            .await
    }

    pub async fn remove(&self, key: &K) {
        debug!("Dropping staged entry {:?}", key);
        self.inner.invalidate(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_targets_are_isolated() {
        let cache: StagingCache = SessionCache::new(16, Duration::from_secs(60));
        let session = "s-1".to_string();

        let teachers = cache
            .get_or_insert_with((session.clone(), ImportTarget::Teachers), || {
                PreviewStore::new(ImportTarget::Teachers)
            })
            .await;
        teachers
            .lock()
            .await
            .load(&[vec!["t@x.com".to_string()]], None, None);

        let students = cache
            .get_or_insert_with((session.clone(), ImportTarget::Students), || {
                PreviewStore::new(ImportTarget::Students)
            })
            .await;
        assert!(students.lock().await.is_empty());

        let again = cache
            .get(&(session, ImportTarget::Teachers))
            .await
            .unwrap();
        assert_eq!(again.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_discards_entry() {
        let cache: MembershipCache = SessionCache::new(16, Duration::from_secs(60));
        let key = ("s-1".to_string(), "c1".to_string());
        cache
            .get_or_insert_with(key.clone(), || MembershipPlan::new("c1"))
            .await;
        assert!(cache.get(&key).await.is_some());
        cache.remove(&key).await;
        assert!(cache.get(&key).await.is_none());
    }
}
