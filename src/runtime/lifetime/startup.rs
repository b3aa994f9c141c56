use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::{BackendClient, HttpTransport};
use crate::cache::{MembershipCache, StagingCache};
use crate::config::AppConfig;
use crate::errors::Result;

pub struct StartupContext {
    pub client: BackendClient,
    pub staging: StagingCache,
    pub membership: MembershipCache,
}

/// 准备服务器启动的上下文
/// 包括上游客户端与暂存缓存
pub fn prepare_server_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    let transport = HttpTransport::new(&config.backend)?;
    if config.backend.api_token.is_empty() {
        warn!("backend.api_token is empty, upstream requests are sent without authorization");
    }
    if config.backend.institution_id.is_empty() {
        warn!("backend.institution_id is empty, created users will carry no institution");
    }
    let client = BackendClient::new(Arc::new(transport), config.backend.institution_id.clone());
    warn!("Backend client targeting {}", config.backend.base_url);

    let staging = StagingCache::from_config(&config.staging);
    let membership = MembershipCache::from_config(&config.staging);
    debug!(
        "Staging caches ready: max {} entries, idle ttl {}s",
        config.staging.max_sessions, config.staging.idle_ttl_secs
    );

    Ok(StartupContext {
        client,
        staging,
        membership,
    })
}
