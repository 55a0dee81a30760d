use crate::cache::{
    ObjectCache,
    register::{get_object_cache_plugin, register_builtin_plugins},
};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按 `cache.type` 从注册表构造缓存，未注册时回退到 moka
async fn create_cache() -> std::result::Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    let constructor = match get_object_cache_plugin(cache_type) {
        Some(constructor) => constructor,
        None => {
            warn!("Cache backend '{}' not found, falling back to moka", cache_type);
            get_object_cache_plugin("moka").ok_or("No cache backend registered")?
        }
    };

    let cache = constructor().await?;
    warn!("Cache backend initialized ({})", cache_type);
    Ok(Arc::from(cache))
}

fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 空库时创建 admin 账号；已有用户时返回 None
async fn seed_admin_with(storage: &dyn Storage, password_hash: String) -> Result<Option<User>> {
    if storage.count_users().await? > 0 {
        return Ok(None);
    }

    let admin = storage
        .create_user(CreateUserRequest {
            username: "admin".to_string(),
            email: "admin@localhost".to_string(),
            password: password_hash,
            role: UserRole::Admin,
            display_name: Some("Administrator".to_string()),
        })
        .await?;
    Ok(Some(admin))
}

async fn seed_admin(storage: &dyn Storage) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} user(s), skipping admin seed", count);
            return;
        }
        Ok(_) => info!("No users found in database, creating default admin account..."),
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 优先使用 ADMIN_PASSWORD，否则生成并打印一次
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN_PASSWORD not set, generated admin password: {}", pwd);
        warn!("  Save it now, it will not be shown again");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    match seed_admin_with(storage, password_hash).await {
        Ok(Some(user)) => info!("Default admin account created (ID: {})", user.id),
        Ok(None) => debug!("Admin seed skipped, users already exist"),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 启动前准备：存储与迁移、默认管理员、缓存
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    register_builtin_plugins();
    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(storage.as_ref()).await;

    // 创建缓存实例
    let cache = create_cache().await.expect("Failed to create cache");

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::storage;

    #[tokio::test]
    async fn test_admin_seeded_only_once() {
        let storage = storage().await;

        let admin = seed_admin_with(storage.as_ref(), "hash".to_string())
            .await
            .expect("seed")
            .expect("admin created");
        assert_eq!(admin.role, UserRole::Admin);

        let again = seed_admin_with(storage.as_ref(), "hash".to_string())
            .await
            .expect("seed");
        assert!(again.is_none());
    }

    #[test]
    fn test_generated_password_length() {
        assert_eq!(generate_random_password(16).chars().count(), 16);
    }
}
