//! 对象缓存层
//!
//! 缓存后端通过注册表按名称构造，目前内置 `moka` 内存缓存。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 声明缓存插件的构造函数，由 `register::register_builtin_plugins` 统一注册
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        pub const PLUGIN_NAME: &str = $name;

        pub fn constructor() -> $crate::cache::register::ObjectCacheConstructor {
            std::sync::Arc::new(|| {
                Box::pin(async {
                    let cache =
                        <$ty>::new().map_err($crate::errors::HotQuestionError::cache_connection)?;
                    Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                })
            })
        }
    };
}
