//! LocalStorage 封装模块
//!
//! 令牌按原始字符串保存，因此直接使用 `gloo_storage` 暴露的原生 `Storage`，
//! 不经过其 JSON 编解码。

use checkin::KeyValueStore;
use gloo_storage::Storage;

/// 浏览器 LocalStorage 存储
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        gloo_storage::LocalStorage::raw().get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        gloo_storage::LocalStorage::raw()
            .set_item(key, value)
            .is_ok()
    }

    fn delete(&self, key: &str) -> bool {
        gloo_storage::LocalStorage::raw().remove_item(key).is_ok()
    }
}
