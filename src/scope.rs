//! 请求作用域
//!
//! 每个视图持有一个 [`RequestScope`]，视图发出的请求都绑定到该作用域。
//! 视图销毁时调用 [`RequestScope::cancel`]，挂起的请求被中止，其完成回调不再执行。

use futures::future::{AbortHandle, Abortable};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Default)]
struct ScopeInner {
    cancelled: AtomicBool,
    handles: Mutex<HashMap<Uuid, AbortHandle>>,
}

/// 单个请求在作用域中的登记；请求结束（完成、中止或被丢弃）时注销
struct Registration<'a> {
    inner: &'a ScopeInner,
    key: Uuid,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        if let Ok(mut handles) = self.inner.handles.lock() {
            handles.remove(&self.key);
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestScope {
    id: Uuid,
    inner: Arc<ScopeInner>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            inner: Arc::new(ScopeInner::default()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// 当前挂起的请求数
    pub fn pending(&self) -> usize {
        self.inner.handles.lock().map(|h| h.len()).unwrap_or(0)
    }

    /// 在作用域内执行 future
    ///
    /// 返回 `None` 表示作用域已取消，结果应被丢弃。
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.is_cancelled() {
            return None;
        }

        let (handle, abort_reg) = AbortHandle::new_pair();
        let key = Uuid::new_v4();
        if let Ok(mut handles) = self.inner.handles.lock() {
            handles.insert(key, handle);
        }
        let _registration = Registration {
            inner: &self.inner,
            key,
        };

        let output = Abortable::new(fut, abort_reg).await.ok();
        // 完成与取消之间没有让出点，这里再检查一次
        output.filter(|_| !self.is_cancelled())
    }

    /// 取消所有挂起的请求；之后提交的请求也会立即被丢弃
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        let pending = self
            .inner
            .handles
            .lock()
            .map(|mut handles| std::mem::take(&mut *handles))
            .unwrap_or_default();
        log::debug!("[Scope {}] 取消 {} 个挂起请求", self.id, pending.len());
        for handle in pending.into_values() {
            handle.abort();
        }
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}
