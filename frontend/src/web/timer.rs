//! 定时器封装模块
//!
//! 封装 `setTimeout` API，供 toast 自动消失使用。

use wasm_bindgen::prelude::*;

/// 一次性定时器
///
/// 当 `Timeout` 被 drop 时，自动取消尚未触发的回调。
pub struct Timeout {
    handle: i32,
    #[allow(dead_code)]
    closure: Closure<dyn Fn()>,
}

impl Timeout {
    /// 创建一次性定时器
    ///
    /// # Panics
    /// 如果无法获取 window 对象或设置定时器失败
    pub fn new<F>(millis: u32, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        let closure = Closure::new(callback);
        let window = web_sys::window().expect("no window object");

        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis as i32,
            )
            .expect("failed to set timeout");

        Self { handle, closure }
    }

    pub fn cancel(&self) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }

    /// 放弃取消权，让回调必然触发
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}
