//! 全局提示条 (Toast)
//!
//! 操作成功/失败的短时反馈。推入后定时自动消失，也可点击关闭。

use leptos::prelude::*;

use crate::web::Timeout;

/// 自动消失时间
const TOAST_DURATION_MS: u32 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// 提示条上下文
#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u64>,
}

impl ToastContext {
    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.toasts.update(|list| list.push(Toast { id, kind, message }));

        // 到时自动移除；监听器闭包交给浏览器持有
        let toasts = self.toasts;
        Timeout::new(TOAST_DURATION_MS, move || {
            toasts.update(|list| list.retain(|t| t.id != id));
        })
        .forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }
}

/// 提供提示条上下文
pub fn provide_toasts() -> ToastContext {
    let ctx = ToastContext {
        toasts: RwSignal::new(Vec::new()),
        next_id: RwSignal::new(0),
    };
    provide_context(ctx);
    ctx
}

/// 从 Context 获取提示条上下文
pub fn use_toasts() -> ToastContext {
    use_context::<ToastContext>().expect("ToastContext should be provided")
}

/// 提示条渲染宿主，置于 App 根部
#[component]
pub fn ToastHost() -> impl IntoView {
    let ctx = use_toasts();
    let toasts = ctx.toasts;

    view! {
        <div class="toast toast-end z-50">
            <For each=move || toasts.get() key=|t| t.id let:toast>
                {
                    let alert_class = match toast.kind {
                        ToastKind::Success => "alert alert-success shadow-lg",
                        ToastKind::Error => "alert alert-error shadow-lg",
                    };
                    let id = toast.id;
                    view! {
                        <div role="alert" class=alert_class>
                            <span>{toast.message.clone()}</span>
                            <button
                                class="btn btn-ghost btn-xs"
                                on:click=move |_| ctx.dismiss(id)
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            </For>
        </div>
    }
}
