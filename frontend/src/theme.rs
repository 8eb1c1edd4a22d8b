//! 主题切换
//!
//! 明/暗两档，持久化在 LocalStorage 的 `theme` 键下；生效方式是往
//! `<html>` 根元素写 `data-theme` 属性，样式层据此换肤。

use std::rc::Rc;

use leptos::prelude::*;

use crate::web::KeyValueStore;

const STORAGE_THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn parse(value: &str) -> Self {
        match value {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// 主题上下文
#[derive(Clone, Copy)]
pub struct ThemeContext {
    theme: RwSignal<Theme>,
}

impl ThemeContext {
    pub fn theme(&self) -> RwSignal<Theme> {
        self.theme
    }

    pub fn is_dark(&self) -> Signal<bool> {
        let theme = self.theme;
        Signal::derive(move || theme.get() == Theme::Dark)
    }

    pub fn toggle(&self) {
        self.theme.update(|t| *t = t.flipped());
    }
}

/// 提供主题上下文：恢复持久化的选择并挂接 DOM/存储副作用
pub fn provide_theme(store: Rc<dyn KeyValueStore>) -> ThemeContext {
    let initial = store
        .get(STORAGE_THEME_KEY)
        .map(|v| Theme::parse(&v))
        .unwrap_or_default();
    let theme = RwSignal::new(initial);

    Effect::new(move |_| {
        let current = theme.get();
        store.set(STORAGE_THEME_KEY, current.as_str());
        if let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        {
            let _ = root.set_attribute("data-theme", current.as_str());
        }
    });

    let ctx = ThemeContext { theme };
    provide_context(ctx);
    ctx
}

/// 从 Context 获取主题上下文
pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>().expect("ThemeContext should be provided")
}
