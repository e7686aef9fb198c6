//! Demo root component: a canvas with a right-click menu.

use gpui::{div, prelude::*, Context, Entity, IntoElement, Render, SharedString, Subscription, Window};
use rclick_core::{parse_menu, MenuItem};
use rclick_ui::{IconName, RclickTheme, RightClick, RightClickEvent};

/// Menu shown by the demo, in the declarative form hosts load from JSON.
const DEMO_MENU: &str = r#"[
    {"label": "Cut", "icon": "cut", "shortcut": "Ctrl+X"},
    {"label": "Copy", "icon": "copy", "shortcut": "Ctrl+C"},
    {"label": "Paste", "icon": "paste", "shortcut": "Ctrl+V", "disabled": true},
    {"type": "divider"},
    {"label": "Refresh", "id": "refresh", "icon": "refresh"},
    {"label": "Delete", "icon": "trash", "danger": true}
]"#;

fn demo_items() -> Vec<MenuItem<IconName>> {
    match parse_menu(DEMO_MENU) {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse demo menu");
            Vec::new()
        }
    }
}

/// Area the menu is attached to. Shows the last chosen action.
struct Canvas {
    last_action: Option<SharedString>,
}

impl Render for Canvas {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<RclickTheme>();
        let message = match &self.last_action {
            Some(label) => SharedString::from(format!("Last action: {label}")),
            None => SharedString::from("Right-click anywhere"),
        };

        div()
            .size_full()
            .flex()
            .items_center()
            .justify_center()
            .text_color(theme.colors.text_muted)
            .child(message)
    }
}

/// Root application component that manages the main window.
pub struct DemoApp {
    right_click: Entity<RightClick>,
    canvas: Entity<Canvas>,
    _subscription: Subscription,
}

impl DemoApp {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let canvas = cx.new(|_| Canvas { last_action: None });
        let content = canvas.clone();
        let right_click = cx.new(|cx| RightClick::new(demo_items(), window, cx).content(content));
        let subscription = cx.subscribe(&right_click, Self::handle_right_click_event);

        Self { right_click, canvas, _subscription: subscription }
    }

    fn handle_right_click_event(
        &mut self,
        _right_click: Entity<RightClick>,
        event: &RightClickEvent,
        cx: &mut Context<Self>,
    ) {
        match event {
            RightClickEvent::Selected(action) => {
                tracing::info!(key = action.key(), item = %action.to_value(), "Menu action chosen");
                let label = SharedString::from(action.label.clone());
                self.canvas.update(cx, |canvas, cx| {
                    canvas.last_action = Some(label);
                    cx.notify();
                });
            }
            RightClickEvent::Opened => tracing::trace!("Demo menu opened"),
            RightClickEvent::Closed => tracing::trace!("Demo menu closed"),
        }
    }
}

impl Render for DemoApp {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<RclickTheme>();
        let colors = &theme.colors;

        div()
            .flex()
            .flex_col()
            .size_full()
            .bg(colors.background)
            .text_color(colors.text)
            .child(self.right_click.clone())
    }
}
