//! rclick - An accessible right-click context menu demo built with GPUI.
//!
//! Usage: `rclick [CONFIG.json]`. The optional argument is a menu
//! configuration file; see `rclick_core::MenuConfig`.

mod app;

use std::path::Path;

use app::DemoApp;
use gpui::{
    actions, px, size, App, AppContext, Application, Bounds, KeyBinding, Size, WindowBounds,
    WindowOptions,
};
use rclick_core::logging::{init_logging, log_dir, LogConfig};
use rclick_core::MenuConfig;
use rclick_ui::{register_key_bindings, RclickTheme};

actions!(rclick, [Quit]);

fn main() {
    let log_config = LogConfig::new(log_dir());
    let _logging_guard = init_logging(log_config);

    tracing::info!("Starting rclick");

    let config = load_config();

    Application::new().run(move |cx: &mut App| {
        cx.set_global(RclickTheme::for_appearance(cx.window_appearance()));
        cx.set_global(config);

        register_key_bindings(cx);
        cx.bind_keys([KeyBinding::new("secondary-q", Quit, None)]);
        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });

        let window_size = size(px(960.0), px(640.0));
        let bounds = Bounds::centered(None, window_size, cx);

        let window_options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            window_min_size: Some(Size { width: px(320.0), height: px(240.0) }),
            focus: true,
            show: true,
            ..Default::default()
        };

        let result = cx.open_window(window_options, |window, cx| {
            // Returning false skips the platform close sequence; the window is
            // removed and the app quits here instead.
            window.on_window_should_close(cx, |window, cx| {
                window.remove_window();
                cx.quit();
                false
            });

            cx.new(|cx| DemoApp::new(window, cx))
        });
        if let Err(e) = result {
            tracing::error!(error = %e, "Failed to open window");
            cx.quit();
            return;
        }

        cx.activate(true);
    });
}

/// Load the menu configuration named on the command line, if any.
fn load_config() -> MenuConfig {
    let Some(path) = std::env::args_os().nth(1) else {
        return MenuConfig::default();
    };
    let path = Path::new(&path);
    match MenuConfig::load(path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "Loaded menu configuration");
            config
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to load menu configuration, using defaults");
            MenuConfig::default()
        }
    }
}
