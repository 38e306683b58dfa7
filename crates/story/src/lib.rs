mod progress_fill_story;

use gpui::{App, Bounds, Entity, Render, SharedString, WindowBounds, WindowOptions, px, size};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

pub use progress_fill_story::ProgressFillStory;

pub fn init(_: &mut App) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("progress_fill=debug")),
        )
        .init();
}

pub fn create_new_window<F, V>(title: &str, crate_view_fn: F, cx: &mut App)
where
    V: Render,
    F: FnOnce(&mut App) -> Entity<V> + 'static,
{
    let mut window_size = size(px(640.), px(420.));
    if let Some(display) = cx.primary_display() {
        let display_size = display.bounds().size;
        window_size.width = window_size.width.min(display_size.width * 0.85);
        window_size.height = window_size.height.min(display_size.height * 0.85);
    }

    let window_bounds = Bounds::centered(None, window_size, cx);
    let title = SharedString::from(title.to_string());

    cx.spawn(async move |cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(window_bounds)),
            ..Default::default()
        };

        let window = cx.open_window(options, |_, cx| crate_view_fn(cx))?;
        window.update(cx, |_, window, _| {
            window.activate_window();
            window.set_window_title(&title);
        })?;

        Ok::<_, anyhow::Error>(())
    })
    .detach();
}
