use anyhow::Context as _;
use progress_fill::ProgressFillSettings;
use progress_fill_story::{ProgressFillStory, create_new_window, init};

fn main() -> anyhow::Result<()> {
    // Parse `cargo run -- <settings.json>`
    let settings = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings file: {}", path))?;
            ProgressFillSettings::from_json(&json)?
        }
        None => ProgressFillSettings::default(),
    };

    let app = gpui_platform::application();
    app.run(move |cx| {
        init(cx);
        cx.activate(true);

        create_new_window(
            ProgressFillStory::title(),
            move |cx| ProgressFillStory::view(settings, cx),
            cx,
        );
    });

    Ok(())
}
