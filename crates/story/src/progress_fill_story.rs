use gpui::{
    App, AppContext, Context, Div, Entity, InteractiveElement as _, IntoElement, ParentElement,
    Render, SharedString, Stateful, StatefulInteractiveElement as _, Styled, Window, div, px, rgb,
    size,
};
use progress_fill::{Completion, ProgressFillSettings, ProgressFillView, TextMode};

const MAX_STEPS: u32 = 10;

pub struct ProgressFillStory {
    loading_bar: Entity<ProgressFillView>,
    steps_bar: Entity<ProgressFillView>,
    step: u32,
}

impl ProgressFillStory {
    pub fn title() -> &'static str {
        "Progress Fill"
    }

    pub fn description() -> &'static str {
        "An animated progress bar fill, the label shows a percentage or the current/max value."
    }

    pub fn view(settings: ProgressFillSettings, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| Self::new(settings, cx))
    }

    fn new(settings: ProgressFillSettings, cx: &mut Context<Self>) -> Self {
        let bar_size = size(px(320.), px(8.));
        let loading_bar = cx.new(|_| {
            ProgressFillView::new(
                bar_size,
                ProgressFillSettings {
                    text_mode: TextMode::Percent,
                    ..settings.clone()
                },
            )
            .with_label()
        });
        let steps_bar = cx.new(|_| {
            ProgressFillView::new(
                bar_size,
                ProgressFillSettings {
                    text_mode: TextMode::Value,
                    ..settings
                },
            )
            .with_label()
            .color(rgb(0x22c55e))
        });

        Self {
            loading_bar,
            steps_bar,
            step: 0,
        }
    }

    /// Fill the loading bar, then step the value bar once it is full.
    fn load(&mut self, duration: f32, window: &mut Window, cx: &mut Context<Self>) {
        let story = cx.entity().downgrade();
        self.loading_bar.update(cx, |bar, cx| {
            bar.fill_over_time(
                duration,
                move |completion: Completion, window: &mut Window, cx: &mut App| {
                    tracing::info!(?completion, duration, "loading fill ended");
                    if completion == Completion::Finished {
                        story
                            .update(cx, |story, cx| story.next_step(window, cx))
                            .ok();
                    }
                },
                window,
                cx,
            );
        });
    }

    fn next_step(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.step = self.step % MAX_STEPS + 1;
        let step = self.step as f32;
        self.steps_bar.update(cx, |bar, cx| {
            bar.update_fill(step, MAX_STEPS as f32, None, |_, _, _| {}, window, cx);
        });
    }
}

fn button(id: &'static str, label: impl Into<SharedString>) -> Stateful<Div> {
    div()
        .id(id)
        .px_3()
        .py_1()
        .rounded_md()
        .bg(rgb(0xe5e7eb))
        .hover(|this| this.bg(rgb(0xd1d5db)))
        .cursor_pointer()
        .text_sm()
        .child(label.into())
}

fn section(title: &'static str) -> Div {
    div()
        .flex()
        .flex_col()
        .gap_3()
        .p_4()
        .rounded_md()
        .border_1()
        .border_color(rgb(0xe5e7eb))
        .child(div().text_sm().text_color(rgb(0x6b7280)).child(title))
}

impl Render for ProgressFillStory {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .flex()
            .flex_col()
            .size_full()
            .gap_4()
            .p_6()
            .bg(rgb(0xffffff))
            .text_color(rgb(0x111827))
            .child(div().text_xl().child(Self::title()))
            .child(div().text_sm().child(Self::description()))
            .child(
                section("Fill over time")
                    .child(self.loading_bar.clone())
                    .child(
                        div()
                            .flex()
                            .flex_row()
                            .gap_2()
                            .child(button("load-1s", "1s").on_click(cx.listener(
                                |this, _, window, cx| {
                                    this.load(1., window, cx);
                                },
                            )))
                            .child(button("load-3s", "3s").on_click(cx.listener(
                                |this, _, window, cx| {
                                    this.load(3., window, cx);
                                },
                            )))
                            .child(button("load-now", "Now").on_click(cx.listener(
                                |this, _, window, cx| {
                                    this.load(0., window, cx);
                                },
                            ))),
                    ),
            )
            .child(
                section("Update fill")
                    .child(self.steps_bar.clone())
                    .child(
                        div().flex().flex_row().gap_2().child(
                            button("next-step", "Next step").on_click(cx.listener(
                                |this, _, window, cx| {
                                    this.next_step(window, cx);
                                },
                            )),
                        ),
                    ),
            )
    }
}
