use std::{cell::RefCell, ops::ControlFlow, rc::Rc};

use gpui::{
    App, Context, Hsla, IntoElement, ParentElement, Pixels, Render, SharedString, Size, Styled,
    Task, Window, div, prelude::FluentBuilder as _, rgb, size,
};

use super::{FillTick, ProgressFill};
use crate::{Completion, FillBox, FillRegion, FillText, ProgressFillSettings, SizeExt as _};

type SharedFill = Rc<RefCell<FillBox>>;
type ViewOnComplete = Box<dyn FnOnce(Completion, &mut Window, &mut App)>;

/// A progress bar view, the fill is animated by [`ProgressFill`].
///
/// Frames are driven by a timer task on the GPUI executor. Starting a new
/// fill replaces the task, so the last call wins.
///
/// Completion callbacks run outside of the view update, so they may start
/// the next fill on this view.
pub struct ProgressFillView {
    fill: ProgressFill<SharedFill>,
    region: SharedFill,
    label: Option<Rc<RefCell<FillText>>>,
    settings: ProgressFillSettings,
    color: Option<Hsla>,
    on_complete: Option<ViewOnComplete>,
    _frame_loop: Option<Task<()>>,
}

impl ProgressFillView {
    /// Create a new progress bar of `bar_size`, the bar starts empty.
    pub fn new(bar_size: Size<Pixels>, settings: ProgressFillSettings) -> Self {
        let bar_size = bar_size.convert();
        let region = Rc::new(RefCell::new(FillBox::new(bar_size.width, bar_size.height)));
        let fill = ProgressFill::new(region.clone()).text_mode(settings.text_mode);
        region.borrow_mut().set_width(0.);

        Self {
            fill,
            region,
            label: None,
            settings,
            color: None,
            on_complete: None,
            _frame_loop: None,
        }
    }

    /// Show the progress text next to the bar.
    pub fn with_label(mut self) -> Self {
        let label = Rc::new(RefCell::new(FillText::default()));
        self.fill = self.fill.label(label.clone());
        self.label = Some(label);
        self
    }

    /// Set the color of the progress bar.
    pub fn color(mut self, color: impl Into<Hsla>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_animating(&self) -> bool {
        self.fill.is_animating()
    }

    /// The live fill width.
    pub fn width(&self) -> f32 {
        self.fill.width()
    }

    /// The current label text, `None` without label.
    pub fn text(&self) -> Option<SharedString> {
        self.label
            .as_ref()
            .map(|label| label.borrow().text().clone())
    }

    /// Fill the bar from empty to full over `duration` seconds.
    pub fn fill_over_time(
        &mut self,
        duration: f32,
        on_complete: impl FnOnce(Completion, &mut Window, &mut App) + 'static,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let superseded = self.fill.fill_over_time(duration, None);
        self.start(superseded.is_some(), Box::new(on_complete), window, cx);
    }

    /// Fill the bar from empty to `current / max`.
    ///
    /// Uses the `update_duration` of the settings if `duration` is `None`.
    pub fn update_fill(
        &mut self,
        current: f32,
        max: f32,
        duration: Option<f32>,
        on_complete: impl FnOnce(Completion, &mut Window, &mut App) + 'static,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let duration = duration.unwrap_or(self.settings.update_duration);
        let superseded = self.fill.update_fill(current, max, duration, None);
        self.start(superseded.is_some(), Box::new(on_complete), window, cx);
    }

    fn start(
        &mut self,
        superseded: bool,
        on_complete: ViewOnComplete,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if let Some(prev) = self.on_complete.replace(on_complete) {
            if superseded {
                window.defer(cx, move |window, cx| {
                    prev(Completion::Superseded, window, cx);
                });
            }
        }

        self.spawn_frame_loop(window, cx);
    }

    fn spawn_frame_loop(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let interval = self.settings.frame_interval();
        let mut last_frame = cx.background_executor().now();
        cx.notify();

        self._frame_loop = Some(cx.spawn_in(window, async move |this, cx| {
            loop {
                cx.background_executor().timer(interval).await;
                let now = cx.background_executor().now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                let result = this.update(cx, |this, cx| {
                    let tick = this.fill.tick(dt);
                    cx.notify();
                    match tick {
                        FillTick::Running => ControlFlow::Continue(()),
                        FillTick::Idle => ControlFlow::Break(None),
                        FillTick::Ended(ended) => ControlFlow::Break(
                            this.on_complete
                                .take()
                                .map(|on_complete| (ended.completion(), on_complete)),
                        ),
                    }
                });

                match result {
                    Ok(ControlFlow::Continue(())) => {}
                    Ok(ControlFlow::Break(None)) => break,
                    Ok(ControlFlow::Break(Some((completion, on_complete)))) => {
                        if let Err(err) =
                            cx.update(|window, cx| on_complete(completion, window, cx))
                        {
                            tracing::error!("failed to complete progress fill: {:?}", err);
                        }
                        break;
                    }
                    Err(err) => {
                        tracing::debug!("progress fill frame loop stopped: {:?}", err);
                        break;
                    }
                }
            }
        }));
    }
}

impl Render for ProgressFillView {
    fn render(&mut self, _: &mut Window, _: &mut Context<Self>) -> impl IntoElement {
        let color = self.color.unwrap_or_else(|| rgb(0x3b82f6).into());
        let height = self.region.borrow().size().height;
        let track = size(self.fill.full_width(), height).convert();
        let filled = self.region.borrow().size().convert();
        let text = self.text();

        div()
            .flex()
            .flex_row()
            .items_center()
            .gap_2()
            .child(
                div()
                    .relative()
                    .w(track.width)
                    .h(track.height)
                    .rounded_full()
                    .bg(color.opacity(0.2))
                    .child(
                        div()
                            .absolute()
                            .top_0()
                            .left_0()
                            .h_full()
                            .w(filled.width)
                            .rounded_full()
                            .bg(color)
                            .when(filled.width < track.width, |this| this.rounded_r_none()),
                    ),
            )
            .when_some(text, |this, text| this.child(div().text_sm().child(text)))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gpui::{AppContext as _, Entity, TestAppContext, VisualTestContext, px};

    use super::*;
    use crate::TextMode;

    const FRAME: Duration = Duration::from_millis(250);

    fn settings(text_mode: TextMode) -> ProgressFillSettings {
        ProgressFillSettings {
            text_mode,
            update_duration: 2.,
            frame_interval_ms: FRAME.as_millis() as u64,
        }
    }

    fn bar(text_mode: TextMode) -> ProgressFillView {
        ProgressFillView::new(size(px(200.), px(10.)), settings(text_mode)).with_label()
    }

    fn recorder() -> (
        Rc<RefCell<Vec<Completion>>>,
        impl FnOnce(Completion, &mut Window, &mut App) + 'static,
    ) {
        let completions = Rc::new(RefCell::new(Vec::new()));
        let on_complete = {
            let completions = completions.clone();
            move |completion: Completion, _: &mut Window, _: &mut App| {
                completions.borrow_mut().push(completion);
            }
        };
        (completions, on_complete)
    }

    fn advance(cx: &mut VisualTestContext, frames: usize) {
        for _ in 0..frames {
            cx.executor().advance_clock(FRAME);
            cx.run_until_parked();
        }
    }

    fn state(view: &Entity<ProgressFillView>, cx: &mut VisualTestContext) -> (f32, String, bool) {
        view.read_with(cx, |view, _| {
            (
                view.width(),
                view.text().unwrap_or_default().to_string(),
                view.is_animating(),
            )
        })
    }

    #[gpui::test]
    fn test_fill_over_time(cx: &mut TestAppContext) {
        let (view, cx) = cx.add_window_view(|_, _| bar(TextMode::Percent));
        let (completions, on_complete) = recorder();
        let notifications = Rc::new(RefCell::new(0));
        let _subscription = cx.update({
            let notifications = notifications.clone();
            |_, cx| cx.observe(&view, move |_, _| *notifications.borrow_mut() += 1)
        });

        view.update_in(cx, |view, window, cx| {
            view.fill_over_time(1., on_complete, window, cx);
        });
        cx.run_until_parked();
        assert_eq!(state(&view, cx), (0., "".into(), true));

        advance(cx, 2);
        let (width, text, animating) = state(&view, cx);
        assert!(width > 0. && width < 200.);
        assert!(text.ends_with('%'));
        assert!(animating);

        advance(cx, 2);
        assert_eq!(state(&view, cx), (200., "100%".into(), false));
        assert_eq!(*completions.borrow(), vec![Completion::Finished]);

        // The frame loop has stopped, nothing notifies the view anymore.
        let count = *notifications.borrow();
        advance(cx, 4);
        assert_eq!(*notifications.borrow(), count);
        assert_eq!(completions.borrow().len(), 1);
    }

    #[gpui::test]
    fn test_update_fill_uses_settings_duration(cx: &mut TestAppContext) {
        let (view, cx) = cx.add_window_view(|_, _| bar(TextMode::Value));
        let (completions, on_complete) = recorder();

        view.update_in(cx, |view, window, cx| {
            view.update_fill(2., 4., None, on_complete, window, cx);
        });
        cx.run_until_parked();

        advance(cx, 4);
        let (width, text, animating) = state(&view, cx);
        assert!(width > 0. && width < 100.);
        assert_eq!(text, "2/4");
        assert!(animating);
        assert!(completions.borrow().is_empty());

        advance(cx, 4);
        assert_eq!(state(&view, cx), (100., "2/4".into(), false));
        assert_eq!(*completions.borrow(), vec![Completion::Finished]);
    }

    #[gpui::test]
    fn test_last_call_wins(cx: &mut TestAppContext) {
        let (view, cx) = cx.add_window_view(|_, _| bar(TextMode::Value));
        let (first, on_first) = recorder();
        let (second, on_second) = recorder();

        view.update_in(cx, |view, window, cx| {
            view.update_fill(4., 4., Some(1.), on_first, window, cx);
        });
        cx.run_until_parked();
        advance(cx, 2);
        assert!(state(&view, cx).0 > 0.);

        view.update_in(cx, |view, window, cx| {
            view.update_fill(1., 4., Some(0.5), on_second, window, cx);
        });
        cx.run_until_parked();
        assert_eq!(*first.borrow(), vec![Completion::Superseded]);
        assert_eq!(state(&view, cx).0, 0.);

        advance(cx, 4);
        assert_eq!(state(&view, cx), (50., "1/4".into(), false));
        assert_eq!(*first.borrow(), vec![Completion::Superseded]);
        assert_eq!(*second.borrow(), vec![Completion::Finished]);
    }

    #[gpui::test]
    fn test_chain_fill_from_completion(cx: &mut TestAppContext) {
        let (view, cx) = cx.add_window_view(|_, _| bar(TextMode::Value));
        let (completions, on_second) = recorder();

        let on_first = {
            let view = view.downgrade();
            move |completion: Completion, window: &mut Window, cx: &mut App| {
                assert_eq!(completion, Completion::Finished);
                view.update(cx, |view, cx| {
                    view.update_fill(3., 4., Some(0.5), on_second, window, cx);
                })
                .ok();
            }
        };
        view.update_in(cx, |view, window, cx| {
            view.update_fill(1., 4., Some(0.5), on_first, window, cx);
        });
        cx.run_until_parked();

        advance(cx, 2);
        let (_, text, animating) = state(&view, cx);
        assert_eq!(text, "1/4");
        assert!(animating);

        advance(cx, 2);
        assert_eq!(state(&view, cx), (150., "3/4".into(), false));
        assert_eq!(*completions.borrow(), vec![Completion::Finished]);
    }

    #[gpui::test]
    fn test_released_view_stops_frame_loop(cx: &mut TestAppContext) {
        let (_, cx) = cx.add_window_view(|_, _| bar(TextMode::Percent));
        let (completions, on_complete) = recorder();

        let view = cx.update(|window, cx| {
            let view = cx.new(|_| bar(TextMode::Percent));
            view.update(cx, |view, cx| view.fill_over_time(1., on_complete, window, cx));
            view
        });
        cx.run_until_parked();
        advance(cx, 1);

        let weak = view.downgrade();
        drop(view);
        cx.run_until_parked();
        assert!(weak.upgrade().is_none());

        advance(cx, 8);
        assert!(completions.borrow().is_empty());
    }
}
