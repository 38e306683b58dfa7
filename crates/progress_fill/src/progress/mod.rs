mod view;

use std::time::Duration;

use gpui::SharedString;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Completion, FillRegion, TextLabel, Tween, tween::duration_from_secs};

pub use view::ProgressFillView;

/// Default duration of [`ProgressFill::update_fill`], in seconds.
pub const DEFAULT_UPDATE_DURATION: f32 = 0.1;

/// Callback fired once an animated fill ends.
pub type OnComplete = Box<dyn FnOnce(Completion)>;

/// What the progress label shows.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    /// The live fill width as a percentage of the full width, e.g. `42%`.
    #[default]
    Percent,
    /// The `current/max` values of the last update, e.g. `3/10`.
    Value,
}

impl TextMode {
    /// Return lower_case mode name: `percent`, `value`.
    pub fn name(&self) -> &'static str {
        match self {
            TextMode::Percent => "percent",
            TextMode::Value => "value",
        }
    }
}

/// Format the live fill width as a whole percentage of `full_width`.
pub fn percent_text(live_width: f32, full_width: f32) -> SharedString {
    let percent = (live_width / full_width * 100.).floor() as i64;
    format!("{}%", percent).into()
}

/// Format `current/max` as whole numbers.
pub fn value_text(current: f32, max: f32) -> SharedString {
    format!("{}/{}", current.floor() as i64, max.floor() as i64).into()
}

/// A fill that has ended, whose completion listeners have not run yet.
///
/// The listeners run on [`EndedFill::notify`], or when the value is dropped.
/// Holding on to it lets a caller release its borrow of the [`ProgressFill`]
/// first, so a listener may start the next fill.
pub struct EndedFill {
    tween: Option<Tween>,
    completion: Completion,
}

impl EndedFill {
    fn new(tween: Tween) -> Self {
        let completion = if tween.is_finished() {
            Completion::Finished
        } else {
            Completion::Superseded
        };

        Self {
            tween: Some(tween),
            completion,
        }
    }

    pub fn completion(&self) -> Completion {
        self.completion
    }

    /// Run the completion listeners.
    pub fn notify(mut self) {
        if let Some(tween) = self.tween.take() {
            tween.complete();
        }
    }
}

impl Drop for EndedFill {
    fn drop(&mut self) {
        if let Some(tween) = self.tween.take() {
            tween.complete();
        }
    }
}

/// The result of [`ProgressFill::tick`].
pub enum FillTick {
    /// No fill in flight.
    Idle,
    /// The fill is still moving.
    Running,
    /// The fill reached its end on this tick.
    Ended(EndedFill),
}

impl FillTick {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Run the completion listeners if the fill ended.
    pub fn notify(self) {
        if let Self::Ended(ended) = self {
            ended.notify();
        }
    }
}

struct ActiveFill {
    tween: Tween,
    current: f32,
    max: f32,
}

/// Animates the width of a fill region and keeps an optional label in sync.
///
/// The full width is taken from the region once, when the `ProgressFill` is
/// created, and is never recomputed. Animations only advance when the host
/// calls [`ProgressFill::tick`], see [`ProgressFillView`] for a GPUI host.
///
/// Starting a fill while another is in flight returns the superseded one as
/// an [`EndedFill`], and [`ProgressFill::tick`] returns the finished one.
/// Completion listeners run when those are notified or dropped, never while
/// the `ProgressFill` is borrowed by the call.
///
/// ```ignore
/// let mut fill = ProgressFill::new(region).label(label).text_mode(TextMode::Value);
/// fill.update_fill(3., 10., DEFAULT_UPDATE_DURATION, None);
/// while fill.tick(frame_time).is_running() {}
/// ```
pub struct ProgressFill<R: FillRegion> {
    region: R,
    label: Option<Box<dyn TextLabel>>,
    text_mode: TextMode,
    full_width: f32,
    active: Option<ActiveFill>,
}

impl<R: FillRegion> ProgressFill<R> {
    /// Create a new `ProgressFill`, without label and in [`TextMode::Percent`].
    pub fn new(region: R) -> Self {
        let full_width = region.width();
        Self {
            region,
            label: None,
            text_mode: TextMode::default(),
            full_width,
            active: None,
        }
    }

    /// Set the label that shows the progress text.
    pub fn label(mut self, label: impl TextLabel + 'static) -> Self {
        self.label = Some(Box::new(label));
        self
    }

    /// Set what the label shows, default is [`TextMode::Percent`].
    pub fn text_mode(mut self, text_mode: TextMode) -> Self {
        self.text_mode = text_mode;
        self
    }

    pub fn mode(&self) -> TextMode {
        self.text_mode
    }

    pub fn has_label(&self) -> bool {
        self.label.is_some()
    }

    /// The region width captured on creation.
    pub fn full_width(&self) -> f32 {
        self.full_width
    }

    /// The live width of the fill region.
    pub fn width(&self) -> f32 {
        self.region.width()
    }

    /// Returns true while an animated fill is in flight.
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// The width [`ProgressFill::update_fill`] animates to.
    ///
    /// Only the high side is clamped: a negative `current` gives a negative
    /// width and `max == 0` gives a non-finite one.
    pub fn target_width(&self, current: f32, max: f32) -> f32 {
        let width = (current / max) * self.full_width;
        if width > self.full_width {
            self.full_width
        } else {
            width
        }
    }

    /// Empty the bar, then fill it up to the full width over `duration` seconds.
    ///
    /// Any animation in flight is superseded and returned.
    pub fn fill_over_time(
        &mut self,
        duration: f32,
        on_complete: Option<OnComplete>,
    ) -> Option<EndedFill> {
        self.start(self.full_width, duration, 1., 1., on_complete)
    }

    /// Empty the bar, then fill it up to `current / max` of the full width over
    /// `duration` seconds.
    ///
    /// Any animation in flight is superseded and returned.
    pub fn update_fill(
        &mut self,
        current: f32,
        max: f32,
        duration: f32,
        on_complete: Option<OnComplete>,
    ) -> Option<EndedFill> {
        let target = self.target_width(current, max);
        if !target.is_finite() {
            tracing::warn!(current, max, target, "progress fill target is not finite");
        }

        self.start(target, duration, current, max, on_complete)
    }

    fn start(
        &mut self,
        target: f32,
        duration: f32,
        current: f32,
        max: f32,
        on_complete: Option<OnComplete>,
    ) -> Option<EndedFill> {
        let superseded = self.active.take().map(|prev| {
            tracing::debug!(to = prev.tween.to(), "superseding progress fill");
            EndedFill::new(prev.tween)
        });

        self.region.set_width(0.);

        let mut tween = Tween::new(0., target, duration_from_secs(duration));
        if let Some(on_complete) = on_complete {
            tween = tween.on_complete(on_complete);
        }

        tracing::debug!(target, duration, "progress fill started");
        self.active = Some(ActiveFill {
            tween,
            current,
            max,
        });

        superseded
    }

    /// Advance the animation in flight by `dt`.
    pub fn tick(&mut self, dt: Duration) -> FillTick {
        let Some(active) = self.active.as_mut() else {
            return FillTick::Idle;
        };

        let Some(width) = active.tween.tick(dt) else {
            return FillTick::Idle;
        };
        let (current, max) = (active.current, active.max);
        let finished = active.tween.is_finished();

        self.region.set_width(width);
        self.update_label_text(current, max);

        if !finished {
            return FillTick::Running;
        }

        match self.active.take() {
            Some(active) => FillTick::Ended(EndedFill::new(active.tween)),
            None => FillTick::Idle,
        }
    }

    fn update_label_text(&mut self, current: f32, max: f32) {
        let Some(label) = self.label.as_mut() else {
            return;
        };

        let text = match self.text_mode {
            TextMode::Percent => percent_text(self.region.width(), self.full_width),
            TextMode::Value => value_text(current, max),
        };
        label.set_text(text);
    }
}
