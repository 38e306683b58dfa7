use std::time::Duration;

use smallvec::SmallVec;

/// How a tween ended, passed to every completion listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The tween reached its end value.
    Finished,
    /// The tween was replaced by a newer one before reaching its end value.
    Superseded,
}

type UpdateListener = Box<dyn FnMut(f32)>;
type CompleteListener = Box<dyn FnOnce(Completion)>;

/// A value-over-time task driven by the host frame loop.
///
/// The tween does nothing on its own: every call to [`Tween::tick`] advances
/// the elapsed time, evaluates the easing and notifies the update listeners.
/// Once the end value is reached the tween is finished and the owner is
/// expected to call [`Tween::complete`].
pub struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
    easing: fn(f32) -> f32,
    finished: bool,
    on_update: SmallVec<[UpdateListener; 1]>,
    on_complete: SmallVec<[CompleteListener; 1]>,
}

impl Tween {
    /// Create a linear tween from `from` to `to` over `duration`.
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing: gpui::linear,
            finished: false,
            on_update: SmallVec::new(),
            on_complete: SmallVec::new(),
        }
    }

    /// Set the easing function, it receives the linear progress in `0..=1`.
    pub fn with_easing(mut self, easing: fn(f32) -> f32) -> Self {
        self.easing = easing;
        self
    }

    /// Add a listener called with the new value on every tick.
    pub fn on_update(mut self, listener: impl FnMut(f32) + 'static) -> Self {
        self.on_update.push(Box::new(listener));
        self
    }

    /// Add a listener called once when the tween finishes or is superseded.
    pub fn on_complete(mut self, listener: impl FnOnce(Completion) + 'static) -> Self {
        self.on_complete.push(Box::new(listener));
        self
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Linear progress in `0..=1`, before easing.
    fn delta(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.;
        }

        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.)
    }

    /// Advance the tween by `dt` and return the new value.
    ///
    /// Returns `None` once the tween has already finished.
    pub fn tick(&mut self, dt: Duration) -> Option<f32> {
        if self.finished {
            return None;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        let delta = self.delta();
        let value = if delta >= 1. {
            self.finished = true;
            self.to
        } else {
            self.from + (self.to - self.from) * (self.easing)(delta)
        };

        for listener in self.on_update.iter_mut() {
            listener(value);
        }

        Some(value)
    }

    /// Consume the tween and notify the completion listeners.
    ///
    /// Reports [`Completion::Finished`] if the end value was reached, otherwise
    /// [`Completion::Superseded`].
    pub fn complete(self) {
        let completion = if self.finished {
            Completion::Finished
        } else {
            Completion::Superseded
        };

        for listener in self.on_complete {
            listener(completion);
        }
    }
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .field("finished", &self.finished)
            .finish()
    }
}

/// Convert seconds into a tween duration.
///
/// Zero, negative and NaN become [`Duration::ZERO`], so the tween jumps to the
/// end on its first tick.
pub(crate) fn duration_from_secs(secs: f32) -> Duration {
    if secs > 0. {
        Duration::try_from_secs_f32(secs).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_linear_tween() {
        let mut tween = Tween::new(0., 200., ms(1000));
        assert_eq!(tween.tick(ms(250)), Some(50.));
        assert_eq!(tween.tick(ms(250)), Some(100.));
        assert!(!tween.is_finished());
        assert_eq!(tween.tick(ms(600)), Some(200.));
        assert!(tween.is_finished());
        assert_eq!(tween.tick(ms(16)), None);
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let mut tween = Tween::new(0., 80., Duration::ZERO);
        assert_eq!(tween.tick(Duration::ZERO), Some(80.));
        assert!(tween.is_finished());
    }

    #[test]
    fn test_update_listeners_are_monotonic() {
        let values = Rc::new(RefCell::new(Vec::new()));
        let mut tween = Tween::new(0., 10., ms(100)).on_update({
            let values = values.clone();
            move |value| values.borrow_mut().push(value)
        });

        while tween.tick(ms(16)).is_some() {}

        let values = values.borrow();
        assert_eq!(values.len(), 7);
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(values.last(), Some(&10.));
    }

    #[test]
    fn test_custom_easing() {
        let mut tween = Tween::new(0., 100., ms(100)).with_easing(|delta| delta * delta);
        assert_eq!(tween.tick(ms(50)), Some(25.));
    }

    #[test]
    fn test_complete() {
        let completions = Rc::new(RefCell::new(Vec::new()));
        let listener = {
            let completions = completions.clone();
            move |completion: Completion| completions.borrow_mut().push(completion)
        };

        let mut tween = Tween::new(0., 1., ms(10)).on_complete(listener.clone());
        tween.tick(ms(10));
        tween.complete();

        let mut tween = Tween::new(0., 1., ms(10)).on_complete(listener);
        tween.tick(ms(5));
        tween.complete();

        assert_eq!(
            *completions.borrow(),
            vec![Completion::Finished, Completion::Superseded]
        );
    }

    #[test]
    fn test_duration_from_secs() {
        assert_eq!(duration_from_secs(0.1), Duration::from_secs_f32(0.1));
        assert_eq!(duration_from_secs(0.), Duration::ZERO);
        assert_eq!(duration_from_secs(-1.), Duration::ZERO);
        assert_eq!(duration_from_secs(f32::NAN), Duration::ZERO);
        assert_eq!(duration_from_secs(f32::INFINITY), Duration::MAX);
    }
}
