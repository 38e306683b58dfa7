mod geometry;
pub mod progress;
mod region;
mod settings;
mod tween;

pub use geometry::*;
pub use progress::{
    DEFAULT_UPDATE_DURATION, EndedFill, FillTick, OnComplete, ProgressFill, ProgressFillView,
    TextMode, percent_text, value_text,
};
pub use region::*;
pub use settings::*;
pub use tween::{Completion, Tween};
