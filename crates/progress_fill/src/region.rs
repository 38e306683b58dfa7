use std::{cell::RefCell, rc::Rc};

use gpui::{SharedString, Size, size};

/// The rectangle whose width shows the filled progress.
///
/// The region is owned by the host; [`crate::ProgressFill`] only holds a
/// handle to it, usually an `Rc<RefCell<T>>`.
pub trait FillRegion {
    fn size(&self) -> Size<f32>;
    fn set_size(&mut self, size: Size<f32>);

    #[inline]
    fn width(&self) -> f32 {
        self.size().width
    }

    /// Change the width and keep the current height.
    fn set_width(&mut self, width: f32) {
        let height = self.size().height;
        self.set_size(size(width, height));
    }
}

/// A text element showing the progress value.
pub trait TextLabel {
    fn set_text(&mut self, text: SharedString);
}

impl<T: FillRegion + ?Sized> FillRegion for Rc<RefCell<T>> {
    fn size(&self) -> Size<f32> {
        self.borrow().size()
    }

    fn set_size(&mut self, size: Size<f32>) {
        self.borrow_mut().set_size(size)
    }
}

impl<T: TextLabel + ?Sized> TextLabel for Rc<RefCell<T>> {
    fn set_text(&mut self, text: SharedString) {
        self.borrow_mut().set_text(text)
    }
}

/// A plain fill rectangle, used by [`crate::ProgressFillView`] for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FillBox {
    size: Size<f32>,
}

impl FillBox {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: size(width, height),
        }
    }
}

impl FillRegion for FillBox {
    fn size(&self) -> Size<f32> {
        self.size
    }

    fn set_size(&mut self, size: Size<f32>) {
        self.size = size;
    }
}

/// A plain text value, used by [`crate::ProgressFillView`] for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillText {
    text: SharedString,
}

impl FillText {
    pub fn text(&self) -> &SharedString {
        &self.text
    }
}

impl TextLabel for FillText {
    fn set_text(&mut self, text: SharedString) {
        self.text = text;
    }
}
