use gpui::{Pixels, Size, px, size};

/// A trait to convert a [`Size`] between [`Pixels`] and plain floats.
pub trait SizeExt {
    type Output;

    fn convert(&self) -> Self::Output;
}

impl SizeExt for Size<Pixels> {
    type Output = Size<f32>;

    fn convert(&self) -> Size<f32> {
        size(f32::from(&self.width), f32::from(&self.height))
    }
}

impl SizeExt for Size<f32> {
    type Output = Size<Pixels>;

    /// Negative and non-finite lengths become zero, they can not be laid out.
    fn convert(&self) -> Size<Pixels> {
        let length = |value: f32| {
            if value.is_finite() {
                px(value.max(0.))
            } else {
                px(0.)
            }
        };

        size(length(self.width), length(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_convert() {
        let pixels = size(px(200.), px(12.));
        assert_eq!(pixels.convert(), size(200., 12.));
        assert_eq!(size(200f32, 12f32).convert(), pixels);
        assert_eq!(size(-20., f32::NAN).convert(), size(px(0.), px(0.)));
        assert_eq!(size(px(3.5), px(0.)).convert(), size(3.5, 0.));
    }
}
