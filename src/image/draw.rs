//! Drawing API for [`Image`]s.
//!
//! This module contains a collection of freestanding functions that draw shapes onto an
//! [`Image`]. All functions return a *guard object* that allows optional customization of the
//! shape and performs the draw operation when dropped.
//!
//! All drawing operations *overwrite* the target pixels with the shape color. They do not perform
//! blending. Geometry lying partially or completely outside of the image is clipped.

use std::{convert::Infallible, thread};

use embedded_graphics::{
    draw_target::DrawTarget,
    mono_font::{ascii, MonoTextStyle},
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::image::{Color, Image};

/// Guard returned by [`rect`]; draws the rectangle when dropped and allows customization.
pub struct DrawRect<'a> {
    image: &'a mut Image,
    top_left: Point,
    bottom_right: Point,
    color: Color,
    stroke_width: u32,
}

impl DrawRect<'_> {
    /// Sets the rectangle's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the rectangle's stroke width.
    ///
    /// The stroke is placed *inside* of the rectangle's corners. By default, a stroke width of 1
    /// is used.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }
}

impl Drop for DrawRect<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            return;
        }

        let style = PrimitiveStyleBuilder::new()
            .stroke_color(self.color)
            .stroke_width(self.stroke_width)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        match Rectangle::with_corners(self.top_left, self.bottom_right)
            .into_styled(style)
            .draw(&mut Target(&mut *self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Guard returned by [`line`][line()]; draws the line when dropped and allows customization.
pub struct DrawLine<'a> {
    image: &'a mut Image,
    start: Point,
    end: Point,
    color: Color,
    stroke_width: u32,
}

impl DrawLine<'_> {
    /// Sets the line's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the line's stroke width.
    ///
    /// By default, a stroke width of 1 is used.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }
}

impl Drop for DrawLine<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            return;
        }

        match Line::new(self.start, self.end)
            .into_styled(PrimitiveStyle::with_stroke(self.color, self.stroke_width))
            .draw(&mut Target(&mut *self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Guard returned by [`circle`]; draws the circle when dropped and allows customization.
pub struct DrawCircle<'a> {
    image: &'a mut Image,
    center: Point,
    radius: u32,
    stroke_width: u32,
    filled: bool,
    color: Color,
}

impl DrawCircle<'_> {
    /// Sets the circle's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the circle's stroke width.
    ///
    /// By default, a stroke width of 1 is used. Has no effect on filled circles.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }

    /// Fills the circle instead of only drawing its outline.
    pub fn filled(&mut self) -> &mut Self {
        self.filled = true;
        self
    }
}

impl Drop for DrawCircle<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            return;
        }

        let style = if self.filled {
            PrimitiveStyle::with_fill(self.color)
        } else {
            PrimitiveStyle::with_stroke(self.color, self.stroke_width)
        };
        match Circle::with_center(self.center, self.radius * 2 + 1)
            .into_styled(style)
            .draw(&mut Target(&mut *self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Guard returned by [`text`]; draws the text when dropped and allows customization.
pub struct DrawText<'a> {
    image: &'a mut Image,
    x: i32,
    y: i32,
    text: &'a str,
    large: bool,
    color: Color,
    alignment: Alignment,
    baseline: Baseline,
}

impl DrawText<'_> {
    /// Sets the text color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Uses a larger font, suitable for status overlays.
    pub fn large(&mut self) -> &mut Self {
        self.large = true;
        self
    }

    /// Aligns the left side of the text with the `x` coordinate.
    pub fn align_left(&mut self) -> &mut Self {
        self.alignment = Alignment::Left;
        self
    }
}

impl Drop for DrawText<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            return;
        }

        let font = if self.large {
            &ascii::FONT_10X20
        } else {
            &ascii::FONT_6X10
        };
        let character_style = MonoTextStyle::new(font, self.color);
        let text_style = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(self.baseline)
            .build();
        match Text::with_text_style(
            self.text,
            Point::new(self.x, self.y),
            character_style,
            text_style,
        )
        .draw(&mut Target(&mut *self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Draws the outline of an axis-aligned rectangle, given its top left and bottom right corners.
///
/// Both corners are inclusive.
pub fn rect(image: &mut Image, top_left: (i32, i32), bottom_right: (i32, i32)) -> DrawRect<'_> {
    DrawRect {
        image,
        top_left: Point::new(top_left.0, top_left.1),
        bottom_right: Point::new(bottom_right.0, bottom_right.1),
        color: Color::RED,
        stroke_width: 1,
    }
}

/// Draws a line onto an image.
pub fn line(image: &mut Image, start: (i32, i32), end: (i32, i32)) -> DrawLine<'_> {
    DrawLine {
        image,
        start: Point::new(start.0, start.1),
        end: Point::new(end.0, end.1),
        color: Color::BLUE,
        stroke_width: 1,
    }
}

/// Draws a circle of the given radius around `(x, y)`.
///
/// By default, only the outline is drawn. Use [`DrawCircle::filled`] to fill it.
pub fn circle(image: &mut Image, x: i32, y: i32, radius: u32) -> DrawCircle<'_> {
    DrawCircle {
        image,
        center: Point::new(x, y),
        radius,
        stroke_width: 1,
        filled: false,
        color: Color::GREEN,
    }
}

/// Draws a text string onto an image.
///
/// By default, the text is drawn centered horizontally and vertically around `x` and `y`.
pub fn text<'a>(image: &'a mut Image, x: i32, y: i32, text: &'a str) -> DrawText<'a> {
    DrawText {
        image,
        x,
        y,
        text,
        large: false,
        color: Color::RED,
        alignment: Alignment::Center,
        baseline: Baseline::Middle,
    }
}

struct Target<'a>(&'a mut Image);

impl Dimensions for Target<'_> {
    fn bounding_box(&self) -> Rectangle {
        Rectangle {
            top_left: Point { x: 0, y: 0 },
            size: Size {
                width: self.0.width(),
                height: self.0.height(),
            },
        }
    }
}

impl DrawTarget for Target<'_> {
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(pos, color) in pixels {
            self.0.set(pos.x, pos.y, color);
        }

        Ok(())
    }
}
