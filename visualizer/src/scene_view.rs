use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Event, Frame, Geometry, LineDash, Path, Stroke, Text};
use iced::{mouse, Color, Point, Rectangle, Renderer, Size, Theme};
use replaycore::prelude::{RenderError, RenderResult};
use replaycore::render::surface::ensure_finite;
use replaycore::render::{DrawSurface, Rgba, StrokeStyle, TextAlign, TextStyle};
use replaycore::view::{CanvasSize, ScreenPoint};
use replaycore::ReplayEngine;

use crate::Message;

fn color(rgba: Rgba) -> Color {
    Color::from_rgba(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn point(p: ScreenPoint) -> Point {
    Point::new(p.x, p.y)
}

fn polyline(points: &[ScreenPoint], close: bool) -> Path {
    Path::new(|builder| {
        let mut corners = points.iter().copied().map(point);
        if let Some(first) = corners.next() {
            builder.move_to(first);
            corners.for_each(|corner| builder.line_to(corner));
            if close {
                builder.close();
            }
        }
    })
}

/// [`DrawSurface`] over one iced canvas frame.
pub struct IcedSurface<'a> {
    frame: &'a mut Frame,
    size: Size,
}

impl<'a> IcedSurface<'a> {
    pub fn new(frame: &'a mut Frame, size: Size) -> Self {
        Self { frame, size }
    }

    fn text(&mut self, content: &str, position: Point, style: &TextStyle, tint: Color) {
        let (align_x, align_y) = match style.align {
            TextAlign::Left => (Horizontal::Left, Vertical::Bottom),
            TextAlign::Center => (Horizontal::Center, Vertical::Center),
            TextAlign::Right => (Horizontal::Right, Vertical::Bottom),
        };
        self.frame.fill_text(Text {
            content: content.to_string(),
            position,
            size: style.size.into(),
            color: tint,
            align_x: align_x.into(),
            align_y: align_y.into(),
            ..Text::default()
        });
    }
}

impl DrawSurface for IcedSurface<'_> {
    fn acquire(&mut self) -> RenderResult<CanvasSize> {
        if self.size.width >= 1.0 && self.size.height >= 1.0 {
            Ok(CanvasSize::new(self.size.width, self.size.height))
        } else {
            Err(RenderError::SurfaceUnavailable(format!(
                "canvas is {}x{}",
                self.size.width, self.size.height
            )))
        }
    }

    fn clear(&mut self, background: Rgba) -> RenderResult<()> {
        self.frame
            .fill_rectangle(Point::ORIGIN, self.size, color(background));
        Ok(())
    }

    fn fill_rect(&mut self, origin: ScreenPoint, size: CanvasSize, fill: Rgba) -> RenderResult<()> {
        ensure_finite(&[origin, ScreenPoint::new(size.width, size.height)], "fill_rect")?;
        self.frame.fill_rectangle(
            point(origin),
            Size::new(size.width, size.height),
            color(fill),
        );
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], fill: Rgba) -> RenderResult<()> {
        ensure_finite(points, "fill_polygon")?;
        if points.len() < 3 {
            return Err(RenderError::Rejected(format!(
                "polygon with {} corners",
                points.len()
            )));
        }
        self.frame.fill(&polyline(points, true), color(fill));
        Ok(())
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, fill: Rgba) -> RenderResult<()> {
        ensure_finite(&[center, ScreenPoint::new(radius, 0.0)], "fill_circle")?;
        self.frame
            .fill(&Path::circle(point(center), radius), color(fill));
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[ScreenPoint], style: &StrokeStyle) -> RenderResult<()> {
        ensure_finite(points, "stroke_polyline")?;
        if points.len() < 2 {
            return Ok(());
        }
        let segments = style.dash.map(|(dash, gap)| [dash, gap]);
        let mut stroke = Stroke::default()
            .with_width(style.width)
            .with_color(color(style.color));
        if let Some(segments) = &segments {
            stroke.line_dash = LineDash {
                segments,
                offset: 0,
            };
        }
        self.frame.stroke(&polyline(points, false), stroke);
        Ok(())
    }

    fn fill_text(&mut self, position: ScreenPoint, content: &str, style: &TextStyle) -> RenderResult<()> {
        ensure_finite(&[position], "fill_text")?;
        if let Some(shadow) = style.shadow {
            self.text(content, point(position.translate(1.0, 1.0)), style, color(shadow));
        }
        self.text(content, point(position), style, color(style.color));
        Ok(())
    }
}

/// Canvas program painting the engine's current frame and turning mouse
/// drags into pan messages.
pub struct SceneView<'a> {
    pub engine: &'a ReplayEngine,
}

impl canvas::Program<Message> for SceneView<'_> {
    /// Whether the cursor was over the canvas on the last move.
    type State = bool;

    fn update(
        &self,
        hovering: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let dragging = self.engine.viewport().is_dragging();
        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                Some(canvas::Action::publish(Message::PointerDown(position)))
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => match cursor.position_in(bounds) {
                Some(position) => {
                    *hovering = true;
                    Some(canvas::Action::publish(Message::PointerMoved(
                        position,
                        bounds.size(),
                    )))
                }
                None if std::mem::take(hovering) || dragging => {
                    Some(canvas::Action::publish(Message::PointerLeft))
                }
                None => None,
            },
            Event::Mouse(mouse::Event::CursorLeft) => {
                *hovering = false;
                Some(canvas::Action::publish(Message::PointerLeft))
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) if dragging => {
                Some(canvas::Action::publish(Message::PointerUp))
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let result = self
            .engine
            .render(&mut IcedSurface::new(&mut frame, bounds.size()));

        let fault = match result {
            Ok(_) => self.engine.fault().map(str::to_string),
            Err(err) => Some(err.to_string()),
        };
        if let Some(reason) = fault {
            frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::from_rgb(0.12, 0.02, 0.02));
            frame.fill_text(Text {
                content: format!("Rendering unavailable: {}", reason),
                position: Point::new(bounds.width / 2.0, bounds.height / 2.0),
                size: 18.0.into(),
                color: Color::from_rgb(0.95, 0.4, 0.4),
                align_x: Horizontal::Center.into(),
                align_y: Vertical::Center.into(),
                ..Text::default()
            });
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.engine.viewport().is_dragging() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}
