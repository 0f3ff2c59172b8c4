use crate::prelude::{RenderError, RenderResult};
use crate::render::style::{Rgba, StrokeStyle, TextStyle};
use crate::view::{CanvasSize, ScreenPoint};

/// Drawing target of the scene renderer. Every call carries its complete
/// style; implementations must not keep style state between calls.
pub trait DrawSurface {
    /// Acquires the surface for one render pass and reports its pixel size.
    fn acquire(&mut self) -> RenderResult<CanvasSize>;
    fn clear(&mut self, color: Rgba) -> RenderResult<()>;
    fn fill_rect(&mut self, origin: ScreenPoint, size: CanvasSize, color: Rgba) -> RenderResult<()>;
    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Rgba) -> RenderResult<()>;
    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Rgba) -> RenderResult<()>;
    fn stroke_polyline(&mut self, points: &[ScreenPoint], style: &StrokeStyle) -> RenderResult<()>;
    fn fill_text(&mut self, position: ScreenPoint, content: &str, style: &TextStyle)
        -> RenderResult<()>;
}

/// Rejects calls carrying NaN or infinite coordinates.
pub fn ensure_finite(points: &[ScreenPoint], call: &'static str) -> RenderResult<()> {
    if points.iter().all(ScreenPoint::is_finite) {
        Ok(())
    } else {
        Err(RenderError::NonFinite(call))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Clear,
    Rect,
    Polygon,
    Circle,
    Polyline,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    Rect {
        origin: ScreenPoint,
        size: CanvasSize,
        color: Rgba,
    },
    Polygon {
        points: Vec<ScreenPoint>,
        color: Rgba,
    },
    Circle {
        center: ScreenPoint,
        radius: f32,
        color: Rgba,
    },
    Polyline {
        points: Vec<ScreenPoint>,
        style: StrokeStyle,
    },
    Text {
        position: ScreenPoint,
        content: String,
        style: TextStyle,
    },
}

impl DrawCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            DrawCommand::Clear(_) => CommandKind::Clear,
            DrawCommand::Rect { .. } => CommandKind::Rect,
            DrawCommand::Polygon { .. } => CommandKind::Polygon,
            DrawCommand::Circle { .. } => CommandKind::Circle,
            DrawCommand::Polyline { .. } => CommandKind::Polyline,
            DrawCommand::Text { .. } => CommandKind::Text,
        }
    }
}

/// Surface that records draw calls, for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Option<CanvasSize>,
    rejected: Vec<CommandKind>,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Some(CanvasSize::new(width, height)),
            ..Default::default()
        }
    }

    /// A surface whose context can never be acquired.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Makes every call of `kind` fail.
    pub fn rejecting(mut self, kind: CommandKind) -> Self {
        self.rejected.push(kind);
        self
    }

    pub fn count(&self, kind: CommandKind) -> usize {
        self.commands
            .iter()
            .filter(|command| command.kind() == kind)
            .count()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }

    fn push(&mut self, command: DrawCommand) -> RenderResult<()> {
        let kind = command.kind();
        if self.rejected.contains(&kind) {
            return Err(RenderError::Rejected(format!("{kind:?}")));
        }
        self.commands.push(command);
        Ok(())
    }
}

impl DrawSurface for RecordingSurface {
    fn acquire(&mut self) -> RenderResult<CanvasSize> {
        self.commands.clear();
        self.size
            .ok_or_else(|| RenderError::SurfaceUnavailable("no drawing context".into()))
    }

    fn clear(&mut self, color: Rgba) -> RenderResult<()> {
        self.push(DrawCommand::Clear(color))
    }

    fn fill_rect(&mut self, origin: ScreenPoint, size: CanvasSize, color: Rgba) -> RenderResult<()> {
        ensure_finite(&[origin, ScreenPoint::new(size.width, size.height)], "fill_rect")?;
        self.push(DrawCommand::Rect {
            origin,
            size,
            color,
        })
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Rgba) -> RenderResult<()> {
        ensure_finite(points, "fill_polygon")?;
        self.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        })
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Rgba) -> RenderResult<()> {
        ensure_finite(&[center, ScreenPoint::new(radius, 0.0)], "fill_circle")?;
        self.push(DrawCommand::Circle {
            center,
            radius,
            color,
        })
    }

    fn stroke_polyline(&mut self, points: &[ScreenPoint], style: &StrokeStyle) -> RenderResult<()> {
        ensure_finite(points, "stroke_polyline")?;
        self.push(DrawCommand::Polyline {
            points: points.to_vec(),
            style: style.clone(),
        })
    }

    fn fill_text(
        &mut self,
        position: ScreenPoint,
        content: &str,
        style: &TextStyle,
    ) -> RenderResult<()> {
        ensure_finite(&[position], "fill_text")?;
        self.push(DrawCommand::Text {
            position,
            content: content.to_string(),
            style: style.clone(),
        })
    }
}
