use std::{io::Write, time::Duration};

use crate::{ArrayModel, EventSink, Result, StepEvent};

/// Colour role of a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarColor {
    Base,
    /// The step's primary index.
    Active,
    /// The step's secondary index.
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub height: u32,
    pub color: BarColor,
}

/// Everything needed to paint the chart once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub bars: Vec<Bar>,
    pub caption: Option<String>,
}

impl Frame {
    pub fn new(values: &[u32], primary: Option<usize>, secondary: Option<usize>) -> Self {
        let bars = values
            .iter()
            .enumerate()
            .map(|(index, &height)| {
                let color = if Some(index) == primary {
                    BarColor::Active
                } else if Some(index) == secondary {
                    BarColor::Secondary
                } else {
                    BarColor::Base
                };
                Bar { height, color }
            })
            .collect();
        Self {
            bars,
            caption: None,
        }
    }

    pub fn from_step(event: &StepEvent, values: &[u32]) -> Self {
        Self {
            caption: Some(event.to_string()),
            ..Self::new(values, Some(event.primary), event.secondary)
        }
    }

    /// Paints from the live model, consuming its highlight slots.
    pub fn capture(array: &ArrayModel) -> Result<Self> {
        let (primary, secondary) = array.take_highlights();
        let values = array.snapshot()?;
        Ok(Self::new(&values, primary, secondary))
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Something that can paint frames.
pub trait Renderer {
    fn draw(&mut self, frame: &Frame) -> Result<()>;
}

/// Draws the chart as rows of characters, tallest bar on top.
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
    rows: u16,
    surface_height: u32,
    color: bool,
    clear: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, rows: u16, surface_height: u32) -> Self {
        Self {
            out,
            rows: rows.max(1),
            surface_height: surface_height.max(1),
            color: false,
            clear: false,
        }
    }

    /// Uses ANSI colours and redraws in place instead of scrolling.
    pub fn interactive(mut self) -> Self {
        self.color = true;
        self.clear = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar_rows(&self, height: u32) -> u32 {
        let rows = u64::from(self.rows);
        let scaled = u64::from(height.min(self.surface_height)) * rows;
        scaled.div_ceil(u64::from(self.surface_height)) as u32
    }

    fn glyph(&self, color: BarColor) -> &'static str {
        match (self.color, color) {
            (false, BarColor::Base) => "#",
            (false, BarColor::Active) => "@",
            (false, BarColor::Secondary) => "+",
            (true, BarColor::Base) => "\x1b[34m█\x1b[0m",
            (true, BarColor::Active) => "\x1b[31m█\x1b[0m",
            (true, BarColor::Secondary) => "\x1b[32m█\x1b[0m",
        }
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, frame: &Frame) -> Result<()> {
        let heights: Vec<u32> = frame.bars.iter().map(|bar| self.bar_rows(bar.height)).collect();
        let mut screen = String::new();
        if self.clear {
            screen.push_str("\x1b[H\x1b[2J");
        }
        for row in (1..=u32::from(self.rows)).rev() {
            for (bar, &filled) in frame.bars.iter().zip(&heights) {
                screen.push_str(if filled >= row { self.glyph(bar.color) } else { " " });
            }
            screen.push('\n');
        }
        if let Some(caption) = &frame.caption {
            screen.push_str(caption);
            screen.push('\n');
        }
        self.out.write_all(screen.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn draw(&mut self, frame: &Frame) -> Result<()> {
        (**self).draw(frame)
    }
}

/// Adapts a [`Renderer`] to the event stream.
#[derive(Debug)]
pub struct RenderSink<R> {
    renderer: R,
}

impl<R: Renderer> RenderSink<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn into_inner(self) -> R {
        self.renderer
    }
}

impl<R: Renderer> EventSink for RenderSink<R> {
    fn on_step(&mut self, event: &StepEvent, values: &[u32], _pace: Duration) {
        if let Err(err) = self.renderer.draw(&Frame::from_step(event, values)) {
            tracing::warn!(%err, "failed to draw frame");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::StepKind;

    #[test]
    fn colours_primary_and_secondary() {
        let frame = Frame::new(&[1, 2, 3], Some(2), Some(0));
        let colors: Vec<_> = frame.bars.iter().map(|bar| bar.color).collect();
        assert_eq!(
            colors,
            vec![BarColor::Secondary, BarColor::Base, BarColor::Active]
        );
    }

    #[test]
    fn capture_consumes_highlights() {
        let array = ArrayModel::from_values(vec![5, 6]);
        array.mark(1, None);

        let first = Frame::capture(&array).unwrap();
        assert_eq!(first.bars[1].color, BarColor::Active);
        let second = Frame::capture(&array).unwrap();
        assert!(second.bars.iter().all(|bar| bar.color == BarColor::Base));
    }

    #[test]
    fn draws_scaled_columns() {
        let mut renderer = TextRenderer::new(Vec::new(), 4, 100);
        let event = StepEvent::new(StepKind::Swap, 1, 100).with_secondary(2);
        renderer
            .draw(&Frame::from_step(&event, &[25, 100, 50]))
            .unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text, " @ \n @ \n @+\n#@+\nSwap #1 ~ #2 = 100\n");
    }

    #[derive(Clone, Default)]
    struct Count(Arc<AtomicUsize>);

    impl Renderer for Count {
        fn draw(&mut self, _frame: &Frame) -> Result<()> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    #[test]
    fn boxed_renderers_drive_a_render_sink() {
        let count = Count::default();
        let boxed: Box<dyn Renderer> = Box::new(count.clone());
        let mut sink = RenderSink::new(boxed);
        let swap = StepEvent::new(StepKind::Swap, 0, 4).with_secondary(1);
        sink.on_step(&swap, &[4, 8], Duration::ZERO);
        sink.on_step(&StepEvent::new(StepKind::Compare, 1, 8), &[4, 8], Duration::ZERO);

        assert_eq!(count.0.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn render_sink_draws_once_per_event() {
        let mut sink = RenderSink::new(TextRenderer::new(Vec::new(), 1, 10));
        sink.on_step(&StepEvent::new(StepKind::Finalize, 0, 10), &[10, 10], Duration::ZERO);
        sink.on_step(&StepEvent::new(StepKind::Finalize, 1, 10), &[10, 10], Duration::ZERO);

        let text = String::from_utf8(sink.into_inner().into_inner()).unwrap();
        assert_eq!(text.matches("Finalize").count(), 2);
        assert!(text.starts_with("@#\n"));
    }
}
