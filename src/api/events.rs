use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Coord;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{ClickHandler, DragEndHandler, DragSelection};
use crate::render::{ResizeCallback, ResizeEvent, Renderer};

use super::{LegendClickEvent, LegendHandler, ScatterChart};

/// Every event a chart can emit, routed to the component owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartEventKind {
    /// Guide: pointer press and release without motion.
    Click,
    /// Guide: drag-select finished.
    DragEnd,
    /// Legend: an entry was checked or unchecked.
    ClickLegend,
    /// Viewport: the chart was resized.
    Resize,
}

/// Typed event handler; the variant selects the target component.
pub enum ChartEventHandler {
    Click(ClickHandler),
    DragEnd(DragEndHandler),
    ClickLegend(LegendHandler),
    Resize(ResizeCallback),
}

impl fmt::Debug for ChartEventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ChartEventHandler").field(&self.kind()).finish()
    }
}

impl ChartEventHandler {
    #[must_use]
    pub fn click(handler: impl FnMut(Coord) + 'static) -> Self {
        Self::Click(Box::new(handler))
    }

    #[must_use]
    pub fn drag_end(handler: impl FnMut(DragSelection) + 'static) -> Self {
        Self::DragEnd(Box::new(handler))
    }

    #[must_use]
    pub fn click_legend(handler: impl FnMut(&LegendClickEvent) + 'static) -> Self {
        Self::ClickLegend(Box::new(handler))
    }

    #[must_use]
    pub fn resize(handler: impl FnMut(ResizeEvent) + 'static) -> Self {
        Self::Resize(Box::new(handler))
    }

    #[must_use]
    pub fn kind(&self) -> ChartEventKind {
        match self {
            Self::Click(_) => ChartEventKind::Click,
            Self::DragEnd(_) => ChartEventKind::DragEnd,
            Self::ClickLegend(_) => ChartEventKind::ClickLegend,
            Self::Resize(_) => ChartEventKind::Resize,
        }
    }
}

impl<R: Renderer> ScatterChart<R> {
    /// Registers `handler`, replacing any previous handler of the same kind.
    ///
    /// Guide and legend events fail when that component is disabled.
    pub fn on(&mut self, handler: ChartEventHandler) -> ChartResult<()> {
        let kind = handler.kind();
        match handler {
            ChartEventHandler::Click(handler) => self.guide_mut(kind)?.on_click(handler),
            ChartEventHandler::DragEnd(handler) => self.guide_mut(kind)?.on_drag_end(handler),
            ChartEventHandler::ClickLegend(handler) => self.legend_mut(kind)?.on_click(handler),
            ChartEventHandler::Resize(handler) => self.viewport.on_resize(handler),
        }
        debug!(?kind, "event handler registered");
        Ok(())
    }

    pub fn off(&mut self, kind: ChartEventKind) -> ChartResult<()> {
        match kind {
            ChartEventKind::Click => self.guide_mut(kind)?.off_click(),
            ChartEventKind::DragEnd => self.guide_mut(kind)?.off_drag_end(),
            ChartEventKind::ClickLegend => self.legend_mut(kind)?.off_click(),
            ChartEventKind::Resize => self.viewport.off_resize(),
        }
        debug!(?kind, "event handler removed");
        Ok(())
    }

    fn guide_mut(&mut self, kind: ChartEventKind) -> ChartResult<&mut crate::interaction::Guide> {
        self.guide
            .as_mut()
            .ok_or(ChartError::EventTargetUnavailable(kind))
    }

    fn legend_mut(&mut self, kind: ChartEventKind) -> ChartResult<&mut super::Legend> {
        self.legend
            .as_mut()
            .ok_or(ChartError::EventTargetUnavailable(kind))
    }
}
