//! Clip session: selection, annotation and export over a captured page
//!
//! A session is created by [`Session::begin`], fed with [`Msg`] values and ends on
//! confirm or cancel. Everything the session shows goes through the injected [`Host`]
//! and [`Toolbar`]; everything it reports goes out on the event channel and the
//! oneshot outcome in [`SessionHandle`].

pub mod export;
pub mod selection;
pub mod toolbar;

use crossbeam_channel::{Receiver, Sender};
use tiny_skia::Pixmap;
use tokio::sync::oneshot;

use crate::annotations::AnnotationEngine;
use crate::capture::{CaptureOptions, PageRasterizer};
use crate::config::PageClipConfig;
use crate::core::host::{Host, Layer};
use crate::domain::{ClipRegion, Cursor, Point, Size};
use crate::error::{Error, Result};
use crate::render::overlay::Overlay;
use crate::session::messages::{Button, Msg, PointerMsg, SessionEvent, TextMsg, ToolbarMsg};

use self::export::ExportResult;
use self::selection::SelectionController;
use self::toolbar::{Toolbar, place_toolbar};

/// Page geometry the session works in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    /// Visible area covered by the mask
    pub viewport: Size,
    /// Bounds that translation clamps to
    pub client: Size,
    /// Device pixels per viewport pixel
    pub pixel_ratio: f32,
    /// Page scroll offset at capture time
    pub scroll: Point,
}

impl DisplayMetrics {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            client: viewport,
            pixel_ratio: 1.0,
            scroll: Point::default(),
        }
    }
}

/// Caller's side of a session
pub struct SessionHandle {
    /// Resolves with the export on confirm, `None` on cancel
    pub outcome: oneshot::Receiver<Option<ExportResult>>,
    pub events: Receiver<SessionEvent>,
}

pub struct Session<T: Toolbar, H: Host> {
    config: PageClipConfig,
    metrics: DisplayMetrics,
    snapshot: Option<Pixmap>,
    selection: SelectionController,
    overlay: Overlay,
    annotations: AnnotationEngine,
    toolbar: T,
    host: H,
    cursor: Cursor,
    events: Sender<SessionEvent>,
    outcome: Option<oneshot::Sender<Option<ExportResult>>>,
    active: bool,
}

impl<T: Toolbar, H: Host> Session<T, H> {
    /// Capture the page and mount the selection overlay
    pub async fn begin(
        config: PageClipConfig,
        metrics: DisplayMetrics,
        rasterizer: &dyn PageRasterizer,
        mut toolbar: T,
        mut host: H,
    ) -> Result<(Self, SessionHandle)> {
        let options = CaptureOptions {
            ignore_elements: config.ignore_elements.clone(),
        };
        let snapshot = rasterizer
            .capture(&options)
            .await
            .map_err(|err| Error::Capture(format!("{err:#}")))?
            .to_pixmap()?;

        let mut overlay = Overlay::new(metrics.viewport, &config)?;
        overlay.render(None, None);
        let annotations = AnnotationEngine::new(&config)?;
        let selection = SelectionController::new(metrics.client, config.dot_radius);

        let full = ClipRegion::new(0.0, 0.0, metrics.viewport.width, metrics.viewport.height);
        for layer in [Layer::Snapshot, Layer::Mask, Layer::Toolbar] {
            host.mount(layer, full, config.z_index + layer.z_offset());
        }
        toolbar.hide();

        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        let (outcome_tx, outcome_rx) = oneshot::channel();
        log::info!(
            "Clip session started ({}x{} viewport, ratio {})",
            metrics.viewport.width,
            metrics.viewport.height,
            metrics.pixel_ratio
        );

        let session = Self {
            config,
            metrics,
            snapshot: Some(snapshot),
            selection,
            overlay,
            annotations,
            toolbar,
            host,
            cursor: Cursor::Default,
            events: events_tx,
            outcome: Some(outcome_tx),
            active: true,
        };
        let handle = SessionHandle {
            outcome: outcome_rx,
            events: events_rx,
        };
        Ok((session, handle))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn metrics(&self) -> DisplayMetrics {
        self.metrics
    }

    /// Normalized clip region, if one was drawn
    pub fn region(&self) -> Option<ClipRegion> {
        self.selection.region()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn annotations(&self) -> &AnnotationEngine {
        &self.annotations
    }

    pub fn toolbar(&self) -> &T {
        &self.toolbar
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Dispatch one input message. Input after the session ended is ignored.
    pub async fn handle(&mut self, msg: Msg) -> Result<()> {
        if !self.active {
            log::debug!("Ignoring {msg:?}: session has ended");
            return Ok(());
        }
        match msg {
            Msg::Pointer(msg) => self.handle_pointer(msg),
            Msg::Toolbar(msg) => self.handle_toolbar(msg).await,
            Msg::Text(msg) => {
                self.handle_text(msg);
                Ok(())
            }
        }
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    fn handle_pointer(&mut self, msg: PointerMsg) -> Result<()> {
        match msg {
            PointerMsg::Down { button: Button::Right, .. } => {
                self.cancel();
                Ok(())
            }
            PointerMsg::Down { button: Button::Middle, .. } => Ok(()),
            PointerMsg::Down { x, y, .. } => {
                let point = Point::new(x, y);
                if self.routes_to_annotations(point) {
                    let local = self.annotations.to_local(point);
                    return self.annotations.pointer_down(local);
                }
                // Off the surface a click only finishes pending text
                if self.annotations.text_session().is_some() {
                    self.annotations.commit_text();
                    return Ok(());
                }
                // Strokes pin the region in place
                if self.annotations.stack_len() > 0 {
                    return Ok(());
                }
                self.selection.pointer_down(point, true)
            }
            PointerMsg::Move { x, y } => {
                let point = Point::new(x, y);
                if self.annotations.is_dragging() {
                    let local = self.annotations.to_local(point);
                    self.annotations.pointer_move(local);
                    return Ok(());
                }
                let handles_enabled = self.annotations.stack_len() == 0;
                let outcome = self.selection.pointer_move(point, handles_enabled);
                if outcome.region_changed {
                    self.render_overlay();
                    self.place_toolbar();
                }
                if let Some(cursor) = outcome.cursor {
                    self.set_cursor(cursor);
                }
                Ok(())
            }
            PointerMsg::Up { .. } => {
                if self.annotations.is_dragging() {
                    self.annotations.pointer_up();
                    return Ok(());
                }
                if let Some(region) = self.selection.pointer_up() {
                    self.region_selected(region);
                }
                Ok(())
            }
        }
    }

    /// The annotation surface takes pointer input that lands on it while mounted
    fn routes_to_annotations(&self, point: Point) -> bool {
        self.annotations.is_attached()
            && self
                .annotations
                .contains_local(self.annotations.to_local(point))
    }

    fn region_selected(&mut self, region: ClipRegion) {
        log::debug!("Region selected: {region:?}");
        self.render_overlay();
        if let Err(err) = self.annotations.update_canvas_position(region) {
            log::error!("Annotation surface left in place: {err}");
        }
        if self.annotations.is_attached() {
            self.host.place(Layer::Annotations, region);
        }
        self.place_toolbar();
        self.toolbar.show();
        self.emit(SessionEvent::RegionSelected(region));
    }

    fn render_overlay(&mut self) {
        let region = self.selection.region();
        let handles = self.selection.handles();
        self.overlay.render(region.as_ref(), handles.as_ref());
    }

    fn place_toolbar(&mut self) {
        let Some(region) = self.selection.region() else {
            return;
        };
        let placement = place_toolbar(
            &region,
            &self.toolbar.size(),
            self.metrics.client,
            self.config.dot_radius,
        );
        self.toolbar.set_position(placement);
        self.emit(SessionEvent::ToolbarPlaced(placement));
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        if self.cursor == cursor {
            return;
        }
        self.cursor = cursor;
        self.host.set_cursor(cursor);
        self.emit(SessionEvent::CursorChanged(cursor));
    }

    // ========================================================================
    // Toolbar
    // ========================================================================

    async fn handle_toolbar(&mut self, msg: ToolbarMsg) -> Result<()> {
        match msg {
            ToolbarMsg::ToolSelected(options) => {
                if self.selection.region().is_none() {
                    log::warn!("Tool {:?} selected before a region exists", options.kind);
                    return Ok(());
                }
                self.annotations.set_tool(Some(options));
                self.annotations.attach(&mut self.host);
                self.toolbar.set_active_option_panel(
                    options.size,
                    options.color,
                    options.kind.option_mode(),
                );
            }
            ToolbarMsg::ToolDeselected => {
                self.annotations.set_tool(None);
                if self.annotations.stack_len() == 0 {
                    self.annotations.detach(&mut self.host);
                }
            }
            ToolbarMsg::Undo => {
                if self.annotations.undo() == 0 {
                    self.annotations.set_tool(None);
                    self.annotations.detach(&mut self.host);
                    self.toolbar.reset();
                    self.emit(SessionEvent::AnnotationsExhausted);
                }
            }
            ToolbarMsg::Save => {
                let result = self.export().await?;
                let file_name = self.config.save_file();
                log::info!("Saving clip as {file_name}");
                self.emit(SessionEvent::Saved { file_name, result });
            }
            ToolbarMsg::Confirm => {
                let result = self.export().await?;
                if let Some(outcome) = self.outcome.take() {
                    let _ = outcome.send(Some(result));
                }
                self.emit(SessionEvent::Finished { confirmed: true });
                self.end();
            }
            ToolbarMsg::Cancel => self.cancel(),
        }
        Ok(())
    }

    /// Composite the region with its annotations and encode it
    pub async fn export(&mut self) -> Result<ExportResult> {
        // Pending text becomes part of the export
        self.annotations.commit_text();

        let snapshot = self.snapshot.as_ref().ok_or(Error::MissingSnapshot)?;
        let region = self.selection.region().ok_or(Error::MissingRegion)?;
        let annotations = (self.annotations.stack_len() > 0).then(|| self.annotations.surface());

        export::export(
            snapshot,
            &region,
            annotations,
            self.metrics.pixel_ratio,
            self.metrics.scroll,
            self.config.jpeg_quality,
        )
        .await
    }

    fn handle_text(&mut self, msg: TextMsg) {
        match msg {
            TextMsg::Insert { text } => self.annotations.insert_text(&text),
            TextMsg::Backspace => self.annotations.backspace(),
            TextMsg::Set { text } => self.annotations.set_text(text),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    fn cancel(&mut self) {
        log::info!("Clip session cancelled");
        self.end();
    }

    /// Unmount every surface and drop all session state.
    ///
    /// A session that was not confirmed resolves its outcome with `None`.
    pub fn end(&mut self) {
        if !self.active {
            return;
        }
        if let Some(outcome) = self.outcome.take() {
            let _ = outcome.send(None);
            self.emit(SessionEvent::Finished { confirmed: false });
        }

        self.annotations.set_tool(None);
        self.annotations.detach(&mut self.host);
        for layer in [Layer::Toolbar, Layer::Mask, Layer::Snapshot] {
            self.host.unmount(layer);
        }
        self.toolbar.reset();
        self.toolbar.hide();
        self.host.set_cursor(Cursor::Default);
        self.cursor = Cursor::Default;

        self.selection.reset();
        self.snapshot = None;
        self.active = false;
        log::debug!("Clip session ended");
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            log::trace!("Session event dropped: no listener");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Snapshot;
    use crate::config::ShapeColor;
    use crate::core::host::LogHost;
    use crate::domain::{ToolKind, ToolOptions};
    use futures::future::BoxFuture;
    use super::toolbar::{HeadlessToolbar, ToolbarPlacement, ToolbarSide, ToolbarSize};
    use crate::session::messages::TextMsg;

    struct SolidPage;

    impl PageRasterizer for SolidPage {
        fn capture<'a>(
            &'a self,
            _options: &'a CaptureOptions,
        ) -> BoxFuture<'a, anyhow::Result<Snapshot>> {
            Box::pin(async {
                Ok(Snapshot::new(image::RgbaImage::from_pixel(
                    800,
                    600,
                    image::Rgba([255, 255, 255, 255]),
                )))
            })
        }
    }

    type TestSession = Session<HeadlessToolbar, LogHost>;

    async fn begin() -> (TestSession, SessionHandle) {
        let toolbar = HeadlessToolbar::new(ToolbarSize {
            width: 120.0,
            toolbar_height: 30.0,
            option_panel_height: 20.0,
        });
        Session::begin(
            PageClipConfig::default(),
            DisplayMetrics::new(Size::new(400.0, 300.0)),
            &SolidPage,
            toolbar,
            LogHost::default(),
        )
        .await
        .unwrap()
    }

    async fn pointer(session: &mut TestSession, msg: PointerMsg) {
        session.handle(Msg::Pointer(msg)).await.unwrap();
    }

    async fn drag(session: &mut TestSession, from: (f32, f32), to: (f32, f32)) {
        pointer(
            session,
            PointerMsg::Down {
                x: from.0,
                y: from.1,
                button: Button::Left,
            },
        )
        .await;
        pointer(session, PointerMsg::Move { x: to.0, y: to.1 }).await;
        pointer(session, PointerMsg::Up { x: to.0, y: to.1 }).await;
    }

    async fn toolbar(session: &mut TestSession, msg: ToolbarMsg) {
        session.handle(Msg::Toolbar(msg)).await.unwrap();
    }

    #[tokio::test]
    async fn test_drag_selects_region_and_places_toolbar() {
        let (mut session, handle) = begin().await;
        assert_eq!(
            session.host().mounted,
            vec![Layer::Snapshot, Layer::Mask, Layer::Toolbar]
        );
        assert!(!session.toolbar().visible);

        drag(&mut session, (300.0, 200.0), (100.0, 50.0)).await;

        let region = ClipRegion::new(100.0, 50.0, 200.0, 150.0);
        assert_eq!(session.region(), Some(region));
        assert!(session.toolbar().visible);
        assert!(session.toolbar().placement.is_some());
        let events: Vec<_> = handle.events.try_iter().collect();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, SessionEvent::RegionSelected(r) if *r == region))
        );
        assert_eq!(
            session.annotations().frame(),
            ClipRegion::new(100.0, 50.0, 200.0, 150.0)
        );
        // Bottom-right anchored, one handle radius away from the region
        assert_eq!(
            session.toolbar().placement,
            Some(ToolbarPlacement {
                side: ToolbarSide::Bottom,
                left: 177.0,
                top: 203.0,
            })
        );
    }

    #[tokio::test]
    async fn test_click_without_drag_then_drag_confirms() {
        let (mut session, handle) = begin().await;
        let down = PointerMsg::Down {
            x: 50.0,
            y: 50.0,
            button: Button::Left,
        };
        pointer(&mut session, down).await;
        pointer(&mut session, PointerMsg::Up { x: 50.0, y: 50.0 }).await;
        assert!(session.region().is_none());
        assert!(!session.toolbar().visible);

        drag(&mut session, (100.0, 100.0), (200.0, 200.0)).await;
        assert_eq!(
            session.region(),
            Some(ClipRegion::new(100.0, 100.0, 100.0, 100.0))
        );
        toolbar(&mut session, ToolbarMsg::Confirm).await;
        let result = handle.outcome.await.unwrap().unwrap();
        assert_eq!(result.raster.dimensions(), (100, 100));
    }

    #[tokio::test]
    async fn test_middle_button_is_ignored() {
        let (mut session, _handle) = begin().await;
        let down = PointerMsg::Down {
            x: 10.0,
            y: 10.0,
            button: Button::Middle,
        };
        pointer(&mut session, down).await;
        pointer(&mut session, PointerMsg::Move { x: 100.0, y: 100.0 }).await;
        pointer(&mut session, PointerMsg::Up { x: 100.0, y: 100.0 }).await;
        assert!(session.is_active());
        assert!(session.region().is_none());
    }

    #[tokio::test]
    async fn test_click_off_surface_commits_open_text() {
        let (mut session, _handle) = begin().await;
        drag(&mut session, (100.0, 50.0), (300.0, 200.0)).await;
        toolbar(
            &mut session,
            ToolbarMsg::ToolSelected(ToolOptions::default_for(ToolKind::Text)),
        )
        .await;
        let down = PointerMsg::Down {
            x: 120.0,
            y: 70.0,
            button: Button::Left,
        };
        pointer(&mut session, down).await;
        session
            .handle(Msg::Text(TextMsg::Insert {
                text: "hello".to_string(),
            }))
            .await
            .unwrap();
        assert!(session.annotations().text_session().is_some());

        let outside = PointerMsg::Down {
            x: 350.0,
            y: 250.0,
            button: Button::Left,
        };
        pointer(&mut session, outside).await;
        pointer(&mut session, PointerMsg::Up { x: 350.0, y: 250.0 }).await;
        assert!(session.annotations().text_session().is_none());
        assert_eq!(session.annotations().stack_len(), 1);
        assert_eq!(
            session.region(),
            Some(ClipRegion::new(100.0, 50.0, 200.0, 150.0))
        );
    }

    #[tokio::test]
    async fn test_region_pinned_at_fractional_edge_under_strokes() {
        let (mut session, _handle) = begin().await;
        drag(&mut session, (100.0, 50.0), (200.4, 150.0)).await;
        let region = session.region().unwrap();
        toolbar(
            &mut session,
            ToolbarMsg::ToolSelected(ToolOptions::new(ToolKind::Rect, 2, ShapeColor::RED)),
        )
        .await;
        drag(&mut session, (120.0, 70.0), (160.0, 120.0)).await;
        assert_eq!(session.annotations().stack_len(), 1);

        // Past the rounded surface width but still inside the region
        drag(&mut session, (200.2, 100.0), (180.2, 100.0)).await;
        assert_eq!(session.region(), Some(region));
        assert_eq!(session.annotations().frame(), region);

        // With the tool put away, strokes still keep the region in place
        toolbar(&mut session, ToolbarMsg::ToolDeselected).await;
        drag(&mut session, (150.0, 100.0), (250.0, 200.0)).await;
        assert_eq!(session.region(), Some(region));
        assert_eq!(session.annotations().frame(), region);
    }

    #[tokio::test]
    async fn test_right_click_cancels() {
        let (mut session, handle) = begin().await;
        drag(&mut session, (10.0, 10.0), (100.0, 100.0)).await;
        pointer(
            &mut session,
            PointerMsg::Down {
                x: 50.0,
                y: 50.0,
                button: Button::Right,
            },
        )
        .await;

        assert!(!session.is_active());
        assert!(session.host().mounted.is_empty());
        assert!(session.region().is_none());
        assert!(handle.outcome.await.unwrap().is_none());

        // Input after the end is a no-op
        drag(&mut session, (10.0, 10.0), (100.0, 100.0)).await;
        assert!(session.region().is_none());
    }

    #[tokio::test]
    async fn test_annotate_and_confirm() {
        let (mut session, handle) = begin().await;
        drag(&mut session, (100.0, 50.0), (300.0, 200.0)).await;

        let options = ToolOptions::new(ToolKind::Rect, 3, ShapeColor::RED);
        toolbar(&mut session, ToolbarMsg::ToolSelected(options)).await;
        assert!(session.host().mounted.contains(&Layer::Annotations));
        assert!(session.toolbar().option_panel.is_some());

        drag(&mut session, (120.0, 70.0), (200.0, 150.0)).await;
        assert_eq!(session.annotations().stack_len(), 1);
        // The drag inside the region drew instead of moving the region
        assert_eq!(
            session.region(),
            Some(ClipRegion::new(100.0, 50.0, 200.0, 150.0))
        );

        toolbar(&mut session, ToolbarMsg::Confirm).await;
        assert!(!session.is_active());
        let result = handle.outcome.await.unwrap().unwrap();
        assert_eq!(result.raster.dimensions(), (200, 150));
        // Rectangle edge drawn in red over the white page
        let edge = result.raster.get_pixel(20, 60).0;
        assert!(edge[0] > 200 && edge[1] < 100);
        assert_eq!(result.raster.get_pixel(100, 140).0, [255, 255, 255, 255]);
    }

    #[tokio::test]
    async fn test_undo_exhaustion_resets_toolbar() {
        let (mut session, handle) = begin().await;
        drag(&mut session, (100.0, 50.0), (300.0, 200.0)).await;
        toolbar(
            &mut session,
            ToolbarMsg::ToolSelected(ToolOptions::default_for(ToolKind::Brush)),
        )
        .await;
        drag(&mut session, (120.0, 70.0), (200.0, 150.0)).await;

        toolbar(&mut session, ToolbarMsg::Undo).await;
        assert_eq!(session.annotations().stack_len(), 0);
        assert!(!session.annotations().is_attached());
        assert!(session.annotations().tool().is_none());
        assert!(session.toolbar().option_panel.is_none());
        assert!(
            handle
                .events
                .try_iter()
                .any(|e| matches!(e, SessionEvent::AnnotationsExhausted))
        );
    }

    #[tokio::test]
    async fn test_deselect_keeps_surface_while_strokes_exist() {
        let (mut session, _handle) = begin().await;
        drag(&mut session, (100.0, 50.0), (300.0, 200.0)).await;
        toolbar(
            &mut session,
            ToolbarMsg::ToolSelected(ToolOptions::default_for(ToolKind::Arrow)),
        )
        .await;
        toolbar(&mut session, ToolbarMsg::ToolDeselected).await;
        assert!(!session.annotations().is_attached());

        toolbar(
            &mut session,
            ToolbarMsg::ToolSelected(ToolOptions::default_for(ToolKind::Arrow)),
        )
        .await;
        drag(&mut session, (120.0, 70.0), (200.0, 150.0)).await;
        toolbar(&mut session, ToolbarMsg::ToolDeselected).await;
        assert!(session.annotations().is_attached());
        assert_eq!(session.annotations().stack_len(), 1);
    }

    #[tokio::test]
    async fn test_save_keeps_session_open() {
        let (mut session, handle) = begin().await;
        drag(&mut session, (0.0, 0.0), (50.0, 40.0)).await;
        toolbar(&mut session, ToolbarMsg::Save).await;

        assert!(session.is_active());
        let saved = handle.events.try_iter().find_map(|e| match e {
            SessionEvent::Saved { file_name, result } => Some((file_name, result)),
            _ => None,
        });
        let (file_name, result) = saved.unwrap();
        assert_eq!(file_name, "screenshot.jpg");
        assert_eq!(result.blob.mime, "image/jpeg");
    }

    #[tokio::test]
    async fn test_confirm_without_region_fails() {
        let (mut session, _handle) = begin().await;
        let err = session
            .handle(Msg::Toolbar(ToolbarMsg::Confirm))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingRegion));
        assert!(session.is_active());
    }

    #[tokio::test]
    async fn test_idle_hover_updates_cursor() {
        let (mut session, handle) = begin().await;
        drag(&mut session, (100.0, 100.0), (200.0, 200.0)).await;
        pointer(&mut session, PointerMsg::Move { x: 150.0, y: 150.0 }).await;
        assert_eq!(session.host().cursor, Cursor::Move);
        assert!(
            handle
                .events
                .try_iter()
                .any(|e| matches!(e, SessionEvent::CursorChanged(Cursor::Move)))
        );
    }
}
