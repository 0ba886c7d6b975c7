use std::collections::HashMap;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use image::DynamicImage;
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use spinview_core::{
    Effect, PointerInput, SourceTemplate, SpinConfig, SpinViewer, ViewerOptions,
};

use crate::event::{AppEvent, EventHandler, FrameLoadResult};
use crate::loader::FrameLoader;
use crate::widgets::SpinViewWidget;

/// Viewer construction parameters from the host binary.
pub struct SpinSetup {
    /// Locator template with a `$FRAME` placeholder
    pub template: String,
    pub frame_count: usize,
    /// Fetch every frame, or fall back to the reduced step pattern
    pub smooth: bool,
    pub config: SpinConfig,
}

/// Application state: the engine plus the host side of its contract.
pub struct App {
    pub viewer: SpinViewer,
    /// Decoded frames by index
    pub images: HashMap<usize, DynamicImage>,
    /// Frame currently shown, driven by the engine's focus effects
    pub visible: Option<usize>,
    pub loading_visible: bool,
    pub grabbing: bool,
    pub fully_loaded: bool,
    results: mpsc::UnboundedReceiver<FrameLoadResult>,
    should_quit: bool,
}

impl App {
    /// Build the engine, fetch frame 0 inline, and kick off the
    /// background fetches for the rest of the frame set.
    pub async fn new(setup: SpinSetup, viewport_width: u16) -> Result<Self> {
        let (loader, results) = FrameLoader::new()?;
        let template = SourceTemplate::new(setup.template);

        // Frame 0 is the initial visible image: the viewer is built on
        // the invariant that it is already loaded.
        let first = loader
            .load_now(&template.locator_for(0))
            .await
            .context("failed to load the initial frame")?;

        let (viewer, requests) = SpinViewer::new(
            ViewerOptions {
                frame_count: setup.frame_count,
                source_template: template,
                viewport_width: f64::from(viewport_width),
                smooth: setup.smooth,
                config: setup.config,
            },
            Instant::now(),
        )?;

        for request in requests {
            loader.spawn(request);
        }

        let mut images = HashMap::new();
        images.insert(0, first);

        Ok(Self {
            viewer,
            images,
            visible: None,
            loading_visible: false,
            grabbing: false,
            fully_loaded: false,
            results,
            should_quit: false,
        })
    }

    /// Main loop: feed completions and input into the engine, apply its
    /// effects, draw, sleep until the next engine deadline.
    pub fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &EventHandler,
    ) -> Result<()> {
        while !self.should_quit {
            while let Ok(result) = self.results.try_recv() {
                self.on_frame_result(result);
            }

            self.viewer.tick(Instant::now());
            self.apply_effects();

            terminal.draw(|frame| SpinViewWidget::render(frame, frame.area(), self))?;

            if let Some(event) = events.next(self.viewer.next_deadline())? {
                self.on_event(event);
            }
        }

        Ok(())
    }

    fn on_event(&mut self, event: AppEvent) {
        let now = Instant::now();
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Mouse(mouse) => self.on_mouse(mouse, now),
            AppEvent::Resize(width, _) => self.viewer.set_viewport_width(f64::from(width)),
            AppEvent::Tick => {}
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Esc, _) => {
                self.should_quit = true;
            }
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => self.should_quit = true,
            // keyboard stepping follows the drag sign convention:
            // left walks forward through the frames, right walks back
            (KeyCode::Char('h') | KeyCode::Left, _) => self.viewer.change(1),
            (KeyCode::Char('l') | KeyCode::Right, _) => self.viewer.change(-1),
            _ => {}
        }
    }

    /// Terminal cells stand in for pixels: the drag math only needs the
    /// same unit it derived the rotate threshold from.
    fn on_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let input = PointerInput::mouse(f64::from(mouse.column), f64::from(mouse.row));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.viewer.pointer_down(input, now),
            MouseEventKind::Drag(MouseButton::Left) => {
                let _consumed = self.viewer.pointer_move(input, now);
            }
            MouseEventKind::Up(MouseButton::Left) => self.viewer.pointer_up(input, now),
            _ => {}
        }
    }

    fn on_frame_result(&mut self, result: FrameLoadResult) {
        match result {
            FrameLoadResult::Success { index, image } => {
                self.images.insert(index, image);
                self.viewer.frame_loaded(index);
            }
            FrameLoadResult::Failure { index, error } => {
                // the frame stays unloaded and its index unreachable;
                // degraded, not fatal
                warn!(index, error = %error, "frame unavailable");
            }
        }
    }

    fn apply_effects(&mut self) {
        for effect in self.viewer.take_effects() {
            match effect {
                Effect::Focus { next, .. } => self.visible = Some(next),
                Effect::LoadingVisible(visible) => self.loading_visible = visible,
                Effect::CursorGrabbing(grabbing) => self.grabbing = grabbing,
                Effect::FullyLoaded => {
                    debug!("all frames loaded");
                    self.fully_loaded = true;
                }
            }
        }
    }
}
