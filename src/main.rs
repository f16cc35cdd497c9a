//! Polyglow entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use polyglow::platform::{Autopilot, FpsCounter, InputState};
    use polyglow::renderer::{CanvasSurface, DrawSurface, GpuSurface, RenderError, draw_frame};
    use polyglow::sim::{Frame, SimState, Viewport, tick};
    use polyglow::{RendererKind, ScenePreset, Settings};

    /// Whichever backend the settings picked
    enum Surface {
        Canvas(CanvasSurface),
        Gpu(GpuSurface),
    }

    impl Surface {
        fn resize(&mut self, width: u32, height: u32) {
            match self {
                Surface::Canvas(canvas) => canvas.resize(width, height),
                Surface::Gpu(gpu) => gpu.resize(width, height),
            }
        }

        fn draw(&mut self, frame: &Frame) {
            let result = match self {
                Surface::Canvas(canvas) => draw_frame(canvas, frame),
                Surface::Gpu(gpu) => draw_frame(gpu, frame),
            };
            match result {
                Ok(()) => {}
                Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                    if let Surface::Gpu(gpu) = self {
                        gpu.reconfigure();
                    }
                }
                Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {}", e),
            }
        }
    }

    /// App instance holding all state
    struct App {
        state: SimState,
        input: InputState,
        autopilot: Autopilot,
        autopilot_on: bool,
        fps: FpsCounter,
        settings: Settings,
        surface: Surface,
        canvas: HtmlCanvasElement,
    }

    impl App {
        /// Match the backing store to the element's CSS size
        fn sync_size(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;

            if width > 0 && height > 0 && (width, height) != (self.canvas.width(), self.canvas.height()) {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                self.surface.resize(width, height);
                log::debug!("Canvas resized to {}x{}", width, height);
            }
            self.state.resize(self.canvas.width(), self.canvas.height());
        }

        fn frame(&mut self, time: f64) {
            self.sync_size();

            let frame = if self.autopilot_on {
                let frame = tick(&mut self.state, &self.autopilot, time);
                // Steer for the next frame by the delta this one consumed
                self.autopilot
                    .update(self.state.frame_delta_ms, &self.state.viewport);
                frame
            } else {
                tick(&mut self.state, &self.input, time)
            };
            self.surface.draw(&frame);

            let fps = self.fps.record(time);
            if self.settings.show_fps {
                update_hud(fps);
            }
        }

        fn switch_preset(&mut self, preset: ScenePreset) {
            match SimState::from_preset(preset, self.state.viewport) {
                Ok(mut state) => {
                    state.effects = self.settings.effects();
                    self.state = state;
                    self.settings.preset = preset;
                    self.settings.save();
                    log::info!("Scene: {}", preset.as_str());
                }
                Err(e) => log::error!("Scene {} is invalid: {}", preset.as_str(), e),
            }
        }

        fn toggle_autopilot(&mut self) {
            self.autopilot_on = !self.autopilot_on;
            self.input.release_all();
            log::info!("Autopilot: {}", self.autopilot_on);
        }

        fn toggle_reduced_motion(&mut self) {
            self.settings.reduced_motion = !self.settings.reduced_motion;
            self.state.effects = self.settings.effects();
            self.settings.save();
            log::info!("Reduced motion: {}", self.settings.reduced_motion);
        }
    }

    /// Update HUD elements in DOM
    fn update_hud(fps: u32) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
            el.set_text_content(Some(&fps.to_string()));
        }
    }

    /// Client coordinates to canvas pixels
    fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let sx = if rect.width() > 0.0 { canvas.width() as f64 / rect.width() } else { 1.0 };
        let sy = if rect.height() > 0.0 { canvas.height() as f64 / rect.height() } else { 1.0 };
        Vec2::new(
            ((client_x as f64 - rect.left()) * sx) as f32,
            ((client_y as f64 - rect.top()) * sy) as f32,
        )
    }

    fn to_js(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// A canvas that already handed out a WebGPU context can't give a 2D one
    fn fresh_canvas(canvas: &HtmlCanvasElement) -> Result<HtmlCanvasElement, JsValue> {
        let fresh: HtmlCanvasElement = canvas.clone_node()?.dyn_into()?;
        canvas.replace_with_with_node_1(&fresh)?;
        Ok(fresh)
    }

    async fn init_gpu(canvas: &HtmlCanvasElement) -> Result<GpuSurface, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        GpuSurface::new(surface, &adapter, canvas.width(), canvas.height()).await
    }

    async fn init_surface(
        canvas: HtmlCanvasElement,
        kind: RendererKind,
    ) -> Result<(HtmlCanvasElement, Surface), JsValue> {
        if kind == RendererKind::WebGpu {
            let has_gpu = web_sys::window()
                .map(|w| js_sys::Reflect::has(&w.navigator(), &JsValue::from_str("gpu")).unwrap_or(false))
                .unwrap_or(false);

            if !has_gpu {
                log::warn!("WebGPU not exposed by this browser, using Canvas 2D");
            } else {
                match init_gpu(&canvas).await {
                    Ok(gpu) => {
                        log::info!("Renderer: {}", kind.as_str());
                        return Ok((canvas, Surface::Gpu(gpu)));
                    }
                    Err(e) => {
                        log::warn!("WebGPU init failed ({}), using Canvas 2D", e);
                        let fresh = fresh_canvas(&canvas)?;
                        let surface = CanvasSurface::new(fresh.clone()).map_err(to_js)?;
                        return Ok((fresh, Surface::Canvas(surface)));
                    }
                }
            }
        }

        log::info!("Renderer: {}", RendererKind::Canvas2d.as_str());
        let surface = CanvasSurface::new(canvas.clone()).map_err(to_js)?;
        Ok((canvas, Surface::Canvas(surface)))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Polyglow starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let mut state = SimState::from_preset(settings.preset, Viewport::from_pixels(width, height)).map_err(to_js)?;
        state.effects = settings.effects();
        log::info!("Scene: {}", settings.preset.as_str());

        let (canvas, surface) = init_surface(canvas, settings.renderer).await?;

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            state,
            input: InputState::new(),
            autopilot: Autopilot::new(seed),
            autopilot_on: settings.autopilot,
            fps: FpsCounter::new(),
            settings,
            surface,
            canvas: canvas.clone(),
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_focus_handlers(app.clone());

        request_animation_frame(app);

        log::info!("Polyglow running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Mouse move
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                app.borrow_mut().input.pointer_moved(point);
            });
            let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse buttons
        for (name, down) in [("mousedown", true), ("mouseup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().input.pointer_pressed(down);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start/move steer like the mouse
        for name in ["touchstart", "touchmove"] {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let point = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                    let mut app = app.borrow_mut();
                    app.input.pointer_moved(point);
                    app.input.pointer_pressed(true);
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().input.pointer_pressed(false);
            });
            let _ = canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard down: movement keys by code, toggles by key
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut app = app.borrow_mut();
                if app.input.key_event(&event.code(), true) {
                    event.prevent_default();
                    return;
                }
                if event.repeat() {
                    return;
                }
                match event.key().as_str() {
                    "i" | "I" => app.toggle_autopilot(),
                    "p" | "P" => {
                        let next = app.settings.preset.next();
                        app.switch_preset(next);
                    }
                    "m" | "M" => app.toggle_reduced_motion(),
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().input.key_event(&event.code(), false);
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut app = app.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.input.release_all();
                    log::info!("Tab hidden, input released");
                } else {
                    // Don't feed the hidden interval to the entities
                    app.state.clock.reset();
                    log::info!("Tab visible, clock reset");
                }
            });
            let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: key-up events won't arrive
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().input.release_all();
                log::debug!("Window blur, input released");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = web_app::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use polyglow::consts::HEADLESS_FRAME_MS;
    use polyglow::platform::Autopilot;
    use polyglow::renderer::{DrawSurface, RecordingSurface, draw_frame};
    use polyglow::sim::{SceneConfig, SimState, Viewport, tick};
    use polyglow::{ScenePreset, Settings};

    const WIDTH: u32 = 1280;
    const HEIGHT: u32 = 720;
    const DEFAULT_FRAMES: u64 = 600;

    /// `polyglow [preset | scene.json] [frames]`
    pub fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
        let settings = Settings::load();
        let viewport = Viewport::from_pixels(WIDTH, HEIGHT);

        let mut state = match args.first() {
            Some(path) if path.ends_with(".json") => {
                let json = std::fs::read_to_string(path)?;
                log::info!("Scene: {}", path);
                SimState::new(&SceneConfig::from_json(&json)?, viewport)?
            }
            Some(name) => {
                let preset = ScenePreset::from_str(name).ok_or_else(|| format!("unknown preset '{}'", name))?;
                log::info!("Scene: {}", preset.as_str());
                SimState::from_preset(preset, viewport)?
            }
            None => {
                log::info!("Scene: {}", settings.preset.as_str());
                SimState::from_preset(settings.preset, viewport)?
            }
        };
        state.effects = settings.effects();

        let frames = match args.get(1) {
            Some(n) => n.parse::<u64>()?,
            None => DEFAULT_FRAMES,
        };

        let mut autopilot = Autopilot::new(1);
        let mut surface = RecordingSurface::new(WIDTH, HEIGHT);

        for n in 0..frames {
            let now = n as f64 * HEADLESS_FRAME_MS;
            let frame = tick(&mut state, &autopilot, now);
            autopilot.update(state.frame_delta_ms, &state.viewport);
            draw_frame(&mut surface, &frame)?;

            if n % 60 == 0 {
                let tracked = state.tracked();
                log::info!(
                    "frame {:>5}: tracked at ({:.1}, {:.1}), camera ({:.1}, {:.1}), {} draw calls",
                    n,
                    tracked.position.x,
                    tracked.position.y,
                    state.camera.offset.x,
                    state.camera.offset.y,
                    surface.commands().len()
                );
            }
        }

        let (w, h) = surface.size();
        println!(
            "Rendered {} frames at {}x{}; tracked entity ended at ({:.1}, {:.1})",
            surface.frames_finished(),
            w,
            h,
            state.tracked().position.x,
            state.tracked().position.y
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Polyglow (native) starting...");
    log::info!("Native mode runs headless with the autopilot - run with `trunk serve` for the web version");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = headless::run(&args) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
