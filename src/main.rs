//! Dino Bus entry point
//!
//! In the browser this wires canvas, WebGPU, input, HUD, audio, storage and
//! dino facts to a [`Session`](dino_bus::Session) and drives it from
//! `requestAnimationFrame`. Natively it plays one headless autopilot run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent};

    use dino_bus::audio::Mixer;
    use dino_bus::audio::web::WebAudio;
    use dino_bus::clock::FpsCounter;
    use dino_bus::consts::SIM_DT;
    use dino_bus::facts::{FactSource, GeminiFacts};
    use dino_bus::persistence::LocalStore;
    use dino_bus::renderer::{RenderState, SceneOptions, render_frame};
    use dino_bus::sim::Field;
    use dino_bus::{FactStatus, Session, SessionPhase, SetupError, Tuning};

    type GameSession = Session<WebAudio, LocalStore>;

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        render_state: Option<RenderState>,
        fps: FpsCounter,
        last_time: f64,
        /// Cleared on page teardown; the frame loop stops rescheduling
        running: bool,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;
            self.fps.record(time);

            self.session.advance(dt);
            self.render();
        }

        fn render(&mut self) {
            let opts = SceneOptions::from(self.session.settings());
            if let Some(render_state) = self.render_state.as_mut() {
                match render_frame(render_state, &self.session.snapshot(), &opts) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let (w, h) = render_state.size;
                        render_state.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory");
                    }
                    Err(e) => log::warn!("Render error: {e:?}"),
                }
            }
        }

        /// Enter, start button or restart button
        fn start_or_restart(&mut self) {
            match self.session.phase() {
                SessionPhase::Start => {
                    self.session.start();
                }
                SessionPhase::GameOver => {
                    self.session.restart();
                }
                SessionPhase::Playing => {}
            }
            self.last_time = 0.0;
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let session = &self.session;
            let phase = session.phase();

            set_text(document, "score", &session.score().to_string());
            set_text(document, "high-score", &session.high_score().to_string());
            set_visible(document, "dino-badge", session.is_dino());
            set_visible(document, "autopilot-badge", session.autopilot());

            let show_fps = session.settings().show_fps;
            set_visible(document, "fps", show_fps);
            if show_fps {
                set_text(document, "fps", &format!("{} FPS", self.fps.fps()));
            }

            set_visible(document, "hud", phase == SessionPhase::Playing);
            set_visible(document, "start-screen", phase == SessionPhase::Start);
            set_visible(document, "game-over", phase == SessionPhase::GameOver);

            if phase == SessionPhase::GameOver {
                if let Some(run) = session.last_run() {
                    set_text(document, "final-score", &run.score.to_string());
                    set_text(document, "final-best", &run.best.to_string());
                    set_visible(document, "new-record", run.new_record);
                }
                let fact = match session.fact() {
                    FactStatus::Ready(text) => text.as_str(),
                    FactStatus::Loading => "Thinking of a dino fact...",
                    FactStatus::Idle => "",
                };
                set_text(document, "fact", fact);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Logical (CSS pixel) and physical canvas sizes
    fn canvas_sizes(canvas: &HtmlCanvasElement) -> ((f32, f32), (u32, u32)) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        (
            (client_w as f32, client_h as f32),
            (
                (client_w as f64 * dpr) as u32,
                (client_h as f64 * dpr) as u32,
            ),
        )
    }

    /// Playing → GameOver, then fetch a fact for the finished run
    fn finish_run(game: &Rc<RefCell<Game>>) {
        let Some(ticket) = game.borrow_mut().session.end_run() else {
            return;
        };
        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = GeminiFacts::from_build_env().generate().await;
            game.borrow_mut().session.deliver_fact(ticket, result);
        });
    }

    pub async fn run() -> Result<(), SetupError> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        log::info!("Dino Bus starting...");

        let window = web_sys::window().ok_or(SetupError::NoWindow)?;
        let document = window.document().ok_or(SetupError::NoWindow)?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| SetupError::NoCanvas("canvas".into()))?;

        let ((field_w, field_h), (width, height)) = canvas_sizes(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let store = LocalStore::open()?;
        let session = Session::new(
            Tuning::default(),
            Field::new(field_w, field_h),
            seed,
            WebAudio::new(Mixer::default()),
            store,
        )?;
        log::info!("Session ready (seed {seed}, best {})", session.high_score());

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| SetupError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SetupError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;

        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: Some(render_state),
            fps: FpsCounter::default(),
            last_time: 0.0,
            running: true,
        }));

        game.borrow().update_hud(&document);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(&canvas, game.clone());
        setup_teardown(game.clone());

        request_animation_frame(game);

        log::info!("Dino Bus running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        // Keep the page from scrolling
                        event.prevent_default();
                        game.borrow_mut().session.request_jump();
                    }
                    "Enter" => game.borrow_mut().start_or_restart(),
                    "Escape" => finish_run(&game),
                    "i" | "I" => {
                        game.borrow_mut().session.toggle_autopilot();
                    }
                    "m" | "M" => {
                        game.borrow_mut().session.edit_settings(|s| s.muted = !s.muted);
                    }
                    "f" | "F" => {
                        game.borrow_mut()
                            .session
                            .edit_settings(|s| s.show_fps = !s.show_fps);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse, touch and pen all arrive as pointer events
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().session.request_jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().start_or_restart();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let ((field_w, field_h), (width, height)) = canvas_sizes(&canvas);
            canvas.set_width(width);
            canvas.set_height(height);

            let mut g = game.borrow_mut();
            g.session.resize(field_w, field_h);
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.running = false;
            g.session.shutdown();
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if !g.running {
                return;
            }
            g.frame(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Dino Bus cannot start: {e}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Dino Bus (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("Headless run failed: {e}");
        std::process::exit(1);
    }
}

/// One autopilot run without a window, for balance checks
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use dino_bus::audio::Silent;
    use dino_bus::clock::ticks_in;
    use dino_bus::facts::{FactSource, GeminiFacts};
    use dino_bus::persistence::MemoryStore;
    use dino_bus::sim::{Field, GameEvent};
    use dino_bus::{FactStatus, Session, Tuning};

    const DEFAULT_SEED: u64 = 0x00D1_0B05;
    const DEFAULT_SECONDS: u32 = 60;

    fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
        match std::env::var(key) {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring unparsable {key}={raw}");
                default
            }),
            Err(_) => default,
        }
    }

    #[derive(Default)]
    struct Tally {
        jumps: u32,
        crashes: u32,
        smashes: u32,
        honks: u32,
        meals: u32,
        transforms: u32,
        recharges: u32,
    }

    impl Tally {
        fn record(&mut self, event: &GameEvent) {
            match event {
                GameEvent::Jumped => self.jumps += 1,
                GameEvent::Crashed { .. } => self.crashes += 1,
                GameEvent::Smashed { .. } => self.smashes += 1,
                GameEvent::Honked => self.honks += 1,
                GameEvent::Ate { .. } => self.meals += 1,
                GameEvent::Transformed { .. } => self.transforms += 1,
                GameEvent::Recharged { .. } => self.recharges += 1,
                GameEvent::Reverted | GameEvent::Distance { .. } => {}
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let seed = env_or("DINOBUS_SEED", DEFAULT_SEED);
        let seconds = env_or("DINOBUS_SECONDS", DEFAULT_SECONDS);
        let tuning = match std::env::var("DINOBUS_TUNING") {
            Ok(path) => {
                log::info!("Loading tuning from {path}");
                Tuning::load_from_file(&path)?
            }
            Err(_) => Tuning::default(),
        };

        let mut session = Session::new(
            tuning,
            Field::new(800.0, 600.0),
            seed,
            Silent,
            MemoryStore::new(),
        )?;
        session.set_autopilot(true);
        session.start();

        let mut tally = Tally::default();
        for _ in 0..ticks_in(seconds) {
            for event in session.step() {
                tally.record(&event);
            }
        }

        let ticks = session.state().ticks;
        let Some(ticket) = session.end_run() else {
            return Err("run did not end".into());
        };
        let result = pollster::block_on(GeminiFacts::from_build_env().generate());
        session.deliver_fact(ticket, result);

        log::info!(
            "{} jumps, {} crashes, {} smashes, {} honks, {} meals, {} gems ({} recharges)",
            tally.jumps,
            tally.crashes,
            tally.smashes,
            tally.honks,
            tally.meals,
            tally.transforms,
            tally.recharges
        );
        println!(
            "seed {seed:#x}: score {} after {ticks} ticks ({seconds}s)",
            session.score()
        );
        if let FactStatus::Ready(fact) = session.fact() {
            println!("{fact}");
        }
        Ok(())
    }
}
