//! Neon Bowling entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, PointerEvent};

    use neon_bowling::DragGesture;
    use neon_bowling::consts::*;
    use neon_bowling::sim::{GameEvent, RollMark, Session, SessionPhase, TickInput, tick};

    /// How long the strike/spare banner stays up (ms)
    const CELEBRATION_MS: f64 = 2000.0;

    /// Game instance holding all state
    struct Game {
        session: Session,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Drag in progress (start fixed, end follows the pointer)
        drag: Option<DragGesture>,
        /// Banner text and the time it expires
        celebration: Option<(&'static str, f64)>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                session: Session::new(seed),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                drag: None,
                celebration: None,
            }
        }

        fn pointer_down(&mut self, pos: Vec2) {
            if self.session.phase() != SessionPhase::Idle {
                return;
            }
            self.drag = Some(DragGesture::new(pos, pos));
        }

        fn pointer_move(&mut self, pos: Vec2) {
            if let Some(drag) = self.drag.as_mut() {
                drag.end = pos;
            }
        }

        fn pointer_up(&mut self, viewport_width: f32) {
            let Some(drag) = self.drag.take() else {
                return;
            };
            if let Some(cmd) = drag.to_throw(viewport_width) {
                self.input.throw = Some(cmd);
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.session, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.clear();
            }

            for event in self.session.drain_events() {
                match event {
                    GameEvent::RollFinalized {
                        mark: RollMark::Strike,
                        ..
                    } => self.celebration = Some(("STRIKE!", time + CELEBRATION_MS)),
                    GameEvent::RollFinalized {
                        mark: RollMark::Spare,
                        ..
                    } => self.celebration = Some(("SPARE!", time + CELEBRATION_MS)),
                    GameEvent::PinsReset { .. } | GameEvent::Thrown { .. } => {
                        self.celebration = None;
                    }
                    _ => {}
                }
                log::debug!("{:?}", event);
            }

            if let Some((_, until)) = self.celebration {
                if time > until {
                    self.celebration = None;
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let snap = self.session.snapshot();

            set_text(document, "#hud-frame .hud-value", &(snap.current_frame + 1).to_string());
            set_text(document, "#hud-score .hud-value", &snap.total_score.to_string());
            set_text(document, "#hud-pins .hud-value", &snap.pins_down().to_string());
            set_text(document, "#hud-roll", &format!("Roll {}", snap.current_roll + 1));

            let history = snap
                .frames
                .iter()
                .map(|f| f.display())
                .collect::<Vec<_>>()
                .join(" | ");
            set_text(document, "#frame-history", &history);

            set_visible(document, "status-rolling", snap.rolling);

            if let Some(el) = document.get_element_by_id("celebration") {
                match self.celebration {
                    Some((text, _)) => {
                        el.set_text_content(Some(text));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            // Reset is disabled while the ball is rolling
            if let Some(btn) = document.get_element_by_id("reset-btn") {
                if snap.rolling {
                    let _ = btn.set_attribute("disabled", "");
                } else {
                    let _ = btn.remove_attribute("disabled");
                }
            }

            // External renderers read the full snapshot from here
            if let Some(hud) = document.get_element_by_id("hud") {
                if let Ok(json) = serde_json::to_string(&snap) {
                    let _ = hud.set_attribute("data-snapshot", &json);
                }
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn viewport_width() -> f32 {
        web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as f32
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Bowling starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        setup_input_handlers(&document, game.clone());
        setup_reset_button(&document, game.clone());

        request_animation_frame(game);
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().pointer_down(pos);
            });
            let _ = document
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().pointer_move(pos);
            });
            let _ = document
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Releasing or leaving the page both end the drag
        for event_name in ["pointerup", "pointerleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().pointer_up(viewport_width());
            });
            let _ = document
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_reset_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                // Keep the click from starting a drag
                event.stop_propagation();
                game.borrow_mut().input.reset = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);

            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_bowling::Tuning;

    env_logger::init();
    log::info!("Neon Bowling (native) starting...");
    log::info!("Native mode runs a scripted headless game - use `trunk serve` for the web version");

    // Optional tuning file as the first argument
    let tuning = match std::env::args().nth(1) {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    headless::play_game(tuning);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<neon_bowling::Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(neon_bowling::Tuning::from_json(&json)?)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_bowling::Tuning;
    use neon_bowling::consts::{FRAME_COUNT, SIM_DT};
    use neon_bowling::input::ThrowCommand;
    use neon_bowling::sim::{Session, TickInput, tick};

    /// Upper bound on ticks per roll before giving up on the ball
    const MAX_ROLL_TICKS: u32 = 60 * 30;

    /// Bowl ten frames with a fixed set of aims and print the scoresheet
    pub fn play_game(tuning: Tuning) {
        let mut session = Session::with_tuning(20240101, tuning);
        let aims = [(1.0, 0.0), (0.7, 0.05), (0.9, -0.08), (0.6, 0.12)];

        let mut throws = 0usize;
        // Two rolls per frame at most; strikes finish early
        while throws < FRAME_COUNT * 2 {
            let frame = session.scorecard().current_frame();
            let (power, spin) = aims[throws % aims.len()];
            let input = TickInput {
                throw: Some(ThrowCommand { power, spin }),
                ..Default::default()
            };
            tick(&mut session, &input, SIM_DT);

            let mut ticks = 0;
            while session.is_rolling() && ticks < MAX_ROLL_TICKS {
                tick(&mut session, &TickInput::default(), SIM_DT);
                ticks += 1;
            }
            throws += 1;

            for event in session.drain_events() {
                log::debug!("{:?}", event);
            }

            let reset = TickInput {
                reset: true,
                ..Default::default()
            };
            tick(&mut session, &reset, SIM_DT);
            tick(&mut session, &TickInput::default(), SIM_DT);

            // The last frame index never advances, so stop once it is filled
            let card = session.scorecard();
            if frame == FRAME_COUNT - 1 && card.current_roll() == 0 {
                break;
            }
        }

        let card = session.scorecard();
        for (i, frame) in card.frames().iter().enumerate() {
            println!("Frame {:>2}: {:<5} ({} pins)", i + 1, frame.display(), frame.pins());
        }
        println!("Total: {}", card.total());

        match serde_json::to_string_pretty(&session.snapshot()) {
            Ok(json) => log::debug!("Final snapshot:\n{}", json),
            Err(e) => log::warn!("Could not serialize snapshot: {}", e),
        }
    }
}
