//! Wrap Snake entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use wrap_snake::audio::AudioManager;
    use wrap_snake::platform::{Clock, Key, Keyboard, SystemClock};
    use wrap_snake::sim::{FoodKind, FrameToken, Game};
    use wrap_snake::{GameView, Settings};

    /// Height of the score strip under the grid
    const HUD_HEIGHT: u32 = 24;

    /// Browser host holding the controller and its collaborators
    struct Host {
        game: Game,
        keyboard: Keyboard,
        clock: SystemClock,
        ctx: CanvasRenderingContext2d,
        audio: AudioManager,
    }

    impl Host {
        /// Run one accepted frame; returns false once the loop should end
        fn frame(&mut self, token: FrameToken) -> bool {
            let now = self.clock.now_ms();
            match self.game.frame(token, now, &mut self.keyboard) {
                Ok(true) => {}
                Ok(false) => return false,
                Err(e) => {
                    log::error!("Frame failed: {}", e);
                    self.game.stop_loop();
                    return false;
                }
            }

            for event in self.game.drain_events() {
                self.audio.handle(event);
            }
            self.render(&GameView::capture(&self.game));
            true
        }

        fn render(&self, view: &GameView) {
            let ctx = &self.ctx;
            let (w, h) = view.pixel_size();

            ctx.set_fill_style_str("#111");
            ctx.fill_rect(0.0, 0.0, w as f64, (h + HUD_HEIGHT) as f64);

            // Obstacles
            for (i, tag) in view.cells.iter().enumerate() {
                let color = match tag {
                    1 => "#777",
                    2 => "#c33",
                    _ => continue,
                };
                let pos = glam::IVec2::new(i as i32 % view.width, i as i32 / view.width);
                let (x, y, size) = view.cell_rect(pos);
                ctx.set_fill_style_str(color);
                ctx.fill_rect(x, y, size, size);
            }

            // Food, shrinking as it ages
            let (x, y, size) = view.cell_rect(view.food);
            ctx.set_fill_style_str(match view.food_kind {
                FoodKind::Small => "#fd4",
                FoodKind::Medium => "#f90",
                FoodKind::Large => "#f3f",
            });
            let inset = size * 0.4 * view.food_age as f64;
            ctx.fill_rect(x + inset / 2.0, y + inset / 2.0, size - inset, size - inset);

            // Snake
            for (i, seg) in view.snake.iter().enumerate() {
                let color = match (view.snake_alive, i) {
                    (false, _) => "#555",
                    (true, 0) => "#8f8",
                    (true, _) => "#3b3",
                };
                let (x, y, size) = view.cell_rect(*seg);
                ctx.set_fill_style_str(color);
                ctx.fill_rect(x + 1.0, y + 1.0, size - 2.0, size - 2.0);
            }

            // HUD
            ctx.set_fill_style_str("#eee");
            ctx.set_font("14px monospace");
            ctx.set_text_align("left");
            let _ = ctx.fill_text(
                &format!("Score {}   Round {}", view.score, view.round_number),
                6.0,
                (h + HUD_HEIGHT - 7) as f64,
            );

            if let Some(banner) = &view.banner {
                let cx = w as f64 / 2.0;
                let cy = h as f64 / 2.0;
                ctx.set_fill_style_str("rgba(0, 0, 0, 0.6)");
                ctx.fill_rect(0.0, cy - 34.0, w as f64, 58.0);
                ctx.set_fill_style_str("#fff");
                ctx.set_text_align("center");
                ctx.set_font("bold 18px sans-serif");
                let _ = ctx.fill_text(&banner.title, cx, cy - 8.0);
                ctx.set_font("13px sans-serif");
                let _ = ctx.fill_text(&banner.subtitle, cx, cy + 14.0);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Wrap Snake starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = Settings::default();
        let clock = SystemClock::new();
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(settings.game_config(), seed, clock.now_ms())
            .expect("default settings always produce a round");
        log::info!("Game initialized with seed: {}", seed);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let (w, h) = GameView::capture(&game).pixel_size();
        canvas.set_width(w);
        canvas.set_height(h + HUD_HEIGHT);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let host = Rc::new(RefCell::new(Host {
            game,
            keyboard: Keyboard::for_game(),
            clock,
            ctx,
            audio: AudioManager::new(&settings),
        }));

        setup_input_handlers(host.clone());

        let token = host.borrow_mut().game.start_loop();
        request_animation_frame(host, token);

        log::info!("Wrap Snake running!");
    }

    fn setup_input_handlers(host: Rc<RefCell<Host>>) {
        let window = web_sys::window().unwrap();

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_code(event.key_code());
                let mut h = host.borrow_mut();
                if h.keyboard.is_suppressed(key) {
                    event.prevent_default();
                }
                h.keyboard.press(key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_code(event.key_code());
                host.borrow_mut().keyboard.release(key);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>, token: FrameToken) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(host, token);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, token: FrameToken) {
        let next = {
            let mut h = host.borrow_mut();
            if !h.frame(token) {
                return;
            }
            h.game.next_frame_token()
        };

        if let Some(next) = next {
            request_animation_frame(host, next);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Wrap Snake (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in the browser");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let settings = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| wrap_snake::Settings::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => wrap_snake::Settings::default(),
    };

    match headless::run(&settings, seed) {
        Ok(summary) => println!("{summary}"),
        Err(e) => {
            log::error!("Headless run failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session driven by a manual clock and random steering
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use wrap_snake::Settings;
    use wrap_snake::platform::{Clock, Key, KeyInput, Keyboard, ManualClock};
    use wrap_snake::sim::{Game, GameEvent, GamePhase, SimError};

    const FRAME_MS: u64 = 16;
    const MAX_FRAMES: u32 = 20_000;

    pub fn run(settings: &Settings, seed: u64) -> Result<String, SimError> {
        let clock = ManualClock::new(0);
        let mut keys = Keyboard::for_game();
        let mut steering = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let mut game = Game::new(settings.game_config(), seed, clock.now_ms())?;
        let mut cues = 0usize;

        let mut token = game.start_loop();
        for frame in 0..MAX_FRAMES {
            match game.phase() {
                // Any key leaves the start gate
                GamePhase::Paused if !keys.has_any_key_down() => keys.press(Key::Other(32)),
                GamePhase::Active if frame % 30 == 0 => {
                    keys.release_all();
                    let key = Key::ARROWS[steering.random_range(0..Key::ARROWS.len())];
                    keys.press(key);
                }
                GamePhase::WaitingAfterDeath => break,
                _ => {}
            }

            game.frame(token, clock.now_ms(), &mut keys)?;
            for event in game.drain_events() {
                if let GameEvent::Cue(cue) = event {
                    log::debug!("t={} cue {}", clock.now_ms(), cue.name());
                    cues += 1;
                }
            }

            clock.advance(FRAME_MS);
            match game.next_frame_token() {
                Some(next) => token = next,
                None => break,
            }
        }
        game.stop_loop();

        let round = game.round();
        let outcome = match round.snake.death() {
            Some(cause) => format!("died ({})", cause.as_str()),
            None => "still alive".to_string(),
        };
        Ok(format!(
            "seed {}: {} after {} ms, length {}, score {}, {} cues",
            seed,
            outcome,
            clock.now_ms(),
            round.snake.len(),
            round.snake.score(),
            cues
        ))
    }
}
