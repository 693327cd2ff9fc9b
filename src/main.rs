//! Flap Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use flap_dash::audio::AudioManager;
    use flap_dash::highscores::LocalStorageStore;
    use flap_dash::platform::HeldAction;
    use flap_dash::renderer::CanvasSurface;
    use flap_dash::sim::GamePhase;
    use flap_dash::{Game, GameConfig, ScoreBoard, Services};

    /// Browser session: the game plus its canvas and input handle
    struct App {
        game: Game,
        surface: CanvasSurface,
        input: HeldAction,
        /// A requestAnimationFrame callback is queued
        frame_pending: bool,
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flap Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let config = GameConfig::load();
        canvas.set_width(config.world_width as u32);
        canvas.set_height(config.world_height as u32);

        let Some(mut surface) = CanvasSurface::new(&canvas) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };
        surface.load_sprites(&document);

        let input = HeldAction::new();
        let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Game::new(
            config,
            seed,
            ScoreBoard::new(Box::new(LocalStorageStore)),
            Services {
                input: Box::new(input.clone()),
                audio: Box::new(AudioManager::new()),
            },
        );

        let app = Rc::new(RefCell::new(App {
            game,
            surface,
            input,
            frame_pending: false,
        }));

        setup_input(app.clone());

        app.borrow_mut().game.start(now());
        request_animation_frame(app);
    }

    /// Press the ascend action, or restart if the run is over
    fn on_press(app: &Rc<RefCell<App>>) {
        let restart = {
            let mut a = app.borrow_mut();
            if a.game.state().phase == GamePhase::Stopped {
                let seed = js_sys::Date::now() as u64;
                a.game.restart(seed, now());
                a.input.release();
                !a.frame_pending
            } else {
                a.input.press();
                false
            }
        };
        if restart {
            request_animation_frame(app.clone());
        }
    }

    fn setup_input(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.code() == "Space" && !event.repeat() {
                    event.prevent_default();
                    on_press(&app);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.code() == "Space" {
                    app.borrow().input.release();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                on_press(&app);
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow().input.release();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                on_press(&app);
            });
            let _ = window
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::TouchEvent| {
                app.borrow().input.release();
            });
            let _ = window
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        app.borrow_mut().frame_pending = true;
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let keep_going = {
            let mut a = app.borrow_mut();
            a.frame_pending = false;
            let App { game, surface, .. } = &mut *a;
            game.frame(time, surface);
            game.is_running()
        };

        // A stopped clock gets no further frames until restart
        if keep_going {
            request_animation_frame(app);
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
    log::info!("Flap Dash (native) starting...");
    log::info!("Native mode runs a headless autopilot demo");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use flap_dash::highscores::FileStore;
    use flap_dash::platform::{HeldAction, NullAudio};
    use flap_dash::renderer::RecordingSurface;
    use flap_dash::sim::GameState;
    use flap_dash::{Game, GameConfig, ScoreBoard, Services};

    /// Simulated display refresh rate
    const DISPLAY_HZ: f64 = 60.0;
    /// Longest demo run in simulated milliseconds
    const MAX_RUN_MS: f64 = 120_000.0;
    const HIGHSCORE_ENV_VAR: &str = "FLAP_DASH_HIGHSCORE";

    /// Hold ascend while the actor's center is below the next gap's center
    fn autopilot(state: &GameState) -> bool {
        let actor = &state.actor;
        let target = state
            .obstacles
            .iter()
            .find(|o| o.right() >= actor.pos.x)
            .map(|o| o.gap_center)
            .unwrap_or(state.config.playable_height() / 2.0);
        actor.pos.y + actor.size.y / 2.0 > target + 10.0 && actor.vel.y >= 0.0
    }

    pub fn run() {
        let config = GameConfig::load();
        let seed = config.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        let store_path = std::env::var(HIGHSCORE_ENV_VAR)
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("flap_dash_highscore.json"));

        let input = HeldAction::new();
        let mut game = Game::new(
            config,
            seed,
            ScoreBoard::new(Box::new(FileStore::new(store_path))),
            Services {
                input: Box::new(input.clone()),
                audio: Box::new(NullAudio),
            },
        );
        let mut surface = RecordingSurface::default();

        log::info!("Seed {seed}");
        game.start(0.0);
        let frame_ms = 1000.0 / DISPLAY_HZ;
        let mut now = 0.0;
        while game.is_running() && now < MAX_RUN_MS {
            input.set(autopilot(game.state()));
            now += frame_ms;
            game.frame(now, &mut surface);
        }

        println!(
            "Run finished after {:.1}s ({} ticks, {} frames): score {}, best {}",
            game.clock().elapsed() / 1000.0,
            game.clock().ticks(),
            surface.frames,
            game.scores().score(),
            game.scores().high_score()
        );
    }
}
