//! Moon Dino entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use moon_dino::audio::AudioManager;
    use moon_dino::persistence::LocalStorage;
    use moon_dino::renderer::CanvasSurface;
    use moon_dino::sim::GamePhase;
    use moon_dino::{Game, Settings, Tuning};

    type WebGame = Game<CanvasSurface, AudioManager, LocalStorage>;

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Moon Dino starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let Some(surface) = CanvasSurface::new(&canvas) else {
            log::error!("Canvas2D context unavailable");
            return;
        };

        let settings = Settings::load(&LocalStorage);
        let audio = AudioManager::new(&settings);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            Tuning::default(),
            surface,
            audio,
            LocalStorage,
        )));
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone());
        setup_start_button(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Moon Dino running!");
    }

    fn setup_keyboard(game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                // Any key press counts as the user gesture audio needs
                g.audio.resume();
                if g.input.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(game: Rc<RefCell<WebGame>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("startButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.start = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.focus_lost();
                } else {
                    g.resume_clock();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().focus_lost();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Show the start button only while a run can be started
    fn update_start_button(phase: GamePhase) {
        let Some(btn) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("startButton"))
        else {
            return;
        };
        let class = match phase {
            GamePhase::Menu | GamePhase::GameOver => "",
            GamePhase::Playing | GamePhase::Paused => "hidden",
        };
        let _ = btn.set_attribute("class", class);
    }

    fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<WebGame>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.frame(time);
            update_start_button(g.state.phase);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use moon_dino::persistence::MemoryStore;
    use moon_dino::platform::{NullSurface, SilentAudio};
    use moon_dino::sim::GamePhase;
    use moon_dino::{Game, Tuning};

    env_logger::init();
    log::info!("Moon Dino (native) starting...");
    log::info!("Native mode runs a headless autopilot session - use `trunk serve` to play");

    // Optional argument: seconds of simulated time
    let seconds: u32 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(60);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut game = Game::new(
        seed,
        Tuning::default(),
        NullSurface::default(),
        SilentAudio::default(),
        MemoryStore::new(),
    );
    game.input.start = true;
    game.input.key_down("i");

    let frame_ms = 1000.0 / 60.0;
    let frames = u64::from(seconds) * 60;
    let mut runs = 1;
    for frame in 0..=frames {
        game.frame(frame as f64 * frame_ms);
        if game.state.phase == GamePhase::GameOver && !game.input.start {
            log::info!("Run {} ended with score {}", runs, game.state.score);
            runs += 1;
            game.input.start = true;
        }
    }

    log::info!(
        "Simulated {}s: {} runs, score {}, highscore {}, {} jumps",
        seconds,
        runs,
        game.state.score,
        game.state.highscore,
        game.audio.jumps
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
