//! Buzz Swat entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::MouseEvent;

    use buzz_swat::audio::web::WebAudio;
    use buzz_swat::consts::*;
    use buzz_swat::sim::{GameEvent, Snapshot, Viewport};
    use buzz_swat::{RenderSink, Session, Settings, Tuning};

    // The page draws the bug, splats, hand and score badge from these
    #[wasm_bindgen(inline_js = "
        export function publish_frame(json) {
            if (window.buzzSwat && window.buzzSwat.frame) {
                window.buzzSwat.frame(JSON.parse(json));
            }
        }

        export function publish_impact(x, y) {
            if (window.buzzSwat && window.buzzSwat.impact) {
                window.buzzSwat.impact(x, y);
            }
        }

        export function host_config(key) {
            const el = document.getElementById(key);
            return el ? el.textContent : null;
        }
    ")]
    extern "C" {
        fn publish_frame(json: &str);
        fn publish_impact(x: f32, y: f32);
        fn host_config(key: &str) -> Option<String>;
    }

    /// Forwards frames to the page as JSON
    struct JsRender;

    impl RenderSink for JsRender {
        fn present(&mut self, snapshot: &Snapshot) {
            match serde_json::to_string(snapshot) {
                Ok(json) => publish_frame(&json),
                Err(e) => log::warn!("Snapshot serialization failed: {}", e),
            }
        }

        fn impact(&mut self, pos: glam::Vec2) {
            publish_impact(pos.x, pos.y);
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session<WebAudio, JsRender>,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64, viewport: Viewport) -> Self {
            let tuning = host_config("tuning")
                .map(|json| Tuning::from_json_or_default(&json))
                .unwrap_or_default();
            let settings = host_config("settings")
                .and_then(|json| Settings::from_json(&json))
                .unwrap_or_default();
            let audio = WebAudio::new(&tuning, &settings);
            Self {
                session: Session::new(seed, viewport, tuning, settings, audio, JsRender),
                last_time: 0.0,
            }
        }

        fn update(&mut self, dt: f32) {
            self.session.update(dt);
            for event in self.session.drain_events() {
                if let GameEvent::Respawned { identity, edge, .. } = event {
                    log::debug!("Creature {} incoming from {:?}", identity, edge);
                }
            }
        }
    }

    fn window_viewport(window: &web_sys::Window) -> Viewport {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(w as f32, h as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Buzz Swat starting...");

        let Some(window) = web_sys::window() else {
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, window_viewport(&window))));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&window, game.clone());
        setup_start_button(&window, game.clone());

        request_animation_frame(game);
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Pointer move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .session
                    .on_pointer_move(event.client_x() as f32, event.client_y() as f32);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Primary activation
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let mut g = game.borrow_mut();
                g.session
                    .on_pointer_move(event.client_x() as f32, event.client_y() as f32);
                g.session.attempt_slap();
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(window) = web_sys::window() {
                    let vp = window_viewport(&window);
                    game.borrow_mut().session.resize(vp.width, vp.height);
                }
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let Some(btn) = window
            .document()
            .and_then(|d| d.get_element_by_id("start-btn"))
        else {
            log::warn!("No start button found");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut g = game.borrow_mut();
            // Audio can only start inside a user gesture
            g.session.audio_mut().resume();
            g.session.start();
            g.last_time = 0.0;
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
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
    env_logger::init();
    log::info!("Buzz Swat (native) starting...");
    log::info!("Native mode runs a headless swatting demo - build for wasm32 to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xB022);
    let seconds = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(60u32);

    let score = headless::run(seed, seconds);
    println!("Seed {}: swatted {} in {}s", seed, score, seconds);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted player for native runs
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use buzz_swat::audio::HeadlessAudio;
    use buzz_swat::consts::SIM_DT;
    use buzz_swat::session::NullRender;
    use buzz_swat::sim::{GameEvent, Viewport};
    use buzz_swat::{Session, Settings, Tuning};
    use glam::Vec2;

    /// Lurk far away until the bug gets bold, then close in and slap
    pub fn run(seed: u64, seconds: u32) -> u64 {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let audio = HeadlessAudio::new(SIM_DT, &tuning, &settings);
        let viewport = Viewport::new(1280.0, 720.0);
        let mut session = Session::new(seed, viewport, tuning, settings, audio, NullRender);
        session.start();

        let lurk = Vec2::ZERO;
        let mut hand = lurk;
        let ticks = (seconds as f32 / SIM_DT) as u32;
        for _ in 0..ticks {
            let state = session.state();
            let creature = &state.creature;
            let target = if creature.alive && creature.depth >= state.tuning.flee_depth_ceiling {
                creature.pos
            } else {
                lurk
            };
            hand += (target - hand) * 0.2;
            session.on_pointer_move(hand.x, hand.y);

            let state = session.state();
            let creature = &state.creature;
            if creature.alive && hand.distance(creature.pos) < creature.hit_radius(&state.tuning) * 0.5
            {
                session.attempt_slap();
            }

            session.tick();
            for event in session.drain_events() {
                match event {
                    GameEvent::Kill { score, .. } => log::info!("Kill! score {}", score),
                    GameEvent::Respawned { identity, edge, .. } => {
                        log::debug!("Creature {} from {:?}", identity, edge)
                    }
                    _ => {}
                }
            }
        }

        let audio = session.audio();
        log::info!(
            "Demo over: {} slaps, {} kills, buzz at {:.3} / {:.0} Hz",
            audio.impacts,
            audio.kills,
            audio.current.volume,
            audio.current.frequency
        );
        session.get_score()
    }
}
