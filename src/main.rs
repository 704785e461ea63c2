//! Stickman Runner entry point
//!
//! Browser: binds a 2D canvas and the page's input events to the simulation.
//! Native: plays a headless autopilot run and prints the final frame as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlButtonElement, HtmlCanvasElement, KeyboardEvent};

    use stickman_runner::sim::{Command, CommandOutcome, GamePhase, GameState, Snapshot, autopilot};
    use stickman_runner::{FrameDriver, Schedule, Tuning, os_seed};

    /// Delay before the game-over overlay covers the collision frame
    const GAME_OVER_OVERLAY_DELAY_MS: i32 = 50;

    struct Game {
        state: GameState,
        driver: FrameDriver,
        ctx: CanvasRenderingContext2d,
        start_btn: Option<HtmlButtonElement>,
        /// An animation frame is pending
        looping: bool,
        /// Idle/demo mode - the autopilot plays
        autopilot: bool,
    }

    impl Game {
        /// Route a command; returns true when the frame loop must be kicked off
        fn command(&mut self, command: Command) -> bool {
            match self.state.dispatch(command) {
                CommandOutcome::Started => {
                    if let Some(btn) = &self.start_btn {
                        btn.set_disabled(true);
                    }
                    self.render();
                    !self.looping
                }
                CommandOutcome::Jumped | CommandOutcome::Ignored => false,
            }
        }

        /// One display refresh: input, simulation, drawing
        fn frame(&mut self, time: f64) -> Schedule {
            if self.autopilot && autopilot::wants_jump(&self.state) {
                self.state.request_jump();
            }

            let schedule = self.driver.on_refresh(&mut self.state, time);
            for event in self.state.take_events() {
                log::debug!("{:?}", event);
            }
            if self.state.phase == GamePhase::Running {
                if let Some(btn) = &self.start_btn {
                    btn.set_disabled(false);
                }
            }

            self.render();
            schedule
        }

        fn render(&self) {
            let view = self.state.snapshot();
            let tuning = &self.state.tuning;
            let w = tuning.arena_width as f64;
            let h = tuning.arena_height as f64;

            self.ctx.clear_rect(0.0, 0.0, w, h);
            self.draw_ground(&view);
            self.draw_obstacles(&view);
            self.draw_stickman(view.player_feet.x as f64, view.player_feet.y as f64);
            self.draw_score(&view);

            match view.phase {
                GamePhase::Idle => self.draw_welcome(),
                GamePhase::Countdown => {
                    if let Some(phase) = view.countdown {
                        self.ctx.set_fill_style_str("#111827");
                        self.ctx.set_font("64px Inter, Arial");
                        let _ = self.ctx.fill_text(phase.label(), w / 2.0 - 30.0, h / 2.0 + 20.0);
                    }
                }
                GamePhase::Running | GamePhase::GameOver => {}
            }
        }

        fn draw_ground(&self, view: &Snapshot) {
            let tuning = &self.state.tuning;
            let w = tuning.arena_width as f64;
            let h = tuning.arena_height as f64;
            let ground = tuning.ground_height as f64;

            self.ctx.set_fill_style_str("#2c3e50");
            self.ctx.fill_rect(0.0, h - ground, w, ground);

            // Scrolling dashes for a sense of motion
            self.ctx.set_fill_style_str("#ffffff20");
            let offset = ((view.frame * 2) % 40) as f64;
            let mut x = 0.0;
            while x < w {
                self.ctx.fill_rect(x + offset, h - ground / 2.0, 20.0, 2.0);
                x += 40.0;
            }
        }

        fn draw_obstacles(&self, view: &Snapshot) {
            for rect in &view.obstacles {
                let (x, y) = (rect.min.x as f64, rect.min.y as f64);
                let (w, h) = (rect.size.x as f64, rect.size.y as f64);

                self.ctx.set_fill_style_str("#b03a2e");
                self.ctx.fill_rect(x, y, w, h);

                // Spike on top
                self.ctx.set_fill_style_str("#7a2016");
                self.ctx.begin_path();
                self.ctx.move_to(x + w * 0.15, y);
                self.ctx.line_to(x + w * 0.5, y - 10.0);
                self.ctx.line_to(x + w * 0.85, y);
                self.ctx.fill();
            }
        }

        /// Figure anchored at the feet position used by the simulation
        fn draw_stickman(&self, x: f64, y: f64) {
            let ctx = &self.ctx;
            ctx.set_stroke_style_str("#111827");
            ctx.set_line_width(3.0);

            // Head
            ctx.begin_path();
            let _ = ctx.arc(x, y - 22.0, 8.0, 0.0, TAU);
            ctx.stroke();

            ctx.begin_path();
            // Body
            ctx.move_to(x, y - 14.0);
            ctx.line_to(x, y + 6.0);
            // Arms
            ctx.move_to(x - 12.0, y - 4.0);
            ctx.line_to(x + 8.0, y - 10.0);
            // Legs
            ctx.move_to(x, y + 6.0);
            ctx.line_to(x - 10.0, y + 18.0);
            ctx.move_to(x, y + 6.0);
            ctx.line_to(x + 10.0, y + 18.0);
            ctx.stroke();
        }

        fn draw_score(&self, view: &Snapshot) {
            self.ctx.set_fill_style_str("#222");
            self.ctx.set_font("18px Inter, Arial");
            let _ = self.ctx.fill_text(&format!("Score: {}", view.score), 12.0, 28.0);
        }

        fn draw_welcome(&self) {
            let w = self.state.tuning.arena_width as f64;
            let h = self.state.tuning.arena_height as f64;
            self.ctx.set_fill_style_str("#111827");
            self.ctx.set_font("22px Inter, Arial");
            let _ = self.ctx.fill_text("Press SPACE to Jump", w / 2.0 - 110.0, h / 2.0 - 8.0);
            self.ctx.set_font("14px Inter, Arial");
            let _ = self.ctx.fill_text(
                "Click Start or press Space to begin",
                w / 2.0 - 120.0,
                h / 2.0 + 16.0,
            );
        }

        fn draw_game_over(&self) {
            let w = self.state.tuning.arena_width as f64;
            let h = self.state.tuning.arena_height as f64;
            self.ctx.set_fill_style_str("rgba(0,0,0,0.6)");
            self.ctx.fill_rect(0.0, 0.0, w, h);
            self.ctx.set_fill_style_str("#fff");
            self.ctx.set_font("36px Inter, Arial");
            let _ = self.ctx.fill_text("Game Over", w / 2.0 - 90.0, h / 2.0 - 10.0);
            self.ctx.set_font("18px Inter, Arial");
            let _ = self.ctx.fill_text("Refresh to play again", w / 2.0 - 95.0, h / 2.0 + 20.0);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Stickman Runner starting...");

        let seed = match os_seed() {
            Ok(seed) => seed,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let tuning = Tuning::default();
        canvas.set_width(tuning.arena_width as u32);
        canvas.set_height(tuning.arena_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let start_btn = document
            .get_element_by_id("startBtn")
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());

        let state = match GameState::new(tuning, seed) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };

        let game = Rc::new(RefCell::new(Game {
            state,
            driver: FrameDriver::new(),
            ctx,
            start_btn,
            looping: false,
            autopilot: false,
        }));
        game.borrow().render();

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
    }

    /// Dispatch a command and kick the frame loop if it just started
    fn handle_command(game: &Rc<RefCell<Game>>, command: Command) {
        let kick = game.borrow_mut().command(command);
        if kick {
            game.borrow_mut().looping = true;
            request_animation_frame(game.clone());
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Keyboard: Space is the shared start/jump key
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        handle_command(&game, Command::Press);
                    }
                    "KeyI" => {
                        let mut g = game.borrow_mut();
                        g.autopilot = !g.autopilot;
                        log::info!("Autopilot: {}", g.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Canvas click: same channel as Space
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                handle_command(&game, Command::Press);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Start button only ever starts
        if let Some(btn) = document.get_element_by_id("startBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                handle_command(&game, Command::Start);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        let schedule = {
            let mut g = game.borrow_mut();
            let schedule = g.frame(time);
            if schedule == Schedule::Stop {
                g.looping = false;
            }
            schedule
        };

        match schedule {
            Schedule::Continue => request_animation_frame(game),
            Schedule::Stop => {
                if game.borrow().state.phase == GamePhase::GameOver {
                    show_game_over(game);
                }
            }
        }
    }

    fn show_game_over(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move || {
            game.borrow().draw_game_over();
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            GAME_OVER_OVERLAY_DELAY_MS,
        );
        closure.forget();
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
    log::info!("Stickman Runner (native) starting...");
    log::info!("Native mode plays a headless autopilot run - serve the wasm build for the game");

    if let Err(e) = headless::run(std::env::args().skip(1)) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use stickman_runner::sim::{GameEvent, GameState, autopilot};
    use stickman_runner::{ConfigError, FixedRefresh, FrameDriver, Tuning, os_seed};

    /// One simulated minute at 60 Hz
    const DEFAULT_FRAMES: u64 = 60 * 60;

    #[derive(Debug, Default)]
    struct Args {
        seed: Option<u64>,
        frames: Option<u64>,
        tuning: Option<PathBuf>,
    }

    fn parse_args(args: impl Iterator<Item = String>) -> Result<Args, ConfigError> {
        fn number(flag: &'static str, value: Option<String>) -> Result<u64, ConfigError> {
            value
                .and_then(|v| v.parse().ok())
                .ok_or(ConfigError::Invalid {
                    field: flag,
                    reason: "expects a non-negative integer",
                })
        }

        let mut parsed = Args::default();
        let mut args = args;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => parsed.seed = Some(number("--seed", args.next())?),
                "--frames" => parsed.frames = Some(number("--frames", args.next())?),
                _ => parsed.tuning = Some(PathBuf::from(arg)),
            }
        }
        Ok(parsed)
    }

    /// `stickman-runner [--seed N] [--frames N] [tuning.json]`
    pub fn run(args: impl Iterator<Item = String>) -> Result<(), ConfigError> {
        let args = parse_args(args)?;
        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let seed = match args.seed {
            Some(seed) => seed,
            None => os_seed()?,
        };
        let frames = args.frames.unwrap_or(DEFAULT_FRAMES);

        let mut state = GameState::new(tuning, seed)?;
        state.request_start();

        let mut driver = FrameDriver::new();
        let mut source = FixedRefresh::sixty_hz().limit(frames);
        let refreshes = driver.run(&mut state, &mut source, |state| {
            if autopilot::wants_jump(state) {
                state.request_jump();
            }
            for event in state.take_events() {
                match event {
                    GameEvent::ObstacleCleared { .. } | GameEvent::ObstacleSpawned { .. } => {
                        log::trace!("{:?}", event)
                    }
                    _ => log::debug!("{:?}", event),
                }
            }
        });

        log::info!(
            "Run with seed {} ended in {:?} after {} refreshes ({} ticks): score {}",
            seed,
            state.phase,
            refreshes,
            driver.ticks(),
            state.score
        );

        let json = serde_json::to_string_pretty(&state.snapshot())
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        println!("{}", json);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> impl Iterator<Item = String> {
            list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
        }

        #[test]
        fn test_parse_args() {
            let parsed = parse_args(args(&["--seed", "42", "--frames", "10", "t.json"])).unwrap();
            assert_eq!(parsed.seed, Some(42));
            assert_eq!(parsed.frames, Some(10));
            assert_eq!(parsed.tuning, Some(PathBuf::from("t.json")));
        }

        #[test]
        fn test_parse_args_bad_seed() {
            assert!(parse_args(args(&["--seed", "abc"])).is_err());
            assert!(parse_args(args(&["--frames"])).is_err());
        }

        #[test]
        fn test_headless_run() {
            assert!(run(args(&["--seed", "7", "--frames", "400"])).is_ok());
        }
    }
}
