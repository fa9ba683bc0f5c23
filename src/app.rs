//! App: terminal init, fixed-rate frame loop, key handling.

use crate::GameConfig;
use crate::game::{GameState, TickOutcome};
use crate::input::Keyboard;
use crate::randomizer::RandomSource;
use crate::theme::Theme;
use crate::ui::{self, ClearFlash};
use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct App {
    config: GameConfig,
    theme: Theme,
    state: GameState,
    keyboard: Keyboard,
    flash: ClearFlash,
    frame_duration: Duration,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let state = GameState::new(&config, Box::new(RandomSource::new(config.seed)));
        let frame_duration = Duration::from_secs_f64(1.0 / f64::from(config.fps));
        Self {
            config,
            theme,
            state,
            keyboard: Keyboard::new(false),
            flash: ClearFlash::default(),
            frame_duration,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
                supports_keyboard_enhancement,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        // Release events give real held-key state for soft drop.
        let enhanced = supports_keyboard_enhancement().unwrap_or(false)
            && execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .is_ok();
        self.keyboard = Keyboard::new(enhanced);
        info!(
            enhanced,
            fps = self.config.fps,
            tick_frames = self.config.tick_frames,
            width = self.config.width,
            height = self.config.height,
            "terminal ready"
        );

        let result = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))
            .map_err(anyhow::Error::from)
            .and_then(|mut terminal| self.run_loop(&mut terminal));

        // Restore
        if enhanced {
            let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        }
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        info!("terminal restored");

        result
    }

    /// One iteration per frame: draw, wait out the frame while collecting keys, simulate.
    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let frame_start = Instant::now();
            terminal.draw(|f| {
                ui::draw(
                    f,
                    &self.state,
                    &self.theme,
                    self.config.tile_size,
                    &mut self.flash,
                    frame_start,
                )
            })?;
            self.flash.retire_if_done();

            let deadline = frame_start + self.frame_duration;
            loop {
                let timeout = deadline.saturating_duration_since(Instant::now());
                if timeout.is_zero() || !event::poll(timeout)? {
                    break;
                }
                if let Event::Key(key) = event::read()? {
                    self.keyboard.handle(key);
                }
            }

            if self.keyboard.quit_requested() {
                info!("quit requested");
                return Ok(());
            }

            let input = self.keyboard.take_frame();
            match self.state.update(input) {
                Some(TickOutcome::Locked { cleared_rows }) if !cleared_rows.is_empty() => {
                    if !self.config.no_animation {
                        self.flash.start(cleared_rows);
                    }
                }
                Some(TickOutcome::Lost) => {
                    debug!("grid reset after loss");
                    self.flash = ClearFlash::default();
                }
                _ => {}
            }
        }
    }
}
