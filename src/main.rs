use arboard::Clipboard;
use log::{error, info, warn};
use macroquad::prelude::*;
use mazewalk::{Cell, Config, Layout, Simulation, StepOutcome};

const INFO_PANEL_HEIGHT: f32 = 190.0;
const MIN_CELL_SIZE: f32 = 2.0;
const MIN_WINDOW_WIDTH: f32 = 480.0;
const MIN_WINDOW_HEIGHT: f32 = 360.0;
const MAX_WINDOW_WIDTH: f32 = 1600.0;
const MAX_WINDOW_HEIGHT: f32 = 1000.0;

/// Visualization state
struct VisState {
    sim: Simulation,
    config: Config,
    paused: bool,
    accumulator: f32,
    last_outcome: Option<StepOutcome>,
}

impl VisState {
    fn new(config: Config) -> Result<Self, mazewalk::Error> {
        let sim = Simulation::from_config(&config)?;
        Ok(VisState {
            sim,
            config,
            paused: false,
            accumulator: 0.0,
            last_outcome: None,
        })
    }

    /// Auto-step at the configured rate
    fn update(&mut self, delta_time: f32) {
        if self.paused || self.sim.is_finished() {
            return;
        }

        let interval = 1.0 / self.config.visual.steps_per_second.max(0.1);
        self.accumulator += delta_time;
        while self.accumulator >= interval && !self.sim.is_finished() {
            self.accumulator -= interval;
            self.last_outcome = Some(self.sim.tick());
        }
    }

    fn single_step(&mut self) {
        if !self.sim.is_finished() {
            self.last_outcome = Some(self.sim.tick());
        }
    }

    fn reset(&mut self) {
        self.sim.reset();
        self.accumulator = 0.0;
        self.last_outcome = None;
        info!("Run reset");
    }

    fn copy_to_clipboard(&self) {
        let maze_string = self.sim.render();
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&maze_string) {
                    warn!("Failed to copy to clipboard: {}", e);
                } else {
                    info!("Maze copied to clipboard!");
                    // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                warn!("Failed to access clipboard: {}", e);
            }
        }
    }

    /// Replace the maze with a layout pasted from the clipboard
    fn paste_from_clipboard(&mut self) {
        let text = match Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to read clipboard: {}", e);
                return;
            }
        };

        let sim = Layout::parse(&text)
            .map_err(mazewalk::Error::from)
            .and_then(|layout| Simulation::with_layout(layout, &self.config));
        match sim {
            Ok(sim) => {
                info!("Pasted {}x{} maze", sim.grid().width(), sim.grid().height());
                self.sim = sim;
                self.accumulator = 0.0;
                self.last_outcome = None;
            }
            Err(e) => warn!("Clipboard does not hold a usable maze: {}", e),
        }
    }

    fn save_step_log(&self) {
        let Some(step_log) = self.sim.step_log() else {
            warn!("Step log is disabled");
            return;
        };
        let path = &self.config.logging.step_log_path;
        match step_log.save_to_file(path) {
            Ok(()) => info!("Step log saved to {}\n{}", path, step_log.summary()),
            Err(e) => warn!("Failed to save step log: {}", e),
        }
    }

    fn cell_color(cell: Cell) -> Color {
        match cell {
            Cell::Path => Color::from_rgba(60, 60, 60, 255),
            Cell::Wall => Color::from_rgba(150, 40, 40, 255),
            Cell::Visited => Color::from_rgba(100, 200, 100, 255),
            Cell::Dead => Color::from_rgba(90, 90, 40, 255),
            Cell::Occupied => BLUE,
        }
    }

    /// Shrink cells so the whole maze plus the info panel fits the window
    fn fitted_cell_size(preferred: f32, cols: i32, rows: i32, width: f32, height: f32) -> f32 {
        let fit_x = width / cols.max(1) as f32;
        let fit_y = (height - INFO_PANEL_HEIGHT).max(0.0) / rows.max(1) as f32;
        preferred.min(fit_x).min(fit_y).max(MIN_CELL_SIZE)
    }

    fn draw(&self) {
        let visual = &self.config.visual;
        clear_background(Color::from_rgba(
            visual.background_r,
            visual.background_g,
            visual.background_b,
            255,
        ));

        let grid = self.sim.grid();
        let size = Self::fitted_cell_size(
            visual.cell_size,
            grid.cols,
            grid.rows,
            screen_width(),
            screen_height(),
        );

        // Draw grid cells
        for y in 0..grid.rows {
            for x in 0..grid.cols {
                let px = x as f32 * size;
                let py = y as f32 * size;
                let color = match grid.cell_at(x, y) {
                    Ok(cell) => Self::cell_color(cell),
                    Err(_) => continue,
                };
                draw_rectangle(px, py, size - 1.0, size - 1.0, color);
            }
        }

        // Draw info
        let agent = self.sim.agent();
        let (ax, ay) = agent.position();
        let mut lines = vec![
            format!("Agent: ({}, {}) facing {:?}", ax, ay, agent.direction()),
            format!("Mode: {:?}{}", agent.mode(), if self.paused { " [paused]" } else { "" }),
            format!("Tick: {} / {}", self.sim.ticks(), self.sim.budget()),
            format!(
                "Last step: {}",
                self.last_outcome.map_or("-".to_string(), |o| format!("{:?}", o))
            ),
        ];
        if visual.show_legend {
            lines.push("Space: pause  N: step  R: reset".to_string());
            lines.push("C: copy maze  V: paste layout  S: save step log".to_string());
            lines.push("Esc: close window".to_string());
        }

        let top = grid.rows as f32 * size + 24.0;
        for (i, line) in lines.iter().enumerate() {
            draw_text(line, 10.0, top + i as f32 * 22.0, 20.0, WHITE);
        }
    }
}

fn window_conf() -> Conf {
    let config = Config::load();
    let layout = Layout::load(&config.maze.layout_path).unwrap_or_else(|_| Layout::builtin());
    let size = config.visual.cell_size;
    let width = (layout.width() as f32 * size).clamp(MIN_WINDOW_WIDTH, MAX_WINDOW_WIDTH);
    let height = (layout.height() as f32 * size + INFO_PANEL_HEIGHT)
        .clamp(MIN_WINDOW_HEIGHT, MAX_WINDOW_HEIGHT);
    Conf {
        window_title: config.visual.window_title,
        window_width: width as i32,
        window_height: height as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = Config::load();
    env_logger::Builder::from_default_env()
        .filter_level(config.log_level())
        .init();

    let mut state = match VisState::new(config) {
        Ok(state) => state,
        Err(e) => {
            error!("Cannot start: {}", e);
            return;
        }
    };

    loop {
        // Handle input
        if is_key_pressed(KeyCode::Space) {
            state.paused = !state.paused;
        }
        if is_key_pressed(KeyCode::N) {
            state.single_step();
        }
        if is_key_pressed(KeyCode::R) {
            state.reset();
        }
        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }
        if is_key_pressed(KeyCode::V) {
            state.paste_from_clipboard();
        }
        if is_key_pressed(KeyCode::S) {
            state.save_step_log();
        }

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        state.update(get_frame_time());
        state.draw();

        next_frame().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_maze_keeps_configured_cell_size() {
        let size = VisState::fitted_cell_size(32.0, 7, 7, 800.0, 600.0);
        assert_eq!(size, 32.0);
    }

    #[test]
    fn test_wide_maze_shrinks_to_window() {
        // 40 columns at 32px would need 1280px
        let size = VisState::fitted_cell_size(32.0, 40, 7, 800.0, 600.0);
        assert_eq!(size, 20.0);
        assert!(40.0 * size <= 800.0);
    }

    #[test]
    fn test_tall_maze_leaves_room_for_info() {
        let size = VisState::fitted_cell_size(32.0, 7, 41, 800.0, 600.0);
        assert_eq!(size, 10.0);
        assert!(41.0 * size + INFO_PANEL_HEIGHT <= 600.0);
    }
}
