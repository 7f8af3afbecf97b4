#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless maze chase session.
//!
//! The binary wires the world and the systems into the tick loop and prints
//! a summary of the session once it ends. It ends early when the player
//! clears the maze.

mod schedule;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use maze_chase_core::{Command, Event};
use maze_chase_system_navigation::{
    Config as NavigationConfig, Navigation, WorldBounds,
};
use maze_chase_system_steering::Steering;
use maze_chase_world::{apply, query, Config as WorldConfig, MazeLayout, World};
use schedule::ModeSchedule;

/// Edge length of a grid cell in pixel units.
const CELL_SIZE: i32 = 32;

/// Arguments controlling a simulated session.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", about = "Runs a headless maze chase session")]
struct Args {
    /// Number of ticks to simulate before stopping.
    #[arg(long, default_value_t = 7_200)]
    ticks: u32,
    /// Seed for the ghosts' patrol target draws.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Number of ticks a power pellet stays active.
    #[arg(long, default_value_t = 1_800)]
    power_ticks: u32,
    /// Path to an ASCII maze layout; the built-in maze is used when omitted.
    #[arg(long)]
    layout: Option<PathBuf>,
}

/// Tallies accumulated over a session's event stream.
#[derive(Debug, Default)]
struct SessionSummary {
    ticks_run: u32,
    dots_eaten: u32,
    pellets_eaten: u32,
    ghosts_eaten: u32,
    times_caught: u32,
    cleared: bool,
}

impl SessionSummary {
    fn absorb(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::DotEaten { .. } => self.dots_eaten += 1,
                Event::PowerPelletEaten { .. } => self.pellets_eaten += 1,
                Event::GhostEaten { .. } => self.ghosts_eaten += 1,
                Event::PlayerCaught => self.times_caught += 1,
                Event::MazeCleared => self.cleared = true,
                _ => {}
            }
        }
    }
}

fn load_layout(path: Option<&PathBuf>) -> Result<MazeLayout> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading layout file {}", path.display()))?;
            let rows: Vec<&str> = text.lines().collect();
            MazeLayout::parse(&rows)
                .with_context(|| format!("parsing layout file {}", path.display()))
        }
        None => Ok(MazeLayout::classic()),
    }
}

fn run_session(layout: MazeLayout, args: &Args) -> SessionSummary {
    let mut world = World::new(layout, WorldConfig::new(CELL_SIZE, args.power_ticks));
    let mut navigation = Navigation::new(NavigationConfig::new(CELL_SIZE, args.seed));
    let mut steering = Steering::new();
    let mut mode_schedule = ModeSchedule::new();
    let mut summary = SessionSummary::default();

    let geometry = *query::geometry(&world);
    let bounds = WorldBounds::new(geometry.pixel_width(), geometry.pixel_height());

    // The world opens in patrol mode, matching the schedule's first stretch.
    let mut events = Vec::new();

    for tick in 0..args.ticks {
        if let Some(mode) = mode_schedule.tick() {
            log::info!("tick {tick}: ghosts switch to {mode:?}");
            apply(&mut world, Command::SetGhostMode { mode }, &mut events);
        }

        apply(&mut world, Command::Tick, &mut events);

        let mut plans = Vec::new();
        navigation.handle(
            &events,
            query::grid(&world),
            bounds,
            &query::player(&world),
            &query::ghost_view(&world),
            &query::pellet_view(&world),
            query::ghost_mode(&world),
            query::power_active(&world),
            &mut plans,
        );
        for command in plans {
            apply(&mut world, command, &mut events);
        }

        let mut steps = Vec::new();
        steering.handle(
            &events,
            &query::player(&world),
            &query::ghost_view(&world),
            &mut steps,
        );
        for command in steps {
            apply(&mut world, command, &mut events);
        }

        // The world can force patrol on its own when a power pellet is
        // eaten; keep the schedule branching on the mode actually in effect.
        for event in &events {
            if let Event::GhostModeChanged { mode } = event {
                mode_schedule.observe(*mode);
            }
        }

        summary.absorb(&events);
        summary.ticks_run = tick + 1;
        events.clear();

        if summary.cleared {
            break;
        }
    }

    summary
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let layout = load_layout(args.layout.as_ref())?;

    let summary = run_session(layout, &args);

    println!("ticks run:      {}", summary.ticks_run);
    println!("dots eaten:     {}", summary.dots_eaten);
    println!("pellets eaten:  {}", summary.pellets_eaten);
    println!("ghosts eaten:   {}", summary.ghosts_eaten);
    println!("times caught:   {}", summary.times_caught);
    println!(
        "result:         {}",
        if summary.cleared {
            "maze cleared"
        } else {
            "session ended"
        }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_args(ticks: u32) -> Args {
        Args {
            ticks,
            seed: 42,
            power_ticks: 1_800,
            layout: None,
        }
    }

    #[test]
    fn sessions_consume_dots_on_the_classic_maze() {
        let summary = run_session(MazeLayout::classic(), &short_args(600));

        assert_eq!(summary.ticks_run, 600);
        assert!(summary.dots_eaten > 0);
    }

    #[test]
    fn small_mazes_are_cleared_early() {
        let layout = MazeLayout::parse(&["XXXXX", "XP  X", "XXXXX"]).expect("valid layout");
        let summary = run_session(layout, &short_args(600));

        assert!(summary.cleared);
        assert!(summary.ticks_run < 600);
        assert_eq!(summary.dots_eaten, 3);
    }

    #[test]
    fn missing_layout_files_are_reported() {
        let error = load_layout(Some(&PathBuf::from("/nonexistent/maze.txt")))
            .expect_err("missing file fails");
        assert!(error.to_string().contains("reading layout file"));
    }
}
