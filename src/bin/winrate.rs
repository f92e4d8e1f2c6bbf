use std::error::Error;
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use puno::{EventLog, GameMode, PunoGame, create_bot_from_spec, label_for_spec, run_game};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xC0FFEE_u64 << 32 | 0x5EED_u64;
const PLAYERS: usize = 4;

#[derive(Parser, Debug)]
#[command(
    name = "winrate",
    about = "Run many headless games and report per-seat win rates."
)]
struct Args {
    /// Number of games to simulate
    #[arg(short = 'g', long = "games", default_value_t = 200)]
    games: usize,

    /// Base RNG seed (each game's seed is derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// traditional | battle-puno | death-match
    #[arg(short = 'm', long = "mode", default_value = "traditional")]
    mode: GameMode,

    /// Safety cap on ticks per game; games exceeding this are aborted
    #[arg(long = "max-ticks", default_value_t = 2_000_000)]
    max_ticks: u64,

    /// Optional override for the initial hand size
    #[arg(long = "hand")]
    hand: Option<usize>,

    /// Optional override for the Battle-Puno score goal
    #[arg(long = "goal")]
    goal: Option<u32>,

    /// Play without the four extra wild cards
    #[arg(long = "no-extra", action = ArgAction::SetTrue)]
    no_extra: bool,

    /// Bot driving seat 0 (random[:seed] or first); seats 1-3 use the built-in AI
    #[arg(default_value = "first")]
    host: String,
}

#[derive(Clone, Copy, Debug, Default)]
struct SeatStats {
    wins: usize,
    score: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    // Disallow human in batch sims; it would block waiting for input.
    if label_for_spec(&args.host) == "human" {
        return Err("human players are not supported in winrate runs".into());
    }

    let mut seats = [SeatStats::default(); PLAYERS];
    let mut aborted_games = 0usize;
    let mut total_rounds = 0u64;
    let mut total_ticks = 0u64;
    let started = Instant::now();

    for game_idx in 0..args.games {
        let game_seed = mix_seed(args.seed, game_idx as u64, 0x5EED_15);
        let mut builder = PunoGame::builder(args.mode).with_seed(game_seed);
        if let Some(hand) = args.hand {
            builder = builder.with_initial_hand(hand);
        }
        if let Some(goal) = args.goal {
            builder = builder.with_score_goal(goal);
        }
        if args.no_extra {
            builder = builder.without_extra_cards();
        }
        let mut game = builder.build()?;
        let mut host = create_bot_from_spec(&args.host, 0, mix_seed(args.seed, game_idx as u64, 0))?;
        let mut log = EventLog::new();

        let summary = run_game(&mut game, &mut log, host.as_mut(), args.max_ticks)?;
        total_ticks += summary.ticks;
        total_rounds += u64::from(game.round());
        for (seat, player) in game.players().iter().enumerate() {
            seats[seat].score += u64::from(player.score());
        }
        match game.winner() {
            Some(winner) => seats[winner].wins += 1,
            None => {
                warn!(game = game_idx, seed = game_seed, "game hit the tick cap");
                aborted_games += 1;
            }
        }
    }

    let label = label_for_spec(&args.host);
    println!(
        "{:?}: {} games, host seat driven by '{label}'",
        args.mode, args.games
    );
    for (seat, stats) in seats.iter().enumerate() {
        let rate = if args.games > 0 {
            stats.wins as f64 / args.games as f64
        } else {
            0.0
        };
        let avg_score = if args.games > 0 {
            stats.score as f64 / args.games as f64
        } else {
            0.0
        };
        let who = if seat == 0 { label.as_str() } else { "builtin" };
        println!(
            "  seat {seat} {who:<8}  {}/{}  ({:.2}%)   avg score: {avg_score:>8.2}",
            stats.wins,
            args.games,
            rate * 100.0
        );
    }
    if args.games > 0 {
        println!(
            "\nAverage rounds per game: {:.2}   average ticks per game: {:.0}",
            total_rounds as f64 / args.games as f64,
            total_ticks as f64 / args.games as f64
        );
    }
    if aborted_games > 0 {
        println!("Note: {aborted_games} game(s) hit the tick cap without a winner.");
    }
    println!("Elapsed: {:.3} s", started.elapsed().as_secs_f64());
    Ok(())
}

fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    let mut z =
        base ^ (a.wrapping_mul(0x9E37_79B97F4A7C15)) ^ (b.wrapping_mul(0xBF58_476D1CE4E5B9));
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}
