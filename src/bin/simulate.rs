use std::env;
use std::error::Error;
use std::process;

use tracing_subscriber::EnvFilter;

use puno::{
    EventLog, GameEvent, GameMode, PunoGame, answer_prompt, create_bot_from_spec,
    describe_outcome, render_state,
};

const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;
const DEFAULT_MAX_TICKS: u64 = 500_000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn next_value<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<T, String> {
    let value = args.next().ok_or_else(|| format!("{flag} requires a value"))?;
    value
        .parse::<T>()
        .map_err(|_| format!("invalid {flag} value: {value}"))
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let mut visualize = false;
    let mut seed = DEFAULT_SEED;
    let mut max_ticks = DEFAULT_MAX_TICKS;
    let mut mode = GameMode::Traditional;
    let mut hand: Option<usize> = None;
    let mut hp: Option<u32> = None;
    let mut goal: Option<u32> = None;
    let mut extra_cards = true;
    let mut host_spec: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--visualize" => visualize = true,
            "--seed" => seed = next_value(&mut args, "--seed")?,
            "--max-ticks" => max_ticks = next_value(&mut args, "--max-ticks")?,
            "--mode" => mode = next_value(&mut args, "--mode")?,
            "--hand" => hand = Some(next_value(&mut args, "--hand")?),
            "--hp" => hp = Some(next_value(&mut args, "--hp")?),
            "--goal" => goal = Some(next_value(&mut args, "--goal")?),
            "--no-extra" => extra_cards = false,
            "--help" => {
                print_usage();
                return Ok(());
            }
            other if host_spec.is_none() => host_spec = Some(other.to_string()),
            other => return Err(format!("unexpected argument: {other}").into()),
        }
    }

    let host_spec = host_spec.unwrap_or_else(|| String::from("human"));
    let mut builder = PunoGame::builder(mode).with_seed(seed);
    if let Some(hand) = hand {
        builder = builder.with_initial_hand(hand);
    }
    if let Some(hp) = hp {
        builder = builder.with_initial_hp(hp);
    }
    if let Some(goal) = goal {
        builder = builder.with_score_goal(goal);
    }
    if !extra_cards {
        builder = builder.without_extra_cards();
    }
    let mut game = builder.build()?;
    let mut host = create_bot_from_spec(&host_spec, 0, seed)?;
    let mut log = EventLog::new();

    println!("Starting PUNO ({mode:?}) with host seat '{host_spec}'.\n");
    game.start(&mut log);
    let mut ticks = 0u64;
    while !game.is_finished() {
        if ticks >= max_ticks {
            println!("Max tick limit {max_ticks} reached. Stopping simulation.");
            break;
        }
        game.update(&mut log);
        if visualize && game.awaiting_user().is_some() {
            println!("{}", render_state(&game.state_view(0)?));
        }
        answer_prompt(&mut game, &mut log, host.as_mut())?;
        for event in log.take_events() {
            if visualize {
                narrate(&game, &event);
            } else if matches!(event, GameEvent::RoundOver) {
                print_scores(&game);
            }
        }
        ticks += 1;
    }

    if let Some(winner) = game.winner() {
        print_scores(&game);
        println!(
            "Game finished after {} rounds. Winner: {} (seat {winner}).",
            game.round(),
            game.players()[winner].name()
        );
    } else {
        println!("Simulation stopped before completion.");
    }
    Ok(())
}

fn narrate(game: &PunoGame, event: &GameEvent) {
    let name = |seat: usize| game.players()[seat].name().to_string();
    match event {
        GameEvent::RoundStart => println!("--- round {} ---", game.round()),
        GameEvent::CardDraw {
            player,
            cards,
            peek: true,
        } => {
            let shown = cards.iter().map(ToString::to_string).collect::<Vec<_>>();
            println!("{} peeks {}", name(*player), shown.join(" "));
        }
        GameEvent::CardDraw { player, cards, .. } => {
            println!("{} draws {} card(s)", name(*player), cards.len());
        }
        GameEvent::CardPlay {
            player,
            card,
            outcome,
        } => {
            let who = player.map(name).unwrap_or_else(|| String::from("Dealer"));
            println!("{who}: {}", describe_outcome(*card, outcome));
        }
        GameEvent::HpChange { player, .. } => {
            println!("{} hp is now {}", name(*player), game.players()[*player].hp());
        }
        GameEvent::RoundOver | GameEvent::GameOver => print_scores(game),
        _ => {}
    }
}

fn print_scores(game: &PunoGame) {
    let scores = game
        .players()
        .iter()
        .map(|player| format!("{} {}", player.name(), player.score()))
        .collect::<Vec<_>>();
    println!("Scores after round {}: {}", game.round(), scores.join(", "));
}

fn print_usage() {
    println!("Usage: simulate [OPTIONS] [HOST_BOT]");
    println!("  --mode <mode>         traditional | battle-puno | death-match");
    println!("  --visualize           Narrate every event and show the table before each prompt");
    println!("  --seed <u64>          Seed for shuffling (default: {DEFAULT_SEED:#x})");
    println!("  --max-ticks <u64>     Stop after the specified number of ticks");
    println!("  --hand <1-20>         Initial hand size");
    println!("  --hp <u32>            Initial hp");
    println!("  --goal <u32>          Battle-Puno score goal");
    println!("  --no-extra            Leave the four extra wild cards out");
    println!("  --help                Show this help message");
    println!("HOST_BOT drives seat 0; the other three seats use the built-in AI:");
    println!("  human[:name]          Interactive human-controlled player (default)");
    println!("  random[:seed]         Random legal action");
    println!("  first                 First playable card");
}
