use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Parser;
use log::warn;
use renju::rules::FifthMove;
use renju::{
    AIEngine, Difficulty, EngineKind, GameRule, GameSession, GameState, Player, Pos, SwapDecision,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play Renju and its opening variants against the engine", long_about = None)]
struct Args {
    /// Rule variant, e.g. standard-renju, open-renju, swap2, freestyle
    #[arg(long, default_value = "standard-renju")]
    rule: String,

    /// Search backend: minimax or mcts
    #[arg(long, default_value = "minimax")]
    engine: String,

    /// easy, medium, hard or expert
    #[arg(long, default_value = "medium")]
    difficulty: String,

    /// Operation mode: 'self' for self play, 'human' to play against the engine
    #[arg(long, default_value = "self")]
    mode: String,

    /// Your seat in human mode: 'b' opens as Black, 'w' as White
    #[arg(long, default_value = "b")]
    color: String,

    /// RNG seed for reproducible MCTS games
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many stones
    #[arg(long, default_value_t = 225)]
    max_moves: usize,

    /// Print search statistics
    #[arg(long)]
    verbose: bool,
}

fn parse_rule(name: &str) -> Result<GameRule> {
    match GameRule::from_name(&name.to_lowercase()) {
        Some(rule) => Ok(rule),
        None => {
            let known: Vec<&str> = GameRule::ALL.iter().map(|r| r.name()).collect();
            bail!("Unknown rule '{name}': use one of {}", known.join(", "))
        }
    }
}

fn parse_color(color_str: &str) -> Result<Player> {
    match color_str.to_lowercase().as_str() {
        "b" | "black" => Ok(Player::Black),
        "w" | "white" => Ok(Player::White),
        _ => bail!("Invalid color: use 'b' or 'w'"),
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        bail!("stdin closed");
    }
    Ok(input.trim().to_string())
}

fn read_pos(message: &str) -> Result<Pos> {
    loop {
        let input = prompt(message)?;
        match Pos::parse(&input) {
            Some(pos) => return Ok(pos),
            None => println!("Invalid position! Use a column letter and row, e.g. 'H8'"),
        }
    }
}

fn read_swap_decision(rule: GameRule) -> Result<SwapDecision> {
    loop {
        let choices = if rule == GameRule::Swap2 {
            "stay/swap/more"
        } else {
            "stay/swap"
        };
        match prompt(&format!("Swap decision ({choices}): "))?.as_str() {
            "stay" => return Ok(SwapDecision::Stay),
            "swap" => return Ok(SwapDecision::Swap),
            "more" if rule == GameRule::Swap2 => return Ok(SwapDecision::PlaceTwoMore),
            _ => println!("Unknown decision!"),
        }
    }
}

fn print_result(state: GameState) {
    match state {
        GameState::Won { winner, line } => {
            let cells: Vec<String> = line.iter().map(Pos::to_string).collect();
            println!("\n{winner} wins with {}!", cells.join(" "));
        }
        GameState::Draw => println!("\nBoard is full: draw!"),
        _ => {}
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rule = parse_rule(&args.rule)?;
    let Some(kind) = EngineKind::from_name(&args.engine.to_lowercase()) else {
        bail!("Invalid engine: use 'minimax' or 'mcts'");
    };
    let Some(difficulty) = Difficulty::from_name(&args.difficulty.to_lowercase()) else {
        bail!("Invalid difficulty: use easy, medium, hard or expert");
    };
    let human_seat = match args.mode.to_lowercase().as_str() {
        "self" | "s" => None,
        "human" | "h" => Some(parse_color(&args.color)?),
        other => bail!("Invalid mode '{other}': use 'self' or 'human'"),
    };

    let mut game = GameSession::new(rule);
    let mut engine = match (kind, args.seed) {
        (EngineKind::Mcts, Some(seed)) => AIEngine::with_seed(*game.validator(), difficulty, seed),
        (EngineKind::Minimax, Some(_)) => {
            warn!("--seed has no effect on the minimax engine");
            AIEngine::with_config(*game.validator(), kind, difficulty)
        }
        _ => AIEngine::with_config(*game.validator(), kind, difficulty),
    };
    println!("Rule: {rule}, engine: {kind} ({difficulty:?})");

    loop {
        let state = game.state();
        if state.is_over() {
            println!("\n{}", game.board());
            print_result(state);
            break;
        }
        if game.history().len() >= args.max_moves {
            println!("\n{}", game.board());
            println!("Move limit of {} reached", args.max_moves);
            break;
        }

        let board = *game.board();
        engine.set_validator(*game.validator());
        match state {
            GameState::WaitingForSwap => {
                let seat = game.seat_to_decide().unwrap_or(Player::White);
                let decision = if human_seat == Some(seat) {
                    println!("\n{board}");
                    read_swap_decision(rule)?
                } else {
                    engine.choose_swap(&board)
                };
                println!("{seat} seat decides: {decision:?}");
                game.resolve_swap(decision)?;
            }
            GameState::WaitingForFifthMove => {
                if human_seat.is_some() && human_seat == game.seat_to_decide() {
                    println!("\n{board}");
                    let a = read_pos("First fifth-move proposal: ")?;
                    let b = read_pos("Second fifth-move proposal: ")?;
                    if let Err(e) = game.propose_fifth_moves([a, b]) {
                        println!("{e}");
                    }
                } else {
                    let Some(proposals) = engine.choose_fifth_proposals(&board) else {
                        println!("No fifth-move proposals available!");
                        break;
                    };
                    println!("Black proposes {} and {}", proposals[0], proposals[1]);
                    game.propose_fifth_moves(proposals)?;
                }
            }
            GameState::WaitingForFifthMoveSelection => {
                if human_seat.is_some() && human_seat == game.seat_to_decide() {
                    let pos = read_pos("Keep which fifth move? ")?;
                    if let Err(e) = game.select_fifth_move(pos) {
                        println!("{e}");
                    }
                } else {
                    let Some(FifthMove::Proposed(proposals)) =
                        game.validator().protocol().map(|p| p.fifth())
                    else {
                        bail!("fifth-move selection without proposals");
                    };
                    let pos = engine.choose_fifth_selection(&board, proposals);
                    println!("White keeps {pos}");
                    game.select_fifth_move(pos)?;
                }
            }
            _ => {
                let color = game.side_to_move();
                let seat = game.seat_to_move();
                if human_seat == Some(seat) {
                    println!("\n{board}");
                    let pos = read_pos(&format!("Your move as {color}: "))?;
                    if let Err(e) = game.play(pos) {
                        println!("{e}");
                    }
                    continue;
                }

                let result = engine.get_move_with_stats(&board, color);
                if args.verbose {
                    println!(
                        "{:?}: score {}, {} nodes, {}ms",
                        result.search_type, result.score, result.nodes, result.time_ms
                    );
                }
                let Some(pos) = result.best_move else {
                    println!("No legal moves available!");
                    break;
                };
                println!("{color} plays {pos}");
                game.play(pos)?;
            }
        }
    }

    Ok(())
}
