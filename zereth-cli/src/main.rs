//! Replay a game written in move notation and render it as text.
//!
//! Usage:
//!   # Play from the default setup
//!   zereth --standard --moves "R4>4,4 R5>3,5 pass"
//!
//!   # Replay a script, printing the board after every action
//!   zereth --script opening.txt --frames
//!
//!   # Show where a piece can go in the final position
//!   zereth --standard --moves "R4>3,4" --destinations E1
//!
//!   # Dump the final game as JSON
//!   zereth --script game.txt --json -o game.json
//!
//! Notation (whitespace separated):
//!   R3@2,3        place Gold rabbit 3 on (2,3)
//!   R3@2,4<2,3    move the already placed rabbit from (2,3) to (2,4)
//!   E1>5,4        move Gold elephant 1 to (5,4)
//!   E1*c1>6,4     elephant pushes or pulls Silver cat 1, ending on (6,4)
//!   pass          end the turn
//!   undo          take back the last step
//!
//! Uppercase letters are Gold pieces, lowercase Silver. M is the camel.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::process;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use zereth_core::{Coord, DestinationTag, Game, Piece, RuleError};

// ============================================================================
// Action notation parser
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Action {
    Place { piece: Piece, target: Coord, source: Option<Coord> },
    Move { piece: Piece, target: Coord },
    Reposition { strong: Piece, weak: Piece, target: Coord },
    Pass,
    Undo,
}

/// Parse "x,y" into a coordinate.
fn parse_coord(s: &str) -> Option<Coord> {
    let (x, y) = s.trim().split_once(',')?;
    Coord::new(x.trim().parse().ok()?, y.trim().parse().ok()?)
}

fn parse_piece(s: &str) -> Result<Piece, String> {
    Piece::from_notation(s).ok_or_else(|| format!("unknown piece '{}'", s))
}

fn parse_target(s: &str) -> Result<Coord, String> {
    parse_coord(s).ok_or_else(|| format!("bad square '{}', expected x,y with both in 1..=8", s))
}

/// Parse a single action token.
fn parse_action(token: &str) -> Result<Action, String> {
    match token {
        "pass" => return Ok(Action::Pass),
        "undo" => return Ok(Action::Undo),
        _ => {}
    }

    if let Some((piece, rest)) = token.split_once('@') {
        let (target, source) = match rest.split_once('<') {
            Some((target, source)) => (target, Some(parse_target(source)?)),
            None => (rest, None),
        };
        return Ok(Action::Place {
            piece: parse_piece(piece)?,
            target: parse_target(target)?,
            source,
        });
    }

    let (actors, target) = token
        .split_once('>')
        .ok_or_else(|| format!("cannot parse action '{}'", token))?;
    let target = parse_target(target)?;
    match actors.split_once('*') {
        Some((strong, weak)) => Ok(Action::Reposition {
            strong: parse_piece(strong)?,
            weak: parse_piece(weak)?,
            target,
        }),
        None => Ok(Action::Move { piece: parse_piece(actors)?, target }),
    }
}

/// Split a script into action tokens, dropping `#` comments.
fn parse_script(text: &str) -> Vec<&str> {
    text.lines()
        .map(|line| line.split_once('#').map_or(line, |(code, _)| code))
        .flat_map(str::split_whitespace)
        .collect()
}

fn apply(game: &Game, action: Action) -> Result<Game, RuleError> {
    match action {
        Action::Place { piece, target, source } => game.place(target, piece, source),
        Action::Move { piece, target } => game.move_piece(piece, target),
        Action::Reposition { strong, weak, target } => game.reposition(strong, weak, target),
        Action::Pass => game.pass_turn(),
        Action::Undo => game.undo(),
    }
}

// ============================================================================
// Output
// ============================================================================

fn render_destinations(out: &mut String, game: &Game, piece: &Piece) {
    let found = game.destinations(piece);
    let _ = writeln!(out, "{} can reach {} squares:", piece, found.len());
    for (coord, tag) in found {
        let note = match tag {
            DestinationTag::GoodToGo => "safe",
            DestinationTag::Danger => "captured",
        };
        let _ = writeln!(out, "  {} {}", coord, note);
    }
}

fn print_usage() {
    eprintln!("Usage: zereth [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --standard             Start from the default setup (otherwise an empty board)");
    eprintln!("  --moves \"<actions>\"    Actions to play, whitespace separated");
    eprintln!("  --script <file>        Read actions from a file, # starts a comment");
    eprintln!("  --frames               Render the board after every action");
    eprintln!("  --destinations <piece> List where a piece can go at the end");
    eprintln!("  --json                 Print the final game as JSON instead of a diagram");
    eprintln!("  -o, --output <file>    Write output to a file");
    eprintln!("  -v, --verbose          Log rule decisions to stderr");
    eprintln!("  -h, --help             Show this help");
    eprintln!();
    eprintln!("Actions: R3@2,3  R3@2,4<2,3  E1>5,4  E1*c1>6,4  pass  undo");
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut standard = false;
    let mut moves_str: Option<String> = None;
    let mut script: Option<String> = None;
    let mut frames = false;
    let mut destinations: Option<String> = None;
    let mut json = false;
    let mut output: Option<String> = None;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--standard" => standard = true,
            "--moves" => {
                i += 1;
                moves_str = Some(args.get(i).cloned().unwrap_or_default());
            }
            "--script" => {
                i += 1;
                script = args.get(i).cloned();
            }
            "--frames" => frames = true,
            "--destinations" => {
                i += 1;
                destinations = args.get(i).cloned();
            }
            "--json" => json = true,
            "-o" | "--output" => {
                i += 1;
                output = args.get(i).cloned();
            }
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    init_tracing(verbose);

    let script_text = match &script {
        Some(path) => fs::read_to_string(path)
            .unwrap_or_else(|err| fail(format!("cannot read {}: {}", path, err))),
        None => String::new(),
    };
    let mut tokens = parse_script(&script_text);
    if let Some(moves) = &moves_str {
        tokens.extend(moves.split_whitespace());
    }

    let focus = destinations
        .as_deref()
        .map(|token| parse_piece(token).unwrap_or_else(|err| fail(err)));

    let mut game = if standard { Game::standard() } else { Game::new() };
    let mut out = String::new();
    if frames {
        let _ = write!(out, "start\n{}\n", game);
    }

    for token in &tokens {
        let action = parse_action(token).unwrap_or_else(|err| fail(err));
        debug!(%token, ?action, "applying");
        game = apply(&game, action).unwrap_or_else(|err| fail(format!("{}: {}", token, err)));
        if frames {
            let _ = write!(out, "after {}\n{}\n", token, game);
        }
    }

    if json {
        let text = serde_json::to_string_pretty(&game).unwrap_or_else(|err| fail(err));
        out.push_str(&text);
        out.push('\n');
    } else if !frames {
        let _ = write!(out, "{}", game);
    }

    if let Some(piece) = &focus {
        render_destinations(&mut out, &game, piece);
    }

    match output {
        Some(path) => {
            fs::write(&path, &out)
                .unwrap_or_else(|err| fail(format!("cannot write {}: {}", path, err)));
            println!("Wrote {}", path);
        }
        None => print!("{}", out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zereth_core::{Color, PieceKind};

    fn c(x: u8, y: u8) -> Coord {
        Coord::new(x, y).unwrap()
    }

    #[test]
    fn test_parse_coord() {
        assert_eq!(parse_coord("2,3"), Some(c(2, 3)));
        assert_eq!(parse_coord(" 8 , 8 "), Some(c(8, 8)));
        assert_eq!(parse_coord("0,3"), None);
        assert_eq!(parse_coord("9,1"), None);
        assert_eq!(parse_coord("23"), None);
    }

    #[test]
    fn test_parse_place() {
        let rabbit = Piece::new(PieceKind::Rabbit, Color::Gold, 3);
        assert_eq!(
            parse_action("R3@2,3"),
            Ok(Action::Place { piece: rabbit, target: c(2, 3), source: None })
        );
        assert_eq!(
            parse_action("R3@2,4<2,3"),
            Ok(Action::Place { piece: rabbit, target: c(2, 4), source: Some(c(2, 3)) })
        );
    }

    #[test]
    fn test_parse_move_and_reposition() {
        let elephant = Piece::new(PieceKind::Elephant, Color::Gold, 1);
        let cat = Piece::new(PieceKind::Cat, Color::Silver, 1);
        assert_eq!(parse_action("E1>5,4"), Ok(Action::Move { piece: elephant, target: c(5, 4) }));
        assert_eq!(
            parse_action("E1*c1>6,4"),
            Ok(Action::Reposition { strong: elephant, weak: cat, target: c(6, 4) })
        );
        assert_eq!(parse_action("pass"), Ok(Action::Pass));
        assert_eq!(parse_action("undo"), Ok(Action::Undo));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_action("E1").is_err());
        assert!(parse_action("X1>2,2").is_err());
        assert!(parse_action("E2>2,2").is_err());
        assert!(parse_action("E1>9,9").is_err());
        assert!(parse_action("R9@1,1").is_err());
    }

    #[test]
    fn test_parse_script_strips_comments() {
        let text = "# opening\nR4>4,4 R5>3,5 # two rabbits\n\npass\n";
        assert_eq!(parse_script(text), vec!["R4>4,4", "R5>3,5", "pass"]);
    }

    #[test]
    fn test_replay_standard_opening() {
        let mut game = Game::standard();
        for token in parse_script("R4>4,4 R5>3,5 R6>3,6 pass") {
            game = apply(&game, parse_action(token).unwrap()).unwrap();
        }
        assert_eq!(game.current_player(), Color::Silver);
        assert_eq!(game.remaining_moves(), 4);
    }

    #[test]
    fn test_destinations_listing() {
        let game = Game::standard();
        let mut out = String::new();
        render_destinations(&mut out, &game, &Piece::new(PieceKind::Rabbit, Color::Gold, 3));
        assert!(out.starts_with("gold rabbit #3 can reach"));
        assert!(out.contains("(3,3) captured"));
    }
}
