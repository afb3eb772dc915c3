//! The TimFish chess engine.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::todo)]
#![warn(clippy::option_unwrap_used, clippy::result_unwrap_used)]

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use clap::{App, Arg, ArgMatches, SubCommand, crate_version};
use log::info;
use rand::seq::SliceRandom;
use simplelog::{WriteLogger, LevelFilter};
use timfish::cache::{self, Cache, FileCache, MemoryCache};
use timfish::chess::game::Game;
use timfish::chess::{error, variations, Color, RuleEngine};
use timfish::config::{self, Config};
use timfish::engine::Engine;

fn main() -> Result<(), Error> {
    let depth_arg = || Arg::with_name("depth")
        .long("depth")
        .short("d")
        .value_name("DEPTH")
        .takes_value(true)
        .help("Number of replies the engine looks ahead");
    let time_arg = || Arg::with_name("time")
        .long("time")
        .short("t")
        .value_name("MILLISECONDS")
        .takes_value(true)
        .help("Time the engine may spend on a move");
    let moves_arg = || Arg::with_name("moves")
        .value_name("MOVES")
        .multiple(true)
        .help("Moves to play from the starting position (eg e2-e4 e7-e5)");

    let matches =
        App::new("TimFish")
            .version(crate_version!())
            .author("Mike Leany")
            .arg(Arg::with_name("log")
                .long("log")
                .short("l")
                .global(true)
                .help("Turns on logging"))
            .arg(Arg::with_name("log-file")
                .long("log-file")
                .global(true)
                .value_name("LOG_FILE")
                .takes_value(true)
                .default_value("timfish.log")
                .help("Sets the log file if logging is turned on"))
            .arg(Arg::with_name("log-level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .takes_value(true)
                .default_value("info")
                .help("Sets the log level if logging is turned on"))
            .arg(Arg::with_name("config")
                .long("config")
                .short("c")
                .global(true)
                .value_name("FILE")
                .takes_value(true)
                .help("Reads settings from FILE instead of ~/.timfish/config.yaml"))
            .subcommand(SubCommand::with_name("play")
                .about("Plays a game in the terminal (the default)")
                .arg(Arg::with_name("engine")
                    .long("engine")
                    .short("e")
                    .value_name("COLOR")
                    .takes_value(true)
                    .possible_values(&["white", "black", "w", "b"])
                    .help("Lets the engine play COLOR"))
                .arg(depth_arg())
                .arg(time_arg()))
            .subcommand(SubCommand::with_name("best")
                .about("Prints the engine's choice of move after the given moves")
                .arg(depth_arg())
                .arg(time_arg())
                .arg(moves_arg()))
            .subcommand(SubCommand::with_name("selfplay")
                .about("Lets the engine play against itself to fill its cache")
                .arg(Arg::with_name("games")
                    .long("games")
                    .short("g")
                    .value_name("GAMES")
                    .takes_value(true)
                    .default_value("1")
                    .help("Number of games to play"))
                .arg(Arg::with_name("moves")
                    .long("moves")
                    .short("m")
                    .value_name("MOVES")
                    .takes_value(true)
                    .default_value("40")
                    .help("Maximum number of moves in each game"))
                .arg(depth_arg())
                .arg(time_arg()))
            .subcommand(SubCommand::with_name("counts")
                .about("Counts the number of variations from a given position to a specified \
                        depth.\nDefaults to the standard starting position.")
                .arg(depth_arg()
                    .required(true)
                    .help("Depth to search the position"))
                .arg(moves_arg()))
            .get_matches();

    let log_file = PathBuf::from(matches.value_of_os("log-file").expect("INFALLIBLE"));
    let log_level = match matches.value_of("log-level") {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        Some(level) => return Err(Error(format!("{}: invalid log level", level))),
        None => unreachable!(),
    };

    let _logger = if matches.is_present("log") {
        WriteLogger::init(
            log_level,
            simplelog::Config::default(),
            File::create(&log_file).map_err(|err| {
                Error(format!("{}: {}", log_file.display(), err))
            })?)
    } else {
        WriteLogger::init(LevelFilter::Off, simplelog::Config::default(), io::sink())
    };

    let mut config = match matches.value_of_os("config") {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    let (name, sub) = matches.subcommand();
    let sub = sub.unwrap_or(&matches);
    if let Some(depth) = parse_arg(sub, "depth")? {
        config.depth = depth;
    }
    if let Some(time) = parse_arg(sub, "time")? {
        config.time_per_move_ms = time;
    }
    info!("settings: {:?}", config);

    match config.cache_file.clone() {
        Some(path) => run(name, sub, &config, Engine::new(FileCache::open(path)?)),
        None => run(name, sub, &config, Engine::new(MemoryCache::new())),
    }
}

/// Runs the subcommand `name`
fn run<C: Cache>(name: &str, matches: &ArgMatches<'_>, config: &Config, engine: Engine<C>)
-> Result<(), Error> {
    let mut engine = engine.with_mode(config.mode);

    match name {
        "" | "play" => {
            let engine_color = parse_arg::<Color>(matches, "engine")?;
            play(&mut engine, engine_color, config)?;
        },
        "best" => {
            let game = replay(matches)?;
            let best = engine.best_move(
                game.board(), game.turn(), config.depth, config.time_per_move()
            );
            match best {
                Some(mv) => println!("{}", mv),
                None => println!("none"),
            }
        },
        "selfplay" => {
            let games = parse_arg(matches, "games")?.unwrap_or(1);
            let moves = parse_arg(matches, "moves")?.unwrap_or(40);
            selfplay(&mut engine, games, moves, config)?;
        },
        "counts" => {
            let depth = config.depth;
            let game = replay(matches)?;

            println!();
            println!("{}", game.board());
            let count = variations::print(game.board(), game.turn(), depth);
            println!("Depth {} total:\t{:12}\n", depth, count);
        },
        _ => unreachable!(),
    }

    engine.cache_mut().persist()?;

    Ok(())
}

/// Plays a game in the terminal, with the engine taking `engine_color`'s side if given
fn play<C: Cache>(engine: &mut Engine<C>, engine_color: Option<Color>, config: &Config)
-> Result<(), Error> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut game = Game::new();

    loop {
        println!("{}", game.board().diagram());

        if !game.can_move() {
            if game.in_check() {
                println!("CHECKMATE! {} wins", color_name(!game.turn()));
            } else {
                println!("{} has no moves", color_name(game.turn()));
            }
            break;
        }

        let text = if Some(game.turn()) == engine_color {
            let best = engine
                .best_move(game.board(), game.turn(), config.depth, config.time_per_move());
            let mv = match best {
                Some(mv) => mv,
                None => break,
            };
            println!("TimFish plays {}", mv);
            mv.to_string()
        } else {
            print!("{} to move: ", color_name(game.turn()));
            io::stdout().flush().map_err(|err| Error(err.to_string()))?;

            let mut line = String::new();
            if input.read_line(&mut line).map_err(|err| Error(err.to_string()))? == 0 {
                break;
            }
            match line.trim() {
                "exit" | "quit" => break,
                "undo" => {
                    game.undo();
                    continue;
                },
                text => text.to_owned(),
            }
        };

        match game.play_str(&text) {
            Ok(_) => {
                info!("{}", text);
                if game.in_check() {
                    println!("CHECK!");
                }
                println!("Evaluation: {}", engine.evaluate(game.board()));
            },
            Err(err) => println!("Move [{}] invalid: {}", text, err),
        }
    }

    Ok(())
}

/// Lets the engine play both sides of `games` games of at most `moves` moves each, saving the
/// cache after each one. White's first move is chosen at random.
fn selfplay<C: Cache>(engine: &mut Engine<C>, games: usize, moves: usize, config: &Config)
-> Result<(), Error> {
    let mut rng = rand::thread_rng();

    for n in 1 ..= games {
        let mut game = Game::new();
        let openings = RuleEngine::new(game.board()).all_moves(Color::White);

        if let Some(mv) = openings.choose(&mut rng) {
            game.play(*mv)?;
        }

        while game.history().len() < moves {
            let best = engine.best_move(
                game.board(), game.turn(), config.depth, config.time_per_move()
            );
            match best {
                Some(mv) => { game.play(mv)?; },
                None => break,
            }
        }

        let history: Vec<String> = game.history().iter().map(|mv| mv.to_string()).collect();
        println!("Game {}: {}", n, history.join(" "));
        info!("game {} finished after {} moves, {} nodes", n, history.len(), engine.nodes());
        engine.cache_mut().persist()?;
    }

    Ok(())
}

/// Plays the moves given on the command line
fn replay(matches: &ArgMatches<'_>) -> Result<Game, Error> {
    let mut game = Game::new();

    for mv in matches.values_of("moves").into_iter().flatten() {
        game.play_str(mv).map_err(|err| Error(format!("{}: {}", mv, err)))?;
    }

    Ok(game)
}

/// Parses the value of the argument `name`, if it was given
fn parse_arg<T: FromStr>(matches: &ArgMatches<'_>, name: &str) -> Result<Option<T>, Error> {
    match matches.value_of(name) {
        Some(val) => val.parse()
            .map(Some)
            .map_err(|_| Error(format!("{}: invalid value for {}", val, name))),
        None => Ok(None),
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.fmt(f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error { }

impl From<error::Error> for Error {
    fn from(err: error::Error) -> Self {
        Error(err.to_string())
    }
}

impl From<cache::Error> for Error {
    fn from(err: cache::Error) -> Self {
        Error(err.to_string())
    }
}

impl From<config::Error> for Error {
    fn from(err: config::Error) -> Self {
        Error(err.to_string())
    }
}
