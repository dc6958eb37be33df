//! One protocol session: the command dispatcher and the state it guards.
//!
//! stdout is the wire, so the only things ever written to it are protocol
//! replies; diagnostics go to stderr. While a search runs, a background
//! worker owns the board and the engine and prints `bestmove` itself; any
//! command that needs them back first joins the worker, so at most one
//! search is ever in flight.

use std::io::{self, Write};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, anyhow, bail};
use opal_core::{Board, Engine, SearchResult, TimeControl, move_to_uci, parse_move};
use opal_engine::{AlphaBetaEngine, MATE_SCORE, is_mate_score};

type Worker = JoinHandle<(Board, AlphaBetaEngine, SearchResult)>;

pub struct Session {
    board: Option<Board>,
    engine: Option<AlphaBetaEngine>,
    /// In-flight search plus the handle that can cancel it.
    active: Option<(Worker, TimeControl)>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            board: None,
            engine: None,
            active: None,
        }
    }

    /// Dispatch one input line. Returns false when the session should end.
    /// Malformed input is reported and the session keeps going; only I/O
    /// failures bubble up as errors.
    pub fn handle_line(&mut self, line: &str) -> Result<bool> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            return Ok(true);
        };

        match command {
            "uci" => self.identify()?,
            "isready" => {
                reply("readyok")?;
            }
            "ucinewgame" => {
                self.join_search()?;
                if let Some(engine) = self.engine.as_mut() {
                    engine.new_game();
                }
                self.board = Some(Board::startpos());
            }
            "position" => {
                self.join_search()?;
                if let Err(err) = self.set_position(&parts[1..]) {
                    eprintln!("position rejected: {err}");
                }
            }
            "go" => {
                let verbose = parts[1..].iter().any(|&a| a == "verbose" || a == "-v");
                self.go(verbose)?;
            }
            "setoption" => {
                self.join_search()?;
                if let Err(err) = self.set_option(&parts[1..]) {
                    eprintln!("setoption rejected: {err}");
                }
            }
            "halt" => {
                // Cancel the search but let the worker finish and print its
                // bestmove from whatever it had completed.
                if let Some((_, control)) = &self.active {
                    control.stop();
                }
            }
            "stop" | "quit" | "exit" => {
                self.shutdown()?;
                return Ok(false);
            }
            "help" => self.help()?,
            _ => {
                eprintln!("unknown command: {command}");
            }
        }
        Ok(true)
    }

    /// Cancel and join any in-flight search. Called on quit and from main
    /// when stdin closes.
    pub fn shutdown(&mut self) -> Result<()> {
        if let Some((_, control)) = &self.active {
            control.stop();
        }
        self.join_search()
    }

    fn identify(&self) -> Result<()> {
        let mut stdout = io::stdout();
        writeln!(stdout, "id name opal 0.1.0")?;
        writeln!(stdout, "id author opal")?;
        writeln!(
            stdout,
            "option name searchtype type combo default iterative var iterative var fixed"
        )?;
        writeln!(
            stdout,
            "option name searchtime type spin default {} min 1 max 600000",
            AlphaBetaEngine::DEFAULT_TIME_MS
        )?;
        writeln!(
            stdout,
            "option name searchdepth type spin default {} min 1 max 64",
            AlphaBetaEngine::DEFAULT_DEPTH
        )?;
        writeln!(stdout, "uciok")?;
        stdout.flush()?;
        Ok(())
    }

    fn help(&self) -> Result<()> {
        let mut stdout = io::stdout();
        writeln!(stdout, "commands:")?;
        writeln!(stdout, "  uci | isready | ucinewgame")?;
        writeln!(stdout, "  position [fen <FEN> | startpos] [moves <m1> <m2> ...]")?;
        writeln!(stdout, "  go [verbose|-v]")?;
        writeln!(stdout, "  setoption [name] <option> [value] <value>")?;
        writeln!(stdout, "  halt            cancel the running search")?;
        writeln!(stdout, "  stop | quit | exit")?;
        stdout.flush()?;
        Ok(())
    }

    /// `position [fen <FEN> | startpos] [moves ...]`. The session's board
    /// is replaced only when the whole line parses, so a typo in the move
    /// list cannot leave a half-applied position behind.
    fn set_position(&mut self, args: &[&str]) -> Result<()> {
        let (mut board, rest) = match args.first() {
            Some(&"startpos") => (Board::startpos(), &args[1..]),
            Some(&"fen") => {
                let fen_end = args
                    .iter()
                    .position(|&a| a == "moves")
                    .unwrap_or(args.len());
                let fen = args[1..fen_end].join(" ");
                let board = Board::from_fen(&fen).with_context(|| format!("bad FEN '{fen}'"))?;
                (board, &args[fen_end..])
            }
            _ => bail!("expected 'startpos' or 'fen'"),
        };

        if let Some(&"moves") = rest.first() {
            for txt in &rest[1..] {
                let mv = parse_move(&mut board, txt)
                    .ok_or_else(|| anyhow!("illegal or unparsable move '{txt}'"))?;
                board.make_move(mv, false);
            }
        }

        self.board = Some(board);
        Ok(())
    }

    /// `setoption name <x> value <y>` per UCI, or bare `setoption <x> <y>`.
    fn set_option(&mut self, args: &[&str]) -> Result<()> {
        let (name, value) = match args {
            ["name", name, "value", value] => (*name, *value),
            [name, value] => (*name, *value),
            _ => bail!("expected 'setoption [name] <option> [value] <value>'"),
        };

        if !self.ensure_engine().set_option(name, value) {
            bail!("unknown option or bad value: {name} = {value}");
        }
        Ok(())
    }

    /// Hand the board and engine to a worker thread for one search. The
    /// worker prints `bestmove` and returns both when done.
    fn go(&mut self, verbose: bool) -> Result<()> {
        self.join_search()?;

        let mut engine = self
            .engine
            .take()
            .unwrap_or_else(AlphaBetaEngine::new);
        let mut board = self.board.take().unwrap_or_else(Board::startpos);

        let limits = engine.make_limits();
        let control = limits.time_control.clone();
        // Start the clock before the worker exists so a `halt` arriving
        // right after `go` cannot be lost to a late `start`.
        limits.start();

        let worker = thread::spawn(move || {
            let result = engine.search(&mut board, limits);
            print_result(&result, verbose);
            (board, engine, result)
        });
        self.active = Some((worker, control));
        Ok(())
    }

    /// Take the board and engine back from the worker, blocking until the
    /// search finishes. No-op when nothing is running.
    fn join_search(&mut self) -> Result<()> {
        if let Some((worker, _)) = self.active.take() {
            let (board, engine, _) = worker
                .join()
                .map_err(|_| anyhow!("search thread panicked"))?;
            self.board = Some(board);
            self.engine = Some(engine);
        }
        Ok(())
    }

    fn ensure_engine(&mut self) -> &mut AlphaBetaEngine {
        self.engine.get_or_insert_with(AlphaBetaEngine::new)
    }
}

fn reply(text: &str) -> Result<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}

fn print_result(result: &SearchResult, verbose: bool) {
    let mut stdout = io::stdout();
    if verbose {
        let score = if is_mate_score(result.score) {
            // Mate distance in full moves, negative when we are the one
            // getting mated.
            let moves = (MATE_SCORE - result.score.abs() + 1) / 2;
            format!("mate {}", if result.score > 0 { moves } else { -moves })
        } else {
            format!("cp {}", result.score)
        };
        writeln!(
            stdout,
            "info depth {} score {} nodes {}{}",
            result.depth,
            score,
            result.nodes,
            if result.stopped { " stopped" } else { "" }
        )
        .ok();
    }
    match result.best_move {
        Some(mv) => writeln!(stdout, "bestmove {}", move_to_uci(mv)),
        None => writeln!(stdout, "bestmove 0000"),
    }
    .ok();
    stdout.flush().ok();
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
