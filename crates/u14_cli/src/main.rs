//! Match-day console over `u14_core`.
//!
//! Plays the two collaborator roles the core leaves external: the UI layer
//! (commands, confirmation gates) and the clock driver (one tick per elapsed
//! wall-clock second while the clock runs).

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use u14_core::{
    build_export, export, format_clock, FileStore, LiveSession, MatchDocument, MatchSheet,
    MatchStore, Roster,
};

#[derive(Parser)]
#[command(name = "u14")]
#[command(about = "Offline match-day tracker: sheet, live clock, export", long_about = None)]
struct Cli {
    /// Directory holding match documents
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Roster JSON file (array of {id, name})
    #[arg(long, default_value = "data/players.json")]
    roster: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or edit the match sheet
    Sheet {
        #[arg(long)]
        match_id: u32,

        #[arg(long)]
        opponent: Option<String>,

        /// Player ids to add to the call-up
        #[arg(long, value_delimiter = ',')]
        select: Vec<u32>,

        /// Player ids to remove from the call-up (and the XI)
        #[arg(long, value_delimiter = ',')]
        deselect: Vec<u32>,

        /// Player ids to toggle in the starting XI
        #[arg(long, value_delimiter = ',')]
        xi: Vec<u32>,

        /// Call up the whole roster
        #[arg(long, default_value = "false")]
        select_all: bool,

        /// Fill the XI with the first eleven selected players by name
        #[arg(long, default_value = "false")]
        auto_xi: bool,

        #[arg(long)]
        home_score: Option<u32>,

        #[arg(long)]
        away_score: Option<u32>,

        /// Delete the whole match document (sheet and live state)
        #[arg(long, default_value = "false")]
        reset: bool,
    },

    /// Run the live tracking console
    Live {
        /// Match to open; defaults to the last saved one
        #[arg(long)]
        match_id: Option<u32>,
    },

    /// Print (or write) the export document of a finished match
    Export {
        /// Match to export; defaults to the last saved one
        #[arg(long)]
        match_id: Option<u32>,

        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let store = FileStore::new(&cli.data_dir)
        .with_context(|| format!("opening data dir {}", cli.data_dir.display()))?;

    match cli.command {
        Commands::Sheet {
            match_id,
            opponent,
            select,
            deselect,
            xi,
            select_all,
            auto_xi,
            home_score,
            away_score,
            reset,
        } => {
            let roster = Roster::load(&cli.roster)?;
            run_sheet(
                store,
                &roster,
                SheetEdit {
                    match_id,
                    opponent,
                    select,
                    deselect,
                    xi,
                    select_all,
                    auto_xi,
                    home_score,
                    away_score,
                    reset,
                },
            )
        }
        Commands::Live { match_id } => {
            let roster = Roster::load(&cli.roster)?;
            let match_id = resolve_match_id(&store, match_id)?;
            run_live(store, &roster, match_id)
        }
        Commands::Export { match_id, out } => {
            let match_id = resolve_match_id(&store, match_id)?;
            run_export(store, match_id, out)
        }
    }
}

fn resolve_match_id(store: &FileStore, requested: Option<u32>) -> Result<u32> {
    match requested.or(store.last_match_id()?) {
        Some(id) => Ok(id),
        None => bail!("no match id given and no last match saved; fill a sheet first"),
    }
}

struct SheetEdit {
    match_id: u32,
    opponent: Option<String>,
    select: Vec<u32>,
    deselect: Vec<u32>,
    xi: Vec<u32>,
    select_all: bool,
    auto_xi: bool,
    home_score: Option<u32>,
    away_score: Option<u32>,
    reset: bool,
}

fn run_sheet(mut store: FileStore, roster: &Roster, edit: SheetEdit) -> Result<()> {
    if edit.reset {
        store.reset(edit.match_id)?;
        println!("match {} reset", edit.match_id);
        return Ok(());
    }

    let mut doc = store.load(edit.match_id)?.unwrap_or_default();
    let mut sheet = doc.sheet.take().unwrap_or_else(|| MatchSheet::new(edit.match_id));
    sheet.match_id = edit.match_id;

    if let Some(opponent) = edit.opponent {
        sheet.opponent = opponent;
    }
    if edit.select_all {
        for player in roster.iter() {
            sheet.select(player.id);
        }
    }
    for id in edit.select {
        if roster.get(id).is_none() {
            bail!("player {} is not in the roster", id);
        }
        sheet.select(id);
    }
    for id in edit.deselect {
        sheet.deselect(id);
    }
    for id in edit.xi {
        if !sheet.toggle_xi(id) {
            println!("xi toggle refused for player {} (not selected, or XI full)", id);
        }
    }
    if edit.auto_xi {
        sheet.auto_xi(roster);
    }
    if edit.home_score.is_some() {
        sheet.home_score = edit.home_score;
    }
    if edit.away_score.is_some() {
        sheet.away_score = edit.away_score;
    }

    println!(
        "match {}: {} selected, {} in the XI",
        sheet.match_id,
        sheet.selected.len(),
        sheet.xi.len()
    );
    match sheet.validate() {
        Ok(()) => println!("sheet is complete; `u14 live` can start"),
        Err(e) => println!("sheet incomplete: {}", e),
    }

    doc.sheet = Some(sheet);
    store.save(edit.match_id, &doc)?;
    Ok(())
}

fn run_live(store: FileStore, roster: &Roster, match_id: u32) -> Result<()> {
    let mut session = LiveSession::open(store, match_id)
        .context("opening live session (is the sheet filled in?)")?;

    println!(
        "match #{}{} | commands: start pause sub <out> <in> confirm cancel undo half finish status quit",
        match_id,
        if session.sheet().opponent.is_empty() {
            String::new()
        } else {
            format!(" vs {}", session.sheet().opponent)
        }
    );
    print_status(&session, roster);

    // The clock driver: while running, one tick per elapsed wall-clock
    // second, caught up before each command is handled.
    let mut anchor = Instant::now();
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        if session.is_running() {
            let due = anchor.elapsed().as_secs() as u32;
            for _ in 0..due {
                session.tick()?;
            }
            if due > 0 {
                log::debug!("clock driver caught up {} ticks", due);
            }
            anchor += std::time::Duration::from_secs(due.into());
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => {}
            ["start"] => {
                anchor = Instant::now();
                session.start_clock()?;
            }
            ["pause"] => session.pause_clock()?,
            ["sub", out_raw, in_raw] => match (out_raw.parse::<u32>(), in_raw.parse::<u32>()) {
                (Ok(out_id), Ok(in_id)) => {
                    if session.propose_swap(out_id, in_id) {
                        println!(
                            "{} -> {} at {}: `confirm` or `cancel`",
                            player_name(roster, out_id),
                            player_name(roster, in_id),
                            format_clock(session.current_time())
                        );
                    } else {
                        println!("swap refused: outgoing must be on the field, incoming on the bench");
                    }
                }
                _ => println!("usage: sub <out-id> <in-id>"),
            },
            ["confirm"] => {
                if !session.confirm_swap()? {
                    println!("nothing to confirm");
                }
            }
            ["cancel"] => session.cancel_swap(),
            ["undo"] => {
                if !session.undo()? {
                    println!("nothing to undo");
                }
            }
            ["half"] => {
                if ask_yes_no(&stdin, "take halftime? clock back to 00:00 [y/N] ")? {
                    session.halftime_transition()?;
                }
            }
            ["finish"] => {
                if ask_yes_no(&stdin, "end the match and close all playing time? [y/N] ")? {
                    session.finish()?;
                    println!("match finished, run `u14 export`");
                    break;
                }
            }
            ["status"] => {}
            ["quit"] | ["q"] => break,
            other => println!("unknown command: {:?}", other.join(" ")),
        }
        print_status(&session, roster);
    }
    Ok(())
}

fn ask_yes_no(stdin: &io::Stdin, prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn player_name(roster: &Roster, id: u32) -> String {
    roster.get(id).map(|p| p.name.clone()).unwrap_or_else(|| format!("#{}", id))
}

fn print_status<S: MatchStore>(session: &LiveSession<S>, roster: &Roster) {
    println!(
        "half {} | {} | {}",
        session.current_half().number(),
        format_clock(session.current_time()),
        if session.is_running() { "running" } else { "paused" }
    );
    for (label, on_field) in [("field", true), ("bench", false)] {
        let mut rows: Vec<String> = Vec::new();
        for player in roster.by_name() {
            match session.state().players.get(&player.id) {
                Some(state) if state.on_field == on_field => rows.push(format!(
                    "{} #{} {}",
                    player.name,
                    player.id,
                    format_clock(session.live_seconds(player.id))
                )),
                _ => {}
            }
        }
        println!("  {}: {}", label, rows.join(" | "));
    }
}

fn run_export(store: FileStore, match_id: u32, out: Option<PathBuf>) -> Result<()> {
    let doc: MatchDocument = store
        .load(match_id)?
        .with_context(|| format!("no document stored for match {}", match_id))?;
    let document = build_export(match_id, &doc)?;
    let rendered = export::render(&document)?;

    match out {
        Some(path) => {
            fs::write(&path, &rendered)?;
            println!("wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
