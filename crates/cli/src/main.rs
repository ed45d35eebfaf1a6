use anyhow::Context;
use eleven_core::{
    CardSource, Event, EventBus, GameConfig, Phase, RunError, RunState, SelectTarget, SlotId,
};
use eleven_data::{load_game_config, load_game_config_file, RULES_FILE};
use log::LevelFilter;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Default)]
struct CliOptions {
    seed: Option<u64>,
    config: Option<PathBuf>,
    verbose: bool,
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Select(usize),
    Waste,
    Draw,
    Cancel,
    Hint,
    Board,
    Next,
    Restart,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  s <slot>   select a field card (toggle)
  w          select the waste top (toggle)
  d          draw from stock
  c          cancel selection
  h          hint
  b          show board
  n          deal next round (manual dealing only)
  r          restart match
  q          quit";

fn log_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

fn init_logging(verbose: bool) {
    let _ = env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .format_timestamp(None)
        .try_init();
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--verbose" | "-v" => options.verbose = true,
            "--json" => options.json = true,
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--config" | "-c" => {
                if let Some(value) = args.get(idx + 1) {
                    options.config = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    options
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(Command::Board);
    };
    let command = match head {
        "s" | "select" => {
            let raw = parts.next().ok_or("usage: s <slot>")?;
            let slot = raw
                .parse::<usize>()
                .map_err(|_| format!("not a slot number: {raw}"))?;
            Command::Select(slot)
        }
        "w" | "waste" => Command::Waste,
        "d" | "draw" => Command::Draw,
        "c" | "cancel" => Command::Cancel,
        "h" | "hint" => Command::Hint,
        "b" | "board" => Command::Board,
        "n" | "next" => Command::Next,
        "r" | "restart" => Command::Restart,
        "?" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try help)")),
    };
    Ok(command)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    init_logging(options.verbose);
    if let Err(err) = run_cli(&options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn load_config(options: &CliOptions) -> anyhow::Result<GameConfig> {
    if let Some(path) = &options.config {
        return load_game_config_file(path);
    }
    let assets = Path::new("assets");
    if assets.join(RULES_FILE).exists() {
        return load_game_config(assets);
    }
    Ok(GameConfig::default())
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0xC0FFEE)
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn run_cli(options: &CliOptions) -> anyhow::Result<()> {
    let config = load_config(options)?;
    let seed = options.seed.unwrap_or_else(seed_from_clock);
    println!("seed: {seed}");
    let mut run = RunState::new(config, seed);
    let mut events = EventBus::default();
    let start = Instant::now();
    run.start_match(elapsed_ms(start), &mut events)?;
    flush_events(&mut events, options.json)?;
    print_board(&run);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("{}", prompt_text(&run));
        io::stdout().flush().context("flush stdout")?;
        let mut line = String::new();
        if input.read_line(&mut line).context("read command")? == 0 {
            break;
        }
        run.tick(elapsed_ms(start), &mut events);
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(&mut run, command, &mut events),
            Err(message) => println!("{message}"),
        }
        flush_events(&mut events, options.json)?;
    }

    println!("total score: {}", run.running_total());
    for summary in &run.state.history {
        println!(
            "  round {}: {:?} score {} in {:.1}s",
            summary.round,
            summary.outcome,
            summary.score,
            summary.elapsed_ms as f64 / 1000.0
        );
    }
    Ok(())
}

fn execute(run: &mut RunState, command: Command, events: &mut EventBus) {
    let result: Result<(), RunError> = match command {
        Command::Select(slot) => {
            let known = run
                .round()
                .map(|round| slot < round.board.len())
                .unwrap_or(false);
            if !known {
                println!("no slot {slot}");
                return;
            }
            run.select_card(SelectTarget::Slot(SlotId(slot)), events)
                .map(|outcome| println!("{outcome:?}"))
        }
        Command::Waste => run
            .select_card(SelectTarget::WasteTop, events)
            .map(|outcome| println!("{outcome:?}")),
        Command::Draw => run.draw_from_stock(events).map(|_| ()),
        Command::Cancel => run.cancel_selection(events),
        Command::Hint => {
            match run.hint() {
                Some(combo) => {
                    let slots: Vec<String> = combo.slots.iter().map(|id| id.to_string()).collect();
                    let waste = if combo.waste { " + waste" } else { "" };
                    println!("try: {}{waste}", slots.join(" + "));
                }
                None => println!("no combo on the board; draw"),
            }
            Ok(())
        }
        Command::Board => {
            print_board(run);
            Ok(())
        }
        Command::Next => run.next_round(events),
        Command::Restart => {
            run.restart_match(events);
            Ok(())
        }
        Command::Help => {
            println!("{HELP}");
            Ok(())
        }
        Command::Quit => Ok(()),
    };
    if let Err(err) = result {
        println!("{err}");
    }
}

fn prompt_text(run: &RunState) -> String {
    match (run.phase(), run.round()) {
        (Phase::Playing, Some(round)) => format!(
            "[r{} {:>3}s score {} streak {} sum {}]> ",
            round.number,
            round.clock.remaining_ms() / 1000,
            round.score.score,
            round.score.streak,
            run.selection_sum()
        ),
        (phase, _) => format!("[{phase:?}]> "),
    }
}

fn print_board(run: &RunState) {
    let Some(round) = run.round() else {
        println!("no round dealt");
        return;
    };
    let board = &round.board;
    for (row, _) in board.rows().iter().enumerate() {
        let mut line = String::new();
        for peak in 0..board.peak_count() {
            let cells: Vec<String> = board
                .slots()
                .iter()
                .filter(|slot| slot.peak == peak && slot.row == row)
                .map(|slot| match slot.card() {
                    None => format!("{:>2}:  ", slot.id.0),
                    Some(card) if round.selection.contains(slot.id) => {
                        format!("{:>2}*{:<2}", slot.id.0, card.label())
                    }
                    Some(card) if slot.covered => format!("{:>2}({:<2}", slot.id.0, card.label()),
                    Some(card) => format!("{:>2}[{:<2}", slot.id.0, card.label()),
                })
                .collect();
            line.push_str(&format!("{:^30}", cells.join(" ")));
        }
        println!("{}", line.trim_end());
    }
    let waste = round
        .piles
        .waste_top()
        .map(|card| card.label().to_string())
        .unwrap_or_else(|| "-".to_string());
    let marker = if round.selection.waste { "*" } else { "" };
    println!(
        "stock {}  waste {waste}{marker} ({} cards)  x{:.1}",
        round.piles.stock_len(),
        round.piles.waste.len(),
        round.score.multiplier.as_f64()
    );
}

fn flush_events(events: &mut EventBus, json: bool) -> anyhow::Result<()> {
    for event in events.drain() {
        if json {
            println!("{}", serde_json::to_string(&event).context("encode event")?);
        } else if let Some(text) = format_event(&event) {
            println!("{text}");
        }
    }
    Ok(())
}

fn format_source(source: &CardSource) -> String {
    match source {
        CardSource::Slot(slot) => format!("slot {slot}"),
        CardSource::Waste => "waste".to_string(),
    }
}

fn format_event(event: &Event) -> Option<String> {
    let text = match event {
        Event::RoundStarted {
            round,
            time_budget_ms,
            multiplier_tenths,
            stock,
        } => format!(
            "round {round} started: {}s, x{}.{}, stock {stock}",
            time_budget_ms / 1000,
            multiplier_tenths / 10,
            multiplier_tenths % 10
        ),
        Event::CardRevealed { slot, value } => format!("slot {slot} open: {value}"),
        Event::CardCovered { slot } => format!("slot {slot} covered again"),
        Event::CardRemoved { source } => format!("removed {}", format_source(source)),
        Event::CardDrawn {
            value,
            stock_remaining,
        } => format!("drew {value} ({stock_remaining} left)"),
        Event::SlotRefilled { slot, value } => format!("slot {slot} refilled with {value}"),
        Event::StockExhausted => "stock is empty".to_string(),
        Event::SelectionRejected { target, reason } => {
            format!("cannot select {}: {}", format_source(target), reason.as_str())
        }
        Event::ComboResolved { cards, points } => format!("combo of {cards}: +{points}"),
        Event::PenaltyApplied { sum, penalty } => format!("sum {sum} is over 11: -{penalty}"),
        Event::PeakCleared { peak, bonus } => format!("peak {peak} cleared: +{bonus}"),
        Event::RoundEnded {
            outcome,
            bonus,
            summary,
        } => format!(
            "round {} over ({outcome:?}): score {} (bonus {})",
            summary.round,
            summary.score,
            bonus.total()
        ),
        Event::MatchEnded { total_score, .. } => format!("match over: {total_score}"),
        Event::ScoreChanged { .. } | Event::SelectionChanged { .. } | Event::TimeRemaining { .. } => {
            return None
        }
    };
    Some(text)
}
