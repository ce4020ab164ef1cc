use clap::{Arg, ArgAction, Command};
use std::error::Error;
use std::io::{BufRead, Write};
use std::path::Path;

use syncpilot::callbacks::CallbackBuilder;
use syncpilot::classify::OutcomeCategory;
use syncpilot::config::Config;
use syncpilot::logging;
use syncpilot::messages::resolve;
use syncpilot::prefs::{keys, JsonPrefStore, PreferenceStore};
use syncpilot::probe::FsProbe;
use syncpilot::session::{RunResult, StartOutcome, SyncSession};
use syncpilot::types::{PathPair, SyncOptions};
use syncpilot::validate::{PathValidator, ValidationFailure, ValidationVerdict};
use syncpilot::{format, summary};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	logging::init_tracing();

	let matches = Command::new("syncpilot")
		.version(env!("CARGO_PKG_VERSION"))
		.about("One-shot rsync runs between two directories, with guard rails")
		.subcommand_required(true)
		.subcommand(
			Command::new("sync")
				.about("Synchronize the source directory into the target")
				.arg(Arg::new("source").required(true).help("Source directory (absolute)"))
				.arg(Arg::new("target").required(true).help("Target directory (absolute)"))
				.arg(
					Arg::new("dry-run")
						.short('n')
						.long("dry-run")
						.action(ArgAction::SetTrue)
						.help("Report what would change without writing anything"),
				)
				.arg(
					Arg::new("mirror")
						.long("mirror")
						.action(ArgAction::SetTrue)
						.help("Delete files in the target that are absent from the source"),
				)
				.arg(
					Arg::new("exclude-system")
						.long("exclude-system")
						.action(ArgAction::SetTrue)
						.help("Skip trash and indexing directories"),
				)
				.arg(
					Arg::new("yes")
						.short('y')
						.long("yes")
						.action(ArgAction::SetTrue)
						.help("Confirm destructive runs without prompting"),
				)
				.arg(
					Arg::new("save-log")
						.long("save-log")
						.value_name("FILE")
						.help("Write the full run log to FILE afterwards"),
				),
		)
		.subcommand(
			Command::new("check")
				.about("Run the precondition checks without syncing")
				.arg(Arg::new("source").required(true))
				.arg(Arg::new("target").required(true))
				.arg(Arg::new("mirror").long("mirror").action(ArgAction::SetTrue)),
		)
		.get_matches();

	let config = Config::load()?;

	if let Some(sub) = matches.subcommand_matches("sync") {
		let code = cmd_sync(&config, sub).await?;
		std::process::exit(code);
	} else if let Some(sub) = matches.subcommand_matches("check") {
		let code = cmd_check(&config, sub);
		std::process::exit(code);
	}

	Ok(())
}

fn options_from(matches: &clap::ArgMatches) -> SyncOptions {
	SyncOptions {
		dry_run: matches.get_flag("dry-run"),
		mirror: matches.get_flag("mirror"),
		exclude_system_paths: matches.get_flag("exclude-system"),
	}
}

fn pair_from(matches: &clap::ArgMatches) -> Result<PathPair, Box<dyn Error>> {
	let source = matches.get_one::<String>("source").ok_or("source argument required")?;
	let target = matches.get_one::<String>("target").ok_or("target argument required")?;
	Ok(PathPair::new(source.as_str(), target.as_str()))
}

async fn cmd_sync(config: &Config, matches: &clap::ArgMatches) -> Result<i32, Box<dyn Error>> {
	let options = options_from(matches);
	let pair = pair_from(matches)?;
	let auto_confirm = matches.get_flag("yes");
	let log_path = matches.get_one::<String>("save-log").cloned();

	let mut prefs = JsonPrefStore::open(&config.state_dir).await?;
	prefs.set(keys::SOURCE_PATH, pair.source.to_str()).await?;
	prefs.set(keys::TARGET_PATH, pair.target.to_str()).await?;
	prefs.set(keys::DRY_RUN, Some(if options.dry_run { "1" } else { "0" })).await?;
	prefs.set(keys::MIRROR, Some(if options.mirror { "1" } else { "0" })).await?;
	prefs
		.set(keys::EXCLUDE_SYSTEM, Some(if options.exclude_system_paths { "1" } else { "0" }))
		.await?;
	// a fresh pair invalidates whatever timestamp the previous pair earned
	prefs.set(keys::LAST_SYNC, None).await?;

	let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<RunResult>();
	let callbacks = CallbackBuilder::new()
		.on_completed(move |result: &RunResult| {
			let _ = tx.send(result.clone());
		})
		.build();

	let session = SyncSession::builder().with_config(config).callbacks(callbacks).build();
	session.arm(pair.clone(), options)?;

	let mut outcome = session.start()?;

	if let StartOutcome::AwaitingConfirmation(warning) = outcome {
		let failure = ValidationFailure::ConfirmationRequired(warning);
		let (title, message) = failure.text_keys();
		eprintln!("{}: {}", resolve(title), resolve(message));

		if auto_confirm || prompt_yes("Proceed?")? {
			outcome = session.confirm_destructive()?;
		} else {
			session.decline_destructive()?;
			eprintln!("Sync aborted.");
			return Ok(0);
		}
	}

	match outcome {
		StartOutcome::Started => {}
		StartOutcome::Rejected(failure) => {
			render_failure(&failure);
			return Ok(1);
		}
		StartOutcome::AwaitingConfirmation(_) => {
			// the confirmed pass skips the gate, so this cannot recur
			return Ok(1);
		}
	}

	eprintln!("Syncing...");

	let result = tokio::select! {
		result = rx.recv() => match result {
			Some(r) => r,
			None => return Err("session dropped without completing".into()),
		},
		_ = tokio::signal::ctrl_c() => {
			session.cancel();
			eprintln!("Cancelled.");
			return Ok(130);
		}
	};

	prefs.set(keys::LAST_SYNC, Some(&result.finished_at.timestamp().to_string())).await?;

	render_result(&result, options.mirror);

	if let Some(path) = log_path {
		save_log(Path::new(&path), &result, session.command_line().as_deref(), &pair)?;
		eprintln!("Log written to {}", path);
	}

	Ok(result.outcome.code)
}

fn cmd_check(config: &Config, matches: &clap::ArgMatches) -> i32 {
	let options = SyncOptions {
		mirror: matches.get_flag("mirror"),
		..Default::default()
	};
	let pair = match pair_from(matches) {
		Ok(p) => p,
		Err(e) => {
			eprintln!("{}", e);
			return 1;
		}
	};

	let probe = FsProbe;
	let policy = config.path_policy();
	let validator = PathValidator::new(&probe, &policy);

	match validator.validate(&pair, &options, false) {
		ValidationVerdict::Pass => {
			println!("OK: both directories pass the precondition checks.");
			0
		}
		ValidationVerdict::Fail(ValidationFailure::ConfirmationRequired(warning)) => {
			let failure = ValidationFailure::ConfirmationRequired(warning);
			let (title, message) = failure.text_keys();
			println!("OK, with confirmation: {}: {}", resolve(title), resolve(message));
			0
		}
		ValidationVerdict::Fail(failure) => {
			render_failure(&failure);
			1
		}
	}
}

fn render_failure(failure: &ValidationFailure) {
	let (title, message) = failure.text_keys();
	eprintln!("{}: {}", resolve(title), resolve(message));

	match failure {
		ValidationFailure::Missing { source, target } => {
			if *source {
				eprintln!("  source: not found");
			}
			if *target {
				eprintln!("  target: not found");
			}
		}
		ValidationFailure::PermissionDenied { source, target } => {
			if *source {
				eprintln!("  source: permission denied");
			}
			if *target {
				eprintln!("  target: permission denied");
			}
		}
		_ => {}
	}
}

fn render_result(result: &RunResult, mirror: bool) {
	let finished = result.finished_at.with_timezone(&chrono::Local);
	println!("Last sync on: {}", finished.format("%Y/%m/%d %H:%M:%S"));
	println!("{}", resolve(result.outcome.title_key));

	match &result.summary {
		Some(s) => render_summary(s, mirror),
		None => println!("  {}", resolve("exit_unknown")),
	}

	if result.outcome.category != OutcomeCategory::Success {
		println!("{}", resolve(result.outcome.message_key));
	}
}

fn render_summary(s: &summary::TransferSummary, mirror: bool) {
	// deletions are always counted but only meaningful when mirroring
	let deleted_note = if mirror { "" } else { " (inactive)" };
	println!("  {} deleted{}", format::count_files(s.files_deleted), deleted_note);
	println!(
		"  {} transferred ({})",
		format::count_files(s.files_transferred),
		format::factor_bytes(s.bytes_transferred)
	);
	println!("  {} ({})", format::count_files(s.total_files), format::factor_bytes(s.total_bytes));
}

fn prompt_yes(question: &str) -> Result<bool, Box<dyn Error>> {
	print!("{} [y/N] ", question);
	std::io::stdout().flush()?;

	let mut line = String::new();
	std::io::stdin().lock().read_line(&mut line)?;
	Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn save_log(
	path: &Path,
	result: &RunResult,
	command: Option<&str>,
	pair: &PathPair,
) -> std::io::Result<()> {
	let finished = result.finished_at.with_timezone(&chrono::Local);
	let mut log = format!("{}\n", finished.format("%A, %d %B %Y %H:%M:%S"));

	log.push_str(&format!("\nCommand: {}\n", command.unwrap_or("")));
	log.push_str(&format!("Source: {}\n", pair.source.display()));
	log.push_str(&format!("Target: {}\n", pair.target.display()));

	if !result.stderr.is_empty() {
		log.push_str("\nstderr\n--------------------------\n\n");
		log.push_str(&result.stderr);
	}

	log.push_str("\nstdout\n--------------------------\n\n");
	log.push_str(&result.stdout);

	std::fs::write(path, log)
}

// vim: ts=4
