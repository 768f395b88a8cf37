use std::io::Write;
use std::sync::Arc;

use colored::Colorize;
use serde::Serialize;
use serde_json::json;

use fcl_engine::{EventFilter, MutationEngine};
use fcl_server::FclServer;
use fcl_types::Identity;

use crate::cli::*;
use crate::config::FclConfig;
use crate::console::Console;
use crate::render;
use crate::scenario::{self, CHALLENGES, FITNESS_LEVELS, JOINS, MEMBERS, WORKOUTS};
use crate::script::{self, resolve_identity, Script, ScriptRun};

/// Label the initializing caller is derived from.
pub const DEPLOYER_LABEL: &str = "owner";

pub fn run_command(cli: Cli, config: FclConfig) -> anyhow::Result<()> {
    let format = cli.format;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Simulate(args) => cmd_simulate(&mut out, &config, format, args),
        Command::Console(args) => {
            drop(out);
            cmd_console(&config, args)
        }
        Command::Run(args) => cmd_run(&mut out, &config, format, args),
        Command::Verify(args) => cmd_verify(&mut out, &config, format, args),
        Command::Serve(args) => {
            drop(out);
            cmd_serve(&config, args)
        }
        Command::Identity(args) => cmd_identity(&mut out, format, args),
    }
}

fn build_engine(config: &FclConfig) -> anyhow::Result<MutationEngine> {
    let deployer = Identity::derive(DEPLOYER_LABEL);
    let engine = MutationEngine::from_config(&config.engine, &deployer)?;
    tracing::debug!(owner = %engine.owner()?, "engine initialized");
    Ok(engine)
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> anyhow::Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn cmd_simulate(
    out: &mut impl Write,
    config: &FclConfig,
    format: OutputFormat,
    args: SimulateArgs,
) -> anyhow::Result<()> {
    let engine = build_engine(config)?;
    let report = scenario::run(&engine)?;
    let events = if args.events {
        Some(engine.events(&EventFilter::default())?)
    } else {
        None
    };

    if format == OutputFormat::Json {
        return write_json(out, &json!({ "report": report, "events": events }));
    }

    writeln!(out, "{}", "=== Fitness Club Ledger: Simulation ===".bold())?;
    writeln!(out, "\n--- Accounts ---")?;
    writeln!(out, "Owner: {}", report.stats.owner.as_str().cyan())?;
    for member in &report.members {
        writeln!(out, "{}: {}", member.label, member.identity.as_str().cyan())?;
    }

    writeln!(out, "\n--- Member Statistics ---")?;
    for member in &report.members {
        render::member(out, &member.identity, &member.info)?;
    }

    writeln!(out, "\n--- Challenge Details ---")?;
    for challenge in &report.challenges {
        render::challenge(out, challenge)?;
    }

    writeln!(out, "\n--- Final Ledger State ---")?;
    render::stats(out, &report.stats)?;

    writeln!(out, "\n--- Operations ---")?;
    writeln!(out, "- Member registrations: {}", MEMBERS.len())?;
    writeln!(out, "- Workout recordings: {}", WORKOUTS.len())?;
    writeln!(out, "- Challenge creations: {}", CHALLENGES.len())?;
    writeln!(out, "- Challenge joins: {}", JOINS.len())?;
    writeln!(out, "- Fitness level updates: {}", FITNESS_LEVELS.len())?;

    if let Some(events) = events {
        writeln!(out, "\n--- Events ---")?;
        for event in &events {
            writeln!(
                out,
                "{:>3} {} {}",
                event.seq,
                event.kind.to_string().yellow(),
                event.id.short_hex().dimmed()
            )?;
        }
    }

    writeln!(out, "\n{} Simulation complete", "✓".green().bold())?;
    Ok(())
}

fn cmd_console(config: &FclConfig, args: ConsoleArgs) -> anyhow::Result<()> {
    let engine = build_engine(config)?;
    let caller = resolve_identity(&args.caller)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Console::new(&engine, caller, stdin.lock(), stdout.lock()).run()
}

fn write_script_run(out: &mut impl Write, run: &ScriptRun) -> anyhow::Result<()> {
    for outcome in &run.outcomes {
        write!(
            out,
            "[{}] {} as {}: ",
            outcome.step,
            outcome.op.bold(),
            outcome.caller.short_id()
        )?;
        match (&outcome.receipt, &outcome.rejection) {
            (Some(receipt), _) => render::accepted(out, receipt)?,
            (None, Some(rejection)) => render::rejected(out, rejection)?,
            (None, None) => writeln!(out)?,
        }
    }
    writeln!(
        out,
        "{} accepted, {} rejected",
        run.accepted().to_string().green(),
        run.rejected().to_string().red()
    )?;
    Ok(())
}

fn cmd_run(
    out: &mut impl Write,
    config: &FclConfig,
    format: OutputFormat,
    args: RunArgs,
) -> anyhow::Result<()> {
    let script = Script::load(&args.script)?;
    let engine = build_engine(config)?;
    let run = script::execute(&engine, &script, args.keep_going)?;

    match format {
        OutputFormat::Json => write_json(out, &run)?,
        OutputFormat::Text => write_script_run(out, &run)?,
    }

    if run.rejected() > 0 && !args.keep_going {
        let step = run.outcomes.len() - 1;
        anyhow::bail!("script stopped at rejected step {step} (use --keep-going to continue past rejections)");
    }
    Ok(())
}

fn cmd_verify(
    out: &mut impl Write,
    config: &FclConfig,
    format: OutputFormat,
    args: VerifyArgs,
) -> anyhow::Result<()> {
    let engine = build_engine(config)?;
    if let Some(path) = &args.script {
        script::execute(&engine, &Script::load(path)?, true)?;
    } else if args.scenario {
        scenario::run(&engine)?;
    }

    let owner = engine.owner()?;
    let total_members = engine.total_members()?;
    let challenge_count = engine.challenge_count()?;
    let audit = engine.audit()?;

    match format {
        OutputFormat::Json => write_json(
            out,
            &json!({
                "owner": owner,
                "total_members": total_members,
                "challenge_count": challenge_count,
                "audit": audit,
                "valid": audit.is_valid(),
            }),
        )?,
        OutputFormat::Text => {
            writeln!(out, "{}", "=== Ledger Verification ===".bold())?;
            writeln!(out, "{} Owner: {}", "✓".green(), owner.as_str().cyan())?;
            writeln!(out, "{} Total members: {total_members}", "✓".green())?;
            writeln!(out, "{} Challenge count: {challenge_count}", "✓".green())?;
            writeln!(out, "\n--- Invariant Audit ---")?;
            render::audit(out, &audit)?;
        }
    }

    if !audit.is_valid() {
        anyhow::bail!("ledger audit failed with {} violation(s)", audit.ledger.violations.len());
    }
    if format == OutputFormat::Text {
        writeln!(out, "\n{} Ledger is consistent", "✓".green().bold())?;
    }
    Ok(())
}

fn cmd_serve(config: &FclConfig, args: ServeArgs) -> anyhow::Result<()> {
    let mut server_config = config.server.clone();
    if let Some(bind) = args.bind {
        server_config.bind_addr = bind;
    }
    if args.cors {
        server_config.permissive_cors = true;
    }
    let engine = Arc::new(build_engine(config)?);
    println!("FCL server on {}", server_config.bind_addr.to_string().bold());
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(FclServer::new(server_config, engine).serve())?;
    Ok(())
}

fn cmd_identity(out: &mut impl Write, format: OutputFormat, args: IdentityArgs) -> anyhow::Result<()> {
    let identity = resolve_identity(&args.label)?;
    match format {
        OutputFormat::Json => write_json(out, &json!({ "label": args.label, "identity": identity })),
        OutputFormat::Text => {
            writeln!(out, "{identity}")?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use serde_json::Value;

    use super::*;

    fn capture(f: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> (String, anyhow::Result<()>) {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let result = f(&mut out);
        (String::from_utf8(out).unwrap(), result)
    }

    fn script_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    const REJECTING: &str = r#"
        [[steps]]
        caller = "member-1"
        mutation = { op = "register_member", membership_type = "Basic" }

        [[steps]]
        caller = "member-1"
        mutation = { op = "withdraw_funds" }

        [[steps]]
        caller = "member-1"
        mutation = { op = "update_fitness_level", level = 4 }
    "#;

    #[test]
    fn simulate_text() {
        let (text, result) = capture(|out| {
            cmd_simulate(out, &FclConfig::default(), OutputFormat::Text, SimulateArgs { events: false })
        });
        result.unwrap();
        assert!(text.contains("Total Members: 4"));
        assert!(text.contains("Total Challenges: 3"));
        assert!(text.contains("Challenge 2: Elite Endurance"));
        assert!(text.contains("- Challenge joins: 7"));
        assert!(text.ends_with("Simulation complete\n"));
    }

    #[test]
    fn simulate_json_with_events() {
        let (text, result) = capture(|out| {
            cmd_simulate(out, &FclConfig::default(), OutputFormat::Json, SimulateArgs { events: true })
        });
        result.unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["report"]["stats"]["total_members"], 4);
        assert_eq!(value["report"]["stats"]["escrow_balance"], "1.7");
        assert_eq!(value["report"]["members"][1]["info"]["session_count"], 3);
        // Each workout emits a progress event alongside the workout event.
        let events = value["events"].as_array().unwrap();
        assert_eq!(events.len(), 4 + 8 * 2 + 3 + 7);
    }

    #[test]
    fn run_stops_and_fails_on_rejection() {
        let file = script_file(REJECTING);
        let args = RunArgs {
            script: file.path().to_path_buf(),
            keep_going: false,
        };
        let (text, result) = capture(|out| cmd_run(out, &FclConfig::default(), OutputFormat::Text, args));
        assert!(result.unwrap_err().to_string().contains("rejected step 1"));
        assert!(text.contains("❌ Error: Only owner can execute"));
        assert!(text.contains("1 accepted, 1 rejected"));
    }

    #[test]
    fn run_keep_going_succeeds() {
        let file = script_file(REJECTING);
        let args = RunArgs {
            script: file.path().to_path_buf(),
            keep_going: true,
        };
        let (text, result) = capture(|out| cmd_run(out, &FclConfig::default(), OutputFormat::Json, args));
        result.unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["outcomes"].as_array().unwrap().len(), 3);
        assert_eq!(value["outcomes"][1]["rejection"]["kind"], "OnlyOwner");
        assert_eq!(value["halted"], false);
    }

    #[test]
    fn verify_fresh_ledger() {
        let (text, result) = capture(|out| {
            cmd_verify(
                out,
                &FclConfig::default(),
                OutputFormat::Text,
                VerifyArgs { script: None, scenario: false },
            )
        });
        result.unwrap();
        assert!(text.contains(&format!("Owner: {}", Identity::derive(DEPLOYER_LABEL))));
        assert!(text.contains("Total members: 0"));
        assert!(text.contains("Ledger is consistent"));
    }

    #[test]
    fn verify_after_scenario_json() {
        let (text, result) = capture(|out| {
            cmd_verify(
                out,
                &FclConfig::default(),
                OutputFormat::Json,
                VerifyArgs { script: None, scenario: true },
            )
        });
        result.unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total_members"], 4);
        assert_eq!(value["challenge_count"], 3);
        assert_eq!(value["valid"], true);
    }

    #[test]
    fn verify_replays_script() {
        let file = script_file(REJECTING);
        let args = VerifyArgs {
            script: Some(file.path().to_path_buf()),
            scenario: false,
        };
        let (text, result) = capture(|out| cmd_verify(out, &FclConfig::default(), OutputFormat::Text, args));
        result.unwrap();
        assert!(text.contains("Total members: 1"));
    }

    #[test]
    fn identity_derives_from_label() {
        let (text, result) = capture(|out| {
            cmd_identity(out, OutputFormat::Text, IdentityArgs { label: "member-1".into() })
        });
        result.unwrap();
        assert_eq!(text.trim(), Identity::derive("member-1").as_str());
    }
}
