//! Interactive numbered menu over a single engine.

use std::io::{BufRead, Write};

use colored::Colorize;

use fcl_engine::{EngineError, EngineResult, MutationEngine, MutationReceipt};
use fcl_types::{Amount, Identity};

use crate::render;
use crate::script::resolve_identity;

const MENU: [&str; 10] = [
    "Register as member",
    "Record workout",
    "Get member info",
    "Create challenge (owner only)",
    "Join challenge",
    "Get challenge info",
    "Update fitness level",
    "Display ledger stats",
    "Switch caller",
    "Exit",
];

const MEMBERSHIP_TYPES: [&str; 4] = ["Basic", "Premium", "Elite", "Corporate"];

pub struct Console<'e, R, W> {
    engine: &'e MutationEngine,
    caller: Identity,
    input: R,
    output: W,
}

impl<'e, R: BufRead, W: Write> Console<'e, R, W> {
    pub fn new(engine: &'e MutationEngine, caller: Identity, input: R, output: W) -> Self {
        Self {
            engine,
            caller,
            input,
            output,
        }
    }

    pub fn caller(&self) -> &Identity {
        &self.caller
    }

    /// Serve menu choices until `Exit` or end of input.
    pub fn run(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "{}", "=== Fitness Club Ledger ===".bold())?;
        writeln!(self.output, "Acting as {}", self.caller.as_str().cyan())?;
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Select an option: ")? else {
                return Ok(());
            };
            let keep_going = match choice.as_str() {
                "1" => self.register()?,
                "2" => self.record_workout()?,
                "3" => self.member_info()?,
                "4" => self.create_challenge()?,
                "5" => self.join_challenge()?,
                "6" => self.challenge_info()?,
                "7" => self.update_fitness_level()?,
                "8" => self.stats()?,
                "9" => self.switch_caller()?,
                "10" => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                other => {
                    writeln!(self.output, "{} {other:?}", "Unknown option".yellow())?;
                    true
                }
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    fn print_menu(&mut self) -> anyhow::Result<()> {
        writeln!(self.output)?;
        for (index, item) in MENU.iter().enumerate() {
            writeln!(self.output, "{:>2}. {item}", index + 1)?;
        }
        Ok(())
    }

    /// Next trimmed input line, `None` at end of input.
    fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt for a number. Unparseable input is reported and yields `None`,
    /// as does end of input.
    fn prompt_number<T: std::str::FromStr>(&mut self, label: &str) -> anyhow::Result<Option<T>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        match raw.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(self.output, "{} not a number: {raw:?}", "❌ Error:".red().bold())?;
                Ok(None)
            }
        }
    }

    /// Print the outcome of a submission. Rejections are shown and the
    /// session continues; engine faults end it.
    fn report(&mut self, result: EngineResult<MutationReceipt>) -> anyhow::Result<bool> {
        match result {
            Ok(receipt) => render::accepted(&mut self.output, &receipt)?,
            Err(EngineError::Rejected(rejection)) => {
                render::rejected(&mut self.output, &rejection)?
            }
            Err(other) => return Err(other.into()),
        }
        Ok(true)
    }

    fn register(&mut self) -> anyhow::Result<bool> {
        writeln!(self.output, "Membership types:")?;
        for (index, kind) in MEMBERSHIP_TYPES.iter().enumerate() {
            writeln!(self.output, "  {}. {kind}", index + 1)?;
        }
        let Some(choice) = self.prompt("Select type (1-4): ")? else {
            return Ok(false);
        };
        // A number picks from the list; anything else is submitted as typed
        // and left to the engine to judge.
        let membership_type = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| MEMBERSHIP_TYPES.get(i))
            .map(|kind| kind.to_string())
            .unwrap_or(choice);
        let result = self.engine.register_member(&self.caller, membership_type);
        self.report(result)
    }

    fn record_workout(&mut self) -> anyhow::Result<bool> {
        let Some(calories) = self.prompt_number::<u64>("Calories burned: ")? else {
            return Ok(true);
        };
        let Some(minutes) = self.prompt_number::<u32>("Duration (minutes): ")? else {
            return Ok(true);
        };
        let Some(intensity) = self.prompt_number::<u32>("Intensity (1-10): ")? else {
            return Ok(true);
        };
        let result = self
            .engine
            .record_workout(&self.caller, calories, minutes, intensity);
        self.report(result)
    }

    fn member_info(&mut self) -> anyhow::Result<bool> {
        let Some(raw) = self.prompt("Member address (Enter for self): ")? else {
            return Ok(false);
        };
        let who = if raw.is_empty() {
            self.caller.clone()
        } else {
            resolve_identity(&raw)?
        };
        let info = self.engine.member_info(&who)?;
        render::member(&mut self.output, &who, &info)?;
        for ordinal in 0..info.session_count {
            let session = self.engine.workout_session(&who, ordinal)?;
            render::session(&mut self.output, ordinal, &session)?;
        }
        Ok(true)
    }

    fn create_challenge(&mut self) -> anyhow::Result<bool> {
        let Some(name) = self.prompt("Challenge name: ")? else {
            return Ok(false);
        };
        let Some(target) = self.prompt_number::<u64>("Target calories: ")? else {
            return Ok(true);
        };
        let Some(days) = self.prompt_number::<u32>("Duration (days): ")? else {
            return Ok(true);
        };
        let Some(raw_prize) = self.prompt("Prize (coins, Enter for none): ")? else {
            return Ok(false);
        };
        let prize = if raw_prize.is_empty() {
            Amount::ZERO
        } else {
            match Amount::parse_coins(&raw_prize) {
                Ok(prize) => prize,
                Err(err) => {
                    writeln!(self.output, "{} {err}", "❌ Error:".red().bold())?;
                    return Ok(true);
                }
            }
        };
        let result = self
            .engine
            .create_challenge(&self.caller, name, target, days, prize);
        self.report(result)
    }

    fn join_challenge(&mut self) -> anyhow::Result<bool> {
        let count = self.engine.challenge_count()?;
        if count == 0 {
            writeln!(self.output, "No challenges available")?;
        } else {
            writeln!(self.output, "Available challenges: 0 to {}", count - 1)?;
        }
        let Some(challenge_id) = self.prompt_number::<u64>("Challenge ID: ")? else {
            return Ok(true);
        };
        let result = self.engine.join_challenge(&self.caller, challenge_id);
        self.report(result)
    }

    fn challenge_info(&mut self) -> anyhow::Result<bool> {
        let Some(challenge_id) = self.prompt_number::<u64>("Challenge ID: ")? else {
            return Ok(true);
        };
        let info = self.engine.challenge_info(challenge_id)?;
        render::challenge(&mut self.output, &info)?;
        let joined = self.engine.is_participant(challenge_id, &self.caller)?;
        if joined {
            writeln!(self.output, "  You are participating")?;
        }
        Ok(true)
    }

    fn update_fitness_level(&mut self) -> anyhow::Result<bool> {
        let Some(level) = self.prompt_number::<u32>("Fitness level (1-10): ")? else {
            return Ok(true);
        };
        let result = self.engine.update_fitness_level(&self.caller, level);
        self.report(result)
    }

    fn stats(&mut self) -> anyhow::Result<bool> {
        let stats = self.engine.stats()?;
        render::stats(&mut self.output, &stats)?;
        let calendar = self.engine.calendar();
        writeln!(
            self.output,
            "Week {} / Month {} ({})",
            calendar.week,
            calendar.month,
            render::timestamp(calendar.now)
        )?;
        Ok(true)
    }

    fn switch_caller(&mut self) -> anyhow::Result<bool> {
        let Some(raw) = self.prompt("New caller (address or label): ")? else {
            return Ok(false);
        };
        match resolve_identity(&raw) {
            Ok(caller) => {
                self.caller = caller;
                writeln!(self.output, "Acting as {}", self.caller.as_str().cyan())?;
            }
            Err(err) => writeln!(self.output, "{} {err}", "❌ Error:".red().bold())?,
        }
        Ok(true)
    }
}
