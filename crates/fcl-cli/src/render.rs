//! Text rendering shared by the commands and the console.

use std::io::{self, Write};

use colored::Colorize;

use fcl_engine::{
    ChallengeInfo, EngineAudit, LedgerStats, MemberInfo, MutationReceipt, WorkoutSessionInfo,
};
use fcl_types::{Identity, LedgerTime, MutationError};

/// Wall-clock rendering of a ledger timestamp; `-` for the zero time.
pub fn timestamp(time: LedgerTime) -> String {
    if time.is_zero() {
        return "-".into();
    }
    i64::try_from(time.as_secs())
        .ok()
        .and_then(|secs| chrono::DateTime::<chrono::Utc>::from_timestamp(secs, 0))
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| time.to_string())
}

pub fn accepted(out: &mut impl Write, receipt: &MutationReceipt) -> io::Result<()> {
    writeln!(
        out,
        "{} {} ({})",
        "✓".green().bold(),
        receipt.outcome.summary(),
        receipt.receipt_id.short_id().dimmed()
    )
}

pub fn rejected(out: &mut impl Write, rejection: &MutationError) -> io::Result<()> {
    writeln!(out, "{} {}", "❌ Error:".red().bold(), rejection.reason)
}

pub fn member(out: &mut impl Write, who: &Identity, info: &MemberInfo) -> io::Result<()> {
    writeln!(out, "Member {}", who.as_str().cyan())?;
    if info.membership_type.is_empty() {
        writeln!(out, "  {}", "not registered".yellow())?;
    } else {
        writeln!(out, "  Type: {}", info.membership_type)?;
    }
    writeln!(out, "  Active: {}", yes_no(info.is_active))?;
    writeln!(out, "  Sessions: {}", info.session_count)?;
    writeln!(out, "  Fitness level: {}", info.fitness_level)?;
    writeln!(out, "  Joined: {}", timestamp(info.join_timestamp))
}

pub fn session(out: &mut impl Write, ordinal: u64, info: &WorkoutSessionInfo) -> io::Result<()> {
    writeln!(
        out,
        "  #{ordinal}: {} kcal, {} min, intensity {}/10 at {}",
        info.calories_burned,
        info.duration_minutes,
        info.intensity,
        timestamp(info.timestamp)
    )
}

pub fn challenge(out: &mut impl Write, info: &ChallengeInfo) -> io::Result<()> {
    if info.name.is_empty() {
        return writeln!(out, "Challenge {}: {}", info.id, "not found".yellow());
    }
    writeln!(out, "Challenge {}: {}", info.id, info.name.bold())?;
    writeln!(out, "  Target: {} calories", info.target_calories)?;
    writeln!(out, "  Duration: {} days", info.duration_days)?;
    writeln!(out, "  Start: {}", timestamp(info.start_timestamp))?;
    writeln!(out, "  End: {}", timestamp(info.end_timestamp))?;
    writeln!(out, "  Prize: {}", info.prize_amount)?;
    writeln!(out, "  Active: {}", yes_no(info.is_active))?;
    writeln!(out, "  Participants: {}", info.participant_count)
}

pub fn stats(out: &mut impl Write, stats: &LedgerStats) -> io::Result<()> {
    writeln!(out, "Owner: {}", stats.owner.as_str().cyan())?;
    writeln!(out, "Total Members: {}", stats.total_members)?;
    writeln!(out, "Total Challenges: {}", stats.challenge_count)?;
    writeln!(out, "Escrow: {}", stats.escrow_balance)?;
    writeln!(out, "Withdrawn: {}", stats.total_withdrawn)
}

pub fn audit(out: &mut impl Write, audit: &EngineAudit) -> io::Result<()> {
    let report = &audit.ledger;
    writeln!(out, "  Counters: {}", check(report.counters_consistent))?;
    writeln!(out, "  Session ordinals: {}", check(report.sessions_contiguous))?;
    writeln!(out, "  Challenge ids: {}", check(report.challenges_contiguous))?;
    writeln!(out, "  Escrow: {}", check(report.escrow_balanced))?;
    match &audit.event_log_error {
        None => writeln!(out, "  Event log: {} ({} events)", check(true), audit.event_count)?,
        Some(err) => writeln!(out, "  Event log: {} {err}", check(false))?,
    }
    for violation in &report.violations {
        writeln!(out, "  {} {}", "!".red().bold(), violation.description)?;
    }
    writeln!(out, "  State digest: {}", audit.state_digest.dimmed())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn check(ok: bool) -> colored::ColoredString {
    if ok {
        "valid".green()
    } else {
        "violated".red().bold()
    }
}
