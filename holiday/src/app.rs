//! Command dispatch.

use std::io::Write;

use clap::CommandFactory;
use th_core::errors::Result;
use th_core::{ensure, fail};
use th_engine::{HolidayEngine, RangeQueryOptions};

use crate::cli::{CacheAction, Cli, Command, ConfigAction, FormatArg, OutputFormat};
use crate::render;
use crate::settings::SettingsStore;

/// Run one parsed command line, writing its output to `out`.
///
/// Errors are returned, not printed; the binary maps them to an exit code.
pub async fn run<W: Write>(
    cli: Cli,
    engine: &HolidayEngine,
    settings: &mut SettingsStore,
    out: &mut W,
) -> Result<()> {
    if cli.no_cache {
        engine.set_bypass_cache(true);
    }
    let default = settings.default_format();
    let fmt = |arg: FormatArg| -> OutputFormat { arg.format.unwrap_or(default) };

    let text = match cli.command {
        Command::Check { date, format } => {
            render::check(&engine.check_date(&date).await?, fmt(format))
        }
        Command::Today { format } => render::check(&engine.check_date("today").await?, fmt(format)),
        Command::Range {
            start,
            end,
            include_workdays,
            format,
        } => {
            let holidays = engine
                .query_range(&start, &end, RangeQueryOptions { holidays_only: true })
                .await?;
            let makeup = if include_workdays {
                Some(engine.related_makeup_days(&start, &end).await?)
            } else {
                None
            };
            render::range(
                engine.resolve(&start)?.iso(),
                engine.resolve(&end)?.iso(),
                &holidays,
                makeup.as_deref(),
                fmt(format),
            )
        }
        Command::Stats {
            year,
            month,
            format,
        } => render::stats(&engine.stats_for_period(year, month).await?, fmt(format)),
        Command::List {
            year,
            holidays_only,
            group_by,
            format,
        } => {
            let records: Vec<_> = engine
                .holidays_for_year(year)
                .await?
                .into_iter()
                .filter(|r| !holidays_only || r.is_holiday)
                .collect();
            render::list(year, &records, group_by, fmt(format))
        }
        Command::Years { format } => render::years(&engine.supported_years(), fmt(format)),
        Command::Next {
            skip_weekends,
            count,
            from,
            format,
        } => {
            ensure!(count >= 1, "count must be at least 1");
            let found = engine.next_holidays(&from, count, skip_weekends).await?;
            render::next(&found, fmt(format))
        }
        Command::Month {
            year,
            month,
            format,
        } => render::month(
            year,
            month,
            &engine.holidays_in_month(year, month).await?,
            fmt(format),
        ),
        Command::Workdays {
            year,
            month,
            format,
        } => render::workdays(
            year,
            month,
            &engine.workdays_for_month(year, month).await?,
            fmt(format),
        ),
        Command::Between {
            start,
            end,
            workdays,
            format,
        } => {
            let stats = engine.workdays_between(&start, &end).await?;
            render::between(
                engine.resolve(&start)?.iso(),
                engine.resolve(&end)?.iso(),
                &stats,
                workdays,
                fmt(format),
            )
        }
        Command::Cache { action } => match action {
            CacheAction::Status { format } => {
                render::cache_status(&engine.cache_status(), fmt(format))
            }
            CacheAction::Clear => {
                engine.clear_cache();
                "Cache cleared".to_string()
            }
        },
        Command::Config { action } => match action {
            ConfigAction::List { format } => render::settings(&settings.list(), fmt(format)),
            ConfigAction::Get { key } => settings.get(&key)?,
            ConfigAction::Set { key, value } => {
                settings.set(&key, &value)?;
                format!("{key} = {value}")
            }
        },
        Command::Health { format } => render::health(&engine.health_report().await, fmt(format)),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, out);
            return Ok(());
        }
    };

    if let Err(e) = writeln!(out, "{text}") {
        fail!("cannot write output: {e}");
    }
    Ok(())
}
