use std::str::FromStr;

use crate::dashboard::DashboardTab;
use crate::error::{Error, Result};
use crate::models::ActivityKind;

/// One line of input in watch mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(DashboardTab),
    Refresh,
    ClearCache,
    /// `None` shows every kind again.
    Filter(Option<ActivityKind>),
    ToggleGrouping,
    Quit,
}

pub const HELP: &str = "1-4 switch tab · r refresh · c clear cache · f <commit|pr|issue|all> filter · g group · q quit";

impl FromStr for Command {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let mut words = input.split_whitespace();
        let head = words
            .next()
            .ok_or_else(|| Error::InvalidCommand("empty input".to_string()))?
            .to_lowercase();

        let command = match head.as_str() {
            "r" | "refresh" => Command::Refresh,
            "c" | "clear" | "clear-cache" => Command::ClearCache,
            "g" | "group" => Command::ToggleGrouping,
            "q" | "quit" | "exit" => Command::Quit,
            "f" | "filter" => match words.next() {
                None => Command::Filter(None),
                Some(kind) if kind.eq_ignore_ascii_case("all") => Command::Filter(None),
                Some(kind) => Command::Filter(Some(
                    kind.parse::<ActivityKind>().map_err(Error::InvalidCommand)?,
                )),
            },
            other => Command::Select(other.parse::<DashboardTab>()?),
        };

        if let Some(extra) = words.next() {
            return Err(Error::InvalidCommand(format!("unexpected argument: {}", extra)));
        }
        Ok(command)
    }
}
