//! Positional arguments plus `--flag value` options.

use std::collections::HashMap;

use crate::cli::core::CommandError;

#[derive(Debug, Default)]
pub struct ParsedArgs {
    pub positional: Vec<String>,
    options: HashMap<&'static str, String>,
    switches: Vec<&'static str>,
}

impl ParsedArgs {
    /// Splits `args`. `value_flags` consume the following token; `switch_flags` stand alone.
    /// Only tokens starting with `--` are treated as flags, so `-5` stays positional.
    pub fn parse(
        args: &[&str],
        value_flags: &[&'static str],
        switch_flags: &[&'static str],
    ) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positional.push(arg.to_string());
                continue;
            };
            if let Some(flag) = value_flags.iter().find(|flag| **flag == name) {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`--{flag}` needs a value"))
                })?;
                parsed.options.insert(*flag, value.to_string());
            } else if let Some(flag) = switch_flags.iter().find(|flag| **flag == name) {
                parsed.switches.push(*flag);
            } else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{arg}`"
                )));
            }
        }
        Ok(parsed)
    }

    pub fn option(&self, flag: &str) -> Option<&str> {
        self.options.get(flag).map(String::as_str)
    }

    pub fn has(&self, switch: &str) -> bool {
        self.switches.iter().any(|name| *name == switch)
    }

    /// Remaining positional words from `from` on, joined with single spaces.
    pub fn rest(&self, from: usize) -> String {
        self.positional
            .get(from..)
            .map(|words| words.join(" "))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_flags_from_positionals() {
        let parsed = ParsedArgs::parse(
            &["expense", "-5", "Eating", "out", "--desc", "late dinner", "--yes"],
            &["desc"],
            &["yes"],
        )
        .unwrap();
        assert_eq!(parsed.positional, vec!["expense", "-5", "Eating", "out"]);
        assert_eq!(parsed.option("desc"), Some("late dinner"));
        assert!(parsed.has("yes"));
        assert_eq!(parsed.rest(2), "Eating out");
        assert_eq!(parsed.rest(9), "");
    }

    #[test]
    fn rejects_unknown_and_dangling_flags() {
        assert!(ParsedArgs::parse(&["--colour"], &["desc"], &[]).is_err());
        assert!(ParsedArgs::parse(&["--desc"], &["desc"], &[]).is_err());
    }
}
