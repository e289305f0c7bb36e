//! Command selection from the first token.

use std::collections::HashMap;

use crate::error::SpecError;
use crate::spec::Command;

/// Whether `token` selects `command`.
///
/// The bare name is compared case-insensitively (unless disabled); aliases
/// must match exactly.
pub fn matches_command(command: &Command, token: &str) -> bool {
    if !command.is_name_disabled() && token.to_lowercase() == command.name().to_lowercase() {
        return true;
    }
    command.aliases().any(|alias| alias == token)
}

/// First command, in declaration order, selected by `token`.
pub fn find_command<'c>(commands: &'c [Command], token: &str) -> Option<&'c Command> {
    commands.iter().find(|c| matches_command(c, token))
}

/// Detect aliases that would make command selection ambiguous: an alias used by
/// two commands, or an alias equal to another command's (enabled) name.
///
/// Lookup itself stays first-match-wins; this is an opt-in sanity check for
/// command tables.
pub fn validate_commands(commands: &[Command]) -> Result<(), SpecError> {
    let mut names: HashMap<String, &str> = HashMap::new();
    for c in commands {
        if !c.is_name_disabled() {
            names.entry(c.name().to_lowercase()).or_insert(c.name());
        }
    }

    let mut alias_map: HashMap<&str, &str> = HashMap::new();
    for c in commands {
        for alias in c.aliases() {
            if let Some(&owner) = names.get(&alias.to_lowercase()) {
                if owner != c.name() {
                    return Err(SpecError::CommandAliasConflict {
                        alias: alias.to_string(),
                        first: owner.to_string(),
                        second: c.name().to_string(),
                    });
                }
            }
            if let Some(prev) = alias_map.insert(alias, c.name()) {
                if prev != c.name() {
                    return Err(SpecError::CommandAliasConflict {
                        alias: alias.to_string(),
                        first: prev.to_string(),
                        second: c.name().to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands() -> Vec<Command> {
        vec![
            Command::new("help", "print help")
                .unwrap()
                .short("-h")
                .unwrap()
                .long("--help")
                .unwrap(),
            Command::new("Brightness", "adjust brightness").unwrap(),
            Command::new("secret", "only reachable by alias")
                .unwrap()
                .long("--secret")
                .unwrap()
                .disable_name(),
        ]
    }

    #[test]
    fn bare_name_is_case_insensitive() {
        let cmds = commands();
        assert_eq!(find_command(&cmds, "brightness").unwrap().name(), "Brightness");
        assert_eq!(find_command(&cmds, "BRIGHTNESS").unwrap().name(), "Brightness");
        assert_eq!(find_command(&cmds, "HeLp").unwrap().name(), "help");
    }

    #[test]
    fn aliases_are_case_sensitive() {
        let cmds = commands();
        assert_eq!(find_command(&cmds, "-h").unwrap().name(), "help");
        assert_eq!(find_command(&cmds, "--help").unwrap().name(), "help");
        assert!(find_command(&cmds, "-H").is_none());
        assert!(find_command(&cmds, "--HELP").is_none());
    }

    #[test]
    fn disabled_name_only_matches_aliases() {
        let cmds = commands();
        assert!(find_command(&cmds, "secret").is_none());
        assert_eq!(find_command(&cmds, "--secret").unwrap().name(), "secret");
    }

    #[test]
    fn first_declared_match_wins() {
        let cmds = vec![
            Command::new("build", "").unwrap().short("-b").unwrap(),
            Command::new("bench", "").unwrap().short("-b").unwrap(),
        ];
        assert_eq!(find_command(&cmds, "-b").unwrap().name(), "build");
        assert!(find_command(&cmds, "bui").is_none());
    }

    #[test]
    fn validate_commands_rejects_ambiguous_aliases() {
        assert!(validate_commands(&commands()).is_ok());

        let cmds = vec![
            Command::new("build", "").unwrap().short("-b").unwrap(),
            Command::new("bench", "").unwrap().short("-b").unwrap(),
        ];
        let err = validate_commands(&cmds).unwrap_err();
        assert!(matches!(err, SpecError::CommandAliasConflict { ref alias, .. } if alias == "-b"));
    }
}
