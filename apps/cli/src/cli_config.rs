use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use grantmap_domain::PermissionContext;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "grantmap-cli")]
#[command(about = "Decode and encode granular permission rows", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Context used for decode input that does not name one
    #[arg(long, global = true, env = "GRANTMAP_CONTEXT", value_name = "CONTEXT")]
    pub context: Option<PermissionContext>,

    /// Pretty-print the JSON output
    #[arg(
        long,
        global = true,
        env = "GRANTMAP_PRETTY_OUTPUT",
        default_value_t = true,
        action = ArgAction::Set,
        value_name = "BOOL"
    )]
    pub pretty_output: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Decode stored rows into presentation models
    Decode {
        /// JSON file holding `{ "context": ..., "grants": [...] }`
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },
    /// Encode presentation models into stored rows
    Encode {
        /// JSON file holding an array of presentation models
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },
}

impl CliCommand {
    pub fn input_path(&self) -> &Path {
        match self {
            Self::Decode { input_path } | Self::Encode { input_path } => input_path.as_path(),
        }
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;
    use clap::error::ErrorKind;
    use grantmap_domain::PermissionContext;

    use super::{Cli, CliCommand};

    #[test]
    fn parses_command_and_input_path() {
        let cli = Cli::try_parse_from(["grantmap-cli", "decode", "grants.json"]);

        assert!(cli.is_ok());
        let cli = cli.unwrap_or_else(|_| unreachable!());
        assert!(matches!(cli.command, CliCommand::Decode { .. }));
        assert_eq!(cli.command.input_path(), Path::new("grants.json"));
        assert!(cli.pretty_output);
    }

    #[test]
    fn flags_override_context_and_output() {
        let cli = Cli::try_parse_from([
            "grantmap-cli",
            "encode",
            "models.json",
            "--context",
            "element",
            "--pretty-output",
            "false",
        ]);

        assert!(cli.is_ok());
        let cli = cli.unwrap_or_else(|_| unreachable!());
        assert!(matches!(cli.command, CliCommand::Encode { .. }));
        assert_eq!(cli.context, Some(PermissionContext::Element));
        assert!(!cli.pretty_output);
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        let kind = |args: &[&str]| Cli::try_parse_from(args).err().map(|error| error.kind());

        assert!(kind(&["grantmap-cli"]).is_some());
        assert!(matches!(
            kind(&["grantmap-cli", "publish", "grants.json"]),
            Some(ErrorKind::InvalidSubcommand | ErrorKind::UnknownArgument)
        ));
        assert_eq!(
            kind(&["grantmap-cli", "decode"]),
            Some(ErrorKind::MissingRequiredArgument)
        );
        assert_eq!(
            kind(&["grantmap-cli", "decode", "a.json", "b.json"]),
            Some(ErrorKind::UnknownArgument)
        );
        assert_eq!(
            kind(&["grantmap-cli", "decode", "grants.json", "--context", "media"]),
            Some(ErrorKind::ValueValidation)
        );
        assert_eq!(
            kind(&["grantmap-cli", "decode", "grants.json", "--pretty-output", "yes"]),
            Some(ErrorKind::InvalidValue)
        );
    }
}
