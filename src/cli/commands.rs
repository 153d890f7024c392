use clap::{Parser, Subcommand};

/// `Parley` - Terminal client for two-agent conversational simulations.
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(version = "0.1.0")]
#[command(about = "Talk to an interview/game simulation backend.", long_about = None)]
pub struct Cli {
    /// Backend base URL, e.g. http://127.0.0.1:8000/api (overrides config)
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an interactive interview session
    Interview {
        /// Exchange budget for run-to-completion simulation
        #[arg(long)]
        max_turns: Option<u32>,
    },

    /// Run an interactive game session
    Game {
        /// Game definition path to realize server-side (skips the picker)
        #[arg(long)]
        game: Option<String>,

        /// JSON object of parameter overrides for the game definition
        #[arg(long)]
        params: Option<String>,
    },

    /// List available game definitions
    Games,
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }
}
