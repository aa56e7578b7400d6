use clap::Parser;

use ai_claude_start::cli::{self, Cli};

fn main() {
    ai_claude_start::logging::init_tracing();

    let cli = Cli::parse();
    let code = match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            cli::output::error(&format!("Error: {:#}", e));
            1
        }
    };

    std::process::exit(code);
}
