mod client;
mod conf;
mod display;
mod error;
mod prelude;
mod publish;
mod status;
mod symbol;
mod tools;

use crate::prelude::*;

#[derive(Parser)]
#[command(version, about = "BlogCoin CLI")]
struct Cli {
    #[arg(
        long = "json",
        global = true,
        help = "Print machine readable JSON instead of decorated text"
    )]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Show or update the BlogCoin CLI configuration")]
    Conf(conf::ConfCommand),
    #[command(about = "Print the symbol derived from a coin name")]
    Symbol {
        #[arg(help = "The coin name", value_name = "NAME")]
        name: String,
    },
    #[command(about = "Publish a blog post as a coin")]
    Publish(publish::PublishCommand),
    #[command(about = "Look up a coin creation transaction")]
    Status(status::StatusCommand),
    #[command(subcommand, about = "Inspect the BlogCoin tools")]
    Tools(tools::ToolsCommand),
}

#[tokio::main]
async fn main() {
    env_logger::init();

    // Customize parsing error handling.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // These 2 are "not real errors" that are used to stop the execution
            // to display the CLI help or version.
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    println!("{}", e);

                    std::process::exit(0);
                }
                _ => (),
            }

            eprintln!(
                "{ballot} {error}",
                ballot = "✘".red().bold(),
                error = BlogcoinCliError::SyntaxError(e)
            );

            std::process::exit(1);
        }
    };

    JSON_MODE.store(cli.json, Ordering::Relaxed);

    // Send each sub-command to the respective handler.
    let result = match cli.command {
        Command::Conf(conf) => conf::handle(conf).await.map(|_| ()),
        Command::Symbol { name } => symbol::symbol(name).map(|_| ()),
        Command::Publish(publish) => publish::publish(publish).await.map(|_| ()),
        Command::Status(status) => status::status(status).await.map(|_| ()),
        Command::Tools(tools) => tools::handle(tools).await,
    };

    // Handle any errors that occurred during command execution.
    if let Err(e) = result {
        eprintln!("{ballot} {e}", ballot = "✘".red().bold());

        std::process::exit(1);
    }
}
