use clap::{Parser as ClapParser, Subcommand};
use cmisql::cli::{self, CliError, FilterOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "cmisql")]
#[command(about = "CMISQL predicate tools - validate, translate, and filter with parsed query trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the shape of a predicate tree
    Check {
        /// Predicate tree as JSON (reads from stdin if not provided)
        tree: Option<String>,
    },

    /// Render a predicate tree as canonical CMISQL text
    Render {
        /// Predicate tree as JSON (reads from stdin if not provided)
        tree: Option<String>,

        /// Property schema JSON for column resolution
        #[arg(short, long)]
        schema: Option<String>,
    },

    /// Filter JSON documents with a predicate tree
    Filter {
        /// Predicate tree as JSON (reads from stdin if not provided)
        tree: Option<String>,

        /// Candidate documents: JSON array or single object
        #[arg(short, long)]
        input: String,

        /// Pretty-print the matches
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { tree } => run_check(tree),
        Commands::Render { tree, schema } => run_render(tree, schema),
        Commands::Filter { tree, input, pretty } => run_filter(tree, input, pretty),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// The tree argument, or piped stdin when the argument is absent.
fn read_tree(arg: Option<String>) -> Result<String, CliError> {
    match arg {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn run_check(tree: Option<String>) -> Result<(), CliError> {
    cli::execute_check(&read_tree(tree)?)?;
    println!("Predicate is well-formed");
    Ok(())
}

fn run_render(tree: Option<String>, schema: Option<String>) -> Result<(), CliError> {
    let rendered = cli::execute_render(&read_tree(tree)?, schema.as_deref())?;
    println!("{}", rendered);
    Ok(())
}

fn run_filter(tree: Option<String>, input: String, pretty: bool) -> Result<(), CliError> {
    let options = FilterOptions {
        tree: read_tree(tree)?,
        input,
    };
    let matches = cli::execute_filter(&options)?;

    let output = serde_json::Value::Array(matches);
    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .unwrap();
    println!("{}", json);
    Ok(())
}
