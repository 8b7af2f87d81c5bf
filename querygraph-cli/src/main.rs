//! Pipeline binary: parse the user's question, run the pipeline and print the response.

use clap::Parser;
use querygraph_cli::{init_tracing, response_text, run_with_options, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "querygraph")]
#[command(about = "Run a financial question through the query pipeline")]
struct Args {
    /// User message (can also be given as positional arguments)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Model name (overrides OPENAI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Parsing and report temperature 0–2 (overrides OPENAI_TEMPERATURE)
    #[arg(long)]
    temperature: Option<f32>,

    /// Analysis temperature 0–2 (overrides REASONING_TEMPERATURE)
    #[arg(long)]
    reasoning_temperature: Option<f32>,

    /// Market data JSON file (overrides MARKET_DATA_PATH)
    #[arg(long, value_name = "PATH")]
    market_data: Option<String>,

    /// Debug logs for every node, and the effective config
    #[arg(short, long)]
    verbose: bool,

    /// Report each node as it finishes
    #[arg(long)]
    stream: bool,

    /// Positional: user message (when -m/--message is not used)
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

fn get_message(args: &Args) -> String {
    if let Some(ref m) = args.message {
        return m.clone();
    }
    if args.rest.is_empty() {
        return "hi".to_string();
    }
    args.rest.join(" ").trim().to_string()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let input = get_message(&args);
    let options = RunOptions {
        model: args.model.clone(),
        temperature: args.temperature,
        reasoning_temperature: args.reasoning_temperature,
        market_data_path: args.market_data.clone(),
        stream: args.stream,
        verbose: args.verbose,
    };

    println!("User: {}", input);
    println!("---");

    let outcome = match run_with_options(&input, &options).await {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    match response_text(&outcome) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}
