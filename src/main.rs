use anyhow::Result;
use clap::{Parser, Subcommand};
use macroplan::cli::{PromptArgs, render_prompt, serve};

/// macroplan - one day of meals that hits your macro targets
#[derive(Parser)]
#[command(name = "macroplan")]
#[command(about = "Generate a single-day meal plan from macronutrient targets", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the prompt that would be sent to the provider
    Prompt {
        /// Protein target in grams
        #[arg(long)]
        protein: Option<f64>,

        /// Fat target in grams
        #[arg(long)]
        fat: Option<f64>,

        /// Carbohydrate target in grams
        #[arg(long)]
        carbs: Option<f64>,

        /// Number of meals
        #[arg(long)]
        meals: Option<f64>,

        /// Dietary restriction, free text
        #[arg(long)]
        diet: Option<String>,

        /// Ingredients available at home, free text
        #[arg(long)]
        fridge: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = macroplan::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Serve { host, port } => {
            macroplan::observability::init_observability(
                "macroplan",
                env!("CARGO_PKG_VERSION"),
                &config.observability.log_level,
            )?;

            serve(config, host, port).await
        }
        Commands::Prompt {
            protein,
            fat,
            carbs,
            meals,
            diet,
            fridge,
        } => {
            let args = PromptArgs {
                protein,
                fat,
                carbs,
                meals,
                diet,
                fridge,
            };
            println!("{}", render_prompt(&args));

            Ok(())
        }
    }
}
