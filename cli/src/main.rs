use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sentino_core::{relevant_categories, SentinoClient, BASE_URL, DEFAULT_LANG};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Command-line access to the Sentino text-analysis API.
#[derive(Parser)]
#[command(name = "sentino", version, about)]
struct Cli {
    /// API token sent as `Authorization: Token <key>`.
    #[arg(long, env = "SENTINO_API_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, default_value = BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a self-description against the Big Five inventory.
    Score {
        text: String,
        #[arg(long, default_value = DEFAULT_LANG)]
        lang: String,
    },
    /// List available personality inventories.
    Inventories,
    /// Classify a statement into trait categories.
    Classify {
        text: String,
        /// Only print categories above the 0.5 relevance threshold.
        #[arg(long)]
        relevant: bool,
    },
}

/// `[name, probability]` pairs above the relevance threshold, highest first.
fn relevant_output(classification: &Value) -> Value {
    relevant_categories(classification)
        .into_iter()
        .map(|(name, p)| json!([name, p]))
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = SentinoClient::new(&cli.api_key)
        .context("failed to create client")?
        .with_base_url(&cli.base_url);

    let output = match cli.command {
        Command::Score { text, lang } => client
            .score_text_in(&text, &lang)
            .context("score request failed")?,
        Command::Inventories => client
            .get_inventories()
            .context("inventories request failed")?,
        Command::Classify { text, relevant } => {
            let result = client.classify(&text).context("classify request failed")?;
            if relevant {
                relevant_output(&result)
            } else {
                result
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn score_defaults_to_english_and_public_api() {
        let cli = Cli::try_parse_from(["sentino", "--api-key", "k", "score", "I am happy."]).unwrap();
        assert_eq!(cli.api_key, "k");
        assert_eq!(cli.base_url, "https://api.sentino.org");
        match cli.command {
            Command::Score { text, lang } => {
                assert_eq!(text, "I am happy.");
                assert_eq!(lang, "en");
            }
            _ => panic!("expected score"),
        }
    }

    #[test]
    fn score_accepts_language_and_base_url() {
        let cli = Cli::try_parse_from([
            "sentino",
            "--api-key",
            "k",
            "--base-url",
            "http://127.0.0.1:3000",
            "score",
            "Ich bin froh.",
            "--lang",
            "de",
        ])
        .unwrap();
        assert_eq!(cli.base_url, "http://127.0.0.1:3000");
        assert!(matches!(cli.command, Command::Score { ref lang, .. } if lang == "de"));
    }

    #[test]
    fn inventories_and_classify_parse() {
        let cli = Cli::try_parse_from(["sentino", "--api-key", "k", "inventories"]).unwrap();
        assert!(matches!(cli.command, Command::Inventories));

        let cli = Cli::try_parse_from(["sentino", "--api-key", "k", "classify", "I am brave."]).unwrap();
        assert!(matches!(cli.command, Command::Classify { relevant: false, .. }));

        let cli =
            Cli::try_parse_from(["sentino", "--api-key", "k", "classify", "I am brave.", "--relevant"])
                .unwrap();
        assert!(matches!(cli.command, Command::Classify { relevant: true, .. }));
    }

    #[test]
    fn missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["sentino", "--api-key", "k"]).is_err());
    }

    // Only test touching SENTINO_API_KEY, so parallel tests don't race on it.
    #[test]
    fn api_key_falls_back_to_env() {
        std::env::set_var("SENTINO_API_KEY", "from-env");
        let cli = Cli::try_parse_from(["sentino", "inventories"]).unwrap();
        assert_eq!(cli.api_key, "from-env");

        std::env::remove_var("SENTINO_API_KEY");
        let err = Cli::try_parse_from(["sentino", "inventories"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn relevant_output_keeps_probability_order() {
        let result = json!({
            "agreeableness": 0.55,
            "extraversion": 0.91,
            "neuroticism": 0.12,
            "openness": 0.7
        });
        assert_eq!(
            relevant_output(&result),
            json!([["extraversion", 0.91], ["openness", 0.7], ["agreeableness", 0.55]])
        );
    }

    #[test]
    fn relevant_output_of_nothing_relevant_is_empty() {
        assert_eq!(relevant_output(&json!({"openness": 0.5})), json!([]));
    }
}
