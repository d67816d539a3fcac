mod command;
mod config;
mod corpus;
mod error;
mod quiz;

use command::{Command, USAGE};
use config::Config;
use corpus::{Corpus, FileCorpus};
use dotenv::dotenv;
use error::QuizError;
use log::{debug, error};
use quiz::bundle::BundleBuilder;
use quiz::verse_ref::VerseRef;

#[tokio::main]
async fn main() {
    // A missing .env is fine, everything has a default
    dotenv().ok();
    pretty_env_logger::init();

    let config = Config::from_env();
    debug!("Configuration: {:?}", config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = Command::parse(&args, &config) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    let builder = BundleBuilder::new(FileCorpus::new(&config.data_dir), config.builder_options());

    match run(&builder, command).await {
        Ok(json) => println!("{}", json),
        Err(err) => {
            error!("Request failed ({}): {}", err.status(), err);
            let body = err.to_body();
            match serde_json::to_string_pretty(&body) {
                Ok(json) => println!("{}", json),
                Err(_) => println!("{{\"error\":\"{}\"}}", body.error),
            }
            std::process::exit(1);
        }
    }
}

async fn run<C: Corpus>(builder: &BundleBuilder<C>, command: Command) -> Result<String, QuizError> {
    let json = match command {
        Command::Bundle {
            theme,
            lang,
            difficulty,
        } => {
            let bundle = builder.build_bundle(&theme, &lang, difficulty).await?;
            serde_json::to_string_pretty(&bundle)?
        }
        Command::Review {
            reference,
            theme,
            lang,
        } => {
            let reference: VerseRef = reference.parse()?;
            let review = builder
                .build_review_question(&reference, &theme, &lang)
                .await?;
            serde_json::to_string_pretty(&review)?
        }
        Command::BookNames { lang } => {
            let names: std::collections::BTreeMap<String, String> =
                builder.corpus().book_names(&lang).await?.into_iter().collect();
            serde_json::to_string_pretty(&names)?
        }
        Command::Themes => serde_json::to_string_pretty(&builder.corpus().themes().await?)?,
    };
    Ok(json)
}
