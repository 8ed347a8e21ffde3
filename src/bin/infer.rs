//! Command line tool for one-off classification

use std::path::PathBuf;

use anyhow::anyhow;
use burn_fact_check::{
    backend::{self, Inference},
    pipelines::sequence_classification::{loader::DEFAULT_BUNDLE, Classifier, Classify},
    utils::logging,
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: infer [OPTIONS] TEXT...

Arguments:
  TEXT                 One or more texts to classify

Options:
  -h, --help           Print help
  -b, --bundle PATH    The model bundle directory (defaults to 'fact_checking_model')
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// The model bundle directory
    bundle: Option<PathBuf>,

    /// The texts to classify
    texts: Vec<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    let help = pargs.contains(["-h", "--help"]);
    let bundle = pargs.opt_value_from_str(["-b", "--bundle"])?;

    let texts = pargs
        .finish()
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    Ok(Args {
        help,
        bundle,
        texts,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.help {
        println!("{}", HELP);
        return Ok(());
    }

    if args.texts.is_empty() {
        return Err(anyhow!("Missing required argument: TEXT"));
    }

    logging::init();

    let bundle = args
        .bundle
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BUNDLE));

    let classifier = Classifier::<Inference>::load(&bundle, backend::device()).await?;

    println!(
        "Model: {} (tokenizer: {})",
        bundle.display(),
        classifier.tokenizer_name()
    );

    for (i, text) in args.texts.iter().enumerate() {
        let prediction = classifier.classify(text)?;

        println!(
            "\n=== Item {i} ===\
             \n- Text: {text}\
             \n- Class: {}\
             \n- Confidence: {}\
             \n================",
            prediction.label, prediction.confidence
        );
    }

    Ok(())
}
