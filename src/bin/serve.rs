//! HTTP server for fact-check classification

use std::{env, path::PathBuf, sync::Arc};

use anyhow::anyhow;
use burn_fact_check::{
    backend::{self, Inference},
    pipelines::sequence_classification::{loader::DEFAULT_BUNDLE, Classifier},
    server::ApiServer,
    utils::logging,
};
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Usage: serve [OPTIONS]

Options:
  -h, --help           Print help
  -b, --bundle PATH    The model bundle directory (env: FACT_CHECK_BUNDLE, default: fact_checking_model)
  --host HOST          The address to bind (env: FACT_CHECK_HOST, default: 127.0.0.1)
  -p, --port PORT      The port to listen on (env: FACT_CHECK_PORT, default: 5000)
";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug)]
struct Args {
    bundle: PathBuf,
    host: String,
    port: u16,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let bundle: Option<PathBuf> = pargs.opt_value_from_str(["-b", "--bundle"])?;
        let host: Option<String> = pargs.opt_value_from_str("--host")?;
        let port: Option<u16> = pargs.opt_value_from_str(["-p", "--port"])?;

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(anyhow!("Unexpected arguments: {:?}", remaining));
        }

        let port = match port {
            Some(port) => port,
            None => match env::var("FACT_CHECK_PORT") {
                Ok(port) => port
                    .parse()
                    .map_err(|e| anyhow!("Invalid FACT_CHECK_PORT {:?}: {}", port, e))?,
                Err(_) => DEFAULT_PORT,
            },
        };

        Ok(Some(Args {
            bundle: bundle
                .or_else(|| env::var_os("FACT_CHECK_BUNDLE").map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BUNDLE)),
            host: host
                .or_else(|| env::var("FACT_CHECK_HOST").ok())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        }))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    logging::init();

    info!("Loading model bundle from {}", args.bundle.display());

    // The listener is only bound once the model is fully loaded
    let classifier = Classifier::<Inference>::load(&args.bundle, backend::device()).await?;

    ApiServer::new(Arc::new(classifier), args.host, args.port)
        .start()
        .await?;

    Ok(())
}
