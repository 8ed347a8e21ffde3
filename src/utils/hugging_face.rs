use std::path::{Path, PathBuf};

use hf_hub::api::tokio::Api;

/// The architecture config file name
pub const CONFIG_FILE: &str = "config.json";

/// The serialized tokenizer file name
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Paths to the files that describe a pretrained tokenizer and its base architecture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pretrained {
    /// The architecture `config.json`
    pub config_file: PathBuf,

    /// The serialized `tokenizer.json`
    pub tokenizer_file: PathBuf,
}

/// Resolve a pretrained name to local files. A name that points to an existing directory is read
/// from disk, anything else is treated as a Hugging Face Hub model id.
pub async fn resolve_pretrained(name: &str) -> anyhow::Result<Pretrained> {
    let local = Path::new(name);

    if local.is_dir() {
        return from_dir(local);
    }

    download_hf_tokenizer(name).await
}

fn from_dir(dir: &Path) -> anyhow::Result<Pretrained> {
    let config_file = dir.join(CONFIG_FILE);
    let tokenizer_file = dir.join(TOKENIZER_FILE);

    for file in [&config_file, &tokenizer_file] {
        if !file.is_file() {
            return Err(anyhow!("Missing {} in {}", file.display(), dir.display()));
        }
    }

    Ok(Pretrained {
        config_file,
        tokenizer_file,
    })
}

/// Download tokenizer and config files from Hugging Face Hub
/// If file exists in cache, it will not be downloaded again
pub async fn download_hf_tokenizer(model_name: &str) -> anyhow::Result<Pretrained> {
    let api = Api::new()
        .map_err(|e| anyhow!("Unable to initialize the Hugging Face Hub client: {}", e))?;
    let repo = api.model(model_name.to_string());

    let tokenizer_file = repo.get(TOKENIZER_FILE).await.map_err(|e| {
        anyhow!(
            "Failed to download: {} tokenizer with name: {} from HuggingFace Hub: {}",
            model_name,
            TOKENIZER_FILE,
            e
        )
    })?;

    let config_file = repo.get(CONFIG_FILE).await.map_err(|e| {
        anyhow!(
            "Failed to download: {} config with name: {} from HuggingFace Hub: {}",
            model_name,
            CONFIG_FILE,
            e
        )
    })?;

    Ok(Pretrained {
        config_file,
        tokenizer_file,
    })
}
