use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::t5::{self, T5ForConditionalGeneration};
use hf_hub::api::sync::{ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};
use std::path::PathBuf;
use std::sync::Mutex;
use tokenizers::Tokenizer;

use crate::config::{DevicePreference, ModelConfig};
use crate::errors::SimplifyError;
use crate::models::{GenerationBounds, Paraphraser};

/// T5-family encoder-decoder loaded from the Hugging Face hub.
pub struct T5Paraphraser {
    model: Mutex<T5ForConditionalGeneration>, // decode mutates the kv cache
    tokenizer: Tokenizer,
    device: Device,
    max_input_tokens: usize,
    use_cache: bool,
    decoder_start_token_id: u32,
    eos_token_id: u32,
}

impl T5Paraphraser {
    pub async fn load(config: ModelConfig) -> Result<Self> {
        tracing::info!(
            "Loading paraphrase model {} (revision {}), tokenizer {}",
            config.model_name,
            config.revision,
            config.tokenizer_name
        );
        let paraphraser = tokio::task::spawn_blocking(move || Self::load_sync(&config))
            .await
            .context("model loading task panicked")??;
        tracing::info!("Paraphrase model loaded on {:?}", paraphraser.device);
        Ok(paraphraser)
    }

    fn load_sync(config: &ModelConfig) -> Result<Self> {
        let device = select_device(config.device)?;

        let mut api = ApiBuilder::new();
        if let Some(cache_dir) = &config.huggingface_cache_dir {
            api = api.with_cache_dir(PathBuf::from(cache_dir));
        }
        let api = api.build()?;

        let model_repo = api.repo(Repo::with_revision(
            config.model_name.clone(),
            RepoType::Model,
            config.revision.clone(),
        ));
        let tokenizer_repo = api.repo(Repo::new(config.tokenizer_name.clone(), RepoType::Model));

        let config_file = model_repo
            .get("config.json")
            .map_err(|e| anyhow::anyhow!("Failed to download config.json: {}", e))?;
        let model_config: t5::Config = serde_json::from_str(&std::fs::read_to_string(config_file)?)
            .context("Failed to parse T5 config.json")?;

        let tokenizer_file = tokenizer_repo
            .get("tokenizer.json")
            .map_err(|e| anyhow::anyhow!("Failed to download tokenizer.json: {}", e))?;
        let mut tokenizer = Tokenizer::from_file(tokenizer_file)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(None)
            .map_err(|e| anyhow::anyhow!("Failed to configure tokenizer: {}", e))?;

        let vb = load_weights(&model_repo, &device)?;
        let model = T5ForConditionalGeneration::load(vb, &model_config)?;

        let decoder_start_token_id = model_config
            .decoder_start_token_id
            .unwrap_or(model_config.pad_token_id) as u32;

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            device,
            max_input_tokens: config.max_input_tokens,
            use_cache: model_config.use_cache,
            decoder_start_token_id,
            eos_token_id: model_config.eos_token_id as u32,
        })
    }

    fn run(&self, input: &str, bounds: GenerationBounds) -> Result<String, SimplifyError> {
        let bounds = bounds.checked()?;
        let max_length = usize::try_from(bounds.max_length).map_err(SimplifyError::model)?;
        let min_length = usize::try_from(bounds.min_length).map_err(SimplifyError::model)?;

        let encoding = self.tokenizer.encode(input, true)?;
        let input_ids = encoding.get_ids();
        check_input_length(input_ids.len(), self.max_input_tokens)?;

        let mut model = self
            .model
            .lock()
            .map_err(|_| SimplifyError::model("paraphrase model lock poisoned"))?;
        model.clear_kv_cache();

        let input_ids = Tensor::new(input_ids, &self.device)?.unsqueeze(0)?;
        let encoder_output = model.encode(&input_ids)?;

        let mut output_ids = vec![self.decoder_start_token_id];
        while output_ids.len() < max_length {
            let decoder_ids = if output_ids.len() == 1 || !self.use_cache {
                Tensor::new(output_ids.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                let last = output_ids[output_ids.len() - 1];
                Tensor::new(&[last], &self.device)?.unsqueeze(0)?
            };
            let logits = model
                .decode(&decoder_ids, &encoder_output)?
                .squeeze(0)?
                .to_dtype(DType::F32)?
                .to_vec1::<f32>()?;

            let allow_eos = output_ids.len() >= min_length;
            let next = select_next_token(&logits, self.eos_token_id, allow_eos)
                .ok_or_else(|| SimplifyError::model("model returned empty logits"))?;
            if next == self.eos_token_id {
                break;
            }
            output_ids.push(next);
        }
        model.clear_kv_cache();
        drop(model);

        let text = self.tokenizer.decode(&output_ids[1..], true)?;
        Ok(text.trim().to_string())
    }
}

impl Paraphraser for T5Paraphraser {
    fn generate(&self, input: &str, bounds: GenerationBounds) -> Result<Vec<String>, SimplifyError> {
        self.run(input, bounds).map(|text| vec![text])
    }
}

fn select_device(preference: DevicePreference) -> Result<Device> {
    match preference {
        DevicePreference::Cpu => Ok(Device::Cpu),
        DevicePreference::Cuda => Device::new_cuda(0).context("Failed to initialize CUDA device"),
        DevicePreference::Metal => Device::new_metal(0).context("Failed to initialize Metal device"),
        DevicePreference::Auto => {
            if candle_core::utils::cuda_is_available() {
                match Device::new_cuda(0) {
                    Ok(device) => return Ok(device),
                    Err(e) => tracing::warn!("Failed to initialize CUDA: {}, trying Metal", e),
                }
            }
            if candle_core::utils::metal_is_available() {
                match Device::new_metal(0) {
                    Ok(device) => return Ok(device),
                    Err(e) => tracing::warn!("Failed to initialize Metal: {}, using CPU", e),
                }
            }
            Ok(Device::Cpu)
        }
    }
}

fn load_weights(repo: &ApiRepo, device: &Device) -> Result<VarBuilder<'static>> {
    if let Ok(path) = repo.get("model.safetensors") {
        tracing::info!("Loading safetensors weights from {}", path.display());
        // SAFETY: the hub cache file is not modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device)? };
        return Ok(vb);
    }

    let path = repo
        .get("pytorch_model.bin")
        .map_err(|e| anyhow::anyhow!("No model weights found (safetensors or pytorch): {}", e))?;
    tracing::info!("Loading PyTorch weights from {}", path.display());
    Ok(VarBuilder::from_pth(path, DType::F32, device)?)
}

fn check_input_length(tokens: usize, max_tokens: usize) -> Result<(), SimplifyError> {
    if tokens > max_tokens {
        return Err(SimplifyError::ModelInvocation(format!(
            "input is {} tokens, limit is {}",
            tokens, max_tokens
        )));
    }
    Ok(())
}

/// Greedy pick: highest logit, first index on ties. `eos` is skipped unless allowed.
fn select_next_token(logits: &[f32], eos: u32, allow_eos: bool) -> Option<u32> {
    logits
        .iter()
        .enumerate()
        .filter(|(index, _)| allow_eos || *index as u32 != eos)
        .fold(None, |best: Option<(usize, f32)>, (index, &score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((index, score)),
        })
        .map(|(index, _)| index as u32)
}
