mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	path::{Path, PathBuf},
	sync::{
		Arc,
		atomic::{AtomicU64, AtomicUsize, Ordering},
	},
	time::Duration,
};

use motif_config::{
	Config, EmbeddingProviderConfig, Library, Providers as ProviderSettings, Ranking, Search,
	Service,
};
use motif_domain::{Pattern, text};
use motif_index::PatternRecord;
use motif_service::{BoxFuture, EmbeddingProvider, MotifService, Providers};

pub const TEST_DIMENSIONS: u32 = 512;

const SAMPLE_CORPUS: &str = include_str!("../fixtures/patterns.json");
/// Fixed words of the query and pattern renderings.
const TEMPLATE_WORDS: [&str; 5] = ["component", "with", "props", "variants", "accessibility"];

/// Deterministic embedder built from hashed character trigrams of each word.
///
/// Texts that share spelling share dimensions, so a misspelled query still lands near the
/// intended pattern. Template words are skipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashEmbedder;
impl HashEmbedder {
	pub fn vector(text: &str, dimensions: usize) -> Vec<f32> {
		let mut out = vec![0.0; dimensions];

		if dimensions == 0 {
			return out;
		}

		for word in text::words(text) {
			if TEMPLATE_WORDS.contains(&word.as_str()) {
				continue;
			}

			let padded: Vec<char> = format!("#{word}#").chars().collect();

			for gram in padded.windows(3) {
				let feature: String = gram.iter().collect();
				let hash = feature_hash(&feature);
				let bucket = (hash % dimensions as u64) as usize;
				let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };

				out[bucket] += sign;
			}
		}

		out
	}
}
impl EmbeddingProvider for HashEmbedder {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, motif_service::Result<Vec<Vec<f32>>>> {
		let dimensions = cfg.dimensions as usize;

		Box::pin(async move {
			Ok(texts.iter().map(|text| Self::vector(text, dimensions)).collect())
		})
	}
}

/// Always fails with a provider error.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingEmbedder;
impl EmbeddingProvider for FailingEmbedder {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_texts: &'a [String],
	) -> BoxFuture<'a, motif_service::Result<Vec<Vec<f32>>>> {
		Box::pin(async {
			Err(motif_service::Error::Provider { message: "embedding backend is down".to_string() })
		})
	}
}

/// Sleeps for `delay` before answering like [`HashEmbedder`].
#[derive(Clone, Copy, Debug)]
pub struct StallingEmbedder {
	pub delay: Duration,
}
impl EmbeddingProvider for StallingEmbedder {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, motif_service::Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			tokio::time::sleep(self.delay).await;

			HashEmbedder.embed(cfg, texts).await
		})
	}
}

/// [`HashEmbedder`] that records how many calls it served.
#[derive(Debug, Default)]
pub struct CountingEmbedder {
	calls: AtomicUsize,
}
impl CountingEmbedder {
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl EmbeddingProvider for CountingEmbedder {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, motif_service::Result<Vec<Vec<f32>>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move { HashEmbedder.embed(cfg, texts).await })
	}
}

/// Corpus file under the temp directory, removed on drop.
pub struct TempCorpus {
	path: PathBuf,
}
impl TempCorpus {
	pub fn write(records: &[PatternRecord]) -> Result<Self> {
		let payload = serde_json::to_string(&serde_json::json!({ "patterns": records }))?;

		Self::write_raw(&payload)
	}

	pub fn write_raw(payload: &str) -> Result<Self> {
		static COUNTER: AtomicU64 = AtomicU64::new(0);

		let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
		let mut path = env::temp_dir();

		path.push(format!("motif_testkit_corpus_{}_{ordinal}.json", std::process::id()));
		fs::write(&path, payload)?;

		Ok(Self { path })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}
impl Drop for TempCorpus {
	fn drop(&mut self) {
		let _ = fs::remove_file(&self.path);
	}
}

/// Config for in-process tests. Network settings point nowhere; inject an embedder instead.
pub fn test_config(library_path: impl Into<PathBuf>) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "debug".to_string(),
		},
		library: Library { path: library_path.into(), load_on_start: false, embed_batch_size: 4 },
		providers: ProviderSettings {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:9".to_string(),
				api_key: "test-key".to_string(),
				path: "/embeddings".to_string(),
				model: "hash-trigram".to_string(),
				dimensions: TEST_DIMENSIONS,
				timeout_ms: 1_000,
				default_headers: Default::default(),
			},
		},
		search: Search::default(),
		ranking: Ranking::default(),
	}
}

pub fn sample_patterns() -> Result<Vec<Pattern>> {
	Ok(sample_records()?.into_iter().map(|record| record.pattern).collect())
}

/// Sample corpus records without precomputed vectors.
pub fn sample_records() -> Result<Vec<PatternRecord>> {
	let value: serde_json::Value = serde_json::from_str(SAMPLE_CORPUS)?;
	let Some(patterns) = value.get("patterns") else {
		return Err(Error::Message("Sample corpus is missing `patterns`.".to_string()));
	};

	Ok(serde_json::from_value(patterns.clone())?)
}

/// Records carrying [`HashEmbedder`] vectors, so loading them needs no provider call.
pub fn embedded_records(patterns: Vec<Pattern>, dimensions: u32) -> Vec<PatternRecord> {
	patterns
		.into_iter()
		.map(|pattern| {
			let embedding = HashEmbedder::vector(&pattern.embedding_text(), dimensions as usize);

			PatternRecord { pattern, embedding: Some(embedding) }
		})
		.collect()
}

/// Service over the sample corpus with vectors precomputed, answering queries through
/// `embedder`.
pub async fn sample_service(
	cfg: Config,
	embedder: Arc<dyn EmbeddingProvider>,
) -> Result<MotifService> {
	let records = embedded_records(sample_patterns()?, cfg.providers.embedding.dimensions);
	let service = MotifService::with_providers(cfg, Providers::new(embedder));

	service
		.load_patterns(records)
		.await
		.map_err(|err| Error::Message(format!("Failed to load sample corpus: {err}")))?;

	Ok(service)
}

fn feature_hash(feature: &str) -> u64 {
	let hash = blake3::hash(feature.as_bytes());
	let mut bytes = [0_u8; 8];

	bytes.copy_from_slice(&hash.as_bytes()[..8]);

	u64::from_le_bytes(bytes)
}
