use base64::{engine::general_purpose, Engine as _};
use clap::Parser;
use iconmatch::{
    CorpusIndex, DetectionStrategy, DiffParams, IconMatcher, IsolateConfig, MatchResult,
    MatcherConfig, Modality, NormalizeConfig, RankConfig,
};
use iconmatch::lowlevel::Recolor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "IconMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ModalityConfig {
    Vector,
    Bitmap,
}

impl From<ModalityConfig> for Modality {
    fn from(value: ModalityConfig) -> Self {
        match value {
            ModalityConfig::Vector => Modality::Vector,
            ModalityConfig::Bitmap => Modality::Bitmap,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StrategyConfig {
    ColorTolerance,
    GrayscaleThreshold,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct IsolateConfigJson {
    strategy: StrategyConfig,
    tolerance: u8,
    grayscale_threshold: u8,
    recolor: bool,
    recolor_min_luminance: u8,
}

impl Default for IsolateConfigJson {
    fn default() -> Self {
        let recolor = Recolor::default();
        Self {
            strategy: StrategyConfig::ColorTolerance,
            tolerance: 25,
            grayscale_threshold: 220,
            recolor: true,
            recolor_min_luminance: recolor.min_luminance,
        }
    }
}

impl From<&IsolateConfigJson> for IsolateConfig {
    fn from(value: &IsolateConfigJson) -> Self {
        let strategy = match value.strategy {
            StrategyConfig::ColorTolerance => DetectionStrategy::ColorTolerance {
                tolerance: value.tolerance,
            },
            StrategyConfig::GrayscaleThreshold => DetectionStrategy::GrayscaleThreshold {
                threshold: value.grayscale_threshold,
            },
        };
        let recolor = value.recolor.then(|| Recolor {
            min_luminance: value.recolor_min_luminance,
            ..Recolor::default()
        });
        Self { strategy, recolor }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RankConfigJson {
    limit: usize,
    parallel: bool,
    max_concurrency: usize,
}

impl Default for RankConfigJson {
    fn default() -> Self {
        let cfg = RankConfig::default();
        Self {
            limit: cfg.limit,
            parallel: cfg.parallel,
            max_concurrency: cfg.max_concurrency,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    manifest_path: String,
    query_path: Option<String>,
    query_data: Option<String>,
    modality: Option<ModalityConfig>,
    output_path: Option<String>,
    include_paths: bool,
    size: u32,
    pixel_threshold: f64,
    include_aa: bool,
    vector_threshold: f64,
    bitmap_threshold: f64,
    cache_corpus: bool,
    rank: RankConfigJson,
    isolate: IsolateConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        let cfg = MatcherConfig::default();
        Self {
            manifest_path: String::new(),
            query_path: None,
            query_data: None,
            modality: None,
            output_path: None,
            include_paths: false,
            size: cfg.normalize.size,
            pixel_threshold: cfg.score.threshold,
            include_aa: cfg.score.include_aa,
            vector_threshold: cfg.vector_threshold,
            bitmap_threshold: cfg.bitmap_threshold,
            cache_corpus: cfg.cache_corpus,
            rank: RankConfigJson::default(),
            isolate: IsolateConfigJson::default(),
        }
    }
}

impl Config {
    fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig {
            normalize: NormalizeConfig { size: self.size },
            score: DiffParams {
                threshold: self.pixel_threshold,
                include_aa: self.include_aa,
            },
            rank: RankConfig {
                limit: self.rank.limit,
                parallel: self.rank.parallel,
                max_concurrency: self.rank.max_concurrency,
                include_source: self.include_paths,
            },
            isolate: IsolateConfig::from(&self.isolate),
            vector_threshold: self.vector_threshold,
            bitmap_threshold: self.bitmap_threshold,
            cache_corpus: self.cache_corpus,
        }
    }
}

/// Query bytes plus the modality implied by where they came from.
struct Query {
    bytes: Vec<u8>,
    svg_hint: bool,
}

fn load_query(config: &Config) -> Result<Query, Box<dyn std::error::Error>> {
    match (&config.query_path, &config.query_data) {
        (Some(path), None) => Ok(Query {
            bytes: fs::read(path)?,
            svg_hint: path.to_ascii_lowercase().ends_with(".svg"),
        }),
        (None, Some(data)) => decode_query_data(data),
        _ => Err("exactly one of query_path and query_data must be set".into()),
    }
}

/// Accepts raw SVG markup, a `data:` URI, or a bare base64 payload.
fn decode_query_data(data: &str) -> Result<Query, Box<dyn std::error::Error>> {
    let data = data.trim();
    if data.starts_with('<') {
        return Ok(Query {
            bytes: data.as_bytes().to_vec(),
            svg_hint: true,
        });
    }
    if let Some(rest) = data.strip_prefix("data:") {
        let (header, payload) = rest.split_once(',').ok_or("data URI without payload")?;
        let svg_hint = header.starts_with("image/svg");
        let bytes = if header.ends_with(";base64") {
            general_purpose::STANDARD.decode(payload)?
        } else {
            payload.as_bytes().to_vec()
        };
        return Ok(Query { bytes, svg_hint });
    }
    Ok(Query {
        bytes: general_purpose::STANDARD.decode(data)?,
        svg_hint: false,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultRecord {
    id: String,
    mismatch: f64,
    exact_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl From<MatchResult> for ResultRecord {
    fn from(value: MatchResult) -> Self {
        Self {
            id: value.id,
            mismatch: value.mismatch,
            exact_match: value.exact_match,
            path: value.source,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    sorted_res: Vec<ResultRecord>,
    time: u128,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("iconmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.manifest_path.is_empty() {
        return Err("manifest_path must be set in the config".into());
    }
    if config.rank.limit == 0 {
        return Err("rank.limit must be at least 1".into());
    }

    let corpus = CorpusIndex::load_manifest(&config.manifest_path)?;
    let query = load_query(&config)?;
    let modality = match config.modality {
        Some(modality) => modality.into(),
        None if query.svg_hint => Modality::Vector,
        None => Modality::Bitmap,
    };

    let matcher = IconMatcher::with_default_codec(corpus, config.matcher_config())?;
    let report = matcher.match_bytes(&query.bytes, modality)?;
    tracing::info!(
        results = report.results.len(),
        elapsed_ms = u64::try_from(report.elapsed_ms()).unwrap_or(u64::MAX),
        "query finished"
    );

    let time = report.elapsed_ms();
    let output = Output {
        sorted_res: report.results.into_iter().map(ResultRecord::from).collect(),
        time,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
