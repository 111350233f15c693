use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use rand::seq::IndexedRandom;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use storyrec::engine::StoryEngine;
use storyrec::media;
use storyrec_collab::{encoder, generator, narrator, EncoderClient, GeneratorClient, NarratorClient};
use storyrec_core::{embed_stories, normalize, recommend, Embedder, Recommendation};
use storyrec_storage::{dataset, SnapshotStore};

/// Content-based story recommendation engine
#[derive(Parser, Debug)]
#[command(name = "storyrec")]
#[command(about = "Content-based story recommendation engine", long_about = None)]
struct Args {
    /// Path to the data directory
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Encoder endpoint (OpenAI-compatible embeddings API)
    #[arg(long, default_value = encoder::DEFAULT_BASE_URL)]
    encoder_url: String,

    /// Encoder model identifier
    #[arg(long, default_value = encoder::DEFAULT_MODEL)]
    encoder_model: String,

    /// Encoder API key
    #[arg(long, env = "STORYREC_ENCODER_API_KEY", hide_env_values = true)]
    encoder_api_key: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a raw dataset, embed it, and snapshot the collection
    Build {
        /// Raw dataset file (JSON array of records with optional input/output)
        dataset: PathBuf,

        /// Size of the demo recommendation printed after the build
        #[arg(long, default_value_t = 3)]
        top_k: usize,
    },
    /// Recommend stories similar to an existing story or a free-text query
    Recommend {
        /// Query by existing story id
        #[arg(long, conflicts_with = "query")]
        story_id: Option<u64>,

        /// Query by free text
        #[arg(long)]
        query: Option<String>,

        #[arg(long, default_value_t = 3)]
        top_k: usize,
    },
    /// Retrieve similar stories for a query and generate a new story from their tags
    Generate {
        query: String,

        #[arg(long, default_value_t = 3)]
        top_k: usize,

        /// Generator endpoint (Ollama-style API)
        #[arg(long, default_value = generator::DEFAULT_BASE_URL)]
        generator_url: String,

        /// Generator model identifier
        #[arg(long, default_value = "storyteller")]
        generator_model: String,
    },
    /// Narrate a story into an mp3 file under the media directory
    Narrate {
        story_id: u64,

        /// Voice identifier; a random known voice when omitted
        #[arg(long)]
        voice: Option<String>,

        /// Override the narration style instructions
        #[arg(long)]
        instructions: Option<String>,

        /// Narrator endpoint
        #[arg(long, default_value = narrator::DEFAULT_BASE_URL)]
        narrator_url: String,

        /// Narrator model identifier
        #[arg(long, default_value = narrator::DEFAULT_MODEL)]
        narrator_model: String,

        /// Narrator API key
        #[arg(long, env = "STORYREC_NARRATOR_API_KEY", hide_env_values = true)]
        narrator_api_key: Option<String>,
    },
    /// List stored snapshots
    Snapshots,
    /// List narration files in the media directory
    Media,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("failed to create data directory {}", args.data_dir.display()))?;

    let encoder = EncoderClient::new(
        &args.encoder_url,
        &args.encoder_model,
        args.encoder_api_key.as_deref(),
    )?;
    let snapshots = SnapshotStore::new(args.data_dir.join("snapshots"))?;

    match args.command {
        Command::Build { dataset: dataset_path, top_k } => {
            build(&args.data_dir, &dataset_path, top_k, encoder, &snapshots)
        }
        Command::Recommend { story_id, query, top_k } => {
            let engine = load_engine(&snapshots, encoder)?;
            let recs = match (story_id, query) {
                (Some(id), None) => engine.recommend_by_id(id, top_k)?,
                (None, Some(text)) => engine.recommend_by_query(&text, top_k)?,
                _ => return Err(anyhow!("pass exactly one of --story-id or --query")),
            };
            print_recommendations(&recs);
            Ok(())
        }
        Command::Generate { query, top_k, generator_url, generator_model } => {
            let engine = load_engine(&snapshots, encoder)?;
            let recs = engine.recommend_by_query(&query, top_k)?;
            print_recommendations(&recs);

            let keywords = recommend::tag_union(&recs);
            info!(keywords = ?keywords, "prompting generator");

            let generator = GeneratorClient::new(&generator_url, &generator_model)?;
            let story = generator.generate(&GeneratorClient::story_prompt(&keywords))?;
            println!("\nGenerated story:\n{}", story);
            Ok(())
        }
        Command::Narrate {
            story_id,
            voice,
            instructions,
            narrator_url,
            narrator_model,
            narrator_api_key,
        } => {
            let collection = snapshots
                .load_latest()?
                .ok_or_else(|| anyhow!("no snapshot found; run `storyrec build` first"))?;
            let story = collection
                .get(story_id)
                .ok_or(storyrec_core::Error::StoryNotFound(story_id))?;

            let voice = voice.unwrap_or_else(|| {
                narrator::VOICES
                    .choose(&mut rand::rng())
                    .expect("voice list is non-empty")
                    .to_string()
            });
            info!(story_id, voice, "narrating story");

            let narrator =
                NarratorClient::new(&narrator_url, &narrator_model, narrator_api_key.as_deref())?;
            let audio = narrator.narrate(&story.output, &voice, instructions.as_deref())?;

            let media_dir = args.data_dir.join("media");
            std::fs::create_dir_all(&media_dir)?;
            let out = media_dir.join(format!("story-{}.mp3", story_id));
            std::fs::write(&out, &audio)?;
            println!("Audio saved to {}", out.display());
            Ok(())
        }
        Command::Snapshots => {
            for desc in snapshots.list()? {
                println!(
                    "{}  {} bytes  {}",
                    desc.name,
                    desc.size,
                    desc.creation_time.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        }
        Command::Media => {
            for name in media::list_media(args.data_dir.join("media"))? {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

/// Run the offline pipeline: normalize, persist, embed, persist, snapshot,
/// then print a demo recommendation for the first story.
fn build(
    data_dir: &std::path::Path,
    dataset_path: &std::path::Path,
    top_k: usize,
    encoder: EncoderClient,
    snapshots: &SnapshotStore,
) -> anyhow::Result<()> {
    let records = dataset::load_raw_dataset(dataset_path)?;
    info!(records = records.len(), "loaded raw dataset");

    let stories = normalize::normalize(&records);
    dataset::write_stories(data_dir.join("stories.json"), &stories)?;
    info!(stories = stories.len(), "normalized stories written");

    let stories = embed_stories(stories, &encoder)
        .context("embedding pass failed; nothing was persisted")?;
    dataset::write_stories(data_dir.join("stories_enriched.json"), &stories)?;
    info!(model = encoder.model(), "enriched stories written");

    let engine = StoryEngine::from_stories(stories, Box::new(encoder))?;
    let collection = engine.collection();
    let desc = snapshots.create(&collection)?;
    info!(snapshot = %desc.name, size = desc.size, "snapshot created");

    if let Some(first) = collection.stories().first() {
        println!("Query story: {}", first.title);
        let recs = engine.recommend_by_id(first.id, top_k)?;
        print_recommendations(&recs);
    }

    Ok(())
}

fn load_engine(snapshots: &SnapshotStore, encoder: EncoderClient) -> anyhow::Result<StoryEngine> {
    let collection = snapshots
        .load_latest()?
        .ok_or_else(|| anyhow!("no snapshot found; run `storyrec build` first"))?;

    if let Some(model) = collection.encoder_model() {
        if model != encoder.model() {
            return Err(anyhow!(
                "snapshot was embedded with '{}' but the encoder is '{}'; rebuild or pass --encoder-model {}",
                model,
                encoder.model(),
                model
            ));
        }
    }

    Ok(StoryEngine::new(collection, Box::new(encoder)))
}

fn print_recommendations(recs: &[Recommendation]) {
    println!("\nRecommendations:");
    for rec in recs {
        println!(
            "- {} (id={}) | tags={} | score={:.4}",
            rec.title,
            rec.id,
            rec.tags.join(", "),
            rec.score
        );
    }
}
