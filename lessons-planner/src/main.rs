//! lessons-planner - command line client for the lessons API
//!
//! Lists curricula with their inherited tags and performs the relationship
//! edits (activity into curriculum, tag onto activity) plus the create calls
//! for tags, materials and resources.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use lessons_common::api::ActivityUpdate;
use lessons_common::config::ApiBaseResolver;
use lessons_common::models::{ActivityId, Curriculum, CurriculumId, TagCategory, TagId};
use lessons_planner::{
    AddActivityOutcome, AddTagOutcome, ClientError, CurriculumBoard, HttpLessonsApi,
};
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lessons-planner", version, about = "Curriculum and lesson plan client")]
struct Cli {
    /// API base URL (overrides LESSONS_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Config file to read instead of the standard locations
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List curricula with their activities and inherited tags
    Curricula,
    /// List activities with their tags
    Activities,
    /// List tags
    Tags,
    /// Append an activity to a curriculum
    AddActivity { curriculum: i64, activity: i64 },
    /// Attach an existing tag to an activity
    AddTag { activity: i64, tag: i64 },
    /// Edit an activity; omitted fields keep their current value
    EditActivity {
        activity: i64,
        #[arg(long)]
        name: Option<String>,
        /// Full tag id list, comma separated (replaces the current tags)
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<i64>>,
        #[arg(long)]
        teaching_notes: Option<String>,
        #[arg(long)]
        video_url: Option<String>,
        /// Offline, Online, Discussion or Extension
        #[arg(long)]
        category: Option<String>,
    },
    /// Create a tag on an activity
    NewTag {
        activity: i64,
        name: String,
        /// Language, Technology, Concept, Difficulty or Length
        category: String,
    },
    /// Create a material for an activity
    NewMaterial { activity: i64, name: String, url: String },
    /// Create a resource for an activity
    NewResource { activity: i64, name: String, url: String },
}

fn print_curriculum(curriculum: &Curriculum) {
    let tags: Vec<&str> = curriculum.tags.iter().map(|t| t.name.as_str()).collect();
    println!("[{}] {}  tags: {}", curriculum.id, curriculum.name, tags.join(", "));
    for (number, activity) in curriculum.activities.iter().enumerate() {
        println!("    {}. [{}] {}", number + 1, activity.id, activity.name);
    }
}

/// Surface the server's error payload the way the forms displayed it
fn describe(error: ClientError) -> anyhow::Error {
    match error.payload() {
        Some(payload) => anyhow!("{}", payload).context(format!(
            "request rejected with status {}",
            error.status().unwrap_or_default()
        )),
        None => anyhow::Error::new(error),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = ApiBaseResolver::new()
        .with_cli_url(cli.api_url.clone())
        .with_config_path(cli.config.clone())
        .resolve()
        .context("Failed to resolve configuration")?;

    // Log to stderr so stdout carries only command output
    let writer = match &settings.logging.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .with_ansi(settings.logging.log_file.is_none())
        .with_writer(writer)
        .init();

    info!(
        "Starting lessons-planner v{} against {}",
        env!("CARGO_PKG_VERSION"),
        settings.api_base_url
    );

    let api = Arc::new(HttpLessonsApi::from_settings(&settings).map_err(describe)?);
    let mut board = CurriculumBoard::new(api);
    board.load().await.map_err(describe)?;

    match cli.command {
        Command::Curricula => {
            for curriculum in board.curricula() {
                print_curriculum(curriculum);
            }
        }
        Command::Activities => {
            for activity in board.activities() {
                let tags: Vec<&str> = activity.tags.iter().map(|t| t.name.as_str()).collect();
                println!("[{}] {}  tags: {}", activity.id, activity.name, tags.join(", "));
            }
        }
        Command::Tags => {
            for tag in board.tags() {
                println!("[{}] {} ({})", tag.id, tag.name, tag.category);
            }
        }
        Command::AddActivity {
            curriculum,
            activity,
        } => {
            let curriculum_id = CurriculumId(curriculum);
            let activity = board
                .activity(ActivityId(activity))
                .cloned()
                .ok_or_else(|| anyhow!("Unknown activity {}", activity))?;

            let outcome = board
                .add_activity(curriculum_id, &activity)
                .await
                .map_err(describe)?;
            if outcome == AddActivityOutcome::AlreadyPresent {
                println!("Activity {} is already on curriculum {}", activity.id, curriculum_id);
            }
            if let Some(curriculum) = board.curriculum(curriculum_id) {
                print_curriculum(curriculum);
            }
        }
        Command::AddTag { activity, tag } => {
            let tag = board
                .tag(TagId(tag))
                .cloned()
                .ok_or_else(|| anyhow!("Unknown tag {}", tag))?;

            let outcome = board
                .add_tag(ActivityId(activity), &tag)
                .await
                .map_err(describe)?;
            match outcome {
                AddTagOutcome::Added => println!("Tagged activity {} with {}", activity, tag.name),
                AddTagOutcome::AlreadyPresent => {
                    println!("Activity {} already has tag {}", activity, tag.name)
                }
            }
        }
        Command::EditActivity {
            activity,
            name,
            tags,
            teaching_notes,
            video_url,
            category,
        } => {
            let activity_id = ActivityId(activity);
            let current = board
                .activity(activity_id)
                .ok_or_else(|| anyhow!("Unknown activity {}", activity))?;

            let mut update = ActivityUpdate::from_activity(current);
            if let Some(name) = name {
                update.name = name;
            }
            if let Some(tags) = tags {
                update.tag_ids = tags.into_iter().map(TagId).collect();
            }
            if let Some(notes) = teaching_notes {
                update.teaching_notes = notes;
            }
            if let Some(url) = video_url {
                update.video_url = url;
            }
            if let Some(category) = category {
                update.category = category;
            }

            let saved = board
                .edit_activity(activity_id, &update)
                .await
                .map_err(describe)?;
            let tags: Vec<&str> = saved.tags.iter().map(|t| t.name.as_str()).collect();
            println!("Saved [{}] {}  tags: {}", saved.id, saved.name, tags.join(", "));
            for curriculum in board.curricula() {
                if curriculum.contains_activity(activity_id) {
                    print_curriculum(curriculum);
                }
            }
        }
        Command::NewTag {
            activity,
            name,
            category,
        } => {
            let category: TagCategory = category.parse()?;
            let tag = board
                .create_tag(ActivityId(activity), &name, category)
                .await
                .map_err(describe)?;
            println!("Created tag [{}] {} ({})", tag.id, tag.name, tag.category);
        }
        Command::NewMaterial {
            activity,
            name,
            url,
        } => {
            let material = board
                .create_material(ActivityId(activity), &name, &url)
                .await
                .map_err(describe)?;
            println!("Created material [{}] {}: {}", material.id, material.name, material.url);
        }
        Command::NewResource {
            activity,
            name,
            url,
        } => {
            let resource = board
                .create_resource(ActivityId(activity), &name, &url)
                .await
                .map_err(describe)?;
            println!("Created resource [{}] {}: {}", resource.id, resource.name, resource.url);
        }
    }

    Ok(())
}
