//! narration - convert text and markdown scripts to speech fragments

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use narration_editor::audio::{FragmentStore, default_final_dir, start_line};
use narration_editor::config::NarrationConfig;
use narration_editor::dictionary::{DictionaryEditor, DictionaryEntry};
use narration_editor::pipeline::{NarrationOptions, NarrationOutcome, NarrationSession};
use narration_editor::project::{self, LoadedProject, ProjectSettings};
use narration_editor::text::{self, DEFAULT_MAX_CHARS, SourceFormat, ruby};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "narration")]
#[command(about = "Convert text and markdown scripts to speech fragments", long_about = None)]
#[command(version)]
struct Args {
    /// Enable debug output
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Narrate a file (or part of it) and write audio fragments
    Speak(SpeakArgs),
    /// Print markdown cleaned for speech
    Normalize {
        /// Input file, or - for stdin
        input: PathBuf,
    },
    /// Print the chunks that would be submitted
    Split {
        /// Input file, or - for stdin
        input: PathBuf,

        /// Maximum characters per chunk
        #[arg(long, default_value_t = DEFAULT_MAX_CHARS)]
        max_chars: usize,

        /// Treat input as markdown regardless of extension
        #[arg(long)]
        markdown: bool,
    },
    /// Flatten ruby annotation markup
    Ruby {
        /// Which side of the annotation to keep
        mode: RubyMode,

        /// Input file, or - for stdin
        input: PathBuf,
    },
    /// Manage the project dictionary
    Dict {
        /// Project settings file (default: <downloads>/narration/project_settings.json)
        #[arg(long)]
        project: Option<PathBuf>,

        #[command(subcommand)]
        action: DictAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug)]
struct SpeakArgs {
    /// Input file, or - for stdin
    input: PathBuf,

    /// Character range to narrate (e.g., "120:480")
    #[arg(long)]
    selection: Option<String>,

    /// Project settings file (voice, instructions, dictionary)
    #[arg(long)]
    project: Option<PathBuf>,

    /// Rewrite the text through the project dictionary first
    #[arg(long)]
    apply_dictionary: bool,

    /// Voice override
    #[arg(long)]
    voice: Option<String>,

    /// Delivery instructions override
    #[arg(long)]
    instructions: Option<String>,

    /// Maximum characters per chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Directory for fresh fragments (default: <cache>/narration-editor)
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Copy fragments into the final directory after narration
    #[arg(long)]
    save: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RubyMode {
    /// Keep the annotated base text
    Kanji,
    /// Keep the readings
    Furigana,
}

#[derive(Subcommand, Debug)]
enum DictAction {
    /// List dictionary entries
    List,
    /// Add an entry
    Add { from: String, to: String },
    /// Replace the entry at a position (1-based, as shown by list)
    Edit {
        index: usize,
        from: String,
        to: String,
    },
    /// Remove the entry at a position (1-based)
    Remove { index: usize },
    /// Print a file rewritten through the dictionary
    Apply {
        /// Input file, or - for stdin
        input: PathBuf,
    },
    /// Count the replacements the dictionary would make
    Count {
        /// Input file, or - for stdin
        input: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default voice
    SetVoice { voice: String },
    /// Set default delivery instructions
    SetInstructions { instructions: String },
    /// Set default chunk size
    SetChunkSize { value: usize },
    /// Store an API key (OPENAI_API_KEY still takes precedence)
    SetApiKey { key: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match args.command {
        Commands::Speak(speak) => handle_speak(speak).await,
        Commands::Normalize { input } => {
            let (content, _) = read_input(&input)?;
            print!("{}", text::normalize(&content));
            Ok(())
        }
        Commands::Split {
            input,
            max_chars,
            markdown,
        } => {
            let (content, _) = read_input(&input)?;
            let format = if markdown {
                SourceFormat::Markdown
            } else {
                SourceFormat::from_path(&input)
            };
            let chunks = text::split_text(&format.prepare(&content), max_chars)?;
            for (i, chunk) in chunks.iter().enumerate() {
                println!("--- chunk {}/{} ({} chars)", i + 1, chunks.len(), chunk.chars().count());
                println!("{}", chunk);
            }
            Ok(())
        }
        Commands::Ruby { mode, input } => {
            let (content, _) = read_input(&input)?;
            let output = match mode {
                RubyMode::Kanji => ruby::extract_base_text(&content),
                RubyMode::Furigana => ruby::extract_readings(&content),
            };
            print!("{}", output);
            Ok(())
        }
        Commands::Dict {
            project: project_path,
            action,
        } => handle_dict_command(project_path, &action),
        Commands::Config { action } => handle_config_command(&action),
    }
}

async fn handle_speak(args: SpeakArgs) -> Result<()> {
    let config = NarrationConfig::load().context("Failed to load configuration")?;

    let (full_text, source_path) = read_input(&args.input)?;
    let (selection_start, mut text) = match &args.selection {
        Some(range) => {
            let (start, end) = parse_selection(range)?;
            (start, select_chars(&full_text, start, end)?)
        }
        None => (0, full_text.clone()),
    };

    let loaded_project = match &args.project {
        Some(path) => Some(
            project::load_project(path)
                .with_context(|| format!("Failed to load project: {}", path.display()))?,
        ),
        None => load_default_project()?,
    };
    if let Some(loaded) = &loaded_project {
        eprintln!("{}", loaded.summary());
    }

    if args.apply_dictionary {
        match &loaded_project {
            Some(loaded) => {
                let rewrite = loaded.settings.dictionary.rewrite(&text);
                eprintln!("Dictionary: {} replacement(s)", rewrite.replacements);
                text = rewrite.text;
            }
            None => warn!("--apply-dictionary given but no project settings were found"),
        }
    }

    let settings = loaded_project.map(|p| p.settings);
    let voice = args
        .voice
        .or_else(|| settings.as_ref().map(|s| s.voice.clone()))
        .unwrap_or_else(|| config.voice.clone());
    let instructions = args
        .instructions
        .or_else(|| settings.as_ref().map(|s| s.instructions.clone()))
        .unwrap_or_else(|| config.instructions.clone());
    let chunk_size = args.chunk_size.unwrap_or(config.chunk_size);

    let provider =
        speech_client::get_provider(&config.provider).context("Failed to create speech provider")?;
    provider
        .is_available()
        .context("Speech provider is not available")?;

    let mut session = NarrationSession::new(source_path);
    let options = NarrationOptions::new()
        .with_format(session.source_format())
        .with_max_chars(chunk_size)
        .with_voice(voice)
        .with_instructions(instructions)
        .with_model(config.model.clone());

    debug!("Narration options: {:?}", options);

    // Ctrl-C stops narration at the next chunk boundary
    let token = session.begin_run();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );
    pb.set_message(format!("voice: {}", options.voice));

    let outcome = session
        .narrate(provider.as_ref(), &text, &options, |progress| {
            pb.set_length(progress.total as u64);
            pb.set_position(progress.current as u64);
        })
        .await;

    let fragments = match outcome {
        Ok(NarrationOutcome::Completed(fragments)) => {
            pb.finish_with_message("Narration complete!");
            fragments
        }
        Ok(NarrationOutcome::Cancelled) => {
            pb.abandon_with_message("Cancelled");
            eprintln!("Narration cancelled; no fragments were written");
            return Ok(());
        }
        Err(e) => {
            pb.abandon();
            return Err(e).context("Narration failed");
        }
    };

    if fragments.is_empty() {
        eprintln!("Nothing to narrate");
        return Ok(());
    }

    let store = match args.temp_dir {
        Some(dir) => FragmentStore::new(dir, default_final_dir()?),
        None => FragmentStore::with_default_dirs()?,
    };

    let line = start_line(&full_text, selection_start);
    let paths = store.write_fragments(&session.fragment_base_name(), line, &fragments)?;

    for path in &paths {
        if args.save {
            let saved = store.save_to_final(path)?;
            store.discard(path)?;
            println!("{}", saved.display());
        } else {
            println!("{}", path.display());
        }
    }

    eprintln!(
        "{} fragment(s), {} characters submitted",
        paths.len(),
        session.chars_submitted()
    );

    Ok(())
}

fn handle_dict_command(project_path: Option<PathBuf>, action: &DictAction) -> Result<()> {
    let path = match project_path {
        Some(path) => path,
        None => project::default_project_path()?,
    };

    let loaded = if path.exists() {
        project::load_project(&path)
            .with_context(|| format!("Failed to load project: {}", path.display()))?
    } else {
        LoadedProject {
            settings: ProjectSettings::default(),
            legacy: false,
        }
    };

    match action {
        DictAction::List => {
            println!("Project file: {}", path.display());
            if loaded.settings.dictionary.is_empty() {
                println!("(no entries)");
            }
            for (i, entry) in loaded.settings.dictionary.entries().iter().enumerate() {
                println!("{:>3}. {} -> {}", i + 1, entry.from, entry.to);
            }
        }
        DictAction::Apply { input } => {
            let (content, _) = read_input(input)?;
            let rewrite = loaded.settings.dictionary.rewrite(&content);
            eprintln!("{} replacement(s)", rewrite.replacements);
            print!("{}", rewrite.text);
        }
        DictAction::Count { input } => {
            let (content, _) = read_input(input)?;
            println!(
                "{}",
                loaded.settings.dictionary.count_replacements(&content)
            );
        }
        DictAction::Add { from, to } => {
            let mut editor = DictionaryEditor::new(loaded.settings.dictionary.clone());
            editor.add(DictionaryEntry::new(from.as_str(), to.as_str()));
            save_dictionary(&path, loaded, editor)?;
            println!("Added: {} -> {}", from, to);
        }
        DictAction::Edit { index, from, to } => {
            let position = to_position(*index)?;
            let mut editor = DictionaryEditor::new(loaded.settings.dictionary.clone());
            let previous = editor.begin_edit(position)?.clone();
            editor.commit_edit(DictionaryEntry::new(from.as_str(), to.as_str()))?;
            save_dictionary(&path, loaded, editor)?;
            println!(
                "Updated: {} -> {} (was {} -> {})",
                from, to, previous.from, previous.to
            );
        }
        DictAction::Remove { index } => {
            let position = to_position(*index)?;
            let mut editor = DictionaryEditor::new(loaded.settings.dictionary.clone());
            let removed = editor.remove(position)?;
            save_dictionary(&path, loaded, editor)?;
            println!("Removed: {} -> {}", removed.from, removed.to);
        }
    }
    Ok(())
}

fn save_dictionary(path: &Path, loaded: LoadedProject, editor: DictionaryEditor) -> Result<()> {
    if loaded.legacy {
        eprintln!("Upgrading legacy dictionary file to project settings format");
    }
    let settings = ProjectSettings {
        dictionary: editor.into_dictionary(),
        ..loaded.settings
    };
    project::save_project(path, &settings)
        .with_context(|| format!("Failed to save project: {}", path.display()))?;
    Ok(())
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = NarrationConfig::load()?;
            println!("Configuration file: {:?}", NarrationConfig::config_path()?);
            println!();
            println!("voice = \"{}\"", config.voice);
            println!("instructions = \"{}\"", config.instructions);
            println!("model = \"{}\"", config.model);
            println!("chunk_size = {}", config.chunk_size);
            println!("base_url = \"{}\"", config.provider.base_url());
            println!("timeout_secs = {}", config.provider.timeout_secs);
            if config.provider.has_api_key() {
                println!("api_key = (set)");
            } else {
                println!("api_key = (not set)");
            }
        }
        ConfigAction::SetVoice { voice } => {
            let mut config = NarrationConfig::load()?;
            config.voice = voice.clone();
            config.save()?;
            println!("Default voice set to: {}", config.voice);
        }
        ConfigAction::SetInstructions { instructions } => {
            let mut config = NarrationConfig::load()?;
            config.instructions = instructions.clone();
            config.save()?;
            println!("Default instructions set");
        }
        ConfigAction::SetChunkSize { value } => {
            if *value == 0 {
                anyhow::bail!("Chunk size must be at least 1");
            }
            let mut config = NarrationConfig::load()?;
            config.chunk_size = *value;
            config.save()?;
            println!("Default chunk size set to: {}", config.chunk_size);
        }
        ConfigAction::SetApiKey { key } => {
            let mut config = NarrationConfig::load()?;
            config.provider.api_key = Some(key.clone());
            config.save()?;
            println!("API key saved to {:?}", NarrationConfig::config_path()?);
        }
    }
    Ok(())
}

/// Read a file, or stdin for `-`. Returns the source path for real files.
fn read_input(input: &Path) -> Result<(String, Option<PathBuf>)> {
    if input == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok((content, None));
    }

    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    Ok((content, Some(input.to_path_buf())))
}

/// Load the default project file if one exists.
fn load_default_project() -> Result<Option<LoadedProject>> {
    let path = project::default_project_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let loaded = project::load_project(&path)
        .with_context(|| format!("Failed to load project: {}", path.display()))?;
    Ok(Some(loaded))
}

/// Parse a selection like "120:480" into character offsets.
fn parse_selection(range: &str) -> Result<(usize, usize)> {
    let (start, end) = range
        .split_once(':')
        .context("Invalid selection format. Use 'start:end' (e.g., '0:500')")?;
    let start: usize = start.trim().parse().context("Invalid selection start")?;
    let end: usize = end.trim().parse().context("Invalid selection end")?;
    if start > end {
        anyhow::bail!("Selection start {} is after end {}", start, end);
    }
    Ok((start, end))
}

/// Characters `start..end` of `text`.
fn select_chars(text: &str, start: usize, end: usize) -> Result<String> {
    let len = text.chars().count();
    if end > len {
        anyhow::bail!("Selection end {} is past the end of the text ({} chars)", end, len);
    }
    Ok(text.chars().skip(start).take(end - start).collect())
}

/// Convert a 1-based list position to an index.
fn to_position(index: usize) -> Result<usize> {
    index
        .checked_sub(1)
        .context("Dictionary positions start at 1")
}
