use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use relative_path::RelativePathBuf;
use richmark_config::Config;
use richmark_engine::model::outline;
use richmark_engine::{Cmd, Document, io};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(name = "richmark", version, about = "Normalize, inspect and create Markdown documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Normalize a document and print (or rewrite) its Markdown
    Fmt {
        file: PathBuf,
        /// Rewrite the file in place instead of printing
        #[arg(short, long)]
        write: bool,
    },
    /// Print the document tree
    Tree { file: PathBuf },
    /// Print word and character counts
    Stats { file: PathBuf },
    /// Append a table of the configured size
    Table { file: PathBuf },
    /// Create an empty document in the documents folder
    New { name: Option<String> },
    /// List Markdown files in the documents folder
    Ls,
    /// Write a config file pointing at a documents folder
    Init { documents_path: PathBuf },
}

/// Splits a file argument into the folder it lives in and its name, the
/// shape the engine's I/O functions take.
fn split_path(file: &Path) -> Result<(PathBuf, RelativePathBuf)> {
    let name = file
        .file_name()
        .with_context(|| format!("not a file path: {}", file.display()))?;
    let root = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((root, RelativePathBuf::from_path(Path::new(name))?))
}

fn open(file: &Path) -> Result<Document> {
    if !io::is_markdown_file(file) {
        bail!("{} is not a Markdown file (.md or .markdown)", file.display());
    }
    let (root, relative) = split_path(file)?;
    Ok(io::load_document(&relative, &root)?)
}

fn save(document: &Document, file: &Path) -> Result<()> {
    let (root, relative) = split_path(file)?;
    io::save_document(document, &relative, &root)?;
    Ok(())
}

fn run(command: Command, config: &Config, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Fmt { file, write } => {
            let document = open(&file)?;
            if write {
                save(&document, &file)?;
            } else {
                writeln!(out, "{}", document.to_markdown())?;
            }
        }
        Command::Tree { file } => {
            let document = open(&file)?;
            write!(out, "{}", outline(document.root()))?;
        }
        Command::Stats { file } => {
            let stats = open(&file)?.stats();
            writeln!(out, "Words: {} | Characters: {}", stats.words, stats.chars)?;
        }
        Command::Table { file } => {
            let mut document = open(&file)?;
            document.place_caret_at_end();
            document.apply(Cmd::InsertTable {
                rows: config.table.rows,
                cols: config.table.cols,
            });
            save(&document, &file)?;
        }
        Command::New { name } => {
            io::validate_documents_dir(&config.documents_path)?;
            let mut name = name.unwrap_or_else(|| config.default_file_name.clone());
            if !io::is_markdown_file(Path::new(&name)) {
                name.push_str(".md");
            }
            let path = config.documents_path.join(&name);
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            save(&Document::new(), &path)?;
            writeln!(out, "{}", path.display())?;
        }
        Command::Ls => {
            io::validate_documents_dir(&config.documents_path)?;
            for file in io::scan_markdown_files(&config.documents_path)? {
                let shown = file.strip_prefix(&config.documents_path).unwrap_or(&file);
                writeln!(out, "{}", shown.display())?;
            }
        }
        Command::Init { documents_path } => {
            io::validate_documents_dir(&documents_path)?;
            let config_path = Config::config_path();
            if config_path.exists() {
                bail!("{} already exists", config_path.display());
            }
            let documents_path = documents_path.canonicalize()?;
            Config {
                documents_path,
                ..config.clone()
            }
            .save()?;
            log::info!("Config saved to {}", config_path.display());
            writeln!(out, "{}", config_path.display())?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::debug!("No config at {}, using defaults", Config::config_path().display());
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    run(cli.command, &config, &mut std::io::stdout().lock())
}
