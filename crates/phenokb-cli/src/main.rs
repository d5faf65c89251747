//! Phenokb — curation console for the gene/symptom knowledge base.
//! Entry point for the phenokb binary.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use phenokb_board::ItemKind;
use phenokb_client::CurationClient;
use phenokb_session::{CurationSession, DragState};

#[derive(Parser)]
#[command(
    name = "phenokb",
    version,
    about = "Curation console for the gene/symptom knowledge base"
)]
struct Cli {
    /// Path to phenokb.toml (default: PHENOKB_CONFIG, then ./phenokb.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all known genes.
    Genes,
    /// List the category vocabulary.
    Categories,
    /// Show the categorized symptom board of a gene.
    Symptoms { gene: String },
    /// Move a symptom within its category or onto another category, then
    /// commit the new ordering.
    Move {
        gene: String,
        symptom: String,
        /// New zero-based position within the symptom's current category.
        #[arg(long, conflicts_with = "to_category")]
        to_index: Option<usize>,
        /// Destination category; the symptom is appended at its tail.
        #[arg(long)]
        to_category: Option<String>,
    },
    /// Relocate a symptom into the Archived bucket and commit.
    Archive { gene: String, symptom: String },
    /// Hard-delete a symptom record on the service side.
    DeleteSymptom { symptom_id: String },
    /// List uploaded gene spreadsheets.
    Files,
    /// Delete an uploaded gene spreadsheet.
    DeleteFile { file_id: String },
    /// Upload a new gene spreadsheet (xlsx).
    Import { spreadsheet: PathBuf },
    /// Replace an existing gene spreadsheet.
    UpdateFile { file_id: String, spreadsheet: PathBuf },
    /// Show the spreadsheet import error log.
    Errors,
    /// Upload a configuration archive (zip).
    ConfigUpload { archive: PathBuf },
    /// Download the configuration archive.
    ConfigDownload {
        /// Destination path (default: timestamped file in downloads.dir).
        dest: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("phenokb=info,warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;
    info!("Phenokb console, service at {}", config.service.base_url);

    let client = Arc::new(CurationClient::new(Some(&config.service.base_url))?);

    match cli.command {
        Command::Genes => {
            for gene in client.list_genes().await? {
                println!("{gene}");
            }
        }
        Command::Categories => {
            for category in client.list_categories().await? {
                println!("{category}");
            }
        }
        Command::Symptoms { gene } => {
            let board = client.list_symptoms(&gene).await?;
            for category in board.category_names() {
                println!("{category}");
                if let Some(symptoms) = board.symptoms(category) {
                    for (index, symptom) in symptoms.iter().enumerate() {
                        println!("  {index:>3}  {symptom}");
                    }
                }
            }
        }
        Command::Move { gene, symptom, to_index, to_category } => {
            let mut session = CurationSession::new(Arc::clone(&client));
            session.select_gene(&gene).await?;
            session.begin_drag(&symptom)?;

            match (to_index, to_category) {
                (Some(index), None) => {
                    let DragState::Dragging { payload, .. } = session.drag_state() else {
                        unreachable!("begin_drag succeeded");
                    };
                    let origin = payload.category.clone();
                    session.hover_move(index, &origin, ItemKind::Symptom)?;
                }
                (None, Some(category)) => {
                    session.hover_move(0, &category, ItemKind::Category)?;
                }
                _ => anyhow::bail!("pass exactly one of --to-index or --to-category"),
            }

            session.complete_drop().await?;
            println!("Moved {symptom} and committed the new order for {gene}.");
        }
        Command::Archive { gene, symptom } => {
            let mut session = CurationSession::new(Arc::clone(&client));
            session.select_gene(&gene).await?;
            session.archive_symptom(&symptom).await?;
            println!("Archived {symptom} for {gene}.");
        }
        Command::DeleteSymptom { symptom_id } => {
            client.delete_symptom(&symptom_id).await?;
            println!("Deleted symptom record {symptom_id}.");
        }
        Command::Files => {
            for file in client.list_excel_files().await? {
                println!("{file}");
            }
        }
        Command::DeleteFile { file_id } => {
            client.delete_excel_file(&file_id).await?;
            println!("Deleted spreadsheet {file_id}.");
        }
        Command::Import { spreadsheet } => {
            client.add_new_gene(&spreadsheet).await?;
            println!("Uploaded {}.", spreadsheet.display());
        }
        Command::UpdateFile { file_id, spreadsheet } => {
            client.update_excel_file(&file_id, &spreadsheet).await?;
            println!("Replaced {file_id} with {}.", spreadsheet.display());
        }
        Command::Errors => {
            let errors = client.get_errors().await?;
            if errors.is_empty() {
                println!("No import errors.");
            }
            for error in errors {
                println!("{error}");
            }
        }
        Command::ConfigUpload { archive } => {
            client.upload_configuration(&archive).await?;
            println!("Uploaded configuration archive {}.", archive.display());
        }
        Command::ConfigDownload { dest } => {
            let dest = dest.unwrap_or_else(|| {
                let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
                PathBuf::from(&config.downloads.dir).join(format!("configuration-{stamp}.zip"))
            });
            client.download_configuration(&dest).await?;
            println!("Saved configuration archive to {}.", dest.display());
        }
    }

    Ok(())
}
