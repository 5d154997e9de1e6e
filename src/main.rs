use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inquiry_pipeline::config::ClientConfig;
use inquiry_pipeline::models::inquiry::{Attachment, InquiryRecord, InquiryRequest, QuantityInput};
use inquiry_pipeline::services::inquiry_validator_service::MAX_ATTACHMENT_SIZE;
use inquiry_pipeline::services::{
    format_record_dates, InquiryApiClient, InquiryPipeline, SubmissionStore,
};
use inquiry_pipeline::utils::log_sanitizer::sanitize_for_log;
use inquiry_pipeline::InquiryError;

#[derive(Parser, Debug)]
#[command(name = "inquiry-pipeline", about = "Submit and browse marketplace inquiries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and submit a new inquiry
    Submit {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        buyer_id: String,
        /// Accepted as typed; non-numeric input fails validation
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        description: String,
        /// File to attach (PDF, DOC, DOCX, XLS, XLSX, JPEG, PNG; max 10MB)
        #[arg(long)]
        attachment: Option<PathBuf>,
    },
    /// List every inquiry
    List,
    /// Show one inquiry
    Show { id: String },
    /// List inquiries submitted by a buyer
    Buyer { buyer_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "inquiry_pipeline=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env()?;
    tracing::info!("Using inquiry API at {}", config.api_base_url);
    tracing::debug!(config = ?config, "Loaded client configuration");

    let client = InquiryApiClient::new(config)?;
    let store = Arc::new(SubmissionStore::new(client));
    let pipeline = InquiryPipeline::new(store.clone());

    match cli.command {
        Command::Submit {
            product_id,
            buyer_id,
            quantity,
            description,
            attachment,
        } => {
            let attachment = attachment.as_deref().map(read_attachment).transpose()?;
            let request = InquiryRequest {
                quantity: Some(QuantityInput::Text(quantity)),
                description: Some(description),
                buyer_id: Some(buyer_id),
                product_id: Some(product_id),
                attachment,
            };

            match pipeline.submit(&request).await {
                Ok(record) => {
                    if let Some(message) = store.state().success_message {
                        eprintln!("{}", message);
                    }
                    print_json(&record)?;
                }
                Err(InquiryError::Validation(errors)) => {
                    for error in &errors {
                        eprintln!("- {}", error);
                    }
                    anyhow::bail!("Inquiry is invalid ({} problem(s))", errors.len());
                }
                Err(_) => {
                    let message = store.state().error.unwrap_or_default();
                    anyhow::bail!("{}", sanitize_for_log(&message));
                }
            }
        }
        Command::List => {
            let records = store.fetch_all_inquiries().await.map_err(|_| store_error(&store))?;
            print_records(&records)?;
        }
        Command::Show { id } => {
            let record = store.fetch_inquiry_by_id(&id).await.map_err(|_| store_error(&store))?;
            print_json(&record)?;
            let dates = format_record_dates(&record);
            if let Some(created_at) = dates.created_at {
                eprintln!("Created: {}", created_at);
            }
            if let Some(updated_at) = dates.updated_at {
                eprintln!("Updated: {}", updated_at);
            }
        }
        Command::Buyer { buyer_id } => {
            let records = store
                .fetch_inquiries_by_buyer(&buyer_id)
                .await
                .map_err(|_| store_error(&store))?;
            print_records(&records)?;
        }
    }

    Ok(())
}

fn store_error(store: &SubmissionStore<InquiryApiClient>) -> anyhow::Error {
    anyhow::anyhow!("{}", store.state().error.unwrap_or_default())
}

fn print_records(records: &[InquiryRecord]) -> Result<()> {
    eprintln!("{} inquiry(ies)", records.len());
    print_json(&records)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// Oversized files are refused from metadata, before any bytes are read.
fn read_attachment(path: &Path) -> Result<Attachment> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to read attachment {}", path.display()))?
        .len();
    if size > MAX_ATTACHMENT_SIZE {
        anyhow::bail!("Attachment size must be less than 10MB ({} is {} bytes)", path.display(), size);
    }

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read attachment {}", path.display()))?;
    let file_name = path.file_name().map(|n| n.to_string_lossy().to_string());
    Ok(Attachment::from_bytes(file_name, mime_type_for(path), &bytes))
}

fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}
