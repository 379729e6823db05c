use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use eco_form::{
	api::Api,
	attachment::Attachment,
	config::Config,
	monday::Monday,
	order::Order,
	storage::FileStorage,
	submit::Submitter,
	vault::Vault,
	webauthn::SoftwareAuthenticator,
};

#[derive(Parser, Debug)]
#[command(name = "eco-form", about = "Submit a taxi order to the eco-taxi dispatcher")]
struct Args {
	/// order description, json
	order: PathBuf,

	/// photo attachments to upload alongside the order
	#[arg(short, long = "file")]
	files: Vec<PathBuf>,

	/// config file (toml); built-in defaults apply otherwise
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// directory holding the vault and submission flags
	#[arg(long, default_value = ".eco-form")]
	data_dir: PathBuf,
}

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	if let Err(e) = run(Args::parse()).await {
		error!(error = %e, "submission failed");

		std::process::exit(1);
	}
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
	let config = match &args.config {
		Some(path) => Config::load(path)?,
		None => Config::default(),
	};

	let order: Order = serde_json::from_str(&std::fs::read_to_string(&args.order)?)?;

	let mut files = Vec::with_capacity(args.files.len());
	for path in &args.files {
		files.push(Attachment::from_path(path).await?);
	}

	let storage = FileStorage::new(&args.data_dir)?;
	let mut vault = Vault::new(&storage, SoftwareAuthenticator, &config.rp_id());

	vault.initialize()?;

	if !vault.is_authenticated() {
		vault.login()?;
	}

	let api = Api::new(&config.eco_taxi.base_url, config.admin_key()?)
		.with_chunk_size(config.eco_taxi.chunk_size);
	let monday = config
		.monday
		.as_ref()
		.map(|m| Monday::new(&m.worker_url, &m.board_id, &m.api_key));

	let submitter = Submitter::new(&api, &storage);
	let submitter = match &monday {
		Some(monday) => submitter.with_monday(monday),
		None => submitter,
	};

	let receipt = submitter
		.submit(&vault, &order, &files, |progress, name| {
			info!("{:>3.0}% - {}", progress, name);
		})
		.await?;

	info!(id = %receipt.id, index = receipt.index, "order delivered");

	Ok(())
}
