use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = motif_api::Args::parse();

	motif_api::run(args).await
}
