use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = kokuzo_api::Args::parse();

	kokuzo_api::run(args).await
}
