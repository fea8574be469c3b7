use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = qgraph_api::Args::parse();
	qgraph_api::run(args).await
}
