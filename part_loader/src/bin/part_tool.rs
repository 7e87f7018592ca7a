use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use merge_config::{MergeConfig, merge_config};
use part_loader::PartLoader;
use part_loader::configurations::default_config;
use part_loader::logging::init_logging;
use part_merge::{DEFAULT_PART_INDEX_WIDTH, part_segments_with_width};

#[derive(Parser)]
#[clap(version, about = "Reassemble assets split into numbered parts")]
struct PartCommand {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge the split assets from an endpoint and write them to a directory.
    Merge(MergeArg),
    /// Merge the split assets, then fetch one resource through the intercepted entry point.
    Fetch(FetchArg),
    /// Print the candidate part names for a file and an inclusive part range.
    Candidates(CandidatesArg),
}

#[derive(Args)]
struct EndpointArgs {
    /// Base url (http:// or https://) or local directory serving the parts.
    #[clap(long)]
    endpoint: String,
    /// Canonical name of the data asset.
    #[clap(long)]
    data_asset: Option<String>,
    /// Number of parts of the data asset.
    #[clap(long)]
    data_parts: Option<usize>,
    /// Canonical name of the code asset.
    #[clap(long)]
    code_asset: Option<String>,
    /// Number of parts of the code asset.
    #[clap(long)]
    code_parts: Option<usize>,
}

#[derive(Args)]
struct MergeArg {
    #[clap(flatten)]
    endpoint: EndpointArgs,
    /// Directory the merged assets are written to.
    #[clap(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct FetchArg {
    #[clap(flatten)]
    endpoint: EndpointArgs,
    /// Resource to fetch.
    name: String,
    /// Write the resource here instead of stdout.
    #[clap(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct CandidatesArg {
    /// Base name of the split file.
    file: String,
    /// First part index.
    start: usize,
    /// Last part index, inclusive.
    end: usize,
    /// Digits in the zero-padded form.
    #[clap(long, default_value_t = DEFAULT_PART_INDEX_WIDTH)]
    width: usize,
}

impl EndpointArgs {
    fn into_loader(self, mut config: MergeConfig) -> Result<PartLoader> {
        if let Some(name) = self.data_asset {
            config.assets.data_asset = name;
        }
        if let Some(n) = self.data_parts {
            config.assets.data_part_count = n;
        }
        if let Some(name) = self.code_asset {
            config.assets.code_asset = name;
        }
        if let Some(n) = self.code_parts {
            config.assets.code_part_count = n;
        }

        let loader_config = default_config(&self.endpoint, &config)?;
        Ok(PartLoader::new(Arc::new(loader_config))?)
    }
}

impl Command {
    async fn run(self, config: MergeConfig) -> Result<()> {
        match self {
            Command::Merge(arg) => {
                let loader = arg.endpoint.into_loader(config)?;
                let written = loader.merge_to_directory(&arg.output).await?;

                for file in written {
                    println!("{}: {} bytes -> {}", file.name, file.size, file.path.display());
                }
                Ok(())
            },
            Command::Fetch(arg) => {
                let loader = arg.endpoint.into_loader(config)?;
                loader.start().wait().await?;

                let data = loader.fetch_asset(&arg.name).await?;
                match arg.output {
                    Some(path) => {
                        std::fs::write(&path, &data).with_context(|| format!("writing {path:?}"))?;
                        eprintln!("Wrote {} bytes to {}", data.len(), path.display());
                    },
                    None => {
                        let mut stdout = std::io::stdout().lock();
                        stdout.write_all(&data)?;
                        stdout.flush()?;
                    },
                }
                Ok(())
            },
            Command::Candidates(arg) => {
                for segment in part_segments_with_width(&arg.file, arg.start..=arg.end, arg.width) {
                    println!("{}", segment.candidates().join(" "));
                }
                Ok(())
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = PartCommand::parse();
    let config = merge_config().clone();
    init_logging(&config.log)?;

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(cli.command.run(config))
}
