use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use hdralign_core::consts::DEFAULT_HISTOGRAM_STRIDE;
use hdralign_core::exposure::select_reference_from_proxies;
use hdralign_core::io::{load_proxies, FileImageSource};

#[derive(Args)]
pub struct ReferenceArgs {
    /// Input images
    #[arg(required = true, num_args = 2..)]
    pub files: Vec<PathBuf>,

    /// Histogram sampling stride in pixels
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_STRIDE)]
    pub stride: usize,
}

pub fn run(args: &ReferenceArgs) -> Result<()> {
    if args.stride == 0 {
        anyhow::bail!("--stride must be at least 1");
    }
    let proxies = load_proxies(&FileImageSource, &args.files)?;
    let selection = select_reference_from_proxies(&proxies, args.stride)?;

    println!(
        "\nTrimmed dynamic range (stride {}, {} images):",
        args.stride,
        args.files.len()
    );
    println!("{:>5}  {:>5}  {:>5}  {:>6}  File", "Index", "LEP", "HEP", "Score");
    println!("{}", "-".repeat(40));

    for (i, (range, path)) in selection.ranges.iter().zip(&args.files).enumerate() {
        let marker = if i == selection.index { "*" } else { " " };
        println!(
            "{:>4}{}  {:>5}  {:>5}  {:>6}  {}",
            i,
            marker,
            range.lep,
            range.hep,
            range.score(),
            path.display()
        );
    }

    println!(
        "\nReference: {} ({})",
        selection.index,
        args.files[selection.index].display()
    );
    Ok(())
}
