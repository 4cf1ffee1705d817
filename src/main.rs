//! toongrab - Scrape and download webtoon episode images

// Lints {{{

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    future_incompatible,
    rustdoc::all,
    rustdoc::missing_crate_level_docs,
    missing_docs,
    unreachable_pub,
    unsafe_code,
    unused,
    unused_import_braces,
    unused_lifetimes,
    variant_size_differences,
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::clone_on_ref_ptr,
    clippy::exit,
    clippy::filetype_is_file,
    clippy::float_cmp_const,
    clippy::lossy_float_literal,
    clippy::mem_forget,
    clippy::panic,
    clippy::pattern_type_mismatch,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unneeded_field_pattern,
    clippy::verbose_file_reads,
    clippy::dbg_macro,
    clippy::let_underscore_must_use,
    clippy::todo,
    clippy::unwrap_used,
    clippy::use_debug
)]

// }}}

use clap::Parser;
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use toongrab::{download, fs, Client, Serie};
use url::Url;

fn main() -> Result<()> {
    let opts = Opts::parse();
    let client = Client::new(opts.retry);

    // Resolve the serie from its seed page.
    let serie = Serie::new(&client, &opts.url).context("get serie")?;
    println!(
        "Downloading {} ({} chapters)",
        serie.title(),
        serie.episode_count()
    );

    // Create the output directory, if necessary.
    let destination = [opts.output, serie.directory()]
        .iter()
        .collect::<PathBuf>();
    fs::mkdir_p(&destination).context("create serie directory")?;

    // Download every chapter o/
    download::download_serie(&client, &serie, &destination)
        .with_context(|| format!("download {}", serie.title()))?;

    Ok(())
}

/// CLI options.
#[derive(Parser)]
#[clap(author, version, about)]
pub struct Opts {
    /// Path to the output directory.
    #[clap(short, long, default_value = ".")]
    output: PathBuf,

    /// URL of the serie's first episode.
    url: Url,

    /// Max number of attempts for each image download.
    #[clap(long, default_value_t = 5)]
    retry: u32,
}
