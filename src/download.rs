//! The download pipeline: chapters in order, images in order, skipping
//! whatever a previous run already wrote.

use crate::{fs, termio, Chapter, Client, Serie};
use eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use std::{path::Path, time::Instant};

/// Downloads every chapter of the serie under `destination`.
///
/// Images already present on disk are skipped, so an interrupted run is
/// resumed by simply running again.
pub fn download_serie(
    client: &Client,
    serie: &Serie,
    destination: &Path,
) -> Result<()> {
    let total = serie.episode_count();

    for chapter in serie.chapters() {
        println!("Downloading chapter {}/{}", chapter.number(), total);
        download_chapter(client, &chapter, destination)
            .with_context(|| format!("download chapter {}", chapter.number()))?;
    }

    Ok(())
}

/// Downloads a single chapter.
pub fn download_chapter(
    client: &Client,
    chapter: &Chapter,
    destination: &Path,
) -> Result<()> {
    let directory = destination.join(chapter.directory());
    fs::mkdir_p(&directory).context("create chapter directory")?;

    let images = chapter.fetch_images(client).context("list images")?;
    if images.is_empty() {
        termio::print_warn(&format!(
            "chapter {} has no extractable images",
            chapter.number()
        ));
    }

    let progress_bar = setup_image_progress_bar(images.len());
    let start = Instant::now();

    for image in &images {
        let path = directory.join(image.filename());

        if path.is_file() {
            termio::print_skip(&format!("{} already downloaded", path.display()));
            progress_bar.inc(1);
            continue;
        }

        let bytes = client.get_image(image.url()).with_context(|| {
            format!("download image {}/{}", image.ordinal(), images.len())
        })?;
        fs::atomic_write(&path, &bytes)
            .with_context(|| format!("save {}", path.display()))?;

        progress_bar.inc(1);
    }

    progress_bar.finish();
    termio::print_ok(&format!(
        "chapter {} done in {:.2}s",
        chapter.number(),
        start.elapsed().as_secs_f64()
    ));

    Ok(())
}

/// Configures the progress bar for a chapter's images.
fn setup_image_progress_bar(len: usize) -> ProgressBar {
    let progress_bar = ProgressBar::new(len as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:10}    [{bar:40.cyan/blue}] {pos:>4}/{len:4}")
            .progress_chars("##-"),
    );
    progress_bar.set_message("images");

    progress_bar
}
