use crate::{extract, fs, Chapter, Client};
use eyre::{Result, WrapErr};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use url::Url;

/// Match the episode marker in a chapter URL path (`ep-<n>`).
static EP_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ep-\d+").expect("invalid episode segment regex"));

/// Match the episode marker in a chapter URL query (`episode_no=<n>`).
static EP_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"episode_no=\d+").expect("invalid episode param regex")
});

/// A webtoon serie.
pub struct Serie {
    /// Serie title.
    title: String,
    /// Number of episodes.
    episode_count: u32,
    /// Chapter URL template, as observed on the seed page.
    sample_href: String,
}

impl Serie {
    /// Resolves the serie from its seed page (normally chapter 1).
    pub fn new(client: &Client, seed: &Url) -> Result<Self> {
        let html = client.get_html(seed.as_str()).context("get seed page")?;

        let title =
            extract::serie_title(&html).context("extract serie title")?;
        let summary = extract::episode_summary(&html)
            .context("extract episode summary")?;

        Ok(Self {
            title,
            episode_count: summary.episode_count,
            sample_href: summary.sample_href,
        })
    }

    /// Returns the serie title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the number of episodes.
    pub fn episode_count(&self) -> u32 {
        self.episode_count
    }

    /// Returns the name of the serie's output directory.
    pub fn directory(&self) -> PathBuf {
        fs::serie_dir_name(&self.title)
    }

    /// Returns the chapters, in reading order.
    pub fn chapters(&self) -> impl Iterator<Item = Chapter> + '_ {
        (1..=self.episode_count).map(|number| {
            Chapter::new(number, chapter_url(&self.sample_href, number))
        })
    }
}

/// Derives the URL of chapter `number` from the sample href.
///
/// Both markers are substituted independently, first occurrence only; a
/// missing marker is left alone. The result is not validated here, a bogus
/// URL fails at fetch time.
fn chapter_url(sample_href: &str, number: u32) -> String {
    let url = EP_SEGMENT.replace(sample_href, format!("ep-{}", number));

    EP_PARAM
        .replace(&url, format!("episode_no={}", number))
        .into_owned()
}
