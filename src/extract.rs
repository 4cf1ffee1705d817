//! Markup queries over the serie and viewer pages.
//!
//! Three stateless queries cover everything the pipeline needs to know
//! about a page; the orchestrator never touches the parser directly.

use crate::{
    error::Error,
    selectors::{
        EPISODE_ITEM_SELECTOR, EPISODE_LINK_SELECTOR, IMAGE_SELECTOR,
        TITLE_SELECTOR,
    },
};
use kuchiki::{traits::*, NodeRef};

/// What the seed page reveals about the serie's episodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeSummary {
    /// Number of the newest episode, i.e. the episode count.
    pub episode_count: u32,
    /// Href of the listed episode, used as template for every chapter URL.
    pub sample_href: String,
}

/// Returns the serie title: the trimmed text of the first heading.
pub fn serie_title(doc: &NodeRef) -> Result<String, Error> {
    let heading = TITLE_SELECTOR
        .filter(doc.descendants().elements())
        .next()
        .ok_or(Error::MissingElement { selector: "h1" })?;

    Ok(heading.text_contents().trim().to_owned())
}

/// Reads the episode count and the sample href from the first episode item.
pub fn episode_summary(doc: &NodeRef) -> Result<EpisodeSummary, Error> {
    let item = EPISODE_ITEM_SELECTOR
        .filter(doc.descendants().elements())
        .next()
        .ok_or(Error::MissingElement {
            selector: "li._episodeItem",
        })?;

    let raw = item
        .attributes
        .borrow()
        .get("data-episode-no")
        .map(ToOwned::to_owned)
        .ok_or(Error::MissingElement {
            selector: "li._episodeItem[data-episode-no]",
        })?;
    let episode_count = raw.parse().map_err(|_| Error::Parse {
        what: "episode number",
        value: raw.clone(),
    })?;

    let link = EPISODE_LINK_SELECTOR
        .filter(item.as_node().descendants().elements())
        .next()
        .ok_or(Error::MissingElement {
            selector: "li._episodeItem a",
        })?;
    let sample_href = link
        .attributes
        .borrow()
        .get("href")
        .map(ToOwned::to_owned)
        .ok_or(Error::MissingElement {
            selector: "li._episodeItem a[href]",
        })?;

    Ok(EpisodeSummary {
        episode_count,
        sample_href,
    })
}

/// Lists the image URLs of a chapter page, in reading order.
///
/// A page without extractable images is a valid (empty) result: the viewer
/// does not embed `data-url` attributes when lazy-loading never triggered.
pub fn image_urls(doc: &NodeRef) -> Vec<String> {
    IMAGE_SELECTOR
        .filter(doc.descendants().elements())
        .filter_map(|img| {
            img.attributes.borrow().get("data-url").map(ToOwned::to_owned)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchiki::traits::*;

    fn parse(html: &str) -> NodeRef {
        kuchiki::parse_html().one(html)
    }

    #[test]
    fn title_is_trimmed() {
        let doc = parse("<html><body><h1>  Tower of God \n</h1></body></html>");

        assert_eq!(serie_title(&doc).expect("title"), "Tower of God");
    }

    #[test]
    fn title_requires_a_heading() {
        let doc = parse("<html><body><h2>nope</h2></body></html>");

        match serie_title(&doc) {
            Err(Error::MissingElement { selector }) => {
                assert_eq!(selector, "h1");
            },
            other => panic!("expected missing element, got {:?}", other),
        }
    }

    #[test]
    fn summary_reads_first_item() {
        let doc = parse(concat!(
            "<ul>",
            r#"<li class="_episodeItem" data-episode-no="42">"#,
            r#"<a href="/ep-42/viewer?episode_no=42">latest</a></li>"#,
            r#"<li class="_episodeItem" data-episode-no="41">"#,
            r#"<a href="/ep-41/viewer?episode_no=41">older</a></li>"#,
            "</ul>",
        ));

        let summary = episode_summary(&doc).expect("summary");

        assert_eq!(summary.episode_count, 42);
        assert_eq!(summary.sample_href, "/ep-42/viewer?episode_no=42");
    }

    #[test]
    fn summary_requires_an_item() {
        let doc = parse("<ul><li>no marker here</li></ul>");

        assert!(matches!(
            episode_summary(&doc),
            Err(Error::MissingElement { .. })
        ));
    }

    #[test]
    fn summary_rejects_non_numeric_count() {
        let doc = parse(concat!(
            r#"<li class="_episodeItem" data-episode-no="n/a">"#,
            r#"<a href="/ep-1">x</a></li>"#,
        ));

        match episode_summary(&doc) {
            Err(Error::Parse { value, .. }) => assert_eq!(value, "n/a"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn images_in_document_order() {
        let doc = parse(concat!(
            r#"<div id="_imageList">"#,
            r#"<img data-url="https://cdn.test/1.jpg">"#,
            r#"<img src="ignored.jpg">"#,
            r#"<img data-url="https://cdn.test/2.jpg">"#,
            "</div>",
            r#"<img data-url="https://cdn.test/outside.jpg">"#,
        ));

        assert_eq!(
            image_urls(&doc),
            vec!["https://cdn.test/1.jpg", "https://cdn.test/2.jpg"]
        );
    }

    #[test]
    fn no_images_is_not_an_error() {
        let doc = parse(r#"<div id="_imageList"></div>"#);

        assert!(image_urls(&doc).is_empty());
    }
}
