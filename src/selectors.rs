use once_cell::sync::Lazy;

/// Select the serie title heading.
pub(crate) static TITLE_SELECTOR: Lazy<kuchiki::Selectors> = Lazy::new(|| {
    kuchiki::Selectors::compile("h1").expect("invalid title selector")
});

/// Select the episode entries of the serie listing.
pub(crate) static EPISODE_ITEM_SELECTOR: Lazy<kuchiki::Selectors> =
    Lazy::new(|| {
        kuchiki::Selectors::compile("li._episodeItem")
            .expect("invalid episode item selector")
    });

/// Select the link inside an episode entry.
pub(crate) static EPISODE_LINK_SELECTOR: Lazy<kuchiki::Selectors> =
    Lazy::new(|| {
        kuchiki::Selectors::compile("a")
            .expect("invalid episode link selector")
    });

/// Select the viewer images that carry their source URL.
pub(crate) static IMAGE_SELECTOR: Lazy<kuchiki::Selectors> = Lazy::new(|| {
    kuchiki::Selectors::compile("#_imageList img[data-url]")
        .expect("invalid image selector")
});
