//! HTTP layer: single-shot page fetches and the retrying image client.

use crate::error::{Error, FetchError};
use kuchiki::traits::*;
use rand::prelude::*;
use std::{io::Read, thread, time::Duration};

/// User agent of a plain desktop browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
/// Sent empty on purpose, the CDN rejects foreign referers.
const REFERER: &str = "";
/// Accept list favoring the formats the image CDN serves.
const ACCEPT: &str = "image/avif,image/webp,image/apng,*/*;q=0.8";

/// Politeness jitter bounds, in seconds.
const JITTER_RANGE: std::ops::Range<f64> = 0.3..0.9;
/// Ceiling on the retry backoff, in seconds.
const BACKOFF_CAP: f64 = 4.0;

/// A single HTTP GET, no retry.
///
/// This is the transport seam: tests and alternate transports plug in here.
pub trait Fetch {
    /// Fetches `url` and returns the raw body.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Where the pipeline sleeps.
///
/// Substituting a no-op implementation runs the retry policy without
/// wall-clock delays.
pub trait Pacer {
    /// Pauses the pipeline for `delay`.
    fn pause(&self, delay: Duration);
}

/// Transport over ureq, same browser-like headers on every request.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    fn new() -> Self {
        Self {
            agent: ureq::builder().user_agent(USER_AGENT).build(),
        }
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .agent
            .get(url)
            .set("Referer", REFERER)
            .set("Accept", ACCEPT)
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => FetchError::Status(code),
                ureq::Error::Transport(transport) => {
                    FetchError::Network(transport.to_string())
                },
            })?;

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|err| FetchError::Network(err.to_string()))?;

        Ok(body)
    }
}

/// Wall-clock pacer.
struct Sleeper;

impl Pacer for Sleeper {
    fn pause(&self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// HTTP client, handles pacing and bounded retry.
pub struct Client {
    /// Transport.
    fetcher: Box<dyn Fetch>,
    /// Sleep capability.
    pacer: Box<dyn Pacer>,
    /// Max number of attempts for each image download.
    retry: u32,
}

impl Client {
    /// Initializes a client over the real transport and clock.
    pub fn new(retry: u32) -> Self {
        Self::with_capabilities(
            Box::new(HttpFetcher::new()),
            Box::new(Sleeper),
            retry,
        )
    }

    /// Initializes a client over custom fetch and pacing capabilities.
    pub fn with_capabilities(
        fetcher: Box<dyn Fetch>,
        pacer: Box<dyn Pacer>,
        retry: u32,
    ) -> Self {
        Self {
            fetcher,
            pacer,
            retry,
        }
    }

    /// Retrieves and parses the HTML at `url`.
    ///
    /// One attempt, no pacing: only image downloads go through the retry
    /// policy.
    pub fn get_html(&self, url: &str) -> Result<kuchiki::NodeRef, Error> {
        let body = self.fetcher.fetch(url).map_err(|source| Error::Fetch {
            url: url.to_owned(),
            source,
        })?;
        let html = String::from_utf8_lossy(&body).into_owned();

        Ok(kuchiki::parse_html().one(html))
    }

    /// Downloads the image at `url` under the retry policy.
    ///
    /// Every attempt is preceded by a short random pause. Failed attempts
    /// back off exponentially, capped at 4s; once the attempt budget is
    /// spent the last failure is surfaced.
    pub fn get_image(&self, url: &str) -> Result<Vec<u8>, Error> {
        let mut attempt = 0;

        loop {
            self.pacer.pause(jitter());

            match self.fetcher.fetch(url) {
                Ok(body) => return Ok(body),
                Err(source) => {
                    attempt += 1;
                    if attempt >= self.retry {
                        return Err(Error::RetriesExhausted {
                            url: url.to_owned(),
                            attempts: attempt,
                            source,
                        });
                    }
                    self.pacer.pause(backoff(attempt));
                },
            }
        }
    }
}

/// Random pre-request delay, to avoid request bursts.
fn jitter() -> Duration {
    let mut rng = rand::thread_rng();

    Duration::from_secs_f64(rng.gen_range(JITTER_RANGE))
}

/// Delay before retrying after `attempt` failures: 1.5s, 2.25s, 3.375s, 4s.
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs_f64(1.5_f64.powi(attempt as i32).min(BACKOFF_CAP))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    /// Fails the first `failures` calls, then answers `b"payload"`.
    struct FlakyFetcher {
        failures: u32,
        calls: Rc<RefCell<u32>>,
    }

    impl Fetch for FlakyFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            let mut calls = self.calls.borrow_mut();
            *calls += 1;

            if *calls <= self.failures {
                Err(FetchError::Status(503))
            } else {
                Ok(b"payload".to_vec())
            }
        }
    }

    struct RecordingPacer {
        pauses: Rc<RefCell<Vec<Duration>>>,
    }

    impl Pacer for RecordingPacer {
        fn pause(&self, delay: Duration) {
            self.pauses.borrow_mut().push(delay);
        }
    }

    fn flaky_client(
        failures: u32,
    ) -> (Client, Rc<RefCell<u32>>, Rc<RefCell<Vec<Duration>>>) {
        let calls = Rc::new(RefCell::new(0));
        let pauses = Rc::new(RefCell::new(Vec::new()));
        let client = Client::with_capabilities(
            Box::new(FlakyFetcher {
                failures,
                calls: Rc::clone(&calls),
            }),
            Box::new(RecordingPacer {
                pauses: Rc::clone(&pauses),
            }),
            5,
        );

        (client, calls, pauses)
    }

    #[test]
    fn succeeds_below_retry_bound() {
        let (client, calls, _) = flaky_client(4);

        let res = client.get_image("https://cdn.test/i1.jpg");

        assert_eq!(res.expect("recovered"), b"payload");
        assert_eq!(*calls.borrow(), 5);
    }

    #[test]
    fn gives_up_at_retry_bound() {
        let (client, calls, _) = flaky_client(5);

        let res = client.get_image("https://cdn.test/i1.jpg");

        match res {
            Err(Error::RetriesExhausted { attempts, .. }) => {
                assert_eq!(attempts, 5);
            },
            other => panic!("expected exhausted retries, got {:?}", other),
        }
        assert_eq!(*calls.borrow(), 5);
    }

    #[test]
    fn backoff_schedule() {
        let (client, _, pauses) = flaky_client(4);

        client
            .get_image("https://cdn.test/i1.jpg")
            .expect("recovered");

        // Jitter before each of the 5 attempts, backoff after each of the
        // 4 failures, interleaved.
        let pauses = pauses.borrow();
        assert_eq!(pauses.len(), 9);

        let backoffs = [1.5, 2.25, 3.375, 4.0];
        for (i, expected) in backoffs.iter().enumerate() {
            let got = pauses[2 * i + 1].as_secs_f64();
            assert!(
                (got - expected).abs() < 1e-9,
                "backoff {} was {}s",
                i + 1,
                got
            );
        }
        for jiffy in pauses.iter().step_by(2) {
            let secs = jiffy.as_secs_f64();
            assert!((0.3..0.9).contains(&secs), "jitter was {}s", secs);
        }
    }

    #[test]
    fn backoff_caps_at_four_seconds() {
        assert!((backoff(4).as_secs_f64() - 4.0).abs() < 1e-9);
        assert!((backoff(10).as_secs_f64() - 4.0).abs() < 1e-9);
    }
}
