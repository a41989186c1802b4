//! Shared types and pagination infrastructure for the YouTube API client.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::Stream;

type PageFetch<'a, F, T> =
    Pin<Box<dyn Future<Output = eyre::Result<(F, (VecDeque<T>, Option<String>))>> + 'a + Send>>;

/// A stream over a paginated YouTube list endpoint.
///
/// Items are yielded one at a time; when the buffered page runs out, the next
/// page is requested using the `nextPageToken` from the previous response.
/// Pagination is forward-only.
pub struct PagedStream<'a, T, F> {
    /// Items from the most recently fetched page that have not been yielded yet.
    buffered: VecDeque<T>,
    /// The in-flight request for the next page, if one has been set up.
    in_flight: Option<PageFetch<'a, F, T>>,
    /// Set once the last page has been consumed (or a fetch has failed).
    exhausted: bool,
}

impl<'a, T, F> PagedStream<'a, T, F> {
    /// Create a stream that fetches pages on demand via `fetcher`.
    ///
    /// The fetcher is called with `None` for the first page and with the
    /// previous response's continuation token for every page after that. It
    /// returns the page's items together with the token for the page that
    /// follows, or `None` when this was the last page.
    pub fn new<Fut>(fetcher: F) -> Self
    where
        F: Fn(Option<String>) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = eyre::Result<(VecDeque<T>, Option<String>)>> + Send + 'a,
    {
        // The future resolves to the fetcher as well so that poll_next can
        // hand it to the future for the page after this one.
        let first_page = async move {
            let results = fetcher(None).await?;
            Ok((fetcher, results))
        };
        Self {
            buffered: VecDeque::new(),
            in_flight: Some(Box::pin(first_page)),
            exhausted: false,
        }
    }
}

impl<'a, T: Unpin, F> Unpin for PagedStream<'a, T, F> {}

impl<'a, T: Unpin, F, Fut> Stream for PagedStream<'a, T, F>
where
    F: Fn(Option<String>) -> Fut,
    F: Send + 'a,
    Fut: Future<Output = eyre::Result<(VecDeque<T>, Option<String>)>> + Send + 'a,
{
    type Item = eyre::Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if self.exhausted {
                return Poll::Ready(None);
            }

            if let Some(pending) = self.in_flight.as_mut() {
                match pending.as_mut().poll(cx) {
                    Poll::Ready(Ok((fetcher, (items, next_token)))) => {
                        self.buffered.extend(items);

                        if let Some(next_token) = next_token {
                            // Queue up the next page, but don't request it
                            // until the buffered items have been drained.
                            self.in_flight = Some(Box::pin(async move {
                                let results = fetcher(Some(next_token)).await?;
                                Ok((fetcher, results))
                            }));
                        } else {
                            self.exhausted = true;
                            self.in_flight = None;
                        }

                        // Loop back around to yield from the new buffer. An
                        // empty page with a continuation token polls the next
                        // fetch instead.
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        self.in_flight = None;
                        self.exhausted = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => {
                        return Poll::Pending;
                    }
                }
            } else {
                self.exhausted = true;
                return Poll::Ready(None);
            }
        }
    }
}

/// Paging details for lists of resources.
///
/// See: <https://developers.google.com/youtube/v3/docs/pageInfo>
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct PageInfo {
    /// The total number of results in the result set.
    #[serde(rename = "totalResults")]
    pub total_results: u32,
    /// The number of results included in the API response.
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn yields_pages_in_order() {
        let stream = PagedStream::new(|token: Option<String>| async move {
            match token.as_deref() {
                None => Ok((VecDeque::from([1, 2]), Some("page-2".to_string()))),
                Some("page-2") => Ok((VecDeque::from([3, 4]), None)),
                Some(other) => eyre::bail!("unexpected page token {other}"),
            }
        });

        let mut stream = std::pin::pin!(stream);
        let mut seen = Vec::new();
        while let Some(item) = stream.next().await {
            seen.push(item.unwrap());
        }
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn empty_first_page_yields_nothing() {
        let stream = PagedStream::new(|_token: Option<String>| async move {
            Ok::<_, eyre::Report>((VecDeque::<String>::new(), None))
        });

        let mut stream = std::pin::pin!(stream);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn failed_page_fetch_ends_the_stream() {
        let stream = PagedStream::new(|token: Option<String>| async move {
            match token {
                None => Ok((VecDeque::from([1]), Some("page-2".to_string()))),
                Some(_) => Err(eyre::eyre!("quota exceeded")),
            }
        });

        let mut stream = std::pin::pin!(stream);
        assert_eq!(stream.next().await.unwrap().unwrap(), 1);
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn does_not_fetch_pages_nobody_asked_for() {
        let fetches = AtomicUsize::new(0);
        let stream = PagedStream::new(|token: Option<String>| {
            fetches.fetch_add(1, Ordering::SeqCst);
            async move {
                let page = match token {
                    None => (VecDeque::from(["a", "b"]), Some("page-2".to_string())),
                    Some(_) => (VecDeque::from(["c", "d"]), None),
                };
                Ok::<_, eyre::Report>(page)
            }
        });

        let mut stream = std::pin::pin!(stream.take(2));
        assert_eq!(stream.next().await.unwrap().unwrap(), "a");
        assert_eq!(stream.next().await.unwrap().unwrap(), "b");
        assert!(stream.next().await.is_none());
        // The second page was queued but never requested.
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn page_info_deserializes_from_api_casing() {
        let page_info: PageInfo = serde_json::from_value(serde_json::json!({
            "totalResults": 87,
            "resultsPerPage": 50,
        }))
        .unwrap();
        assert_eq!(page_info.total_results, 87);
        assert_eq!(page_info.results_per_page, 50);
    }
}
