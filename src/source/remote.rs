use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use indicatif::ProgressBar;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{CardSource, RawCard};
use crate::model::Set;
use crate::normalize::{FieldMap, REMOTE_FIELDS};

/// Stand-in page count when `meta` carries none: keep going until a page
/// comes back empty.
pub const UNKNOWN_LAST_PAGE: u32 = 9999;

/// `meta` keys that may hold the last page number, highest priority first.
const LAST_PAGE_KEYS: &[&str] = &["last_page", "total_pages", "totalPages", "lastPage", "pages"];

const SET_CODE_PATHS: &[&str] = &["set.code", "set.id"];
const SET_NAME_PATHS: &[&str] = &["set.name"];

/// One page of the remote listing.
#[derive(Debug, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    data: Option<Vec<RawCard>>,
    #[serde(default)]
    meta: Option<Value>,
}

impl Page {
    #[cfg(test)]
    pub fn new(data: Vec<RawCard>, meta: Option<Value>) -> Self {
        Page {
            data: Some(data),
            meta,
        }
    }

    pub fn last_page(&self) -> Option<u32> {
        let meta = self.meta.as_ref()?.as_object()?;
        LAST_PAGE_KEYS.iter().find_map(|key| match meta.get(*key)? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    fn into_cards(self) -> Vec<RawCard> {
        self.data.unwrap_or_default()
    }
}

/// Result of asking for one page. Transport failures are the `Err` side of
/// [`PageFetcher::fetch_page`].
#[derive(Debug)]
pub enum PageReply {
    Success(Page),
    Rejected { status: u16 },
}

#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch_page(&mut self, page: u32) -> Result<PageReply>;
}

#[derive(Debug, Clone, Default)]
pub struct PaginateOptions {
    pub delay: Duration,
    pub max_pages: Option<u32>,
}

/// Walk pages from 1 until the listing is exhausted.
///
/// Stops on the first of: `current_page` past the last page, an empty page,
/// a non-success status (keeps what was gathered), or the optional
/// `max_pages` cap. Transport errors propagate.
pub async fn paginate<F: PageFetcher>(
    fetcher: &mut F,
    options: &PaginateOptions,
    pb: &ProgressBar,
) -> Result<Vec<RawCard>> {
    let mut current_page: u32 = 1;
    let mut total_pages: Option<u32> = None;
    let mut accumulated = Vec::new();

    loop {
        if current_page > total_pages.unwrap_or(UNKNOWN_LAST_PAGE) {
            debug!("Reached last page {}", current_page - 1);
            break;
        }
        if options.max_pages.is_some_and(|max| current_page > max) {
            info!("Stopping at page cap {}", current_page - 1);
            break;
        }

        let page = match fetcher.fetch_page(current_page).await? {
            PageReply::Success(page) => page,
            PageReply::Rejected { status } => {
                warn!(
                    "Page {} returned HTTP {}; keeping {} cards gathered so far",
                    current_page,
                    status,
                    accumulated.len()
                );
                break;
            }
        };

        if total_pages.is_none() {
            let last = page.last_page();
            if last.is_none() {
                debug!("No page count in meta; paginating until an empty page");
            }
            total_pages = Some(last.unwrap_or(UNKNOWN_LAST_PAGE));
        }

        let cards = page.into_cards();
        if cards.is_empty() {
            debug!("Page {} is empty", current_page);
            break;
        }

        accumulated.extend(cards);
        pb.set_message(format!("page {} ({} cards)", current_page, accumulated.len()));
        pb.tick();
        current_page += 1;

        let more = current_page <= total_pages.unwrap_or(UNKNOWN_LAST_PAGE)
            && !options.max_pages.is_some_and(|max| current_page > max);
        if more && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    Ok(accumulated)
}

/// Sets referenced by `cards`, first occurrence per code wins, in first-seen
/// order. Cards without a set code are skipped.
pub fn derive_sets(cards: &[RawCard]) -> Vec<Set> {
    let mut seen = HashSet::new();
    let mut sets = Vec::new();
    for card in cards {
        let Some(code) = card.text_at(SET_CODE_PATHS).filter(|c| !c.is_empty()) else {
            continue;
        };
        if seen.insert(code.clone()) {
            let name = card.text_at(SET_NAME_PATHS).unwrap_or_default();
            sets.push(Set {
                code,
                name,
                release_date: None,
            });
        }
    }
    sets
}

/// Paginated API source.
pub struct RemoteSource<F> {
    fetcher: F,
    options: PaginateOptions,
    progress: ProgressBar,
}

impl<F: PageFetcher> RemoteSource<F> {
    pub fn new(fetcher: F, options: PaginateOptions) -> Self {
        RemoteSource {
            fetcher,
            options,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = pb;
        self
    }
}

impl<F: PageFetcher> CardSource for RemoteSource<F> {
    fn label(&self) -> &'static str {
        "remote"
    }

    fn field_map(&self) -> &'static FieldMap {
        &REMOTE_FIELDS
    }

    async fn fetch_cards(&mut self) -> Result<Vec<RawCard>> {
        let result = paginate(&mut self.fetcher, &self.options, &self.progress).await;
        self.progress.finish_and_clear();
        let cards = result?;
        info!("Fetched {} cards", cards.len());
        Ok(cards)
    }

    fn sets(&self, cards: &[RawCard]) -> Vec<Set> {
        derive_sets(cards)
    }

    fn stamps_metadata(&self) -> bool {
        true
    }
}
