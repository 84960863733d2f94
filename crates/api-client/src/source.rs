// In crates/api-client/src/source.rs

use crate::error::Result;
use crate::types::{ApiClient, BarRequest};
use async_trait::async_trait;
use chrono::Utc;
use core_types::{normalize_bars, Kline};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// Anything that can hand over an ordered price history.
///
/// Implementations return bars sorted by ascending `open_time` with no
/// duplicate timestamps.
#[async_trait]
pub trait BarSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_bars(&self, request: &BarRequest) -> Result<Vec<Kline>>;
}

/// Bars collected by [`page_forward`] and the number of requests it took.
#[derive(Debug)]
pub struct Paged {
    pub bars: Vec<Kline>,
    pub pages: usize,
}

/// Walks `[start, end]` one page at a time.
///
/// `fetch_page` receives the cursor (the first open time still wanted) and
/// returns up to `page_limit` bars from there. The next cursor is one past the
/// newest bar received. Paging stops at an empty or short page, when a page
/// makes no progress, or once the cursor passes `end`. The collected bars are
/// sorted and de-duplicated.
pub async fn page_forward<F, Fut>(
    start: i64,
    end: i64,
    page_limit: u16,
    pause: Duration,
    mut fetch_page: F,
) -> Result<Paged>
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = Result<Vec<Kline>>>,
{
    let mut cursor = start;
    let mut bars: Vec<Kline> = Vec::new();
    let mut pages = 0usize;

    while cursor <= end {
        if pages > 0 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        let page = fetch_page(cursor).await?;
        pages += 1;

        let Some(newest) = page.last().map(|k| k.open_time) else {
            break;
        };
        let short_page = page.len() < page_limit as usize;
        debug!(page = pages, bars = page.len(), newest, "Fetched kline page");
        bars.extend(page);

        if short_page || newest < cursor {
            break;
        }
        cursor = newest + 1;
    }

    Ok(Paged {
        bars: normalize_bars(bars),
        pages,
    })
}

#[async_trait]
impl BarSource for ApiClient {
    fn name(&self) -> &'static str {
        "binance"
    }

    /// Pages forward through `/fapi/v1/klines` until the requested range is
    /// covered.
    async fn fetch_bars(&self, request: &BarRequest) -> Result<Vec<Kline>> {
        let (start, end) = request.range_millis(Utc::now())?;
        let client = self;
        let symbol = &request.symbol;
        let interval = request.interval.as_str();
        let limit = self.page_limit;

        let paged = page_forward(start, end, limit, self.request_pause, move |cursor| {
            client.get_historical_klines(symbol, interval, Some(cursor), Some(end), Some(limit))
        })
        .await?;

        info!(
            symbol = %request.symbol,
            interval = %request.interval,
            pages = paged.pages,
            bars = paged.bars.len(),
            "Downloaded price history"
        );
        Ok(paged.bars)
    }
}
