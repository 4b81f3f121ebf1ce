//! Backward-paginating candle fetcher.

use std::future::Future;

use anyhow::{Context, Result};
use candleboard_core::{Candle, Period};
use chrono::{NaiveDateTime, Utc};
use upbit_api::{CandleInterval, CandleTick, MarketApi, MAX_CANDLE_COUNT};

/// Number of candles requested per page, the Upbit maximum.
pub const PAGE_SIZE: usize = MAX_CANDLE_COUNT as usize;

/// Retries before a short page is accepted as end of available history.
const SHORT_PAGE_RETRIES: u32 = 3;

/// Format of the `to` request cursor.
const CURSOR_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Fetches candle history by paging backwards from "now".
pub struct CandleFetcher {
    api: MarketApi,
    page_delay_ms: u64,
    retry_delay_ms: u64,
}

impl CandleFetcher {
    /// Create a new fetcher.
    ///
    /// `page_delay_ms` is slept between pages on top of the client's rate
    /// limiter; `retry_delay_ms` is slept before retrying a short page.
    pub fn new(api: MarketApi, page_delay_ms: u64, retry_delay_ms: u64) -> Self {
        Self {
            api,
            page_delay_ms,
            retry_delay_ms,
        }
    }

    /// Convert a Period to the candle endpoint resolution.
    fn to_interval(period: Period) -> CandleInterval {
        match period {
            Period::Min1 => CandleInterval::Minutes1,
            Period::Min3 => CandleInterval::Minutes3,
            Period::Min5 => CandleInterval::Minutes5,
            Period::Min10 => CandleInterval::Minutes10,
            Period::Min15 => CandleInterval::Minutes15,
            Period::Min30 => CandleInterval::Minutes30,
            Period::Hour1 => CandleInterval::Minutes60,
            Period::Hour4 => CandleInterval::Minutes240,
            Period::Day1 => CandleInterval::Days,
            Period::Week1 => CandleInterval::Weeks,
        }
    }

    pub(crate) fn candle_from_tick(tick: &CandleTick) -> Candle {
        Candle::new(
            tick.candle_date_time_utc,
            tick.opening_price,
            tick.high_price,
            tick.low_price,
            tick.trade_price,
            tick.candle_acc_trade_volume,
            tick.timestamp,
        )
    }

    /// Current UTC time, the starting cursor for a crawl.
    fn now_utc() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    /// Fetch all candles strictly newer than `since`, oldest first.
    ///
    /// Pages backwards from now, moving the `to` cursor by one page worth
    /// of candle durations each round, until a page is empty or reaches
    /// the bound. With `since = None` the whole available history is
    /// fetched.
    pub async fn fetch_since(
        &self,
        market: &str,
        period: Period,
        since: Option<NaiveDateTime>,
    ) -> Result<Vec<Candle>> {
        let interval = Self::to_interval(period);

        log::debug!("fetch_since({market}, {period}): since={since:?}");

        self.fetch_since_with(period, since, |cursor| {
            let to = cursor.format(CURSOR_FMT).to_string();
            async move {
                let ticks = self
                    .api
                    .candles(interval, market, PAGE_SIZE as u32, Some(&to))
                    .await
                    .with_context(|| format!("Failed to fetch {period} candles for {market}"))?;

                Ok(ticks.iter().map(Self::candle_from_tick).collect())
            }
        })
        .await
    }

    /// The paging loop behind [`CandleFetcher::fetch_since`], driven by a
    /// page source so the cursor arithmetic and retry handling can be
    /// exercised without the network.
    async fn fetch_since_with<F, Fut>(
        &self,
        period: Period,
        since: Option<NaiveDateTime>,
        mut get_page: F,
    ) -> Result<Vec<Candle>>
    where
        F: FnMut(NaiveDateTime) -> Fut,
        Fut: Future<Output = Result<Vec<Candle>>>,
    {
        let step = period.duration() * PAGE_SIZE as i32;

        let mut cursor = Self::now_utc();
        let mut backfill = Backfill::new(since);
        let mut short_retries = 0;

        loop {
            let page = get_page(cursor).await?;

            // Upbit sometimes truncates a page instead of answering 429;
            // retry before trusting it. A page that stays short after the
            // retries is taken at face value (sparse market) and paging
            // continues, still bounded by the empty-page and cutoff checks.
            if backfill.is_short_page(&page, PAGE_SIZE) && short_retries < SHORT_PAGE_RETRIES {
                short_retries += 1;
                log::debug!(
                    "short page ({}/{PAGE_SIZE}) for {period}, retry {short_retries}/{SHORT_PAGE_RETRIES}",
                    page.len()
                );
                tokio::time::sleep(std::time::Duration::from_millis(self.retry_delay_ms)).await;
                continue;
            }
            short_retries = 0;

            match backfill.push_page(page) {
                PageOutcome::Done => break,
                PageOutcome::Continue => {
                    cursor = cursor - step;
                }
            }

            if self.page_delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.page_delay_ms)).await;
            }
        }

        Ok(backfill.finish())
    }
}

/// Outcome of feeding one page to the accumulator.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PageOutcome {
    /// Keep paging backwards.
    Continue,
    /// The bound or the start of history was reached.
    Done,
}

/// Accumulates newest-first pages into an oldest-first, trimmed result.
pub(crate) struct Backfill {
    since: Option<NaiveDateTime>,
    candles: Vec<Candle>,
}

impl Backfill {
    pub(crate) fn new(since: Option<NaiveDateTime>) -> Self {
        Self {
            since,
            candles: Vec::new(),
        }
    }

    /// A page is "short" when it carries fewer candles than requested but
    /// did not reach the bound; that pattern means throttling, not the
    /// start of history.
    pub(crate) fn is_short_page(&self, page: &[Candle], expected: usize) -> bool {
        if page.is_empty() || page.len() >= expected {
            return false;
        }
        match self.since {
            // Pages come newest-first, so the last record is the oldest.
            Some(bound) => page.last().is_some_and(|oldest| oldest.time > bound),
            None => true,
        }
    }

    pub(crate) fn push_page(&mut self, page: Vec<Candle>) -> PageOutcome {
        if page.is_empty() {
            return PageOutcome::Done;
        }

        let oldest = page[page.len() - 1].time;
        self.candles.extend(page);

        match self.since {
            Some(bound) if oldest <= bound => PageOutcome::Done,
            _ => PageOutcome::Continue,
        }
    }

    /// Trim records at or before the bound and return oldest-first.
    ///
    /// The fixed cursor step means consecutive pages can overlap by many
    /// candles on markets with trade-free gaps, so a full sort-and-dedup
    /// is required rather than seam-only handling.
    pub(crate) fn finish(mut self) -> Vec<Candle> {
        if let Some(bound) = self.since {
            self.candles.retain(|c| c.time > bound);
        }

        self.candles.sort_by_key(|c| c.time);
        self.candles.dedup_by_key(|c| c.time);
        self.candles
    }
}
