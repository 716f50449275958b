//! Load-and-merge pipeline.
//!
//! A [`ChartSession`] owns everything that is shared between the views of a
//! page: the fetch cache and the reference indices built from it. Each load
//! requests the chart file and every reference dataset concurrently and
//! only merges once all of them have settled.

use crate::error::LoadError;
use crate::fetch::{lock, FetchCache, JsonSource};
use crate::highlights::{self, HighlightCard, HIGHLIGHT_LIMIT};
use crate::index::{records, ReferenceData, ReferenceIndex};
use crate::merge::{merge_chart, ChartKind, DEFAULT_COVER};
use crate::model::{ChartEntry, MergedRecord};
use crate::platform::{Header, Platform, ReferenceUrls};
use crate::rotation::{Category, Widget};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Everything needed to turn one chart file into display rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPlan {
    /// Chart code used in error messages.
    pub code: String,
    pub entries_url: String,
    /// `None` for files that arrive already enriched.
    pub references: Option<ReferenceUrls>,
    pub kind: ChartKind,
    pub limit: usize,
}

impl LoadPlan {
    pub fn for_chart(platform: Platform, code: &str, limit: Option<usize>) -> Self {
        let config = platform.config();
        Self {
            code: code.to_string(),
            entries_url: config.entries_url(code),
            references: Some(config.references),
            kind: platform.kind(),
            limit: limit.unwrap_or_else(|| config.limit_for(code)),
        }
    }

    pub fn for_widget(widget: &Widget, category: &Category) -> Self {
        Self {
            code: category.chart.to_string(),
            entries_url: widget.entries_url(category),
            references: None,
            kind: widget.kind,
            limit: widget.limit,
        }
    }
}

/// A merged chart ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedChart {
    pub platform: Platform,
    pub code: &'static str,
    pub header: Header,
    pub records: Vec<MergedRecord>,
}

pub struct ChartSession<S> {
    cache: FetchCache<S>,
    indices: Mutex<HashMap<(ReferenceUrls, ChartKind), Arc<ReferenceIndex>>>,
    default_cover: String,
}

impl<S: JsonSource> ChartSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            cache: FetchCache::new(source),
            indices: Mutex::new(HashMap::new()),
            default_cover: DEFAULT_COVER.to_string(),
        }
    }

    #[must_use]
    pub fn with_default_cover(mut self, cover: impl Into<String>) -> Self {
        self.default_cover = cover.into();
        self
    }

    pub fn default_cover(&self) -> &str {
        &self.default_cover
    }

    pub fn cache(&self) -> &FetchCache<S> {
        &self.cache
    }

    /// Loads a platform chart. Unknown or missing codes load the platform's
    /// default chart.
    pub async fn load_chart(
        &self,
        platform: Platform,
        code: Option<&str>,
        limit: Option<usize>,
    ) -> Result<LoadedChart, LoadError> {
        let chart = platform.config().resolve_chart(code);
        let plan = LoadPlan::for_chart(platform, chart.code, limit);
        let records = self.load(&plan).await?;

        Ok(LoadedChart {
            platform,
            code: chart.code,
            header: platform.header(chart.code),
            records,
        })
    }

    pub async fn load_widget(
        &self,
        widget: &Widget,
        category: &Category,
    ) -> Result<Vec<MergedRecord>, LoadError> {
        self.load(&LoadPlan::for_widget(widget, category)).await
    }

    /// Top rows of every chart in the platform's highlight group. Charts
    /// that fail to load are left out.
    pub async fn load_highlights(&self, platform: Platform) -> Vec<HighlightCard> {
        let Some(group) = highlights::group(platform) else {
            return Vec::new();
        };

        let loads = group.codes.iter().map(|code| async move {
            let plan = LoadPlan::for_chart(platform, code, Some(HIGHLIGHT_LIMIT));
            (*code, self.load(&plan).await)
        });

        futures::future::join_all(loads)
            .await
            .into_iter()
            .filter_map(|(code, result)| match result {
                Ok(records) => HighlightCard::new(platform, code, records),
                Err(error) => {
                    tracing::warn!(%error, code, "skipping highlight card");
                    None
                }
            })
            .collect()
    }

    pub async fn load(&self, plan: &LoadPlan) -> Result<Vec<MergedRecord>, LoadError> {
        tracing::debug!(url = %plan.entries_url, "loading chart");

        let (entries, index) = futures::join!(
            self.cache.get(&plan.entries_url),
            self.reference_index(plan.references, plan.kind)
        );

        let entries = entries.map_err(|source| {
            tracing::error!(error = %source, code = %plan.code, "error loading chart data");
            LoadError::Entries {
                code: plan.code.clone(),
                source,
            }
        })?;

        let entries = records::<ChartEntry>(&entries);
        Ok(merge_chart(
            &entries,
            &index,
            plan.kind,
            plan.limit,
            &self.default_cover,
        ))
    }

    /// Builds the lookup tables for a chart kind. An index is kept for the
    /// rest of the session only when every dataset behind it was fetched;
    /// one built over an empty stand-in is rebuilt on the next load.
    pub async fn reference_index(
        &self,
        references: Option<ReferenceUrls>,
        kind: ChartKind,
    ) -> Arc<ReferenceIndex> {
        let Some(references) = references else {
            return Arc::new(ReferenceIndex::default());
        };

        let cached = lock(&self.indices).get(&(references, kind)).cloned();
        if let Some(index) = cached {
            return index;
        }

        let (index, degraded) = match kind {
            ChartKind::Songs => {
                let (songs, assets, links, artists) = futures::join!(
                    self.cache.get_with_fallback(references.songs),
                    self.cache.get_with_fallback(references.assets),
                    self.cache.get_with_fallback(references.links),
                    self.cache.get_with_fallback(references.artists),
                );
                let index = ReferenceIndex::build(ReferenceData {
                    songs: &songs.value,
                    assets: &assets.value,
                    links: &links.value,
                    artists: &artists.value,
                });
                let degraded = [&songs, &assets, &links, &artists]
                    .iter()
                    .any(|dataset| dataset.degraded);
                (index, degraded)
            }
            ChartKind::Artists => {
                let artists = self.cache.get_with_fallback(references.artists).await;
                (ReferenceIndex::artists_only(&artists.value), artists.degraded)
            }
        };

        let index = Arc::new(index);
        if degraded {
            tracing::debug!("reference index built from partial data; not memoized");
        } else {
            lock(&self.indices).insert((references, kind), Arc::clone(&index));
        }
        index
    }
}

/// Issues tickets for pipeline runs of one view. Only the most recently
/// issued ticket is current; results carrying an older ticket are stale and
/// must be dropped.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl Generation {
    pub fn begin(&self) -> LoadTicket {
        LoadTicket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}
