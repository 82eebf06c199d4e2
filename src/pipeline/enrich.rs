use crate::cache::{enriched_file_name, read_entry, write_entry, LocalCacheEntry};
use crate::crawler::{PageFetcher, SiteCrawler};
use crate::extract::{SchemaExtractor, StructuredCompletion};
use crate::output::{BatchReport, PlaceStatus};
use crate::pipeline::Confirm;
use crate::EnrichError;
use std::path::{Path, PathBuf};

/// Where an enrichment ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichOutcome {
    /// A new enriched file was written
    Written(PathBuf),
    /// The file already existed and the operator kept it
    Kept(PathBuf),
}

impl EnrichOutcome {
    pub fn path(&self) -> &Path {
        match self {
            EnrichOutcome::Written(path) | EnrichOutcome::Kept(path) => path,
        }
    }
}

/// Crawls a place's website and extracts an enriched record
pub struct Enricher<F: PageFetcher, C: StructuredCompletion> {
    crawler: SiteCrawler<F>,
    extractor: SchemaExtractor<C>,
    confirm: Box<dyn Confirm>,
    max_pages: usize,
    enriched_dir: PathBuf,
}

impl<F: PageFetcher, C: StructuredCompletion> Enricher<F, C> {
    pub fn new(
        fetcher: F,
        service: C,
        confirm: Box<dyn Confirm>,
        max_pages: usize,
        enriched_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            crawler: SiteCrawler::new(fetcher),
            extractor: SchemaExtractor::new(service),
            confirm,
            max_pages,
            enriched_dir: enriched_dir.into(),
        }
    }

    pub fn extractor(&self) -> &SchemaExtractor<C> {
        &self.extractor
    }

    /// Enriches the cached place at `path`
    ///
    /// # Steps
    ///
    /// 1. Read the cache entry and take its website
    /// 2. Crawl the site within the page budget
    /// 3. Extract a record from the collected text
    /// 4. Carry id and coordinates over from the source entry
    /// 5. Write `<stem>_ai_cleaned.json`, asking before overwriting
    pub async fn enrich(&self, path: &Path) -> crate::Result<EnrichOutcome> {
        let source = read_entry(path)?;

        let website = source
            .place
            .website
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .ok_or_else(|| EnrichError::MissingWebsite {
                path: path.display().to_string(),
            })?;

        tracing::info!(place = %source.place.name, website, "Enriching place");

        let content = self.crawler.crawl(website, self.max_pages).await;
        if !content.has_text() {
            return Err(EnrichError::NoContent {
                url: website.to_string(),
            });
        }

        let rendered = content.render();
        tracing::debug!(
            "Collected {} characters from {} pages",
            rendered.len(),
            content.len()
        );

        let mut place = self.extractor.extract(&rendered).await?;
        place.latitude = source.place.latitude;
        place.longitude = source.place.longitude;

        let output = self.enriched_dir.join(enriched_file_name(path));
        if output.exists() {
            let prompt = format!("File {} exists. Replace it?", output.display());
            if !self.confirm.confirm(&prompt) {
                tracing::info!("Kept existing {}", output.display());
                return Ok(EnrichOutcome::Kept(output));
            }
        }

        write_entry(
            &output,
            &LocalCacheEntry {
                id: source.id,
                place,
            },
        )?;
        tracing::info!("Wrote {}", output.display());

        Ok(EnrichOutcome::Written(output))
    }

    /// Enriches every file in turn; one place failing never stops the batch
    pub async fn enrich_all(&self, paths: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::new();

        for (index, path) in paths.iter().enumerate() {
            tracing::info!("Processing place {} of {}", index + 1, paths.len());
            let status = match self.enrich(path).await {
                Ok(EnrichOutcome::Written(output)) => PlaceStatus::Enriched { output },
                Ok(EnrichOutcome::Kept(output)) => PlaceStatus::Skipped {
                    reason: format!("kept existing {}", output.display()),
                },
                Err(e) => PlaceStatus::Failed {
                    reason: e.to_string(),
                },
            };
            report.record(path, status);
        }

        report.finish();
        report
    }
}
