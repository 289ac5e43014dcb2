//! Record search flow: query, results list, download link resolution.

use crate::api::{ApiClient, DownloadOutcome, SearchOutcome};
use crate::domain::ExamRecord;
use crate::transport::{Transport, TransportError};

#[derive(Debug, Default)]
pub struct SearchFlow {
    pub query: String,
    results: Vec<ExamRecord>,
    cursor: usize,
    busy: bool,
    searched: bool,
    download_busy: bool,
    download_url: Option<String>,
}

impl SearchFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[ExamRecord] {
        &self.results
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// True once at least one search has completed.
    pub fn has_searched(&self) -> bool {
        self.searched
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&ExamRecord> {
        self.results.get(self.cursor)
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.results.len() {
            self.cursor += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Last resolved download link.
    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    pub fn is_download_busy(&self) -> bool {
        self.download_busy
    }

    /// Start a search with the current query.
    ///
    /// A blank query never reaches the server: it settles at once as an
    /// empty, completed search.
    pub fn begin_search(&mut self) -> Option<String> {
        if self.busy {
            return None;
        }
        if self.query.trim().is_empty() {
            self.results.clear();
            self.cursor = 0;
            self.searched = true;
            return None;
        }
        self.busy = true;
        Some(self.query.clone())
    }

    /// Apply a search result.
    ///
    /// Every outcome that reached the server replaces the list (non-2xx and
    /// malformed bodies give an empty one). A transport failure is logged and
    /// leaves the previous list in place.
    pub fn finish_search(&mut self, result: Result<SearchOutcome, TransportError>) {
        self.busy = false;
        match result {
            Ok(outcome) => {
                self.results = outcome.into_records();
                self.cursor = 0;
                self.searched = true;
            }
            Err(e) => {
                tracing::error!(error = %e, "exam search request failed");
            }
        }
    }

    /// Start resolving the download link of the selected row.
    pub fn begin_download(&mut self) -> Option<u64> {
        if self.download_busy {
            return None;
        }
        let id = self.selected()?.id;
        self.download_busy = true;
        self.download_url = None;
        Some(id)
    }

    /// Returns the link to navigate to, if one was resolved.
    pub fn finish_download(
        &mut self,
        result: Result<DownloadOutcome, TransportError>,
    ) -> Option<String> {
        self.download_busy = false;
        match result {
            Ok(DownloadOutcome::Ready(url)) => {
                self.download_url = Some(url.clone());
                Some(url)
            }
            // Already logged by the client.
            Ok(DownloadOutcome::Rejected { .. }) | Ok(DownloadOutcome::Malformed(_)) => None,
            Err(e) => {
                tracing::error!(error = %e, "download link request failed");
                None
            }
        }
    }

    /// Search and apply in one call.
    pub fn search<T: Transport>(&mut self, client: &ApiClient<T>) {
        if let Some(query) = self.begin_search() {
            let result = client.search_exams(&query);
            self.finish_search(result);
        }
    }

    /// Resolve the selected row's link in one call.
    pub fn download_selected<T: Transport>(&mut self, client: &ApiClient<T>) -> Option<String> {
        let id = self.begin_download()?;
        let result = client.resolve_download(id);
        self.finish_download(result)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
