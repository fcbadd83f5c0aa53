use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::export::filename::export_file_name;
use crate::export::pdf::{build_pdf, paginate};
use crate::export::raster::Rasterizer;
use crate::render::RenderedView;
use crate::templates::TemplateId;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    #[error("Document assembly failed: {0}")]
    Assemble(String),

    #[error("Export timed out after {0:?}")]
    TimedOut(Duration),

    #[error("An export is already in progress")]
    InProgress,

    #[error("Export task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: String,
    pub bytes: Bytes,
    pub page_count: usize,
    pub template: TemplateId,
}

// ────────────────────────────────────────────────────────────────────────────
// Re-entrancy gate
// ────────────────────────────────────────────────────────────────────────────

/// Allows one outstanding export per session.
#[derive(Debug, Clone, Default)]
pub struct ExportGate {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of one export. Releases the gate on drop.
#[derive(Debug)]
pub struct ExportPermit {
    busy: Arc<AtomicBool>,
}

impl ExportGate {
    pub fn try_acquire(&self) -> Result<ExportPermit, ExportError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::InProgress)?;
        Ok(ExportPermit {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for ExportPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Rasterizes rendered views into PDFs off the async runtime.
#[derive(Clone)]
pub struct ExportPipeline {
    rasterizer: Arc<Rasterizer>,
    page_width_px: u32,
    timeout: Duration,
}

impl ExportPipeline {
    pub fn new(rasterizer: Arc<Rasterizer>, page_width_px: u32, timeout: Duration) -> Self {
        Self {
            rasterizer,
            page_width_px,
            timeout,
        }
    }

    /// Exports `view` as a PDF named after `display_name` and the view's
    /// template. The view itself is never modified.
    ///
    /// CPU work runs on the blocking pool. If it overruns the timeout the
    /// caller gets `TimedOut`; the blocking job finishes in the background and
    /// its result is discarded.
    pub async fn export(
        &self,
        view: Arc<RenderedView>,
        display_name: &str,
    ) -> Result<ExportedFile, ExportError> {
        let started = Instant::now();
        let template = view.template;
        let file_name = export_file_name(display_name, template.display_name());
        let title = display_name.to_string();
        let rasterizer = Arc::clone(&self.rasterizer);
        let width = self.page_width_px;

        let job = tokio::task::spawn_blocking(move || -> Result<(Vec<u8>, usize), ExportError> {
            let pixmap = rasterizer.rasterize(&view.svg, width)?;
            let strips = paginate(&pixmap);
            let pdf = build_pdf(&strips, &title)?;
            Ok((pdf, strips.len()))
        });

        let (pdf, page_count) = match tokio::time::timeout(self.timeout, job).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_err)) => return Err(ExportError::Task(join_err.to_string())),
            Err(_) => {
                warn!("Export of '{file_name}' exceeded {:?}", self.timeout);
                return Err(ExportError::TimedOut(self.timeout));
            }
        };

        info!(
            "Exported '{file_name}' ({page_count} pages, {} bytes) in {}ms",
            pdf.len(),
            started.elapsed().as_millis()
        );

        Ok(ExportedFile {
            file_name,
            bytes: Bytes::from(pdf),
            page_count,
            template,
        })
    }
}
