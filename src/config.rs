//! Configuration for a mirror run.
//!
//! All behaviour is controlled through [`MirrorConfig`], built via its
//! [`MirrorConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to pass the whole run description across the trait seams and to log the
//! settings a run actually used.
//!
//! # Design choice: builder over constructor
//! The two folder IDs are the only required inputs, so the builder takes them
//! up front and lets callers override the rest only when they care. Defaults
//! are documented on each field.

use crate::error::MirrorError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Configuration for one mirror traversal.
///
/// Built via [`MirrorConfig::builder()`].
///
/// # Example
/// ```rust
/// use gdoc2pdf::MirrorConfig;
///
/// let config = MirrorConfig::builder("src-folder-id", "dst-folder-id")
///     .api_timeout_secs(30)
///     .page_size(200)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct MirrorConfig {
    /// Drive file ID of the source folder (the tree to be walked).
    pub source_folder_id: String,

    /// Drive file ID of the destination folder (the tree to be populated).
    pub dest_folder_id: String,

    /// Per-request timeout in seconds. Default: 60.
    ///
    /// Covers every blocking round trip individually — enumeration, existence
    /// check, export, folder create, upload. Exports of large presentations
    /// are the slowest calls; raise this before raising anything else if you
    /// see timeouts.
    pub api_timeout_secs: u64,

    /// `files.list` page size. Range: 1–1000. Default: 100.
    ///
    /// Larger pages mean fewer round trips for big folders at the cost of
    /// larger responses. 100 matches the Drive API default.
    pub page_size: u32,

    /// Progress callback receiving per-document exported / skipped / failed
    /// events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for MirrorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirrorConfig")
            .field("source_folder_id", &self.source_folder_id)
            .field("dest_folder_id", &self.dest_folder_id)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("page_size", &self.page_size)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl MirrorConfig {
    /// Create a builder for a run from `source_folder_id` into
    /// `dest_folder_id`.
    pub fn builder(
        source_folder_id: impl Into<String>,
        dest_folder_id: impl Into<String>,
    ) -> MirrorConfigBuilder {
        MirrorConfigBuilder {
            config: MirrorConfig {
                source_folder_id: source_folder_id.into(),
                dest_folder_id: dest_folder_id.into(),
                api_timeout_secs: 60,
                page_size: 100,
                progress_callback: None,
            },
        }
    }
}

/// Builder for [`MirrorConfig`].
pub struct MirrorConfigBuilder {
    config: MirrorConfig,
}

impl MirrorConfigBuilder {
    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn page_size(mut self, n: u32) -> Self {
        self.config.page_size = n.clamp(1, 1000);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<MirrorConfig, MirrorError> {
        let c = &self.config;
        if c.source_folder_id.trim().is_empty() {
            return Err(MirrorError::InvalidConfig(
                "source folder ID must not be empty".into(),
            ));
        }
        if c.dest_folder_id.trim().is_empty() {
            return Err(MirrorError::InvalidConfig(
                "destination folder ID must not be empty".into(),
            ));
        }
        if c.source_folder_id == c.dest_folder_id {
            // Mirroring a tree into itself would export into the folders
            // being walked.
            return Err(MirrorError::InvalidConfig(
                "source and destination folder IDs must differ".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let c = MirrorConfig::builder("a", "b").build().unwrap();
        assert_eq!(c.api_timeout_secs, 60);
        assert_eq!(c.page_size, 100);
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn page_size_is_clamped() {
        let c = MirrorConfig::builder("a", "b")
            .page_size(5000)
            .build()
            .unwrap();
        assert_eq!(c.page_size, 1000);

        let c = MirrorConfig::builder("a", "b").page_size(0).build().unwrap();
        assert_eq!(c.page_size, 1);
    }

    #[test]
    fn empty_source_id_rejected() {
        let err = MirrorConfig::builder("  ", "b").build().unwrap_err();
        assert!(matches!(err, MirrorError::InvalidConfig(_)));
    }

    #[test]
    fn identical_ids_rejected() {
        let err = MirrorConfig::builder("same", "same").build().unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn debug_elides_callback() {
        use crate::progress::NoopProgressCallback;
        use std::sync::Arc;

        let c = MirrorConfig::builder("a", "b")
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{:?}", c);
        assert!(dbg.contains("<dyn callback>"));
    }
}
