//! End-to-end identification of a dropped file.
//!
//! The orchestrator composes matching, quality fusion, the decision chain,
//! and the naming engine. One logical worker per call; every suspension
//! point is a collaborator call, and the whole pipeline is safe to abandon
//! at any await.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use sceneline_model::{
    Decision, ImportSubject, LibraryEntity, ParsedRelease, QualitySignal,
};

use crate::decision::{self, DecisionCriteria, Rule};
use crate::error::{IdentifyError, Result};
use crate::matcher;
use crate::naming::{self, NamingContext};
use crate::providers::{
    EntityStore, FileTransfer, MetadataSearch, NamingConfigSource,
    RootFolderSource, TransferMode,
};
use crate::quality;

/// Result of identifying one file.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifyOutcome {
    /// The file was matched, accepted, and relocated.
    Identified {
        entity: LibraryEntity,
        path: PathBuf,
    },
    /// No single candidate survived matching. No action was taken.
    Unmatched { ambiguous: bool },
    /// A decision rule rejected the file. The source stays in place.
    Rejected { decision: Decision },
    /// The destination was occupied or the transfer failed; the source is
    /// untouched and a duplicate is suspected.
    PossibleDuplicate {
        source: PathBuf,
        destination: PathBuf,
    },
}

/// Media-inspection results supplied by the caller, when a probe ran.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaProbe {
    pub width: i32,
    pub height: i32,
    pub runtime_secs: Option<f64>,
}

/// Composes the pipeline stages over collaborator capabilities.
pub struct Identifier {
    search: Arc<dyn MetadataSearch>,
    roots: Arc<dyn RootFolderSource>,
    transfer: Arc<dyn FileTransfer>,
    naming: Arc<dyn NamingConfigSource>,
    store: Arc<dyn EntityStore>,
    criteria: DecisionCriteria,
    rules: Vec<Box<dyn Rule>>,
}

impl std::fmt::Debug for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identifier")
            .field("criteria", &self.criteria)
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl Identifier {
    pub fn new(
        search: Arc<dyn MetadataSearch>,
        roots: Arc<dyn RootFolderSource>,
        transfer: Arc<dyn FileTransfer>,
        naming: Arc<dyn NamingConfigSource>,
        store: Arc<dyn EntityStore>,
    ) -> Self {
        Self {
            search,
            roots,
            transfer,
            naming,
            store,
            criteria: DecisionCriteria::default(),
            rules: decision::default_rules(),
        }
    }

    pub fn with_criteria(mut self, criteria: DecisionCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_rules(mut self, rules: Vec<Box<dyn Rule>>) -> Self {
        self.rules = rules;
        self
    }

    /// Identify a dropped file from its path and parsed release.
    pub async fn identify(
        &self,
        path: &Path,
        parsed: &ParsedRelease,
    ) -> Result<IdentifyOutcome> {
        self.identify_with_probe(path, parsed, None).await
    }

    /// Identify with media-inspection results from a caller-side probe.
    pub async fn identify_with_probe(
        &self,
        path: &Path,
        parsed: &ParsedRelease,
        probe: Option<MediaProbe>,
    ) -> Result<IdentifyOutcome> {
        let root = self
            .roots
            .root_for(path)
            .await?
            .ok_or_else(|| IdentifyError::NoRootFolder(path.to_path_buf()))?;

        let match_result =
            matcher::match_release(parsed, path, self.search.as_ref()).await?;
        let Some(candidate) = match_result.candidate else {
            debug!(
                path = %path.display(),
                ambiguous = match_result.ambiguous,
                "no actionable match"
            );
            return Ok(IdentifyOutcome::Unmatched {
                ambiguous: match_result.ambiguous,
            });
        };

        let mut signals = vec![QualitySignal::from_name(
            parsed.source_token(),
            parsed.resolution_token(),
        )];
        if let Some(probe) = probe {
            signals.push(QualitySignal::from_media_info(
                probe.width,
                probe.height,
            ));
        }
        let fused = quality::fuse(&signals);

        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let runtime = probe.and_then(|p| p.runtime_secs);
        let subject = ImportSubject {
            path: path.to_path_buf(),
            size,
            runtime,
            release: parsed.clone(),
            candidate: Some(candidate.clone()),
            quality: fused,
        };

        let decision =
            decision::evaluate(&subject, &self.criteria, &self.rules);
        if !decision.accepted {
            return Ok(IdentifyOutcome::Rejected { decision });
        }

        let config = self.naming.naming_config().await?;
        config.validate()?;

        let ctx = NamingContext {
            entity: &candidate,
            quality: Some(&fused),
            config: &config,
        };
        let folder = naming::build_folder(&ctx)?;
        let mut file_name = naming::resolve(&config.file_template, &ctx)?;
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            file_name.push('.');
            file_name.push_str(&ext.to_ascii_lowercase());
        }

        let destination_dir = root.join(&folder);
        let destination = destination_dir.join(&file_name);

        if destination == path {
            debug!(path = %path.display(), "file already at destination");
        } else if destination.exists() {
            info!(
                source = %path.display(),
                destination = %destination.display(),
                "destination occupied, leaving source in place"
            );
            return Ok(IdentifyOutcome::PossibleDuplicate {
                source: path.to_path_buf(),
                destination,
            });
        }

        // Reuse the persisted entity rather than minting a duplicate.
        let mut entity = match self
            .store
            .find_by_foreign_id(candidate.foreign_id())
            .await?
        {
            Some(existing) => {
                debug!(
                    foreign_id = %existing.foreign_id,
                    "reusing existing entity"
                );
                existing
            }
            None => LibraryEntity::from_candidate(&candidate),
        };

        if destination != path {
            std::fs::create_dir_all(&destination_dir)?;
            if let Err(e) = self
                .transfer
                .transfer(path, &destination, TransferMode::Move)
                .await
            {
                warn!(
                    source = %path.display(),
                    destination = %destination.display(),
                    error = %e,
                    "transfer failed, treating as possible duplicate"
                );
                return Ok(IdentifyOutcome::PossibleDuplicate {
                    source: path.to_path_buf(),
                    destination,
                });
            }
        }

        entity.path = Some(destination.clone());
        info!(
            title = entity.title,
            destination = %destination.display(),
            "identified and relocated"
        );
        Ok(IdentifyOutcome::Identified {
            entity,
            path: destination,
        })
    }
}
