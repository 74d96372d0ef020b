//! Message template catalog
//!
//! The catalog holds everything the extractor needs: bank tokens, the
//! debit/credit verb sets, the reference time zone, and the ordered list of
//! message templates. It is validated once when loaded and never mutated.
//!
//! ## Configuration Resolution
//!
//! 1. An explicit path (`--catalog`), if given
//! 2. An override in the data dir (~/.local/share/txsms/catalog.toml)
//! 3. The embedded default (compiled into the binary)

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bank::BankIdentifier;
use crate::error::{Error, Result};
use crate::extract::{self, FieldMap, Template};
use crate::normalize::{parse_utc_offset, KindClassifier};

/// Embedded default catalog (compiled into binary)
pub const DEFAULT_CATALOG: &str = include_str!("../../../config/catalog.toml");

/// Catalog file layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Reference zone for message timestamps, e.g. "+05:30"
    pub utc_offset: String,
    /// Bank tokens in precedence order
    pub banks: Vec<String>,
    pub verbs: VerbSets,
    /// Templates in precedence order
    pub templates: Vec<TemplateDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerbSets {
    pub debit: Vec<String>,
    pub credit: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDef {
    pub name: String,
    pub bank: String,
    pub pattern: String,
    /// Messages this template is expected to win
    #[serde(default)]
    pub samples: Vec<String>,
}

/// Where a catalog was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Embedded,
    File(PathBuf),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded default"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A template sample that the catalog does not route to its own template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceViolation {
    pub template: String,
    pub sample: String,
    pub problem: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// No bank token in the sample
    NoBank,
    /// An earlier template matched first
    ShadowedBy(String),
    /// No template matched at all
    NoMatch,
}

impl fmt::Display for PrecedenceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            ViolationKind::NoBank => {
                write!(f, "{}: sample has no bank token: {}", self.template, self.sample)
            }
            ViolationKind::ShadowedBy(other) => write!(
                f,
                "{}: sample is won by {}: {}",
                self.template, other, self.sample
            ),
            ViolationKind::NoMatch => write!(
                f,
                "{}: sample matches no template: {}",
                self.template, self.sample
            ),
        }
    }
}

/// Validated, compiled catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    zone: FixedOffset,
    banks: BankIdentifier,
    kinds: KindClassifier,
    templates: Vec<Template>,
    source: CatalogSource,
}

impl Catalog {
    /// The catalog compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_CATALOG)
    }

    /// Parse and validate catalog TOML
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::from_config(file)
    }

    /// Read a catalog file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::InvalidData(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        let mut catalog = Self::from_toml(&content)?;
        catalog.source = CatalogSource::File(path.to_path_buf());
        Ok(catalog)
    }

    /// Load with override resolution (explicit path, data dir, embedded)
    ///
    /// An explicit path must exist; a missing data-dir override is skipped.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let catalog = if let Some(path) = override_path {
            Self::from_path(path)?
        } else {
            match default_catalog_path() {
                Some(path) if path.exists() => Self::from_path(&path)?,
                _ => Self::embedded()?,
            }
        };

        info!(
            source = %catalog.source,
            templates = catalog.templates.len(),
            banks = catalog.banks.tokens().len(),
            "Loaded message catalog"
        );
        Ok(catalog)
    }

    /// Validate a parsed catalog file and compile its templates
    pub fn from_config(file: CatalogFile) -> Result<Self> {
        let zone = parse_utc_offset(&file.utc_offset).ok_or_else(|| {
            Error::Catalog(format!(
                "utc_offset must look like +05:30, got {:?}",
                file.utc_offset
            ))
        })?;

        let banks = BankIdentifier::new(&file.banks)?;
        let kinds = KindClassifier::new(&file.verbs.debit, &file.verbs.credit)?;

        if file.templates.is_empty() {
            return Err(Error::Catalog("no templates configured".into()));
        }

        let mut names = HashSet::new();
        let mut templates = Vec::with_capacity(file.templates.len());
        for def in file.templates {
            if !names.insert(def.name.clone()) {
                return Err(Error::Catalog(format!(
                    "duplicate template name {:?}",
                    def.name
                )));
            }
            let template = Template::compile(&def.name, &def.bank, &def.pattern, def.samples)?;
            debug!(
                template = %template.name(),
                fields = template.fields().len(),
                "Compiled template"
            );
            templates.push(template);
        }

        Ok(Self {
            zone,
            banks,
            kinds,
            templates,
            source: CatalogSource::Embedded,
        })
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    pub fn banks(&self) -> &BankIdentifier {
        &self.banks
    }

    pub fn kinds(&self) -> &KindClassifier {
        &self.kinds
    }

    /// Templates in precedence order
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// First-match-wins extraction over the whole catalog
    pub fn extract(&self, text: &str) -> Option<FieldMap> {
        extract::extract(&self.templates, text)
    }

    /// Check that every template sample is won by its own template
    ///
    /// Returns the violations; an empty list means the ordering is consistent
    /// with the samples.
    pub fn verify(&self) -> Vec<PrecedenceViolation> {
        let mut violations = Vec::new();

        for template in &self.templates {
            for sample in template.samples() {
                let problem = if self.banks.identify(sample).is_none() {
                    Some(ViolationKind::NoBank)
                } else {
                    match self.extract(sample) {
                        Some(fields) if fields.template() == template.name() => None,
                        Some(fields) => {
                            Some(ViolationKind::ShadowedBy(fields.template().to_string()))
                        }
                        None => Some(ViolationKind::NoMatch),
                    }
                };

                if let Some(problem) = problem {
                    violations.push(PrecedenceViolation {
                        template: template.name().to_string(),
                        sample: sample.clone(),
                        problem,
                    });
                }
            }
        }

        violations
    }
}

/// Default override location for the catalog
pub fn default_catalog_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("txsms").join("catalog.toml"))
}
