//! # File Management Module
//!
//! Questo modulo gestisce tutte le operazioni sui file e la discovery dei documenti.
//!
//! ## Responsabilità:
//! - Risoluzione dei target configurati (file o directory) in una lista ordinata di documenti
//! - Discovery ricorsiva di asset testuali in directory
//! - Scrittura atomica dei file (temp file + rename nella stessa directory)
//! - Formattazione human-readable delle dimensioni
//!
//! ## Formati documento riconosciuti nelle directory:
//! - **Markup**: HTML, HTM, SVG, XML
//! - **Stili e script**: CSS, JS
//! - **Testo**: Markdown
//!
//! I file indicati esplicitamente vengono sempre elaborati, qualunque sia l'estensione.
//! I target inesistenti restano in lista: il loader li segnalerà come errore di I/O
//! senza interrompere il batch.
//!
//! ## Sicurezza operazioni:
//! - Il contenuto viene scritto in un file temporaneo accanto alla destinazione
//! - Il rename finale sostituisce l'originale in un colpo solo
//! - In caso di errore il file temporaneo viene rimosso e l'originale resta intatto
//!
//! ## Esempio:
//! ```ignore
//! let documents = FileManager::resolve_targets(&config.targets);
//! for path in documents {
//!     // load, optimize, persist
//! }
//! ```

use anyhow::Result;
use std::fs::Permissions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Expands configured targets into the ordered list of documents to process.
    ///
    /// Directories are walked recursively with entries sorted by name, so the
    /// order is deterministic across runs.
    pub fn resolve_targets(targets: &[PathBuf]) -> Vec<PathBuf> {
        let mut documents = Vec::new();

        for target in targets {
            if target.is_dir() {
                documents.extend(Self::find_documents(target));
            } else {
                documents.push(target.clone());
            }
        }

        documents
    }

    /// Find all text assets in a directory
    pub fn find_documents(dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| Self::is_text_asset(path))
            .collect()
    }

    /// Check if a file is a text asset that may embed data URIs
    pub fn is_text_asset(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            matches!(
                ext_lower.as_str(),
                "html" | "htm" | "svg" | "xml" | "css" | "js" | "md"
            )
        } else {
            false
        }
    }

    /// Replaces `path` with `contents` through a temp file in the same directory.
    ///
    /// Either the whole new content lands at `path` or nothing changes.
    pub async fn write_atomically(path: &Path, contents: Vec<u8>) -> Result<()> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::write_atomically_blocking(&path, &contents)).await?
    }

    fn write_atomically_blocking(path: &Path, contents: &[u8]) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        // The temp file is created owner-only; keep the mode of the file it replaces
        let permissions = match std::fs::metadata(path) {
            Ok(metadata) => Some(metadata.permissions()),
            Err(_) => Self::new_file_permissions(),
        };

        let mut temp = NamedTempFile::new_in(&dir)?;
        temp.write_all(contents)?;
        if let Some(permissions) = permissions {
            temp.as_file().set_permissions(permissions)?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    #[cfg(unix)]
    fn new_file_permissions() -> Option<Permissions> {
        use std::os::unix::fs::PermissionsExt;
        Some(Permissions::from_mode(0o644))
    }

    #[cfg(not(unix))]
    fn new_file_permissions() -> Option<Permissions> {
        None
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}
