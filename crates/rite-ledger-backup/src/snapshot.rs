//! The snapshot pipeline: enumerate, hash, mirror, re-hash, verify, seal.
//!
//! Destination files are mapped back to their sources by canonicalizing
//! both roots and computing relative paths, never by substituting a
//! string prefix (which breaks under symlinks and mixed separators).
//! Destination files are marked read-only only after verification
//! succeeds, so an interrupted run leaves them writable for a safe retry.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{BackupError, Result};
use crate::manifest::{
    generate_run_seal, BackupManifest, BackupStatus, HashListing, IntegrityFault,
};

/// Mirror `source` into `dest` and verify the copy file-by-file.
///
/// The manifest, plus pre- and post-image hash listings, are written to
/// `log_dir` whether the run succeeds or fails. On any missing file or
/// hash mismatch the failed manifest is persisted first, then returned
/// inside [`BackupError::Integrity`].
pub fn snapshot(
    source: &Path,
    dest: &Path,
    log_dir: &Path,
    seal: Option<&str>,
) -> Result<BackupManifest> {
    if !source.is_dir() {
        return Err(BackupError::BadSource(source.to_path_buf()));
    }
    let source_root = canonical(source)?;

    fs::create_dir_all(dest).map_err(|e| BackupError::io(dest, e))?;
    let dest_root = canonical(dest)?;
    fs::create_dir_all(log_dir).map_err(|e| BackupError::io(log_dir, e))?;

    let run_seal = seal.map(str::to_string).unwrap_or_else(generate_run_seal);
    let run_timestamp = Utc::now().timestamp();
    info!(
        seal = %run_seal,
        source = %source_root.display(),
        dest = %dest_root.display(),
        "backup run starting"
    );

    // 1-2. Enumerate and hash the source tree.
    let pre = hash_tree(&source_root)?;
    HashListing::new("pre", source_root.clone(), pre.clone()).write_to(log_dir, &run_seal)?;

    // 3. Mirror. Unchanged files are left alone so re-runs are idempotent.
    // A source file that vanished since the pre-image is a verification
    // fault under its original relative path, not an I/O abort.
    let mirror_faults = mirror(&source_root, &dest_root, &pre)?;

    // 4. Re-hash every destination file, mapped back via the canonical root.
    let post = hash_tree(&dest_root)?;
    HashListing::new("post", dest_root.clone(), post.clone()).write_to(log_dir, &run_seal)?;

    // 5-6. Compare per mapped pair, keyed by the source-relative path.
    let faults = merge_faults(mirror_faults, compare(&pre, &post));

    let verified = faults.is_empty();
    let manifest = BackupManifest {
        run_timestamp,
        run_seal,
        source_path: source_root,
        destination_path: dest_root.clone(),
        file_count: pre.len(),
        status: if verified {
            BackupStatus::Success
        } else {
            BackupStatus::Failed
        },
        integrity_verified: verified,
        faults,
    };
    manifest.write_to(log_dir)?;

    if !verified {
        for fault in &manifest.faults {
            warn!(relative = fault.relative(), "backup integrity fault");
        }
        return Err(BackupError::Integrity(Box::new(manifest)));
    }

    // 7. Seal the verified mirror.
    for relative in pre.keys() {
        set_readonly(&dest_root.join(relative), true)?;
    }
    info!(files = manifest.file_count, "backup run verified and sealed");
    Ok(manifest)
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize().map_err(|e| BackupError::io(path, e))
}

/// Hash every regular file under `root`, keyed by its root-relative path
/// with components joined by `/` regardless of platform separator.
fn hash_tree(root: &Path) -> Result<BTreeMap<String, String>> {
    let mut entries = BTreeMap::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            BackupError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map(relative_key)
            .unwrap_or_else(|_| entry.path().display().to_string());
        entries.insert(relative, hash_file(entry.path())?);
    }
    debug!(root = %root.display(), files = entries.len(), "hashed tree");
    Ok(entries)
}

fn relative_key(relative: &Path) -> String {
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.join("/")
}

fn hash_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| BackupError::io(path, e))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// Copy each hashed source file to its destination-relative twin.
///
/// A destination file that already carries the expected hash is skipped;
/// a stale one has its read-only bit cleared before overwrite so retries
/// after an interrupted run cannot wedge. A source file renamed or
/// deleted since the pre-image is reported as a [`IntegrityFault::MissingFile`]
/// under its original relative path; the run continues and fails
/// verification instead of aborting.
fn mirror(
    source_root: &Path,
    dest_root: &Path,
    pre: &BTreeMap<String, String>,
) -> Result<Vec<IntegrityFault>> {
    let mut faults = Vec::new();
    for (relative, expected) in pre {
        let from = source_root.join(relative);
        let to = dest_root.join(relative);

        if to.is_file() {
            if hash_file(&to)? == *expected {
                debug!(relative, "unchanged, skipping copy");
                continue;
            }
            set_readonly(&to, false)?;
        }

        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| BackupError::io(parent, e))?;
        }
        match fs::copy(&from, &to) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !from.exists() => {
                warn!(relative, "source file vanished since pre-image");
                faults.push(IntegrityFault::MissingFile {
                    relative: relative.clone(),
                });
            }
            Err(e) => return Err(BackupError::io(&to, e)),
        }
    }
    Ok(faults)
}

/// Per-pair comparison, driven by the pre-image so a vanished or renamed
/// destination file is reported under its original relative path.
fn compare(
    pre: &BTreeMap<String, String>,
    post: &BTreeMap<String, String>,
) -> Vec<IntegrityFault> {
    let mut faults = Vec::new();
    for (relative, expected) in pre {
        match post.get(relative) {
            None => faults.push(IntegrityFault::MissingFile {
                relative: relative.clone(),
            }),
            Some(actual) if actual != expected => faults.push(IntegrityFault::HashMismatch {
                relative: relative.clone(),
                expected: expected.clone(),
                actual: actual.clone(),
            }),
            Some(_) => {}
        }
    }
    faults
}

/// Merge mirror-phase faults with comparison faults, keeping one fault
/// per relative path (a file missing at copy time is also missing from
/// the post-image; report it once).
fn merge_faults(
    mut faults: Vec<IntegrityFault>,
    compared: Vec<IntegrityFault>,
) -> Vec<IntegrityFault> {
    for fault in compared {
        if faults.iter().all(|f| f.relative() != fault.relative()) {
            faults.push(fault);
        }
    }
    faults
}

fn set_readonly(path: &Path, readonly: bool) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| BackupError::io(path, e))?;
    let mut permissions = metadata.permissions();
    permissions.set_readonly(readonly);
    fs::set_permissions(path, permissions).map_err(|e| BackupError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_tree(root: &Path) {
        fs::create_dir_all(root.join("dispatches/deep")).unwrap();
        fs::write(root.join("dispatches/a.json"), b"{\"a\":1}").unwrap();
        fs::write(root.join("dispatches/deep/b.json"), b"{\"b\":2}").unwrap();
        fs::write(root.join("c.json"), b"{\"c\":3}").unwrap();
    }

    #[test]
    fn test_snapshot_roundtrip_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        seed_tree(&source);
        let dest = tmp.path().join("dest");
        let logs = tmp.path().join("logs");

        let manifest = snapshot(&source, &dest, &logs, Some("AAAA1111")).unwrap();
        assert_eq!(manifest.status, BackupStatus::Success);
        assert!(manifest.integrity_verified);
        assert_eq!(manifest.file_count, 3);

        // Every destination file matches its source pre-image.
        let pre = hash_tree(&manifest.source_path).unwrap();
        let post = hash_tree(&manifest.destination_path).unwrap();
        assert_eq!(pre, post);

        // Verified files are sealed read-only.
        let sealed = manifest.destination_path.join("dispatches/deep/b.json");
        assert!(fs::metadata(sealed).unwrap().permissions().readonly());

        // Manifest and both listings are on disk.
        assert!(logs.join(manifest.file_name()).is_file());
        assert!(logs.join("hashes-AAAA1111-pre.json").is_file());
        assert!(logs.join("hashes-AAAA1111-post.json").is_file());
    }

    #[test]
    fn test_snapshot_rerun_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        seed_tree(&source);
        let dest = tmp.path().join("dest");
        let logs = tmp.path().join("logs");

        snapshot(&source, &dest, &logs, None).unwrap();
        // Second run over a sealed destination: unchanged files are not
        // mismatches, and the read-only bits do not wedge the run.
        let second = snapshot(&source, &dest, &logs, None).unwrap();
        assert!(second.integrity_verified);
    }

    #[test]
    fn test_changed_source_overwrites_sealed_dest() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        seed_tree(&source);
        let dest = tmp.path().join("dest");
        let logs = tmp.path().join("logs");

        snapshot(&source, &dest, &logs, None).unwrap();
        fs::write(source.join("c.json"), b"{\"c\":4}").unwrap();

        let manifest = snapshot(&source, &dest, &logs, None).unwrap();
        assert!(manifest.integrity_verified);
        assert_eq!(fs::read(dest.join("c.json")).unwrap(), b"{\"c\":4}");
    }

    #[test]
    fn test_source_renamed_mid_run_fails_with_original_relative_path() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.json"), b"{\"a\":1}").unwrap();
        fs::write(source.join("b.json"), b"{\"b\":2}").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir_all(&dest).unwrap();

        let source_root = source.canonicalize().unwrap();
        let dest_root = dest.canonicalize().unwrap();

        // Rename one file between the pre-image and the copy phase.
        let pre = hash_tree(&source_root).unwrap();
        fs::rename(source.join("b.json"), source.join("elsewhere.json")).unwrap();

        let mirror_faults = mirror(&source_root, &dest_root, &pre).unwrap();
        assert_eq!(
            mirror_faults,
            vec![IntegrityFault::MissingFile {
                relative: "b.json".into()
            }]
        );

        // The surviving file was still mirrored.
        assert_eq!(fs::read(dest_root.join("a.json")).unwrap(), b"{\"a\":1}");

        // Merged verification reports the vanished file exactly once,
        // under its original name.
        let post = hash_tree(&dest_root).unwrap();
        let faults = merge_faults(mirror_faults, compare(&pre, &post));
        assert_eq!(
            faults,
            vec![IntegrityFault::MissingFile {
                relative: "b.json".into()
            }]
        );
    }

    #[test]
    fn test_merge_faults_deduplicates_by_relative_path() {
        let missing = IntegrityFault::MissingFile {
            relative: "a.json".into(),
        };
        let mismatch = IntegrityFault::HashMismatch {
            relative: "b.json".into(),
            expected: "aa".into(),
            actual: "bb".into(),
        };

        let merged = merge_faults(vec![missing.clone()], vec![missing.clone(), mismatch.clone()]);
        assert_eq!(merged, vec![missing, mismatch]);
    }

    #[test]
    fn test_missing_destination_named_by_source_relative_path() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        seed_tree(&source);
        let pre = hash_tree(&source.canonicalize().unwrap()).unwrap();

        let mut post = pre.clone();
        post.remove("dispatches/deep/b.json");
        post.insert("dispatches/deep/renamed.json".into(), "ff".into());

        let faults = compare(&pre, &post);
        assert_eq!(
            faults,
            vec![IntegrityFault::MissingFile {
                relative: "dispatches/deep/b.json".into()
            }]
        );
    }

    #[test]
    fn test_mismatch_reports_both_hashes() {
        let mut pre = BTreeMap::new();
        pre.insert("a.json".to_string(), "aa".to_string());
        let mut post = BTreeMap::new();
        post.insert("a.json".to_string(), "bb".to_string());

        match &compare(&pre, &post)[..] {
            [IntegrityFault::HashMismatch {
                relative,
                expected,
                actual,
            }] => {
                assert_eq!(relative, "a.json");
                assert_eq!(expected, "aa");
                assert_eq!(actual, "bb");
            }
            other => panic!("unexpected faults: {other:?}"),
        }
    }

    #[test]
    fn test_bad_source_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let err = snapshot(
            &tmp.path().join("absent"),
            &tmp.path().join("dest"),
            &tmp.path().join("logs"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, BackupError::BadSource(_)));
    }

    #[test]
    fn test_failed_manifest_still_written() {
        // Drive the comparison to a fault by hand, then persist the failed
        // manifest the way the pipeline does.
        let tmp = tempfile::tempdir().unwrap();
        let manifest = BackupManifest {
            run_timestamp: 1_756_166_400,
            run_seal: "DEAD0000".into(),
            source_path: tmp.path().join("source"),
            destination_path: tmp.path().join("dest"),
            file_count: 1,
            status: BackupStatus::Failed,
            integrity_verified: false,
            faults: vec![IntegrityFault::MissingFile {
                relative: "a.json".into(),
            }],
        };
        let path = manifest.write_to(tmp.path()).unwrap();
        let back: BackupManifest =
            serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(back.status, BackupStatus::Failed);
        assert_eq!(back.faults.len(), 1);
    }
}
