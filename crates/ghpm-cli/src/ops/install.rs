//! Clone-and-build flow shared by `install` and `search`.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::Utc;
use ghpm_core::exec::SystemRunner;
use ghpm_core::git::Git;
use ghpm_core::{PipelineReport, Reporter, unlink_owned};
use ghpm_schema::{Ecosystem, GitHubRepo, ManifestRecord};

use super::context::Context;
use super::error::PackageError;

/// Copy a pipeline run into `record`.
///
/// Links from an earlier run are kept when this run did not reach linking,
/// so `remove` can still clean them up. When it did, earlier links it no
/// longer produced are unlinked and returned.
pub fn apply_report(
    record: &mut ManifestRecord,
    report: &PipelineReport,
    package_dir: &Path,
) -> Vec<PathBuf> {
    record.apply_outcome(report.ecosystem, &report.outcome);
    record.installed_at = Utc::now();
    let Some(links) = &report.links else {
        return Vec::new();
    };

    let current = links.links();
    let stale: Vec<PathBuf> = record
        .binaries
        .iter()
        .filter(|link| !current.contains(link))
        .cloned()
        .collect();
    let unlinked = unlink_owned(&stale, &record.link_sources, package_dir);
    record.binaries = current;
    record.link_sources = links.sources();
    unlinked
}

/// Clone `repo`, build it and record the result.
pub fn install_repo(ctx: &Context, repo: &GitHubRepo) -> Result<ManifestRecord> {
    ctx.layout
        .ensure()
        .context("Failed to create ghpm directories")?;

    let name = repo.name();
    let dest = ctx.layout.package_dir(name);
    if dest.exists() {
        return Err(PackageError::AlreadyInstalled {
            name: name.to_string(),
            path: dest,
        }
        .into());
    }

    let url = repo.clone_url(&ctx.git_base);
    ctx.output.section(&format!("Installing {repo}"));
    ctx.output
        .info(&format!("Cloning {url} to {}", dest.display()));

    let git_runner = SystemRunner::new();
    let git = Git::new(&git_runner);
    git.clone_repo(&url, &dest)?;

    let report = ctx.run_pipeline(name);

    let mut record = ManifestRecord::new(repo.clone(), url);
    record.commit = git.head_commit(&dest);
    apply_report(&mut record, &report, &dest);
    ctx.store()
        .save(&record)
        .with_context(|| format!("Failed to record {name}"))?;

    ctx.output.success(&format!("Installed {name}"));
    if !report.outcome.usable() && report.ecosystem != Ecosystem::Unknown {
        ctx.output.info(&format!(
            "Package cloned but not built. Check {} for manual build instructions.",
            dest.display()
        ));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghpm_core::{LinkRecord, LinkReport, Stage};
    use ghpm_schema::{BuildOutcome, reason};

    fn record() -> ManifestRecord {
        ManifestRecord::new(
            GitHubRepo::new("junegunn/fzf").unwrap(),
            "https://github.com/junegunn/fzf.git",
        )
    }

    fn linked(records: Vec<LinkRecord>) -> PipelineReport {
        PipelineReport {
            ecosystem: Ecosystem::Go,
            outcome: BuildOutcome::success("go install"),
            links: Some(LinkReport {
                records,
                failures: Vec::new(),
                on_path: true,
            }),
            stages: vec![Stage::Done],
        }
    }

    #[test]
    fn test_apply_report_records_links() {
        let mut rec = record();
        let report = linked(vec![LinkRecord {
            source: PathBuf::from("/go/bin/fzf"),
            link: PathBuf::from("/home/u/.local/bin/fzf"),
        }]);
        let unlinked = apply_report(&mut rec, &report, Path::new("/home/u/.ghpm/packages/fzf"));
        assert!(unlinked.is_empty());
        assert!(rec.built);
        assert_eq!(rec.build_cmd, "go install");
        assert_eq!(rec.binaries, vec![PathBuf::from("/home/u/.local/bin/fzf")]);
        assert_eq!(rec.link_sources, vec![PathBuf::from("/go/bin/fzf")]);
    }

    #[test]
    fn test_apply_report_keeps_links_when_unbuilt() {
        let mut rec = record();
        rec.binaries = vec![PathBuf::from("/home/u/.local/bin/fzf")];
        let report = PipelineReport {
            ecosystem: Ecosystem::Go,
            outcome: BuildOutcome::failure("go install", reason::missing_tool("go")),
            links: None,
            stages: vec![Stage::Done],
        };
        apply_report(&mut rec, &report, Path::new("/home/u/.ghpm/packages/fzf"));
        assert!(!rec.built);
        assert_eq!(rec.build_reason, "missing go");
        assert_eq!(rec.binaries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_apply_report_unlinks_binaries_no_longer_produced() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = tmp.path().join("packages/tool");
        let bin = tmp.path().join("bin");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::create_dir_all(&bin).unwrap();
        for exe in ["old-name", "new-name"] {
            std::fs::write(pkg.join(exe), "").unwrap();
        }
        let old_link = bin.join("old-name");
        let new_link = bin.join("new-name");
        std::os::unix::fs::symlink(pkg.join("old-name"), &old_link).unwrap();
        std::os::unix::fs::symlink(pkg.join("new-name"), &new_link).unwrap();

        let mut rec = record();
        rec.binaries = vec![old_link.clone()];
        rec.link_sources = vec![pkg.join("old-name")];
        let report = linked(vec![LinkRecord {
            source: pkg.join("new-name"),
            link: new_link.clone(),
        }]);

        let unlinked = apply_report(&mut rec, &report, &pkg);

        assert_eq!(unlinked, vec![old_link.clone()]);
        assert!(old_link.symlink_metadata().is_err());
        assert!(new_link.symlink_metadata().is_ok());
        assert_eq!(rec.binaries, vec![new_link]);
        assert_eq!(rec.link_sources, vec![pkg.join("new-name")]);
    }
}
