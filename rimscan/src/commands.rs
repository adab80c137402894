// SPDX-License-Identifier: MIT

use anyhow::{Context, bail};
use colored::Colorize;
use rimstat::{
    DistKind, FsStats, RawStats, Root, Roots, ScanConfig, StatValue,
    export::export_dir,
    store::{self, Stored},
    walk_with,
};
use std::path::{Path, PathBuf};

use crate::utils::{LogLevel, WalkProgress, log_level, pretty_bytes, sep_u64};
use crate::{log_info, log_normal, log_verbose};

/// Issues listed before the rest is summarized.
const MAX_LISTED_ISSUES: usize = 10;

pub struct ScanArgs {
    pub roots: Vec<String>,
    pub config: Option<PathBuf>,
    pub output: PathBuf,
    pub cook: bool,
    pub exclude: Vec<String>,
    pub strict: bool,
}

/// Command line roots win over config roots, which win over the defaults.
fn resolve_roots(roots: &[String], config: &ScanConfig) -> anyhow::Result<Roots> {
    if roots.is_empty() {
        return Ok(config.roots());
    }
    let parsed = roots
        .iter()
        .map(|r| Root::parse(r))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Roots::Custom(parsed))
}

fn warn_degenerate(kinds: &[DistKind]) {
    if kinds.is_empty() {
        return;
    }
    let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
    eprintln!(
        "{} no data to normalize for: {}",
        "warning:".yellow().bold(),
        names.join(", ")
    );
}

pub fn scan(args: ScanArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScanConfig::default(),
    };
    for ext in &args.exclude {
        config = config.exclude(ext);
    }
    config.validate()?;

    let roots = resolve_roots(&args.roots, &config)?;
    if roots == Roots::Defaults {
        log_info!("No roots given, scanning the system defaults");
    }
    for root in roots.resolve() {
        log_verbose!("Root: {root}");
    }
    log_verbose!("Excluded extensions: {:?}", config.exclude_extensions);

    let mut progress = WalkProgress::new(log_level() == LogLevel::Normal);
    let report = walk_with(&roots, &config, &mut progress);
    progress.finish();

    let stats = &report.stats;
    log_info!(
        "Scanned {} directories: {} subdirs, {} files, {}",
        sep_u64(report.dirs_processed),
        sep_u64(stats.total_dirs()),
        sep_u64(stats.total_files()),
        pretty_bytes(stats.total_bytes())
    );
    log_verbose!(
        "{} files excluded, {} symlinks or special entries ignored",
        sep_u64(report.excluded_files),
        sep_u64(report.ignored_entries)
    );

    if !report.is_complete() {
        eprintln!(
            "{} {} part(s) of the tree could not be read and were skipped",
            "warning:".yellow().bold(),
            report.issues.len()
        );
        for issue in report.issues.iter().take(MAX_LISTED_ISSUES) {
            eprintln!("  {issue}");
        }
        if report.issues.len() > MAX_LISTED_ISSUES {
            eprintln!("  ... and {} more", report.issues.len() - MAX_LISTED_ISSUES);
        }
        if args.strict {
            bail!("{} directories or entries could not be read", report.issues.len());
        }
    }

    if args.cook {
        let cooked = rimstat::cook(report.stats);
        warn_degenerate(&cooked.degenerate);
        store::save(&cooked.stats, &args.output)?;
    } else {
        store::save(&report.stats, &args.output)?;
    }
    log_info!(
        "{} Statistics written to {}",
        "✓".green(),
        args.output.display()
    );
    Ok(())
}

pub fn cook(input: &Path, output: &Path) -> anyhow::Result<()> {
    let raw: RawStats = store::load(input)
        .with_context(|| format!("Expected raw statistics in {}", input.display()))?;
    let cooked = rimstat::cook(raw);
    warn_degenerate(&cooked.degenerate);
    store::save(&cooked.stats, output)?;
    log_info!(
        "{} Cooked statistics written to {}",
        "✓".green(),
        output.display()
    );
    Ok(())
}

pub fn export(input: &Path, dir: &Path) -> anyhow::Result<()> {
    let stored = store::load_any(input)?;
    let written = match &stored {
        Stored::Raw(stats) => export_dir(stats, dir)?,
        Stored::Cooked(stats) => export_dir(stats, dir)?,
    };
    for path in &written {
        log_verbose!("Wrote {}", path.display());
    }
    log_info!(
        "{} Exported {} {} distributions to {}",
        "✓".green(),
        written.len(),
        stored.kind(),
        dir.display()
    );
    Ok(())
}

fn print_stats<V: StatValue>(stats: &FsStats<V>, full: bool) {
    print!("{stats}");
    if !full {
        return;
    }
    for (kind, dist) in stats.distributions() {
        println!("\n  {} ({} -> value)", kind.name().bold(), kind.key_label());
        for (key, value) in dist.iter() {
            println!("  {key:>8}  {}", value.render());
        }
    }
}

pub fn show(input: &Path, full: bool) -> anyhow::Result<()> {
    let stored = store::load_any(input)?;
    log_normal!("{} ({} statistics)", input.display(), stored.kind());
    match &stored {
        Stored::Raw(stats) => print_stats(stats, full),
        Stored::Cooked(stats) => print_stats(stats, full),
    }
    Ok(())
}

/// Distributions whose total variation is meaningful: plain fractions that
/// sum to one.
fn is_fraction(kind: DistKind) -> bool {
    !matches!(kind, DistKind::SubdirCounts | DistKind::ByteDepths)
}

pub fn compare(reference: &Path, candidate: &Path, max_tv: Option<f64>) -> anyhow::Result<()> {
    let a = store::load_any(reference)?.into_cooked();
    let b = store::load_any(candidate)?.into_cooked();

    let deltas = rimstat::compare(&a, &b);
    log_normal!(
        "{} vs {}",
        reference.display(),
        candidate.display()
    );
    for delta in &deltas {
        println!("  {delta}");
    }

    if let Some(limit) = max_tv {
        let failing: Vec<&str> = deltas
            .iter()
            .filter(|d| is_fraction(d.kind) && d.total_variation > limit)
            .map(|d| d.kind.name())
            .collect();
        if !failing.is_empty() {
            bail!(
                "total variation above {limit} for: {}",
                failing.join(", ")
            );
        }
        log_info!("{} All distributions within {limit}", "✓".green());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_roots_win() {
        let config = ScanConfig::from_toml_str("[[roots]]\npath = \"/etc\"\n").unwrap();

        let roots = resolve_roots(&["/usr:1".to_string()], &config).unwrap();
        assert_eq!(roots, Roots::Custom(vec![Root::new("/usr", 1)]));

        let roots = resolve_roots(&[], &config).unwrap();
        assert_eq!(roots, Roots::Custom(vec![Root::new("/etc", 0)]));

        let roots = resolve_roots(&[], &ScanConfig::default()).unwrap();
        assert_eq!(roots, Roots::Defaults);
    }

    #[test]
    fn test_scan_cook_export_compare() {
        let tree = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tree.path().join("a/b")).unwrap();
        std::fs::write(tree.path().join("a/one.txt"), b"hello").unwrap();
        std::fs::write(tree.path().join("a/b/two.txt"), vec![0u8; 4096]).unwrap();

        let out = tempfile::tempdir().unwrap();
        let raw_path = out.path().join("raw.toml");
        let cooked_path = out.path().join("cooked.toml");

        scan(ScanArgs {
            roots: vec![tree.path().display().to_string()],
            config: None,
            output: raw_path.clone(),
            cook: false,
            exclude: Vec::new(),
            strict: true,
        })
        .expect("scan");
        cook(&raw_path, &cooked_path).expect("cook");
        export(&cooked_path, &out.path().join("csv")).expect("export");
        assert!(out.path().join("csv/file_sizes.csv").exists());

        // raw and cooked forms of the same tree do not differ
        compare(&raw_path, &cooked_path, Some(1e-9)).expect("compare");
        show(&raw_path, true).expect("show");

        // a cooked file is not a valid input for cook
        assert!(cook(&cooked_path, &out.path().join("again.toml")).is_err());
    }

    #[test]
    fn test_strict_scan_fails_on_missing_root() {
        let out = tempfile::tempdir().unwrap();
        let result = scan(ScanArgs {
            roots: vec![out.path().join("missing").display().to_string()],
            config: None,
            output: out.path().join("raw.toml"),
            cook: true,
            exclude: vec!["img".into()],
            strict: true,
        });
        assert!(result.is_err());
        assert!(!out.path().join("raw.toml").exists(), "nothing written on failure");
    }
}
