use std::io::Read;

use anyhow::Context;
use opensearch_operator::manifest;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let strict_env = std::env::var("OPENSEARCH_VALIDATE_STRICT").ok();
    let strict = manifest::strict_flag(strict_env.as_deref());

    let paths: Vec<String> = std::env::args().skip(1).collect();
    let inputs = if paths.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading manifest from stdin")?;
        let clusters = manifest::from_yaml_stream(&buf).context("parsing stdin")?;
        vec![("-".to_string(), clusters)]
    } else {
        paths
            .into_iter()
            .map(|p| {
                let clusters = manifest::from_path(&p).with_context(|| format!("loading {p}"))?;
                Ok((p, clusters))
            })
            .collect::<anyhow::Result<Vec<_>>>()?
    };

    let mut failed = 0usize;
    for (source, clusters) in inputs {
        let checks = manifest::check(&clusters);
        for check in &checks {
            let name = &check.cluster;
            for w in &check.report.warnings {
                warn!(%source, cluster = %name, "{w}");
            }
            for e in &check.report.errors {
                error!(%source, cluster = %name, "{e}");
            }
            if check.passes(strict) {
                info!(%source, cluster = %name, "cluster spec is valid");
            }
        }
        failed += manifest::failures(&checks, strict);
    }

    if failed > 0 {
        anyhow::bail!("{failed} cluster spec(s) failed validation");
    }
    Ok(())
}
