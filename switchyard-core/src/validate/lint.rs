use crate::pool::Pool;
use crate::render::{RenderedConfig, is_bare_word};

/// Problems with the pool entries of a rendered configuration.
///
/// nginx would accept some of these (a host containing `;` splits the
/// directive), so they are caught before the proxy ever sees the file.
pub fn lint(rendered: &RenderedConfig) -> Vec<String> {
    let mut problems = Vec::new();
    for pool in [&rendered.primary, &rendered.backup] {
        lint_pool(pool, &mut problems);
    }
    problems
}

fn lint_pool(pool: &Pool, problems: &mut Vec<String>) {
    if !is_bare_word(&pool.host) {
        problems.push(format!(
            "pool '{}': upstream host {:?} is not a single token",
            pool.label, pool.host
        ));
    }
    if pool.port == 0 {
        problems.push(format!("pool '{}': upstream port must be non-zero", pool.label));
    }
}
