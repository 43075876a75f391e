//! Base-repository selection.

use super::{RepoId, Remotes};
use crate::error::{GhError, Result};
use crate::iostreams::IoStreams;
use crate::ui::prompts;

const BASE_REPO_PROMPT: &str =
    "Which should be the base repository (used for e.g. querying issues) for this directory?";

/// What the service knows about a repository a remote points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRepo {
    /// Canonical identity (follows renames and transfers).
    pub repo: RepoId,
    /// The fork parent, if the repository is a fork.
    pub parent: Option<RepoId>,
    /// The viewer's permission, e.g. `ADMIN`, `WRITE`, `READ`.
    pub viewer_permission: Option<String>,
}

/// Looks repositories up on the service.
pub trait RepoNetwork {
    /// Resolve each of `repos`, in order. `None` marks a repository the
    /// service doesn't know (or the viewer can't see).
    fn resolve_network(&self, repos: &[RepoId]) -> Result<Vec<Option<NetworkRepo>>>;
}

/// The first remote's repository. Never touches the network.
///
/// ```
/// use ghx::repo::{fast_base_repo, Remote, Remotes, RepoId};
///
/// let remotes = Remotes::new(vec![
///     Remote {
///         name: "upstream".into(),
///         fetch_url: "https://github.com/cli/cli.git".into(),
///         repo: RepoId::new("github.com", "cli", "cli"),
///     },
///     Remote {
///         name: "origin".into(),
///         fetch_url: "https://github.com/monalisa/cli.git".into(),
///         repo: RepoId::new("github.com", "monalisa", "cli"),
///     },
/// ]);
/// assert_eq!(fast_base_repo(&remotes).unwrap().full_name(), "cli/cli");
/// ```
pub fn fast_base_repo(remotes: &Remotes) -> Result<RepoId> {
    remotes
        .first()
        .map(|r| r.repo.clone())
        .ok_or(GhError::NoRemotes)
}

/// Ask the service about every remote and pick a base repository.
///
/// Candidates are each remote's canonical repository followed by its fork
/// parent, without duplicates. A single candidate wins outright; with
/// several, the user picks when prompting is possible, otherwise the first
/// candidate is used.
pub fn smart_base_repo(
    remotes: &Remotes,
    network: &dyn RepoNetwork,
    io: &IoStreams,
) -> Result<RepoId> {
    choose_base_repo(remotes, network, io, |labels| {
        prompts::select(BASE_REPO_PROMPT, labels, 0)
    })
}

fn choose_base_repo<F>(
    remotes: &Remotes,
    network: &dyn RepoNetwork,
    io: &IoStreams,
    prompt: F,
) -> Result<RepoId>
where
    F: FnOnce(&[String]) -> Result<usize>,
{
    if remotes.is_empty() {
        return Err(GhError::NoRemotes);
    }

    let ids: Vec<RepoId> = remotes.iter().map(|r| r.repo.clone()).collect();
    let resolved = network.resolve_network(&ids)?;

    let mut candidates: Vec<RepoId> = Vec::new();
    for found in resolved.into_iter().flatten() {
        for repo in std::iter::once(found.repo).chain(found.parent) {
            if !candidates.contains(&repo) {
                candidates.push(repo);
            }
        }
    }

    let chosen = match candidates.len() {
        0 => {
            return Err(GhError::NotFound(
                "none of the git remotes point to a repository the API could find".to_string(),
            ))
        }
        1 => candidates.swap_remove(0),
        _ if io.can_prompt() => {
            let labels: Vec<String> = candidates.iter().map(|r| r.full_name()).collect();
            let index = prompt(&labels)?;
            candidates
                .get(index)
                .cloned()
                .ok_or_else(|| GhError::Usage("invalid selection".to_string()))?
        }
        _ => candidates.swap_remove(0),
    };

    tracing::debug!("Base repository: {}", chosen);
    Ok(chosen)
}
