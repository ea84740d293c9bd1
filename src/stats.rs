use crate::types::Repository;
use std::cmp::Reverse;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoStat {
    pub name: String,
    pub stars: u64,
    pub forks: u64,
}

impl From<&Repository> for RepoStat {
    fn from(r: &Repository) -> Self {
        Self {
            name: r.name.clone(),
            stars: r.stargazers_count,
            forks: r.forks_count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub rows: Vec<RepoStat>,
    pub total_stars: u64,
    pub total_forks: u64,
}

/// Drop rows with neither stars nor forks, drop duplicates, then order by
/// stars and forks, most first.
pub fn summarize(stats: impl IntoIterator<Item = RepoStat>) -> Summary {
    let mut rows: Vec<RepoStat> = stats
        .into_iter()
        .filter(|s| s.stars != 0 || s.forks != 0)
        .collect();
    rows.sort_by(|a, b| {
        let ka = (Reverse(a.stars), Reverse(a.forks), &a.name);
        let kb = (Reverse(b.stars), Reverse(b.forks), &b.name);
        ka.cmp(&kb)
    });
    rows.dedup();
    let total_stars = rows.iter().map(|s| s.stars).sum();
    let total_forks = rows.iter().map(|s| s.forks).sum();
    Summary {
        rows,
        total_stars,
        total_forks,
    }
}
