use crate::domain::schedule::Schedule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentureCapitalist {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub domain: BTreeSet<String>,
    #[serde(default)]
    pub bio: String,
    /// Empty in directory listings; only the detail endpoint sends it.
    #[serde(default)]
    pub schedule: Schedule,
}

impl VentureCapitalist {
    pub fn works_in(&self, domain: &str) -> bool {
        let needle = domain.trim();
        self.domain.iter().any(|d| d.eq_ignore_ascii_case(needle))
    }

    fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.company.to_lowercase().contains(&query)
            || self.domain.iter().any(|d| d.to_lowercase().contains(&query))
    }
}

pub fn filter_by_domain<'a>(
    vcs: &'a [VentureCapitalist],
    domain: &str,
) -> Vec<&'a VentureCapitalist> {
    vcs.iter().filter(|vc| vc.works_in(domain)).collect()
}

/// Case-insensitive match on name, company or domain. A blank query keeps
/// every entry.
pub fn search<'a>(vcs: &'a [VentureCapitalist], query: &str) -> Vec<&'a VentureCapitalist> {
    let query = query.trim();
    if query.is_empty() {
        return vcs.iter().collect();
    }
    vcs.iter().filter(|vc| vc.matches_query(query)).collect()
}

pub fn domains(vcs: &[VentureCapitalist]) -> BTreeSet<String> {
    vcs.iter().flat_map(|vc| vc.domain.iter().cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directory() -> Vec<VentureCapitalist> {
        serde_json::from_value(json!([
            {"id": 1, "name": "Asha Rao", "company": "Blume", "photo": "/a.jpg", "experience": "12 years",
             "domain": ["Fintech", "SaaS"], "bio": "Early stage"},
            {"id": 2, "name": "Vikram Shah", "company": "Accel", "photo": "/v.jpg", "experience": "8 years",
             "domain": ["HealthTech"], "bio": "Seed"},
            {"id": 3, "name": "Meera Iyer", "company": "Nexus", "photo": "/m.jpg", "experience": "15 years",
             "domain": ["SaaS", "EdTech", "SaaS"], "bio": "Series A"}
        ]))
        .unwrap()
    }

    #[test]
    fn listing_entries_have_empty_schedule_and_deduplicated_domains() {
        let vcs = directory();
        assert!(vcs.iter().all(|vc| vc.schedule.is_empty()));
        assert_eq!(vcs[2].domain.len(), 2);
    }

    #[test]
    fn filters_by_domain_case_insensitively() {
        let vcs = directory();
        let ids: Vec<u64> = filter_by_domain(&vcs, "saas").iter().map(|vc| vc.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(filter_by_domain(&vcs, "Crypto").is_empty());
    }

    #[test]
    fn search_matches_name_company_and_domain() {
        let vcs = directory();
        let ids = |q: &str| search(&vcs, q).iter().map(|vc| vc.id).collect::<Vec<_>>();
        assert_eq!(ids("accel"), vec![2]);
        assert_eq!(ids("meera"), vec![3]);
        assert_eq!(ids("health"), vec![2]);
        assert_eq!(ids("tech"), vec![1, 2, 3]);
        assert_eq!(ids("  "), vec![1, 2, 3]);
    }

    #[test]
    fn collects_distinct_domains() {
        let all: Vec<String> = domains(&directory()).into_iter().collect();
        assert_eq!(all, vec!["EdTech", "Fintech", "HealthTech", "SaaS"]);
    }
}
